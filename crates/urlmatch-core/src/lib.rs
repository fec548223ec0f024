//! urlmatch core: validate that redirect links end up on the expected domain.
//!
//! Pipeline per task: browser events → [`event::classify`] →
//! [`correlator::Correlator`] → [`resolver::resolve_final`] →
//! [`verdict::evaluate`] → [`report::ResultSink`]. The [`orchestrator`]
//! sequences it, one navigation at a time.

pub mod config;
pub mod logging;

pub mod browser;
pub mod correlator;
pub mod domain;
pub mod event;
pub mod orchestrator;
pub mod report;
pub mod resolver;
pub mod task_list;
pub mod verdict;
