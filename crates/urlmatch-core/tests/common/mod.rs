pub mod scripted_browser;
