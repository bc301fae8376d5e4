// UI module for the MySQL backup browser
pub mod models;
pub mod database_browser;
pub mod renderer;
pub mod keeper;
pub mod layouts;
pub mod components;
pub mod app;
pub mod key_handler;
