// Export modules for testing and usage
pub mod ui;
pub mod cli;
pub mod config;
pub mod error;
pub mod mysql;
pub mod tools;
pub mod backup;
pub mod jobs;
