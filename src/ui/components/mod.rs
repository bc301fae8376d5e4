// Import all component modules
pub mod connection_settings;
pub mod database_list;
pub mod popups;

// Re-export all components for easier imports
pub use connection_settings::*;
pub use database_list::*;
pub use popups::*;
