pub mod app_settings;
pub mod app_state;
pub mod driver;
pub mod messages;
pub mod network;
