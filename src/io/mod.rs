pub mod config_store;
pub mod logging;
pub mod settings_io;
