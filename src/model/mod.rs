pub mod config;
pub mod project;
pub mod settings;

pub use config::*;
pub use project::*;
pub use settings::*;
