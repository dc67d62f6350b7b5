pub mod cli;
pub mod io;
pub mod model;
pub mod ops;
pub mod shell;
pub mod tui;
pub mod util;
