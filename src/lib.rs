pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod modelfile;
pub mod portfolio;
pub mod tools;
pub mod ui;

pub use error::{Result, ToolkitError};
