//! Common utilities shared between the mission runner and the validator

pub mod config;
pub mod error;
pub mod logging;
pub mod paths;

pub use error::{Error, MissionError, Result};
