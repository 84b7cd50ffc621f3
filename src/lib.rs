pub mod adapters;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod parser;
pub mod ports;
pub mod services;

pub use error::{ClauseError, Result};
