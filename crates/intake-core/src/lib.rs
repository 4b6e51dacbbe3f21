pub mod attachment;
pub mod catalog;
pub mod chat;
pub mod classifier;
pub mod config;
pub mod error;
pub mod form;
pub mod guidance;
pub mod io;
pub mod paths;
pub mod profile;
pub mod rules;
pub mod scheduler;
pub mod session;
pub mod sink;
pub mod thread;
pub mod transcript;
pub mod types;

pub use error::{IntakeError, Result};
