//! Job layer: the mapper/reducer pair plugged into the external runtime.

pub mod config;
pub mod finder;

pub use config::JobConfig;
pub use finder::{RecordFinder, Summary};
