//! Configuration loading for Almanac.

mod settings;

pub use settings::*;
