//! REST API module for Almanac.
//!
//! Serves calendar views, the calendar directory and entity state over HTTP.

mod handlers;
mod rest;

pub use handlers::*;
pub use rest::*;
