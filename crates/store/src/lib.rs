//! Store - Settings persistence
//!
//! Loads and saves the handwriting settings file and converts it into the
//! layout configuration and page geometry used by the layout engine.

mod error;
mod settings;

pub use error::*;
pub use settings::*;
