//! Domain types for FadeFinder

pub mod gap_event;

pub use gap_event::{GapEvent, GapEventError};
