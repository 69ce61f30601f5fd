//! Periodic job bookkeeping.

pub mod marker;

pub use marker::JobRunMarker;
