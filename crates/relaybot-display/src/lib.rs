//! Bounded, human-readable summaries of inbound messages for logs.

pub mod classify;
pub mod truncate;

pub use classify::{classify, classify_raw, DisplayInfo};
pub use truncate::truncate_text;
