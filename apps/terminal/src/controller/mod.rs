//! Controller layer: page events, key mapping, and sequencing of the page's effects.

pub mod events;
pub mod orchestration;
