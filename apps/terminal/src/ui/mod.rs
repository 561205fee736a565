//! Terminal rendering of the page's presentation surfaces.

pub mod markup;
pub mod terminal;
