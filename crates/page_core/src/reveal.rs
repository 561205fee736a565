//! One-shot reveal of page sections as they first enter the viewport.

use std::{collections::HashMap, sync::Arc};

use shared::domain::ElementId;
use tracing::debug;

use crate::view::Revealable;

pub const DEFAULT_THRESHOLD: f32 = 0.1;

/// A visibility report for one observed element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntersectionEntry {
    pub element: ElementId,
    pub is_intersecting: bool,
    pub ratio: f32,
}

pub struct RevealController {
    threshold: f32,
    observed: HashMap<ElementId, Arc<dyn Revealable>>,
}

impl RevealController {
    pub fn new(threshold: f32) -> Self {
        Self {
            threshold,
            observed: HashMap::new(),
        }
    }

    pub fn observe(&mut self, element: Arc<dyn Revealable>) {
        self.observed.insert(element.element_id(), element);
    }

    pub fn observe_all(&mut self, elements: impl IntoIterator<Item = Arc<dyn Revealable>>) {
        for element in elements {
            self.observe(element);
        }
    }

    pub fn is_observing(&self, element: ElementId) -> bool {
        self.observed.contains_key(&element)
    }

    pub fn observed_count(&self) -> usize {
        self.observed.len()
    }

    /// Marks newly visible elements and stops observing them. Returns the ids revealed.
    pub fn on_intersection(&mut self, entries: &[IntersectionEntry]) -> Vec<ElementId> {
        let mut revealed = Vec::new();
        for entry in entries {
            if !entry.is_intersecting || entry.ratio < self.threshold {
                continue;
            }
            if let Some(element) = self.observed.remove(&entry.element) {
                element.mark_visible();
                debug!(element = entry.element.0, "section revealed");
                revealed.push(entry.element);
            }
        }
        revealed
    }
}

impl Default for RevealController {
    fn default() -> Self {
        Self::new(DEFAULT_THRESHOLD)
    }
}

#[cfg(test)]
#[path = "tests/reveal_tests.rs"]
mod tests;
