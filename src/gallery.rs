//! Generated-image records and the in-memory gallery they live in.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::params::GenerationParameters;

/// One generation result as returned by the backend.
///
/// Created only from a successful `POST /generate` response and never mutated
/// afterwards. `seed` is the integer the backend actually used, even when the
/// request left it unset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedImage {
    pub id: String,
    pub url: String,
    pub prompt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub negative_prompt: Option<String>,
    pub parameters: GenerationParameters,
    pub seed: i64,
    #[serde(with = "chrono::serde::ts_seconds")]
    pub timestamp: DateTime<Utc>,
}

/// Reverse-chronological collection of generated images.
///
/// Owned solely by the page-level `AppState`; children read snapshots and
/// mutate through commands. New batches go to the front, so iteration order
/// is newest-first.
#[derive(Debug, Default, Clone)]
pub struct Gallery {
    images: Vec<GeneratedImage>,
}

impl Gallery {
    pub fn images(&self) -> &[GeneratedImage] {
        &self.images
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// Adds a batch to the front, preserving the batch's internal order.
    /// Existing images keep their relative order.
    pub fn prepend_batch(&mut self, batch: Vec<GeneratedImage>) {
        self.images.splice(0..0, batch);
    }

    /// Deletes at most one record matching `id`. Returns whether anything
    /// was removed; an absent id is a no-op, not an error.
    pub fn remove(&mut self, id: &str) -> bool {
        match self.images.iter().position(|image| image.id == id) {
            Some(index) => {
                self.images.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn clear(&mut self) {
        self.images.clear();
    }
}
