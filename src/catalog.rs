//! Model directory descriptors and the current selection.
//!
//! Everything the backend reports about models is treated as opaque reference
//! data; this module owns only the selection state layered on top.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelKind {
    Checkpoint,
    Lora,
    Controlnet,
    Vae,
}

/// One model file as the backend reports it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelInfo {
    pub id: String,
    pub name: String,
    pub path: String,
    #[serde(rename = "type")]
    pub kind: ModelKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelFolder {
    pub id: String,
    pub name: String,
    pub models: Vec<ModelInfo>,
}

/// Typed view of a model's metadata lookup.
///
/// The backend treats this object as open-ended, so every known field is
/// optional and anything unrecognized is preserved in `extra` rather than
/// dropped or rejected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    /// Model file size in GiB.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolution: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tokens: Option<Vec<String>>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Model directory state: the last fetched folder list plus the selection.
#[derive(Debug, Default, Clone)]
pub struct ModelCatalog {
    folders: Vec<ModelFolder>,
    selected: Option<ModelInfo>,
}

impl ModelCatalog {
    pub fn folders(&self) -> &[ModelFolder] {
        &self.folders
    }

    pub fn selected(&self) -> Option<&ModelInfo> {
        self.selected.as_ref()
    }

    /// Replaces the folder list with a fresh fetch result.
    ///
    /// If nothing is selected yet and the list is non-empty, the first model
    /// of the first folder becomes the selection, exactly once per fetch.
    /// An existing selection is never overridden.
    pub fn set_folders(&mut self, folders: Vec<ModelFolder>) {
        self.folders = folders;
        if self.selected.is_none() {
            self.selected = self
                .folders
                .iter()
                .find_map(|folder| folder.models.first())
                .cloned();
        }
    }

    pub fn select(&mut self, model: ModelInfo) {
        self.selected = Some(model);
    }
}
