use crate::{
    backend_api,
    catalog::{ModelFolder, ModelInfo, ModelMetadata},
    config::{AppConfig, Theme},
    form::{ParameterDraft, ParameterForm},
    gallery::{Gallery, GeneratedImage},
    notify::{self, EventNotifier, Notifier},
    AppState,
};

/// Reads the backend base URL and the generation request timeout together,
/// so one lock acquisition covers both before any await point.
fn read_backend_target(state: &tauri::State<'_, AppState>) -> Result<(String, u64), String> {
    state
        .config
        .read()
        .map(|config| (config.backend_url.clone(), config.request_timeout_secs))
        .map_err(|_| "Failed to read configuration".to_string())
}

include!("commands/settings.rs");

include!("commands/models.rs");

include!("commands/generate.rs");

include!("commands/gallery.rs");
