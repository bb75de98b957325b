// ────────────────────────── Settings ──────────────────────────

#[tauri::command]
pub fn get_config(state: tauri::State<'_, AppState>) -> Result<AppConfig, String> {
    state
        .config
        .read()
        .map(|config| config.clone())
        .map_err(|_| "Failed to read configuration".to_string())
}

#[tauri::command]
pub fn set_theme(theme: Theme, state: tauri::State<'_, AppState>) -> Result<(), String> {
    let updated = {
        let mut lock = state
            .config
            .write()
            .map_err(|_| "Failed to update configuration".to_string())?;
        lock.theme = theme;
        lock.clone()
    };

    state
        .config_store
        .save(&updated)
        .map_err(|error| error.to_string())
}

#[tauri::command]
pub fn set_backend_url(
    backend_url: String,
    state: tauri::State<'_, AppState>,
) -> Result<(), String> {
    let trimmed = backend_url.trim();
    if trimmed.is_empty() {
        return Err("Backend URL must not be empty".to_string());
    }

    let updated = {
        let mut lock = state
            .config
            .write()
            .map_err(|_| "Failed to update configuration".to_string())?;
        lock.backend_url = trimmed.to_string();
        lock.clone()
    };

    log::info!("Backend base URL set to {}", updated.backend_url);
    state
        .config_store
        .save(&updated)
        .map_err(|error| error.to_string())
}

#[tauri::command]
pub async fn check_backend(
    state: tauri::State<'_, AppState>,
) -> Result<backend_api::BackendStatus, String> {
    let (base_url, _) = read_backend_target(&state)?;
    backend_api::test_connection(&base_url)
        .await
        .map_err(|e| e.to_string())
}
