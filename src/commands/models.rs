// ────────────────────────── Model directory ──────────────────────────

#[tauri::command]
pub async fn fetch_models(
    app: tauri::AppHandle,
    state: tauri::State<'_, AppState>,
) -> Result<Vec<ModelFolder>, String> {
    let (base_url, _) = read_backend_target(&state)?;

    let folders = match backend_api::list_models(&base_url).await {
        Ok(folders) => folders,
        Err(error) => {
            log::warn!("Model list unavailable from backend: {}", error);
            EventNotifier::new(app).error("Failed to load models from the backend");
            Vec::new()
        }
    };

    let mut catalog = state
        .catalog
        .write()
        .map_err(|_| "Failed to update model catalog".to_string())?;
    catalog.set_folders(folders.clone());
    Ok(folders)
}

#[tauri::command]
pub fn select_model(model: ModelInfo, state: tauri::State<'_, AppState>) -> Result<(), String> {
    state
        .catalog
        .write()
        .map(|mut catalog| catalog.select(model))
        .map_err(|_| "Failed to update model catalog".to_string())
}

#[tauri::command]
pub fn get_selected_model(
    state: tauri::State<'_, AppState>,
) -> Result<Option<ModelInfo>, String> {
    state
        .catalog
        .read()
        .map(|catalog| catalog.selected().cloned())
        .map_err(|_| "Failed to read model catalog".to_string())
}

#[tauri::command]
pub async fn verify_model(
    model_path: String,
    app: tauri::AppHandle,
    state: tauri::State<'_, AppState>,
) -> Result<bool, String> {
    let (base_url, _) = read_backend_target(&state)?;
    match backend_api::verify_model(&base_url, &model_path).await {
        Ok(exists) => Ok(exists),
        Err(error) => {
            log::warn!("Model verification failed for {}: {}", model_path, error);
            EventNotifier::new(app).error("Failed to verify model file");
            Ok(false)
        }
    }
}

#[tauri::command]
pub async fn get_model_metadata(
    model_id: String,
    app: tauri::AppHandle,
    state: tauri::State<'_, AppState>,
) -> Result<ModelMetadata, String> {
    let (base_url, _) = read_backend_target(&state)?;
    match backend_api::model_metadata(&base_url, &model_id).await {
        Ok(metadata) => Ok(metadata),
        Err(error) => {
            log::warn!("Metadata lookup failed for {}: {}", model_id, error);
            EventNotifier::new(app).error("Failed to load model metadata");
            Ok(ModelMetadata::default())
        }
    }
}
