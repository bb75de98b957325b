// ────────────────────────── Gallery ──────────────────────────

#[tauri::command]
pub fn gallery_images(state: tauri::State<'_, AppState>) -> Result<Vec<GeneratedImage>, String> {
    state
        .gallery
        .read()
        .map(|gallery| gallery.images().to_vec())
        .map_err(|_| "Failed to read gallery".to_string())
}

#[tauri::command]
pub fn remove_image(
    image_id: String,
    app: tauri::AppHandle,
    state: tauri::State<'_, AppState>,
) -> Result<bool, String> {
    let removed = state
        .gallery
        .write()
        .map(|mut gallery| gallery.remove(&image_id))
        .map_err(|_| "Failed to update gallery".to_string())?;

    if removed {
        EventNotifier::new(app).success("Image removed");
    }
    Ok(removed)
}

#[tauri::command]
pub fn clear_gallery(
    app: tauri::AppHandle,
    state: tauri::State<'_, AppState>,
) -> Result<(), String> {
    state
        .gallery
        .write()
        .map(|mut gallery| gallery.clear())
        .map_err(|_| "Failed to update gallery".to_string())?;

    EventNotifier::new(app).success("Gallery cleared");
    Ok(())
}
