pub mod backend_api;
pub mod catalog;
pub mod config;
pub mod form;
pub mod gallery;
pub mod notify;
pub mod params;

mod commands;

use commands::{
    check_backend, clear_gallery, fetch_models, gallery_images, generate, get_config, get_form,
    get_image_info, get_model_metadata, get_selected_model, remove_image, save_image_to_gallery,
    select_model, set_advanced_open, set_backend_url, set_theme, update_draft, verify_model,
};
use catalog::ModelCatalog;
use config::{AppConfig, ConfigStore, JsonFileStore};
use form::ParameterForm;
use gallery::Gallery;
use std::sync::{Arc, RwLock};
use tauri::Manager;

/// Shared application state for Tauri commands.
///
/// The gallery, catalog, and form each have exactly one owner here; the
/// webview reads snapshots and mutates through commands, so there are no
/// concurrent writers by construction.
pub struct AppState {
    pub config: Arc<RwLock<AppConfig>>,
    pub config_store: Arc<dyn ConfigStore>,
    pub catalog: Arc<RwLock<ModelCatalog>>,
    pub form: Arc<RwLock<ParameterForm>>,
    pub gallery: Arc<RwLock<Gallery>>,
}

/// Entry point: sets up the Tauri application with managed state.
pub fn run() {
    env_logger::init();

    tauri::Builder::default()
        .setup(|app| {
            let app_data = app
                .path()
                .app_data_dir()
                .expect("Failed to get app data directory");
            std::fs::create_dir_all(&app_data).ok();

            let store = JsonFileStore::new(&app_data);
            let config = config::load_or_default(&store);
            log::info!(
                "Loaded configuration (backend: {}, timeout: {}s)",
                config.backend_url,
                config.request_timeout_secs
            );

            app.manage(AppState {
                config: Arc::new(RwLock::new(config)),
                config_store: Arc::new(store),
                catalog: Arc::new(RwLock::new(ModelCatalog::default())),
                form: Arc::new(RwLock::new(ParameterForm::default())),
                gallery: Arc::new(RwLock::new(Gallery::default())),
            });
            Ok(())
        })
        .invoke_handler(tauri::generate_handler![
            get_config,
            set_theme,
            set_backend_url,
            check_backend,
            fetch_models,
            select_model,
            get_selected_model,
            verify_model,
            get_model_metadata,
            get_form,
            update_draft,
            set_advanced_open,
            generate,
            get_image_info,
            save_image_to_gallery,
            gallery_images,
            remove_image,
            clear_gallery,
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
