// ────────────────────────── Generation ──────────────────────────

#[tauri::command]
pub fn get_form(state: tauri::State<'_, AppState>) -> Result<ParameterForm, String> {
    state
        .form
        .read()
        .map(|form| form.clone())
        .map_err(|_| "Failed to read form state".to_string())
}

#[tauri::command]
pub fn update_draft(
    draft: ParameterDraft,
    state: tauri::State<'_, AppState>,
) -> Result<(), String> {
    state
        .form
        .write()
        .map(|mut form| form.set_draft(draft))
        .map_err(|_| "Failed to update form state".to_string())
}

#[tauri::command]
pub fn set_advanced_open(open: bool, state: tauri::State<'_, AppState>) -> Result<(), String> {
    state
        .form
        .write()
        .map(|mut form| form.set_advanced_open(open))
        .map_err(|_| "Failed to update form state".to_string())
}

#[tauri::command]
pub async fn generate(
    app: tauri::AppHandle,
    state: tauri::State<'_, AppState>,
) -> Result<Vec<GeneratedImage>, String> {
    let (base_url, timeout_seconds) = read_backend_target(&state)?;
    let notifier = EventNotifier::new(app.clone());

    // Freeze the draft into an immutable snapshot before any await point;
    // edits made from here on cannot reach the in-flight request.
    let params = {
        let selected = state
            .catalog
            .read()
            .map_err(|_| "Failed to read model catalog".to_string())?
            .selected()
            .cloned();
        let Some(model) = selected else {
            return Err("No model selected".to_string());
        };
        let mut form = state
            .form
            .write()
            .map_err(|_| "Failed to update form state".to_string())?;
        form.begin_submit(&model)?
    };

    log::info!(
        "Submitting generation request (model: {}, batch: {})",
        params.model,
        params.batch_size
    );
    notify::emit_generation_progress(&app, true);
    let outcome = backend_api::submit_generation(&params, &base_url, timeout_seconds).await;
    notify::emit_generation_progress(&app, false);

    if let Ok(mut form) = state.form.write() {
        form.finish_submit();
    }

    let mut gallery = state
        .gallery
        .write()
        .map_err(|_| "Failed to update gallery".to_string())?;
    match outcome {
        Ok(outcome) => Ok(apply_generation_outcome(&mut gallery, &notifier, outcome)),
        Err(error) => {
            log::warn!("Generation request failed: {}", error);
            notifier.error("Failed to generate images. Please try again.");
            Ok(Vec::new())
        }
    }
}

/// Applies one generation outcome to the gallery: prepends the batch on
/// success, otherwise surfaces exactly one failure notification and leaves
/// the gallery untouched.
fn apply_generation_outcome(
    gallery: &mut Gallery,
    notifier: &dyn Notifier,
    outcome: backend_api::GenerationOutcome,
) -> Vec<GeneratedImage> {
    if !outcome.ok {
        notifier.error(&outcome.message);
        return Vec::new();
    }
    if outcome.images.is_empty() {
        notifier.error("Backend returned no images");
        return Vec::new();
    }

    gallery.prepend_batch(outcome.images.clone());
    notifier.success(&outcome.message);
    outcome.images
}

#[tauri::command]
pub async fn get_image_info(
    image_id: String,
    app: tauri::AppHandle,
    state: tauri::State<'_, AppState>,
) -> Result<Option<GeneratedImage>, String> {
    let (base_url, _) = read_backend_target(&state)?;
    match backend_api::get_image(&base_url, &image_id).await {
        Ok(image) => Ok(image),
        Err(error) => {
            log::warn!("Image lookup failed for {}: {}", image_id, error);
            EventNotifier::new(app).error("Failed to load image details");
            Ok(None)
        }
    }
}

#[tauri::command]
pub async fn save_image_to_gallery(
    image: GeneratedImage,
    app: tauri::AppHandle,
    state: tauri::State<'_, AppState>,
) -> Result<bool, String> {
    let (base_url, _) = read_backend_target(&state)?;
    let notifier = EventNotifier::new(app);

    match backend_api::save_to_gallery(&image, &base_url).await {
        Ok(()) => {
            notifier.success("Image saved to gallery");
            Ok(true)
        }
        Err(error) => {
            log::warn!("Gallery save failed for {}: {}", image.id, error);
            notifier.error("Failed to save image to gallery");
            Ok(false)
        }
    }
}

#[cfg(test)]
mod generation_tests {
    use super::apply_generation_outcome;
    use crate::backend_api::GenerationOutcome;
    use crate::gallery::{Gallery, GeneratedImage};
    use crate::notify::test_support::RecordingNotifier;
    use crate::notify::NotificationKind;

    fn canned_batch() -> Vec<GeneratedImage> {
        serde_json::from_str(
            r#"[
                {
                    "id": "img-1",
                    "url": "/outputs/images/img-1.png",
                    "prompt": "a cat",
                    "parameters": {
                        "prompt": "a cat",
                        "model": "sd15",
                        "width": 512,
                        "height": 512,
                        "steps": 25,
                        "cfgScale": 7.0,
                        "sampler": "Euler a",
                        "seed": null,
                        "batchSize": 2
                    },
                    "seed": 1499682456,
                    "timestamp": 1700000000
                },
                {
                    "id": "img-2",
                    "url": "/outputs/images/img-2.png",
                    "prompt": "a cat",
                    "parameters": {
                        "prompt": "a cat",
                        "model": "sd15",
                        "width": 512,
                        "height": 512,
                        "steps": 25,
                        "cfgScale": 7.0,
                        "sampler": "Euler a",
                        "seed": null,
                        "batchSize": 2
                    },
                    "seed": 2147001234,
                    "timestamp": 1700000000
                }
            ]"#,
        )
        .unwrap()
    }

    #[test]
    fn success_prepends_batch_and_notifies_once() {
        let mut gallery = Gallery::default();
        let notifier = RecordingNotifier::default();
        let batch = canned_batch();

        let added = apply_generation_outcome(
            &mut gallery,
            &notifier,
            GenerationOutcome {
                ok: true,
                images: batch.clone(),
                message: "Generated 2 images".to_string(),
            },
        );

        assert_eq!(added.len(), 2);
        assert_eq!(gallery.len(), 2);
        assert!(gallery.images().iter().all(|image| image.prompt == "a cat"));
        // Seeds are resolved, non-null, and distinct across the batch.
        assert_ne!(gallery.images()[0].seed, gallery.images()[1].seed);

        let events = notifier.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].0, NotificationKind::Success);
    }

    #[test]
    fn failure_leaves_gallery_unchanged_with_one_error_notification() {
        let mut gallery = Gallery::default();
        gallery.prepend_batch(canned_batch());
        let before = gallery.images().to_vec();

        let notifier = RecordingNotifier::default();
        let added = apply_generation_outcome(
            &mut gallery,
            &notifier,
            GenerationOutcome {
                ok: false,
                images: Vec::new(),
                message: "Backend connection failed".to_string(),
            },
        );

        assert!(added.is_empty());
        assert_eq!(gallery.images(), before.as_slice());

        let events = notifier.events();
        assert_eq!(events.len(), 1);
        assert_eq!(
            events[0],
            (
                NotificationKind::Error,
                "Backend connection failed".to_string()
            )
        );
    }

    #[test]
    fn empty_success_is_treated_as_nothing_to_add() {
        let mut gallery = Gallery::default();
        let notifier = RecordingNotifier::default();

        let added = apply_generation_outcome(
            &mut gallery,
            &notifier,
            GenerationOutcome {
                ok: true,
                images: Vec::new(),
                message: "Generated 0 images".to_string(),
            },
        );

        assert!(added.is_empty());
        assert!(gallery.is_empty());
        assert_eq!(notifier.events().len(), 1);
        assert_eq!(notifier.events()[0].0, NotificationKind::Error);
    }

    #[test]
    fn new_batch_lands_in_front_of_existing_images() {
        let mut gallery = Gallery::default();
        let notifier = RecordingNotifier::default();
        let mut first = canned_batch();
        first.truncate(1);
        gallery.prepend_batch(first);

        apply_generation_outcome(
            &mut gallery,
            &notifier,
            GenerationOutcome {
                ok: true,
                images: canned_batch(),
                message: "Generated 2 images".to_string(),
            },
        );

        let ids: Vec<&str> = gallery.images().iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["img-1", "img-2", "img-1"]);
    }
}
