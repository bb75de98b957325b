//! HTTP client for the local image-generation backend.
//!
//! The backend is a plain request/response service on a fixed local base
//! address (no auth, no retries, no pagination). Generation failures are
//! folded into an `ok: false` outcome instead of an `Err` so callers can
//! surface one notification and carry on with an unchanged gallery.

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::error::Error;
use std::time::Duration;

use crate::catalog::{ModelFolder, ModelMetadata};
use crate::gallery::GeneratedImage;
use crate::params::GenerationParameters;

const HEALTH_TIMEOUT_SECONDS: u64 = 10;
const LOOKUP_TIMEOUT_SECONDS: u64 = 60;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendStatus {
    pub ok: bool,
    pub message: String,
}

/// Result of one generation call. `ok: false` carries a user-facing message
/// and an empty image list; callers must treat empty as "nothing to add".
#[derive(Debug, Clone, Serialize)]
pub struct GenerationOutcome {
    pub ok: bool,
    pub images: Vec<GeneratedImage>,
    pub message: String,
}

#[derive(Debug, Clone, Deserialize)]
struct HealthResponse {
    #[serde(default)]
    status: String,
    #[serde(default)]
    device: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct VerifyResponse {
    #[serde(default)]
    exists: bool,
}

#[derive(Debug, Clone, Deserialize)]
struct ErrorBody {
    detail: Option<String>,
}

/// Probes the backend root and reports reachability plus the compute device.
pub async fn test_connection(
    base_url: &str,
) -> Result<BackendStatus, Box<dyn Error + Send + Sync>> {
    let client = build_client(HEALTH_TIMEOUT_SECONDS)?;
    let endpoint = build_endpoint(base_url, "/");

    let response = match client.get(&endpoint).send().await {
        Ok(response) => response,
        Err(error) => {
            return Ok(BackendStatus {
                ok: false,
                message: format_transport_error(&endpoint, &error),
            });
        }
    };
    if !response.status().is_success() {
        return Ok(BackendStatus {
            ok: false,
            message: format!(
                "Backend responded with status {} at {}",
                response.status(),
                endpoint
            ),
        });
    }

    let health: HealthResponse = response.json().await.unwrap_or(HealthResponse {
        status: "ok".to_string(),
        device: None,
    });
    let message = match health.device {
        Some(device) => format!("Connected to generation backend ({} on {})", health.status, device),
        None => "Connected to generation backend".to_string(),
    };
    Ok(BackendStatus { ok: true, message })
}

/// Sends one frozen request to `POST /generate`.
///
/// The backend resolves unset seeds; each returned record carries the seed
/// actually used. Transport and non-2xx failures become `ok: false` outcomes.
pub async fn submit_generation(
    params: &GenerationParameters,
    base_url: &str,
    timeout_seconds: u64,
) -> Result<GenerationOutcome, Box<dyn Error + Send + Sync>> {
    let client = build_client(timeout_seconds)?;
    let endpoint = build_endpoint(base_url, "generate");

    let response = match client.post(&endpoint).json(params).send().await {
        Ok(response) => response,
        Err(error) => {
            return Ok(GenerationOutcome {
                ok: false,
                images: Vec::new(),
                message: format_transport_error(&endpoint, &error),
            });
        }
    };
    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        return Ok(GenerationOutcome {
            ok: false,
            images: Vec::new(),
            message: failure_message(&endpoint, status, &body),
        });
    }

    let images: Vec<GeneratedImage> = response.json().await?;
    let count = images.len();
    Ok(GenerationOutcome {
        ok: true,
        images,
        message: format!("Generated {} image{}", count, if count == 1 { "" } else { "s" }),
    })
}

/// Fetches the model directory from `GET /models`.
pub async fn list_models(
    base_url: &str,
) -> Result<Vec<ModelFolder>, Box<dyn Error + Send + Sync>> {
    let client = build_client(LOOKUP_TIMEOUT_SECONDS)?;
    let endpoint = build_endpoint(base_url, "models");
    let response = client.get(&endpoint).send().await?;

    if !response.status().is_success() {
        return Err(std::io::Error::other(format!(
            "Request failed for {} with status {}",
            endpoint,
            response.status()
        ))
        .into());
    }

    Ok(response.json().await?)
}

/// Asks the backend whether a model file exists at the given relative path.
pub async fn verify_model(
    base_url: &str,
    model_path: &str,
) -> Result<bool, Box<dyn Error + Send + Sync>> {
    let client = build_client(LOOKUP_TIMEOUT_SECONDS)?;
    let endpoint = build_endpoint(base_url, "models/verify");
    let response = client
        .post(&endpoint)
        .json(&json!({ "model_path": model_path }))
        .send()
        .await?;

    if !response.status().is_success() {
        return Err(std::io::Error::other(format!(
            "Request failed for {} with status {}",
            endpoint,
            response.status()
        ))
        .into());
    }

    let body: VerifyResponse = response.json().await?;
    Ok(body.exists)
}

/// Fetches the typed metadata record for one model id.
pub async fn model_metadata(
    base_url: &str,
    model_id: &str,
) -> Result<ModelMetadata, Box<dyn Error + Send + Sync>> {
    let client = build_client(LOOKUP_TIMEOUT_SECONDS)?;
    let endpoint = build_endpoint(base_url, &format!("models/{}/metadata", model_id));
    let response = client.get(&endpoint).send().await?;

    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        return Err(std::io::Error::other(failure_message(&endpoint, status, &body)).into());
    }

    Ok(response.json().await?)
}

/// Fetches one generated image record; `None` when the backend reports 404.
pub async fn get_image(
    base_url: &str,
    image_id: &str,
) -> Result<Option<GeneratedImage>, Box<dyn Error + Send + Sync>> {
    let client = build_client(LOOKUP_TIMEOUT_SECONDS)?;
    let endpoint = build_endpoint(base_url, &format!("images/{}", image_id));
    let response = client.get(&endpoint).send().await?;

    if response.status() == StatusCode::NOT_FOUND {
        return Ok(None);
    }
    if !response.status().is_success() {
        return Err(std::io::Error::other(format!(
            "Request failed for {} with status {}",
            endpoint,
            response.status()
        ))
        .into());
    }

    Ok(Some(response.json().await?))
}

/// Persists one image record server-side via `POST /gallery`.
pub async fn save_to_gallery(
    image: &GeneratedImage,
    base_url: &str,
) -> Result<(), Box<dyn Error + Send + Sync>> {
    let client = build_client(LOOKUP_TIMEOUT_SECONDS)?;
    let endpoint = build_endpoint(base_url, "gallery");
    let response = client.post(&endpoint).json(image).send().await?;

    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        return Err(std::io::Error::other(failure_message(&endpoint, status, &body)).into());
    }

    Ok(())
}

fn build_endpoint(base_url: &str, path: &str) -> String {
    let normalized = normalize_base_url(base_url);
    let path = path.trim_start_matches('/');
    if path.is_empty() {
        format!("{normalized}/")
    } else {
        format!("{normalized}/{path}")
    }
}

fn normalize_base_url(base_url: &str) -> String {
    let mut normalized = base_url.trim().trim_end_matches('/').to_string();

    // Tolerate a pasted FastAPI docs URL.
    if let Some(value) = normalized.strip_suffix("/docs") {
        normalized = value.trim_end_matches('/').to_string();
    }

    normalized
}

/// Prefers the backend's `detail` field over a bare status line.
fn failure_message(endpoint: &str, status: StatusCode, body: &str) -> String {
    match parse_error_detail(body) {
        Some(detail) => detail,
        None => format!("Backend request failed with status {} at {}", status, endpoint),
    }
}

fn parse_error_detail(body: &str) -> Option<String> {
    let parsed: ErrorBody = serde_json::from_str(body).ok()?;
    parsed
        .detail
        .map(|detail| detail.trim().to_string())
        .filter(|detail| !detail.is_empty())
}

fn format_transport_error(endpoint: &str, error: &reqwest::Error) -> String {
    if error.is_timeout() {
        return format!(
            "Backend request timed out at {}. Model loading or generation exceeded the configured timeout; reduce steps/resolution or raise the timeout in settings.",
            endpoint
        );
    }

    if error.is_connect() {
        return format!(
            "Backend connection failed at {}. Verify the backend is running and accepting requests.",
            endpoint
        );
    }

    format!("Backend transport error at {}: {}", endpoint, error)
}

fn build_client(timeout_seconds: u64) -> Result<reqwest::Client, Box<dyn Error + Send + Sync>> {
    Ok(reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_seconds))
        .build()?)
}

#[cfg(test)]
mod tests {
    use super::{build_endpoint, normalize_base_url, parse_error_detail};
    use crate::gallery::GeneratedImage;

    #[test]
    fn normalize_base_url_strips_trailing_slashes_and_docs() {
        assert_eq!(
            normalize_base_url("http://127.0.0.1:8000/"),
            "http://127.0.0.1:8000"
        );
        assert_eq!(
            normalize_base_url("http://127.0.0.1:8000/docs"),
            "http://127.0.0.1:8000"
        );
        assert_eq!(
            normalize_base_url(" http://127.0.0.1:8000 "),
            "http://127.0.0.1:8000"
        );
    }

    #[test]
    fn build_endpoint_avoids_duplicate_separators() {
        assert_eq!(
            build_endpoint("http://127.0.0.1:8000", "generate"),
            "http://127.0.0.1:8000/generate"
        );
        assert_eq!(
            build_endpoint("http://127.0.0.1:8000/", "/models/verify"),
            "http://127.0.0.1:8000/models/verify"
        );
        assert_eq!(
            build_endpoint("http://127.0.0.1:8000", "/"),
            "http://127.0.0.1:8000/"
        );
    }

    #[test]
    fn parse_error_detail_reads_fastapi_errors() {
        assert_eq!(
            parse_error_detail(r#"{"detail": "Model sd15 not found"}"#).as_deref(),
            Some("Model sd15 not found")
        );
        assert_eq!(parse_error_detail(r#"{"detail": ""}"#), None);
        assert_eq!(parse_error_detail("<html>502</html>"), None);
        assert_eq!(parse_error_detail(""), None);
    }

    #[test]
    fn parses_generate_response_records() {
        let raw = r#"[
            {
                "id": "6f9619ff-8b86-d011-b42d-00c04fc964ff",
                "url": "/outputs/images/6f9619ff.png",
                "prompt": "a cat",
                "negativePrompt": "blurry",
                "parameters": {
                    "prompt": "a cat",
                    "negativePrompt": "blurry",
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
                "id": "9b2b1c62-1d14-4e8e-a6f0-0f6a35b0d9aa",
                "url": "/outputs/images/9b2b1c62.png",
                "prompt": "a cat",
                "negativePrompt": "blurry",
                "parameters": {
                    "prompt": "a cat",
                    "negativePrompt": "blurry",
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
        ]"#;

        let images: Vec<GeneratedImage> = serde_json::from_str(raw).unwrap();
        assert_eq!(images.len(), 2);
        assert!(images.iter().all(|image| image.prompt == "a cat"));
        // Seeds come back resolved even though the request left them unset.
        assert_ne!(images[0].seed, images[1].seed);
        assert!(images.iter().all(|image| image.parameters.seed.is_none()));
    }

    #[test]
    fn parses_verify_response() {
        let body: super::VerifyResponse = serde_json::from_str(r#"{"exists": true}"#).unwrap();
        assert!(body.exists);
        let body: super::VerifyResponse = serde_json::from_str("{}").unwrap();
        assert!(!body.exists);
    }

    #[test]
    fn parses_health_response() {
        let body: super::HealthResponse =
            serde_json::from_str(r#"{"status": "ok", "device": "cuda"}"#).unwrap();
        assert_eq!(body.status, "ok");
        assert_eq!(body.device.as_deref(), Some("cuda"));
    }
}
