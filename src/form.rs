//! View-bound parameter form state.
//!
//! The form owns the mutable draft plus two derived UI-only fields. Submitting
//! freezes the draft into an immutable `GenerationParameters` snapshot, so
//! edits made while a request is in flight never reach the backend call.

use serde::{Deserialize, Serialize};

use crate::catalog::ModelInfo;
use crate::params::{ControlNetRef, GenerationParameters, LoraRef, Sampler};

const DEFAULT_NEGATIVE_PROMPT: &str = "blurry, bad quality, low resolution, distorted, deformed";

/// Mutable draft of the next generation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ParameterDraft {
    pub prompt: String,
    pub negative_prompt: String,
    pub width: u32,
    pub height: u32,
    pub steps: u32,
    pub cfg_scale: f32,
    pub sampler: Sampler,
    pub seed: Option<i64>,
    pub batch_size: u32,
    pub enabled_loras: Vec<LoraRef>,
    pub enabled_control_nets: Vec<ControlNetRef>,
}

impl Default for ParameterDraft {
    fn default() -> Self {
        Self {
            prompt: String::new(),
            negative_prompt: DEFAULT_NEGATIVE_PROMPT.to_string(),
            width: 512,
            height: 512,
            steps: 25,
            cfg_scale: 7.0,
            sampler: Sampler::default(),
            seed: None,
            batch_size: 1,
            enabled_loras: Vec::new(),
            enabled_control_nets: Vec::new(),
        }
    }
}

/// Form state holder: the draft plus the advanced-panel and in-flight flags.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterForm {
    pub draft: ParameterDraft,
    pub advanced_open: bool,
    in_flight: bool,
}

impl ParameterForm {
    pub fn in_flight(&self) -> bool {
        self.in_flight
    }

    pub fn set_draft(&mut self, draft: ParameterDraft) {
        self.draft = draft;
    }

    pub fn set_advanced_open(&mut self, open: bool) {
        self.advanced_open = open;
    }

    /// Submission is disabled while no model is selected, the prompt is
    /// blank, or a prior submission is still in flight.
    pub fn can_submit(&self, model_selected: bool) -> bool {
        model_selected && !self.draft.prompt.trim().is_empty() && !self.in_flight
    }

    /// Validates the draft, freezes it into an immutable snapshot for the
    /// given model, and marks the form in flight.
    pub fn begin_submit(&mut self, model: &ModelInfo) -> Result<GenerationParameters, String> {
        if self.in_flight {
            return Err("A generation is already in progress".to_string());
        }

        let prompt = self.draft.prompt.trim();
        if prompt.is_empty() {
            return Err("Prompt must not be empty".to_string());
        }

        let negative_prompt = {
            let trimmed = self.draft.negative_prompt.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        };

        let params = GenerationParameters {
            prompt: prompt.to_string(),
            negative_prompt,
            model: model.id.clone(),
            width: self.draft.width,
            height: self.draft.height,
            steps: self.draft.steps,
            cfg_scale: self.draft.cfg_scale,
            sampler: self.draft.sampler,
            seed: self.draft.seed,
            batch_size: self.draft.batch_size,
            enabled_loras: if self.draft.enabled_loras.is_empty() {
                None
            } else {
                Some(self.draft.enabled_loras.clone())
            },
            enabled_control_nets: if self.draft.enabled_control_nets.is_empty() {
                None
            } else {
                Some(self.draft.enabled_control_nets.clone())
            },
        };
        params.validate()?;

        self.in_flight = true;
        Ok(params)
    }

    /// Clears the in-flight flag. Called on success and failure alike.
    pub fn finish_submit(&mut self) {
        self.in_flight = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ModelKind;

    fn model() -> ModelInfo {
        ModelInfo {
            id: "sd15".to_string(),
            name: "Stable Diffusion v1.5".to_string(),
            path: "checkpoints/v1-5-pruned-emaonly.safetensors".to_string(),
            kind: ModelKind::Checkpoint,
            thumbnail: None,
        }
    }

    fn form_with_prompt(prompt: &str) -> ParameterForm {
        let mut form = ParameterForm::default();
        form.draft.prompt = prompt.to_string();
        form
    }

    #[test]
    fn default_draft_freezes_cleanly() {
        let mut form = form_with_prompt("a cat");
        let params = form.begin_submit(&model()).unwrap();
        assert_eq!(params.model, "sd15");
        assert_eq!(params.width, 512);
        assert_eq!(params.steps, 25);
        assert_eq!(params.sampler, Sampler::EulerAncestral);
        assert!(params.seed.is_none());
        assert!(params.validate().is_ok());
    }

    #[test]
    fn can_submit_requires_model_prompt_and_idle_form() {
        let form = form_with_prompt("a cat");
        assert!(form.can_submit(true));
        assert!(!form.can_submit(false));

        assert!(!form_with_prompt("").can_submit(true));
        assert!(!form_with_prompt("   \t").can_submit(true));

        let mut busy = form_with_prompt("a cat");
        busy.begin_submit(&model()).unwrap();
        assert!(!busy.can_submit(true));
    }

    #[test]
    fn begin_submit_rejects_blank_prompt_without_marking_in_flight() {
        let mut form = form_with_prompt("   ");
        assert!(form.begin_submit(&model()).is_err());
        assert!(!form.in_flight());
    }

    #[test]
    fn begin_submit_rejects_duplicate_submission() {
        let mut form = form_with_prompt("a cat");
        form.begin_submit(&model()).unwrap();
        assert!(form.begin_submit(&model()).is_err());

        form.finish_submit();
        assert!(form.begin_submit(&model()).is_ok());
    }

    #[test]
    fn invalid_draft_does_not_enter_flight() {
        let mut form = form_with_prompt("a cat");
        form.draft.width = 500;
        assert!(form.begin_submit(&model()).is_err());
        assert!(!form.in_flight());
        assert!(form.can_submit(true));
    }

    #[test]
    fn frozen_snapshot_is_isolated_from_later_draft_edits() {
        let mut form = form_with_prompt("a cat");
        form.draft.seed = Some(42);
        let params = form.begin_submit(&model()).unwrap();

        form.draft.prompt = "a dog".to_string();
        form.draft.seed = Some(7);
        form.draft.batch_size = 4;

        assert_eq!(params.prompt, "a cat");
        assert_eq!(params.seed, Some(42));
        assert_eq!(params.batch_size, 1);
    }

    #[test]
    fn blank_negative_prompt_is_omitted_from_the_snapshot() {
        let mut form = form_with_prompt("a cat");
        form.draft.negative_prompt = "   ".to_string();
        let params = form.begin_submit(&model()).unwrap();
        assert!(params.negative_prompt.is_none());
    }
}
