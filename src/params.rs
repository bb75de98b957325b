//! Generation request parameters and their validation rules.
//!
//! `GenerationParameters` is the value object sent to `POST /generate`. It is
//! produced by freezing the form draft and is never mutated afterwards, so an
//! in-flight request cannot be affected by later edits.

use serde::{Deserialize, Serialize};

pub const DIMENSION_MIN: u32 = 128;
pub const DIMENSION_MAX: u32 = 1024;
pub const DIMENSION_STEP: u32 = 64;
pub const STEPS_MIN: u32 = 1;
pub const STEPS_MAX: u32 = 50;
pub const CFG_SCALE_MIN: f32 = 1.0;
pub const CFG_SCALE_MAX: f32 = 15.0;
pub const CFG_SCALE_STEP: f32 = 0.5;
pub const BATCH_SIZE_MIN: u32 = 1;
pub const BATCH_SIZE_MAX: u32 = 4;

/// Sampler names the backend understands. Serialized as the exact display
/// strings the backend's scheduler map is keyed by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sampler {
    #[serde(rename = "Euler a")]
    EulerAncestral,
    #[serde(rename = "Euler")]
    Euler,
    #[serde(rename = "DPM++ 2M Karras")]
    DpmPlusPlus2mKarras,
    #[serde(rename = "LMS")]
    Lms,
    #[serde(rename = "DDIM")]
    Ddim,
}

impl Sampler {
    pub const ALL: [Sampler; 5] = [
        Sampler::EulerAncestral,
        Sampler::Euler,
        Sampler::DpmPlusPlus2mKarras,
        Sampler::Lms,
        Sampler::Ddim,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Sampler::EulerAncestral => "Euler a",
            Sampler::Euler => "Euler",
            Sampler::DpmPlusPlus2mKarras => "DPM++ 2M Karras",
            Sampler::Lms => "LMS",
            Sampler::Ddim => "DDIM",
        }
    }
}

impl Default for Sampler {
    fn default() -> Self {
        Sampler::EulerAncestral
    }
}

/// A LoRA overlay applied atop the checkpoint with a blend weight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoraRef {
    pub model: String,
    pub weight: f32,
}

/// A ControlNet overlay with an optional conditioning image locator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlNetRef {
    pub model: String,
    pub weight: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// Immutable snapshot of one generation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationParameters {
    pub prompt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub negative_prompt: Option<String>,
    pub model: String,
    pub width: u32,
    pub height: u32,
    pub steps: u32,
    pub cfg_scale: f32,
    pub sampler: Sampler,
    /// `None` means unset; the backend resolves the seed actually used.
    pub seed: Option<i64>,
    pub batch_size: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled_loras: Option<Vec<LoraRef>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled_control_nets: Option<Vec<ControlNetRef>>,
}

fn dimension_valid(value: u32) -> bool {
    (DIMENSION_MIN..=DIMENSION_MAX).contains(&value) && value % DIMENSION_STEP == 0
}

fn cfg_scale_valid(value: f32) -> bool {
    if !value.is_finite() || !(CFG_SCALE_MIN..=CFG_SCALE_MAX).contains(&value) {
        return false;
    }
    // Step of 0.5: twice the value must land on an integer.
    (value * 2.0).fract() == 0.0
}

impl GenerationParameters {
    /// Checks every range constraint. Callers freeze a draft through
    /// `ParameterForm::begin_submit`, which runs this before submission.
    pub fn validate(&self) -> Result<(), String> {
        if self.prompt.trim().is_empty() {
            return Err("Prompt must not be empty".to_string());
        }
        if self.model.trim().is_empty() {
            return Err("No model selected".to_string());
        }
        if !dimension_valid(self.width) {
            return Err(format!(
                "Invalid width {}: must be {}-{} in steps of {}",
                self.width, DIMENSION_MIN, DIMENSION_MAX, DIMENSION_STEP
            ));
        }
        if !dimension_valid(self.height) {
            return Err(format!(
                "Invalid height {}: must be {}-{} in steps of {}",
                self.height, DIMENSION_MIN, DIMENSION_MAX, DIMENSION_STEP
            ));
        }
        if !(STEPS_MIN..=STEPS_MAX).contains(&self.steps) {
            return Err(format!(
                "Invalid steps {}: must be {}-{}",
                self.steps, STEPS_MIN, STEPS_MAX
            ));
        }
        if !cfg_scale_valid(self.cfg_scale) {
            return Err(format!(
                "Invalid CFG scale {}: must be {}-{} in steps of {}",
                self.cfg_scale, CFG_SCALE_MIN, CFG_SCALE_MAX, CFG_SCALE_STEP
            ));
        }
        if !(BATCH_SIZE_MIN..=BATCH_SIZE_MAX).contains(&self.batch_size) {
            return Err(format!(
                "Invalid batch size {}: must be {}-{}",
                self.batch_size, BATCH_SIZE_MIN, BATCH_SIZE_MAX
            ));
        }
        for lora in self.enabled_loras.iter().flatten() {
            if !lora.weight.is_finite() {
                return Err(format!("Invalid LoRA weight for {}", lora.model));
            }
        }
        for control_net in self.enabled_control_nets.iter().flatten() {
            if !control_net.weight.is_finite() {
                return Err(format!("Invalid ControlNet weight for {}", control_net.model));
            }
        }
        Ok(())
    }
}
