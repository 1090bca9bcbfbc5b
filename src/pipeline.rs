//! Typed txt2img pipeline driver.
//!
//! One linear path, no branching: load models, encode the negative prompt,
//! generate and encode the positive prompt, sample, decode, upscale, save.
//! The heavy stages live behind [`PipelineBackend`]; this module owns the
//! ordering, the configuration, and the fail-fast semantics.

use std::path::PathBuf;

use rand::Rng;

use crate::{
    error::{GlyphcardError, GlyphcardResult},
    prompt::{OllamaConfig, PromptSource},
};

macro_rules! handle {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
        pub struct $name(pub u32);
    };
}

handle!(
    /// Opaque backend handle to a loaded diffusion model.
    ModelHandle
);
handle!(
    /// Opaque backend handle to a loaded text/vision encoder.
    EncoderHandle
);
handle!(
    /// Opaque backend handle to encoded conditioning.
    ConditioningHandle
);
handle!(
    /// Opaque backend handle to a latent buffer.
    LatentHandle
);
handle!(
    /// Opaque backend handle to a loaded variational decoder.
    DecoderHandle
);
handle!(
    /// Opaque backend handle to a loaded upscaling model.
    UpscalerHandle
);
handle!(
    /// Opaque backend handle to decoded pixels.
    ImageHandle
);

/// Fixed sampling parameters threaded into [`PipelineBackend::sample`].
#[derive(Clone, Debug, PartialEq)]
pub struct SampleParams {
    pub seed: u64,
    pub steps: u32,
    pub cfg: f32,
    pub sampler: String,
    pub scheduler: String,
    pub denoise: f32,
}

/// The seams of the pipeline: one method per node kind, opaque handles minted
/// and resolved by the backend. Replaces string-keyed registry dispatch with
/// an explicit interface.
pub trait PipelineBackend {
    fn load_diffusion_model(&mut self, name: &str) -> GlyphcardResult<ModelHandle>;
    fn load_text_encoder(&mut self, name: &str) -> GlyphcardResult<EncoderHandle>;
    fn encode_text(
        &mut self,
        encoder: EncoderHandle,
        text: &str,
    ) -> GlyphcardResult<ConditioningHandle>;
    fn empty_latent(
        &mut self,
        width: u32,
        height: u32,
        batch_size: u32,
    ) -> GlyphcardResult<LatentHandle>;
    fn load_decoder(&mut self, name: &str) -> GlyphcardResult<DecoderHandle>;
    fn load_upscaler(&mut self, name: &str) -> GlyphcardResult<UpscalerHandle>;
    fn sample(
        &mut self,
        model: ModelHandle,
        positive: ConditioningHandle,
        negative: ConditioningHandle,
        latent: LatentHandle,
        params: &SampleParams,
    ) -> GlyphcardResult<LatentHandle>;
    fn decode(
        &mut self,
        decoder: DecoderHandle,
        latent: LatentHandle,
    ) -> GlyphcardResult<ImageHandle>;
    fn upscale(
        &mut self,
        upscaler: UpscalerHandle,
        image: ImageHandle,
    ) -> GlyphcardResult<ImageHandle>;
    fn save_image(
        &mut self,
        image: ImageHandle,
        filename_prefix: &str,
    ) -> GlyphcardResult<PathBuf>;
    /// Side-channel preview of the generated prompt text.
    fn preview_text(&mut self, text: &str) -> GlyphcardResult<()>;
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PromptConfig {
    pub system: String,
    pub user: String,
    pub ollama: OllamaConfig,
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self {
            system: "You are generating a prompt for a text-to-image model. \
                     A prompt should be different from previously generated prompts. \
                     Only respond with the prompt."
                .to_string(),
            user: "Create an appropriate prompt for a photorealistic image.".to_string(),
            ollama: OllamaConfig::default(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Txt2ImgConfig {
    pub diffusion_model: String,
    pub text_encoder: String,
    pub decoder: String,
    pub upscaler: String,
    pub negative_prompt: String,
    pub width: u32,
    pub height: u32,
    pub batch_size: u32,
    pub steps: u32,
    pub cfg: f32,
    pub sampler: String,
    pub scheduler: String,
    pub denoise: f32,
    pub filename_prefix: String,
    pub prompt: PromptConfig,
}

impl Default for Txt2ImgConfig {
    fn default() -> Self {
        Self {
            diffusion_model: "qwen-image-Q6_K.gguf".to_string(),
            text_encoder: "qwen_2.5_vl_7b.safetensors".to_string(),
            decoder: "qwen_image_vae.safetensors".to_string(),
            upscaler: "4xNomos8kSCHAT-L.pth".to_string(),
            negative_prompt: "drawing, text edit, human limbs".to_string(),
            width: 360,
            height: 640,
            batch_size: 1,
            steps: 30,
            cfg: 4.0,
            sampler: "euler".to_string(),
            scheduler: "beta".to_string(),
            denoise: 1.0,
            filename_prefix: "glyphcard".to_string(),
            prompt: PromptConfig::default(),
        }
    }
}

impl Txt2ImgConfig {
    pub fn validate(&self) -> GlyphcardResult<()> {
        for (field, value) in [
            ("diffusion_model", &self.diffusion_model),
            ("text_encoder", &self.text_encoder),
            ("decoder", &self.decoder),
            ("upscaler", &self.upscaler),
            ("sampler", &self.sampler),
            ("scheduler", &self.scheduler),
            ("filename_prefix", &self.filename_prefix),
        ] {
            if value.trim().is_empty() {
                return Err(GlyphcardError::config(format!("{field} must be non-empty")));
            }
        }
        if self.width == 0 || self.height == 0 {
            return Err(GlyphcardError::config("width and height must be > 0"));
        }
        if self.batch_size == 0 {
            return Err(GlyphcardError::config("batch_size must be >= 1"));
        }
        if self.steps == 0 {
            return Err(GlyphcardError::config("steps must be >= 1"));
        }
        if !self.cfg.is_finite() || self.cfg <= 0.0 {
            return Err(GlyphcardError::config("cfg must be finite and > 0"));
        }
        if !self.denoise.is_finite() || !(0.0..=1.0).contains(&self.denoise) {
            return Err(GlyphcardError::config("denoise must be within [0, 1]"));
        }
        Ok(())
    }
}

/// Output of one pipeline run.
#[derive(Clone, Debug, PartialEq)]
pub struct Txt2ImgRun {
    pub prompt: String,
    pub seed: u64,
    pub image_path: PathBuf,
}

/// Sampler seeds are drawn uniformly from [1, 2^64).
pub fn draw_seed(rng: &mut impl Rng) -> u64 {
    rng.gen_range(1..=u64::MAX)
}

/// Runs the fixed linear pipeline once. Any backend or prompt-source error
/// aborts the run; there is no retry or partial recovery.
pub fn run_txt2img(
    backend: &mut dyn PipelineBackend,
    prompts: &dyn PromptSource,
    config: &Txt2ImgConfig,
    rng: &mut impl Rng,
) -> GlyphcardResult<Txt2ImgRun> {
    config.validate()?;

    tracing::info!(model = %config.diffusion_model, "loading diffusion model");
    let model = backend.load_diffusion_model(&config.diffusion_model)?;
    tracing::info!(encoder = %config.text_encoder, "loading text encoder");
    let encoder = backend.load_text_encoder(&config.text_encoder)?;

    let negative = backend.encode_text(encoder, &config.negative_prompt)?;

    tracing::info!(model = %config.prompt.ollama.model, "generating prompt");
    let prompt = prompts.generate(&config.prompt.system, &config.prompt.user)?;
    let positive = backend.encode_text(encoder, &prompt)?;

    let latent = backend.empty_latent(config.width, config.height, config.batch_size)?;
    let decoder = backend.load_decoder(&config.decoder)?;
    let upscaler = backend.load_upscaler(&config.upscaler)?;

    let seed = draw_seed(rng);
    let params = SampleParams {
        seed,
        steps: config.steps,
        cfg: config.cfg,
        sampler: config.sampler.clone(),
        scheduler: config.scheduler.clone(),
        denoise: config.denoise,
    };
    tracing::info!(seed, steps = config.steps, "sampling");
    let sampled = backend.sample(model, positive, negative, latent, &params)?;

    let decoded = backend.decode(decoder, sampled)?;
    let upscaled = backend.upscale(upscaler, decoded)?;
    let image_path = backend.save_image(upscaled, &config.filename_prefix)?;
    backend.preview_text(&prompt)?;
    tracing::info!(path = %image_path.display(), "pipeline complete");

    Ok(Txt2ImgRun {
        prompt,
        seed,
        image_path,
    })
}

/// Raw JSON node result for backends that speak a wire protocol.
///
/// Results are either sequence-shaped or mapping-shaped with the sequence
/// stored under `"result"`; [`slot`](Self::slot) resolves both.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeOutput(pub serde_json::Value);

impl NodeOutput {
    pub fn slot(&self, index: usize) -> GlyphcardResult<&serde_json::Value> {
        if let Some(seq) = self.0.as_array() {
            return seq.get(index).ok_or_else(|| {
                GlyphcardError::backend(format!("node output has no slot {index}"))
            });
        }
        let fallback = self
            .0
            .as_object()
            .and_then(|map| map.get("result"))
            .and_then(|v| v.as_array())
            .ok_or_else(|| {
                GlyphcardError::backend("node output is neither a sequence nor 'result'-keyed")
            })?;
        fallback
            .get(index)
            .ok_or_else(|| GlyphcardError::backend(format!("node output has no slot {index}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        Txt2ImgConfig::default().validate().unwrap();
    }

    #[test]
    fn empty_model_name_is_rejected() {
        let config = Txt2ImgConfig {
            diffusion_model: " ".to_string(),
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("diffusion_model"));
    }

    #[test]
    fn out_of_range_denoise_is_rejected() {
        let config = Txt2ImgConfig {
            denoise: 1.5,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config: Txt2ImgConfig = serde_json::from_str(r#"{"steps": 12}"#).unwrap();
        assert_eq!(config.steps, 12);
        assert_eq!(config.sampler, "euler");
        assert_eq!(config.width, 360);
    }

    #[test]
    fn seed_is_never_zero() {
        let mut rng = rand::rngs::mock::StepRng::new(0, 1);
        for _ in 0..64 {
            assert!(draw_seed(&mut rng) >= 1);
        }
    }

    #[test]
    fn slot_indexes_sequences() {
        let out = NodeOutput(serde_json::json!(["a", "b"]));
        assert_eq!(out.slot(1).unwrap(), "b");
        assert!(out.slot(2).is_err());
    }

    #[test]
    fn slot_falls_back_to_result_key() {
        let out = NodeOutput(serde_json::json!({"result": [7, 8], "meta": true}));
        assert_eq!(out.slot(0).unwrap(), 7);
        assert!(out.slot(9).is_err());
    }

    #[test]
    fn slot_rejects_other_shapes() {
        let out = NodeOutput(serde_json::json!({"no_result": []}));
        assert!(out.slot(0).is_err());
        let out = NodeOutput(serde_json::json!(42));
        assert!(out.slot(0).is_err());
    }
}
