use std::path::PathBuf;

use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::{
    caption::{CaptionStyle, caption},
    card::CardRenderer,
    error::{GlyphcardError, GlyphcardResult},
    fonts::scan_font_dir,
    model::{Canvas, ColorScheme, artifact_stem, load_word_list},
};

/// Rotation is drawn uniformly from this symmetric range, in degrees, once per
/// rendered card.
pub const MAX_ROTATION_DEG: f64 = 15.0;

#[derive(Clone, Debug)]
pub struct BatchOptions {
    pub words_path: PathBuf,
    pub fonts_dir: PathBuf,
    pub out_dir: PathBuf,
    pub canvas: Canvas,
    pub caption_style: CaptionStyle,
    /// Output stem prefix (`{prefix}_{index}_{font}_{fg}`).
    pub stem_prefix: String,
    /// Fixed RNG seed for reproducible rotation angles. `None` seeds from
    /// entropy.
    pub seed: Option<u64>,
}

impl BatchOptions {
    pub fn new(words_path: PathBuf, fonts_dir: PathBuf, out_dir: PathBuf) -> Self {
        Self {
            words_path,
            fonts_dir,
            out_dir,
            canvas: Canvas::default(),
            caption_style: CaptionStyle::default(),
            stem_prefix: "ru".to_string(),
            seed: None,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub words: usize,
    pub fonts: usize,
    pub cards: usize,
}

/// Renders the full word x font x scheme cross-product, writing one
/// `<stem>.png` + `<stem>.txt` pair per combination.
///
/// Inputs are validated before the output directory is created, so a missing
/// word list or an empty fonts directory leaves no artifacts behind. Reruns
/// regenerate everything; filenames are deterministic per combination.
#[tracing::instrument(skip(opts), fields(out = %opts.out_dir.display()))]
pub fn run_batch(opts: &BatchOptions) -> GlyphcardResult<BatchSummary> {
    let words = load_word_list(&opts.words_path)?;
    let fonts = scan_font_dir(&opts.fonts_dir)?;

    std::fs::create_dir_all(&opts.out_dir).map_err(|e| {
        GlyphcardError::config(format!(
            "create output dir '{}': {e}",
            opts.out_dir.display()
        ))
    })?;

    let mut rng = match opts.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut renderer = CardRenderer::new(opts.canvas);
    let schemes = ColorScheme::builtin();
    let mut cards = 0usize;

    for word in &words {
        for font in &fonts {
            let font_bytes = font.load_bytes()?;
            for scheme in schemes {
                let angle = rng.gen_range(-MAX_ROTATION_DEG..=MAX_ROTATION_DEG);
                let card = renderer.render(word, font, &font_bytes, scheme, angle)?;

                let stem = artifact_stem(&opts.stem_prefix, word.index, &font.name, scheme.foreground);
                let png_path = opts.out_dir.join(format!("{stem}.png"));
                image::save_buffer_with_format(
                    &png_path,
                    &card.data,
                    card.width,
                    card.height,
                    image::ColorType::Rgba8,
                    image::ImageFormat::Png,
                )
                .map_err(|e| {
                    GlyphcardError::render(format!("write png '{}': {e}", png_path.display()))
                })?;

                let txt_path = opts.out_dir.join(format!("{stem}.txt"));
                std::fs::write(
                    &txt_path,
                    caption(&word.text, scheme, &font.name, opts.caption_style),
                )?;

                tracing::info!(stem = %stem, angle, "created card");
                cards += 1;
            }
        }
    }

    Ok(BatchSummary {
        words: words.len(),
        fonts: fonts.len(),
        cards,
    })
}
