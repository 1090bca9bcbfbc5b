#![forbid(unsafe_code)]

pub mod batch;
pub mod caption;
pub mod card;
pub mod composite;
pub mod error;
pub mod fonts;
pub mod layout;
pub mod model;
pub mod pipeline;
pub mod prompt;
pub mod raster;

pub use batch::{BatchOptions, BatchSummary, MAX_ROTATION_DEG, run_batch};
pub use caption::{CaptionStyle, LINE_SEPARATOR, caption, transliterate};
pub use card::{CardRenderer, CardRgba};
pub use error::{GlyphcardError, GlyphcardResult};
pub use fonts::{FontFace, scan_font_dir};
pub use layout::{BrushRgba8, TextLayoutEngine};
pub use model::{Canvas, ColorScheme, NamedColor, WordEntry, artifact_stem, load_word_list};
pub use pipeline::{
    NodeOutput, PipelineBackend, SampleParams, Txt2ImgConfig, Txt2ImgRun, run_txt2img,
};
pub use prompt::{OllamaClient, OllamaConfig, PromptSource};
