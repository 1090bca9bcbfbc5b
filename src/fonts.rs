use std::path::{Path, PathBuf};

use crate::error::{GlyphcardError, GlyphcardResult};

/// Faces known to render too wide at the default size.
const NARROW_FACES: [&str; 3] = ["BadScript", "IBM", "Pinnacle"];

const DEFAULT_SIZE_PX: f32 = 55.0;
const NARROW_SIZE_PX: f32 = 30.0;

/// One font file discovered in the fonts directory.
#[derive(Clone, Debug, PartialEq)]
pub struct FontFace {
    /// File stem, used in output names and captions.
    pub name: String,
    pub path: PathBuf,
    pub size_px: f32,
}

impl FontFace {
    pub fn from_path(path: PathBuf) -> GlyphcardResult<Self> {
        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| {
                GlyphcardError::config(format!("font path '{}' has no stem", path.display()))
            })?
            .to_string();
        let file_name = path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or_default();
        let size_px = if NARROW_FACES.iter().any(|n| file_name.contains(n)) {
            NARROW_SIZE_PX
        } else {
            DEFAULT_SIZE_PX
        };
        Ok(Self {
            name,
            path,
            size_px,
        })
    }

    pub fn load_bytes(&self) -> GlyphcardResult<Vec<u8>> {
        std::fs::read(&self.path).map_err(|e| {
            GlyphcardError::config(format!("read font '{}': {e}", self.path.display()))
        })
    }
}

/// Enumerates `.ttf`/`.otf` files in `dir`, sorted by file name for a stable
/// output order. An empty result is a fatal configuration error.
pub fn scan_font_dir(dir: &Path) -> GlyphcardResult<Vec<FontFace>> {
    let entries = std::fs::read_dir(dir)
        .map_err(|e| GlyphcardError::config(format!("read fonts dir '{}': {e}", dir.display())))?;

    let mut faces = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| {
            GlyphcardError::config(format!("read fonts dir '{}': {e}", dir.display()))
        })?;
        let path = entry.path();
        let is_font = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("ttf") || e.eq_ignore_ascii_case("otf"));
        if is_font {
            faces.push(FontFace::from_path(path)?);
        }
    }
    faces.sort_by(|a, b| a.name.cmp(&b.name));

    if faces.is_empty() {
        return Err(GlyphcardError::config(format!(
            "no .ttf/.otf files found in '{}'",
            dir.display()
        )));
    }
    Ok(faces)
}
