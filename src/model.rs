use std::path::Path;

use crate::error::{GlyphcardError, GlyphcardResult};

/// A color together with the lowercase name used in filenames and captions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NamedColor {
    pub name: &'static str,
    pub rgba: [u8; 4],
}

pub const WHITE: NamedColor = NamedColor {
    name: "white",
    rgba: [255, 255, 255, 255],
};
pub const BLACK: NamedColor = NamedColor {
    name: "black",
    rgba: [0, 0, 0, 255],
};
pub const RED: NamedColor = NamedColor {
    name: "red",
    rgba: [255, 0, 0, 255],
};
pub const GREY: NamedColor = NamedColor {
    name: "grey",
    rgba: [128, 128, 128, 255],
};

/// Foreground/background pairing for one card variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ColorScheme {
    pub foreground: NamedColor,
    pub background: NamedColor,
}

impl ColorScheme {
    /// The closed set of schemes every word is rendered in, in output order.
    pub fn builtin() -> [ColorScheme; 3] {
        [
            ColorScheme {
                foreground: WHITE,
                background: BLACK,
            },
            ColorScheme {
                foreground: BLACK,
                background: WHITE,
            },
            ColorScheme {
                foreground: RED,
                background: GREY,
            },
        ]
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
}

impl Default for Canvas {
    fn default() -> Self {
        Self {
            width: 360,
            height: 640,
        }
    }
}

/// One line of the word list. `index` is 1-based and drives both the output
/// file stem and the alternating bold style.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WordEntry {
    pub index: usize,
    pub text: String,
}

impl WordEntry {
    /// Display lines, split on the in-line `:` delimiter.
    pub fn display_lines(&self) -> Vec<&str> {
        self.text.split(':').collect()
    }

    /// Even 1-based indices get the stroked (bold) rendering.
    pub fn bold(&self) -> bool {
        self.index % 2 == 0
    }
}

/// Reads the word list: UTF-8, one word or phrase per line, trimmed.
pub fn load_word_list(path: &Path) -> GlyphcardResult<Vec<WordEntry>> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| GlyphcardError::config(format!("read word list '{}': {e}", path.display())))?;
    Ok(text
        .lines()
        .enumerate()
        .map(|(i, line)| WordEntry {
            index: i + 1,
            text: line.trim().to_string(),
        })
        .collect())
}

/// Deterministic output stem for one (word, font, scheme) combination.
pub fn artifact_stem(prefix: &str, index: usize, font_name: &str, foreground: NamedColor) -> String {
    format!("{prefix}_{index}_{font_name}_{}", foreground.name)
}
