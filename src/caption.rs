use crate::model::{ColorScheme, NamedColor};

/// Platform line separator used when captions expand the `:` delimiter.
pub const LINE_SEPARATOR: &str = if cfg!(windows) { "\r\n" } else { "\n" };

/// How the word is written into the caption file.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CaptionStyle {
    /// Keep the word as-is (apart from the `:` delimiter expansion).
    #[default]
    Verbatim,
    /// Additionally map uppercase Cyrillic letters to Latin look-alikes.
    Transliterate,
}

/// Fixed replacement table for [`CaptionStyle::Transliterate`].
pub const TRANSLIT_TABLE: [(char, &str); 33] = [
    ('А', "A"),
    ('Б', "ß"),
    ('В', "B"),
    ('Г', "Î"),
    ('Д', "ă"),
    ('Е', "E"),
    ('Ё', "É"),
    ('Ж', "ş"),
    ('З', "3"),
    ('И', "ù"),
    ('Й', "ü"),
    ('К', "K"),
    ('Л', "â"),
    ('М', "M"),
    ('Н', "H"),
    ('О', "O"),
    ('П', "á"),
    ('Р', "P"),
    ('С', "C"),
    ('Т', "T"),
    ('У', "Y"),
    ('Ф', "ö"),
    ('Х', "X"),
    ('Ц', "Ü"),
    ('Ч', "4"),
    ('Ш', "##"),
    ('Щ', "!!!"),
    ('Ъ', "ț"),
    ('Ы', "ä"),
    ('Ь', "ţ"),
    ('Э', "ó"),
    ('Ю', "ô"),
    ('Я', "®"),
];

/// Applies the fixed Cyrillic-to-Latin look-alike table. Characters outside
/// the table pass through untouched.
pub fn transliterate(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match TRANSLIT_TABLE.iter().find(|(from, _)| *from == c) {
            Some((_, to)) => out.push_str(to),
            None => out.push(c),
        }
    }
    out
}

/// Renders the word for the caption: the `:` delimiter becomes the platform
/// line separator in both styles; transliteration applies on top.
pub fn caption_word(word: &str, style: CaptionStyle) -> String {
    let word = match style {
        CaptionStyle::Verbatim => word.to_string(),
        CaptionStyle::Transliterate => transliterate(word),
    };
    word.replace(':', LINE_SEPARATOR)
}

/// The caption file contents for one rendered card.
pub fn caption(word: &str, scheme: ColorScheme, font_name: &str, style: CaptionStyle) -> String {
    let NamedColor {
        name: fg_name, ..
    } = scheme.foreground;
    let NamedColor {
        name: bg_name, ..
    } = scheme.background;
    format!(
        "{fg_name} text \"{}\" on {bg_name} background font {font_name}",
        caption_word(word, style)
    )
}
