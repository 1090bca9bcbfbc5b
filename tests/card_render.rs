use glyphcard::{Canvas, CardRenderer, ColorScheme, WordEntry, model};
use glyphcard::fonts::FontFace;

fn fixture_font() -> (FontFace, Vec<u8>) {
    let face = FontFace::from_path("tests/data/fonts/DejaVuSans.ttf".into()).unwrap();
    let bytes = face.load_bytes().unwrap();
    (face, bytes)
}

fn text_pixels(data: &[u8], background: [u8; 4]) -> usize {
    data.chunks_exact(4).filter(|px| *px != background).count()
}

#[test]
fn card_has_canvas_size_and_both_scheme_colors() {
    let (face, bytes) = fixture_font();
    let canvas = Canvas::default();
    let mut renderer = CardRenderer::new(canvas);
    let word = WordEntry {
        index: 1,
        text: "Привет".to_string(),
    };
    let scheme = ColorScheme::builtin()[0]; // white on black

    let card = renderer.render(&word, &face, &bytes, scheme, 0.0).unwrap();
    assert_eq!(card.width, canvas.width);
    assert_eq!(card.height, canvas.height);
    assert_eq!(
        card.data.len(),
        canvas.width as usize * canvas.height as usize * 4
    );

    // Background dominates, but glyph coverage must exist.
    let covered = text_pixels(&card.data, model::BLACK.rgba);
    assert!(covered > 0, "no glyph pixels rendered");
    assert!(covered < card.data.len() / 4 / 2, "text flooded the canvas");
    // Full-coverage interior pixels hit the exact foreground color.
    assert!(
        card.data.chunks_exact(4).any(|px| px == model::WHITE.rgba),
        "no fully covered foreground pixel"
    );
}

#[test]
fn even_index_renders_strictly_bolder_than_odd() {
    let (face, bytes) = fixture_font();
    let mut renderer = CardRenderer::new(Canvas::default());
    let scheme = ColorScheme::builtin()[0];

    let plain = WordEntry {
        index: 1,
        text: "Мир".to_string(),
    };
    let bold = WordEntry {
        index: 2,
        text: "Мир".to_string(),
    };

    let plain_card = renderer.render(&plain, &face, &bytes, scheme, 0.0).unwrap();
    let bold_card = renderer.render(&bold, &face, &bytes, scheme, 0.0).unwrap();

    let plain_cov = text_pixels(&plain_card.data, model::BLACK.rgba);
    let bold_cov = text_pixels(&bold_card.data, model::BLACK.rgba);
    assert!(
        bold_cov > plain_cov,
        "stroked render must cover more pixels: bold {bold_cov} <= plain {plain_cov}"
    );
}

#[test]
fn rotation_keeps_the_canvas_size_and_moves_pixels() {
    let (face, bytes) = fixture_font();
    let mut renderer = CardRenderer::new(Canvas::default());
    let scheme = ColorScheme::builtin()[1]; // black on white
    let word = WordEntry {
        index: 1,
        text: "Привет".to_string(),
    };

    let upright = renderer.render(&word, &face, &bytes, scheme, 0.0).unwrap();
    let tilted = renderer.render(&word, &face, &bytes, scheme, 15.0).unwrap();

    // Expansion happens on the text layer; the card itself stays fixed-size.
    assert_eq!(tilted.width, upright.width);
    assert_eq!(tilted.height, upright.height);
    assert_ne!(tilted.data, upright.data);
    assert!(text_pixels(&tilted.data, model::WHITE.rgba) > 0);
}

#[test]
fn multi_line_words_render_both_lines() {
    let (face, bytes) = fixture_font();
    let mut renderer = CardRenderer::new(Canvas::default());
    let scheme = ColorScheme::builtin()[0];

    let one = WordEntry {
        index: 1,
        text: "Мир".to_string(),
    };
    let two = WordEntry {
        index: 1,
        text: "Мир:Мир".to_string(),
    };

    let one_card = renderer.render(&one, &face, &bytes, scheme, 0.0).unwrap();
    let two_card = renderer.render(&two, &face, &bytes, scheme, 0.0).unwrap();

    let one_cov = text_pixels(&one_card.data, model::BLACK.rgba);
    let two_cov = text_pixels(&two_card.data, model::BLACK.rgba);
    assert!(
        two_cov > one_cov + one_cov / 2,
        "two stacked lines should roughly double coverage: {two_cov} vs {one_cov}"
    );
}
