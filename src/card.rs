use crate::{
    composite,
    error::GlyphcardResult,
    fonts::FontFace,
    layout::{BrushRgba8, TextLayoutEngine},
    model::{Canvas, ColorScheme, WordEntry},
    raster,
};

/// Finished card pixels: straight (non-premultiplied) opaque RGBA8.
#[derive(Clone, Debug)]
pub struct CardRgba {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

/// Renders one word card at a time, reusing the Parley contexts across calls.
pub struct CardRenderer {
    engine: TextLayoutEngine,
    canvas: Canvas,
}

impl CardRenderer {
    pub fn new(canvas: Canvas) -> Self {
        Self {
            engine: TextLayoutEngine::new(),
            canvas,
        }
    }

    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// Renders `word` in `font` under `scheme`, rotated by `angle_deg`.
    ///
    /// The rotated text layer is expanded so corners never clip, then
    /// composited centered over the background-filled canvas with any
    /// overhang cropped away.
    pub fn render(
        &mut self,
        word: &WordEntry,
        font: &FontFace,
        font_bytes: &[u8],
        scheme: ColorScheme,
        angle_deg: f64,
    ) -> GlyphcardResult<CardRgba> {
        let mask_brush = BrushRgba8 {
            r: 255,
            g: 255,
            b: 255,
            a: 255,
        };
        let lines = word.display_lines();
        let positioned =
            self.engine
                .stack_lines(&lines, font_bytes, font.size_px, mask_brush, self.canvas)?;

        let mask = raster::render_mask(self.canvas, &positioned, font_bytes, word.bold())?;
        let rotated = raster::rotate_expand(mask, self.canvas, angle_deg)?;

        let (mask_w, mask_h) = (u32::from(rotated.width()), u32::from(rotated.height()));
        let offset_x = (i64::from(self.canvas.width) - i64::from(mask_w)) / 2;
        let offset_y = (i64::from(self.canvas.height) - i64::from(mask_h)) / 2;

        let mut data = vec![0u8; self.canvas.width as usize * self.canvas.height as usize * 4];
        composite::fill(&mut data, scheme.background.rgba);
        composite::paste_colorized(
            &mut data,
            self.canvas.width,
            self.canvas.height,
            rotated.data_as_u8_slice(),
            mask_w,
            mask_h,
            scheme.foreground.rgba,
            scheme.background.rgba,
            offset_x,
            offset_y,
        )?;

        Ok(CardRgba {
            width: self.canvas.width,
            height: self.canvas.height,
            data,
        })
    }
}
