use crate::{
    error::{GlyphcardError, GlyphcardResult},
    model::Canvas,
};

/// Vertical gap between stacked display lines, in pixels.
pub const LINE_GAP_PX: f32 = 20.0;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// RGBA8 brush color used by Parley text layout.
pub struct BrushRgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

/// A shaped display line plus its top-left placement on the canvas.
pub struct PositionedLine {
    pub layout: parley::Layout<BrushRgba8>,
    pub x: f64,
    pub y: f64,
}

/// Stateful helper for building Parley text layouts from raw font bytes.
pub struct TextLayoutEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<BrushRgba8>,
}

impl Default for TextLayoutEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TextLayoutEngine {
    /// Construct a new layout engine with fresh Parley contexts.
    pub fn new() -> Self {
        Self {
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
        }
    }

    /// Shape and lay out plain text using provided font bytes and styling.
    pub fn layout_plain(
        &mut self,
        text: &str,
        font_bytes: &[u8],
        size_px: f32,
        brush: BrushRgba8,
    ) -> GlyphcardResult<parley::Layout<BrushRgba8>> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(GlyphcardError::layout("text size_px must be finite and > 0"));
        }

        let families = self
            .font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(font_bytes.to_vec()), None);
        let family_id = families
            .first()
            .map(|(id, _)| *id)
            .ok_or_else(|| GlyphcardError::layout("no font families registered from font bytes"))?;

        let family_name = self
            .font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| GlyphcardError::layout("registered font family has no name"))?
            .to_string();

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(family_name)),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        builder.push_default(parley::style::StyleProperty::Brush(brush));

        let mut layout: parley::Layout<BrushRgba8> = builder.build(text);
        layout.break_all_lines(None);
        Ok(layout)
    }

    /// Shapes each display line independently, centers each horizontally, and
    /// stacks them with [`LINE_GAP_PX`] spacing so the whole stack is
    /// vertically centered on the canvas.
    pub fn stack_lines(
        &mut self,
        lines: &[&str],
        font_bytes: &[u8],
        size_px: f32,
        brush: BrushRgba8,
        canvas: Canvas,
    ) -> GlyphcardResult<Vec<PositionedLine>> {
        let mut layouts = Vec::with_capacity(lines.len());
        for line in lines {
            layouts.push(self.layout_plain(line, font_bytes, size_px, brush)?);
        }

        let total_height: f32 = layouts.iter().map(|l| l.height()).sum::<f32>()
            + LINE_GAP_PX * layouts.len().saturating_sub(1) as f32;
        let mut y = (canvas.height as f32 - total_height) / 2.0;

        let mut positioned = Vec::with_capacity(layouts.len());
        for layout in layouts {
            let x = (canvas.width as f32 - layout.width()) / 2.0;
            let height = layout.height();
            positioned.push(PositionedLine {
                layout,
                x: f64::from(x),
                y: f64::from(y),
            });
            y += height + LINE_GAP_PX;
        }
        Ok(positioned)
    }
}
