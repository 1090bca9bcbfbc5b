use std::sync::Arc;

use crate::{
    error::{GlyphcardError, GlyphcardResult},
    layout::PositionedLine,
    model::Canvas,
};

/// Ring radius, in pixels, of the emulated stroke used for bold rendering.
pub const BOLD_STROKE_PX: f64 = 2.0;

fn affine_to_cpu(a: kurbo::Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn canvas_u16(canvas: Canvas) -> GlyphcardResult<(u16, u16)> {
    let w: u16 = canvas
        .width
        .try_into()
        .map_err(|_| GlyphcardError::render("canvas width exceeds u16"))?;
    let h: u16 = canvas
        .height
        .try_into()
        .map_err(|_| GlyphcardError::render("canvas height exceeds u16"))?;
    Ok((w, h))
}

/// Renders the positioned lines as a white-on-transparent coverage mask at
/// canvas size. When `bold` is set, each glyph run is refilled along a ring of
/// [`BOLD_STROKE_PX`] radius before the centered fill, emulating a stroked
/// outline.
pub fn render_mask(
    canvas: Canvas,
    lines: &[PositionedLine],
    font_bytes: &[u8],
    bold: bool,
) -> GlyphcardResult<vello_cpu::Pixmap> {
    let (w, h) = canvas_u16(canvas)?;
    let font =
        vello_cpu::peniko::FontData::new(vello_cpu::peniko::Blob::from(font_bytes.to_vec()), 0);

    let mut offsets: Vec<(f64, f64)> = Vec::new();
    if bold {
        for k in 0..8 {
            let angle = f64::from(k) * std::f64::consts::FRAC_PI_4;
            offsets.push((BOLD_STROKE_PX * angle.cos(), BOLD_STROKE_PX * angle.sin()));
        }
    }
    offsets.push((0.0, 0.0));

    let mut ctx = vello_cpu::RenderContext::new(w, h);
    for line in lines {
        for (dx, dy) in &offsets {
            ctx.set_transform(affine_to_cpu(kurbo::Affine::translate((
                line.x + dx,
                line.y + dy,
            ))));
            draw_layout(&mut ctx, &line.layout, &font);
        }
    }
    ctx.flush();

    let mut pixmap = vello_cpu::Pixmap::new(w, h);
    ctx.render_to_pixmap(&mut pixmap);
    Ok(pixmap)
}

fn draw_layout(
    ctx: &mut vello_cpu::RenderContext,
    layout: &parley::Layout<crate::layout::BrushRgba8>,
    font: &vello_cpu::peniko::FontData,
) {
    for line in layout.lines() {
        for item in line.items() {
            let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                continue;
            };

            let brush = run.style().brush;
            ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                brush.r, brush.g, brush.b, brush.a,
            ));

            let glyphs = run.glyphs().map(|g| vello_cpu::Glyph {
                id: g.id,
                x: g.x,
                y: g.y,
            });
            ctx.glyph_run(font)
                .font_size(run.run().font_size())
                .fill_glyphs(glyphs);
        }
    }
}

/// Output size of a canvas rotated by `degrees`, expanded so no corner clips.
pub fn rotated_dims(canvas: Canvas, degrees: f64) -> (u32, u32) {
    let rad = degrees.to_radians();
    let (sin, cos) = (rad.sin().abs(), rad.cos().abs());
    let w = f64::from(canvas.width);
    let h = f64::from(canvas.height);
    (
        (w * cos + h * sin).ceil() as u32,
        (w * sin + h * cos).ceil() as u32,
    )
}

/// Rotates the mask by `degrees` about its center with smooth resampling,
/// producing an expanded pixmap sized by [`rotated_dims`].
pub fn rotate_expand(
    mask: vello_cpu::Pixmap,
    canvas: Canvas,
    degrees: f64,
) -> GlyphcardResult<vello_cpu::Pixmap> {
    let (out_w, out_h) = rotated_dims(canvas, degrees);
    let (w16, h16) = canvas_u16(Canvas {
        width: out_w,
        height: out_h,
    })?;

    let in_cx = f64::from(canvas.width) / 2.0;
    let in_cy = f64::from(canvas.height) / 2.0;
    let transform = kurbo::Affine::translate((f64::from(out_w) / 2.0, f64::from(out_h) / 2.0))
        * kurbo::Affine::rotate(degrees.to_radians())
        * kurbo::Affine::translate((-in_cx, -in_cy));

    let sampler = vello_cpu::peniko::ImageSampler {
        quality: vello_cpu::peniko::ImageQuality::High,
        ..Default::default()
    };
    let paint = vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(Arc::new(mask)),
        sampler,
    };

    let mut ctx = vello_cpu::RenderContext::new(w16, h16);
    ctx.set_transform(affine_to_cpu(transform));
    ctx.set_paint(paint);
    ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
        0.0,
        0.0,
        f64::from(canvas.width),
        f64::from(canvas.height),
    ));
    ctx.flush();

    let mut pixmap = vello_cpu::Pixmap::new(w16, h16);
    ctx.render_to_pixmap(&mut pixmap);
    Ok(pixmap)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rotation_by_zero_keeps_dims() {
        let canvas = Canvas::default();
        assert_eq!(rotated_dims(canvas, 0.0), (360, 640));
    }

    #[test]
    fn rotation_by_90_swaps_dims() {
        let canvas = Canvas::default();
        assert_eq!(rotated_dims(canvas, 90.0), (640, 360));
    }

    #[test]
    fn expansion_is_bounded_by_the_15_degree_envelope() {
        let canvas = Canvas::default();
        let (max_w, max_h) = rotated_dims(canvas, 15.0);
        for deg in [-15.0, -7.3, -0.5, 0.0, 3.9, 15.0] {
            let (w, h) = rotated_dims(canvas, deg);
            assert!(w >= canvas.width && w <= max_w, "width at {deg}: {w}");
            assert!(h >= canvas.height && h <= max_h, "height at {deg}: {h}");
        }
    }

    #[test]
    fn oversized_canvas_is_a_render_error() {
        let canvas = Canvas {
            width: 70_000,
            height: 10,
        };
        let err = render_mask(canvas, &[], &[], false).unwrap_err();
        assert!(err.to_string().contains("render error:"));
    }
}
