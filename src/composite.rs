use crate::error::{GlyphcardError, GlyphcardResult};

pub type Rgba8 = [u8; 4];

/// Fills an RGBA8 buffer with a single color.
pub fn fill(dst: &mut [u8], rgba: Rgba8) {
    for px in dst.chunks_exact_mut(4) {
        px.copy_from_slice(&rgba);
    }
}

/// Maps one coverage value onto the scheme: 0 stays background, 255 becomes
/// foreground, partial coverage interpolates. Output is opaque.
pub fn colorize(coverage: u8, foreground: Rgba8, background: Rgba8) -> Rgba8 {
    let cov = u16::from(coverage);
    let inv = 255u16 - cov;
    let mut out = [0u8; 4];
    for i in 0..3 {
        out[i] = add_sat_u8(
            mul_div255(u16::from(foreground[i]), cov),
            mul_div255(u16::from(background[i]), inv),
        );
    }
    out[3] = 255;
    out
}

/// Composites a coverage mask onto a background-filled canvas, colorizing it
/// with the scheme and placing the mask's top-left corner at
/// `(offset_x, offset_y)`. Mask regions outside the canvas are clipped.
pub fn paste_colorized(
    dst: &mut [u8],
    dst_width: u32,
    dst_height: u32,
    mask: &[u8],
    mask_width: u32,
    mask_height: u32,
    foreground: Rgba8,
    background: Rgba8,
    offset_x: i64,
    offset_y: i64,
) -> GlyphcardResult<()> {
    if dst.len() != dst_width as usize * dst_height as usize * 4 {
        return Err(GlyphcardError::render(
            "paste_colorized canvas byte length mismatch",
        ));
    }
    if mask.len() != mask_width as usize * mask_height as usize * 4 {
        return Err(GlyphcardError::render(
            "paste_colorized mask byte length mismatch",
        ));
    }

    for my in 0..i64::from(mask_height) {
        let dy = my + offset_y;
        if dy < 0 || dy >= i64::from(dst_height) {
            continue;
        }
        for mx in 0..i64::from(mask_width) {
            let dx = mx + offset_x;
            if dx < 0 || dx >= i64::from(dst_width) {
                continue;
            }
            // The mask is premultiplied white on transparent, so the alpha
            // channel is the coverage.
            let m = (my as usize * mask_width as usize + mx as usize) * 4;
            let coverage = mask[m + 3];
            let d = (dy as usize * dst_width as usize + dx as usize) * 4;
            let out = colorize(coverage, foreground, background);
            dst[d..d + 4].copy_from_slice(&out);
        }
    }
    Ok(())
}

fn mul_div255(x: u16, y: u16) -> u8 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u8
}

fn add_sat_u8(a: u8, b: u8) -> u8 {
    a.saturating_add(b)
}

#[cfg(test)]
mod tests {
    use super::*;

    const FG: Rgba8 = [255, 0, 0, 255];
    const BG: Rgba8 = [128, 128, 128, 255];

    #[test]
    fn colorize_endpoints_hit_the_scheme_colors() {
        assert_eq!(colorize(0, FG, BG), BG);
        assert_eq!(colorize(255, FG, BG), FG);
    }

    #[test]
    fn colorize_midpoint_interpolates() {
        let mid = colorize(128, FG, BG);
        assert!(mid[0] > BG[0] && mid[0] < FG[0]);
        assert_eq!(mid[3], 255);
    }

    #[test]
    fn paste_centers_and_clips() {
        // 2x2 canvas, 4x4 mask pasted at (-1, -1): only the mask's inner
        // region lands, and every canvas pixel is written.
        let mut dst = vec![0u8; 2 * 2 * 4];
        fill(&mut dst, BG);
        let mut mask = vec![0u8; 4 * 4 * 4];
        // Full coverage at mask (1,1) -> canvas (0,0).
        let m = (1 * 4 + 1) * 4;
        mask[m..m + 4].copy_from_slice(&[255, 255, 255, 255]);

        paste_colorized(&mut dst, 2, 2, &mask, 4, 4, FG, BG, -1, -1).unwrap();
        assert_eq!(&dst[0..4], &FG);
        assert_eq!(&dst[4..8], &BG);
    }

    #[test]
    fn length_mismatch_is_a_render_error() {
        let mut dst = vec![0u8; 3];
        let err = paste_colorized(&mut dst, 2, 2, &[], 0, 0, FG, BG, 0, 0).unwrap_err();
        assert!(err.to_string().contains("render error:"));
    }
}
