//! Per-page identification footer.
//!
//! Fixed layout below the bottom margin: a horizontal rule, the class/student
//! identity on the left, the page number on the right. Courier-Bold at 9 pt —
//! a bold monospace face stays legible at this size on printed copies.

use crate::fonts::Font;
use crate::model::{MarginSettings, PAGE_HEIGHT_MM};

use super::surface::Surface;

/// Report pages are a fixed physical size; the footer assumes this content
/// width rather than deriving it from the right margin.
pub(crate) const FOOTER_CONTENT_WIDTH_MM: f32 = 170.0;

pub(crate) const FOOTER_FONT_SIZE: f32 = 9.0;

const RULE_OFFSET_MM: f32 = 8.0;
const BASELINE_OFFSET_MM: f32 = 14.0;
const RULE_WIDTH_MM: f32 = 0.2;

/// Identity of the page being closed. Built once per page during pagination
/// and consumed immediately.
pub(crate) struct FooterContext<'a> {
    pub(crate) nm_kelas: &'a str,
    pub(crate) nm_siswa: &'a str,
    pub(crate) nis: &'a str,
    pub(crate) page_number: u32,
}

pub(crate) fn draw_footer(surface: &mut Surface, ctx: &FooterContext, margins: &MarginSettings) {
    let left = margins.left;
    let right = left + FOOTER_CONTENT_WIDTH_MM;
    let rule_y = PAGE_HEIGHT_MM - margins.bottom + RULE_OFFSET_MM;
    let baseline_y = PAGE_HEIGHT_MM - margins.bottom + BASELINE_OFFSET_MM;

    surface.set_line_width(RULE_WIDTH_MM);
    surface.line(left, rule_y, right, rule_y);

    surface.set_font(Font::CourierBold, FOOTER_FONT_SIZE);
    surface.set_fill_color(0, 0, 0);

    let identity = format!(
        "{} | {} | {}",
        ctx.nm_kelas.to_uppercase(),
        ctx.nm_siswa.to_uppercase(),
        ctx.nis,
    );
    surface.text(left, baseline_y, &identity);

    let page_label = format!("Halaman : {}", ctx.page_number);
    let label_w = Font::CourierBold.text_width_mm(&page_label, FOOTER_FONT_SIZE);
    surface.text(right - label_w, baseline_y, &page_label);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fonts::MM_TO_PT;

    fn ctx() -> FooterContext<'static> {
        FooterContext {
            nm_kelas: "ix a",
            nm_siswa: "Budi Santoso",
            nis: "20240101",
            page_number: 3,
        }
    }

    /// Pull (x, y) operands of `m`/`l` operators out of a content stream.
    fn line_points(ops: &str) -> Vec<(f32, f32)> {
        let tokens: Vec<&str> = ops.split_whitespace().collect();
        let mut points = Vec::new();
        for (i, tok) in tokens.iter().enumerate() {
            if (*tok == "m" || *tok == "l") && i >= 2 {
                let x: f32 = tokens[i - 2].parse().unwrap();
                let y: f32 = tokens[i - 1].parse().unwrap();
                points.push((x, y));
            }
        }
        points
    }

    #[test]
    fn rule_sits_eight_mm_below_bottom_margin() {
        for bottom in [10.0f32, 20.0, 35.5] {
            let margins = MarginSettings {
                bottom,
                ..MarginSettings::default()
            };
            let mut surface = Surface::new();
            draw_footer(&mut surface, &ctx(), &margins);
            let ops = String::from_utf8(surface.reset()).unwrap();

            let expected_y_mm = PAGE_HEIGHT_MM - bottom + 8.0;
            let expected_y_pt = (PAGE_HEIGHT_MM - expected_y_mm) * MM_TO_PT;
            let points = line_points(&ops);
            assert_eq!(points.len(), 2);
            for (_, y) in &points {
                assert!((y - expected_y_pt).abs() < 0.01, "rule y off: {y}");
            }
            // Rule spans margin_left .. margin_left + 170.
            assert!((points[0].0 - margins.left * MM_TO_PT).abs() < 0.01);
            assert!((points[1].0 - (margins.left + 170.0) * MM_TO_PT).abs() < 0.01);
        }
    }

    #[test]
    fn identity_is_uppercased_with_raw_nis() {
        let mut surface = Surface::new();
        draw_footer(&mut surface, &ctx(), &MarginSettings::default());
        let ops = String::from_utf8(surface.reset()).unwrap();
        assert!(ops.contains("(IX A | BUDI SANTOSO | 20240101)"));
    }

    #[test]
    fn page_label_is_independent_of_identity() {
        let mut surface = Surface::new();
        draw_footer(&mut surface, &ctx(), &MarginSettings::default());
        let ops = String::from_utf8(surface.reset()).unwrap();
        assert!(ops.contains("(Halaman : 3)"));
    }
}
