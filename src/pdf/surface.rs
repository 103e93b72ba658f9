//! Per-page drawing surface.
//!
//! Layout code works in millimetres measured from the top-left corner of the
//! page (the unit the margin settings use); the surface converts to PDF user
//! space (points, origin bottom-left) when emitting operators.
//!
//! The surface also deduplicates drawing-state mutations. Setting the same
//! line width, fill color or font twice in a row is a no-op on the second
//! call — at bulk scale the redundant operators are a measurable share of the
//! content stream. The remembered state is strictly per surface: a fresh or
//! reset surface starts with nothing remembered, so state from one page or
//! one student can never suppress a logically distinct draw on the next.

use pdf_writer::{Content, Name, Str};

use crate::fonts::{Font, MM_TO_PT, to_winansi_bytes};
use crate::model::PAGE_HEIGHT_MM;

pub(crate) struct Surface {
    content: Content,
    line_width: Option<f32>,
    fill_color: Option<[u8; 3]>,
    font: Option<(Font, f32)>,
}

impl Surface {
    pub(crate) fn new() -> Self {
        Self {
            content: Content::new(),
            line_width: None,
            fill_color: None,
            font: None,
        }
    }

    fn x_pt(x_mm: f32) -> f32 {
        x_mm * MM_TO_PT
    }

    fn y_pt(y_mm: f32) -> f32 {
        (PAGE_HEIGHT_MM - y_mm) * MM_TO_PT
    }

    /// Set the stroke line width (mm) unless it is already the current one.
    pub(crate) fn set_line_width(&mut self, width_mm: f32) {
        if self.line_width != Some(width_mm) {
            self.content.set_line_width(width_mm * MM_TO_PT);
            self.line_width = Some(width_mm);
        }
    }

    /// Set the fill color unless it is already the current one.
    pub(crate) fn set_fill_color(&mut self, r: u8, g: u8, b: u8) {
        if self.fill_color != Some([r, g, b]) {
            self.content
                .set_fill_rgb(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0);
            self.fill_color = Some([r, g, b]);
        }
    }

    /// Set font and size unless they are already current. A family change
    /// re-emits even at the same size: the Tf operator sets both.
    pub(crate) fn set_font(&mut self, font: Font, size: f32) {
        if self.font != Some((font, size)) {
            self.content
                .set_font(Name(font.resource_name().as_bytes()), size);
            self.font = Some((font, size));
        }
    }

    /// Seed the remembered fill color without emitting an operator. For when
    /// the caller knows the device is already in that state.
    pub(crate) fn prime_fill_color(&mut self, r: u8, g: u8, b: u8) {
        self.fill_color = Some([r, g, b]);
    }

    /// Seed the remembered line width (mm) without emitting an operator.
    pub(crate) fn prime_line_width(&mut self, width_mm: f32) {
        self.line_width = Some(width_mm);
    }

    /// Forget all remembered state. Required whenever the underlying device
    /// state may no longer match (surface reuse, external reset).
    pub(crate) fn clear_state_cache(&mut self) {
        self.line_width = None;
        self.fill_color = None;
        self.font = None;
    }

    /// Straight line between two points (mm, from top-left).
    pub(crate) fn line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32) {
        self.content.move_to(Self::x_pt(x1), Self::y_pt(y1));
        self.content.line_to(Self::x_pt(x2), Self::y_pt(y2));
        self.content.stroke();
    }

    /// Outlined rectangle; (x, y) is the top-left corner, in mm.
    pub(crate) fn stroke_rect(&mut self, x: f32, y: f32, w: f32, h: f32) {
        self.content.rect(
            Self::x_pt(x),
            Self::y_pt(y + h),
            w * MM_TO_PT,
            h * MM_TO_PT,
        );
        self.content.stroke();
    }

    /// Filled rectangle; (x, y) is the top-left corner, in mm.
    pub(crate) fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32) {
        self.content.rect(
            Self::x_pt(x),
            Self::y_pt(y + h),
            w * MM_TO_PT,
            h * MM_TO_PT,
        );
        self.content.fill_nonzero();
    }

    /// Show `text` with its baseline at (x, y) mm using the current font.
    pub(crate) fn text(&mut self, x: f32, y: f32, text: &str) {
        let bytes = to_winansi_bytes(text);
        if bytes.is_empty() {
            return;
        }
        self.content.begin_text();
        self.content.next_line(Self::x_pt(x), Self::y_pt(y));
        self.content.show(Str(&bytes));
        self.content.end_text();
    }

    /// Close out the page: hand back the raw content stream and leave the
    /// surface ready for the next page with cleared state.
    pub(crate) fn reset(&mut self) -> Vec<u8> {
        let content = std::mem::replace(&mut self.content, Content::new());
        self.clear_state_cache();
        content.finish().to_vec()
    }
}
