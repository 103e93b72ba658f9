//! Report page layout.
//!
//! One `ReportWriter` per student document. Layout is a single top-down pass
//! with a cursor in millimetres from the top of the page: header block, grade
//! table (grouped by subject category), attendance, extracurricular marks,
//! signature block. Whenever a block or table row would cross the bottom
//! margin the current page is closed (footer drawn, content stream finished)
//! and the cursor restarts at the top margin of a fresh page. Rows are never
//! split mid-row; groups may continue across the boundary.

use std::sync::Mutex;

use crate::cache::TextSplitCache;
use crate::fonts::{Font, PT_TO_MM};
use crate::model::{PAGE_HEIGHT_MM, PAGE_WIDTH_MM, ReportRecord, ReportSetup, Subject};

use super::footer::{FOOTER_CONTENT_WIDTH_MM, FooterContext, draw_footer};
use super::surface::Surface;

const TITLE_SIZE: f32 = 14.0;
const SECTION_SIZE: f32 = 11.0;
const BODY_SIZE: f32 = 10.0;
const SMALL_SIZE: f32 = 9.0;

const CELL_PAD_MM: f32 = 1.5;
const RULE_WIDTH_MM: f32 = 0.2;

/// PDF devices start each page with a 1 pt line width and black fill.
const DEVICE_LINE_WIDTH_MM: f32 = PT_TO_MM;

/// Qualitative extracurricular grade: 1..=4 to the SB/B/C/K ordinal scale.
/// Fixed business rule; anything else (including absence) renders blank.
pub fn ekskul_predicate(nilai: Option<u8>) -> &'static str {
    match nilai {
        Some(4) => "SB",
        Some(3) => "B",
        Some(2) => "C",
        Some(1) => "K",
        _ => "",
    }
}

/// Predicate letter for a subject row, derived from the knowledge score.
pub fn predicate_letter(score: f32) -> &'static str {
    if score >= 90.0 {
        "A"
    } else if score >= 80.0 {
        "B"
    } else if score >= 70.0 {
        "C"
    } else {
        "D"
    }
}

fn line_height_mm(size_pt: f32) -> f32 {
    size_pt * 1.4 * PT_TO_MM
}

fn ascent_mm(size_pt: f32) -> f32 {
    size_pt * 0.75 * PT_TO_MM
}

/// Whole scores print without a decimal point ("90", not "90.0").
fn format_score(v: f32) -> String {
    if (v - v.round()).abs() < 0.05 {
        format!("{}", v.round() as i64)
    } else {
        format!("{v:.1}")
    }
}

/// Greedy word wrap against the measured text width. A single word wider
/// than the wrap width stays whole on its own line — overflow is preferred
/// over failure.
fn wrap_text(text: &str, width_mm: f32, size: f32, font: Font) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{current} {word}")
        };
        if current.is_empty() || font.text_width_mm(&candidate, size) <= width_mm {
            if current.is_empty() && font.text_width_mm(word, size) > width_mm {
                log::warn!("word {word:?} wider than {width_mm:.1}mm cell, overflowing");
            }
            current = candidate;
        } else {
            lines.push(std::mem::take(&mut current));
            current = word.to_string();
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

/// Grade table column widths at the reference 170 mm content width;
/// scaled to the actual printable width at render time.
const GRADE_COLS_MM: [f32; 5] = [10.0, 75.0, 30.0, 30.0, 25.0];
const EKSKUL_COLS_MM: [f32; 3] = [10.0, 115.0, 45.0];

pub(crate) struct ReportWriter<'a> {
    setup: &'a ReportSetup,
    record: &'a ReportRecord,
    cache: &'a Mutex<TextSplitCache>,
    surface: Surface,
    pages: Vec<Vec<u8>>,
    page_number: u32,
    cursor_y: f32,
}

impl<'a> ReportWriter<'a> {
    pub(crate) fn new(
        setup: &'a ReportSetup,
        record: &'a ReportRecord,
        cache: &'a Mutex<TextSplitCache>,
    ) -> Self {
        let mut writer = Self {
            setup,
            record,
            cache,
            surface: Surface::new(),
            pages: Vec::new(),
            page_number: 1,
            cursor_y: setup.margins.top,
        };
        writer.begin_page();
        writer
    }

    /// Lay out the whole document. Consumes the writer: a finalized report
    /// accepts no further draws.
    pub(crate) fn render(mut self) -> Vec<Vec<u8>> {
        self.identity_header();
        self.grade_table();
        self.attendance_block();
        self.extracurricular_block();
        self.signature_block();
        self.close_page();
        log::debug!(
            "student {} laid out across {} page(s)",
            self.record.peserta_didik_id,
            self.pages.len(),
        );
        self.pages
    }

    fn begin_page(&mut self) {
        // The device is known to be in its default state on a fresh page;
        // seed the dedup cache instead of emitting the operators.
        self.surface.prime_fill_color(0, 0, 0);
        self.surface.prime_line_width(DEVICE_LINE_WIDTH_MM);
    }

    fn close_page(&mut self) {
        let ctx = FooterContext {
            nm_kelas: &self.record.nm_kelas,
            nm_siswa: &self.record.nm_siswa,
            nis: &self.record.nis,
            page_number: self.page_number,
        };
        draw_footer(&mut self.surface, &ctx, &self.setup.margins);
        self.pages.push(self.surface.reset());
    }

    fn page_break(&mut self) {
        self.close_page();
        self.page_number += 1;
        self.cursor_y = self.setup.margins.top;
        self.begin_page();
    }

    /// Break the page if `height` does not fit above the bottom margin.
    /// Returns true when a break happened.
    fn ensure_room(&mut self, height: f32) -> bool {
        if self.cursor_y + height > PAGE_HEIGHT_MM - self.setup.margins.bottom {
            self.page_break();
            true
        } else {
            false
        }
    }

    fn left(&self) -> f32 {
        self.setup.margins.left
    }

    fn content_width(&self) -> f32 {
        PAGE_WIDTH_MM - self.setup.margins.left - self.setup.margins.right
    }

    fn scale(&self) -> f32 {
        self.content_width() / FOOTER_CONTENT_WIDTH_MM
    }

    fn split_cached(&self, text: &str, width_mm: f32, size: f32, font: Font) -> Vec<String> {
        let mut cache = self.cache.lock().unwrap_or_else(|e| e.into_inner());
        cache.get_or_compute(text, width_mm, size, font, || {
            wrap_text(text, width_mm, size, font)
        })
    }

    fn text_centered(&mut self, cx: f32, y: f32, font: Font, size: f32, text: &str) {
        let w = font.text_width_mm(text, size);
        self.surface.set_font(font, size);
        self.surface.text(cx - w / 2.0, y, text);
    }

    fn text_at(&mut self, x: f32, y: f32, font: Font, size: f32, text: &str) {
        self.surface.set_font(font, size);
        self.surface.text(x, y, text);
    }

    fn semester_label(&self) -> String {
        // Period keys end in the semester ordinal, e.g. "20251" / "20252".
        match self.setup.school.semester.chars().last() {
            Some('1') => "1 (Ganjil)".to_string(),
            Some('2') => "2 (Genap)".to_string(),
            _ => self.setup.school.semester.clone(),
        }
    }

    // ----- blocks -------------------------------------------------------

    fn identity_header(&mut self) {
        let left = self.left();
        let cx = left + self.content_width() / 2.0;
        let top = self.setup.margins.top;
        let school = &self.setup.school;

        // Logo placeholder; upload handling lives outside the renderer.
        self.surface.set_line_width(RULE_WIDTH_MM);
        self.surface.stroke_rect(left, top, 20.0, 20.0);

        self.surface.set_fill_color(0, 0, 0);
        self.text_centered(cx, top + 6.0, Font::HelveticaBold, TITLE_SIZE, &school.nm_sekolah);
        if !school.npsn.is_empty() || !school.alamat.is_empty() {
            let detail = if school.npsn.is_empty() {
                school.alamat.clone()
            } else if school.alamat.is_empty() {
                format!("NPSN : {}", school.npsn)
            } else {
                format!("NPSN : {} - {}", school.npsn, school.alamat)
            };
            self.text_centered(cx, top + 11.5, Font::Helvetica, SMALL_SIZE, &detail);
        }
        self.text_centered(
            cx,
            top + 18.0,
            Font::HelveticaBold,
            12.0,
            "LAPORAN HASIL BELAJAR PESERTA DIDIK",
        );
        self.surface.line(left, top + 22.0, left + self.content_width(), top + 22.0);

        // Identity grid, two label/value columns.
        let record = self.record;
        let rows_left = [
            ("Nama Peserta Didik", record.nm_siswa.clone()),
            ("NIS", record.nis.clone()),
        ];
        let rows_right = [
            ("Kelas", record.nm_kelas.clone()),
            ("Semester", self.semester_label()),
        ];
        let mut y = top + 28.0;
        let value_x = left + 40.0;
        let right_x = left + self.content_width() / 2.0 + 10.0;
        let right_value_x = right_x + 30.0;
        for ((label_l, value_l), (label_r, value_r)) in rows_left.iter().zip(rows_right.iter()) {
            self.text_at(left, y, Font::Helvetica, BODY_SIZE, label_l);
            self.text_at(value_x, y, Font::Helvetica, BODY_SIZE, &format!(": {value_l}"));
            self.text_at(right_x, y, Font::Helvetica, BODY_SIZE, label_r);
            self.text_at(right_value_x, y, Font::Helvetica, BODY_SIZE, &format!(": {value_r}"));
            y += 5.5;
        }
        if !self.setup.school.tahun_ajaran.is_empty() {
            let tahun = self.setup.school.tahun_ajaran.clone();
            self.text_at(left, y, Font::Helvetica, BODY_SIZE, "Tahun Pelajaran");
            self.text_at(value_x, y, Font::Helvetica, BODY_SIZE, &format!(": {tahun}"));
            y += 5.5;
        }
        self.cursor_y = y + 3.0;
    }

    fn grade_col_edges(&self) -> [f32; 6] {
        let scale = self.scale();
        let mut edges = [0.0f32; 6];
        edges[0] = self.left();
        for (i, w) in GRADE_COLS_MM.iter().enumerate() {
            edges[i + 1] = edges[i] + w * scale;
        }
        edges
    }

    fn grade_header_row(&mut self) {
        let edges = self.grade_col_edges();
        let h = 8.0;
        self.ensure_room(h);
        let y = self.cursor_y;
        self.surface.set_fill_color(221, 221, 221);
        self.surface.fill_rect(edges[0], y, edges[5] - edges[0], h);
        self.surface.set_line_width(RULE_WIDTH_MM);
        self.surface.set_fill_color(0, 0, 0);
        let labels = ["No", "Mata Pelajaran", "Pengetahuan", "Keterampilan", "Predikat"];
        let baseline = y + h / 2.0 + ascent_mm(SMALL_SIZE) / 2.0;
        for (i, label) in labels.iter().enumerate() {
            self.surface.stroke_rect(edges[i], y, edges[i + 1] - edges[i], h);
            let cx = (edges[i] + edges[i + 1]) / 2.0;
            self.text_centered(cx, baseline, Font::HelveticaBold, SMALL_SIZE, label);
        }
        self.cursor_y += h;
    }

    fn category_row(&mut self, label: &str) {
        let edges = self.grade_col_edges();
        let h = 7.0;
        if self.ensure_room(h) {
            self.grade_header_row();
        }
        let y = self.cursor_y;
        let w = edges[5] - edges[0];
        self.surface.set_fill_color(238, 238, 238);
        self.surface.fill_rect(edges[0], y, w, h);
        self.surface.set_line_width(RULE_WIDTH_MM);
        self.surface.stroke_rect(edges[0], y, w, h);
        self.surface.set_fill_color(0, 0, 0);
        self.text_at(
            edges[0] + CELL_PAD_MM,
            y + h / 2.0 + ascent_mm(BODY_SIZE) / 2.0,
            Font::HelveticaBold,
            BODY_SIZE,
            label,
        );
        self.cursor_y += h;
    }

    fn grade_row(&mut self, no: usize, subject: &Subject) {
        let Some(grade) = self.record.grades.get(&subject.subject_id) else {
            return;
        };
        let pengetahuan = grade.pengetahuan();
        let keterampilan = grade.keterampilan();

        let edges = self.grade_col_edges();
        let name_width = (edges[2] - edges[1]) - 2.0 * CELL_PAD_MM;
        let lines = self.split_cached(
            &subject.nm_mata_pelajaran,
            name_width,
            BODY_SIZE,
            Font::Helvetica,
        );
        let line_h = line_height_mm(BODY_SIZE);
        let h = lines.len() as f32 * line_h + 2.0 * CELL_PAD_MM;
        if self.ensure_room(h) {
            self.grade_header_row();
        }
        let y = self.cursor_y;

        self.surface.set_line_width(RULE_WIDTH_MM);
        for i in 0..5 {
            self.surface.stroke_rect(edges[i], y, edges[i + 1] - edges[i], h);
        }

        self.surface.set_fill_color(0, 0, 0);
        let first_baseline = y + CELL_PAD_MM + ascent_mm(BODY_SIZE);
        self.text_centered(
            (edges[0] + edges[1]) / 2.0,
            first_baseline,
            Font::Helvetica,
            BODY_SIZE,
            &no.to_string(),
        );
        for (i, line) in lines.iter().enumerate() {
            self.text_at(
                edges[1] + CELL_PAD_MM,
                first_baseline + i as f32 * line_h,
                Font::Helvetica,
                BODY_SIZE,
                line,
            );
        }
        if let Some(p) = pengetahuan {
            self.text_centered(
                (edges[2] + edges[3]) / 2.0,
                first_baseline,
                Font::Helvetica,
                BODY_SIZE,
                &format_score(p),
            );
            self.text_centered(
                (edges[4] + edges[5]) / 2.0,
                first_baseline,
                Font::Helvetica,
                BODY_SIZE,
                predicate_letter(p),
            );
        }
        if let Some(k) = keterampilan {
            self.text_centered(
                (edges[3] + edges[4]) / 2.0,
                first_baseline,
                Font::Helvetica,
                BODY_SIZE,
                &format_score(k),
            );
        }
        self.cursor_y += h;
    }

    fn grade_table(&mut self) {
        self.section_title("A. Nilai Akademik");
        self.grade_header_row();

        // Only subjects with a recorded grade appear, so different students
        // in one class can have different row sets. Categories keep catalog
        // order; subjects sort by display rank within their category.
        let mut groups: Vec<(&str, Vec<&Subject>)> = Vec::new();
        for subject in &self.setup.subjects {
            if !self.record.grades.contains_key(&subject.subject_id) {
                continue;
            }
            match groups
                .iter_mut()
                .find(|(k, _)| *k == subject.kelompok.as_str())
            {
                Some((_, members)) => members.push(subject),
                None => groups.push((subject.kelompok.as_str(), vec![subject])),
            }
        }
        for (_, members) in &mut groups {
            members.sort_by(|a, b| {
                a.display_rank
                    .cmp(&b.display_rank)
                    .then_with(|| a.nm_mata_pelajaran.cmp(&b.nm_mata_pelajaran))
            });
        }

        for (kelompok, members) in groups {
            if !kelompok.is_empty() {
                self.category_row(&format!("Kelompok {kelompok}"));
            }
            for (i, subject) in members.iter().enumerate() {
                self.grade_row(i + 1, subject);
            }
        }
        self.cursor_y += 4.0;
    }

    fn section_title(&mut self, title: &str) {
        let h = line_height_mm(SECTION_SIZE) + 3.0;
        self.ensure_room(h + 12.0);
        self.surface.set_fill_color(0, 0, 0);
        let y = self.cursor_y + ascent_mm(SECTION_SIZE);
        self.text_at(self.left(), y, Font::HelveticaBold, SECTION_SIZE, title);
        self.cursor_y += h;
    }

    fn attendance_block(&mut self) {
        let row_h = 6.5;
        self.ensure_room(line_height_mm(SECTION_SIZE) + 3.0 + 3.0 * row_h + 10.0);
        self.section_title("B. Ketidakhadiran");

        let att = self.record.attendance;
        let scale = self.scale();
        let label_w = 60.0 * scale;
        let value_w = 25.0 * scale;
        let left = self.left();
        let rows = [
            ("Sakit", att.sakit),
            ("Izin", att.izin),
            ("Tanpa Keterangan", att.alpha),
        ];
        self.surface.set_line_width(RULE_WIDTH_MM);
        for (label, days) in rows {
            let y = self.cursor_y;
            self.surface.stroke_rect(left, y, label_w, row_h);
            self.surface.stroke_rect(left + label_w, y, value_w, row_h);
            self.surface.set_fill_color(0, 0, 0);
            let baseline = y + row_h / 2.0 + ascent_mm(BODY_SIZE) / 2.0;
            self.text_at(left + CELL_PAD_MM, baseline, Font::Helvetica, BODY_SIZE, label);
            self.text_centered(
                left + label_w + value_w / 2.0,
                baseline,
                Font::Helvetica,
                BODY_SIZE,
                &format!("{days} hari"),
            );
            self.cursor_y += row_h;
        }
        // Compact recap in the fixed S/I/A order.
        self.cursor_y += 2.0;
        let recap = format!("S/I/A : {}/{}/{}", att.sakit, att.izin, att.alpha);
        let y = self.cursor_y + ascent_mm(SMALL_SIZE);
        self.text_at(left, y, Font::Helvetica, SMALL_SIZE, &recap);
        self.cursor_y += line_height_mm(SMALL_SIZE) + 4.0;
    }

    fn extracurricular_block(&mut self) {
        let marked: Vec<(&str, &'static str)> = self
            .setup
            .activities
            .iter()
            .filter_map(|activity| {
                self.record
                    .extracurricular
                    .get(&activity.activity_id)
                    .map(|nilai| {
                        (
                            activity.nm_kegiatan.as_str(),
                            ekskul_predicate(Some(*nilai)),
                        )
                    })
            })
            .collect();
        if marked.is_empty() {
            return;
        }

        self.section_title("C. Kegiatan Ekstrakurikuler");

        let scale = self.scale();
        let mut edges = [0.0f32; 4];
        edges[0] = self.left();
        for (i, w) in EKSKUL_COLS_MM.iter().enumerate() {
            edges[i + 1] = edges[i] + w * scale;
        }

        let header_h = 8.0;
        self.ensure_room(header_h);
        let y = self.cursor_y;
        self.surface.set_fill_color(221, 221, 221);
        self.surface.fill_rect(edges[0], y, edges[3] - edges[0], header_h);
        self.surface.set_line_width(RULE_WIDTH_MM);
        self.surface.set_fill_color(0, 0, 0);
        let baseline = y + header_h / 2.0 + ascent_mm(SMALL_SIZE) / 2.0;
        for (i, label) in ["No", "Kegiatan", "Predikat"].iter().enumerate() {
            self.surface.stroke_rect(edges[i], y, edges[i + 1] - edges[i], header_h);
            self.text_centered(
                (edges[i] + edges[i + 1]) / 2.0,
                baseline,
                Font::HelveticaBold,
                SMALL_SIZE,
                label,
            );
        }
        self.cursor_y += header_h;

        let line_h = line_height_mm(BODY_SIZE);
        for (no, (name, predicate)) in marked.iter().enumerate() {
            let name_width = (edges[2] - edges[1]) - 2.0 * CELL_PAD_MM;
            let lines = self.split_cached(name, name_width, BODY_SIZE, Font::Helvetica);
            let h = lines.len() as f32 * line_h + 2.0 * CELL_PAD_MM;
            self.ensure_room(h);
            let y = self.cursor_y;
            self.surface.set_line_width(RULE_WIDTH_MM);
            for i in 0..3 {
                self.surface.stroke_rect(edges[i], y, edges[i + 1] - edges[i], h);
            }
            self.surface.set_fill_color(0, 0, 0);
            let first_baseline = y + CELL_PAD_MM + ascent_mm(BODY_SIZE);
            self.text_centered(
                (edges[0] + edges[1]) / 2.0,
                first_baseline,
                Font::Helvetica,
                BODY_SIZE,
                &(no + 1).to_string(),
            );
            for (i, line) in lines.iter().enumerate() {
                self.text_at(
                    edges[1] + CELL_PAD_MM,
                    first_baseline + i as f32 * line_h,
                    Font::Helvetica,
                    BODY_SIZE,
                    line,
                );
            }
            self.text_centered(
                (edges[2] + edges[3]) / 2.0,
                first_baseline,
                Font::Helvetica,
                BODY_SIZE,
                predicate,
            );
            self.cursor_y += h;
        }
        self.cursor_y += 4.0;
    }

    fn signature_block(&mut self) {
        // The whole block moves to a fresh page rather than splitting.
        self.ensure_room(42.0);
        self.cursor_y += 4.0;

        let school = self.setup.school.clone();
        let cw = self.content_width();
        let left = self.left();
        let centers = [left + cw / 6.0, left + cw / 2.0, left + cw * 5.0 / 6.0];
        let slots = [
            ("Orang Tua/Wali", String::new()),
            ("Wali Kelas", school.wali_kelas),
            ("Kepala Sekolah", school.kepala_sekolah),
        ];

        let label_y = self.cursor_y + ascent_mm(BODY_SIZE);
        let name_y = label_y + 26.0;
        self.surface.set_fill_color(0, 0, 0);
        for (cx, (label, name)) in centers.iter().zip(slots.iter()) {
            self.text_centered(*cx, label_y, Font::Helvetica, BODY_SIZE, label);
            if name.is_empty() {
                self.text_centered(*cx, name_y, Font::Helvetica, BODY_SIZE, "(............................)");
            } else {
                self.text_centered(*cx, name_y, Font::HelveticaBold, BODY_SIZE, name);
                let w = Font::HelveticaBold.text_width_mm(name, BODY_SIZE);
                self.surface.set_line_width(RULE_WIDTH_MM);
                self.surface.line(cx - w / 2.0, name_y + 1.0, cx + w / 2.0, name_y + 1.0);
            }
        }
        self.cursor_y = name_y + 6.0;
    }
}
