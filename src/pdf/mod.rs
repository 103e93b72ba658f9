mod footer;
mod report;
mod surface;

use std::sync::Mutex;
use std::time::Instant;

use pdf_writer::{Filter, Name, Pdf, Rect, Ref};

use crate::cache::TextSplitCache;
use crate::error::Error;
use crate::fonts::{Font, MM_TO_PT};
use crate::model::{PAGE_HEIGHT_MM, PAGE_WIDTH_MM, ReportRecord, ReportSetup};

pub use report::{ekskul_predicate, predicate_letter};

use report::ReportWriter;

/// One finalized student document from a bulk run.
pub struct RenderedReport {
    pub peserta_didik_id: String,
    pub nis: String,
    pub bytes: Vec<u8>,
}

/// A student whose report could not be generated. Never aborts the batch.
pub struct StudentFailure {
    pub peserta_didik_id: String,
    pub nm_siswa: String,
    pub error: Error,
}

pub struct BatchOutcome {
    pub documents: Vec<RenderedReport>,
    pub failures: Vec<StudentFailure>,
}

/// Report renderer for one run: holds the shared setup (school, catalogs,
/// margins) and the injected text-split cache. The cache is behind a mutex so
/// a caller may render students from several threads against one `Renderer`;
/// each document still gets its own drawing surfaces and state.
pub struct Renderer {
    setup: ReportSetup,
    split_cache: Mutex<TextSplitCache>,
}

impl Renderer {
    /// Validates margins up front: every student in a run renders with the
    /// same margins, so a bad value fails the run before any document starts.
    pub fn new(setup: ReportSetup) -> Result<Self, Error> {
        Self::with_cache(setup, TextSplitCache::default())
    }

    pub fn with_cache(setup: ReportSetup, split_cache: TextSplitCache) -> Result<Self, Error> {
        setup.margins.validate()?;
        Ok(Self {
            setup,
            split_cache: Mutex::new(split_cache),
        })
    }

    pub fn setup(&self) -> &ReportSetup {
        &self.setup
    }

    /// Render one student's report to finished PDF bytes.
    pub fn render_report(&self, record: &ReportRecord) -> Result<Vec<u8>, Error> {
        let t0 = Instant::now();
        record.validate_identity()?;

        let writer = ReportWriter::new(&self.setup, record, &self.split_cache);
        let pages = writer.render();
        let t_layout = t0.elapsed();

        let bytes = assemble(&pages);
        let t_total = t0.elapsed();

        log::info!(
            "Timing: student={} pages={} layout={:.1}ms, assembly={:.1}ms ({} bytes)",
            record.peserta_didik_id,
            pages.len(),
            t_layout.as_secs_f64() * 1000.0,
            (t_total - t_layout).as_secs_f64() * 1000.0,
            bytes.len(),
        );

        Ok(bytes)
    }

    /// Render many students. Per-student failures are collected, not fatal;
    /// already-finalized documents are unaffected by later failures.
    pub fn render_batch(&self, records: &[ReportRecord]) -> BatchOutcome {
        let t0 = Instant::now();
        let mut documents = Vec::with_capacity(records.len());
        let mut failures = Vec::new();

        for record in records {
            match self.render_report(record) {
                Ok(bytes) => documents.push(RenderedReport {
                    peserta_didik_id: record.peserta_didik_id.clone(),
                    nis: record.nis.clone(),
                    bytes,
                }),
                Err(error) => {
                    log::warn!(
                        "skipping student {} ({}): {error}",
                        record.peserta_didik_id,
                        record.nm_siswa,
                    );
                    failures.push(StudentFailure {
                        peserta_didik_id: record.peserta_didik_id.clone(),
                        nm_siswa: record.nm_siswa.clone(),
                        error,
                    });
                }
            }
        }

        let cache = self.split_cache.lock().unwrap_or_else(|e| e.into_inner());
        let (hits, misses) = cache.stats();
        log::info!(
            "Batch: {} ok, {} failed in {:.1}ms (split cache: {} hits / {} misses, {} entries)",
            documents.len(),
            failures.len(),
            t0.elapsed().as_secs_f64() * 1000.0,
            hits,
            misses,
            cache.len(),
        );

        BatchOutcome {
            documents,
            failures,
        }
    }
}

/// Assemble finished page content streams into a PDF file. Content streams
/// are Flate-compressed; the three base-14 fonts are registered once and
/// shared by every page.
fn assemble(pages: &[Vec<u8>]) -> Vec<u8> {
    let mut pdf = Pdf::new();
    let mut next_id = 1i32;
    let mut alloc = || {
        let r = Ref::new(next_id);
        next_id += 1;
        r
    };

    let catalog_id = alloc();
    let pages_id = alloc();

    let font_refs: Vec<(Font, Ref)> = Font::ALL.iter().map(|&f| (f, alloc())).collect();
    for &(font, font_ref) in &font_refs {
        pdf.type1_font(font_ref)
            .base_font(Name(font.base_font()))
            .encoding_predefined(Name(b"WinAnsiEncoding"));
    }

    let page_ids: Vec<Ref> = pages.iter().map(|_| alloc()).collect();
    let content_ids: Vec<Ref> = pages.iter().map(|_| alloc()).collect();

    for (raw, &content_id) in pages.iter().zip(&content_ids) {
        let compressed = miniz_oxide::deflate::compress_to_vec_zlib(raw, 6);
        pdf.stream(content_id, &compressed).filter(Filter::FlateDecode);
    }

    pdf.catalog(catalog_id).pages(pages_id);
    pdf.pages(pages_id)
        .kids(page_ids.iter().copied())
        .count(pages.len() as i32);

    let media_box = Rect::new(
        0.0,
        0.0,
        PAGE_WIDTH_MM * MM_TO_PT,
        PAGE_HEIGHT_MM * MM_TO_PT,
    );
    for (i, &page_id) in page_ids.iter().enumerate() {
        let mut page = pdf.page(page_id);
        page.media_box(media_box)
            .parent(pages_id)
            .contents(content_ids[i]);
        let mut resources = page.resources();
        let mut fonts = resources.fonts();
        for &(font, font_ref) in &font_refs {
            fonts.pair(Name(font.resource_name().as_bytes()), font_ref);
        }
    }

    pdf.finish()
}
