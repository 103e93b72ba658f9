//! Paginated report-card PDF renderer.
//!
//! Takes per-student records shaped by the school-records data layer (grades,
//! attendance, extracurricular marks, identity) plus per-run configuration
//! (school identity, subject/activity catalogs, margins) and produces
//! fixed-format printable A4 documents. Built for bulk generation: text
//! wrapping is memoized in an injected [`TextSplitCache`] and redundant
//! drawing-state operators are suppressed per page.

mod cache;
mod error;
mod fonts;
mod model;
mod pdf;

pub use cache::{DEFAULT_SPLIT_CACHE_CAPACITY, TextSplitCache};
pub use error::Error;
pub use fonts::Font;
pub use model::{
    Activity, Attendance, BatchInput, GradeValue, MarginSettings, PAGE_HEIGHT_MM, PAGE_WIDTH_MM,
    ReportRecord, ReportSetup, SchoolInfo, Subject,
};
pub use pdf::{
    BatchOutcome, RenderedReport, Renderer, StudentFailure, ekskul_predicate, predicate_letter,
};
