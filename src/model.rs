use std::collections::BTreeMap;

use serde::Deserialize;

use crate::error::Error;

/// A4 portrait, in millimetres. Report pages are a fixed physical size.
pub const PAGE_WIDTH_MM: f32 = 210.0;
pub const PAGE_HEIGHT_MM: f32 = 297.0;

/// Page insets in millimetres. Loaded once per run; immutable while rendering.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
pub struct MarginSettings {
    pub top: f32,
    pub bottom: f32,
    pub left: f32,
    pub right: f32,
}

impl Default for MarginSettings {
    fn default() -> Self {
        Self {
            top: 20.0,
            bottom: 20.0,
            left: 20.0,
            right: 20.0,
        }
    }
}

impl MarginSettings {
    pub fn validate(&self) -> Result<(), Error> {
        if self.top < 0.0 || self.bottom < 0.0 || self.left < 0.0 || self.right < 0.0 {
            return Err(Error::InvalidMargins(format!(
                "negative inset: top={} bottom={} left={} right={}",
                self.top, self.bottom, self.left, self.right
            )));
        }
        if self.left + self.right >= PAGE_WIDTH_MM {
            return Err(Error::InvalidMargins(format!(
                "left+right = {} leaves no printable width on a {PAGE_WIDTH_MM}mm page",
                self.left + self.right
            )));
        }
        if self.top + self.bottom >= PAGE_HEIGHT_MM {
            return Err(Error::InvalidMargins(format!(
                "top+bottom = {} leaves no printable height on a {PAGE_HEIGHT_MM}mm page",
                self.top + self.bottom
            )));
        }
        Ok(())
    }
}

/// Absence day counters. Missing fields deserialize to zero.
#[derive(Clone, Copy, Debug, Default, Deserialize)]
pub struct Attendance {
    #[serde(default)]
    pub sakit: u32,
    #[serde(default)]
    pub izin: u32,
    #[serde(default)]
    pub alpha: u32,
}

/// A subject's recorded grade: either a bare knowledge score or explicit
/// knowledge/skill components.
#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(untagged)]
pub enum GradeValue {
    Score(f32),
    Components {
        #[serde(default)]
        pengetahuan: Option<f32>,
        #[serde(default)]
        keterampilan: Option<f32>,
    },
}

impl GradeValue {
    pub fn pengetahuan(&self) -> Option<f32> {
        match *self {
            GradeValue::Score(v) => Some(v),
            GradeValue::Components { pengetahuan, .. } => pengetahuan,
        }
    }

    pub fn keterampilan(&self) -> Option<f32> {
        match *self {
            GradeValue::Score(_) => None,
            GradeValue::Components { keterampilan, .. } => keterampilan,
        }
    }
}

/// One student's shaped record, assembled by the data layer before rendering.
#[derive(Clone, Debug, Deserialize)]
pub struct ReportRecord {
    pub peserta_didik_id: String,
    pub nm_siswa: String,
    pub nis: String,
    pub nm_kelas: String,
    /// subject_id -> recorded grade. Subjects absent here are omitted from
    /// this student's table entirely.
    #[serde(default)]
    pub grades: BTreeMap<String, GradeValue>,
    #[serde(default)]
    pub attendance: Attendance,
    /// activity_id -> qualitative grade 1..=4.
    #[serde(default)]
    pub extracurricular: BTreeMap<String, u8>,
}

impl ReportRecord {
    /// Identity fields are mandatory; an empty one aborts this student only.
    pub fn validate_identity(&self) -> Result<(), Error> {
        let check = |field: &'static str, value: &str| -> Result<(), Error> {
            if value.trim().is_empty() {
                Err(Error::MissingIdentity {
                    student_id: self.peserta_didik_id.clone(),
                    field,
                })
            } else {
                Ok(())
            }
        };
        check("peserta_didik_id", &self.peserta_didik_id)?;
        check("nm_siswa", &self.nm_siswa)?;
        check("nis", &self.nis)?;
        check("nm_kelas", &self.nm_kelas)?;
        Ok(())
    }
}

/// Catalog entry for a subject. `display_rank` orders subjects within their
/// category; categories render in the order they first appear in the catalog.
#[derive(Clone, Debug, Deserialize)]
pub struct Subject {
    pub subject_id: String,
    pub nm_mata_pelajaran: String,
    pub kelompok: String,
    #[serde(default)]
    pub display_rank: i32,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Activity {
    pub activity_id: String,
    pub nm_kegiatan: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct SchoolInfo {
    pub nm_sekolah: String,
    #[serde(default)]
    pub npsn: String,
    #[serde(default)]
    pub alamat: String,
    /// Period key, e.g. "20251".
    pub semester: String,
    #[serde(default)]
    pub tahun_ajaran: String,
    #[serde(default)]
    pub kepala_sekolah: String,
    #[serde(default)]
    pub wali_kelas: String,
}

/// Per-run configuration shared by every student in a batch.
#[derive(Clone, Debug, Deserialize)]
pub struct ReportSetup {
    pub school: SchoolInfo,
    pub subjects: Vec<Subject>,
    #[serde(default)]
    pub activities: Vec<Activity>,
    #[serde(default)]
    pub margins: MarginSettings,
}

/// Shape of a batch input file: run configuration plus the student records.
#[derive(Clone, Debug, Deserialize)]
pub struct BatchInput {
    #[serde(flatten)]
    pub setup: ReportSetup,
    pub students: Vec<ReportRecord>,
}
