use rapor_pdf::{BatchInput, ReportRecord, ReportSetup};

/// Standard run configuration used across the integration tests.
pub fn setup() -> ReportSetup {
    serde_json::from_value(serde_json::json!({
        "school": {
            "nm_sekolah": "SMP Negeri 1 Contoh",
            "npsn": "20100001",
            "semester": "20251",
            "tahun_ajaran": "2025/2026",
            "kepala_sekolah": "Dra. Siti Aminah",
            "wali_kelas": "Joko Susilo"
        },
        "subjects": [
            { "subject_id": "MAT", "nm_mata_pelajaran": "Matematika", "kelompok": "A", "display_rank": 2 },
            { "subject_id": "IND", "nm_mata_pelajaran": "Bahasa Indonesia", "kelompok": "A", "display_rank": 1 },
            { "subject_id": "FIS", "nm_mata_pelajaran": "Fisika", "kelompok": "A", "display_rank": 3 },
            { "subject_id": "SBD", "nm_mata_pelajaran": "Seni Budaya", "kelompok": "B", "display_rank": 1 }
        ],
        "activities": [
            { "activity_id": "X", "nm_kegiatan": "Pramuka" },
            { "activity_id": "Y", "nm_kegiatan": "Palang Merah Remaja" }
        ]
    }))
    .expect("valid setup json")
}

pub fn student() -> ReportRecord {
    serde_json::from_value(serde_json::json!({
        "peserta_didik_id": "pd-001",
        "nm_siswa": "Budi Santoso",
        "nis": "12345",
        "nm_kelas": "IX A",
        "grades": {
            "MAT": 90,
            "IND": { "pengetahuan": 85, "keterampilan": 88 }
        },
        "attendance": { "sakit": 2, "izin": 1 },
        "extracurricular": { "X": 4 }
    }))
    .expect("valid student json")
}

pub fn batch_input(json: serde_json::Value) -> BatchInput {
    serde_json::from_value(json).expect("valid batch json")
}

/// Extract and inflate every content stream in a generated PDF.
pub fn content_streams(pdf: &[u8]) -> Vec<Vec<u8>> {
    fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
        haystack.windows(needle.len()).position(|w| w == needle)
    }

    let mut out = Vec::new();
    let mut i = 0;
    while let Some(pos) = find(&pdf[i..], b"stream") {
        let mut start = i + pos + b"stream".len();
        if pdf.get(start) == Some(&b'\r') {
            start += 1;
        }
        if pdf.get(start) == Some(&b'\n') {
            start += 1;
        }
        let Some(end_rel) = find(&pdf[start..], b"endstream") else {
            break;
        };
        let mut end = start + end_rel;
        while end > start && (pdf[end - 1] == b'\n' || pdf[end - 1] == b'\r') {
            end -= 1;
        }
        if let Ok(raw) = miniz_oxide::inflate::decompress_to_vec_zlib(&pdf[start..end]) {
            out.push(raw);
        }
        i = start + end_rel + b"endstream".len();
    }
    out
}

/// All page content as one searchable string.
pub fn page_text(pdf: &[u8]) -> String {
    content_streams(pdf)
        .iter()
        .map(|s| String::from_utf8_lossy(s).into_owned())
        .collect::<Vec<_>>()
        .join("\n")
}
