mod common;

use rapor_pdf::{Renderer, ReportRecord};

#[test]
fn end_to_end_report_contains_every_block() {
    let renderer = Renderer::new(common::setup()).unwrap();
    let pdf = renderer.render_report(&common::student()).unwrap();

    assert!(pdf.starts_with(b"%PDF-"));
    let text = common::page_text(&pdf);

    // Header and identity.
    assert!(text.contains("SMP Negeri 1 Contoh"));
    assert!(text.contains("LAPORAN HASIL BELAJAR PESERTA DIDIK"));
    assert!(text.contains("Budi Santoso"));
    assert!(text.contains("1 \\(Ganjil\\)") || text.contains("1 (Ganjil)"));

    // Grade table: both graded subjects with their scores.
    assert!(text.contains("(Matematika)"));
    assert!(text.contains("(Bahasa Indonesia)"));
    assert!(text.contains("(90)"));
    assert!(text.contains("(85)"));
    assert!(text.contains("(88)"));

    // Attendance recap in S/I/A order with defaulted alpha.
    assert!(text.contains("2/1/0"));

    // Extracurricular: activity with the top qualitative grade.
    assert!(text.contains("(Pramuka)"));
    assert!(text.contains("(SB)"));

    // Footer: uppercased identity, raw NIS, page number.
    assert!(text.contains("(IX A | BUDI SANTOSO | 12345)"));
    assert!(text.contains("(Halaman : 1)"));
}

#[test]
fn ungraded_subject_is_omitted_for_that_student() {
    let renderer = Renderer::new(common::setup()).unwrap();
    let student = common::student(); // no grade entry for FIS
    let text = common::page_text(&renderer.render_report(&student).unwrap());
    assert!(!text.contains("Fisika"));
    // A graded subject from the same category still renders.
    assert!(text.contains("(Matematika)"));
}

#[test]
fn activity_without_mark_is_omitted() {
    let renderer = Renderer::new(common::setup()).unwrap();
    let text = common::page_text(&renderer.render_report(&common::student()).unwrap());
    assert!(text.contains("(Pramuka)"));
    assert!(!text.contains("Palang Merah Remaja"));
}

#[test]
fn missing_optional_blocks_degrade_to_zero_and_blank() {
    let student: ReportRecord = serde_json::from_value(serde_json::json!({
        "peserta_didik_id": "pd-002",
        "nm_siswa": "Siti Rahayu",
        "nis": "12346",
        "nm_kelas": "IX A"
    }))
    .unwrap();

    let renderer = Renderer::new(common::setup()).unwrap();
    let text = common::page_text(&renderer.render_report(&student).unwrap());
    assert!(text.contains("0/0/0"));
    // No grades recorded: no subject rows at all.
    assert!(!text.contains("Matematika"));
}

#[test]
fn long_reports_paginate_with_a_footer_on_every_page() {
    let mut setup_json = serde_json::json!({
        "school": { "nm_sekolah": "SMA Negeri 2", "semester": "20252" },
        "subjects": []
    });
    let subjects = setup_json["subjects"].as_array_mut().unwrap();
    for i in 0..40 {
        subjects.push(serde_json::json!({
            "subject_id": format!("S{i}"),
            "nm_mata_pelajaran": format!("Mata Pelajaran Pilihan Peminatan {i}"),
            "kelompok": "C",
            "display_rank": i
        }));
    }

    let mut grades = serde_json::Map::new();
    for i in 0..40 {
        grades.insert(format!("S{i}"), serde_json::json!(75 + (i % 20)));
    }
    let student: ReportRecord = serde_json::from_value(serde_json::json!({
        "peserta_didik_id": "pd-003",
        "nm_siswa": "Agus Wijaya",
        "nis": "12347",
        "nm_kelas": "XII IPA 1",
        "grades": grades
    }))
    .unwrap();

    let setup = serde_json::from_value(setup_json).unwrap();
    let renderer = Renderer::new(setup).unwrap();
    let pdf = renderer.render_report(&student).unwrap();

    let streams = common::content_streams(&pdf);
    assert!(streams.len() >= 2, "expected pagination, got {} page(s)", streams.len());
    for (i, stream) in streams.iter().enumerate() {
        let page = String::from_utf8_lossy(stream);
        assert!(
            page.contains(&format!("(Halaman : {})", i + 1)),
            "page {} missing its footer number",
            i + 1,
        );
        assert!(page.contains("(XII IPA 1 | AGUS WIJAYA | 12347)"));
    }
}

#[test]
fn extracurricular_mapping_is_pure_and_bijective_on_1_to_4() {
    use rapor_pdf::ekskul_predicate;
    let mapped: Vec<&str> = [4u8, 3, 2, 1]
        .iter()
        .map(|&n| ekskul_predicate(Some(n)))
        .collect();
    assert_eq!(mapped, ["SB", "B", "C", "K"]);
    assert_eq!(ekskul_predicate(Some(9)), "");
    assert_eq!(ekskul_predicate(None), "");
}
