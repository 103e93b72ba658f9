mod common;

use rapor_pdf::{Error, Renderer, ReportRecord, ReportSetup};

fn student_json(id: &str, name: &str, nis: &str) -> serde_json::Value {
    serde_json::json!({
        "peserta_didik_id": id,
        "nm_siswa": name,
        "nis": nis,
        "nm_kelas": "IX A",
        "grades": { "MAT": 80 }
    })
}

#[test]
fn one_bad_student_does_not_abort_the_batch() {
    let students: Vec<ReportRecord> = serde_json::from_value(serde_json::json!([
        student_json("pd-1", "Budi Santoso", "101"),
        student_json("pd-2", "", "102"),
        student_json("pd-3", "Citra Lestari", "103"),
    ]))
    .unwrap();

    let renderer = Renderer::new(common::setup()).unwrap();
    let outcome = renderer.render_batch(&students);

    assert_eq!(outcome.documents.len(), 2);
    assert_eq!(outcome.failures.len(), 1);

    let failure = &outcome.failures[0];
    assert_eq!(failure.peserta_didik_id, "pd-2");
    assert!(matches!(
        failure.error,
        Error::MissingIdentity { field: "nm_siswa", .. }
    ));

    // Surviving documents are complete, finalized PDFs.
    for doc in &outcome.documents {
        assert!(doc.bytes.starts_with(b"%PDF-"));
        let text = common::page_text(&doc.bytes);
        assert!(text.contains("(Halaman : 1)"));
    }
}

#[test]
fn every_identity_field_is_mandatory() {
    let renderer = Renderer::new(common::setup()).unwrap();
    for (field, json) in [
        ("nis", student_json("pd-1", "Budi", " ")),
        ("nm_kelas", {
            let mut v = student_json("pd-1", "Budi", "101");
            v["nm_kelas"] = serde_json::json!("");
            v
        }),
        ("peserta_didik_id", student_json("", "Budi", "101")),
    ] {
        let record: ReportRecord = serde_json::from_value(json).unwrap();
        match renderer.render_report(&record) {
            Err(Error::MissingIdentity { field: f, .. }) => assert_eq!(f, field),
            other => panic!("expected MissingIdentity for {field}, got {other:?}"),
        }
    }
}

#[test]
fn invalid_margins_fail_the_whole_run() {
    let mut setup: ReportSetup = common::setup();
    setup.margins.left = 120.0;
    setup.margins.right = 95.0;
    assert!(matches!(Renderer::new(setup), Err(Error::InvalidMargins(_))));

    let mut setup = common::setup();
    setup.margins.top = -1.0;
    assert!(matches!(Renderer::new(setup), Err(Error::InvalidMargins(_))));

    let mut setup = common::setup();
    setup.margins.top = 150.0;
    setup.margins.bottom = 150.0;
    assert!(matches!(Renderer::new(setup), Err(Error::InvalidMargins(_))));
}

#[test]
fn default_margins_are_twenty_millimetres() {
    let setup = common::setup();
    assert_eq!(setup.margins.top, 20.0);
    assert_eq!(setup.margins.bottom, 20.0);
    assert_eq!(setup.margins.left, 20.0);
    assert_eq!(setup.margins.right, 20.0);
}

#[test]
fn batch_input_file_shape_parses() {
    let batch = common::batch_input(serde_json::json!({
        "school": { "nm_sekolah": "SMP Negeri 1", "semester": "20251" },
        "subjects": [
            { "subject_id": "MAT", "nm_mata_pelajaran": "Matematika", "kelompok": "A" }
        ],
        "margins": { "top": 15.0, "bottom": 15.0, "left": 15.0, "right": 15.0 },
        "students": [ student_json("pd-1", "Budi Santoso", "101") ]
    }));
    assert_eq!(batch.students.len(), 1);
    assert_eq!(batch.setup.margins.top, 15.0);

    let renderer = Renderer::new(batch.setup).unwrap();
    let outcome = renderer.render_batch(&batch.students);
    assert_eq!(outcome.documents.len(), 1);
    assert!(outcome.failures.is_empty());
}
