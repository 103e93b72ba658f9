use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use rapor_pdf::{BatchInput, Renderer, TextSplitCache};

/// Render printable report-card PDFs from a batch JSON file.
#[derive(Parser)]
#[command(name = "rapor-pdf", version, about)]
struct Args {
    /// Batch input: school identity, subject/activity catalogs, margins and
    /// the student records.
    input: PathBuf,

    /// Directory for the generated PDFs, one `<nis>.pdf` per student.
    #[arg(short, long, default_value = "rapor-out")]
    out_dir: PathBuf,

    /// Capacity of the text-split cache shared across the batch.
    #[arg(long, default_value_t = rapor_pdf::DEFAULT_SPLIT_CACHE_CAPACITY)]
    cache_capacity: usize,
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();
    match run(&args) {
        Ok(0) => ExitCode::SUCCESS,
        Ok(_) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<usize, Box<dyn std::error::Error>> {
    let data = std::fs::read_to_string(&args.input)?;
    let batch: BatchInput = serde_json::from_str(&data)?;

    let renderer = Renderer::with_cache(batch.setup, TextSplitCache::new(args.cache_capacity))?;
    std::fs::create_dir_all(&args.out_dir)?;

    let outcome = renderer.render_batch(&batch.students);
    for doc in &outcome.documents {
        std::fs::write(args.out_dir.join(format!("{}.pdf", doc.nis)), &doc.bytes)?;
    }
    for failure in &outcome.failures {
        eprintln!(
            "failed: {} ({}): {}",
            failure.nm_siswa, failure.peserta_didik_id, failure.error,
        );
    }
    println!(
        "{} report(s) written to {}, {} failure(s)",
        outcome.documents.len(),
        args.out_dir.display(),
        outcome.failures.len(),
    );
    Ok(outcome.failures.len())
}
