use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use ranker::document::DocumentSource;
use ranker::{CandidateDocument, Config, MatchingEngine};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("Starting ranker v{}", env!("CARGO_PKG_VERSION"));

    let mut args = std::env::args_os().skip(1).map(PathBuf::from);
    let Some(job_path) = args.next() else {
        bail!("usage: ranker <job.txt|job.pdf> <resume>...");
    };
    let candidates: Vec<CandidateDocument> = args
        .map(|path| CandidateDocument {
            id: candidate_id(&path),
            source: DocumentSource::Path(path),
        })
        .collect();
    if candidates.is_empty() {
        bail!("no resumes given; usage: ranker <job> <resume>...");
    }

    let matching = config
        .load_matching_config()
        .context("Failed to load matching configuration")?;
    let engine = MatchingEngine::from_config(&config, matching)?;

    let report = engine
        .run(DocumentSource::Path(job_path), candidates)
        .await
        .context("Matching run failed")?;

    println!("{}", report.to_json()?);
    Ok(())
}

/// File stem, falling back to the full path for stem-less names.
fn candidate_id(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
