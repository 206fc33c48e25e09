use anyhow::{Context, Result};
use std::path::Path;
use tokio::io::AsyncReadExt;
use triage_core::ScoringRequest;
use triage_ingest::{parse_batch, BatchFormat};

/// Read a batch file (`-` = JSON on stdin) into a scoring request.
pub async fn read_request(path: &Path) -> Result<ScoringRequest> {
    if path == Path::new("-") {
        let mut text = String::new();
        tokio::io::stdin()
            .read_to_string(&mut text)
            .await
            .context("read stdin")?;
        return parse_batch(&text, BatchFormat::Json).context("parsing stdin");
    }

    let format = BatchFormat::from_path(path)?;
    let text = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("read {}", path.display()))?;
    parse_batch(&text, format).with_context(|| format!("parsing {}", path.display()))
}
