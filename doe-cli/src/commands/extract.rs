//! Solver-log extraction command

use anyhow::{Context, Result};
use doe_core::extract::ValueExtractor;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Prints one `label<TAB>value` line per requested label
///
/// Output is left uncoloured so it can be captured by the post-processing
/// step of a run.
pub fn extract_values(log: &Path, labels: &[String]) -> Result<()> {
    let extractor = ValueExtractor::new(labels).context("Failed to build value extractor")?;

    let file =
        File::open(log).with_context(|| format!("Failed to open {}", log.display()))?;
    let extraction = extractor
        .extract(BufReader::new(file))
        .with_context(|| format!("Failed to read {}", log.display()))?;

    print!("{}", extraction);

    Ok(())
}
