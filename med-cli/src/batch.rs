//! Batch driver
//!
//! Runs one extraction per configured file in parallel. Every file writes its
//! own `<key>.csv` (keys are checked for uniqueness when the config loads), so
//! workers share nothing but the output directory.

use crate::config::{BatchConfig, FileEntry, OnError};
use crate::report::{BatchReport, FileOutcome};
use anyhow::{Context, Result};
use med_decoder::Extractor;
use rayon::prelude::*;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};

/// Run every file in the batch and collect per-file outcomes
pub fn run_batch(config: &BatchConfig) -> Result<BatchReport> {
    let extractor = Extractor::new(config.extract.clone())?;
    let output_dir = &config.output.dir;

    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create output directory: {:?}", output_dir))?;

    log::info!(
        "Processing {} files into {:?} (on_error = {:?})",
        config.files.len(),
        output_dir,
        config.output.on_error
    );

    // Set by the first failure under `abort`; files not yet started are skipped
    let stop = AtomicBool::new(false);
    let abort = config.output.on_error == OnError::Abort;

    let outcomes: Vec<FileOutcome> = config
        .files
        .par_iter()
        .filter_map(|file| {
            if stop.load(Ordering::Relaxed) {
                log::debug!("Not starting {:?}, batch aborted", file.path);
                return None;
            }
            let outcome = process_file(&extractor, file, output_dir);
            if abort && outcome.error.is_some() {
                stop.store(true, Ordering::Relaxed);
            }
            Some(outcome)
        })
        .collect();

    Ok(BatchReport::new(outcomes, stop.load(Ordering::Relaxed)))
}

fn process_file(extractor: &Extractor, file: &FileEntry, output_dir: &Path) -> FileOutcome {
    let info = file.session_info();
    match extractor.extract(&file.path, &info, output_dir) {
        Ok(summary) => FileOutcome::success(file.path.clone(), info, summary),
        Err(e) => {
            log::error!("Extraction failed for {:?}: {}", file.path, e);
            FileOutcome::failure(file.path.clone(), info, e.to_string())
        }
    }
}
