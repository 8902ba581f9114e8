//! Overlap resolution for ctm-edits of overlapping segments.
//!
//! A recording split into overlapping segments gets every overlap aligned
//! twice. This crate reads the segments and the ctm-edits, keeps the more
//! accurate hypothesis of every overlap, and writes one overlap-free
//! ctm-edits stream, recording by recording in ascending recording-id order.

use entity::{EditLine, Segment};
use log::*;
use service::config::Config;
use std::collections::BTreeMap;
use std::sync::Arc;

pub mod emitter;
pub mod error;
pub mod grouper;
pub mod reader;
pub mod resolver;
pub mod scoring;
pub mod segment_index;
pub mod transcript;

pub use error::Error;

use emitter::Emitter;
use reader::Records;
use segment_index::SegmentIndex;
use transcript::RecordingTranscript;

/// Counts reported at the end of a successful run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunSummary {
    pub recordings: usize,
    pub lines_read: usize,
    pub lines_written: usize,
}

/// Reads, resolves and writes everything named by `config`.
///
/// Nothing is written before every recording has been resolved, so a failure
/// anywhere leaves no partial output file behind.
pub async fn run(config: &Config) -> Result<RunSummary, Error> {
    let segments = Records::<Segment>::open(config.segments())?;
    let index = SegmentIndex::load(segments, config.duplicate_segments)?;

    let edits = Records::<EditLine>::open(config.ctm_edits_in())?;
    let recordings = grouper::group_by_recording(edits, &index)?;
    let lines_read: usize = recordings
        .values()
        .map(RecordingTranscript::total_line_count)
        .sum();

    let resolved = resolve_all(recordings, Arc::new(index), config.parallel).await?;

    let mut emitter = Emitter::create(config.ctm_edits_out())?;
    for transcript in &resolved {
        emitter.write_recording(transcript)?;
    }
    let lines_written = emitter.finish()?;

    info!(
        "Wrote CTM for {} recordings ({lines_written} of {lines_read} lines kept) to {}.",
        resolved.len(),
        config.ctm_edits_out().display()
    );

    Ok(RunSummary {
        recordings: resolved.len(),
        lines_read,
        lines_written,
    })
}

/// Resolves every recording and returns them in ascending recording-id order.
///
/// With `parallel`, each recording is resolved on its own blocking worker;
/// results are still collected in recording-id order. The first failure, in
/// that order, aborts the run.
pub async fn resolve_all(
    recordings: BTreeMap<String, RecordingTranscript>,
    index: Arc<SegmentIndex>,
    parallel: bool,
) -> Result<Vec<RecordingTranscript>, Error> {
    if !parallel {
        return recordings
            .into_values()
            .map(|mut transcript| resolve_one(&mut transcript, &index).map(|_| transcript))
            .collect();
    }

    let workers: Vec<_> = recordings
        .into_values()
        .map(|mut transcript| {
            let index = Arc::clone(&index);
            tokio::task::spawn_blocking(move || {
                resolve_one(&mut transcript, &index).map(|_| transcript)
            })
        })
        .collect();

    let mut resolved = Vec::with_capacity(workers.len());
    for worker in workers {
        resolved.push(worker.await??);
    }
    Ok(resolved)
}

fn resolve_one(transcript: &mut RecordingTranscript, index: &SegmentIndex) -> Result<(), Error> {
    resolver::resolve_recording(transcript, index)
        .map(|_| ())
        .inspect_err(|_| {
            error!(
                "Failed to process CTM edits for recording {}",
                transcript.recording_id()
            )
        })
}
