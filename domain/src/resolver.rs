//! Overlap resolution between adjacent utterances of one recording.
//!
//! Segments of a recording overlap, and each segment's ctm-edits cover the
//! whole segment, so the audio in an overlap is transcribed twice. For every
//! adjacent pair the resolver scores the two hypotheses of the overlap and
//! keeps only the more accurate one.
use crate::error::{DomainErrorKind, Error, ResolutionErrorKind};
use crate::scoring::{self, RegionScore, Winner};
use crate::segment_index::SegmentIndex;
use crate::transcript::RecordingTranscript;
use entity::EditLine;
use log::*;

/// Summary of one recording's resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Resolution {
    pub pairs: usize,
    pub dropped_lines: usize,
}

/// Resolves every overlap of `transcript` in place, pairs strictly left to
/// right: a decision on `(U_i, U_i+1)` may shorten `U_i+1` before it is paired
/// with `U_i+2`.
pub fn resolve_recording(
    transcript: &mut RecordingTranscript,
    index: &SegmentIndex,
) -> Result<Resolution, Error> {
    if transcript.utterances().is_empty() {
        return Err(Error::new(DomainErrorKind::Resolution(
            ResolutionErrorKind::EmptyRecording {
                recording_id: transcript.recording_id().to_string(),
            },
        )));
    }

    let mut resolution = Resolution::default();
    for current in 0..transcript.utterances().len() - 1 {
        resolution.dropped_lines += resolve_pair(transcript, index, current)?;
        resolution.pairs += 1;
    }

    debug!(
        "Recording {}: resolved {} overlaps, dropped {} of {} lines",
        transcript.recording_id(),
        resolution.pairs,
        resolution.dropped_lines,
        transcript.total_line_count()
    );

    Ok(resolution)
}

/// Resolves the overlap between utterance `current` and its successor and
/// returns the number of lines dropped.
fn resolve_pair(
    transcript: &mut RecordingTranscript,
    index: &SegmentIndex,
    current: usize,
) -> Result<usize, Error> {
    let recording_id = transcript.recording_id().to_string();
    let current_id = transcript.utterances()[current].utterance_id.clone();
    let next_id = transcript.utterances()[current + 1].utterance_id.clone();

    if next_id <= current_id {
        error!(
            "Next utterance {next_id} <= current utterance {current_id} in recording {recording_id}. \
             CTM edits is not sorted by utterance-id."
        );
        log_pair_lines(transcript, current);
        return Err(Error::new(DomainErrorKind::Resolution(
            ResolutionErrorKind::Sequencing {
                recording_id,
                current: current_id,
                next: next_id,
            },
        )));
    }

    let current_segment = lookup(index, &recording_id, &current_id)?;
    let next_segment = lookup(index, &recording_id, &next_id)?;

    let window_length = current_segment.duration();
    // Negative when the segments do not actually overlap; both regions then
    // come out empty and nothing is trimmed.
    let overlap = current_segment.end_time - next_segment.start_time;

    let current_lines = transcript.utterance_lines(current);
    let next_lines = transcript.utterance_lines(current + 1);

    let tail_start = tail_boundary(current_lines, window_length, overlap);
    let head_end = head_boundary(next_lines, overlap);

    let tail_score = RegionScore::of(&current_lines[tail_start..]);
    let head_score = RegionScore::of(&next_lines[..head_end]);
    let winner = scoring::choose(&tail_score, &head_score);

    let dropped = match winner {
        Winner::Current => {
            transcript.drop_head(current + 1, head_end);
            head_end
        }
        Winner::Next => {
            let dropped = current_lines.len() - tail_start;
            transcript.truncate_tail(current, tail_start);
            dropped
        }
    };

    debug!(
        "Recording {recording_id}: {current_id} / {next_id} overlap {overlap:.3}s, \
         tail {tail_score:?} (wer {:.3}) vs head {head_score:?} (wer {:.3}): {winner:?} wins, {dropped} lines dropped",
        tail_score.error_rate(),
        head_score.error_rate()
    );

    Ok(dropped)
}

/// Index of the first line of the earlier utterance whose midpoint lies in
/// the overlap; `len` when none does.
fn tail_boundary(lines: &[EditLine], window_length: f64, overlap: f64) -> usize {
    lines
        .iter()
        .position(|line| line.midpoint() > window_length - overlap)
        .unwrap_or(lines.len())
}

/// Index of the first line of the later utterance whose midpoint lies past
/// the overlap.
fn head_boundary(lines: &[EditLine], overlap: f64) -> usize {
    // When every line lies inside the overlap the head region is taken as
    // empty, not as the whole utterance. This is asymmetric with
    // `tail_boundary` but matches the behavior existing outputs were made with.
    lines
        .iter()
        .position(|line| line.midpoint() > overlap)
        .unwrap_or(0)
}

fn lookup<'a>(
    index: &'a SegmentIndex,
    recording_id: &str,
    utterance_id: &str,
) -> Result<&'a entity::Segment, Error> {
    index.get(utterance_id).ok_or_else(|| {
        Error::new(DomainErrorKind::Resolution(
            ResolutionErrorKind::MissingSegment {
                recording_id: recording_id.to_string(),
                utterance_id: utterance_id.to_string(),
            },
        ))
    })
}

fn log_pair_lines(transcript: &RecordingTranscript, current: usize) {
    error!("Current CTM:");
    for line in transcript.utterance_lines(current) {
        error!("{line}");
    }
    error!("Next CTM:");
    for line in transcript.utterance_lines(current + 1) {
        error!("{line}");
    }
}
