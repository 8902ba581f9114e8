//! Groups the sorted ctm-edits stream into per-recording transcripts.
use crate::error::{DomainErrorKind, Error, InputErrorKind};
use crate::reader::Records;
use crate::segment_index::SegmentIndex;
use crate::transcript::RecordingTranscript;
use entity::EditLine;
use log::*;
use std::collections::BTreeMap;

/// Consumes ctm-edits sorted by utterance id and returns one transcript per
/// recording known to `index`, keyed and ordered by recording id.
///
/// Utterance ids must strictly increase from one utterance to the next; an
/// utterance reappearing later, or one absent from `index`, is fatal.
/// Recordings without any ctm-edits are still returned, empty.
pub fn group_by_recording(
    mut records: Records<EditLine>,
    index: &SegmentIndex,
) -> Result<BTreeMap<String, RecordingTranscript>, Error> {
    let file = records.source_name().to_string();
    let mut recordings: BTreeMap<String, RecordingTranscript> = index
        .recording_ids()
        .into_iter()
        .map(|id| (id.to_string(), RecordingTranscript::new(id)))
        .collect();

    let mut current: Option<(String, Vec<EditLine>)> = None;
    let mut num_utterances = 0;

    for numbered in records.by_ref() {
        let numbered = numbered?;

        if let Some((utterance_id, lines)) = current.as_mut() {
            if *utterance_id == numbered.record.utterance_id {
                lines.push(numbered.record);
                continue;
            }
            if numbered.record.utterance_id < *utterance_id {
                return Err(Error::new(DomainErrorKind::Input(InputErrorKind::Unsorted {
                    file,
                    line_number: numbered.line_number,
                    previous: utterance_id.clone(),
                    current: numbered.record.utterance_id,
                })));
            }
        }

        if index.get(&numbered.record.utterance_id).is_none() {
            return Err(Error::new(DomainErrorKind::Input(
                InputErrorKind::UnknownUtterance {
                    file,
                    line_number: numbered.line_number,
                    utterance_id: numbered.record.utterance_id,
                },
            )));
        }

        if let Some((utterance_id, lines)) = current.take() {
            append_utterance(&mut recordings, index, utterance_id, lines);
            num_utterances += 1;
        }
        current = Some((numbered.record.utterance_id.clone(), vec![numbered.record]));
    }

    if let Some((utterance_id, lines)) = current.take() {
        append_utterance(&mut recordings, index, utterance_id, lines);
        num_utterances += 1;
    }

    info!(
        "Read {} lines from CTM {file}; got {} recordings, {num_utterances} utterances.",
        records.lines_read(),
        recordings.len()
    );

    Ok(recordings)
}

// The utterance must already be known to `index`.
fn append_utterance(
    recordings: &mut BTreeMap<String, RecordingTranscript>,
    index: &SegmentIndex,
    utterance_id: String,
    lines: Vec<EditLine>,
) {
    let Some(segment) = index.get(&utterance_id) else {
        return;
    };
    let Some(transcript) = recordings.get_mut(&segment.recording_id) else {
        return;
    };

    if let Some(previous) = transcript
        .utterances()
        .last()
        .and_then(|span| index.get(&span.utterance_id))
    {
        if segment.start_time < previous.start_time {
            warn!(
                "Recording {}: utterance {utterance_id} starts at {} before preceding utterance {} at {}",
                segment.recording_id, segment.start_time, previous.utterance_id, previous.start_time
            );
        }
    }

    trace!(
        "Recording {}: utterance {utterance_id} with {} lines",
        segment.recording_id,
        lines.len()
    );
    transcript.push_utterance(utterance_id, lines);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::records_from_str;
    use service::config::DuplicatePolicy;

    fn index() -> SegmentIndex {
        SegmentIndex::load(
            records_from_str(
                "segments",
                "utt-a reco-1 0 10\nutt-b reco-1 8 18\nutt-c reco-2 0 5\nutt-d reco-3 0 5\n",
            ),
            DuplicatePolicy::Reject,
        )
        .unwrap()
    }

    #[test]
    fn test_groups_consecutive_lines_by_utterance_and_recording() {
        let edits = "utt-a 1 0.0 0.5 a 1.0 a cor\n\
                     utt-a 1 0.5 0.5 b 1.0 b cor\n\
                     utt-b 1 0.0 0.5 c 1.0 c cor\n\
                     utt-c 1 0.0 0.5 d 1.0 d sil\n";
        let recordings = group_by_recording(records_from_str("ctm", edits), &index()).unwrap();

        assert_eq!(
            recordings.keys().collect::<Vec<_>>(),
            vec!["reco-1", "reco-2", "reco-3"]
        );
        let reco_1 = &recordings["reco-1"];
        assert_eq!(reco_1.utterances().len(), 2);
        assert_eq!(reco_1.utterance_lines(0).len(), 2);
        assert_eq!(reco_1.utterances()[1].utterance_id, "utt-b");
        assert_eq!(recordings["reco-2"].surviving_line_count(), 1);
        assert!(
            recordings["reco-3"].utterances().is_empty(),
            "recording without edits is kept, empty"
        );
    }

    #[test]
    fn test_rejects_decreasing_utterance_ids() {
        let edits = "utt-b 1 0.0 0.5 c 1.0 c cor\nutt-a 1 0.0 0.5 a 1.0 a cor\n";
        let err = group_by_recording(records_from_str("ctm", edits), &index()).unwrap_err();

        assert_eq!(
            err.error_kind,
            DomainErrorKind::Input(InputErrorKind::Unsorted {
                file: "ctm".to_string(),
                line_number: 2,
                previous: "utt-b".to_string(),
                current: "utt-a".to_string()
            })
        );
    }

    #[test]
    fn test_rejects_utterance_reappearing_later() {
        let edits = "utt-a 1 0.0 0.5 a 1.0 a cor\n\
                     utt-b 1 0.0 0.5 c 1.0 c cor\n\
                     utt-a 1 0.5 0.5 b 1.0 b cor\n";
        let err = group_by_recording(records_from_str("ctm", edits), &index()).unwrap_err();

        assert!(matches!(
            err.error_kind,
            DomainErrorKind::Input(InputErrorKind::Unsorted { line_number: 3, .. })
        ));
    }

    #[test]
    fn test_rejects_unknown_utterance() {
        let edits = "utt-a 1 0.0 0.5 a 1.0 a cor\nutt-x 1 0.0 0.5 x 1.0 x cor\n";
        let err = group_by_recording(records_from_str("ctm", edits), &index()).unwrap_err();

        assert_eq!(
            err.error_kind,
            DomainErrorKind::Input(InputErrorKind::UnknownUtterance {
                file: "ctm".to_string(),
                line_number: 2,
                utterance_id: "utt-x".to_string()
            })
        );
    }

    #[test]
    fn test_malformed_edit_line_is_reported() {
        let edits = "utt-a 1 0.0 0.5 a 1.0 a\n";
        let err = group_by_recording(records_from_str("ctm", edits), &index()).unwrap_err();

        assert!(matches!(
            err.error_kind,
            DomainErrorKind::Input(InputErrorKind::Malformed { line_number: 1, .. })
        ));
    }
}
