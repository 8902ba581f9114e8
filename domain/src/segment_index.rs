//! Utterance id → segment lookup, built once from the segments file.
use crate::error::{DomainErrorKind, Error, InputErrorKind};
use crate::reader::Records;
use entity::Segment;
use log::*;
use service::config::DuplicatePolicy;
use std::collections::{BTreeSet, HashMap};

#[derive(Debug, Default)]
pub struct SegmentIndex {
    segments: HashMap<String, Segment>,
}

impl SegmentIndex {
    /// Reads every segments record into the index.
    ///
    /// A repeated utterance id is fatal under `DuplicatePolicy::Reject`; under
    /// `DuplicatePolicy::LastWins` the later record replaces the earlier one.
    pub fn load(records: Records<Segment>, policy: DuplicatePolicy) -> Result<Self, Error> {
        let file = records.source_name().to_string();
        let mut segments: HashMap<String, Segment> = HashMap::new();
        let mut defined_on: HashMap<String, usize> = HashMap::new();

        for numbered in records {
            let numbered = numbered?;
            let utterance_id = numbered.record.utterance_id.clone();

            if let Some(first_line) = defined_on.get(&utterance_id).copied() {
                match policy {
                    DuplicatePolicy::Reject => {
                        return Err(Error::new(DomainErrorKind::Input(
                            InputErrorKind::DuplicateKey {
                                file,
                                utterance_id,
                                first_line,
                                second_line: numbered.line_number,
                            },
                        )));
                    }
                    DuplicatePolicy::LastWins => warn!(
                        "{file}:{}: utterance {utterance_id} already defined on line {first_line}; keeping the later segment",
                        numbered.line_number
                    ),
                }
            }

            defined_on.insert(utterance_id.clone(), numbered.line_number);
            segments.insert(utterance_id, numbered.record);
        }

        info!("Read {} segments from {file}", segments.len());

        Ok(SegmentIndex { segments })
    }

    pub fn get(&self, utterance_id: &str) -> Option<&Segment> {
        self.segments.get(utterance_id)
    }

    /// Every recording that owns at least one segment, in ascending order.
    pub fn recording_ids(&self) -> BTreeSet<&str> {
        self.segments
            .values()
            .map(|segment| segment.recording_id.as_str())
            .collect()
    }
}

impl FromIterator<Segment> for SegmentIndex {
    fn from_iter<I: IntoIterator<Item = Segment>>(iter: I) -> Self {
        SegmentIndex {
            segments: iter
                .into_iter()
                .map(|segment| (segment.utterance_id.clone(), segment))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::records_from_str;

    const SEGMENTS: &str = "utt-a reco-1 0.0 10.0\n\
                            utt-b reco-1 8.0 18.0 1\n\
                            utt-c reco-2 0.0 5.0\n";

    #[test]
    fn test_load_indexes_by_utterance() {
        let index =
            SegmentIndex::load(records_from_str("segments", SEGMENTS), DuplicatePolicy::Reject)
                .unwrap();

        assert!(index.get("utt-a").is_some() && index.get("utt-c").is_some());
        let segment = index.get("utt-b").expect("utt-b should be indexed");
        assert_eq!(segment.recording_id, "reco-1");
        assert_eq!(segment.start_time, 8.0);
        assert!(index.get("utt-z").is_none());
        assert_eq!(
            index.recording_ids().into_iter().collect::<Vec<_>>(),
            vec!["reco-1", "reco-2"]
        );
    }

    #[test]
    fn test_load_rejects_three_field_record() {
        let err = SegmentIndex::load(
            records_from_str("segments", "utt-a reco-1 0.0 10.0\nutt-b reco-1 8.0\n"),
            DuplicatePolicy::Reject,
        )
        .unwrap_err();

        assert_eq!(
            err.error_kind,
            DomainErrorKind::Input(InputErrorKind::Malformed {
                file: "segments".to_string(),
                line_number: 2
            })
        );
    }

    #[test]
    fn test_load_rejects_duplicate_utterance_by_default() {
        let err = SegmentIndex::load(
            records_from_str("segments", "utt-a reco-1 0 10\nutt-a reco-1 5 15\n"),
            DuplicatePolicy::Reject,
        )
        .unwrap_err();

        assert_eq!(
            err.error_kind,
            DomainErrorKind::Input(InputErrorKind::DuplicateKey {
                file: "segments".to_string(),
                utterance_id: "utt-a".to_string(),
                first_line: 1,
                second_line: 2
            })
        );
    }

    #[test]
    fn test_load_last_wins_overwrites_duplicate() {
        let index = SegmentIndex::load(
            records_from_str("segments", "utt-a reco-1 0 10\nutt-a reco-2 5 15\n"),
            DuplicatePolicy::LastWins,
        )
        .unwrap();

        assert_eq!(
            index.recording_ids().into_iter().collect::<Vec<_>>(),
            vec!["reco-2"],
            "the overwritten segment should leave no trace"
        );
        let segment = index.get("utt-a").unwrap();
        assert_eq!(segment.recording_id, "reco-2");
        assert_eq!(segment.start_time, 5.0);
    }
}
