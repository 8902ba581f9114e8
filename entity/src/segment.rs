use crate::error::{Error, ParseErrorKind};
use crate::number::VerbatimFloat;
use std::str::FromStr;

/// A time span of a recording assigned to one utterance.
///
/// Parsed from a segments line: `<utterance-id> <recording-id> <start> <end> [<channel>]`.
/// The optional channel field is accepted and ignored.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub utterance_id: String,
    pub recording_id: String,
    pub start_time: f64,
    pub end_time: f64,
}

impl Segment {
    pub fn duration(&self) -> f64 {
        self.end_time - self.start_time
    }
}

impl FromStr for Segment {
    type Err = Error;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = line.split_whitespace().collect();
        if !matches!(parts.len(), 4 | 5) {
            return Err(Error::new(ParseErrorKind::FieldCount {
                expected: "4 or 5",
                found: parts.len(),
            }));
        }

        let start_time = parse_seconds("start_time", parts[2])?;
        let end_time = parse_seconds("end_time", parts[3])?;
        if start_time < 0.0 || end_time <= start_time {
            return Err(Error::new(ParseErrorKind::InvalidInterval {
                start: start_time,
                end: end_time,
            }));
        }

        Ok(Segment {
            utterance_id: parts[0].to_string(),
            recording_id: parts[1].to_string(),
            start_time,
            end_time,
        })
    }
}

// NaN compares false against everything, so it must not reach the interval check.
fn parse_seconds(field: &'static str, text: &str) -> Result<f64, Error> {
    VerbatimFloat::parse(field, text).map(|number| number.value())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_four_fields() {
        let segment: Segment = "utt-1 reco-A 10.0 25.5".parse().unwrap();
        assert_eq!(segment.utterance_id, "utt-1");
        assert_eq!(segment.recording_id, "reco-A");
        assert_eq!(segment.start_time, 10.0);
        assert_eq!(segment.end_time, 25.5);
        assert_eq!(segment.duration(), 15.5);
    }

    #[test]
    fn test_parse_ignores_channel_field() {
        let segment: Segment = "utt-1 reco-A 0 3 1".parse().unwrap();
        assert_eq!(segment.end_time, 3.0);
    }

    #[test]
    fn test_parse_rejects_wrong_field_count() {
        let err = "utt-1 reco-A 0".parse::<Segment>().unwrap_err();
        assert_eq!(
            err.error_kind,
            ParseErrorKind::FieldCount {
                expected: "4 or 5",
                found: 3
            }
        );
        assert!("a b 0 1 2 3".parse::<Segment>().is_err());
    }

    #[test]
    fn test_parse_rejects_bad_interval() {
        let err = "utt-1 reco-A 5 5".parse::<Segment>().unwrap_err();
        assert_eq!(
            err.error_kind,
            ParseErrorKind::InvalidInterval {
                start: 5.0,
                end: 5.0
            }
        );
        assert!("utt-1 reco-A -1 5".parse::<Segment>().is_err());
    }

    #[test]
    fn test_parse_rejects_non_finite_times() {
        let err = "utt-1 reco-A NaN 5".parse::<Segment>().unwrap_err();
        assert_eq!(
            err.error_kind,
            ParseErrorKind::InvalidNumber {
                field: "start_time",
                value: "NaN".to_string()
            },
            "a NaN start must not pass the interval check"
        );

        let err = "utt-1 reco-A 0 inf".parse::<Segment>().unwrap_err();
        assert_eq!(
            err.error_kind,
            ParseErrorKind::InvalidNumber {
                field: "end_time",
                value: "inf".to_string()
            }
        );
    }

    #[test]
    fn test_parse_rejects_non_numeric_time() {
        let err = "utt-1 reco-A zero 5".parse::<Segment>().unwrap_err();
        assert!(matches!(
            err.error_kind,
            ParseErrorKind::InvalidNumber {
                field: "start_time",
                ..
            }
        ));
    }
}
