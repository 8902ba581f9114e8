use crate::error::{Error, ParseErrorKind};
use crate::number::VerbatimFloat;
use std::fmt;
use std::str::FromStr;

/// Alignment verdict for one word of a ctm-edits line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditType {
    /// `cor`: hypothesis word matches the reference
    Correct,
    /// `ins`: hypothesis word absent from the reference
    Insertion,
    /// `del`: reference word absent from the hypothesis
    Deletion,
    /// `sub`: hypothesis word differs from the reference
    Substitution,
    /// `sil`: silence or noise, not a word
    Silence,
    /// `fix`: a word already corrected by earlier cleanup, scored as correct
    Fix,
}

impl EditType {
    /// Counts towards the numerator of the local word error rate.
    pub fn is_error(self) -> bool {
        matches!(
            self,
            EditType::Insertion | EditType::Deletion | EditType::Substitution
        )
    }

    pub fn is_silence(self) -> bool {
        self == EditType::Silence
    }
}

impl FromStr for EditType {
    type Err = Error;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        match token {
            "cor" => Ok(EditType::Correct),
            "ins" => Ok(EditType::Insertion),
            "del" => Ok(EditType::Deletion),
            "sub" => Ok(EditType::Substitution),
            "sil" => Ok(EditType::Silence),
            "fix" => Ok(EditType::Fix),
            _ => Err(Error::new(ParseErrorKind::InvalidEditType(
                token.to_string(),
            ))),
        }
    }
}

impl fmt::Display for EditType {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EditType::Correct => write!(fmt, "cor"),
            EditType::Insertion => write!(fmt, "ins"),
            EditType::Deletion => write!(fmt, "del"),
            EditType::Substitution => write!(fmt, "sub"),
            EditType::Silence => write!(fmt, "sil"),
            EditType::Fix => write!(fmt, "fix"),
        }
    }
}

/// One word-level line of ctm-edits:
/// `<utt> <channel> <start> <duration> <hyp-word> <conf> <ref-word> <edit-type> [<extra>...]`
///
/// Times are relative to the start of the utterance's segment. Numeric fields
/// keep their source text and `extra_fields` are carried verbatim.
#[derive(Debug, Clone, PartialEq)]
pub struct EditLine {
    pub utterance_id: String,
    pub channel: String,
    pub start_time: VerbatimFloat,
    pub duration: VerbatimFloat,
    pub hyp_word: String,
    pub confidence: VerbatimFloat,
    pub ref_word: String,
    pub edit_type: EditType,
    pub extra_fields: Vec<String>,
}

impl EditLine {
    /// Number of fields up to and including the edit type.
    pub const MIN_FIELDS: usize = 8;

    /// Temporal midpoint of the word, relative to the utterance start.
    pub fn midpoint(&self) -> f64 {
        self.start_time.value() + self.duration.value() / 2.0
    }
}

impl FromStr for EditLine {
    type Err = Error;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.len() < Self::MIN_FIELDS {
            return Err(Error::new(ParseErrorKind::FieldCount {
                expected: "at least 8",
                found: parts.len(),
            }));
        }

        let duration = VerbatimFloat::parse("duration", parts[3])?;
        if duration.value() < 0.0 {
            return Err(Error::new(ParseErrorKind::NegativeDuration(
                duration.value(),
            )));
        }

        Ok(EditLine {
            utterance_id: parts[0].to_string(),
            channel: parts[1].to_string(),
            start_time: VerbatimFloat::parse("start_time", parts[2])?,
            duration,
            hyp_word: parts[4].to_string(),
            confidence: VerbatimFloat::parse("confidence", parts[5])?,
            ref_word: parts[6].to_string(),
            edit_type: parts[7].parse()?,
            extra_fields: parts[8..].iter().map(|s| s.to_string()).collect(),
        })
    }
}

impl fmt::Display for EditLine {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} {} {} {} {} {} {} {}",
            self.utterance_id,
            self.channel,
            self.start_time,
            self.duration,
            self.hyp_word,
            self.confidence,
            self.ref_word,
            self.edit_type
        )?;
        for field in &self.extra_fields {
            write!(f, " {field}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_render_preserve_formatting() {
        let text = "utt-1 1 0.50 0.250 hello 1.00 hello cor";
        let line: EditLine = text.parse().unwrap();

        assert_eq!(line.utterance_id, "utt-1");
        assert_eq!(line.edit_type, EditType::Correct);
        assert_eq!(line.midpoint(), 0.625);
        assert_eq!(line.to_string(), text);
    }

    #[test]
    fn test_extra_fields_are_carried_verbatim() {
        let text = "utt-1 1 0.5 0.25 hullo 0.8 hello sub tainted";
        let line: EditLine = "utt-1  1 0.5 0.25 hullo 0.8\thello sub tainted"
            .parse()
            .unwrap();

        assert_eq!(line.extra_fields, vec!["tainted".to_string()]);
        assert_eq!(line.to_string(), text, "fields are joined by single spaces");
    }

    #[test]
    fn test_parse_rejects_short_lines() {
        let err = "utt-1 1 0.5 0.25 hello 1.0 hello"
            .parse::<EditLine>()
            .unwrap_err();
        assert_eq!(
            err.error_kind,
            ParseErrorKind::FieldCount {
                expected: "at least 8",
                found: 7
            }
        );
    }

    #[test]
    fn test_parse_rejects_unknown_edit_type() {
        let err = "utt-1 1 0.5 0.25 hello 1.0 hello typo"
            .parse::<EditLine>()
            .unwrap_err();
        assert_eq!(
            err.error_kind,
            ParseErrorKind::InvalidEditType("typo".to_string())
        );
    }

    #[test]
    fn test_parse_rejects_negative_duration() {
        assert!("utt-1 1 0.5 -0.25 hello 1.0 hello cor"
            .parse::<EditLine>()
            .is_err());
    }

    #[test]
    fn test_edit_type_classification() {
        for edit_type in [
            EditType::Insertion,
            EditType::Deletion,
            EditType::Substitution,
        ] {
            assert!(edit_type.is_error(), "{edit_type} should count as an error");
        }
        for edit_type in [EditType::Correct, EditType::Silence, EditType::Fix] {
            assert!(
                !edit_type.is_error(),
                "{edit_type} should not count as an error"
            );
        }
        assert!(EditType::Silence.is_silence());
        assert!(!EditType::Fix.is_silence());
    }
}
