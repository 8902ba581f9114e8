use entity::EditLine;
use std::ops::Range;

/// One utterance's lines within a recording, as a range into the recording's arena.
#[derive(Debug, Clone, PartialEq)]
pub struct UtteranceSpan {
    pub utterance_id: String,
    pub lines: Range<usize>,
}

/// All ctm-edits lines of one recording, stored once, plus the ordered
/// utterances that own them. Overlap resolution only ever shrinks spans, so
/// dropping a prefix or suffix of an utterance never copies lines.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordingTranscript {
    recording_id: String,
    lines: Vec<EditLine>,
    utterances: Vec<UtteranceSpan>,
}

impl RecordingTranscript {
    pub fn new(recording_id: impl Into<String>) -> Self {
        RecordingTranscript {
            recording_id: recording_id.into(),
            lines: Vec::new(),
            utterances: Vec::new(),
        }
    }

    pub fn recording_id(&self) -> &str {
        &self.recording_id
    }

    /// Appends an utterance after the ones already present.
    pub fn push_utterance(&mut self, utterance_id: impl Into<String>, lines: Vec<EditLine>) {
        let start = self.lines.len();
        self.lines.extend(lines);
        self.utterances.push(UtteranceSpan {
            utterance_id: utterance_id.into(),
            lines: start..self.lines.len(),
        });
    }

    pub fn utterances(&self) -> &[UtteranceSpan] {
        &self.utterances
    }

    pub fn utterance_lines(&self, index: usize) -> &[EditLine] {
        &self.lines[self.utterances[index].lines.clone()]
    }

    /// Drops the first `count` surviving lines of utterance `index`.
    pub fn drop_head(&mut self, index: usize, count: usize) {
        let span = &mut self.utterances[index].lines;
        span.start = (span.start + count).min(span.end);
    }

    /// Keeps only the first `keep` surviving lines of utterance `index`.
    pub fn truncate_tail(&mut self, index: usize, keep: usize) {
        let span = &mut self.utterances[index].lines;
        span.end = (span.start + keep).min(span.end);
    }

    /// Surviving lines in utterance order.
    pub fn surviving_lines(&self) -> impl Iterator<Item = &EditLine> + '_ {
        self.utterances
            .iter()
            .flat_map(move |span| self.lines[span.lines.clone()].iter())
    }

    pub fn surviving_line_count(&self) -> usize {
        self.utterances.iter().map(|span| span.lines.len()).sum()
    }

    /// Lines read for this recording, dropped ones included.
    pub fn total_line_count(&self) -> usize {
        self.lines.len()
    }
}

#[cfg(test)]
pub(crate) fn edit_line(utterance_id: &str, start: f64, duration: f64, edit_type: &str) -> EditLine {
    format!("{utterance_id} 1 {start} {duration} w 1.0 w {edit_type}")
        .parse()
        .expect("test ctm-edits line should parse")
}
