//! Local word error rate of a candidate overlap region.
use entity::EditLine;
use std::cmp::Ordering;

/// Word and error counts of a run of ctm-edits lines. Silence lines count
/// towards neither.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RegionScore {
    pub words: usize,
    pub errors: usize,
}

/// Which side of an overlap keeps its lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Winner {
    /// The tail of the earlier utterance
    Current,
    /// The head of the later utterance
    Next,
}

impl RegionScore {
    pub fn of(lines: &[EditLine]) -> Self {
        lines
            .iter()
            .filter(|line| !line.edit_type.is_silence())
            .fold(RegionScore::default(), |score, line| RegionScore {
                words: score.words + 1,
                errors: score.errors + usize::from(line.edit_type.is_error()),
            })
    }

    /// Errors over words; an empty region is perfect unless it somehow has errors.
    pub fn error_rate(&self) -> f64 {
        match (self.words, self.errors) {
            (0, 0) => 0.0,
            (0, _) => f64::INFINITY,
            (words, errors) => errors as f64 / words as f64,
        }
    }

    /// Orders by error rate, then by word count descending: the better region
    /// sorts first.
    pub fn rank(&self, other: &Self) -> Ordering {
        self.error_rate()
            .total_cmp(&other.error_rate())
            .then_with(|| other.words.cmp(&self.words))
    }
}

/// Picks the better region. A region that ranks equal keeps the current
/// utterance's lines.
pub fn choose(current: &RegionScore, next: &RegionScore) -> Winner {
    match next.rank(current) {
        Ordering::Less => Winner::Next,
        Ordering::Equal | Ordering::Greater => Winner::Current,
    }
}
