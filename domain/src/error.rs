//! Error types for the `domain` layer.
use std::error::Error as StdError;
use std::fmt;
use tokio::task::JoinError;

/// Top-level domain error type.
/// Errors are modeled as a `source` holding the lower-level error (a parse
/// error, an I/O error, a worker failure) and an `error_kind` tree that says
/// which stage failed and carries the context needed to find the offending
/// records: file and line for input problems, recording and utterance ids for
/// resolution problems. Every error is fatal for the run.
#[derive(Debug)]
pub struct Error {
    pub source: Option<Box<dyn StdError + Send + Sync>>,
    pub error_kind: DomainErrorKind,
}

/// Enum representing the major categories of errors that can occur in the `domain` layer.
#[derive(Debug, PartialEq)]
pub enum DomainErrorKind {
    Input(InputErrorKind),
    Resolution(ResolutionErrorKind),
    System(SystemErrorKind),
}

/// Problems with the content of the segments or ctm-edits files.
#[derive(Debug, PartialEq)]
pub enum InputErrorKind {
    /// A record does not have the expected shape; `source` holds the parse error.
    Malformed { file: String, line_number: usize },
    /// Two segments records share an utterance id.
    DuplicateKey {
        file: String,
        utterance_id: String,
        first_line: usize,
        second_line: usize,
    },
    /// Utterance ids in the ctm-edits file are not strictly increasing.
    Unsorted {
        file: String,
        line_number: usize,
        previous: String,
        current: String,
    },
    /// A ctm-edits line names an utterance absent from the segments.
    UnknownUtterance {
        file: String,
        line_number: usize,
        utterance_id: String,
    },
}

/// Violations detected while resolving a single recording.
#[derive(Debug, PartialEq)]
pub enum ResolutionErrorKind {
    /// Adjacent utterances of a recording are out of order.
    Sequencing {
        recording_id: String,
        current: String,
        next: String,
    },
    /// A recording from the segments has no ctm-edits at all.
    EmptyRecording { recording_id: String },
    /// An utterance being resolved has no segment.
    MissingSegment {
        recording_id: String,
        utterance_id: String,
    },
}

#[derive(Debug, PartialEq)]
pub enum SystemErrorKind {
    /// Reading or writing `path` failed; `source` holds the `std::io::Error`.
    Io { path: String },
    /// A parallel resolution worker panicked or was cancelled.
    Worker,
}

impl Error {
    pub fn new(error_kind: DomainErrorKind) -> Self {
        Error {
            source: None,
            error_kind,
        }
    }

    pub(crate) fn malformed<E>(file: &str, line_number: usize, err: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Error {
            source: Some(Box::new(err)),
            error_kind: DomainErrorKind::Input(InputErrorKind::Malformed {
                file: file.to_string(),
                line_number,
            }),
        }
    }

    pub(crate) fn io(path: &str, err: std::io::Error) -> Self {
        Error {
            source: Some(Box::new(err)),
            error_kind: DomainErrorKind::System(SystemErrorKind::Io {
                path: path.to_string(),
            }),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.error_kind {
            DomainErrorKind::Input(kind) => match kind {
                InputErrorKind::Malformed { file, line_number } => {
                    write!(f, "{file}:{line_number}: malformed record")?
                }
                InputErrorKind::DuplicateKey {
                    file,
                    utterance_id,
                    first_line,
                    second_line,
                } => write!(
                    f,
                    "{file}:{second_line}: utterance {utterance_id} already defined on line {first_line}"
                )?,
                InputErrorKind::Unsorted {
                    file,
                    line_number,
                    previous,
                    current,
                } => write!(
                    f,
                    "{file}:{line_number}: utterance {current} follows {previous}; \
                     ctm-edits must be sorted by utterance id"
                )?,
                InputErrorKind::UnknownUtterance {
                    file,
                    line_number,
                    utterance_id,
                } => write!(
                    f,
                    "{file}:{line_number}: utterance {utterance_id} not found in segments"
                )?,
            },
            DomainErrorKind::Resolution(kind) => match kind {
                ResolutionErrorKind::Sequencing {
                    recording_id,
                    current,
                    next,
                } => write!(
                    f,
                    "recording {recording_id}: could not resolve overlap between {current} and {next}; \
                     next utterance does not sort after the current one"
                )?,
                ResolutionErrorKind::MissingSegment {
                    recording_id,
                    utterance_id,
                } => write!(
                    f,
                    "recording {recording_id}: could not find utterance {utterance_id} in segments"
                )?,
                ResolutionErrorKind::EmptyRecording { recording_id } => write!(
                    f,
                    "recording {recording_id}: no ctm-edits for recording; something is wrong with the input ctm-edits"
                )?,
            },
            DomainErrorKind::System(kind) => match kind {
                SystemErrorKind::Io { path } => write!(f, "{path}: I/O error")?,
                SystemErrorKind::Worker => write!(f, "resolution worker failed")?,
            },
        }

        match &self.source {
            Some(source) => write!(f, ": {source}"),
            None => Ok(()),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn StdError + 'static))
    }
}

impl From<JoinError> for Error {
    fn from(err: JoinError) -> Self {
        Error {
            source: Some(Box::new(err)),
            error_kind: DomainErrorKind::System(SystemErrorKind::Worker),
        }
    }
}
