use clap::builder::TypedValueParser as _;
use clap::Parser;
use dotenvy::dotenv;
use log::LevelFilter;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Path value that stands for stdin (input) or stdout (output).
pub const STDIO_PATH: &str = "-";

/// What to do when two segments records share an utterance id.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DuplicatePolicy {
    /// Abort the run.
    Reject,
    /// Keep the record read last and log a warning.
    LastWins,
}

#[derive(Debug, PartialEq, Eq)]
pub struct DuplicatePolicyParseError;

impl FromStr for DuplicatePolicy {
    type Err = DuplicatePolicyParseError;
    fn from_str(policy: &str) -> Result<DuplicatePolicy, Self::Err> {
        match policy.to_lowercase().as_str() {
            "reject" => Ok(DuplicatePolicy::Reject),
            "last-wins" => Ok(DuplicatePolicy::LastWins),
            _ => Err(DuplicatePolicyParseError),
        }
    }
}

impl fmt::Display for DuplicatePolicy {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            DuplicatePolicy::Reject => write!(f, "reject"),
            DuplicatePolicy::LastWins => write!(f, "last-wins"),
        }
    }
}

/// Resolves overlaps between ctm-edits of overlapping segments of the same
/// recording, keeping the locally more accurate hypothesis for each overlap.
#[derive(Clone, Debug, Parser)]
#[command(name = "resolve-ctm-edits-overlaps", author, version, about, long_about = None)]
pub struct Config {
    /// Segments file, one `<utterance-id> <recording-id> <start> <end> [<channel>]` per line
    #[arg(env = "SEGMENTS")]
    segments: PathBuf,

    /// Input ctm-edits, sorted by utterance id (`-` reads stdin)
    #[arg(env = "CTM_EDITS_IN")]
    ctm_edits_in: PathBuf,

    /// Output ctm-edits with overlaps resolved (`-` writes stdout)
    #[arg(env = "CTM_EDITS_OUT")]
    ctm_edits_out: PathBuf,

    /// Higher value for more verbose logging. Values above 2 enable debug output.
    #[arg(long, env, default_value_t = 0)]
    pub verbose: u8,

    /// Set the log level verbosity threshold (level) to control what gets displayed on console output
    #[arg(
        short,
        long,
        env,
        default_value_t = LevelFilter::Info,
        value_parser = clap::builder::PossibleValuesParser::new(["OFF", "ERROR", "WARN", "INFO", "DEBUG", "TRACE"])
            .map(|s| s.parse::<LevelFilter>().unwrap()),
        )]
    pub log_level_filter: LevelFilter,

    /// How to treat segments records that repeat an utterance id.
    #[arg(
        long,
        env,
        default_value_t = DuplicatePolicy::Reject,
        value_parser = clap::builder::PossibleValuesParser::new(["reject", "last-wins"])
            .map(|s| s.parse::<DuplicatePolicy>().unwrap()),
        )]
    pub duplicate_segments: DuplicatePolicy,

    /// Resolve recordings on parallel blocking workers. Output order is unchanged.
    #[arg(long, env)]
    pub parallel: bool,
}

impl Config {
    pub fn new() -> Self {
        // Load .env file first
        dotenv().ok();
        // Then parse the command line parameters and flags
        Config::parse()
    }

    pub fn segments(&self) -> &Path {
        &self.segments
    }

    pub fn ctm_edits_in(&self) -> &Path {
        &self.ctm_edits_in
    }

    pub fn ctm_edits_out(&self) -> &Path {
        &self.ctm_edits_out
    }

    /// The log level actually used: the more verbose of `--log-level-filter`
    /// and the level implied by `--verbose`.
    pub fn effective_log_level(&self) -> LevelFilter {
        let from_verbose = match self.verbose {
            0..=2 => LevelFilter::Info,
            3 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        };
        self.log_level_filter.max(from_verbose)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
