//! Records read from and written to the Kaldi-style text files the resolver
//! works on: segments and ctm-edits lines.

pub mod edit_line;
pub mod error;
pub mod number;
pub mod segment;

pub use edit_line::{EditLine, EditType};
pub use error::Error;
pub use number::VerbatimFloat;
pub use segment::Segment;
