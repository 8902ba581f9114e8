//! Line-oriented record reading with file/line context for diagnostics.
use crate::error::Error;
use service::config::STDIO_PATH;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::marker::PhantomData;
use std::path::Path;
use std::str::FromStr;

/// A record together with the 1-based line it was read from.
#[derive(Debug, Clone, PartialEq)]
pub struct Numbered<T> {
    pub line_number: usize,
    pub record: T,
}

/// Iterator over the parsed records of one whitespace-delimited file.
/// Blank lines are skipped; any parse failure is reported with file and line.
pub struct Records<T> {
    source_name: String,
    lines: io::Lines<Box<dyn BufRead + Send>>,
    line_number: usize,
    _record: PhantomData<T>,
}

impl<T> Records<T> {
    /// Opens `path` for reading; `-` reads stdin.
    pub fn open(path: &Path) -> Result<Self, Error> {
        let name = path.display().to_string();
        let reader: Box<dyn BufRead + Send> = if path.as_os_str() == STDIO_PATH {
            Box::new(BufReader::new(io::stdin()))
        } else {
            let file = File::open(path).map_err(|err| Error::io(&name, err))?;
            Box::new(BufReader::new(file))
        };
        Ok(Self::from_reader(name, reader))
    }

    pub fn from_reader(source_name: impl Into<String>, reader: Box<dyn BufRead + Send>) -> Self {
        Records {
            source_name: source_name.into(),
            lines: reader.lines(),
            line_number: 0,
            _record: PhantomData,
        }
    }

    pub fn source_name(&self) -> &str {
        &self.source_name
    }

    /// Number of lines consumed so far, blank lines included.
    pub fn lines_read(&self) -> usize {
        self.line_number
    }
}

impl<T> Iterator for Records<T>
where
    T: FromStr<Err = entity::Error>,
{
    type Item = Result<Numbered<T>, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = self.lines.next()?;
            self.line_number += 1;
            let line = match line {
                Ok(line) => line,
                // Not valid UTF-8: a bad record, not a failing device.
                Err(err) if err.kind() == io::ErrorKind::InvalidData => {
                    return Some(Err(Error::malformed(
                        &self.source_name,
                        self.line_number,
                        err,
                    )))
                }
                Err(err) => return Some(Err(Error::io(&self.source_name, err))),
            };

            if line.trim().is_empty() {
                continue;
            }

            return Some(
                line.parse::<T>()
                    .map(|record| Numbered {
                        line_number: self.line_number,
                        record,
                    })
                    .map_err(|err| Error::malformed(&self.source_name, self.line_number, err)),
            );
        }
    }
}

#[cfg(test)]
pub(crate) fn records_from_str<T>(name: &str, text: &'static str) -> Records<T> {
    Records::from_reader(name, Box::new(text.as_bytes()))
}
