//! Writes resolved transcripts back out as ctm-edits.
use crate::error::Error;
use crate::transcript::RecordingTranscript;
use service::config::STDIO_PATH;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

pub struct Emitter {
    target: String,
    writer: Box<dyn Write + Send>,
    lines_written: usize,
}

impl Emitter {
    /// Creates (or truncates) `path` for writing; `-` writes stdout.
    pub fn create(path: &Path) -> Result<Self, Error> {
        let target = path.display().to_string();
        let writer: Box<dyn Write + Send> = if path.as_os_str() == STDIO_PATH {
            Box::new(BufWriter::new(io::stdout()))
        } else {
            let file = File::create(path).map_err(|err| Error::io(&target, err))?;
            Box::new(BufWriter::new(file))
        };
        Ok(Self::from_writer(target, writer))
    }

    pub fn from_writer(target: impl Into<String>, writer: Box<dyn Write + Send>) -> Self {
        Emitter {
            target: target.into(),
            writer,
            lines_written: 0,
        }
    }

    /// Writes the surviving lines of `transcript`, one ctm-edits record per line.
    pub fn write_recording(&mut self, transcript: &RecordingTranscript) -> Result<usize, Error> {
        let mut written = 0;
        for line in transcript.surviving_lines() {
            writeln!(self.writer, "{line}").map_err(|err| Error::io(&self.target, err))?;
            written += 1;
        }
        self.lines_written += written;
        Ok(written)
    }

    /// Flushes the output and returns the number of lines written in total.
    pub fn finish(mut self) -> Result<usize, Error> {
        self.writer
            .flush()
            .map_err(|err| Error::io(&self.target, err))?;
        Ok(self.lines_written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// Write target the test can read back after the emitter is done with it.
    #[derive(Clone, Default)]
    struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().write(buf)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_write_recording_emits_surviving_lines_verbatim() {
        let mut transcript = RecordingTranscript::new("reco-1");
        transcript.push_utterance(
            "utt-a",
            vec![
                "utt-a 1 0.00 0.50 hi 1.00 hi cor".parse().unwrap(),
                "utt-a 1 0.50 0.50 there 0.75 their sub tainted".parse().unwrap(),
            ],
        );
        transcript.push_utterance(
            "utt-b",
            vec!["utt-b 1 0.10 0.30 <eps> 1.0 <eps> sil".parse().unwrap()],
        );
        transcript.drop_head(0, 1);

        let buffer = SharedBuffer::default();
        let mut emitter = Emitter::from_writer("out", Box::new(buffer.clone()));
        assert_eq!(emitter.write_recording(&transcript).unwrap(), 2);
        assert_eq!(emitter.finish().unwrap(), 2);

        let text = String::from_utf8(buffer.0.lock().unwrap().clone()).unwrap();
        assert_eq!(
            text,
            "utt-a 1 0.50 0.50 there 0.75 their sub tainted\n\
             utt-b 1 0.10 0.30 <eps> 1.0 <eps> sil\n"
        );
    }
}
