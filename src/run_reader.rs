use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::PathBuf;

use anyhow::Context;

use crate::run::Run;

/// Buffered reader over one run with a single record of lookahead.
///
/// The head record lets the merger compare the fronts of two runs without consuming either.
/// Records are held without their line terminator; writers append '\n' when emitting.
#[derive(Debug)]
pub(crate) struct RunReader {
    path: PathBuf,
    reader: BufReader<File>,
    head: Option<String>,
}

impl RunReader {
    pub(crate) fn open(run: &Run) -> Result<RunReader, anyhow::Error> {
        let file = File::open(run.path())
            .with_context(|| format!("open run {}", run.path().display()))?;
        let mut reader = BufReader::new(file);
        let head = Self::read_record(&mut reader)
            .with_context(|| format!("read run {}", run.path().display()))?;
        Ok(
            RunReader {
                path: run.path().clone(),
                reader,
                head,
            }
        )
    }

    fn read_record(reader: &mut BufReader<File>) -> Result<Option<String>, anyhow::Error> {
        let mut line = String::new();
        let bytes = reader.read_line(&mut line)?;
        if bytes > 0 {
            // run files are written with a single '\n' terminator; a trailing '\r' is
            // record data and must survive
            if line.ends_with('\n') {
                line.pop();
            }
            Ok(Some(line))
        } else {
            Ok(None)
        }
    }

    /// The record at the front of the run, or None once the run is exhausted.
    pub(crate) fn head(&self) -> Option<&String> {
        self.head.as_ref()
    }

    /// Consume and return the head record, advancing the lookahead to the next one.
    pub(crate) fn next_record(&mut self) -> Result<Option<String>, anyhow::Error> {
        let next = Self::read_record(&mut self.reader)
            .with_context(|| format!("read run {}", self.path.display()))?;
        Ok(std::mem::replace(&mut self.head, next))
    }

    pub(crate) fn path(&self) -> &PathBuf {
        &self.path
    }
}
