use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::PathBuf;

use anyhow::Context;

use crate::config::Config;
use crate::context::TempContext;
use crate::run::Run;

/// Buffers records into the current run file and seals it into a [Run].
pub(crate) struct RunWriter {
    writer: BufWriter<File>,
    path: PathBuf,
    records: u64,
}

impl RunWriter {
    pub(crate) fn create(context: &mut TempContext) -> Result<RunWriter, anyhow::Error> {
        let (file, path) = context.create()?;
        Ok(
            RunWriter {
                writer: BufWriter::new(file),
                path,
                records: 0,
            }
        )
    }

    pub(crate) fn write_record(&mut self, record: &str) -> Result<(), anyhow::Error> {
        writeln!(self.writer, "{}", record)
            .with_context(|| format!("write run {}", self.path.display()))?;
        self.records += 1;
        Ok(())
    }

    pub(crate) fn records(&self) -> u64 {
        self.records
    }

    pub(crate) fn finish(mut self) -> Result<Run, anyhow::Error> {
        self.writer.flush()
            .with_context(|| format!("flush run {}", self.path.display()))?;
        Ok(Run::new(self.path, self.records))
    }
}

/// Split the input into runs of `chunk_size` records each.
///
/// The input is read once, sequentially. A run is sealed as soon as it holds `chunk_size`
/// records and a new one is opened for the next record, so no run is empty unless the input
/// itself is empty, in which case a single empty run is produced. The trailing run is flushed
/// even when short.
pub(crate) fn partition(config: &Config, context: &mut TempContext) -> Result<Vec<Run>, anyhow::Error> {
    let chunk_size = config.chunk_size();
    let file = File::open(config.input())
        .with_context(|| format!("partition: open input {}", config.input().display()))?;
    let mut reader = BufReader::new(file);

    let mut runs = Vec::new();
    let mut current = RunWriter::create(context)
        .with_context(|| "partition: create run")?;
    let mut total: u64 = 0;
    let mut line = String::new();
    while reader.read_line(&mut line)
        .with_context(|| format!("partition: read input {}", config.input().display()))? != 0
    {
        // strip one line terminator, LF or CRLF; anything else is record data
        if line.ends_with('\n') {
            line.pop();
        }
        if line.ends_with('\r') {
            line.pop();
        }
        if current.records() == chunk_size {
            runs.push(current.finish()?);
            current = RunWriter::create(context)
                .with_context(|| "partition: create run")?;
        }
        current.write_record(&line)?;
        total += 1;
        line.clear();
    }
    runs.push(current.finish()?);

    log::info!("Partitioned {} records into {} runs of up to {} records", total, runs.len(), chunk_size);
    Ok(runs)
}
