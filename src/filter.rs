use std::io::{BufRead, Write};

use anyhow::Context;

/// True when the first two tab separated columns of an edge record are equal.
///
/// A record with fewer than two columns is never a self loop.
pub fn is_self_loop(record: &str) -> bool {
    match record.split_once('\t') {
        Some((from, rest)) => {
            let to = rest.split('\t').next().unwrap_or(rest);
            from == to
        }
        None => false,
    }
}

/// Copy tab separated `(from, to)` records from `reader` to `writer`, dropping self loops.
///
/// Order preserving and streaming, buffering no more than one line. Returns the number of
/// records written.
pub fn filter_self_loops<R, W>(reader: R, writer: &mut W) -> Result<u64, anyhow::Error>
where
    R: BufRead,
    W: Write,
{
    let mut written: u64 = 0;
    let mut dropped: u64 = 0;
    for line in reader.lines() {
        let line = line.with_context(|| "self loop filter: read input")?;
        if is_self_loop(&line) {
            dropped += 1;
            continue;
        }
        writeln!(writer, "{}", line)
            .with_context(|| "self loop filter: write output")?;
        written += 1;
    }
    log::debug!("Self loop filter dropped {} of {} records", dropped, written + dropped);
    Ok(written)
}
