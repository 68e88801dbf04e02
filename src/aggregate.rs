use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::Path;

use anyhow::{anyhow, Context};

/// Collapse maximal groups of equal adjacent records into `(record, count)` pairs.
///
/// The input must already be sorted so that duplicates are adjacent; the aggregator performs
/// no sorting of its own. It holds exactly one pending accumulator: a record equal to the
/// pending one increments its count, a different record emits the pending pair and starts a
/// new accumulator, and stream exhaustion emits the final pair. An empty stream emits
/// nothing.
///
/// A record that compares below its predecessor proves the input was not sorted and ends the
/// iteration with an error rather than producing silently wrong counts.
///
/// # Examples
/// ```no_run
/// use edge_sort::aggregate::Aggregate;
///
/// fn count_edges(path: &std::path::Path) -> Result<(), anyhow::Error> {
///     for pair in Aggregate::from_path(path)? {
///         let (edge, count) = pair?;
///         println!("{}\t{}", edge, count);
///     }
///     Ok(())
/// }
/// ```
pub struct Aggregate<I> {
    records: I,
    pending: Option<(String, u64)>,
    line_number: u64,
    failed: bool,
}

impl Aggregate<io::Lines<BufReader<File>>> {
    /// Aggregate a sorted file, one record per line.
    pub fn from_path(path: &Path) -> Result<Self, anyhow::Error> {
        let file = File::open(path)
            .with_context(|| format!("aggregate: open {}", path.display()))?;
        Ok(Aggregate::new(BufReader::new(file).lines()))
    }
}

impl<I> Aggregate<I>
where
    I: Iterator<Item = io::Result<String>>,
{
    pub fn new(records: I) -> Self {
        Aggregate {
            records,
            pending: None,
            line_number: 0,
            failed: false,
        }
    }
}

impl<I> Iterator for Aggregate<I>
where
    I: Iterator<Item = io::Result<String>>,
{
    type Item = Result<(String, u64), anyhow::Error>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        loop {
            match self.records.next() {
                Some(Err(e)) => {
                    self.failed = true;
                    return Some(Err(anyhow!("aggregate: read line {}: {}", self.line_number + 1, e)));
                }
                Some(Ok(record)) => {
                    self.line_number += 1;
                    match &mut self.pending {
                        Some((pending, count)) if *pending == record => {
                            *count += 1;
                        }
                        Some((pending, _)) if record < *pending => {
                            self.failed = true;
                            return Some(Err(anyhow!(
                                "aggregate: input is not sorted at line {}: {:?} follows {:?}",
                                self.line_number,
                                record,
                                pending,
                            )));
                        }
                        _ => {
                            let previous = self.pending.replace((record, 1));
                            if let Some(pair) = previous {
                                return Some(Ok(pair));
                            }
                        }
                    }
                }
                None => {
                    return self.pending.take().map(Ok);
                }
            }
        }
    }
}

/// Write aggregated pairs as two tab separated columns, one pair per line.
pub fn write_counts<I, W>(aggregate: Aggregate<I>, writer: &mut W) -> Result<(), anyhow::Error>
where
    I: Iterator<Item = io::Result<String>>,
    W: Write,
{
    for pair in aggregate {
        let (record, count) = pair?;
        writeln!(writer, "{}\t{}", record, count)
            .with_context(|| "aggregate: write output")?;
    }
    Ok(())
}
