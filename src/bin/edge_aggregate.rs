use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::PathBuf;

use anyhow::{anyhow, Context};
use simple_logger::SimpleLogger;

use edge_sort::aggregate::{write_counts, Aggregate};
use edge_sort::filter::is_self_loop;

// cargo run -r --bin edge_aggregate -- <sorted-input> [--drop-self-loops]
//
// The input must be sorted so that duplicate edges are adjacent, for example the output of
// edge_sort. Prints two tab separated columns: the record and its multiplicity.
fn main() -> Result<(), anyhow::Error> {
    SimpleLogger::new()
        .with_level(log::LevelFilter::Info)
        .init()?;

    let usage = "usage: edge_aggregate <sorted-input> [--drop-self-loops]";
    let mut input: Option<PathBuf> = None;
    let mut drop_self_loops = false;
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--drop-self-loops" => drop_self_loops = true,
            _ if input.is_none() => input = Some(PathBuf::from(arg)),
            _ => return Err(anyhow!(usage)),
        }
    }
    let input = input.ok_or_else(|| anyhow!(usage))?;

    let file = File::open(&input)
        .with_context(|| format!("open {}", input.display()))?;
    let lines = BufReader::new(file).lines();
    let stdout = io::stdout();
    let mut out = stdout.lock();
    if drop_self_loops {
        let filtered = lines.filter(|line| match line {
            Ok(record) => !is_self_loop(record),
            Err(_) => true,
        });
        write_counts(Aggregate::new(filtered), &mut out)?;
    } else {
        write_counts(Aggregate::new(lines), &mut out)?;
    }
    Ok(())
}
