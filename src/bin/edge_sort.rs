use std::path::PathBuf;

use anyhow::{anyhow, Context};
use simple_logger::SimpleLogger;

use edge_sort::sort::Sort;

// cargo run -r --bin edge_sort -- <input> <total-records> <partitions>
fn main() -> Result<(), anyhow::Error> {
    SimpleLogger::new()
        .with_level(log::LevelFilter::Info)
        .init()?;

    let mut args = std::env::args().skip(1);
    let usage = "usage: edge_sort <input> <total-records> <partitions>";
    let input = PathBuf::from(args.next().ok_or_else(|| anyhow!(usage))?);
    let total_records: u64 = args
        .next()
        .ok_or_else(|| anyhow!(usage))?
        .parse()
        .with_context(|| "total-records must be a non negative integer")?;
    let partitions: u64 = args
        .next()
        .ok_or_else(|| anyhow!(usage))?
        .parse()
        .with_context(|| "partitions must be a positive integer")?;

    let mut sort = Sort::new(input);
    sort.with_total_records(total_records);
    sort.with_partitions(partitions);
    let output = sort.sort()?;
    println!("{}", output.display());
    Ok(())
}
