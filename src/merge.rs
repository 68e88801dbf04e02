use std::io::{BufWriter, Write};

use anyhow::Context;

use crate::context::TempContext;
use crate::run::Run;
use crate::run_reader::RunReader;

/// Two way streaming merge of a pair of sorted runs.
///
/// Reads one record at a time from each side, emitting the smaller head; on equal heads the
/// left run is consumed first. Once one side is exhausted the other is streamed straight
/// through. Both inputs are deleted only after the merged output is completely written, so a
/// failure mid merge leaves the inputs intact and only the partial output to discard.
pub(crate) fn merge_pair(a: Run, b: Run, context: &mut TempContext) -> Result<Run, anyhow::Error> {
    let mut left = RunReader::open(&a)
        .with_context(|| "merge: open left run")?;
    let mut right = RunReader::open(&b)
        .with_context(|| "merge: open right run")?;

    let (merged_file, merged_path) = context.create()
        .with_context(|| "merge: create merged run")?;
    let mut writer = BufWriter::new(merged_file);
    let mut merged: u64 = 0;

    loop {
        let next = match (left.head(), right.head()) {
            (Some(l), Some(r)) if l <= r => left.next_record()?,
            (Some(_), Some(_)) => right.next_record()?,
            _ => break,
        };
        match next {
            Some(record) => {
                writeln!(writer, "{}", record)
                    .with_context(|| format!("merge: write run {}", merged_path.display()))?;
                merged += 1;
            }
            None => break,
        }
    }
    for exhausted in [&mut left, &mut right] {
        while let Some(record) = exhausted.next_record()? {
            writeln!(writer, "{}", record)
                .with_context(|| format!("merge: write run {}", merged_path.display()))?;
            merged += 1;
        }
    }
    writer.flush()
        .with_context(|| format!("merge: flush run {}", merged_path.display()))?;

    let left_path = left.path().clone();
    let right_path = right.path().clone();
    drop(left);
    drop(right);
    context.remove(&left_path)?;
    context.remove(&right_path)?;

    log::debug!("Merged {} and {} records into {}", a.records(), b.records(), merged_path.display());
    Ok(Run::new(merged_path, merged))
}

/// Reduce a list of sorted runs to a single sorted run by repeated pairwise merge passes.
///
/// Each pass pairs adjacent runs left to right and carries an odd trailing run over to the
/// next pass unmerged, halving the list until one run remains. The passes form a binary merge
/// tree of depth ceil(log2(N)), so the total I/O volume is O(records * log2(N)). Iterative on
/// purpose, so very large run counts cannot exhaust the call stack.
pub(crate) fn merge_all(mut runs: Vec<Run>, context: &mut TempContext) -> Result<Run, anyhow::Error> {
    let mut pass = 0;
    while runs.len() > 1 {
        pass += 1;
        log::info!("Merge pass {}: {} runs", pass, runs.len());
        let mut next: Vec<Run> = Vec::with_capacity((runs.len() + 1) / 2);
        let mut iter = runs.into_iter();
        while let Some(a) = iter.next() {
            match iter.next() {
                Some(b) => next.push(merge_pair(a, b, context)?),
                None => next.push(a),
            }
        }
        runs = next;
    }
    // the partitioner emits at least one run even for empty input
    Ok(runs.remove(0))
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use crate::context::TempContext;
    use crate::merge::{merge_all, merge_pair};
    use crate::run::Run;

    fn write_run(dir: &Path, name: &str, records: &[&str]) -> Result<Run, anyhow::Error> {
        let path = dir.join(name);
        let mut content = records.join("\n");
        if !records.is_empty() {
            content.push('\n');
        }
        std::fs::write(&path, content)?;
        Ok(Run::new(path, records.len() as u64))
    }

    #[test]
    fn test_merge_pair() -> Result<(), anyhow::Error> {
        let tmp_dir = tempfile::tempdir()?;
        let mut context = TempContext::new(tmp_dir.path(), "run-", ".tmp");
        let a = write_run(tmp_dir.path(), "a.tmp", &["1", "3", "5"])?;
        let b = write_run(tmp_dir.path(), "b.tmp", &["2", "4"])?;
        let a_path = a.path().clone();
        let b_path = b.path().clone();
        let merged = merge_pair(a, b, &mut context)?;
        assert_eq!(merged.records(), 5);
        assert_eq!(std::fs::read_to_string(merged.path())?, "1\n2\n3\n4\n5\n");
        // inputs deleted after full consumption
        assert!(!a_path.exists());
        assert!(!b_path.exists());
        Ok(())
    }

    #[test]
    fn test_merge_pair_empty_side() -> Result<(), anyhow::Error> {
        let tmp_dir = tempfile::tempdir()?;
        let mut context = TempContext::new(tmp_dir.path(), "run-", ".tmp");
        let a = write_run(tmp_dir.path(), "a.tmp", &[])?;
        let b = write_run(tmp_dir.path(), "b.tmp", &["x", "y"])?;
        let merged = merge_pair(a, b, &mut context)?;
        assert_eq!(std::fs::read_to_string(merged.path())?, "x\ny\n");
        Ok(())
    }

    #[test]
    fn test_merge_pair_duplicates() -> Result<(), anyhow::Error> {
        let tmp_dir = tempfile::tempdir()?;
        let mut context = TempContext::new(tmp_dir.path(), "run-", ".tmp");
        let a = write_run(tmp_dir.path(), "a.tmp", &["b", "b", "c"])?;
        let b = write_run(tmp_dir.path(), "b.tmp", &["a", "b", "c"])?;
        let merged = merge_pair(a, b, &mut context)?;
        assert_eq!(std::fs::read_to_string(merged.path())?, "a\nb\nb\nb\nc\nc\n");
        Ok(())
    }

    #[test]
    fn test_merge_all_odd_list() -> Result<(), anyhow::Error> {
        let tmp_dir = tempfile::tempdir()?;
        let mut context = TempContext::new(tmp_dir.path(), "run-", ".tmp");
        let runs = vec![
            write_run(tmp_dir.path(), "a.tmp", &["1", "3", "5"])?,
            write_run(tmp_dir.path(), "b.tmp", &["2", "4"])?,
            write_run(tmp_dir.path(), "c.tmp", &["0"])?,
        ];
        let merged = merge_all(runs, &mut context)?;
        assert_eq!(std::fs::read_to_string(merged.path())?, "0\n1\n2\n3\n4\n5\n");
        Ok(())
    }

    #[test]
    fn test_merge_all_single_run_unchanged() -> Result<(), anyhow::Error> {
        let tmp_dir = tempfile::tempdir()?;
        let mut context = TempContext::new(tmp_dir.path(), "run-", ".tmp");
        let run = write_run(tmp_dir.path(), "a.tmp", &["only"])?;
        let path = run.path().clone();
        let merged = merge_all(vec![run], &mut context)?;
        assert_eq!(merged.path(), &path);
        assert_eq!(std::fs::read_to_string(merged.path())?, "only\n");
        Ok(())
    }
}
