use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};

use anyhow::Context;

use crate::context::TempContext;
use crate::run::Run;

/// Sort one run in memory, byte lexicographic over the full record.
///
/// This is the only stage that holds a whole run in memory, which bounds peak memory to one
/// chunk of records. The unsorted input run is deleted once the sorted run is written. `str`
/// comparison in Rust is a plain byte comparison, the same order the merger uses, so the
/// global merge invariant holds across stages.
pub(crate) fn sort_run(run: Run, context: &mut TempContext) -> Result<Run, anyhow::Error> {
    let file = File::open(run.path())
        .with_context(|| format!("chunk sort: open run {}", run.path().display()))?;
    let mut reader = BufReader::new(file);

    let mut records: Vec<String> = Vec::with_capacity(run.records() as usize);
    let mut line = String::new();
    while reader.read_line(&mut line)
        .with_context(|| format!("chunk sort: read run {}", run.path().display()))? != 0
    {
        // run files are written with a single '\n' terminator; a trailing '\r' is
        // record data and must survive
        if line.ends_with('\n') {
            line.pop();
        }
        records.push(std::mem::take(&mut line));
    }
    records.sort_unstable();

    let (sorted_file, sorted_path) = context.create()
        .with_context(|| "chunk sort: create sorted run")?;
    let mut writer = BufWriter::new(sorted_file);
    for record in &records {
        writeln!(writer, "{}", record)
            .with_context(|| format!("chunk sort: write run {}", sorted_path.display()))?;
    }
    writer.flush()
        .with_context(|| format!("chunk sort: flush run {}", sorted_path.display()))?;

    context.remove(run.path())?;
    log::debug!("Sorted run of {} records into {}", records.len(), sorted_path.display());
    Ok(Run::new(sorted_path, records.len() as u64))
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use crate::chunk_sort::sort_run;
    use crate::context::TempContext;
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
    fn test_sorts_byte_lexicographic() -> Result<(), anyhow::Error> {
        let tmp_dir = tempfile::tempdir()?;
        let mut context = TempContext::new(tmp_dir.path(), "run-", ".tmp");
        // 'Z' (0x5a) sorts before 'a' (0x61) in byte order, and "10" before "2"
        let run = write_run(tmp_dir.path(), "run.tmp", &["a", "Z", "2", "10"])?;
        let unsorted_path = run.path().clone();
        let sorted = sort_run(run, &mut context)?;
        let content = std::fs::read_to_string(sorted.path())?;
        assert_eq!(content, "10\n2\nZ\na\n");
        assert!(!unsorted_path.exists());
        Ok(())
    }

    #[test]
    fn test_empty_run() -> Result<(), anyhow::Error> {
        let tmp_dir = tempfile::tempdir()?;
        let mut context = TempContext::new(tmp_dir.path(), "run-", ".tmp");
        let run = write_run(tmp_dir.path(), "run.tmp", &[])?;
        let sorted = sort_run(run, &mut context)?;
        assert_eq!(sorted.records(), 0);
        assert_eq!(std::fs::read_to_string(sorted.path())?, "");
        Ok(())
    }
}
