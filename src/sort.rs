use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context};

use crate::chunk_sort::sort_run;
use crate::config::Config;
use crate::context::TempContext;
use crate::merge::merge_all;
use crate::partition::partition;
use crate::run::Run;

const TMP_PREFIX: &str = "run-";
const TMP_SUFFIX: &str = ".tmp";

/// Sort a newline delimited text file that does not fit in memory.
///
/// The sorted result is written to `<input>.sorted`; the input file is never modified. Records
/// are compared as raw bytes over the full line, the equivalent of `sort` under the "C"
/// locale.
///
/// # Examples
/// ```no_run
/// use std::path::PathBuf;
/// use edge_sort::sort::Sort;
///
/// fn sort_edges(input: PathBuf, tmp: PathBuf) -> Result<PathBuf, anyhow::Error> {
///     let mut sort = Sort::new(input);
///     sort.with_total_records(1_000_000);
///     sort.with_partitions(16);
///     sort.with_tmp_dir(tmp);
///     sort.sort()
/// }
/// ```
pub struct Sort {
    input: PathBuf,
    tmp: PathBuf,
    total_records: u64,
    partitions: u64,
}

impl Sort {
    /// Create a default Sort definition for `input`.
    ///
    /// * intermediate files go to the system temp dir - std::env::temp_dir()
    /// * the declared record count defaults to 0, matching an empty input
    /// * the partition count defaults to 1
    pub fn new(input: PathBuf) -> Sort {
        Sort {
            input,
            tmp: std::env::temp_dir(),
            total_records: 0,
            partitions: 1,
        }
    }

    /// Set directory for intermediate files. By default use std::env::temp_dir()
    /// It is recommended for large files to create a dedicated directory for intermediate
    /// files on the same file system as the output target
    pub fn with_tmp_dir(&mut self, tmp: PathBuf) {
        self.tmp = tmp;
    }

    /// Declare the number of records in the input. The sort fails when the declared count
    /// does not match what the partitioner actually reads.
    pub fn with_total_records(&mut self, total_records: u64) {
        self.total_records = total_records;
    }

    /// Set the desired number of initial runs. The count is advisory: when the record count
    /// does not divide evenly the partitioner produces one additional short run.
    pub fn with_partitions(&mut self, partitions: u64) {
        self.partitions = partitions;
    }

    fn create_config(&self) -> Result<Config, anyhow::Error> {
        if self.partitions < 1 {
            bail!("invalid configuration: partitions must be at least 1");
        }
        if !self.input.is_file() {
            bail!("invalid configuration: input {} is not a readable file", self.input.display());
        }
        let mut output = self.input.clone().into_os_string();
        output.push(".sorted");
        Ok(
            Config::new(
                self.input.clone(),
                PathBuf::from(output),
                self.tmp.clone(),
                TMP_PREFIX.to_string(),
                TMP_SUFFIX.to_string(),
                self.total_records,
                self.partitions,
            )
        )
    }

    /// Sort the input file into `<input>.sorted` and return the output path.
    ///
    /// On any failure every temporary run created so far is removed and no partial output is
    /// renamed into place.
    pub fn sort(&self) -> Result<PathBuf, anyhow::Error> {
        let config = self.create_config()?;
        let mut context = TempContext::new(config.tmp(), config.tmp_prefix(), config.tmp_suffix());
        match Self::internal_sort(&config, &mut context) {
            Ok(output) => Ok(output),
            Err(e) => {
                context.cleanup();
                Err(e)
            }
        }
    }

    fn internal_sort(config: &Config, context: &mut TempContext) -> Result<PathBuf, anyhow::Error> {
        log::info!("Start external sort of {}", config.input().display());
        let runs = partition(config, context)?;

        let actual: u64 = runs.iter().map(Run::records).sum();
        if actual != config.total_records() {
            bail!(
                "invalid configuration: declared {} records but {} holds {}",
                config.total_records(),
                config.input().display(),
                actual,
            );
        }

        let mut sorted = Vec::with_capacity(runs.len());
        for run in runs {
            sorted.push(sort_run(run, context)?);
        }

        let merged = merge_all(sorted, context)?;
        let merged_path = merged.path().clone();
        std::fs::rename(&merged_path, config.output())
            .with_context(|| anyhow!("Rename {} to {}", merged_path.display(), config.output().display()))?;
        context.forget(&merged_path);
        log::info!("Finish external sort, {} records written to {}", merged.records(), config.output().display());
        Ok(config.output().clone())
    }

    /// Verify that the input file is non decreasing under byte order.
    pub fn check(&self) -> Result<bool, anyhow::Error> {
        is_sorted(&self.input)
    }
}

/// Check that a file's records are non decreasing under byte order.
pub fn is_sorted(path: &Path) -> Result<bool, anyhow::Error> {
    let file = File::open(path)
        .with_context(|| format!("check: open {}", path.display()))?;
    let reader = BufReader::new(file);
    let mut previous: Option<String> = None;
    for line in reader.lines() {
        let current = line
            .with_context(|| format!("check: read {}", path.display()))?;
        if let Some(previous) = &previous {
            if previous > &current {
                return Ok(false);
            }
        }
        previous = Some(current);
    }
    Ok(true)
}
