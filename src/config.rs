use std::path::PathBuf;

#[derive(Clone)]
pub(crate) struct Config {
    input: PathBuf,
    output: PathBuf,
    tmp: PathBuf,
    tmp_prefix: String,
    tmp_suffix: String,
    total_records: u64,
    partitions: u64,
}

impl Config {
    pub(crate) fn new(
        input: PathBuf,
        output: PathBuf,
        tmp: PathBuf,
        tmp_prefix: String,
        tmp_suffix: String,
        total_records: u64,
        partitions: u64,
    ) -> Config {
        Config {
            input,
            output,
            tmp,
            tmp_prefix,
            tmp_suffix,
            total_records,
            partitions,
        }
    }

    pub(crate) fn input(&self) -> &PathBuf {
        &self.input
    }

    pub(crate) fn output(&self) -> &PathBuf {
        &self.output
    }

    pub(crate) fn tmp(&self) -> &PathBuf {
        &self.tmp
    }

    pub(crate) fn tmp_prefix(&self) -> &String {
        &self.tmp_prefix
    }

    pub(crate) fn tmp_suffix(&self) -> &String {
        &self.tmp_suffix
    }

    pub(crate) fn total_records(&self) -> u64 {
        self.total_records
    }

    /// Target record count per initial run. Never zero, so a declared record count smaller
    /// than the partition count degrades to one record per run.
    pub(crate) fn chunk_size(&self) -> u64 {
        std::cmp::max(self.total_records / self.partitions, 1)
    }
}
