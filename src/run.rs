use std::path::PathBuf;

/// One materialized run: a temporary file holding a contiguous sequence of records.
///
/// Whether the records are sorted is determined by the stage that produced the run -
/// the partitioner emits unsorted runs, the chunk sorter and the merger emit sorted ones.
/// A run is consumed exactly once by the next stage and deleted right after.
#[derive(Debug)]
pub(crate) struct Run {
    path: PathBuf,
    records: u64,
}

impl Run {
    pub(crate) fn new(path: PathBuf, records: u64) -> Run {
        Run {
            path,
            records,
        }
    }

    pub(crate) fn path(&self) -> &PathBuf {
        &self.path
    }

    pub(crate) fn records(&self) -> u64 {
        self.records
    }
}
