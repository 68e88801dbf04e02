//! This crate implements an external merge sort for newline delimited text files that are too
//! large to sort in memory, together with the downstream consumers that make the sorted order
//! useful for graph edge lists: adjacent duplicate aggregation and self loop filtering.
//!
//! The motivation for writing this crate was computing edge multiplicities for very large
//! directed graph edge lists, for example the link graph extracted from a Wikipedia dump, where
//! the edge file holds billions of two column tab separated records. Sorting the file first makes
//! duplicate edges adjacent, after which a single streaming pass can collapse them into
//! `(edge, count)` pairs with constant memory.
//!
//! Records are compared as raw bytes over the full line, equivalent to sorting with the "C"
//! locale. The input is partitioned into bounded runs, each run is sorted in memory, and the
//! sorted runs are merged pairwise until a single globally sorted file remains. Temporary files
//! are deleted as soon as they are consumed, so peak temporary storage stays at roughly one extra
//! copy of the dataset.
//!
//! # Examples
//! ```no_run
//! use std::path::PathBuf;
//! use edge_sort::sort::Sort;
//!
//! fn sort_edges(input: PathBuf, tmp: PathBuf) -> Result<PathBuf, anyhow::Error> {
//!     let mut sort = Sort::new(input);
//!     // the number of lines in the input file
//!     sort.with_total_records(1_000_000);
//!     // advisory number of initial runs. When the record count does not divide evenly one
//!     // additional short run is produced.
//!     sort.with_partitions(16);
//!     // set the directory for intermediate results. The default is the system temp dir -
//!     // std::env::temp_dir(), however, for large files it is recommended to provide a dedicated
//!     // directory for intermediate files, preferably on the same file system as the output.
//!     sort.with_tmp_dir(tmp);
//!     // writes <input>.sorted and returns its path
//!     sort.sort()
//! }
//! ```

pub(crate) mod config;
pub(crate) mod context;
pub(crate) mod run;
pub(crate) mod run_reader;
pub(crate) mod partition;
pub(crate) mod chunk_sort;
pub(crate) mod merge;

pub mod sort;
pub mod aggregate;
pub mod filter;
