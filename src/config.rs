use std::path::{Path, PathBuf};

use crate::data::loader::FileDataSource;

/// Environment variable naming the data directory.
pub const DATA_DIR_ENV: &str = "EMIGRANT_DATA_DIR";
pub const DEFAULT_DATA_DIR: &str = "data";

const RECORD_FILES: [&str; 3] = ["records.parquet", "records.json", "records.csv"];
const YEARLY_FILES: [&str; 2] = ["yearly.json", "yearly.csv"];

/// The two files one fetch reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataPaths {
    pub dir: PathBuf,
    pub records: PathBuf,
    pub yearly: PathBuf,
}

impl DataPaths {
    /// Pick the first existing candidate of each kind in `dir`. When none
    /// exists the first candidate is kept so the fetch reports a clear
    /// "file not found" instead of silently loading nothing.
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        let records = first_existing(&dir, &RECORD_FILES);
        let yearly = first_existing(&dir, &YEARLY_FILES);
        Self {
            dir,
            records,
            yearly,
        }
    }

    /// Directory from the first CLI argument, then `EMIGRANT_DATA_DIR`,
    /// then `./data`.
    pub fn resolve(cli_arg: Option<String>) -> Self {
        let dir = cli_arg
            .or_else(|| std::env::var(DATA_DIR_ENV).ok())
            .filter(|d| !d.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_DATA_DIR.to_string());
        Self::in_dir(dir)
    }

    pub fn source(&self) -> FileDataSource {
        FileDataSource::new(&self.records, &self.yearly)
    }
}

fn first_existing(dir: &Path, candidates: &[&str]) -> PathBuf {
    candidates
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.is_file())
        .unwrap_or_else(|| dir.join(candidates[0]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_files_fall_back_to_first_candidate() {
        let paths = DataPaths::in_dir("no/such/dir");
        assert_eq!(paths.records, PathBuf::from("no/such/dir/records.parquet"));
        assert_eq!(paths.yearly, PathBuf::from("no/such/dir/yearly.json"));
    }

    #[test]
    fn cli_argument_wins() {
        let paths = DataPaths::resolve(Some("elsewhere".to_string()));
        assert_eq!(paths.dir, PathBuf::from("elsewhere"));
    }
}
