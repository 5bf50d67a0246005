//! Checks that a data directory looks loadable before any source is opened.

use crate::config::DataConfig;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum PreflightError {
    #[error("data path is empty")]
    EmptyPath,

    #[error("cannot read data path {path}: {cause}")]
    Unreadable {
        path: PathBuf,
        #[source]
        cause: io::Error,
    },

    #[error("data path {0} is not a directory")]
    NotADirectory(PathBuf),

    #[error("file {file} not found in data path {dir}")]
    MissingFile { file: String, dir: PathBuf },
}

pub fn check_data_dir(dir: &Path, data: &DataConfig) -> Result<(), PreflightError> {
    if dir.as_os_str().is_empty() {
        return Err(PreflightError::EmptyPath);
    }

    let metadata = fs::metadata(dir).map_err(|cause| PreflightError::Unreadable {
        path: dir.to_path_buf(),
        cause,
    })?;
    if !metadata.is_dir() {
        return Err(PreflightError::NotADirectory(dir.to_path_buf()));
    }

    for file in data.required_files() {
        if !dir.join(file).is_file() {
            return Err(PreflightError::MissingFile {
                file: file.to_string(),
                dir: dir.to_path_buf(),
            });
        }
        info!("Found required data file: {}", file);
    }

    Ok(())
}
