use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("could not access expense file: {0}")]
    FileError(#[from] std::io::Error),
    #[error("could not read or write expense rows: {0}")]
    CsvError(#[from] csv::Error),
    #[error("expense file {} is corrupt: expected header `id,date,amount,category,description`, found `{found}`", .path.display())]
    CorruptStore { path: PathBuf, found: String },
    #[error("refusing to export over the expense file itself ({})", .0.display())]
    ExportOverwritesStore(PathBuf),
    #[error(transparent)]
    BusinessError(#[from] crate::domain::error::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
