use std::{
    io::{Read, Seek, SeekFrom, Write},
    path::{Path, PathBuf},
};

use csv::{ReaderBuilder, StringRecord, Writer, WriterBuilder};
use fs_err as fs;
use log::{debug, info};
use tempfile::NamedTempFile;

use crate::{
    domain::expense::ExpenseRow,
    error::{Error, Result},
};

/// The first line of every expense file, and the only schema marker it has.
pub const HEADER: [&str; 5] = ["id", "date", "amount", "category", "description"];

/// Append-only CSV file holding every expense.
///
/// No handle is kept between calls: each operation opens the file, reads or
/// appends, and drops it before returning.
#[derive(Debug, Clone)]
pub struct Store {
    path: PathBuf,
}

impl Store {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Creates the file with only the header row if it does not exist yet.
    pub fn ensure_initialized(&self) -> Result<()> {
        if self.path.exists() {
            return Ok(());
        }

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let file = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&self.path)?;

        let mut writer = Writer::from_writer(file);
        writer.write_record(HEADER)?;
        writer.flush()?;

        info!("created expense file {}", self.path.display());
        Ok(())
    }

    /// One more than the largest well-formed id, or 1 for an empty store.
    ///
    /// Scans the whole file on every call.
    pub fn next_id(&self) -> Result<u64> {
        let max = self.read_all()?.iter().filter_map(ExpenseRow::id).max();
        Ok(max.map_or(1, |max| max + 1))
    }

    /// Appends one row without touching existing content.
    ///
    /// The row is encoded up front and handed over in a single write, so a
    /// failure leaves either the whole line or nothing.
    pub fn append(&self, row: &ExpenseRow) -> Result<()> {
        self.ensure_initialized()?;

        let mut line = encode(row)?;

        let mut file = fs::OpenOptions::new()
            .read(true)
            .append(true)
            .open(&self.path)?;

        if !ends_with_newline(&mut file)? {
            line.insert(0, b'\n');
        }

        file.write_all(&line)?;
        file.sync_data()?;

        info!("appended expense {} to {}", row.id, self.path.display());
        Ok(())
    }

    /// Every row in file order, creating the file first if needed.
    pub fn read_all(&self) -> Result<Vec<ExpenseRow>> {
        self.ensure_initialized()?;

        let rows = read(fs::File::open(&self.path)?, &self.path)?;
        debug!("read {} expenses from {}", rows.len(), self.path.display());

        Ok(rows)
    }
}

/// Reads rows from a CSV source, checking the header first.
///
/// Short rows are padded with empty fields instead of failing; judging the
/// values is left to whoever consumes them.
pub fn read(reader: impl Read, origin: &Path) -> Result<Vec<ExpenseRow>> {
    let mut reader = ReaderBuilder::new().flexible(true).from_reader(reader);

    let headers = reader.headers()?;
    if headers.iter().ne(HEADER) {
        return Err(Error::CorruptStore {
            path: origin.to_path_buf(),
            found: headers.iter().collect::<Vec<_>>().join(","),
        });
    }

    reader
        .records()
        .map(|record| -> Result<ExpenseRow> { Ok(to_row(&record?)) })
        .collect()
}

/// Writes a complete, independent copy of `rows` to `destination`.
///
/// The copy goes to a temporary file next to the destination first and is
/// renamed over it once complete.
pub fn write(rows: &[ExpenseRow], destination: &Path) -> Result<()> {
    let dir = destination
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));

    let mut temp = NamedTempFile::new_in(dir)?;
    {
        let mut writer = WriterBuilder::new()
            .has_headers(false)
            .from_writer(temp.as_file_mut());
        writer.write_record(HEADER)?;
        for row in rows {
            writer.serialize(row)?;
        }
        writer.flush()?;
    }

    temp.persist(destination).map_err(|err| err.error)?;
    Ok(())
}

fn to_row(record: &StringRecord) -> ExpenseRow {
    let field = |index| record.get(index).unwrap_or_default().to_string();

    ExpenseRow {
        id: field(0),
        date: field(1),
        amount: field(2),
        category: field(3),
        description: field(4),
    }
}

fn encode(row: &ExpenseRow) -> Result<Vec<u8>> {
    let mut writer = WriterBuilder::new().has_headers(false).from_writer(vec![]);
    writer.serialize(row)?;

    writer
        .into_inner()
        .map_err(|err| Error::FileError(err.into_error()))
}

fn ends_with_newline(file: &mut fs::File) -> Result<bool> {
    if file.metadata()?.len() == 0 {
        return Ok(true);
    }

    let mut last = [0u8; 1];
    file.seek(SeekFrom::End(-1))?;
    file.read_exact(&mut last)?;

    Ok(last[0] == b'\n')
}
