use std::{
    cell::{Cell, RefCell},
    fs::File,
    io::{self, Write},
    path::Path,
};

use csv::WriterBuilder;
use serde::Serialize;

use crate::{
    core::item::{ItemWriter, ItemWriterResult},
    error::BatchError,
};

/// Serializes chunks of records to a delimited text destination.
///
/// Every chunk is serialized into an in-memory buffer first and only
/// appended to the destination once the whole chunk serialized cleanly, so a
/// failure inside a chunk leaves the destination at the previous commit
/// boundary. `flush` forwards to the underlying writer and is the commit.
pub struct CsvItemWriter<W: Write> {
    out: RefCell<W>,
    delimiter: u8,
    has_headers: bool,
    headers_written: Cell<bool>,
}

impl<W: Write, T: Serialize> ItemWriter<T> for CsvItemWriter<W> {
    fn write(&self, items: &[T]) -> ItemWriterResult {
        if items.is_empty() {
            return Ok(());
        }

        let write_headers = self.has_headers && !self.headers_written.get();

        let mut wtr = WriterBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(write_headers)
            .flexible(false)
            .from_writer(Vec::new());

        for item in items {
            wtr.serialize(item)
                .map_err(|error| BatchError::ItemWriter(error.to_string()))?;
        }

        let buffer = wtr
            .into_inner()
            .map_err(|error| BatchError::ItemWriter(error.to_string()))?;

        self.out
            .borrow_mut()
            .write_all(&buffer)
            .map_err(|error| BatchError::ItemWriter(error.to_string()))?;

        self.headers_written.set(true);

        Ok(())
    }

    /// Flushes the destination. This is the chunk commit boundary.
    fn flush(&self) -> ItemWriterResult {
        self.out
            .borrow_mut()
            .flush()
            .map_err(|error| BatchError::ItemWriter(error.to_string()))
    }
}

impl<W: Write> CsvItemWriter<W> {
    /// Consumes the writer and returns the underlying destination.
    pub fn into_inner(self) -> W {
        self.out.into_inner()
    }
}

/// Builder for configuring CSV item writing.
///
/// Defaults: comma delimiter, no header row.
///
/// # Examples
///
/// ```
/// use person_export_batch::core::item::ItemWriter;
/// use person_export_batch::item::csv::csv_writer::CsvItemWriterBuilder;
///
/// #[derive(serde::Serialize)]
/// struct Person<'a> {
///     first_name: &'a str,
///     last_name: &'a str,
/// }
///
/// let wtr = CsvItemWriterBuilder::new().from_writer(vec![]);
///
/// wtr.write(&[
///     Person { first_name: "JOHN", last_name: "DOE" },
///     Person { first_name: "JANE", last_name: "DAE" },
/// ])
/// .unwrap();
///
/// let data = String::from_utf8(wtr.into_inner()).unwrap();
/// assert_eq!(data, "JOHN,DOE\nJANE,DAE\n");
/// ```
#[derive(Default)]
pub struct CsvItemWriterBuilder {
    delimiter: u8,
    has_headers: bool,
}

impl CsvItemWriterBuilder {
    pub fn new() -> Self {
        Self {
            delimiter: b',',
            has_headers: false,
        }
    }

    /// Sets the field delimiter.
    pub fn delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Sets whether a header row is written before the first chunk.
    pub fn has_headers(mut self, yes: bool) -> Self {
        self.has_headers = yes;
        self
    }

    /// Creates a `CsvItemWriter` appending to the file at `path`.
    ///
    /// # Errors
    /// Returns `BatchError::ItemWriter` when the file cannot be created,
    /// which should fail the run before any record is processed.
    pub fn from_path<P: AsRef<Path>>(self, path: P) -> Result<CsvItemWriter<File>, BatchError> {
        let file =
            File::create(path).map_err(|error| BatchError::ItemWriter(error.to_string()))?;

        Ok(self.from_writer(file))
    }

    /// Creates a `CsvItemWriter` over any `Write` destination.
    pub fn from_writer<W: io::Write>(self, wtr: W) -> CsvItemWriter<W> {
        CsvItemWriter {
            out: RefCell::new(wtr),
            delimiter: self.delimiter,
            has_headers: self.has_headers,
            headers_written: Cell::new(false),
        }
    }
}
