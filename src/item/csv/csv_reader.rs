use csv::{ReaderBuilder, StringRecordsIntoIter, Terminator, Trim};
use serde::de::DeserializeOwned;
use std::{cell::RefCell, fs::File, io::Read, marker::PhantomData, path::Path};

use crate::{
    core::item::{ItemReader, ItemReaderResult},
    error::BatchError,
};

/// Reads delimited text and deserializes each row into a record, one row at
/// a time.
///
/// Rows are bound positionally when the source carries no header line, so a
/// row whose field count does not match the record shape fails with
/// `BatchError::ItemReader` (parsing is strict, not flexible). The reader is
/// forward-only; build a fresh one for every run.
///
/// # Examples
///
/// ```
/// use person_export_batch::core::item::ItemReader;
/// use person_export_batch::item::csv::csv_reader::CsvItemReaderBuilder;
/// use serde::Deserialize;
///
/// #[derive(Debug, Deserialize)]
/// struct Person {
///     first_name: String,
///     last_name: String,
/// }
///
/// let data = "John,Doe\nJane,Dae";
///
/// let reader = CsvItemReaderBuilder::<Person>::new()
///     .delimiter(b',')
///     .from_reader(data.as_bytes());
///
/// let person = reader.read().unwrap().unwrap();
/// assert_eq!(person.first_name, "John");
/// assert_eq!(person.last_name, "Doe");
/// ```
pub struct CsvItemReader<T, R> {
    /// Iterator over the CSV records.
    ///
    /// `RefCell` provides the interior mutability needed to advance the
    /// iterator behind the `&self` of `ItemReader::read`.
    records: RefCell<StringRecordsIntoIter<R>>,
    _phantom: PhantomData<T>,
}

impl<T: DeserializeOwned, R: Read> ItemReader<T> for CsvItemReader<T, R> {
    /// Reads and deserializes the next row.
    ///
    /// # Returns
    /// - `Ok(Some(record))` if a row was read and deserialized
    /// - `Ok(None)` when the source is exhausted
    /// - `Err(BatchError::ItemReader)` on a malformed row
    fn read(&self) -> ItemReaderResult<T> {
        match self.records.borrow_mut().next() {
            Some(Ok(string_record)) => string_record
                .deserialize(None)
                .map(Some)
                .map_err(|error| BatchError::ItemReader(error.to_string())),
            Some(Err(error)) => Err(BatchError::ItemReader(error.to_string())),
            None => Ok(None),
        }
    }
}

/// Builder for configuring CSV item reading.
///
/// Defaults: comma delimiter, CRLF terminator, no header row.
pub struct CsvItemReaderBuilder<T> {
    delimiter: u8,
    terminator: Terminator,
    has_headers: bool,
    _phantom: PhantomData<T>,
}

impl<T> Default for CsvItemReaderBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> CsvItemReaderBuilder<T> {
    pub fn new() -> Self {
        Self {
            delimiter: b',',
            terminator: Terminator::CRLF,
            has_headers: false,
            _phantom: PhantomData,
        }
    }

    /// Sets the field delimiter.
    pub fn delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Sets the line terminator.
    pub fn terminator(mut self, terminator: Terminator) -> Self {
        self.terminator = terminator;
        self
    }

    /// Sets whether the first row is a header line and should be skipped.
    pub fn has_headers(mut self, yes: bool) -> Self {
        self.has_headers = yes;
        self
    }

    /// Creates a `CsvItemReader` from any `Read` source.
    pub fn from_reader<R: Read>(self, rdr: R) -> CsvItemReader<T, R> {
        let rdr = ReaderBuilder::new()
            .trim(Trim::All)
            .delimiter(self.delimiter)
            .terminator(self.terminator)
            .has_headers(self.has_headers)
            .flexible(false)
            .from_reader(rdr);

        CsvItemReader {
            records: RefCell::new(rdr.into_records()),
            _phantom: PhantomData,
        }
    }

    /// Creates a `CsvItemReader` from a file path.
    ///
    /// # Errors
    /// Returns `BatchError::ItemReader` when the file cannot be opened,
    /// which should fail the run before any record is processed.
    pub fn from_path<P: AsRef<Path>>(self, path: P) -> Result<CsvItemReader<T, File>, BatchError> {
        let rdr = ReaderBuilder::new()
            .trim(Trim::All)
            .delimiter(self.delimiter)
            .terminator(self.terminator)
            .has_headers(self.has_headers)
            .flexible(false)
            .from_path(path)
            .map_err(|error| BatchError::ItemReader(error.to_string()))?;

        Ok(CsvItemReader {
            records: RefCell::new(rdr.into_records()),
            _phantom: PhantomData,
        })
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    use super::*;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Person {
        first_name: String,
        last_name: String,
    }

    #[test]
    fn rows_are_bound_positionally_without_headers() {
        let data = "John,Doe\nJane,Dae";

        let reader = CsvItemReaderBuilder::<Person>::new().from_reader(data.as_bytes());

        let mut people = Vec::new();
        while let Some(person) = reader.read().unwrap() {
            people.push(person);
        }

        assert_eq!(
            people,
            vec![
                Person {
                    first_name: "John".to_string(),
                    last_name: "Doe".to_string(),
                },
                Person {
                    first_name: "Jane".to_string(),
                    last_name: "Dae".to_string(),
                },
            ]
        );
    }

    #[test]
    fn row_with_wrong_field_count_is_a_read_error() {
        let data = "John,Doe\nJane,Dae,extra";

        let reader = CsvItemReaderBuilder::<Person>::new().from_reader(data.as_bytes());

        assert!(reader.read().unwrap().is_some());
        assert!(matches!(reader.read(), Err(BatchError::ItemReader(_))));
    }

    #[test]
    fn surrounding_whitespace_is_trimmed() {
        let data = " John , Doe ";

        let reader = CsvItemReaderBuilder::<Person>::new().from_reader(data.as_bytes());

        let person = reader.read().unwrap().unwrap();
        assert_eq!(person.first_name, "John");
        assert_eq!(person.last_name, "Doe");
    }

    #[test]
    fn missing_input_file_fails_before_any_read() {
        let result =
            CsvItemReaderBuilder::<Person>::new().from_path("/nonexistent/sample-data.csv");

        assert!(matches!(result, Err(BatchError::ItemReader(_))));
    }
}
