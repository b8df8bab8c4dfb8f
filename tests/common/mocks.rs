//! Mock readers and writers for exercising error paths.
use mockall::mock;

use person_export_batch::{
    core::item::{ItemReader, ItemReaderResult, ItemWriter, ItemWriterResult},
    person::Person,
};

mock! {
    pub PersonReader {}
    impl ItemReader<Person> for PersonReader {
        fn read(&self) -> ItemReaderResult<Person>;
    }
}

mock! {
    pub PersonWriter {}
    impl ItemWriter<Person> for PersonWriter {
        fn write(&self, items: &[Person]) -> ItemWriterResult;
        fn flush(&self) -> ItemWriterResult;
        fn open(&self) -> ItemWriterResult;
        fn close(&self) -> ItemWriterResult;
    }
}
