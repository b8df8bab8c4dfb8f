use crate::error::BatchError;

/// Result of a single read attempt: `Ok(None)` signals the end of the input.
pub type ItemReaderResult<T> = Result<Option<T>, BatchError>;

/// Result of processing a single item.
pub type ItemProcessorResult<T> = Result<T, BatchError>;

/// Result of writing a chunk of items.
pub type ItemWriterResult = Result<(), BatchError>;

/// Produces a lazy, finite, forward-only sequence of items.
///
/// A reader is not restartable mid-stream; a fresh instance is built for
/// every run.
pub trait ItemReader<T> {
    fn read(&self) -> ItemReaderResult<T>;
}

/// Pure transformation of one input item into one output item.
///
/// Implementations must not perform I/O or keep shared mutable state. An
/// error fails the chunk containing the item.
pub trait ItemProcessor<I, O> {
    fn process(&self, item: &I) -> ItemProcessorResult<O>;
}

/// Writes chunks of items to a destination.
///
/// `write` receives one whole chunk; `flush` is the commit boundary called
/// once per chunk. `open` and `close` frame the step and default to no-ops.
pub trait ItemWriter<T> {
    fn write(&self, items: &[T]) -> ItemWriterResult;

    fn flush(&self) -> ItemWriterResult {
        Ok(())
    }

    fn open(&self) -> ItemWriterResult {
        Ok(())
    }

    fn close(&self) -> ItemWriterResult {
        Ok(())
    }
}

/// Processor that returns items unchanged.
#[derive(Default)]
pub struct PassThroughProcessor;

impl<T: Clone> ItemProcessor<T, T> for PassThroughProcessor {
    fn process(&self, item: &T) -> ItemProcessorResult<T> {
        Ok(item.clone())
    }
}
