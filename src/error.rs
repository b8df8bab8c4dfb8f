use thiserror::Error;

/// Error type shared by every batch component.
///
/// All errors raised during a step are fatal to the job: there is no retry
/// or skip policy. The completion listener is the only place where errors
/// are logged and swallowed.
#[derive(Error, Debug)]
pub enum BatchError {
    #[error("ItemReader error: {0}")]
    ItemReader(String),

    #[error("ItemWriter error: {0}")]
    ItemWriter(String),

    #[error("ItemProcessor error: {0}")]
    Processor(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("IO error: {0}")]
    Io(std::io::Error),

    #[error("Step failed: {0}")]
    Step(String),
}
