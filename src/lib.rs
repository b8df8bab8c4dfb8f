/*!
 # person-export-batch

 A chunk-oriented batch application that exports person records: it reads
 persons from a CSV resource, uppercases their names, writes them to a CSV
 file, uploads that file to a remote host over SFTP, and logs the exported
 contents on completion.

 ## Core Concepts

 - **Job:** the full ordered sequence of steps executed for one run, with an
   incrementing run identifier and completion listeners.
 - **Step:** one sequential phase of a job. Either chunk-oriented
   (read, process, write in fixed-size committed batches) or a tasklet
   (a single opaque unit of work, here the SFTP upload).
 - **ItemReader / ItemProcessor / ItemWriter:** the three seams of a
   chunk-oriented step.

 ## The job

 ```text
 export-persons (chunk size 10)          sftp-upload (tasklet)
 CSV reader -> uppercase -> CSV writer -> upload FILE_PATH to /tmp/output.txt
 ```

 Both steps are wired in `main` from an explicit [`config::BatchConfig`]
 read from the environment; there is no hidden container. A chunk is
 committed by flushing the writer, and a failure inside a chunk leaves the
 output at the previous commit boundary. Any step error fails the job; the
 remaining steps are skipped and the process exits nonzero.
*/

/// Core module for batch operations
pub mod core;

/// Error types for batch operations
pub mod error;

#[doc(inline)]
pub use error::*;

/// Item readers and writers
pub mod item;

/// Tasklets (single unit-of-work steps)
pub mod tasklet;

/// Application configuration
pub mod config;

/// Job completion listener
pub mod listener;

/// The person record and its processor
pub mod person;
