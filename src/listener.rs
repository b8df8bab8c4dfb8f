use std::{
    fs::File,
    io::{self, BufRead, BufReader},
    path::{Path, PathBuf},
};

use log::{info, warn};

use crate::core::job::{BatchStatus, JobExecution, JobExecutionListener};

/// Listener that verifies the job result by logging the exported file.
///
/// On a completed run it re-opens the output file and emits its contents
/// line by line. Read errors are logged and swallowed; the job outcome is
/// already determined when the listener runs and never changes here. On a
/// failed run the read-back is skipped entirely.
pub struct JobCompletionListener {
    file_path: PathBuf,
}

impl JobCompletionListener {
    pub fn new<P: AsRef<Path>>(file_path: P) -> Self {
        Self {
            file_path: file_path.as_ref().to_path_buf(),
        }
    }

    /// Reads the output file back, returning its lines in order.
    fn read_back(&self) -> io::Result<Vec<String>> {
        let file = File::open(&self.file_path)?;
        BufReader::new(file).lines().collect()
    }
}

impl JobExecutionListener for JobCompletionListener {
    fn after_job(&self, job_execution: &JobExecution) {
        if job_execution.status != BatchStatus::Completed {
            return;
        }

        info!("Job finished, verifying the results");

        match self.read_back() {
            Ok(lines) => {
                for line in lines {
                    info!("{}", line);
                }
            }
            Err(error) => {
                warn!(
                    "Could not read back {}: {}",
                    self.file_path.display(),
                    error
                );
            }
        }
    }
}
