use std::{
    sync::atomic::{AtomicU64, Ordering},
    time::{Duration, Instant},
};

use log::info;
use uuid::Uuid;

use crate::BatchError;

use super::{
    build_name,
    step::{Step, StepExecution},
};

/// Type alias for job execution results.
type JobResult<T> = Result<T, BatchError>;

/// Final status of a batch job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchStatus {
    /// The job is currently running.
    Started,
    /// Every step of the job completed successfully.
    Completed,
    /// A step failed; the remaining steps were not executed.
    Failed,
}

/// Hands out an incrementing run identifier so that repeated invocations of
/// the same job definition do not collide on identity.
#[derive(Default)]
pub struct RunIdIncrementer {
    counter: AtomicU64,
}

impl RunIdIncrementer {
    pub fn next(&self) -> u64 {
        self.counter.fetch_add(1, Ordering::Relaxed) + 1
    }
}

/// Details of a single job run.
#[derive(Debug)]
pub struct JobExecution {
    /// Unique identifier for this execution
    pub id: Uuid,
    /// Incrementing run identifier, distinct across runs of the same job
    pub run_id: u64,
    /// Name of the job definition
    pub job_name: String,
    /// Final status of the run
    pub status: BatchStatus,
    pub start: Instant,
    pub end: Instant,
    pub duration: Duration,
}

/// Callback invoked by the orchestrator once all steps have settled.
///
/// Listeners observe the outcome; they cannot change it. Errors raised inside
/// a listener must be handled by the listener itself.
pub trait JobExecutionListener {
    fn after_job(&self, job_execution: &JobExecution);
}

/// Represents a job that can be executed.
pub trait Job {
    /// Runs the job and returns the result of the job execution.
    ///
    /// # Returns
    /// - `Ok(JobExecution)` when every step completes successfully
    /// - `Err(BatchError)` when a step fails
    fn run(&self) -> JobResult<JobExecution>;
}

/// A configured sequence of steps executed in order, with no branching.
pub struct JobInstance<'a> {
    /// Unique identifier for this job instance
    id: Uuid,
    /// Human-readable name for the job
    name: String,
    /// Collection of steps that make up this job, in execution order
    steps: Vec<&'a dyn Step>,
    /// Listeners invoked after the run settles
    listeners: Vec<&'a dyn JobExecutionListener>,
    /// Source of run identifiers for repeated invocations
    incrementer: RunIdIncrementer,
}

impl Job for JobInstance<'_> {
    fn run(&self) -> JobResult<JobExecution> {
        let start = Instant::now();
        let run_id = self.incrementer.next();

        info!(
            "Start of job: {}, run: {}, id: {}",
            self.name, run_id, self.id
        );

        let mut failure = None;

        // Execute steps strictly in order, stopping at the first failure
        for step in &self.steps {
            let mut step_execution = StepExecution::new(step.name());

            if let Err(error) = step.execute(&mut step_execution) {
                failure = Some(error);
                break;
            }
        }

        let status = if failure.is_none() {
            BatchStatus::Completed
        } else {
            BatchStatus::Failed
        };

        let job_execution = JobExecution {
            id: self.id,
            run_id,
            job_name: self.name.clone(),
            status,
            start,
            end: Instant::now(),
            duration: start.elapsed(),
        };

        for listener in &self.listeners {
            listener.after_job(&job_execution);
        }

        info!(
            "End of job: {}, run: {}, status: {:?}",
            self.name, run_id, status
        );

        match failure {
            None => Ok(job_execution),
            Some(error) => Err(error),
        }
    }
}

/// Builder for creating a job instance.
#[derive(Default)]
pub struct JobBuilder<'a> {
    /// Optional name for the job (generated randomly if not specified)
    name: Option<String>,
    /// Collection of steps to be executed, in order
    steps: Vec<&'a dyn Step>,
    /// Listeners to attach to the job
    listeners: Vec<&'a dyn JobExecutionListener>,
}

impl<'a> JobBuilder<'a> {
    pub fn new() -> Self {
        Self {
            name: None,
            steps: Vec::new(),
            listeners: Vec::new(),
        }
    }

    /// Sets the name of the job.
    pub fn name(mut self, name: String) -> JobBuilder<'a> {
        self.name = Some(name);
        self
    }

    /// Sets the first step of the job.
    pub fn start(mut self, step: &'a dyn Step) -> JobBuilder<'a> {
        self.steps.push(step);
        self
    }

    /// Adds a step to the job. Steps are executed in the order they are added.
    pub fn next(mut self, step: &'a dyn Step) -> JobBuilder<'a> {
        self.steps.push(step);
        self
    }

    /// Attaches a listener invoked after every run of the job.
    pub fn listener(mut self, listener: &'a dyn JobExecutionListener) -> JobBuilder<'a> {
        self.listeners.push(listener);
        self
    }

    pub fn build(self) -> JobInstance<'a> {
        JobInstance {
            id: Uuid::new_v4(),
            name: self.name.unwrap_or_else(build_name),
            steps: self.steps,
            listeners: self.listeners,
            incrementer: RunIdIncrementer::default(),
        }
    }
}
