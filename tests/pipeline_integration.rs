use std::{cell::RefCell, fs};

use anyhow::Result;
use tempfile::tempdir;

use person_export_batch::{
    core::{
        job::{BatchStatus, Job, JobBuilder, JobExecution, JobExecutionListener},
        step::{Step, StepBuilder, StepExecution, StepStatus},
    },
    item::csv::{csv_reader::CsvItemReaderBuilder, csv_writer::CsvItemWriterBuilder},
    listener::JobCompletionListener,
    person::{Person, UpperCaseProcessor},
};

/// Listener recording the statuses it observed, for asserting on outcomes.
#[derive(Default)]
struct RecordingListener {
    statuses: RefCell<Vec<BatchStatus>>,
}

impl JobExecutionListener for RecordingListener {
    fn after_job(&self, job_execution: &JobExecution) {
        self.statuses.borrow_mut().push(job_execution.status);
    }
}

fn sample_input(count: usize) -> String {
    (0..count)
        .map(|i| format!("First{},Last{}\n", i, i))
        .collect()
}

fn expected_output(count: usize) -> String {
    (0..count)
        .map(|i| format!("FIRST{},LAST{}\n", i, i))
        .collect()
}

#[test]
fn twenty_five_records_export_in_three_commit_cycles() -> Result<()> {
    let dir = tempdir()?;
    let input_path = dir.path().join("sample-data.csv");
    let output_path = dir.path().join("output.csv");
    fs::write(&input_path, sample_input(25))?;

    let reader = CsvItemReaderBuilder::<Person>::new()
        .from_path(&input_path)
        .unwrap();
    let processor = UpperCaseProcessor;
    let writer = CsvItemWriterBuilder::new().from_path(&output_path).unwrap();

    let step = StepBuilder::new("export-persons")
        .chunk::<Person, Person>(10)
        .reader(&reader)
        .processor(&processor)
        .writer(&writer)
        .build();

    let mut step_execution = StepExecution::new("export-persons");
    step.execute(&mut step_execution).unwrap();

    assert_eq!(step_execution.status, StepStatus::Success);
    assert_eq!(step_execution.read_count, 25);
    assert_eq!(step_execution.write_count, 25);
    assert_eq!(step_execution.commit_count, 3);

    // Byte-for-byte: every record uppercased, original order preserved
    let output = fs::read_to_string(&output_path)?;
    assert_eq!(output, expected_output(25));

    Ok(())
}

#[test]
fn job_with_completion_listener_logs_the_exported_file() {
    let dir = tempdir().unwrap();
    let input_path = dir.path().join("sample-data.csv");
    let output_path = dir.path().join("output.csv");
    fs::write(&input_path, "John,Doe\nJane,Dae\n").unwrap();

    let reader = CsvItemReaderBuilder::<Person>::new()
        .from_path(&input_path)
        .unwrap();
    let processor = UpperCaseProcessor;
    let writer = CsvItemWriterBuilder::new().from_path(&output_path).unwrap();

    let step = StepBuilder::new("export-persons")
        .chunk::<Person, Person>(10)
        .reader(&reader)
        .processor(&processor)
        .writer(&writer)
        .build();

    let completion_listener = JobCompletionListener::new(&output_path);
    let recording_listener = RecordingListener::default();

    let job = JobBuilder::new()
        .name("export-persons-job".to_string())
        .start(&step)
        .listener(&completion_listener)
        .listener(&recording_listener)
        .build();

    let execution = job.run().unwrap();

    assert_eq!(execution.status, BatchStatus::Completed);
    assert_eq!(execution.run_id, 1);
    assert_eq!(
        *recording_listener.statuses.borrow(),
        vec![BatchStatus::Completed]
    );

    let output = fs::read_to_string(&output_path).unwrap();
    assert_eq!(output, "JOHN,DOE\nJANE,DAE\n");
}

#[test]
fn empty_input_produces_an_empty_output_and_a_completed_job() {
    let dir = tempdir().unwrap();
    let input_path = dir.path().join("sample-data.csv");
    let output_path = dir.path().join("output.csv");
    fs::write(&input_path, "").unwrap();

    let reader = CsvItemReaderBuilder::<Person>::new()
        .from_path(&input_path)
        .unwrap();
    let processor = UpperCaseProcessor;
    let writer = CsvItemWriterBuilder::new().from_path(&output_path).unwrap();

    let step = StepBuilder::new("export-persons")
        .chunk::<Person, Person>(10)
        .reader(&reader)
        .processor(&processor)
        .writer(&writer)
        .build();

    let mut step_execution = StepExecution::new("export-persons");
    step.execute(&mut step_execution).unwrap();

    assert_eq!(step_execution.status, StepStatus::Success);
    assert_eq!(step_execution.commit_count, 0);
    assert_eq!(fs::read_to_string(&output_path).unwrap(), "");
}

#[test]
fn record_count_and_order_are_preserved_for_partial_last_chunk() {
    let dir = tempdir().unwrap();
    let input_path = dir.path().join("sample-data.csv");
    let output_path = dir.path().join("output.csv");
    fs::write(&input_path, sample_input(7)).unwrap();

    let reader = CsvItemReaderBuilder::<Person>::new()
        .from_path(&input_path)
        .unwrap();
    let processor = UpperCaseProcessor;
    let writer = CsvItemWriterBuilder::new().from_path(&output_path).unwrap();

    let step = StepBuilder::new("export-persons")
        .chunk::<Person, Person>(10)
        .reader(&reader)
        .processor(&processor)
        .writer(&writer)
        .build();

    let mut step_execution = StepExecution::new("export-persons");
    step.execute(&mut step_execution).unwrap();

    assert_eq!(step_execution.commit_count, 1);
    assert_eq!(fs::read_to_string(&output_path).unwrap(), expected_output(7));
}
