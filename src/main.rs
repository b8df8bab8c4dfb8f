use std::process::ExitCode;

use log::error;

use person_export_batch::{
    BatchError,
    config::{BatchConfig, CHUNK_SIZE, REMOTE_OUTPUT_PATH},
    core::{
        job::{Job, JobBuilder},
        step::StepBuilder,
    },
    item::csv::{csv_reader::CsvItemReaderBuilder, csv_writer::CsvItemWriterBuilder},
    listener::JobCompletionListener,
    person::{Person, UpperCaseProcessor},
    tasklet::sftp::SftpPutTaskletBuilder,
};

fn main() -> ExitCode {
    env_logger::init();

    // Configuration is resolved before any file I/O happens
    let config = match BatchConfig::from_env() {
        Ok(config) => config,
        Err(error) => {
            error!("{}", error);
            return ExitCode::from(2);
        }
    };

    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            error!("{}", error);
            ExitCode::FAILURE
        }
    }
}

fn run(config: &BatchConfig) -> Result<(), BatchError> {
    let reader = CsvItemReaderBuilder::<Person>::new()
        .delimiter(b',')
        .from_path(&config.input_path)?;

    let processor = UpperCaseProcessor;

    let writer = CsvItemWriterBuilder::new()
        .delimiter(b',')
        .from_path(&config.file_path)?;

    let export_step = StepBuilder::new("export-persons")
        .chunk::<Person, Person>(CHUNK_SIZE)
        .reader(&reader)
        .processor(&processor)
        .writer(&writer)
        .build();

    let mut upload_builder = SftpPutTaskletBuilder::new()
        .host(&config.host)
        .port(config.port)
        .username(&config.username)
        .password(&config.password)
        .local_file(&config.file_path)
        .remote_file(REMOTE_OUTPUT_PATH)
        .host_key_policy(config.host_key_policy);
    if let Some(known_hosts) = &config.known_hosts {
        upload_builder = upload_builder.known_hosts(known_hosts);
    }
    let upload_tasklet = upload_builder.build()?;

    let upload_step = StepBuilder::new("sftp-upload")
        .tasklet(&upload_tasklet)
        .build();

    let listener = JobCompletionListener::new(&config.file_path);

    let job = JobBuilder::new()
        .name("export-persons-job".to_string())
        .start(&export_step)
        .next(&upload_step)
        .listener(&listener)
        .build();

    job.run().map(|_| ())
}
