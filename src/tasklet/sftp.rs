//! # SFTP Tasklet
//!
//! Tasklet that uploads a local file to an SFTP server as a single opaque
//! unit of work, executed after the export step has produced the file.
//!
//! The SSH session is scoped to one execution: it is acquired, used and
//! released inside `execute`, with the disconnect running on both success
//! and error paths.
//!
//! ## Examples
//!
//! ```no_run
//! use person_export_batch::core::step::StepBuilder;
//! use person_export_batch::tasklet::sftp::SftpPutTaskletBuilder;
//!
//! # fn example() -> Result<(), person_export_batch::BatchError> {
//! let sftp_put_tasklet = SftpPutTaskletBuilder::new()
//!     .host("sftp.example.com")
//!     .port(22)
//!     .username("user")
//!     .password("password")
//!     .local_file("./output.csv")
//!     .remote_file("/tmp/output.txt")
//!     .build()?;
//!
//! let step = StepBuilder::new("sftp-upload")
//!     .tasklet(&sftp_put_tasklet)
//!     .build();
//! # Ok(())
//! # }
//! ```

use std::{
    env,
    fs::File,
    io::{self, BufReader},
    net::TcpStream,
    path::{Path, PathBuf},
    time::Duration,
};

use log::{info, warn};
use ssh2::{CheckResult, DisconnectCode, KnownHostFileKind, Session};

use crate::{
    core::step::{RepeatStatus, StepExecution, Tasklet},
    error::BatchError,
};

/// How the identity of the remote host is checked before authenticating.
///
/// `Strict` verifies the presented host key against a known-hosts file and
/// is the default. `AcceptAll` skips verification entirely; it exists for
/// environments that deliberately trade safety for convenience and logs a
/// warning every time it is used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostKeyPolicy {
    Strict,
    AcceptAll,
}

/// A tasklet that uploads one local file to an SFTP server.
pub struct SftpPutTasklet {
    /// SFTP server hostname or IP address
    host: String,
    /// SFTP server port (default: 22)
    port: u16,
    /// SFTP username
    username: String,
    /// SFTP password
    password: String,
    /// Local file path to upload
    local_file: PathBuf,
    /// Remote file path on the SFTP server
    remote_file: String,
    /// Host key verification policy (default: strict)
    host_key_policy: HostKeyPolicy,
    /// Known-hosts file consulted by the strict policy
    known_hosts: Option<PathBuf>,
    /// Socket timeout applied to the session
    timeout: Duration,
}

impl Tasklet for SftpPutTasklet {
    fn execute(&self, _step_execution: &StepExecution) -> Result<RepeatStatus, BatchError> {
        info!(
            "Starting SFTP PUT: {} -> {}:{}{}",
            self.local_file.display(),
            self.host,
            self.port,
            self.remote_file
        );

        let tcp = TcpStream::connect((self.host.as_str(), self.port)).map_err(|e| {
            BatchError::Io(io::Error::new(
                io::ErrorKind::ConnectionRefused,
                format!("Failed to connect to SFTP server: {}", e),
            ))
        })?;

        let mut session = Session::new().map_err(|e| {
            BatchError::Configuration(format!("Failed to create SSH session: {}", e))
        })?;
        session.set_tcp_stream(tcp);
        session.set_timeout(self.timeout.as_millis() as u32);

        session.handshake().map_err(|e| {
            BatchError::Io(io::Error::other(format!("SSH handshake failed: {}", e)))
        })?;

        // The session must be released whether the transfer succeeds or not
        let result = self.transfer(&session);
        let _ = session.disconnect(
            Some(DisconnectCode::ByApplication),
            "batch transfer finished",
            None,
        );
        result?;

        info!(
            "SFTP PUT completed successfully: {} uploaded to {}:{}{}",
            self.local_file.display(),
            self.host,
            self.port,
            self.remote_file
        );

        Ok(RepeatStatus::Finished)
    }
}

impl SftpPutTasklet {
    fn transfer(&self, session: &Session) -> Result<(), BatchError> {
        self.verify_host_key(session)?;

        session
            .userauth_password(&self.username, &self.password)
            .map_err(|e| BatchError::Configuration(format!("SFTP authentication failed: {}", e)))?;

        let sftp = session.sftp().map_err(|e| {
            BatchError::Io(io::Error::other(format!(
                "Failed to open SFTP channel: {}",
                e
            )))
        })?;

        let file = File::open(&self.local_file).map_err(BatchError::Io)?;
        let mut reader = BufReader::new(file);

        let mut remote = sftp.create(Path::new(&self.remote_file)).map_err(|e| {
            BatchError::Io(io::Error::other(format!(
                "Failed to create remote file {}: {}",
                self.remote_file, e
            )))
        })?;

        io::copy(&mut reader, &mut remote).map_err(BatchError::Io)?;

        Ok(())
    }

    /// Checks the host key presented during the handshake against the
    /// configured policy.
    fn verify_host_key(&self, session: &Session) -> Result<(), BatchError> {
        match self.host_key_policy {
            HostKeyPolicy::AcceptAll => {
                warn!(
                    "Host key verification is disabled; the identity of {} is not checked",
                    self.host
                );
                Ok(())
            }
            HostKeyPolicy::Strict => {
                let (key, _key_type) = session.host_key().ok_or_else(|| {
                    BatchError::Configuration("Remote host presented no host key".to_string())
                })?;

                let mut known_hosts = session.known_hosts().map_err(|e| {
                    BatchError::Configuration(format!("Failed to initialize known hosts: {}", e))
                })?;

                let path = match &self.known_hosts {
                    Some(path) => path.clone(),
                    None => default_known_hosts_path()?,
                };

                known_hosts
                    .read_file(&path, KnownHostFileKind::OpenSSH)
                    .map_err(|e| {
                        BatchError::Configuration(format!(
                            "Failed to read known hosts file {}: {}",
                            path.display(),
                            e
                        ))
                    })?;

                match known_hosts.check_port(&self.host, self.port, key) {
                    CheckResult::Match => Ok(()),
                    CheckResult::Mismatch => Err(BatchError::Configuration(format!(
                        "Host key mismatch for {}",
                        self.host
                    ))),
                    CheckResult::NotFound => Err(BatchError::Configuration(format!(
                        "Host key for {} not found in {}",
                        self.host,
                        path.display()
                    ))),
                    CheckResult::Failure => Err(BatchError::Configuration(format!(
                        "Host key check failed for {}",
                        self.host
                    ))),
                }
            }
        }
    }
}

fn default_known_hosts_path() -> Result<PathBuf, BatchError> {
    env::var_os("HOME")
        .map(|home| PathBuf::from(home).join(".ssh").join("known_hosts"))
        .ok_or_else(|| {
            BatchError::Configuration(
                "HOME is not set; cannot locate the known hosts file".to_string(),
            )
        })
}

/// Builder for creating SftpPutTasklet instances with a fluent interface.
pub struct SftpPutTaskletBuilder {
    host: Option<String>,
    port: u16,
    username: Option<String>,
    password: Option<String>,
    local_file: Option<PathBuf>,
    remote_file: Option<String>,
    host_key_policy: HostKeyPolicy,
    known_hosts: Option<PathBuf>,
    timeout: Duration,
}

impl Default for SftpPutTaskletBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SftpPutTaskletBuilder {
    pub fn new() -> Self {
        Self {
            host: None,
            port: 22,
            username: None,
            password: None,
            local_file: None,
            remote_file: None,
            host_key_policy: HostKeyPolicy::Strict,
            known_hosts: None,
            timeout: Duration::from_secs(30),
        }
    }

    /// Sets the SFTP server hostname or IP address.
    pub fn host<S: Into<String>>(mut self, host: S) -> Self {
        self.host = Some(host.into());
        self
    }

    /// Sets the SFTP server port.
    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Sets the SFTP username.
    pub fn username<S: Into<String>>(mut self, username: S) -> Self {
        self.username = Some(username.into());
        self
    }

    /// Sets the SFTP password.
    pub fn password<S: Into<String>>(mut self, password: S) -> Self {
        self.password = Some(password.into());
        self
    }

    /// Sets the local file path to upload.
    ///
    /// The file does not have to exist yet; it is typically produced by an
    /// earlier step of the same job and is opened only when the tasklet runs.
    pub fn local_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.local_file = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets the remote file path on the SFTP server.
    pub fn remote_file<S: Into<String>>(mut self, path: S) -> Self {
        self.remote_file = Some(path.into());
        self
    }

    /// Sets the host key verification policy.
    pub fn host_key_policy(mut self, policy: HostKeyPolicy) -> Self {
        self.host_key_policy = policy;
        self
    }

    /// Sets the known-hosts file consulted by the strict policy.
    pub fn known_hosts<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.known_hosts = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets the socket timeout applied to the session.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Builds the SftpPutTasklet instance.
    pub fn build(self) -> Result<SftpPutTasklet, BatchError> {
        let host = self
            .host
            .ok_or_else(|| BatchError::Configuration("SFTP host is required".to_string()))?;
        let username = self
            .username
            .ok_or_else(|| BatchError::Configuration("SFTP username is required".to_string()))?;
        let password = self
            .password
            .ok_or_else(|| BatchError::Configuration("SFTP password is required".to_string()))?;
        let local_file = self
            .local_file
            .ok_or_else(|| BatchError::Configuration("Local file path is required".to_string()))?;
        let remote_file = self
            .remote_file
            .ok_or_else(|| BatchError::Configuration("Remote file path is required".to_string()))?;

        Ok(SftpPutTasklet {
            host,
            port: self.port,
            username,
            password,
            local_file,
            remote_file,
            host_key_policy: self.host_key_policy,
            known_hosts: self.known_hosts,
            timeout: self.timeout,
        })
    }
}
