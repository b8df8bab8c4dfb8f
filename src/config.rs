use std::{env, path::PathBuf};

use crate::{error::BatchError, tasklet::sftp::HostKeyPolicy};

/// Default input resource, matching the bundled sample data.
pub const DEFAULT_INPUT_PATH: &str = "data/sample-data.csv";

/// Remote destination of the exported file.
pub const REMOTE_OUTPUT_PATH: &str = "/tmp/output.txt";

/// Number of records read, processed and written per commit cycle.
pub const CHUNK_SIZE: u16 = 10;

/// Explicit application configuration, constructed once at startup and
/// passed by reference into each component. There is no hidden container.
///
/// Required properties have no defaults; a missing one fails the process
/// before any file I/O happens.
#[derive(Debug, Clone)]
pub struct BatchConfig {
    /// SFTP server hostname or IP address (`SFTP_HOST`)
    pub host: String,
    /// SFTP server port (`SFTP_PORT`)
    pub port: u16,
    /// SFTP username (`SFTP_USERNAME`)
    pub username: String,
    /// SFTP password (`SFTP_PASSWORD`)
    pub password: String,
    /// Local path of the exported CSV file (`FILE_PATH`)
    pub file_path: PathBuf,
    /// Input CSV resource (`INPUT_PATH`, optional)
    pub input_path: PathBuf,
    /// Host key verification policy (`SFTP_HOST_KEY_POLICY`, optional)
    pub host_key_policy: HostKeyPolicy,
    /// Known-hosts file used by the strict policy (`SFTP_KNOWN_HOSTS`, optional)
    pub known_hosts: Option<PathBuf>,
}

impl BatchConfig {
    /// Reads the configuration from the process environment.
    pub fn from_env() -> Result<Self, BatchError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Reads the configuration from an arbitrary property source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, BatchError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = require(&lookup, "SFTP_HOST")?;
        let port = require(&lookup, "SFTP_PORT")?;
        let port = port.parse::<u16>().map_err(|_| {
            BatchError::Configuration(format!("SFTP_PORT is not a valid port: {}", port))
        })?;
        let username = require(&lookup, "SFTP_USERNAME")?;
        let password = require(&lookup, "SFTP_PASSWORD")?;
        let file_path = PathBuf::from(require(&lookup, "FILE_PATH")?);

        let input_path = lookup("INPUT_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_INPUT_PATH));

        let host_key_policy = match lookup("SFTP_HOST_KEY_POLICY").as_deref() {
            None | Some("strict") => HostKeyPolicy::Strict,
            Some("accept-all") => HostKeyPolicy::AcceptAll,
            Some(other) => {
                return Err(BatchError::Configuration(format!(
                    "SFTP_HOST_KEY_POLICY must be 'strict' or 'accept-all', got: {}",
                    other
                )));
            }
        };

        let known_hosts = lookup("SFTP_KNOWN_HOSTS").map(PathBuf::from);

        Ok(Self {
            host,
            port,
            username,
            password,
            file_path,
            input_path,
            host_key_policy,
            known_hosts,
        })
    }
}

fn require<F>(lookup: &F, name: &str) -> Result<String, BatchError>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(name)
        .filter(|value| !value.is_empty())
        .ok_or_else(|| BatchError::Configuration(format!("missing required property: {}", name)))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn properties() -> HashMap<&'static str, &'static str> {
        HashMap::from([
            ("SFTP_HOST", "sftp.example.com"),
            ("SFTP_PORT", "2222"),
            ("SFTP_USERNAME", "batch"),
            ("SFTP_PASSWORD", "secret"),
            ("FILE_PATH", "/tmp/persons.csv"),
        ])
    }

    fn config_from(properties: HashMap<&'static str, &'static str>) -> Result<BatchConfig, BatchError> {
        BatchConfig::from_lookup(|name| properties.get(name).map(|value| value.to_string()))
    }

    #[test]
    fn all_required_properties_build_a_config() {
        let config = config_from(properties()).unwrap();

        assert_eq!(config.host, "sftp.example.com");
        assert_eq!(config.port, 2222);
        assert_eq!(config.username, "batch");
        assert_eq!(config.password, "secret");
        assert_eq!(config.file_path, PathBuf::from("/tmp/persons.csv"));
        assert_eq!(config.input_path, PathBuf::from(DEFAULT_INPUT_PATH));
        assert_eq!(config.host_key_policy, HostKeyPolicy::Strict);
    }

    #[test]
    fn missing_host_is_a_configuration_error() {
        let mut props = properties();
        props.remove("SFTP_HOST");

        let result = config_from(props);

        match result {
            Err(BatchError::Configuration(message)) => {
                assert!(message.contains("SFTP_HOST"));
            }
            other => panic!("expected configuration error, got: {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn empty_value_counts_as_missing() {
        let mut props = properties();
        props.insert("SFTP_PASSWORD", "");

        assert!(matches!(
            config_from(props),
            Err(BatchError::Configuration(_))
        ));
    }

    #[test]
    fn invalid_port_is_a_configuration_error() {
        let mut props = properties();
        props.insert("SFTP_PORT", "not-a-port");

        assert!(matches!(
            config_from(props),
            Err(BatchError::Configuration(_))
        ));
    }

    #[test]
    fn host_key_policy_defaults_to_strict_and_accepts_overrides() {
        let mut props = properties();
        props.insert("SFTP_HOST_KEY_POLICY", "accept-all");
        let config = config_from(props).unwrap();
        assert_eq!(config.host_key_policy, HostKeyPolicy::AcceptAll);

        let mut props = properties();
        props.insert("SFTP_HOST_KEY_POLICY", "trust-me");
        assert!(matches!(
            config_from(props),
            Err(BatchError::Configuration(_))
        ));
    }
}
