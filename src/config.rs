//! Configuration for the bridge core
//!
//! The bootstrap layer (CLI flags, environment defaults) assembles a
//! `config::Config` source set and hands it over before the core starts;
//! the core only deserializes and validates. Nothing in this crate reads
//! environment variables or files directly.

use config::Config;
use serde::Deserialize;
use std::net::Ipv4Addr;
use std::path::PathBuf;

/// Verbs refused on the control channel when the server runs read-only.
pub const READ_ONLY_VERB_BLACKLIST: &[&str] = &[
    "ALLO", "APPE", "DELE", "MKD", "RMD", "RNFR", "RNTO", "STOR", "STRU",
];

/// Complete bridge configuration, immutable after construction
#[derive(Debug, Clone, Deserialize)]
pub struct BridgeConfig {
    /// URL the control connection binds to (consumed by the protocol engine).
    #[serde(default = "default_server_url")]
    pub server_url: String,

    /// Port range advertised for passive data connections.
    #[serde(default = "default_pasv_min")]
    pub pasv_min: u16,
    #[serde(default = "default_pasv_max")]
    pub pasv_max: u16,

    /// Fixed address to advertise for passive connections. When set it
    /// always wins over interface discovery.
    #[serde(default)]
    pub pasv_address: Option<Ipv4Addr>,

    /// Disables every mutating verb on the control channel.
    #[serde(default)]
    pub read_only: bool,

    /// Accept any login. Only meaningful with the static credential backend.
    #[serde(default)]
    pub anonymous: bool,

    /// Home root for users without a per-user override.
    #[serde(default = "default_root")]
    pub root: PathBuf,

    /// Upload size cap in megabytes.
    #[serde(default = "default_max_upload_mb")]
    pub max_upload_mb: u64,

    pub kafka: KafkaConfig,

    pub auth: AuthBackendConfig,
}

/// Message-bus connection target
#[derive(Debug, Clone, Deserialize)]
pub struct KafkaConfig {
    #[serde(default = "default_brokers")]
    pub brokers: String,
    #[serde(default = "default_topic")]
    pub topic: String,
}

/// Exactly one credential backend is active per process. The choice is made
/// here, once, and never re-evaluated per session.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "backend", rename_all = "snake_case")]
pub enum AuthBackendConfig {
    /// In-memory username/password table.
    Static {
        #[serde(default)]
        credentials: Vec<CredentialEntry>,
    },
    /// Bind-based authentication against a remote LDAP service.
    Directory {
        url: String,
        bind_dn: String,
        bind_password: String,
        search_base: String,
        /// Per-user homes are derived as `<home_base>/<username>`.
        #[serde(default = "default_home_base")]
        home_base: PathBuf,
    },
}

/// One static login, loaded at startup and never mutated
#[derive(Debug, Clone, Deserialize)]
pub struct CredentialEntry {
    pub username: String,
    pub password: String,
    /// Overrides the global root for this user.
    #[serde(default)]
    pub root: Option<PathBuf>,
}

fn default_server_url() -> String {
    "ftp://0.0.0.0:21".to_string()
}

fn default_pasv_min() -> u16 {
    1024
}

fn default_pasv_max() -> u16 {
    65535
}

fn default_root() -> PathBuf {
    PathBuf::from("/")
}

fn default_max_upload_mb() -> u64 {
    64
}

fn default_brokers() -> String {
    "localhost:9092".to_string()
}

fn default_topic() -> String {
    "kafkatp".to_string()
}

fn default_home_base() -> PathBuf {
    PathBuf::from("/home")
}

impl BridgeConfig {
    /// Deserialize and validate a configuration the bootstrap layer built.
    pub fn from_settings(settings: Config) -> Result<Self, config::ConfigError> {
        let config: BridgeConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validation for all configuration values
    pub fn validate(&self) -> Result<(), config::ConfigError> {
        if self.server_url.is_empty() {
            return Err(config::ConfigError::Message(
                "server_url cannot be empty".into(),
            ));
        }

        if self.pasv_min == 0 {
            return Err(config::ConfigError::Message("pasv_min cannot be 0".into()));
        }

        if self.pasv_min > self.pasv_max {
            return Err(config::ConfigError::Message(
                "pasv_min must not exceed pasv_max".into(),
            ));
        }

        if self.root.as_os_str().is_empty() {
            return Err(config::ConfigError::Message("root cannot be empty".into()));
        }

        if self.max_upload_mb == 0 {
            return Err(config::ConfigError::Message(
                "max_upload_mb must be greater than 0".into(),
            ));
        }

        if self.kafka.brokers.is_empty() {
            return Err(config::ConfigError::Message(
                "kafka.brokers cannot be empty".into(),
            ));
        }

        if self.kafka.topic.is_empty() {
            return Err(config::ConfigError::Message(
                "kafka.topic cannot be empty".into(),
            ));
        }

        if let AuthBackendConfig::Directory { url, search_base, .. } = &self.auth {
            if url.is_empty() {
                return Err(config::ConfigError::Message(
                    "auth.url cannot be empty in directory mode".into(),
                ));
            }
            if search_base.is_empty() {
                return Err(config::ConfigError::Message(
                    "auth.search_base cannot be empty in directory mode".into(),
                ));
            }
        }

        Ok(())
    }

    /// Verbs the protocol engine must refuse for this run.
    pub fn disabled_verbs(&self) -> &'static [&'static str] {
        if self.read_only {
            READ_ONLY_VERB_BLACKLIST
        } else {
            &[]
        }
    }

    /// Upload size cap in bytes.
    pub fn max_upload_bytes(&self) -> u64 {
        self.max_upload_mb * 1024 * 1024
    }

    /// Port range for passive data connections.
    pub fn pasv_port_range(&self) -> std::ops::RangeInclusive<u16> {
        self.pasv_min..=self.pasv_max
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::{Config, File, FileFormat};

    fn parse(toml: &str) -> Result<BridgeConfig, config::ConfigError> {
        let settings = Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()?;
        BridgeConfig::from_settings(settings)
    }

    #[test]
    fn static_backend_deserializes() {
        let config = parse(
            r#"
            root = "/srv/ftp"

            [kafka]
            brokers = "broker:9092"
            topic = "uploads"

            [auth]
            backend = "static"
            credentials = [
                { username = "alice", password = "alice123" },
                { username = "bob", password = "bob123", root = "/srv/bob" },
            ]
            "#,
        )
        .unwrap();

        match &config.auth {
            AuthBackendConfig::Static { credentials } => {
                assert_eq!(credentials.len(), 2);
                assert_eq!(credentials[1].root.as_deref(), Some(std::path::Path::new("/srv/bob")));
            }
            _ => panic!("expected static backend"),
        }
        assert_eq!(config.kafka.topic, "uploads");
        assert_eq!(config.server_url, "ftp://0.0.0.0:21");
    }

    #[test]
    fn directory_backend_deserializes() {
        let config = parse(
            r#"
            [kafka]

            [auth]
            backend = "directory"
            url = "ldap://ldap.example.com"
            bind_dn = "cn=admin,dc=example,dc=com"
            bind_password = "secret"
            search_base = "ou=people,dc=example,dc=com"
            "#,
        )
        .unwrap();

        match &config.auth {
            AuthBackendConfig::Directory { url, home_base, .. } => {
                assert_eq!(url, "ldap://ldap.example.com");
                assert_eq!(home_base, &PathBuf::from("/home"));
            }
            _ => panic!("expected directory backend"),
        }
    }

    #[test]
    fn invalid_pasv_range_is_rejected() {
        let err = parse(
            r#"
            pasv_min = 4000
            pasv_max = 3000

            [kafka]

            [auth]
            backend = "static"
            "#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("pasv_min"));
    }

    #[test]
    fn empty_topic_is_rejected() {
        let err = parse(
            r#"
            [kafka]
            topic = ""

            [auth]
            backend = "static"
            "#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("topic"));
    }

    #[test]
    fn read_only_derives_verb_blacklist() {
        let config = parse(
            r#"
            read_only = true

            [kafka]

            [auth]
            backend = "static"
            "#,
        )
        .unwrap();
        assert!(config.disabled_verbs().contains(&"STOR"));
        assert!(config.disabled_verbs().contains(&"DELE"));

        let writable = parse(
            r#"
            [kafka]

            [auth]
            backend = "static"
            "#,
        )
        .unwrap();
        assert!(writable.disabled_verbs().is_empty());
    }
}
