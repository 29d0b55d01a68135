//! Configuration for the ipmon watcher.

use std::fmt;
use std::path::Path;

use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::Deserialize;

use crate::error::{Result, WatchError};

/// Scheduling and file locations.
///
/// Loaded from the `[watch]` section of `ipmon.toml` (or any format the
/// `config` crate detects from the file prefix) and `IPMON_WATCH__`
/// environment variables.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct WatchConfig {
    /// Seconds between two checks.
    #[serde(default = "default_interval")]
    pub interval_secs: u64,

    /// Where the last known snapshot is kept.
    #[serde(default = "default_net_conf")]
    pub net_conf: String,

    /// Mail relay settings, read when a change has to be reported.
    #[serde(default = "default_mail_conf")]
    pub mail_conf: String,
}

fn default_interval() -> u64 {
    30
}

fn default_net_conf() -> String {
    "net.json".to_string()
}

fn default_mail_conf() -> String {
    "mail.json".to_string()
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_interval(),
            net_conf: default_net_conf(),
            mail_conf: default_mail_conf(),
        }
    }
}

impl WatchConfig {
    /// Load from `<file_prefix>.*` (optional) and the environment.
    pub fn load(file_prefix: &str) -> Result<Self> {
        let cfg = Config::builder()
            .add_source(File::with_name(file_prefix).required(false))
            .add_source(
                Environment::with_prefix("IPMON")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Self::from_config(&cfg)
    }

    /// Extract the `watch` section, falling back to defaults when absent.
    ///
    /// Not validated here; command-line overrides may still replace values.
    pub fn from_config(cfg: &Config) -> Result<Self> {
        match cfg.get::<WatchConfig>("watch") {
            Ok(c) => Ok(c),
            Err(ConfigError::NotFound(_)) => Ok(WatchConfig::default()),
            Err(e) => Err(e.into()),
        }
    }

    /// Replace the values given on the command line.
    pub fn with_overrides(
        mut self,
        interval_secs: Option<u64>,
        net_conf: Option<String>,
        mail_conf: Option<String>,
    ) -> Self {
        if let Some(interval_secs) = interval_secs {
            self.interval_secs = interval_secs;
        }
        if let Some(net_conf) = net_conf {
            self.net_conf = net_conf;
        }
        if let Some(mail_conf) = mail_conf {
            self.mail_conf = mail_conf;
        }
        self
    }

    /// Checks the settings the polling loop needs.
    pub fn validate(&self) -> Result<()> {
        if self.interval_secs == 0 {
            return Err(WatchError::Config(
                "watch.interval_secs must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Mail relay settings.
///
/// Keeps the `mail.json` layout:
/// ```text
/// { "from": "...", "to": "...", "serverHost": "...", "serverPort": 465,
///   "serverUser": "...", "serverPassword": "..." }
/// ```
/// `to` may list several recipients separated by commas.
#[derive(Clone, Deserialize, PartialEq, Eq)]
pub struct MailConfig {
    pub from: String,

    pub to: String,

    #[serde(rename = "serverHost", alias = "serverhost", alias = "server_host")]
    pub server_host: String,

    #[serde(
        rename = "serverPort",
        alias = "serverport",
        alias = "server_port",
        default = "default_smtps_port"
    )]
    pub server_port: u16,

    #[serde(
        rename = "serverUser",
        alias = "serveruser",
        alias = "server_user",
        default
    )]
    pub server_user: String,

    #[serde(
        rename = "serverPassword",
        alias = "serverpassword",
        alias = "server_password",
        default
    )]
    pub server_password: String,

    /// Skip TLS certificate verification of the relay.
    #[serde(
        rename = "acceptInvalidCerts",
        alias = "acceptinvalidcerts",
        alias = "accept_invalid_certs",
        default
    )]
    pub accept_invalid_certs: bool,
}

fn default_smtps_port() -> u16 {
    465
}

impl MailConfig {
    /// Load from a JSON file, with `IPMON_MAIL__<FIELD>` overrides.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let cfg = Config::builder()
            .add_source(File::from(path.as_ref()).format(FileFormat::Json))
            .add_source(
                Environment::with_prefix("IPMON_MAIL")
                    .prefix_separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Ok(cfg.try_deserialize()?)
    }

    pub fn recipients(&self) -> Vec<String> {
        self.to
            .split(',')
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .map(String::from)
            .collect()
    }
}

impl fmt::Debug for MailConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MailConfig")
            .field("from", &self.from)
            .field("to", &self.to)
            .field("server_host", &self.server_host)
            .field("server_port", &self.server_port)
            .field("server_user", &self.server_user)
            .field("server_password", &"<redacted>")
            .field("accept_invalid_certs", &self.accept_invalid_certs)
            .finish()
    }
}
