//! Command-line interface.
//!
//! Flags mirror the configuration surface. Any flag given on the command
//! line overrides the same setting from the `--config` file.

use std::path::PathBuf;

use clap::Parser;

use crate::config::loader::{finalize, read_config};
use crate::config::{ConfigError, GatewayConfig};

#[derive(Debug, Parser)]
#[command(name = "gemini-web-gateway")]
#[command(about = "Gemini to HTTP(S) gateway that simplifies web pages into gemtext", long_about = None)]
pub struct Cli {
    /// TOML configuration file; flags override its values
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Start citations from this index
    #[arg(short = 's', long = "citationStart")]
    pub citation_start: Option<usize>,

    /// Use footnote style citation markers
    #[arg(short = 'm', long = "citationMarkers")]
    pub citation_markers: bool,

    /// Number the links
    #[arg(short = 'n', long = "numberedLinks")]
    pub numbered_links: bool,

    /// Pretty tables - works with most simple tables
    #[arg(short = 'r', long = "prettyTables")]
    pub pretty_tables: bool,

    /// Emit links to included images
    #[arg(short = 'e', long = "emitImagesAsLinks")]
    pub emit_images_as_links: bool,

    /// Emit gathered links through the document after this number of paragraphs
    #[arg(short = 'l', long = "linkEmitFrequency")]
    pub link_emit_frequency: Option<usize>,

    /// Server certificate path (PEM)
    #[arg(short = 'c', long = "serverCert")]
    pub server_cert: Option<PathBuf>,

    /// Server private key path (PEM)
    #[arg(short = 'k', long = "serverKey")]
    pub server_key: Option<PathBuf>,

    /// User agent for HTTP requests
    #[arg(short = 'u', long = "userAgent")]
    pub user_agent: Option<String>,

    /// Max download time (s)
    #[arg(short = 't', long = "maxDownloadTime")]
    pub max_download_time: Option<u64>,

    /// Max connect time (s)
    #[arg(short = 'T', long = "maxConnectTime")]
    pub max_connect_time: Option<u64>,

    /// Server port
    #[arg(short = 'p', long = "port")]
    pub port: Option<u16>,

    /// Bind to address
    #[arg(short = 'a', long = "address")]
    pub address: Option<String>,

    /// Do not filter text/html to text/gemini
    #[arg(long = "unfiltered")]
    pub unfiltered: bool,
}

impl Cli {
    /// Build the validated configuration: defaults, then the config file,
    /// then these flags.
    pub fn resolve(&self) -> Result<GatewayConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => read_config(path)?,
            None => GatewayConfig::default(),
        };
        self.apply(&mut config);
        finalize(config)
    }

    /// Overlay the flags that were given onto `config`.
    pub fn apply(&self, config: &mut GatewayConfig) {
        let conversion = &mut config.conversion;
        if let Some(start) = self.citation_start {
            conversion.citation_start = start;
        }
        if let Some(frequency) = self.link_emit_frequency {
            conversion.link_emit_frequency = frequency;
        }
        conversion.citation_markers |= self.citation_markers;
        conversion.numbered_links |= self.numbered_links;
        conversion.pretty_tables |= self.pretty_tables;
        conversion.emit_images_as_links |= self.emit_images_as_links;
        conversion.unfiltered |= self.unfiltered;

        if let Some(cert) = &self.server_cert {
            config.listener.tls.cert_path = cert.clone();
        }
        if let Some(key) = &self.server_key {
            config.listener.tls.key_path = key.clone();
        }
        if let Some(port) = self.port {
            config.listener.port = port;
        }
        if let Some(address) = &self.address {
            config.listener.address = address.clone();
        }

        if let Some(agent) = &self.user_agent {
            config.http.user_agent = agent.clone();
        }
        if let Some(secs) = self.max_download_time {
            config.timeouts.download_secs = secs;
        }
        if let Some(secs) = self.max_connect_time {
            config.timeouts.connect_secs = secs;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use std::io::Write;

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn short_flags_override_defaults() {
        let cli = Cli::parse_from([
            "gemini-web-gateway",
            "-c", "cert.pem",
            "-k", "key.pem",
            "-s", "5",
            "-n",
            "-r",
            "-t", "30",
            "-T", "2",
            "-p", "1966",
            "-a", "0.0.0.0",
            "-u", "gateway/1.0",
        ]);
        let config = cli.resolve().unwrap();

        assert_eq!(config.conversion.citation_start, 5);
        assert!(config.conversion.numbered_links);
        assert!(config.conversion.pretty_tables);
        assert!(!config.conversion.citation_markers);
        assert_eq!(config.timeouts.download_secs, 30);
        assert_eq!(config.timeouts.connect_secs, 2);
        assert_eq!(config.listener.port, 1966);
        assert_eq!(config.listener.address, "0.0.0.0");
        assert_eq!(config.http.user_agent, "gateway/1.0");
    }

    #[test]
    fn long_flags_use_camel_case_names() {
        let cli = Cli::parse_from([
            "gemini-web-gateway",
            "--serverCert", "cert.pem",
            "--serverKey", "key.pem",
            "--citationMarkers",
            "--emitImagesAsLinks",
            "--linkEmitFrequency", "4",
            "--unfiltered",
        ]);
        let config = cli.resolve().unwrap();

        assert!(config.conversion.citation_markers);
        assert!(config.conversion.emit_images_as_links);
        assert!(config.conversion.unfiltered);
        assert_eq!(config.conversion.link_emit_frequency, 4);
    }

    #[test]
    fn flags_take_precedence_over_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[listener]\nport = 2000\n[listener.tls]\ncert_path = \"a.pem\"\nkey_path = \"b.pem\"\n[timeouts]\nconnect_secs = 9"
        )
        .unwrap();
        let path = file.path().to_str().unwrap().to_string();

        let cli = Cli::parse_from(["gemini-web-gateway", "--config", &path, "-p", "3000"]);
        let config = cli.resolve().unwrap();

        assert_eq!(config.listener.port, 3000);
        assert_eq!(config.timeouts.connect_secs, 9);
    }

    #[test]
    fn missing_certificate_fails_validation() {
        let cli = Cli::parse_from(["gemini-web-gateway"]);
        assert!(matches!(cli.resolve(), Err(ConfigError::Validation(_))));
    }
}
