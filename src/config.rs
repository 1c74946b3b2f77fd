use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use serde::Deserialize;

use crate::domain::ItemRef;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

#[derive(Parser, Debug)]
#[command(name = "bomtrace", about = "Terminal UI for PLM traceability logs")]
pub struct Cli {
    /// Item to inspect, as <app>/<id> (e.g. pcbas/42)
    pub item: ItemRef,

    /// PLM backend base URL
    #[arg(long, env = "BOMTRACE_BASE_URL")]
    pub base_url: Option<String>,

    /// Page of the log to open
    #[arg(long, default_value = "1", value_parser = clap::value_parser!(u32).range(1..))]
    pub page: u32,

    /// Print the page to stdout instead of starting the UI
    #[arg(long)]
    pub print: bool,

    /// Request timeout in seconds
    #[arg(long, env = "BOMTRACE_TIMEOUT")]
    pub timeout: Option<u64>,

    /// Log file path
    #[arg(long, env = "BOMTRACE_LOG_FILE")]
    pub log_file: Option<String>,
}

#[derive(Debug, Deserialize, Default, PartialEq, Eq)]
pub struct ConfigFile {
    pub base_url: Option<String>,
    pub timeout: Option<u64>,
    pub log_file: Option<String>,
}

impl ConfigFile {
    pub fn path() -> Option<PathBuf> {
        Some(dirs::config_dir()?.join("bomtrace").join("config.toml"))
    }

    pub fn load() -> Option<Self> {
        let config_path = Self::path()?;
        let content = std::fs::read_to_string(&config_path).ok()?;
        match toml::from_str(&content) {
            Ok(config) => Some(config),
            Err(e) => {
                eprintln!("ignoring {}: {}", config_path.display(), e);
                None
            }
        }
    }
}

/// Effective settings: CLI flags and env first, then the config file, then
/// built-in defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub item: ItemRef,
    pub base_url: String,
    pub page: u32,
    pub print: bool,
    pub timeout: Duration,
    pub log_file: Option<PathBuf>,
}

impl Settings {
    pub fn resolve(cli: Cli, file: Option<ConfigFile>) -> Self {
        let file = file.unwrap_or_default();
        Self {
            item: cli.item,
            base_url: cli
                .base_url
                .or(file.base_url)
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            page: cli.page.max(1),
            print: cli.print,
            timeout: Duration::from_secs(
                cli.timeout.or(file.timeout).unwrap_or(DEFAULT_TIMEOUT_SECS),
            ),
            log_file: cli.log_file.or(file.log_file).map(PathBuf::from),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ItemApp;

    fn parse(args: &[&str]) -> Cli {
        let mut argv = vec!["bomtrace"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).expect("valid args")
    }

    #[test]
    fn cli_flags_win_over_config_file() {
        let cli = parse(&["pcbas/42", "--base-url", "https://plm.local", "--page", "3"]);
        let file = ConfigFile {
            base_url: Some("https://other".to_string()),
            timeout: Some(30),
            log_file: Some("/tmp/bomtrace.log".to_string()),
        };

        let settings = Settings::resolve(cli, Some(file));

        assert_eq!(settings.item, ItemRef::new(ItemApp::Pcbas, 42));
        assert_eq!(settings.base_url, "https://plm.local");
        assert_eq!(settings.page, 3);
        assert_eq!(settings.timeout, Duration::from_secs(30));
        assert_eq!(settings.log_file, Some(PathBuf::from("/tmp/bomtrace.log")));
    }

    #[test]
    fn defaults_apply_without_config() {
        let cli = Cli {
            item: ItemRef::new(ItemApp::Parts, 1),
            base_url: None,
            page: 1,
            print: true,
            timeout: None,
            log_file: None,
        };
        let settings = Settings::resolve(cli, None);
        assert_eq!(settings.base_url, DEFAULT_BASE_URL);
        assert_eq!(settings.timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        assert!(settings.print);
        assert_eq!(settings.log_file, None);
    }

    #[test]
    fn rejects_bad_item_and_page_zero() {
        assert!(Cli::try_parse_from(["bomtrace", "widgets/1"]).is_err());
        assert!(Cli::try_parse_from(["bomtrace", "parts/1", "--page", "0"]).is_err());
    }

    #[test]
    fn parses_config_file() {
        let config: ConfigFile =
            toml::from_str("base_url = \"https://plm.example.com\"\ntimeout = 5\n").expect("toml");
        assert_eq!(config.base_url.as_deref(), Some("https://plm.example.com"));
        assert_eq!(config.timeout, Some(5));
        assert_eq!(config.log_file, None);
    }
}
