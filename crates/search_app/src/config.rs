//! Optional RON configuration, layered under the command-line flags.

use std::fs;
use std::path::Path;
use std::time::Duration;

use search_core::UNSET_SEARCH_TYPE;
use search_engine::{ClientSettings, DEFAULT_BASE_URL};
use search_logging::{search_info, search_warn};
use serde::{Deserialize, Serialize};

use crate::cli::CliArgs;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct FileConfig {
    pub(crate) server_url: Option<String>,
    pub(crate) search_type: Option<String>,
    pub(crate) connect_timeout_secs: Option<u64>,
}

/// Effective settings after merging file values and flags.
#[derive(Debug, Clone)]
pub(crate) struct Settings {
    pub(crate) client: ClientSettings,
    pub(crate) search_type: String,
}

/// Reads the config file. Missing or broken files fall back to defaults.
pub(crate) fn load(path: &Path) -> FileConfig {
    let content = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return FileConfig::default();
        }
        Err(err) => {
            search_warn!("Failed to read config from {:?}: {}", path, err);
            return FileConfig::default();
        }
    };

    match ron::from_str(&content) {
        Ok(config) => {
            search_info!("Loaded config from {:?}", path);
            config
        }
        Err(err) => {
            search_warn!("Failed to parse config from {:?}: {}", path, err);
            FileConfig::default()
        }
    }
}

pub(crate) fn resolve(args: &CliArgs, file: FileConfig) -> Settings {
    let defaults = ClientSettings::default();
    let base_url = args
        .server
        .clone()
        .or(file.server_url)
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
    let connect_timeout = file
        .connect_timeout_secs
        .map(Duration::from_secs)
        .unwrap_or(defaults.connect_timeout);
    let search_type = args
        .search_type
        .clone()
        .or(file.search_type)
        .unwrap_or_else(|| UNSET_SEARCH_TYPE.to_string());

    Settings {
        client: ClientSettings {
            base_url,
            connect_timeout,
        },
        search_type,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use pretty_assertions::assert_eq;

    fn args(extra: &[&str]) -> CliArgs {
        let mut argv = vec!["search_app"];
        argv.extend_from_slice(extra);
        CliArgs::try_parse_from(argv).unwrap()
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::TempDir::new().unwrap();
        assert_eq!(load(&dir.path().join("absent.ron")), FileConfig::default());
    }

    #[test]
    fn partial_file_is_parsed() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("search_client.ron");
        fs::write(
            &path,
            r#"(server_url: Some("http://search.local:8080/"), search_type: Some("agentic"))"#,
        )
        .unwrap();

        assert_eq!(
            load(&path),
            FileConfig {
                server_url: Some("http://search.local:8080/".to_string()),
                search_type: Some("agentic".to_string()),
                connect_timeout_secs: None,
            }
        );
    }

    #[test]
    fn unparsable_file_falls_back_to_defaults() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("broken.ron");
        fs::write(&path, "(server_url: ").unwrap();

        assert_eq!(load(&path), FileConfig::default());
    }

    #[test]
    fn flags_override_file_values() {
        let file = FileConfig {
            server_url: Some("http://from-file/".to_string()),
            search_type: Some("simple".to_string()),
            connect_timeout_secs: Some(3),
        };
        let settings = resolve(
            &args(&["--server", "http://from-flag/", "-t", "agentic"]),
            file,
        );

        assert_eq!(settings.client.base_url, "http://from-flag/");
        assert_eq!(settings.client.connect_timeout, Duration::from_secs(3));
        assert_eq!(settings.search_type, "agentic");
    }

    #[test]
    fn nothing_configured_leaves_search_type_unset() {
        let settings = resolve(&args(&["--server", "http://x/"]), FileConfig::default());
        assert_eq!(settings.search_type, UNSET_SEARCH_TYPE);
        assert_eq!(settings.client.connect_timeout, Duration::from_secs(10));
    }
}
