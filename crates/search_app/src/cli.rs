use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use log::LevelFilter;
use search_logging::{LogDestination, DEFAULT_LOG_FILE};

#[derive(Parser, Debug)]
#[command(
    name = "search_app",
    version,
    about = "Terminal client for a streaming search server"
)]
/// Command-line arguments accepted by the `search_app` binary.
pub(crate) struct CliArgs {
    #[arg(
        short,
        long,
        value_name = "URL",
        env = "SEARCH_SERVER",
        help = "Search server root (default: config file, else http://127.0.0.1:5000/)"
    )]
    pub(crate) server: Option<String>,
    #[arg(
        short = 't',
        long,
        value_name = "TYPE",
        env = "SEARCH_TYPE",
        help = "Search type, e.g. simple or agentic (default: config file, else none)"
    )]
    pub(crate) search_type: Option<String>,
    #[arg(
        short,
        long,
        value_name = "FILE",
        default_value = "search_client.ron",
        help = "RON configuration file; a missing file is not an error"
    )]
    pub(crate) config: PathBuf,
    #[arg(long, value_enum, default_value_t = LogTarget::File, help = "Where log output goes")]
    pub(crate) log: LogTarget,
    #[arg(long, value_name = "FILE", default_value = DEFAULT_LOG_FILE, help = "Log file path")]
    pub(crate) log_file: PathBuf,
    #[arg(short, long, help = "Log at debug level")]
    pub(crate) verbose: bool,
    #[arg(
        value_name = "QUERY",
        help = "Run a single search and exit; omit to read queries from stdin"
    )]
    pub(crate) query: Option<String>,
}

impl CliArgs {
    pub(crate) fn log_level(&self) -> LevelFilter {
        if self.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum LogTarget {
    File,
    Terminal,
    Both,
}

impl From<LogTarget> for LogDestination {
    fn from(target: LogTarget) -> Self {
        match target {
            LogTarget::File => LogDestination::File,
            LogTarget::Terminal => LogDestination::Terminal,
            LogTarget::Both => LogDestination::Both,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        CliArgs::command().debug_assert();
    }

    #[test]
    fn one_shot_query_and_flags_parse() {
        let args = CliArgs::try_parse_from([
            "search_app",
            "--server",
            "http://search.local:8080",
            "-t",
            "agentic",
            "--log",
            "both",
            "-v",
            "weather tomorrow",
        ])
        .unwrap();

        assert_eq!(args.server.as_deref(), Some("http://search.local:8080"));
        assert_eq!(args.search_type.as_deref(), Some("agentic"));
        assert_eq!(args.log, LogTarget::Both);
        assert_eq!(args.log_level(), LevelFilter::Debug);
        assert_eq!(args.query.as_deref(), Some("weather tomorrow"));
        assert_eq!(args.config, PathBuf::from("search_client.ron"));
    }
}
