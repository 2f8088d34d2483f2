//! Command line interface

use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use std::path::PathBuf;
use std::time::Duration;
use vxforms_core::config::DEFAULT_BIND;
use vxforms_core::VxFormsConfig;

/// Options not carried by [`VxFormsConfig`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LogOptions {
    /// Emit JSON log lines
    pub json: bool,
}

/// Build the command
#[must_use]
pub fn command() -> Command {
    Command::new("vxforms-server")
        .version(crate::VERSION)
        .about("vxForms template and document submission server")
        .arg(
            Arg::new("bind")
                .long("bind")
                .default_value(DEFAULT_BIND)
                .help("Listen address"),
        )
        .arg(
            Arg::new("seed")
                .long("seed")
                .value_parser(value_parser!(PathBuf))
                .help("JSON seed file for the in-memory document store"),
        )
        .arg(
            Arg::new("cache-capacity")
                .long("cache-capacity")
                .default_value("64")
                .value_parser(value_parser!(u64))
                .help("Maximum number of cached lookup results"),
        )
        .arg(
            Arg::new("cache-ttl")
                .long("cache-ttl")
                .value_parser(value_parser!(u64))
                .help("Lookup result lifetime in seconds (default: process lifetime)"),
        )
        .arg(
            Arg::new("json-logs")
                .long("json-logs")
                .action(ArgAction::SetTrue)
                .help("Emit logs as JSON lines"),
        )
}

/// Configuration described by parsed arguments
#[must_use]
pub fn config_from(matches: &ArgMatches) -> (VxFormsConfig, LogOptions) {
    let mut config = VxFormsConfig::default();
    if let Some(bind) = matches.get_one::<String>("bind") {
        config = config.with_bind(bind.clone());
    }
    if let Some(&capacity) = matches.get_one::<u64>("cache-capacity") {
        config = config.with_cache_capacity(capacity);
    }
    if let Some(&secs) = matches.get_one::<u64>("cache-ttl") {
        config = config.with_cache_ttl(Duration::from_secs(secs));
    }
    if let Some(seed) = matches.get_one::<PathBuf>("seed") {
        config = config.with_seed_file(seed.clone());
    }
    let log = LogOptions {
        json: matches.get_flag("json-logs"),
    };
    (config, log)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_config_defaults() {
        let matches = command().try_get_matches_from(["vxforms-server"]).unwrap();
        let (config, log) = config_from(&matches);
        assert_eq!(config, VxFormsConfig::default());
        assert!(!log.json);
    }

    #[test]
    fn flags_override_defaults() {
        let matches = command()
            .try_get_matches_from([
                "vxforms-server",
                "--bind",
                "127.0.0.1:9090",
                "--seed",
                "seed.json",
                "--cache-capacity",
                "32",
                "--cache-ttl",
                "600",
                "--json-logs",
            ])
            .unwrap();
        let (config, log) = config_from(&matches);

        assert_eq!(config.bind, "127.0.0.1:9090");
        assert_eq!(config.seed_file, Some(PathBuf::from("seed.json")));
        assert_eq!(config.cache_capacity, 32);
        assert_eq!(config.cache_ttl_secs, Some(600));
        assert!(log.json);
    }

    #[test]
    fn rejects_non_numeric_capacity() {
        let result = command().try_get_matches_from(["vxforms-server", "--cache-capacity", "many"]);
        assert!(result.is_err());
    }
}
