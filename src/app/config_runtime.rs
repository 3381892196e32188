use std::path::PathBuf;

use mediacache_core::cache::DEFAULT_PAYLOAD_EXTENSION;
use mediacache_core::download::{CONNECT_TIMEOUT_SECS, READ_TIMEOUT_SECS};
use mediacache_core::gallery::DEFAULT_ALBUM_NAME;

use crate::app_config::{FileConfig, VerbositySetting, resolve_default_cache_dir};
use crate::cli::Args;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct HttpTimeoutSettings {
    pub(crate) connect_secs: u64,
    pub(crate) read_secs: u64,
}

impl Default for HttpTimeoutSettings {
    fn default() -> Self {
        Self {
            connect_secs: CONNECT_TIMEOUT_SECS,
            read_secs: READ_TIMEOUT_SECS,
        }
    }
}

/// Effective settings after merging CLI flags over the config file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RuntimeSettings {
    pub(crate) cache_dir: PathBuf,
    pub(crate) catalog_file: Option<PathBuf>,
    pub(crate) gallery_dir: Option<PathBuf>,
    pub(crate) album_name: String,
    pub(crate) payload_extension: String,
    pub(crate) timeouts: HttpTimeoutSettings,
}

pub(crate) fn resolve_runtime_settings(
    args: &Args,
    file_config: Option<&FileConfig>,
) -> RuntimeSettings {
    let cache_dir = args
        .cache_dir
        .clone()
        .or_else(|| file_config.and_then(|cfg| cfg.cache_dir.clone()))
        .unwrap_or_else(resolve_default_cache_dir);
    let gallery_dir = args
        .gallery_dir
        .clone()
        .or_else(|| file_config.and_then(|cfg| cfg.gallery_dir.clone()));

    let album_name = file_config
        .and_then(|cfg| cfg.album_name.clone())
        .unwrap_or_else(|| DEFAULT_ALBUM_NAME.to_string());
    let payload_extension = file_config
        .and_then(|cfg| cfg.payload_extension.clone())
        .unwrap_or_else(|| DEFAULT_PAYLOAD_EXTENSION.to_string());

    let defaults = HttpTimeoutSettings::default();
    let timeouts = HttpTimeoutSettings {
        connect_secs: file_config
            .and_then(|cfg| cfg.download_connect_timeout_secs)
            .unwrap_or(defaults.connect_secs),
        read_secs: file_config
            .and_then(|cfg| cfg.download_read_timeout_secs)
            .unwrap_or(defaults.read_secs),
    };

    RuntimeSettings {
        cache_dir,
        catalog_file: args.catalog.clone(),
        gallery_dir,
        album_name,
        payload_extension,
        timeouts,
    }
}

/// Default log level.
///
/// Priority: quiet flag > verbose flag > config verbosity > info.
/// `RUST_LOG` overrides all of these when the subscriber is installed.
pub(crate) fn default_log_level(args: &Args, file_config: Option<&FileConfig>) -> &'static str {
    if args.quiet {
        return "error";
    }
    match args.verbose {
        0 => file_config
            .and_then(|cfg| cfg.verbosity)
            .map_or("info", VerbositySetting::log_level),
        1 => "debug",
        _ => "trace",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn args(argv: &[&str]) -> Args {
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_cli_paths_override_file_config() {
        let file = FileConfig {
            cache_dir: Some(PathBuf::from("/from/file")),
            gallery_dir: Some(PathBuf::from("/gallery/file")),
            ..FileConfig::default()
        };
        let settings = resolve_runtime_settings(
            &args(&["mediacache", "--cache-dir", "/from/cli", "list"]),
            Some(&file),
        );
        assert_eq!(settings.cache_dir, PathBuf::from("/from/cli"));
        assert_eq!(settings.gallery_dir, Some(PathBuf::from("/gallery/file")));
    }

    #[test]
    fn test_file_config_fills_unset_values() {
        let file = FileConfig {
            cache_dir: Some(PathBuf::from("/from/file")),
            album_name: Some("Trips".to_string()),
            payload_extension: Some("mkv".to_string()),
            download_read_timeout_secs: Some(90),
            ..FileConfig::default()
        };
        let settings = resolve_runtime_settings(&args(&["mediacache", "status"]), Some(&file));
        assert_eq!(settings.cache_dir, PathBuf::from("/from/file"));
        assert_eq!(settings.album_name, "Trips");
        assert_eq!(settings.payload_extension, "mkv");
        assert_eq!(settings.timeouts.read_secs, 90);
        assert_eq!(settings.timeouts.connect_secs, CONNECT_TIMEOUT_SECS);
    }

    #[test]
    fn test_defaults_without_file_config() {
        let settings = resolve_runtime_settings(&args(&["mediacache", "list"]), None);
        assert_eq!(settings.album_name, DEFAULT_ALBUM_NAME);
        assert_eq!(settings.payload_extension, DEFAULT_PAYLOAD_EXTENSION);
        assert_eq!(settings.timeouts, HttpTimeoutSettings::default());
        assert!(settings.gallery_dir.is_none());
    }

    #[test]
    fn test_log_level_priority() {
        let quiet_file = FileConfig {
            verbosity: Some(VerbositySetting::Quiet),
            ..FileConfig::default()
        };
        assert_eq!(default_log_level(&args(&["mediacache", "list"]), None), "info");
        assert_eq!(
            default_log_level(&args(&["mediacache", "list"]), Some(&quiet_file)),
            "error"
        );
        assert_eq!(
            default_log_level(&args(&["mediacache", "-v", "list"]), Some(&quiet_file)),
            "debug"
        );
        assert_eq!(default_log_level(&args(&["mediacache", "-vv", "list"]), None), "trace");
        assert_eq!(
            default_log_level(&args(&["mediacache", "-q", "-v", "list"]), None),
            "error"
        );
    }
}
