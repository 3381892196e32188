//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Offline download cache for a media catalog.
///
/// Mediacache downloads catalog videos for offline viewing, keeps them in a
/// local cache directory, and remembers them across runs.
#[derive(Parser, Debug)]
#[command(name = "mediacache")]
#[command(author, version, about)]
pub struct Args {
    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Directory holding cached payloads and metadata
    #[arg(long, value_name = "DIR", global = true)]
    pub cache_dir: Option<PathBuf>,

    /// Load the catalog from a JSON file instead of the built-in list
    #[arg(long, value_name = "FILE", global = true)]
    pub catalog: Option<PathBuf>,

    /// Copy finished downloads into an album under this directory
    #[arg(long, value_name = "DIR", global = true)]
    pub gallery_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// List catalog items and whether each is cached
    Catalog {
        /// Only show items with this genre
        #[arg(long)]
        genre: Option<String>,

        /// Only show items whose title or description contains this text
        #[arg(long)]
        search: Option<String>,
    },

    /// Download catalog items for offline viewing
    Download {
        /// Catalog identifiers to download
        #[arg(value_name = "ID", required = true)]
        ids: Vec<String>,
    },

    /// List cached items with their sizes
    List,

    /// Remove cached items
    Remove {
        /// Identifiers to remove
        #[arg(value_name = "ID", required = true)]
        ids: Vec<String>,
    },

    /// Print the local file path of a cached item
    Path {
        /// Identifier to look up
        #[arg(value_name = "ID")]
        id: String,
    },

    /// Show cache storage usage
    Status,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_subcommand_is_required() {
        let result = Args::try_parse_from(["mediacache"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_verbose_flag_increments_count() {
        let args = Args::try_parse_from(["mediacache", "-v", "list"]).unwrap();
        assert_eq!(args.verbose, 1);

        let args = Args::try_parse_from(["mediacache", "-vv", "list"]).unwrap();
        assert_eq!(args.verbose, 2);

        let args = Args::try_parse_from(["mediacache", "list", "--verbose"]).unwrap();
        assert_eq!(args.verbose, 1);
    }

    #[test]
    fn test_cli_quiet_flag_sets_quiet() {
        let args = Args::try_parse_from(["mediacache", "-q", "status"]).unwrap();
        assert!(args.quiet);
        assert_eq!(args.command, Command::Status);
    }

    #[test]
    fn test_cli_help_flag_shows_usage() {
        let result = Args::try_parse_from(["mediacache", "--help"]);
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }

    #[test]
    fn test_cli_version_flag_shows_version() {
        let result = Args::try_parse_from(["mediacache", "--version"]);
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
    }

    #[test]
    fn test_cli_invalid_flag_returns_error() {
        let result = Args::try_parse_from(["mediacache", "--invalid-flag", "list"]);
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::UnknownArgument);
    }

    #[test]
    fn test_cli_global_paths() {
        let args = Args::try_parse_from([
            "mediacache",
            "list",
            "--cache-dir",
            "/tmp/videos",
            "--catalog",
            "catalog.json",
            "--gallery-dir",
            "/tmp/gallery",
        ])
        .unwrap();
        assert_eq!(args.cache_dir, Some(PathBuf::from("/tmp/videos")));
        assert_eq!(args.catalog, Some(PathBuf::from("catalog.json")));
        assert_eq!(args.gallery_dir, Some(PathBuf::from("/tmp/gallery")));
    }

    #[test]
    fn test_cli_catalog_filters() {
        let args =
            Args::try_parse_from(["mediacache", "catalog", "--genre", "Ocean", "--search", "blue"])
                .unwrap();
        assert_eq!(
            args.command,
            Command::Catalog {
                genre: Some("Ocean".to_string()),
                search: Some("blue".to_string()),
            }
        );
    }

    #[test]
    fn test_cli_download_accepts_many_ids() {
        let args = Args::try_parse_from(["mediacache", "download", "1", "2", "3"]).unwrap();
        assert_eq!(
            args.command,
            Command::Download {
                ids: vec!["1".to_string(), "2".to_string(), "3".to_string()]
            }
        );
    }

    #[test]
    fn test_cli_download_requires_an_id() {
        let err = Args::try_parse_from(["mediacache", "download"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn test_cli_remove_and_path() {
        let args = Args::try_parse_from(["mediacache", "remove", "4", "5"]).unwrap();
        assert_eq!(
            args.command,
            Command::Remove {
                ids: vec!["4".to_string(), "5".to_string()]
            }
        );

        let args = Args::try_parse_from(["mediacache", "path", "4"]).unwrap();
        assert_eq!(
            args.command,
            Command::Path {
                id: "4".to_string()
            }
        );
    }
}
