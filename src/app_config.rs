//! Application configuration loading for CLI defaults.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};

/// TOML-style file configuration for mediacache defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileConfig {
    /// Default cache directory.
    pub cache_dir: Option<PathBuf>,
    /// Gallery root; finished downloads are copied into an album there.
    pub gallery_dir: Option<PathBuf>,
    /// Album name under the gallery root.
    pub album_name: Option<String>,
    /// Payload file extension (without the dot).
    pub payload_extension: Option<String>,
    /// Default verbosity mode.
    pub verbosity: Option<VerbositySetting>,
    /// Optional download client connect timeout in seconds.
    pub download_connect_timeout_secs: Option<u64>,
    /// Optional download client read timeout in seconds.
    pub download_read_timeout_secs: Option<u64>,
}

impl FileConfig {
    /// Validates config values against runtime constraints.
    pub fn validate(&self) -> Result<()> {
        validate_timeout_secs(
            "download_connect_timeout_secs",
            self.download_connect_timeout_secs,
        )?;
        validate_timeout_secs(
            "download_read_timeout_secs",
            self.download_read_timeout_secs,
        )?;

        if let Some(album) = &self.album_name
            && album.trim().is_empty()
        {
            bail!("Invalid config value for `album_name`: must not be empty");
        }

        if let Some(extension) = &self.payload_extension
            && !is_valid_extension(extension)
        {
            bail!(
                "Invalid config value for `payload_extension`: '{extension}'. Expected ASCII letters and digits"
            );
        }

        Ok(())
    }
}

fn is_valid_extension(extension: &str) -> bool {
    let extension = extension.trim_start_matches('.');
    !extension.is_empty() && extension.bytes().all(|b| b.is_ascii_alphanumeric())
}

fn validate_timeout_secs(field: &str, value: Option<u64>) -> Result<()> {
    let Some(value) = value else {
        return Ok(());
    };
    if !(1..=3600).contains(&value) {
        bail!("Invalid config value for `{field}`: {value}. Expected range: 1..=3600");
    }
    Ok(())
}

/// Supported config verbosity labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerbositySetting {
    Default,
    Verbose,
    Quiet,
    Debug,
}

impl VerbositySetting {
    /// Returns the stable string label for display output.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Verbose => "verbose",
            Self::Quiet => "quiet",
            Self::Debug => "debug",
        }
    }

    /// Tracing filter directive for this setting.
    #[must_use]
    pub fn log_level(self) -> &'static str {
        match self {
            Self::Default => "info",
            Self::Verbose | Self::Debug => "debug",
            Self::Quiet => "error",
        }
    }
}

/// Loaded config metadata.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    /// Resolved config path if a base directory is known.
    pub path: Option<PathBuf>,
    /// Parsed file config when a config file exists and was valid.
    pub config: Option<FileConfig>,
}

/// Resolves default config path.
///
/// Priority:
/// 1. `$XDG_CONFIG_HOME/mediacache/config.toml`
/// 2. `$HOME/.config/mediacache/config.toml`
#[must_use]
pub fn resolve_default_config_path() -> Option<PathBuf> {
    if let Some(xdg_config_home) = env_var_non_empty_os("XDG_CONFIG_HOME") {
        return Some(
            PathBuf::from(xdg_config_home)
                .join("mediacache")
                .join("config.toml"),
        );
    }

    let home = env_var_non_empty_os("HOME")?;
    Some(
        PathBuf::from(home)
            .join(".config")
            .join("mediacache")
            .join("config.toml"),
    )
}

/// Resolves the default cache directory.
///
/// Priority:
/// 1. `$XDG_DATA_HOME/mediacache/videos`
/// 2. `$HOME/.local/share/mediacache/videos`
/// 3. `./videos`
#[must_use]
pub fn resolve_default_cache_dir() -> PathBuf {
    if let Some(xdg_data_home) = env_var_non_empty_os("XDG_DATA_HOME") {
        return PathBuf::from(xdg_data_home)
            .join("mediacache")
            .join("videos");
    }
    if let Some(home) = env_var_non_empty_os("HOME") {
        return PathBuf::from(home)
            .join(".local")
            .join("share")
            .join("mediacache")
            .join("videos");
    }
    PathBuf::from("videos")
}

fn env_var_non_empty_os(name: &str) -> Option<std::ffi::OsString> {
    let value = env::var_os(name)?;
    if value.is_empty() { None } else { Some(value) }
}

/// Loads config from default path if present.
pub fn load_default_file_config() -> Result<LoadedConfig> {
    let path = resolve_default_config_path();
    let Some(path_ref) = path.as_deref() else {
        return Ok(LoadedConfig { path, config: None });
    };

    if !path_ref.exists() {
        return Ok(LoadedConfig { path, config: None });
    }

    let config = load_file_config(path_ref)?;
    Ok(LoadedConfig {
        path,
        config: Some(config),
    })
}

fn load_file_config(path: &Path) -> Result<FileConfig> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file '{}'", path.display()))?;
    parse_config_str(&raw)
        .with_context(|| format!("Failed to parse config file '{}'", path.display()))
}

fn parse_config_str(raw: &str) -> Result<FileConfig> {
    let mut cfg = FileConfig::default();
    for (line_index, raw_line) in raw.lines().enumerate() {
        let line = strip_inline_comment(raw_line).trim();
        if line.is_empty() {
            continue;
        }

        let Some((raw_key, raw_value)) = line.split_once('=') else {
            bail!(
                "Invalid config syntax on line {}: expected key = value",
                line_index + 1
            );
        };

        let key = raw_key.trim();
        let value = raw_value.trim();
        let line_number = line_index + 1;

        match key {
            "cache_dir" => {
                let parsed = parse_string_literal(value)
                    .with_context(|| format!("Invalid `cache_dir` value on line {line_number}"))?;
                cfg.cache_dir = Some(PathBuf::from(parsed));
            }
            "gallery_dir" => {
                let parsed = parse_string_literal(value).with_context(|| {
                    format!("Invalid `gallery_dir` value on line {line_number}")
                })?;
                cfg.gallery_dir = Some(PathBuf::from(parsed));
            }
            "album_name" => {
                let parsed = parse_string_literal(value)
                    .with_context(|| format!("Invalid `album_name` value on line {line_number}"))?;
                cfg.album_name = Some(parsed);
            }
            "payload_extension" => {
                let parsed = parse_string_literal(value).with_context(|| {
                    format!("Invalid `payload_extension` value on line {line_number}")
                })?;
                cfg.payload_extension = Some(parsed);
            }
            "verbosity" => {
                let parsed = parse_string_literal(value)
                    .with_context(|| format!("Invalid `verbosity` value on line {line_number}"))?;
                cfg.verbosity = Some(parse_verbosity(&parsed).with_context(|| {
                    format!("Invalid `verbosity` value '{parsed}' on line {line_number}")
                })?);
            }
            "download_connect_timeout_secs" => {
                let parsed = parse_integer_u64(value).with_context(|| {
                    format!("Invalid `download_connect_timeout_secs` value on line {line_number}")
                })?;
                cfg.download_connect_timeout_secs = Some(parsed);
            }
            "download_read_timeout_secs" => {
                let parsed = parse_integer_u64(value).with_context(|| {
                    format!("Invalid `download_read_timeout_secs` value on line {line_number}")
                })?;
                cfg.download_read_timeout_secs = Some(parsed);
            }
            unknown => {
                bail!("Unknown configuration key: '{unknown}' on line {line_number}");
            }
        }
    }
    cfg.validate()?;
    Ok(cfg)
}

fn strip_inline_comment(line: &str) -> &str {
    let mut in_string = false;
    for (index, ch) in line.char_indices() {
        match ch {
            '"' => in_string = !in_string,
            '#' if !in_string => return &line[..index],
            _ => {}
        }
    }
    line
}

fn parse_string_literal(raw_value: &str) -> Result<String> {
    if raw_value.len() < 2 || !raw_value.starts_with('"') || !raw_value.ends_with('"') {
        bail!("Expected double-quoted string");
    }
    Ok(raw_value[1..raw_value.len() - 1].to_string())
}

fn parse_integer_u64(raw_value: &str) -> Result<u64> {
    let token = raw_value.trim();
    if token.is_empty() {
        bail!("Expected integer value");
    }
    let value = token.parse::<i128>()?;
    if value < 0 {
        bail!("Expected non-negative integer");
    }
    u64::try_from(value).map_err(|_| anyhow::anyhow!("Integer value out of range for u64"))
}

fn parse_verbosity(value: &str) -> Result<VerbositySetting> {
    match value {
        "default" => Ok(VerbositySetting::Default),
        "verbose" => Ok(VerbositySetting::Verbose),
        "quiet" => Ok(VerbositySetting::Quiet),
        "debug" => Ok(VerbositySetting::Debug),
        _ => bail!("Expected one of: default, verbose, quiet, debug"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config_partial_fields() {
        let cfg = parse_config_str(
            r#"
cache_dir = "/srv/videos"
verbosity = "verbose"
"#,
        )
        .expect("partial config should parse");
        assert_eq!(cfg.cache_dir, Some(PathBuf::from("/srv/videos")));
        assert_eq!(cfg.verbosity, Some(VerbositySetting::Verbose));
        assert!(cfg.gallery_dir.is_none());
    }

    #[test]
    fn test_parse_config_gallery_fields() {
        let cfg = parse_config_str(
            r#"
gallery_dir = "/home/me/Movies"
album_name = "Saved # for later"
payload_extension = "mkv"
"#,
        )
        .expect("gallery config should parse");
        assert_eq!(cfg.gallery_dir, Some(PathBuf::from("/home/me/Movies")));
        assert_eq!(cfg.album_name.as_deref(), Some("Saved # for later"));
        assert_eq!(cfg.payload_extension.as_deref(), Some("mkv"));
    }

    #[test]
    fn test_parse_config_supports_inline_comments() {
        let cfg = parse_config_str(
            r#"
download_read_timeout_secs = 60 # slow links
verbosity = "quiet" # preferred noise level
"#,
        )
        .expect("config with comments should parse");
        assert_eq!(cfg.download_read_timeout_secs, Some(60));
        assert_eq!(cfg.verbosity, Some(VerbositySetting::Quiet));
    }

    #[test]
    fn test_parse_config_rejects_invalid_timeout_value() {
        let err = parse_config_str("download_connect_timeout_secs = 0")
            .expect_err("invalid timeout expected");
        assert!(err.to_string().contains("download_connect_timeout_secs"));

        let err = parse_config_str("download_read_timeout_secs = 3601")
            .expect_err("invalid timeout expected");
        assert!(err.to_string().contains("download_read_timeout_secs"));
    }

    #[test]
    fn test_parse_config_rejects_numeric_values_with_trailing_tokens() {
        let err = parse_config_str("download_read_timeout_secs = 4 trailing")
            .expect_err("expected trailing token error");
        assert!(err.to_string().contains("download_read_timeout_secs"));
    }

    #[test]
    fn test_parse_config_rejects_unquoted_strings() {
        let err = parse_config_str("cache_dir = /srv/videos").expect_err("quotes are required");
        assert!(err.to_string().contains("cache_dir"));
    }

    #[test]
    fn test_parse_config_rejects_bad_extension() {
        let err = parse_config_str(r#"payload_extension = "m/p4""#)
            .expect_err("invalid extension expected");
        assert!(err.to_string().contains("payload_extension"));
    }

    #[test]
    fn test_parse_config_rejects_empty_album() {
        let err = parse_config_str(r#"album_name = " ""#).expect_err("empty album expected");
        assert!(err.to_string().contains("album_name"));
    }

    #[test]
    fn test_parse_config_rejects_unknown_keys() {
        let err = parse_config_str("unknown_key = 123").expect_err("unknown key error expected");
        assert!(err.to_string().contains("Unknown configuration key"));
        assert!(err.to_string().contains("unknown_key"));
    }

    #[test]
    fn test_parse_config_rejects_missing_equals() {
        let err = parse_config_str("cache_dir").expect_err("syntax error expected");
        assert!(err.to_string().contains("line 1"));
    }

    #[test]
    fn test_verbosity_labels_and_levels() {
        assert_eq!(VerbositySetting::Default.as_str(), "default");
        assert_eq!(VerbositySetting::Quiet.as_str(), "quiet");
        assert_eq!(VerbositySetting::Default.log_level(), "info");
        assert_eq!(VerbositySetting::Debug.log_level(), "debug");
        assert_eq!(VerbositySetting::Quiet.log_level(), "error");
    }
}
