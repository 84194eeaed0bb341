//! File configuration and CLI merge for run settings.
//!
//! Precedence: CLI flag > config file > built-in default.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use homebrew_catalog::config::normalize_base_url;
use homebrew_catalog::{DEFAULT_OUTPUT_FILE, ScraperConfig};

use crate::cli::Args;

/// `key = value` file configuration. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileConfig {
    /// Output JSON file.
    pub output: Option<PathBuf>,
    /// Archive collection.
    pub collection: Option<String>,
    /// Archive root URL.
    pub base_url: Option<String>,
    /// Pause after each item request, in milliseconds.
    pub delay_ms: Option<u64>,
    /// Per-request timeout, in seconds.
    pub timeout_secs: Option<u64>,
    /// Rows per search page.
    pub rows: Option<u32>,
    /// Maximum search pages.
    pub max_pages: Option<u32>,
}

impl FileConfig {
    /// Validates values against the same ranges the CLI enforces.
    pub fn validate(&self) -> Result<()> {
        if let Some(delay_ms) = self.delay_ms
            && delay_ms > 60_000
        {
            bail!("Invalid config value for `delay_ms`: {delay_ms}. Expected range: 0..=60000");
        }
        if let Some(timeout_secs) = self.timeout_secs
            && !(1..=3600).contains(&timeout_secs)
        {
            bail!(
                "Invalid config value for `timeout_secs`: {timeout_secs}. Expected range: 1..=3600"
            );
        }
        if let Some(rows) = self.rows
            && !(1..=10_000).contains(&rows)
        {
            bail!("Invalid config value for `rows`: {rows}. Expected range: 1..=10000");
        }
        if let Some(max_pages) = self.max_pages
            && !(1..=1000).contains(&max_pages)
        {
            bail!("Invalid config value for `max_pages`: {max_pages}. Expected range: 1..=1000");
        }
        Ok(())
    }
}

/// Loaded config metadata.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    /// Path that was consulted, if any.
    pub path: Option<PathBuf>,
    /// Parsed config when the file existed.
    pub config: Option<FileConfig>,
}

/// Fully resolved settings for one run.
#[derive(Debug, Clone)]
pub struct RunSettings {
    /// Scraper configuration.
    pub scraper: ScraperConfig,
    /// Where the catalog is written.
    pub output: PathBuf,
}

/// Resolves the default config path.
///
/// Priority:
/// 1. `$XDG_CONFIG_HOME/homebrew-catalog/config.toml`
/// 2. `$HOME/.config/homebrew-catalog/config.toml`
#[must_use]
pub fn resolve_default_config_path() -> Option<PathBuf> {
    if let Some(xdg_config_home) = env_var_non_empty_os("XDG_CONFIG_HOME") {
        return Some(
            PathBuf::from(xdg_config_home)
                .join("homebrew-catalog")
                .join("config.toml"),
        );
    }

    let home = env_var_non_empty_os("HOME")?;
    Some(
        PathBuf::from(home)
            .join(".config")
            .join("homebrew-catalog")
            .join("config.toml"),
    )
}

fn env_var_non_empty_os(name: &str) -> Option<std::ffi::OsString> {
    let value = env::var_os(name)?;
    if value.is_empty() { None } else { Some(value) }
}

/// Loads `explicit` if given (it must exist), else the default path if present.
pub fn load_config(explicit: Option<&Path>) -> Result<LoadedConfig> {
    if let Some(path) = explicit {
        let config = load_file_config(path)?;
        return Ok(LoadedConfig {
            path: Some(path.to_path_buf()),
            config: Some(config),
        });
    }

    let path = resolve_default_config_path();
    let config = match path.as_deref() {
        Some(path_ref) if path_ref.exists() => Some(load_file_config(path_ref)?),
        _ => None,
    };
    Ok(LoadedConfig { path, config })
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
        let line_no = line_index + 1;
        let line = strip_inline_comment(raw_line).trim();
        if line.is_empty() {
            continue;
        }

        let Some((raw_key, raw_value)) = line.split_once('=') else {
            bail!("Invalid config syntax on line {line_no}: expected key = value");
        };

        let key = raw_key.trim();
        let value = raw_value.trim();
        let invalid = || format!("Invalid `{key}` value on line {line_no}");

        match key {
            "output" => {
                let raw_path = parse_string_literal(value).with_context(invalid)?;
                cfg.output = Some(PathBuf::from(raw_path));
            }
            "collection" => {
                cfg.collection = Some(parse_string_literal(value).with_context(invalid)?);
            }
            "base_url" => cfg.base_url = Some(parse_string_literal(value).with_context(invalid)?),
            "delay_ms" => cfg.delay_ms = Some(parse_integer(value).with_context(invalid)?),
            "timeout_secs" => {
                cfg.timeout_secs = Some(parse_integer(value).with_context(invalid)?);
            }
            "rows" => cfg.rows = Some(parse_integer(value).with_context(invalid)?),
            "max_pages" => cfg.max_pages = Some(parse_integer(value).with_context(invalid)?),
            _ => bail!("Unknown config key `{key}` on line {line_no}"),
        }
    }

    cfg.validate()?;
    Ok(cfg)
}

/// Drops a `#` comment that is not inside a double-quoted string.
fn strip_inline_comment(line: &str) -> &str {
    let mut in_string = false;
    let mut escaped = false;
    for (index, ch) in line.char_indices() {
        match ch {
            '\\' if in_string => escaped = !escaped,
            '"' if !escaped => {
                in_string = !in_string;
                escaped = false;
            }
            '#' if !in_string => return &line[..index],
            _ => escaped = false,
        }
    }
    line
}

fn parse_string_literal(value: &str) -> Result<String> {
    let Some(inner) = value
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
    else {
        bail!("expected a double-quoted string");
    };

    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(ch) = chars.next() {
        if ch == '\\' {
            match chars.next() {
                Some('"') => out.push('"'),
                Some('\\') => out.push('\\'),
                Some('n') => out.push('\n'),
                Some('t') => out.push('\t'),
                Some(other) => bail!("unsupported escape sequence \\{other}"),
                None => bail!("dangling escape at end of string"),
            }
        } else {
            out.push(ch);
        }
    }
    Ok(out)
}

fn parse_integer<T: std::str::FromStr>(value: &str) -> Result<T> {
    let digits = value.replace('_', "");
    digits
        .parse::<T>()
        .map_err(|_| anyhow::anyhow!("expected a non-negative integer, got `{value}`"))
}

/// Merges CLI flags over the file config over built-in defaults.
#[must_use]
pub fn resolve_settings(args: &Args, file: Option<&FileConfig>) -> RunSettings {
    let file = file.cloned().unwrap_or_default();
    let mut scraper = ScraperConfig::default();

    if let Some(base_url) = args.base_url.clone().or(file.base_url) {
        scraper.base_url = normalize_base_url(base_url);
    }
    if let Some(collection) = args.collection.clone().or(file.collection) {
        scraper.collection = collection;
    }
    if let Some(delay_ms) = args.delay_ms.or(file.delay_ms) {
        scraper.request_delay = Duration::from_millis(delay_ms);
    }
    if let Some(timeout_secs) = args.timeout_secs.or(file.timeout_secs) {
        scraper.request_timeout = Duration::from_secs(timeout_secs);
    }
    if let Some(rows) = args.rows.or(file.rows) {
        scraper.search_rows = rows;
    }
    if let Some(max_pages) = args.max_pages.or(file.max_pages) {
        scraper.max_search_pages = max_pages;
    }

    let output = args
        .output
        .clone()
        .or(file.output)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_FILE));

    RunSettings { scraper, output }
}
