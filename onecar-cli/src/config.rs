use anyhow::{Context, Result, bail};
use clap::ValueEnum;
use onecar_finance::KeywordTable;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::state::{ensure_onecar_home, onecar_home};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub keywords: KeywordsSection,
    #[serde(default)]
    pub output: OutputSection,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KeywordsSection {
    /// Keyword table file; the built-in table is used when unset
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutputSection {
    #[serde(default)]
    pub format: OutputFormat,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

pub fn config_path() -> Result<PathBuf> {
    Ok(onecar_home()?.join("config.toml"))
}

pub fn keywords_path() -> Result<PathBuf> {
    Ok(onecar_home()?.join("keywords.toml"))
}

pub fn load_config() -> Result<Config> {
    load_config_from(&config_path()?)
}

/// Missing file means defaults
pub fn load_config_from(p: &Path) -> Result<Config> {
    if !p.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(p).with_context(|| format!("read {}", p.display()))?;
    toml::from_str(&s).with_context(|| format!("parse {}", p.display()))
}

pub fn save_config(cfg: &Config) -> Result<()> {
    ensure_onecar_home()?;
    save_config_to(&config_path()?, cfg)
}

pub fn save_config_to(p: &Path, cfg: &Config) -> Result<()> {
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(p, s).with_context(|| format!("write {}", p.display()))?;
    Ok(())
}

pub fn read_keyword_table(p: &Path) -> Result<KeywordTable> {
    let s = fs::read_to_string(p).with_context(|| format!("read {}", p.display()))?;
    KeywordTable::from_toml_str(&s).with_context(|| format!("parse {}", p.display()))
}

/// Effective keyword table: `--keywords` beats the config file, which beats
/// the built-in table.
pub fn resolve_keyword_table(cfg: &Config, override_path: Option<&Path>) -> Result<KeywordTable> {
    match override_path.or(cfg.keywords.path.as_deref()) {
        Some(p) => read_keyword_table(p),
        None => Ok(KeywordTable::builtin().clone()),
    }
}

/// Write the built-in table to `keywords.toml` and point the config at it
pub fn init_keywords() -> Result<PathBuf> {
    ensure_onecar_home()?;
    let p = keywords_path()?;
    if p.exists() {
        bail!("{} already exists; edit it or remove it first", p.display());
    }
    write_builtin_keywords(&p)?;

    let mut cfg = load_config()?;
    cfg.keywords.path = Some(p.clone());
    save_config(&cfg)?;
    Ok(p)
}

fn write_builtin_keywords(p: &Path) -> Result<()> {
    let s = KeywordTable::builtin().to_toml_string()?;
    fs::write(p, s).with_context(|| format!("write {}", p.display()))
}
