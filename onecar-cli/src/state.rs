use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

/// `$ONECAR_HOME`, else `~/.onecar`
pub fn onecar_home() -> Result<PathBuf> {
    if let Some(dir) = std::env::var_os("ONECAR_HOME").filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(dir));
    }
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".onecar"))
}

pub fn ensure_onecar_home() -> Result<PathBuf> {
    let dir = onecar_home()?;
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir)
}
