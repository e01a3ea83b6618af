use crate::model::{validate_app_config, AppConfig};
use anyhow::{anyhow, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "formforge.yaml";
pub const CONFIG_DIR_ENV: &str = "FORMFORGE_CONFIG_DIR";

/// Candidate lookup: explicit dir, then `<cwd>`, then `<dir>/.tui` for cwd
/// and each ancestor. Returns the first file that exists.
pub fn find_config_path(explicit_dir: Option<&Path>, cwd: &Path) -> Option<PathBuf> {
    if let Some(dir) = explicit_dir {
        let p = dir.join(CONFIG_FILE);
        return p.exists().then_some(p);
    }
    let direct = cwd.join(CONFIG_FILE);
    if direct.exists() {
        return Some(direct);
    }
    let mut cur = Some(cwd);
    while let Some(dir) = cur {
        let p = dir.join(".tui").join(CONFIG_FILE);
        if p.exists() {
            return Some(p);
        }
        cur = dir.parent();
    }
    None
}

pub fn load_config_from_path(path: &Path) -> Result<AppConfig> {
    let s = fs::read_to_string(path).with_context(|| format!("reading config: {path:?}"))?;
    let cfg: AppConfig =
        serde_yaml::from_str(&s).with_context(|| format!("parsing config: {path:?}"))?;
    validate_app_config(&cfg).map_err(|e| anyhow!("invalid config {path:?}: {e}"))?;
    Ok(cfg)
}

/// Loads `formforge.yaml` from the usual places; no file means defaults.
pub fn load_config() -> Result<(AppConfig, Option<PathBuf>)> {
    let explicit = std::env::var(CONFIG_DIR_ENV).ok().map(PathBuf::from);
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    match find_config_path(explicit.as_deref(), &cwd) {
        Some(p) => {
            let cfg = load_config_from_path(&p)?;
            Ok((cfg, Some(p)))
        }
        None => Ok((AppConfig::default(), None)),
    }
}
