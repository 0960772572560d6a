//! Configuration discovery and effective settings resolution.
//!
//! zephyr2vsc reads an optional `zephyr2vsc.toml|yaml|yml` from the source
//! root. Defaults:
//! - `ninja`: `ninja`
//! - `output`: `human`
//! - `templates.settings|properties`: built-in templates
//! - `exclude.extra`: none
//!
//! Template paths are relative to the source root unless absolute.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_NAMES: [&str; 3] = ["zephyr2vsc.toml", "zephyr2vsc.yaml", "zephyr2vsc.yml"];

#[derive(Debug, Default, Deserialize, Clone)]
/// Template overrides under `[templates]`.
pub struct TemplatesCfg {
    pub settings: Option<String>,
    pub properties: Option<String>,
}

#[derive(Debug, Default, Deserialize, Clone)]
/// Extra exclusions under `[exclude]`.
pub struct ExcludeCfg {
    #[serde(default)]
    pub extra: Vec<String>,
}

#[derive(Debug, Default, Deserialize, Clone)]
/// Root configuration loaded from `zephyr2vsc.toml|yaml`.
pub struct ZephyrConfig {
    pub ninja: Option<String>,
    pub output: Option<String>,
    #[serde(default)]
    pub templates: Option<TemplatesCfg>,
    #[serde(default)]
    pub exclude: Option<ExcludeCfg>,
}

#[derive(Debug, Clone, PartialEq)]
/// Fully-resolved configuration used by the pipeline.
pub struct Effective {
    pub ninja: String,
    pub output: String,
    pub settings_template: Option<PathBuf>,
    pub properties_template: Option<PathBuf>,
    pub extra_excludes: Vec<String>,
}

impl Default for Effective {
    fn default() -> Self {
        Effective {
            ninja: "ninja".to_string(),
            output: "human".to_string(),
            settings_template: None,
            properties_template: None,
            extra_excludes: Vec::new(),
        }
    }
}

/// Path of the first config file present in `root`.
pub fn find_config(root: &Path) -> Option<PathBuf> {
    CONFIG_NAMES.iter().map(|n| root.join(n)).find(|p| p.is_file())
}

/// Load `ZephyrConfig` from `root`. `Ok(None)` when no file exists; `Err`
/// carries a parse message when one exists but is invalid.
pub fn load_config(root: &Path) -> Result<Option<ZephyrConfig>, String> {
    let Some(path) = find_config(root) else {
        return Ok(None);
    };
    let s = fs::read_to_string(&path).map_err(|e| format!("{}: {}", path.display(), e))?;
    let parsed = if path.extension().is_some_and(|e| e == "toml") {
        toml::from_str::<ZephyrConfig>(&s).map_err(|e| e.to_string())
    } else {
        serde_yaml::from_str::<ZephyrConfig>(&s).map_err(|e| e.to_string())
    };
    parsed
        .map(Some)
        .map_err(|e| format!("{}: {}", path.display(), e))
}

/// Resolve `Effective` from a loaded config (if any) and defaults.
pub fn resolve_effective(src_root: &Path, cfg: Option<ZephyrConfig>) -> Effective {
    let cfg = cfg.unwrap_or_default();
    let defaults = Effective::default();
    let templates = cfg.templates.unwrap_or_default();
    let resolve = |p: String| {
        let p = PathBuf::from(p);
        if p.is_absolute() {
            p
        } else {
            src_root.join(p)
        }
    };
    Effective {
        ninja: cfg.ninja.unwrap_or(defaults.ninja),
        output: cfg.output.unwrap_or(defaults.output),
        settings_template: templates.settings.map(resolve),
        properties_template: templates.properties.map(resolve),
        extra_excludes: cfg.exclude.map(|e| e.extra).unwrap_or_default(),
    }
}
