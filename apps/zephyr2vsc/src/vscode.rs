//! VS Code configuration synthesis: `settings.json` and
//! `c_cpp_properties.json` under `<src>/.vscode`.
//!
//! Templates are rebuilt (or cloned) for every call to [`synthesize`], so
//! repeated runs in one process never see each other's entries.

use crate::error::{Error, Result};
use crate::utils;
use serde_json::{json, Map, Value as Json};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

pub const VSCODE_DIR: &str = ".vscode";
pub const SETTINGS_FILE: &str = "settings.json";
pub const PROPERTIES_FILE: &str = "c_cpp_properties.json";

/// Patterns always excluded on top of the template.
pub const FIXED_EXCLUDES: [&str; 2] = ["**/.github", "**/.known-issues"];

const BUILTIN: &str = "<built-in>";

pub fn settings_template() -> Json {
    json!({
        "files.exclude": {
            "**/.git": true,
            "**/.svn": true,
            "**/.hg": true,
            "**/CVS": true,
            "**/.DS_Store": true,
            "**/test*": true
        },
        "C_Cpp.exclusionPolicy": "checkFilesAndFolders",
        "C_Cpp.intelliSenseEngine": "Default",
        "cmake.configureOnOpen": false
    })
}

pub fn properties_template() -> Json {
    json!({
        "configurations": [
            {
                "name": "Zephyr",
                "compilerPath": "",
                "cStandard": "c99",
                "cppStandard": "c++11",
                "intelliSenseMode": "gcc-x64",
                "compileCommands": "",
                "browse": {
                    "limitSymbolsToIncludedHeaders": true,
                    "databaseFilename": "${workspaceFolder}/.vscode/browse.zephyr.db",
                    "path": []
                }
            }
        ],
        "version": 4
    })
}

/// The pair of templates a run starts from, with where each came from.
#[derive(Debug, Clone)]
pub struct Templates {
    pub settings: Json,
    pub properties: Json,
    settings_origin: PathBuf,
    properties_origin: PathBuf,
}

impl Default for Templates {
    fn default() -> Self {
        Templates {
            settings: settings_template(),
            properties: properties_template(),
            settings_origin: PathBuf::from(BUILTIN),
            properties_origin: PathBuf::from(BUILTIN),
        }
    }
}

impl Templates {
    /// Load templates, replacing a built-in one with the JSON file given for it.
    pub fn load(settings: Option<&Path>, properties: Option<&Path>) -> Result<Self> {
        let mut t = Templates::default();
        if let Some(p) = settings {
            t.settings = read_template(p)?;
            t.settings_origin = p.to_path_buf();
        }
        if let Some(p) = properties {
            t.properties = read_template(p)?;
            t.properties_origin = p.to_path_buf();
        }
        // fail early on a bad shape rather than after the compile db ran
        let mut check = t.clone();
        exclude_map(&mut check.settings, &t.settings_origin)?;
        configuration(&mut check.properties, &t.properties_origin)?;
        Ok(t)
    }
}

fn read_template(path: &Path) -> Result<Json> {
    let text = fs::read_to_string(path).map_err(|e| Error::Template {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    serde_json::from_str(&text).map_err(|e| Error::Template {
        path: path.to_path_buf(),
        message: format!("invalid JSON: {}", e),
    })
}

fn shape_error(origin: &Path, what: &str) -> Error {
    Error::Template {
        path: origin.to_path_buf(),
        message: format!("missing {}", what),
    }
}

fn exclude_map<'a>(settings: &'a mut Json, origin: &Path) -> Result<&'a mut Map<String, Json>> {
    settings
        .get_mut("files.exclude")
        .and_then(Json::as_object_mut)
        .ok_or_else(|| shape_error(origin, "object `files.exclude`"))
}

fn configuration<'a>(properties: &'a mut Json, origin: &Path) -> Result<&'a mut Map<String, Json>> {
    let cfg = properties
        .get_mut("configurations")
        .and_then(|c| c.get_mut(0))
        .and_then(Json::as_object_mut)
        .ok_or_else(|| shape_error(origin, "`configurations[0]`"))?;
    if !cfg
        .get("browse")
        .and_then(|b| b.get("path"))
        .is_some_and(Json::is_array)
    {
        return Err(shape_error(origin, "array `configurations[0].browse.path`"));
    }
    Ok(cfg)
}

/// Inputs merged into the templates.
pub struct Findings<'a> {
    pub unused_files: &'a BTreeSet<PathBuf>,
    pub used_files: &'a BTreeSet<PathBuf>,
    pub compiler_path: &'a Path,
    pub compile_db: &'a Path,
    /// Additional `files.exclude` patterns from the configuration file.
    pub extra_excludes: &'a [String],
}

/// The two synthesized documents.
#[derive(Debug, Clone, PartialEq)]
pub struct Workspace {
    pub settings: Json,
    pub properties: Json,
}

/// Merge `findings` into fresh copies of `templates`.
pub fn synthesize(templates: &Templates, findings: &Findings) -> Result<Workspace> {
    let mut settings = templates.settings.clone();
    let mut properties = templates.properties.clone();

    let excludes = exclude_map(&mut settings, &templates.settings_origin)?;
    for pat in FIXED_EXCLUDES {
        excludes.insert(pat.to_string(), Json::Bool(true));
    }
    for pat in findings.extra_excludes {
        excludes.insert(pat.clone(), Json::Bool(true));
    }
    for f in findings.unused_files {
        excludes.insert(utils::forward_slashes(f), Json::Bool(true));
    }

    let cfg = configuration(&mut properties, &templates.properties_origin)?;
    cfg.insert(
        "compileCommands".into(),
        Json::String(utils::forward_slashes(findings.compile_db)),
    );
    cfg.insert(
        "compilerPath".into(),
        Json::String(utils::forward_slashes(findings.compiler_path)),
    );
    // checked by `configuration`
    if let Some(Json::Array(browse)) = cfg.get_mut("browse").and_then(|b| b.get_mut("path")) {
        for dir in crate::walk::parent_dirs(findings.used_files) {
            browse.push(Json::String(utils::forward_slashes(&dir)));
        }
    }

    Ok(Workspace {
        settings,
        properties,
    })
}

/// Where the workspace files went.
#[derive(Debug, Clone)]
pub struct Written {
    pub settings: PathBuf,
    pub properties: PathBuf,
}

const STAGE: &str = "vscode";

/// Make sure `<src_dir>/.vscode` exists. Returns its path and whether it
/// had to be created; an existing directory is not an error.
pub fn ensure_vscode_dir(src_dir: &Path) -> Result<(PathBuf, bool)> {
    let vscode_dir = src_dir.join(VSCODE_DIR);
    let created = !vscode_dir.is_dir();
    if created {
        fs::create_dir_all(&vscode_dir).map_err(|e| Error::io(STAGE, &vscode_dir, e))?;
    }
    Ok((vscode_dir, created))
}

/// Write `workspace` into `vscode_dir`, overwriting existing files. The
/// settings file is written first; a failure on the second file leaves the
/// first in place.
pub fn write_workspace(vscode_dir: &Path, workspace: &Workspace) -> Result<Written> {
    let settings = vscode_dir.join(SETTINGS_FILE);
    let properties = vscode_dir.join(PROPERTIES_FILE);
    for (path, doc) in [(&settings, &workspace.settings), (&properties, &workspace.properties)] {
        let text = serde_json::to_string_pretty(doc)
            .map_err(|e| Error::io(STAGE, path, std::io::Error::other(e)))?;
        fs::write(path, text + "\n").map_err(|e| Error::io(STAGE, path, e))?;
    }

    Ok(Written {
        settings,
        properties,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn set(items: &[&str]) -> BTreeSet<PathBuf> {
        items.iter().map(PathBuf::from).collect()
    }

    fn findings<'a>(
        unused: &'a BTreeSet<PathBuf>,
        used: &'a BTreeSet<PathBuf>,
        extra: &'a [String],
    ) -> Findings<'a> {
        Findings {
            unused_files: unused,
            used_files: used,
            compiler_path: Path::new(r"C:\sdk\arm-zephyr-eabi-gcc.exe"),
            compile_db: Path::new("/bld/zephyr_compile_db.json"),
            extra_excludes: extra,
        }
    }

    #[test]
    fn test_templates_keep_key_order() {
        let keys: Vec<_> = settings_template()
            .as_object()
            .unwrap()
            .keys()
            .cloned()
            .collect();
        assert_eq!(
            keys,
            vec![
                "files.exclude",
                "C_Cpp.exclusionPolicy",
                "C_Cpp.intelliSenseEngine",
                "cmake.configureOnOpen"
            ]
        );
        assert_eq!(
            properties_template()["configurations"][0]["browse"]["databaseFilename"],
            "${workspaceFolder}/.vscode/browse.zephyr.db"
        );
    }

    #[test]
    fn test_synthesize_merges_findings() {
        let unused = set(&["drivers/orphan.c", r"lib\win.c"]);
        let used = set(&["app/main.c", "app/util.c", "/bld/gen/data.c"]);
        let ws = synthesize(&Templates::default(), &findings(&unused, &used, &[])).unwrap();

        let excl = ws.settings["files.exclude"].as_object().unwrap();
        let keys: Vec<_> = excl.keys().map(String::as_str).collect();
        assert_eq!(
            keys,
            vec![
                "**/.git",
                "**/.svn",
                "**/.hg",
                "**/CVS",
                "**/.DS_Store",
                "**/test*",
                "**/.github",
                "**/.known-issues",
                "drivers/orphan.c",
                "lib/win.c"
            ]
        );
        assert!(excl.values().all(|v| v == &Json::Bool(true)));

        let cfg = &ws.properties["configurations"][0];
        assert_eq!(cfg["compilerPath"], "C:/sdk/arm-zephyr-eabi-gcc.exe");
        assert_eq!(cfg["compileCommands"], "/bld/zephyr_compile_db.json");
        assert_eq!(cfg["browse"]["path"], json!(["/bld/gen", "app"]));
        assert_eq!(ws.properties["version"], 4);
    }

    #[test]
    fn test_extra_excludes_are_added() {
        let empty = BTreeSet::new();
        let extra = vec!["**/.vscode".to_string()];
        let ws = synthesize(&Templates::default(), &findings(&empty, &empty, &extra)).unwrap();
        assert_eq!(ws.settings["files.exclude"]["**/.vscode"], true);
    }

    #[test]
    fn test_repeated_synthesis_does_not_accumulate() {
        let templates = Templates::default();
        let used = set(&["a/x.c"]);
        let first = synthesize(&templates, &findings(&set(&["old.c"]), &used, &[])).unwrap();
        let second = synthesize(&templates, &findings(&set(&["new.c"]), &used, &[])).unwrap();
        assert!(first.settings["files.exclude"].get("old.c").is_some());
        assert!(second.settings["files.exclude"].get("old.c").is_none());
        assert_eq!(second.properties["configurations"][0]["browse"]["path"], json!(["a"]));
        assert_eq!(templates.settings, settings_template());
    }

    #[test]
    fn test_browse_path_appends_to_template_entries() {
        let mut templates = Templates::default();
        templates.properties["configurations"][0]["browse"]["path"] = json!(["a"]);
        let used = set(&["a/x.c"]);
        let ws = synthesize(&templates, &findings(&BTreeSet::new(), &used, &[])).unwrap();
        // appended, not deduplicated against the template
        assert_eq!(ws.properties["configurations"][0]["browse"]["path"], json!(["a", "a"]));
    }

    #[test]
    fn test_load_template_override_and_bad_shape() {
        let tmp = tempdir().unwrap();
        let good = tmp.path().join("settings.json");
        fs::write(&good, r#"{"editor.tabSize": 4, "files.exclude": {"build": true}}"#).unwrap();
        let t = Templates::load(Some(&good), None).unwrap();
        assert_eq!(t.settings["editor.tabSize"], 4);
        assert_eq!(t.properties, properties_template());

        let bad = tmp.path().join("props.json");
        fs::write(&bad, r#"{"configurations": []}"#).unwrap();
        let err = Templates::load(None, Some(&bad)).unwrap_err();
        assert!(matches!(err, Error::Template { .. }));

        let broken = tmp.path().join("broken.json");
        fs::write(&broken, "{").unwrap();
        assert!(Templates::load(Some(&broken), None).is_err());
    }

    #[test]
    fn test_write_workspace_creates_dir_once_and_overwrites() {
        let tmp = tempdir().unwrap();
        let ws = Workspace {
            settings: settings_template(),
            properties: properties_template(),
        };
        let (dir, created) = ensure_vscode_dir(tmp.path()).unwrap();
        assert!(created);
        assert_eq!(dir, tmp.path().join(".vscode"));
        write_workspace(&dir, &ws).unwrap();
        let (dir, created) = ensure_vscode_dir(tmp.path()).unwrap();
        assert!(!created);
        let w2 = write_workspace(&dir, &ws).unwrap();

        let text = fs::read_to_string(&w2.settings).unwrap();
        let back: Json = serde_json::from_str(&text).unwrap();
        assert_eq!(back, settings_template());
        assert!(w2.properties.ends_with(".vscode/c_cpp_properties.json"));
    }
}
