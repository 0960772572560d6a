//! Compile-commands database generation through `ninja -t compdb`.

use crate::error::{Error, Result};
use regex::{Captures, Regex};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::OnceLock;

pub const COMPILE_DB_FILE: &str = "zephyr_compile_db.json";

const STAGE: &str = "compile db";

fn imacros_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"--imacros=|-imacros").unwrap())
}

/// Rewrite `-imacros` style flags to `-include`.
///
/// cpptools does not understand `-imacros` (microsoft/vscode-cpptools#2417).
/// A forced include is close enough for code navigation. `--imacros=x`
/// becomes `-include x` and wins over the bare form at the same position;
/// a bare `-imacros` becomes `-include`. All other text is untouched.
pub fn fix_imacros(text: &str) -> String {
    imacros_re()
        .replace_all(text, |caps: &Captures| match &caps[0] {
            "--imacros=" => "-include ",
            _ => "-include",
        })
        .into_owned()
}

/// Run `<ninja> -C <build_dir> -t compdb <rules...>` and return its stdout.
pub fn run_compdb(ninja: &str, build_dir: &Path, rules: &BTreeSet<String>) -> Result<String> {
    let out = Command::new(ninja)
        .arg("-C")
        .arg(build_dir)
        .args(["-t", "compdb"])
        // rule names end up on a shell-like command line: one word each
        .args(rules.iter().flat_map(|r| r.split_whitespace()))
        .output()
        .map_err(|e| Error::ExternalTool {
            stage: STAGE,
            message: format!("failed to run `{}`: {}", ninja, e),
        })?;

    if !out.status.success() {
        return Err(Error::ExternalTool {
            stage: STAGE,
            message: format!(
                "`{} -t compdb` exited with {}: {}",
                ninja,
                out.status,
                String::from_utf8_lossy(&out.stderr).trim()
            ),
        });
    }
    let stdout = String::from_utf8_lossy(&out.stdout).into_owned();
    if stdout.trim().is_empty() {
        return Err(Error::ExternalTool {
            stage: STAGE,
            message: format!("`{} -t compdb` produced no output", ninja),
        });
    }
    Ok(stdout)
}

/// Generate `<build_dir>/zephyr_compile_db.json` and return its path.
///
/// `build_dir` is expected to be absolute already, so the returned path is.
pub fn generate(ninja: &str, build_dir: &Path, rules: &BTreeSet<String>) -> Result<PathBuf> {
    let db_path = build_dir.join(COMPILE_DB_FILE);
    let raw = run_compdb(ninja, build_dir, rules)?;
    fs::write(&db_path, fix_imacros(&raw)).map_err(|e| Error::io(STAGE, &db_path, e))?;
    Ok(db_path)
}
