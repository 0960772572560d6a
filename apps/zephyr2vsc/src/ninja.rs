//! Readers for the two ninja files CMake leaves in a Zephyr build directory.
//!
//! Only two line shapes matter here:
//! - `rule <name>` declarations in `rules.ninja`;
//! - `build <outputs>: <rule> ... <path>.c ...` edges in `build.ninja`.
//!
//! Everything else in those files is ignored.

use crate::error::{Error, Result};
use crate::utils;
use regex::Regex;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

pub const BUILD_FILE: &str = "build.ninja";
pub const RULES_FILE: &str = "rules.ninja";

fn rule_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^rule\s(.+)$").unwrap())
}

fn build_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^build\s.*\s([^\s|]+\.c)\s").unwrap())
}

/// Location of the rules file. CMake writes it under `CMakeFiles/`; older
/// build trees kept it next to `build.ninja`, which is used as a fallback.
pub fn rules_file_path(build_dir: &Path) -> PathBuf {
    let cmake = build_dir.join("CMakeFiles").join(RULES_FILE);
    let legacy = build_dir.join(RULES_FILE);
    if !cmake.exists() && legacy.is_file() {
        legacy
    } else {
        cmake
    }
}

pub fn build_file_path(build_dir: &Path) -> PathBuf {
    build_dir.join(BUILD_FILE)
}

fn read_input(stage: &'static str, path: &Path) -> Result<String> {
    fs::read(path)
        .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
        .map_err(|source| Error::MissingInput {
            stage,
            path: path.to_path_buf(),
            source,
        })
}

/// Collect the distinct rule names declared in `rules_file`.
pub fn read_rules(rules_file: &Path) -> Result<BTreeSet<String>> {
    let text = read_input("rules", rules_file)?;
    Ok(parse_rules(&text))
}

/// Collect distinct names from `rule <name>` lines. The name is the rest of
/// the line, taken verbatim.
pub fn parse_rules(text: &str) -> BTreeSet<String> {
    text.split_inclusive('\n')
        .map(|line| line.strip_suffix('\n').unwrap_or(line))
        .filter_map(|line| rule_re().captures(line))
        .map(|caps| caps[1].to_string())
        .collect()
}

/// Collect the `.c` files compiled by `build_file`.
pub fn read_used_files(
    build_file: &Path,
    src_dir: &Path,
    build_dir: &Path,
) -> Result<BTreeSet<PathBuf>> {
    let text = read_input("build graph", build_file)?;
    Ok(parse_used_files(&text, src_dir, build_dir))
}

/// Extract the compiled `.c` input of every matching `build` edge.
///
/// Absolute inputs live in the source tree and are made relative to
/// `src_dir`. Relative inputs are generated by the build and are resolved
/// under `build_dir`; the result stays absolute unless the build directory
/// sits inside `src_dir`, in which case it is made relative like the rest.
pub fn parse_used_files(text: &str, src_dir: &Path, build_dir: &Path) -> BTreeSet<PathBuf> {
    let mut files = BTreeSet::new();
    // keep the newline: the trailing `\s` may be the line terminator
    for line in text.split_inclusive('\n') {
        let Some(caps) = build_re().captures(line) else {
            continue;
        };
        let unescaped = caps[1].replace('$', "");
        let c_file = utils::normalize(Path::new(&unescaped));
        if c_file.is_absolute() {
            files.insert(utils::relative_to(&c_file, src_dir));
        } else {
            let generated = utils::normalize(&build_dir.join(&c_file));
            if generated.starts_with(src_dir) {
                files.insert(utils::relative_to(&generated, src_dir));
            } else {
                files.insert(generated);
            }
        }
    }
    files
}
