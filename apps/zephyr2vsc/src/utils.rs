//! Small helpers shared across modules: message prefixes and path handling.

use owo_colors::OwoColorize;
use std::io::IsTerminal;
use std::path::{Component, Path, PathBuf};

fn use_colors() -> bool {
    std::io::stderr().is_terminal()
}

pub fn error_prefix() -> String {
    if use_colors() {
        "error:".red().bold().to_string()
    } else {
        "error:".to_string()
    }
}

pub fn note_prefix() -> String {
    if use_colors() {
        "note:".yellow().bold().to_string()
    } else {
        "note:".to_string()
    }
}

/// Lexically normalize a path: drop `.` components and fold `..` into the
/// preceding component where possible. Symlinks are not resolved.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out: Vec<Component> = Vec::new();
    for comp in path.components() {
        match comp {
            Component::CurDir => {}
            Component::ParentDir => {
                if matches!(out.last(), Some(Component::Normal(_))) {
                    out.pop();
                } else if !matches!(out.last(), Some(Component::RootDir | Component::Prefix(_))) {
                    // `/..` is `/`, otherwise keep the leading `..`
                    out.push(comp);
                }
            }
            c => out.push(c),
        }
    }
    if out.is_empty() {
        return PathBuf::from(".");
    }
    out.iter().collect()
}

/// Make `path` absolute against the current directory and normalize it.
pub fn absolutize(path: &Path) -> std::io::Result<PathBuf> {
    Ok(normalize(&std::path::absolute(path)?))
}

/// Express `path` relative to `base`. Both are normalized first; when no
/// relative form exists the normalized path is returned unchanged.
pub fn relative_to(path: &Path, base: &Path) -> PathBuf {
    let path = normalize(path);
    let base = normalize(base);
    match pathdiff::diff_paths(&path, &base) {
        Some(p) if p.as_os_str().is_empty() => PathBuf::from("."),
        Some(p) => p,
        None => path,
    }
}

/// Render a path with forward slashes, the separator VS Code expects.
pub fn forward_slashes(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}
