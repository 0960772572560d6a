//! The end-to-end run: rules, used files, walk, classification, compile
//! database and VS Code configuration, in that order.

use crate::config::Effective;
use crate::error::Result;
use crate::models::{Artifacts, Report, Summary};
use crate::vscode::{self, Findings, Templates};
use crate::{compdb, ninja, utils, walk};
use std::path::{Path, PathBuf};

/// Absolute, normalized command-line inputs.
#[derive(Debug, Clone)]
pub struct Inputs {
    pub compiler_path: PathBuf,
    pub src_dir: PathBuf,
    pub build_dir: PathBuf,
}

impl Inputs {
    /// Make every argument absolute and lexically normalized.
    pub fn from_args(compiler_path: &str, src_dir: &str, build_dir: &str) -> std::io::Result<Self> {
        Ok(Inputs {
            compiler_path: utils::absolutize(Path::new(compiler_path))?,
            src_dir: utils::absolutize(Path::new(src_dir))?,
            build_dir: utils::absolutize(Path::new(build_dir))?,
        })
    }
}

/// Progress notifications, one per completed step.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Start { src_dir: PathBuf },
    Rules { count: usize, file: PathBuf },
    UsedFiles { count: usize, file: PathBuf },
    AllFiles { count: usize, src_dir: PathBuf },
    Excluded { count: usize },
    CompileDb { path: PathBuf },
    VscodeDir { path: PathBuf, created: bool },
    Generated { settings: PathBuf, properties: PathBuf },
}

/// Run every stage once. The first failure aborts the run; files written
/// by earlier stages stay on disk.
pub fn run(inputs: &Inputs, eff: &Effective, on_event: &mut dyn FnMut(Event)) -> Result<Report> {
    let src = inputs.src_dir.as_path();
    let bld = inputs.build_dir.as_path();
    on_event(Event::Start {
        src_dir: src.to_path_buf(),
    });

    // load templates before anything runs so a bad override fails fast
    let templates = Templates::load(
        eff.settings_template.as_deref(),
        eff.properties_template.as_deref(),
    )?;

    let rules_file = ninja::rules_file_path(bld);
    let rules = ninja::read_rules(&rules_file)?;
    on_event(Event::Rules {
        count: rules.len(),
        file: rules_file,
    });

    let build_file = ninja::build_file_path(bld);
    let used = ninja::read_used_files(&build_file, src, bld)?;
    on_event(Event::UsedFiles {
        count: used.len(),
        file: build_file,
    });

    let all = walk::all_c_files(src)?;
    on_event(Event::AllFiles {
        count: all.len(),
        src_dir: src.to_path_buf(),
    });

    let unused = walk::unused_files(&all, &used);
    on_event(Event::Excluded {
        count: unused.len(),
    });

    let compile_db = compdb::generate(&eff.ninja, bld, &rules)?;
    on_event(Event::CompileDb {
        path: compile_db.clone(),
    });

    let workspace = vscode::synthesize(
        &templates,
        &Findings {
            unused_files: &unused,
            used_files: &used,
            compiler_path: &inputs.compiler_path,
            compile_db: &compile_db,
            extra_excludes: &eff.extra_excludes,
        },
    )?;
    let (vscode_dir, created) = vscode::ensure_vscode_dir(src)?;
    on_event(Event::VscodeDir {
        path: vscode_dir.clone(),
        created,
    });
    let written = vscode::write_workspace(&vscode_dir, &workspace)?;
    on_event(Event::Generated {
        settings: written.settings.clone(),
        properties: written.properties.clone(),
    });

    Ok(Report {
        src_dir: utils::forward_slashes(src),
        build_dir: utils::forward_slashes(bld),
        summary: Summary {
            rules: rules.len(),
            used_files: used.len(),
            all_files: all.len(),
            unused_files: unused.len(),
            browse_paths: walk::parent_dirs(&used).len(),
        },
        artifacts: Artifacts {
            compile_db: utils::forward_slashes(&compile_db),
            settings: utils::forward_slashes(&written.settings),
            properties: utils::forward_slashes(&written.properties),
        },
    })
}
