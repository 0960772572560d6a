//! zephyr2vsc core library.
//!
//! Derives a VS Code workspace for a Zephyr build: which `.c` files the
//! ninja build compiles, which ones in the tree it does not, a compile
//! commands database, and the two `.vscode` JSON files reflecting that.
//!
//! High-level modules:
//! - `cli`: CLI argument parsing (binary uses this).
//! - `config`: Optional `zephyr2vsc.toml` discovery and resolution.
//! - `ninja`: `rules.ninja` / `build.ninja` line readers.
//! - `walk`: Source tree walk and used/unused classification.
//! - `compdb`: `ninja -t compdb` invocation and flag fix-up.
//! - `vscode`: Template merge and `.vscode` writing.
//! - `pipeline`: The end-to-end run with progress events.
//! - `models`: Report structs.
//! - `output`: Human/JSON printers.
//! - `error`: Error kinds.
//! - `utils`: Supporting helpers.
pub mod cli;
pub mod compdb;
pub mod config;
pub mod error;
pub mod models;
pub mod ninja;
pub mod output;
pub mod pipeline;
pub mod utils;
pub mod vscode;
pub mod walk;
