//! zephyr2vsc CLI binary entry point.
//! Resolves configuration, runs the pipeline and prints progress.

use clap::Parser;
use zephyr2vsc::cli::Cli;
use zephyr2vsc::pipeline::{self, Inputs};
use zephyr2vsc::{config, output, utils};

fn main() {
    // Usage problems print help and exit 0, like `--help` does
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            std::process::exit(0);
        }
    };

    let inputs = match Inputs::from_args(&cli.compiler_path, &cli.src_dir, &cli.bld_dir) {
        Ok(i) => i,
        Err(e) => {
            eprintln!("{} cannot resolve arguments: {}", utils::error_prefix(), e);
            std::process::exit(1);
        }
    };

    let loaded = match config::load_config(&inputs.src_dir) {
        Ok(cfg) => cfg,
        Err(msg) => {
            eprintln!("{} invalid config ignored, using defaults: {}", utils::note_prefix(), msg);
            None
        }
    };
    let eff = config::resolve_effective(&inputs.src_dir, loaded);

    let mode = eff.output.clone();
    match pipeline::run(&inputs, &eff, &mut |ev| output::print_event(&ev, &mode)) {
        Ok(report) => output::print_report(&report, &eff.output),
        Err(e) => {
            eprintln!("{} {}", utils::error_prefix(), e);
            std::process::exit(1);
        }
    }
}
