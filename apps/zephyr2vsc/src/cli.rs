//! CLI argument parsing via `clap`.

use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "zephyr2vsc",
    version,
    about = "Import Zephyr source code into Visual Studio Code",
    long_about = "Import Zephyr source code into Visual Studio Code in the context of a Zephyr build.\n\nA Zephyr build must exist first: build.ninja, CMakeFiles/rules.ninja and `ninja` are needed.",
    after_help = "Example:\n  zephyr2vsc ~/zephyr-sdk/arm-zephyr-eabi/bin/arm-zephyr-eabi-gcc ~/zephyrproject/zephyr ~/zephyrproject/zephyr/build",
    arg_required_else_help = true
)]
/// Positional arguments of the single command.
pub struct Cli {
    #[arg(help = "Full path of the compiler")]
    pub compiler_path: String,
    #[arg(help = "Zephyr source folder to open in VS Code")]
    pub src_dir: String,
    #[arg(help = "Zephyr build folder containing build.ninja")]
    pub bld_dir: String,
}
