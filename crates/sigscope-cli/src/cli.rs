use std::path::PathBuf;

use clap::Parser;

#[derive(Parser)]
#[command(
    name = "sigscope",
    about = "Explain why two build-task signatures differ",
    version,
)]
pub struct Cli {
    /// Signature record files: one to dump, two to compare (backend-free)
    #[arg(value_name = "FILE", num_args = 0..=2, conflicts_with_all = ["task", "signature"])]
    pub files: Vec<PathBuf>,

    /// Compare the two most recent signatures of a task
    #[arg(short = 't', long = "task", num_args = 2, value_names = ["RECIPE", "TASK"])]
    pub task: Option<Vec<String>>,

    /// Restrict the comparison to exactly these two signature hashes
    #[arg(
        short = 's',
        long = "signature",
        num_args = 2,
        value_names = ["FROM", "TO"],
        requires = "task",
    )]
    pub signature: Option<Vec<String>>,

    /// When to colorize output
    #[arg(long, value_enum, default_value = "auto")]
    pub color: ColorMode,

    /// Enable debug logging
    #[arg(short = 'd', long)]
    pub debug: bool,

    /// Backend server address
    #[arg(long, value_name = "ADDR", default_value = "127.0.0.1:8673")]
    pub server: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum ColorMode {
    Auto,
    Always,
    Never,
}
