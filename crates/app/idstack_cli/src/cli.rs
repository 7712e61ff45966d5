use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "idstack", version, about = "Validate and compose identity stacks")]
pub struct Cli {
    /// Region to deploy to, overriding the stack file.
    #[arg(long, global = true, env = "IDSTACK_REGION")]
    pub region: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Validate a stack and report its warnings.
    Validate {
        /// Stack file (.yaml, .yml or .json).
        config: PathBuf,
    },

    /// Print the composed descriptor graph.
    Synth {
        config: PathBuf,

        #[arg(long, value_enum, default_value_t = Format::Json)]
        format: Format,
    },

    /// Print the stack outputs as JSON.
    Outputs { config: PathBuf },

    /// Plan the changes between two versions of a stack.
    Plan {
        previous: PathBuf,
        next: PathBuf,

        /// Allow changes that replace resources.
        #[arg(long)]
        acknowledge_disruptive: bool,
    },

    /// Plan the removal of one resource.
    Remove {
        config: PathBuf,

        /// Logical id of the resource.
        resource: String,

        /// Remove everything that references it as well.
        #[arg(long)]
        cascade: bool,
    },

    /// Print the teardown order of a stack.
    Teardown { config: PathBuf },

    Version,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Json,
    Yaml,
}
