use std::path::PathBuf;

use clap::{Parser, Subcommand};
use kiln_ollama::SamplingOptions;

/// Kiln: chat with a local Ollama server
#[derive(Debug, Parser)]
#[command(name = "kiln", about = "Ask a local Ollama server from the command line")]
pub struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "kiln.toml", env = "KILN_CONFIG")]
    pub config: PathBuf,

    /// Log filter used when `RUST_LOG` is unset
    #[arg(long, default_value = "warn", env = "KILN_LOG")]
    pub log_filter: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Send a prompt and print the reply
    Ask(AskArgs),
    /// List locally available models
    Models,
}

#[derive(Debug, clap::Args)]
pub struct AskArgs {
    /// Prompt text; read from stdin when omitted
    pub prompt: Option<String>,

    /// Model name; `ollama` or empty picks the most recently modified model
    #[arg(short, long)]
    pub model: Option<String>,

    /// Wait for the whole reply instead of streaming it
    #[arg(short = 'r', long)]
    pub no_stream: bool,

    /// Save the prompt and reply as `.input`/`.output` files in this directory
    #[arg(long, env = "KILN_TRANSCRIPT_DIR")]
    pub transcript_dir: Option<PathBuf>,

    #[command(flatten)]
    pub sampling: SamplingArgs,
}

/// Sampling flags; anything left unset is decided by the server
#[derive(Debug, Default, clap::Args)]
#[command(next_help_heading = "Sampling")]
pub struct SamplingArgs {
    #[arg(long)]
    pub temperature: Option<f64>,
    #[arg(long)]
    pub top_p: Option<f64>,
    #[arg(long)]
    pub top_k: Option<i32>,
    #[arg(long, allow_negative_numbers = true)]
    pub seed: Option<i64>,
    /// Maximum tokens to generate (`-1` for unbounded)
    #[arg(long, allow_negative_numbers = true)]
    pub num_predict: Option<i32>,
    #[arg(long)]
    pub num_ctx: Option<i32>,
    #[arg(long)]
    pub repeat_penalty: Option<f64>,
    #[arg(long, allow_negative_numbers = true)]
    pub repeat_last_n: Option<i32>,
    /// Stop sequence; may be repeated
    #[arg(long = "stop", value_name = "SEQUENCE")]
    pub stop: Vec<String>,
    #[arg(long)]
    pub tfs_z: Option<f64>,
    #[arg(long)]
    pub typical_p: Option<f64>,
    #[arg(long)]
    pub presence_penalty: Option<f64>,
    #[arg(long)]
    pub frequency_penalty: Option<f64>,
}

impl From<SamplingArgs> for SamplingOptions {
    fn from(args: SamplingArgs) -> Self {
        Self {
            temperature: args.temperature,
            top_p: args.top_p,
            top_k: args.top_k,
            seed: args.seed,
            num_predict: args.num_predict,
            num_ctx: args.num_ctx,
            repeat_penalty: args.repeat_penalty,
            repeat_last_n: args.repeat_last_n,
            stop: args.stop,
            tfs_z: args.tfs_z,
            typical_p: args.typical_p,
            presence_penalty: args.presence_penalty,
            frequency_penalty: args.frequency_penalty,
        }
    }
}
