//! Command-line arguments

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Debug, Parser)]
#[command(name = "ruleval", version, about = "Validate JSON payloads against declarative field rules")]
pub struct Cli {
    /// More log output on stderr (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Log line format
    #[arg(long, value_enum, env = "RULEVAL_LOG_FORMAT", global = true, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Validate one payload; exits 1 when the payload has findings
    Validate(ValidateArgs),
    /// List every error code the rule set can emit
    Codes(CodesArgs),
}

#[derive(Debug, Args)]
pub struct ValidateArgs {
    /// Rule set file (.toml or .json)
    #[arg(short, long)]
    pub rules: PathBuf,

    /// JSON payload file; stdin when omitted or `-`
    #[arg(short, long)]
    pub payload: Option<PathBuf>,

    /// Overrides the rule set's default error code
    #[arg(long)]
    pub default_code: Option<String>,

    /// Error catalog used to attach messages
    #[arg(short, long)]
    pub catalog: Option<PathBuf>,

    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Debug, Args)]
pub struct CodesArgs {
    /// Rule set file (.toml or .json)
    #[arg(short, long)]
    pub rules: PathBuf,

    /// Catalog to verify; exits 1 when a code has no message
    #[arg(short, long)]
    pub catalog: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Pretty,
    Compact,
    Json,
}

impl From<LogFormat> for ruleval_log::Format {
    fn from(format: LogFormat) -> Self {
        match format {
            LogFormat::Pretty => Self::Pretty,
            LogFormat::Compact => Self::Compact,
            LogFormat::Json => Self::Json,
        }
    }
}
