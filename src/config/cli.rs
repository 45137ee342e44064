use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueHint, builder::BoolishValueParser};

use crate::domain::posts::PostId;

/// Command-line arguments for the postboard binary.
#[derive(Debug, Parser)]
#[command(
    name = "postboard",
    version,
    about = "List, create, edit and delete posts on a REST collection"
)]
pub struct CliArgs {
    /// Optional path to a configuration file.
    #[arg(
        long = "config-file",
        env = "POSTBOARD_CONFIG_FILE",
        value_name = "PATH",
        global = true
    )]
    pub config_file: Option<PathBuf>,

    /// Collection URL, e.g. <https://example.com/api/posts>
    #[arg(long = "api-url", env = "POSTBOARD_API_URL", value_name = "URL", global = true)]
    pub api_url: Option<String>,

    /// Override the base log level (trace|debug|info|warn|error|off).
    #[arg(long = "log-level", value_name = "LEVEL", global = true)]
    pub log_level: Option<String>,

    /// Toggle JSON logging.
    #[arg(
        long = "log-json",
        value_name = "BOOL",
        value_parser = BoolishValueParser::new(),
        global = true
    )]
    pub log_json: Option<bool>,

    /// Print posts as JSON instead of the text view.
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Show every post, newest first.
    List,
    /// Fetch a single post.
    Get { id: PostId },
    /// Create a post.
    Create(PayloadArgs),
    /// Replace every field of a post.
    Update {
        id: PostId,
        #[command(flatten)]
        payload: PayloadArgs,
    },
    /// Change only the given fields of a post.
    Patch {
        id: PostId,
        #[command(flatten)]
        payload: PayloadArgs,
    },
    /// Toggle the liked flag.
    Like { id: PostId },
    /// Delete a post after confirmation.
    Delete {
        id: PostId,
        /// Skip the confirmation prompt.
        #[arg(long, short = 'y')]
        yes: bool,
    },
}

/// Fields sent as the JSON request body. Flags are layered over
/// `--json-body`/`--json-file`.
#[derive(Debug, Args, Default, Clone)]
pub struct PayloadArgs {
    #[arg(long)]
    pub title: Option<String>,

    #[arg(long)]
    pub body: Option<String>,

    /// Extra field; VALUE is taken as JSON when it parses, else as a string.
    #[arg(long = "field", value_name = "KEY=VALUE")]
    pub fields: Vec<String>,

    /// Full payload as a JSON object.
    #[arg(long = "json-body", value_name = "JSON", conflicts_with = "json_file")]
    pub json_body: Option<String>,

    /// Read the JSON object payload from a file.
    #[arg(long = "json-file", value_name = "PATH", value_hint = ValueHint::FilePath)]
    pub json_file: Option<PathBuf>,
}
