use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "Chat with a local LLM that can search the web", long_about = None)]
pub struct Args {
    /// Config file (default: $LOCALCHAT_CONFIG, then localchat.yaml searched upward)
    #[arg(long, short)]
    pub config: Option<PathBuf>,

    /// Model key from the config's `models` section
    #[arg(long, short, env = "LOCALCHAT_MODEL")]
    pub model: Option<String>,

    /// Sampling temperature, 0.0 to 1.0 (overrides the model's configured value)
    #[arg(long, short, env = "LOCALCHAT_TEMPERATURE")]
    pub temperature: Option<f32>,

    /// Log level for the log file (trace, debug, info, warn, error). RUST_LOG wins when set.
    #[arg(long, env = "LOCALCHAT_LOG", default_value = "info")]
    pub log_level: String,
}
