use clap::Parser;

use localchat::cli::Args;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if let Err(e) = localchat::init_tracing(&args.log_level) {
        eprintln!("warning: file logging disabled: {e}");
    }

    localchat::run(args).await
}
