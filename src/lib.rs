pub mod agent_core;
pub mod cli;
pub mod commands;
pub mod config;
pub mod inference;
pub mod search;

use std::sync::Arc;

use anyhow::Context;
use tokio::io::BufReader;
use tokio::sync::mpsc;

use agent_core::{Orchestrator, ToolRegistry};
use cli::Args;
use commands::chat::{run_repl, spawn_renderer, Notice, CAPTION, TITLE};
use inference::config::validate_temperature;
use inference::{InferenceClient, OpenAiCompatProvider};
use search::{SearchClient, WebSearchTool};

/// Return the platform-standard data directory for LocalChat.
///
/// - macOS: `~/Library/Application Support/localchat/`
/// - Windows: `{FOLDERID_RoamingAppData}\localchat\`
/// - Linux: `$XDG_DATA_HOME/localchat/` (fallback `~/.local/share/...`)
///
/// Falls back to `~/.localchat/` only if none of the above can be resolved.
pub fn data_dir() -> std::path::PathBuf {
    if let Some(dir) = dirs::data_dir() {
        return dir.join("localchat");
    }
    dirs::home_dir()
        .unwrap_or_else(|| std::path::PathBuf::from("."))
        .join(".localchat")
}

/// Initialize the tracing subscriber, writing structured logs to the data directory.
///
/// On each startup:
/// 1. Rotates existing logs (chat.log → chat.log.1 → .2 → .3, keeps last 3).
/// 2. Opens a fresh chat.log with a line-flushing writer.
/// 3. Logs a startup banner with the log path.
///
/// The terminal is the chat surface, so nothing is logged to stdout.
pub fn init_tracing(log_level: &str) -> std::io::Result<std::path::PathBuf> {
    use tracing_subscriber::fmt;

    let log_dir = data_dir();
    std::fs::create_dir_all(&log_dir)?;

    let log_path = log_dir.join("chat.log");
    rotate_log_file(&log_path, 3);

    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)?;

    fmt::fmt()
        .with_env_filter(build_filter(log_level))
        .with_writer(FlushingWriter::new(log_file))
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(false)
        .init();

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        data_dir = %log_dir.display(),
        log_file = %log_path.display(),
        pid = std::process::id(),
        "=== LocalChat starting ==="
    );

    Ok(log_path)
}

/// `RUST_LOG` if set, otherwise `localchat=<level>,warn`.
fn build_filter(log_level: &str) -> tracing_subscriber::EnvFilter {
    use tracing_subscriber::EnvFilter;

    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(format!("localchat={log_level},warn")))
        .unwrap_or_else(|_| EnvFilter::new("localchat=info,warn"))
}

/// Rotate log files: `chat.log` → `chat.log.1` → `.2` → … → `.{keep}`.
///
/// Oldest file beyond `keep` is deleted. Missing files in the chain are skipped.
fn rotate_log_file(base_path: &std::path::Path, keep: u32) {
    let oldest = format!("{}.{keep}", base_path.display());
    let _ = std::fs::remove_file(&oldest);

    for i in (1..keep).rev() {
        let from = format!("{}.{i}", base_path.display());
        let to = format!("{}.{}", base_path.display(), i + 1);
        let _ = std::fs::rename(&from, &to);
    }

    if base_path.exists() {
        let to = format!("{}.1", base_path.display());
        let _ = std::fs::rename(base_path, &to);
    }
}

/// A writer that wraps `std::fs::File` and flushes after every write, so
/// each log line is on disk immediately.
#[derive(Clone)]
struct FlushingWriter {
    file: Arc<std::sync::Mutex<std::fs::File>>,
}

impl FlushingWriter {
    fn new(file: std::fs::File) -> Self {
        Self {
            file: Arc::new(std::sync::Mutex::new(file)),
        }
    }
}

impl std::io::Write for FlushingWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let mut f = self
            .file
            .lock()
            .map_err(|e| std::io::Error::other(format!("lock poisoned: {e}")))?;
        let n = std::io::Write::write(&mut *f, buf)?;
        std::io::Write::flush(&mut *f)?;
        Ok(n)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        let mut f = self
            .file
            .lock()
            .map_err(|e| std::io::Error::other(format!("lock poisoned: {e}")))?;
        std::io::Write::flush(&mut *f)
    }
}

impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for FlushingWriter {
    type Writer = FlushingWriter;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Load config, build the session, and run the chat loop on stdin/stdout.
pub async fn run(args: Args) -> anyhow::Result<()> {
    let mut config = config::load_or_default(args.config.as_deref())?;
    if let Some(ref key) = args.model {
        config = config.with_active_model(key)?;
    }

    let mut model = config.active_model()?;
    if let Some(temperature) = args.temperature {
        model = model.with_temperature(validate_temperature(temperature)?);
    }

    tracing::info!(
        model = %model.model_id(),
        base_url = %model.base_url,
        temperature = model.temperature,
        config = ?config.source,
        "resolved model"
    );

    let search = SearchClient::new(config.search.clone()).context("building search client")?;
    let tools = ToolRegistry::new().with_tool(Arc::new(WebSearchTool::new(search)));

    let mut orchestrator = Orchestrator::new(
        config.system_prompt.as_str(),
        Arc::new(OpenAiCompatProvider),
        &model,
        tools,
    )?;

    let events = orchestrator.subscribe();
    let (notice_tx, notice_rx) = mpsc::unbounded_channel();
    let renderer = spawn_renderer(events, notice_rx);

    let _ = notice_tx.send(Notice::Line(format!(
        "{TITLE}\n{CAPTION}\nModel: {} ({}), temperature {:.1}. Type /help for commands.",
        model.display_name,
        model.model_id(),
        model.temperature
    )));

    // Startup check only; the chat loop reports failures per message.
    let health = InferenceClient::new(model.clone())?;
    if !health.health_check().await {
        tracing::warn!(base_url = %model.base_url, "model endpoint not reachable at startup");
        let _ = notice_tx.send(Notice::Line(format!(
            "⚠️ Model server not reachable at {}. Start it (e.g. `ollama serve`) before chatting.",
            model.base_url
        )));
    }

    run_repl(&mut orchestrator, BufReader::new(tokio::io::stdin()), &notice_tx)
        .await
        .context("reading input")?;

    // Closing both channels lets the renderer drain and exit.
    drop(notice_tx);
    drop(orchestrator);
    renderer.await.context("renderer task failed")?;

    tracing::info!("=== LocalChat exiting ===");
    Ok(())
}
