//! Chat loop: sending messages and rendering the conversation.
//!
//! The renderer runs as its own task and owns stdout. It consumes the
//! orchestrator's [`ConversationEvent`]s plus prompt-side [`Notice`]s, always
//! draining conversation events first so a notice never overtakes the turns
//! that preceded it.

use std::io::Write;

use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::agent_core::{AgentError, ConversationEvent, Orchestrator, Turn};
use crate::inference::ToolCall;

use super::{execute, parse_command, Command};

/// Title shown at startup.
pub const TITLE: &str = "🤖 AI Chat Assistant";

/// Caption shown under the title.
pub const CAPTION: &str = "Ask me anything! I can search the web to help answer your questions.";

/// Tool results longer than this are cut in the terminal. The model still
/// sees the full text.
const MAX_TOOL_RESULT_CHARS: usize = 600;

/// Prompt-side output for the renderer.
#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    Line(String),
    Prompt,
}

// ─── Sending ────────────────────────────────────────────────────────────────

/// Send a user message through the orchestrator.
///
/// Turns are shown by the renderer as they are appended. On failure the
/// returned text is the notification to show; the session stays usable.
pub async fn send_message(orchestrator: &mut Orchestrator, content: &str) -> Result<(), String> {
    match orchestrator.submit(content).await {
        Ok(outcome) => {
            tracing::debug!(
                turns = outcome.turns_appended,
                tools = outcome.tools_invoked,
                tool_failures = outcome.tool_failures,
                "message processed"
            );
            Ok(())
        }
        Err(e) => {
            tracing::error!(error = %e, "message failed");
            Err(model_error_notice(orchestrator, &e))
        }
    }
}

fn model_error_notice(orchestrator: &Orchestrator, err: &AgentError) -> String {
    match err {
        AgentError::ModelInvocation { source } if source.is_unreachable() => format!(
            "⚠️ {err}\n   Is the model server running at {}?",
            orchestrator.model_config().base_url
        ),
        _ => format!("⚠️ {err}"),
    }
}

// ─── REPL ───────────────────────────────────────────────────────────────────

/// Read lines from `input` until EOF or `/quit`.
pub async fn run_repl<R>(
    orchestrator: &mut Orchestrator,
    input: R,
    notices: &mpsc::UnboundedSender<Notice>,
) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = input.lines();

    loop {
        let _ = notices.send(Notice::Prompt);
        let Some(line) = lines.next_line().await? else {
            break;
        };

        match parse_command(&line) {
            Ok(Command::Quit) => break,
            Ok(command) => {
                if let Some(text) = execute(orchestrator, command).await {
                    let _ = notices.send(Notice::Line(text));
                }
            }
            Err(message) => {
                let _ = notices.send(Notice::Line(message));
            }
        }
    }

    tracing::info!(messages = orchestrator.message_count(), "chat loop ended");
    Ok(())
}

// ─── Rendering ──────────────────────────────────────────────────────────────

/// Spawn the stdout renderer. Ends when both channels are closed.
pub fn spawn_renderer(
    events: mpsc::UnboundedReceiver<ConversationEvent>,
    notices: mpsc::UnboundedReceiver<Notice>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut stdout = std::io::stdout();
        if let Err(e) = render_loop(events, notices, &mut stdout).await {
            tracing::warn!(error = %e, "renderer stopped");
        }
    })
}

/// Write events and notices to `out` until both channels are closed.
///
/// Pending conversation events are always written before pending notices.
pub async fn render_loop<W: Write>(
    mut events: mpsc::UnboundedReceiver<ConversationEvent>,
    mut notices: mpsc::UnboundedReceiver<Notice>,
    out: &mut W,
) -> std::io::Result<()> {
    loop {
        let output = tokio::select! {
            biased;
            Some(event) = events.recv() => render_event(&event).map(|s| format!("{s}\n")),
            Some(notice) = notices.recv() => Some(match notice {
                Notice::Line(text) => format!("{text}\n"),
                Notice::Prompt => "\n> ".to_string(),
            }),
            else => break,
        };

        if let Some(text) = output {
            out.write_all(text.as_bytes())?;
            out.flush()?;
        }
    }
    Ok(())
}

/// Text for one conversation event. The system turn is never shown.
pub fn render_event(event: &ConversationEvent) -> Option<String> {
    match event {
        ConversationEvent::TurnAppended { turn, .. } => render_turn(turn),
        ConversationEvent::Reset => Some("🗑️ Chat history cleared.".to_string()),
    }
}

fn render_turn(turn: &Turn) -> Option<String> {
    match turn {
        Turn::System { .. } => None,
        Turn::User { content } => Some(format!("👤 {content}")),
        Turn::Assistant {
            content,
            tool_requests,
        } => {
            let mut lines = Vec::new();
            if let Some(text) = content.as_deref().filter(|t| !t.trim().is_empty()) {
                lines.push(format!("🤖 {text}"));
            }
            for call in tool_requests {
                lines.push(format!("🤖 🔍 Calling {}", describe_call(call)));
            }
            if lines.is_empty() {
                lines.push("🤖 (no response)".to_string());
            }
            Some(lines.join("\n"))
        }
        Turn::ToolResult { content, .. } => {
            Some(format!("🔧 Tool result:\n{}", truncate_chars(content, MAX_TOOL_RESULT_CHARS)))
        }
    }
}

fn describe_call(call: &ToolCall) -> String {
    match call.arguments.get("query").and_then(|q| q.as_str()) {
        Some(query) => format!("{}(\"{query}\")", call.name),
        None => format!("{}({})", call.name, call.arguments),
    }
}

fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => format!("{}…", &text[..idx]),
        None => text.to_string(),
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────
