//! Model settings commands.

use crate::agent_core::Orchestrator;

/// Current temperature, for `/temperature` without an argument.
pub fn get_temperature(orchestrator: &Orchestrator) -> String {
    format!(
        "🌡️ Temperature: {:.1} (higher values make responses more creative)",
        orchestrator.model_config().temperature
    )
}

/// Set the temperature. The conversation is kept.
pub fn update_temperature(orchestrator: &mut Orchestrator, value: f32) -> Result<String, String> {
    match orchestrator.reconfigure(value) {
        Ok(true) => {
            tracing::info!(temperature = value, "temperature updated");
            Ok(format!("🌡️ Temperature set to {value:.1}"))
        }
        Ok(false) => Ok(format!("🌡️ Temperature is already {value:.1}")),
        Err(e) => Err(format!("⚠️ {e}")),
    }
}
