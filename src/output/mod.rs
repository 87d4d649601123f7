//! Terminal rendering of the generated suggestion.

use crate::provider::{Completion, is_free_model};

/// Render the full report for a successful generation.
///
/// Cost is shown only for non-free models with a positive reported cost;
/// when usage exists for a non-free model but no usable cost came back, the
/// line reads `Cost: Unknown`. Free-tier models never get a cost line.
pub fn render_report(completion: &Completion, model: &str, auto_staged: bool) -> String {
    let mut lines = Vec::new();

    lines.push("Suggested commit message:".to_string());
    lines.push(String::new());
    lines.push(format!("  {}", completion.message));
    lines.push(String::new());
    lines.push(format!(
        "git commit -m \"{}\"",
        escape_quotes(&completion.message)
    ));

    if auto_staged {
        lines.push(String::new());
        lines.push("Note: nothing was staged, so all pending changes were staged automatically.".to_string());
    }

    if let Some(usage) = &completion.usage {
        lines.push(String::new());
        lines.push(format!("Tokens used: {}", usage.total_tokens));
        if !is_free_model(model) {
            match usage.cost {
                Some(cost) if cost > 0.0 => lines.push(format!("Cost: ${cost:.6}")),
                _ => lines.push("Cost: Unknown".to_string()),
            }
        }
    }

    lines.join("\n")
}

/// Message printed for the benign clean-tree outcome.
pub fn render_clean_tree() -> String {
    "Working tree is clean. Nothing to commit.".to_string()
}

/// Escape embedded double quotes so the commit command is paste-safe.
fn escape_quotes(message: &str) -> String {
    message.replace('"', "\\\"")
}
