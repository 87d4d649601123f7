//! Prompt construction for the commit message request.

/// Fixed system instruction. Keeps the model from wrapping the message in
/// prose or markdown fences.
pub const SYSTEM_INSTRUCTION: &str = "You are a commit message generator. \
Respond with just the commit message, no explanations and no surrounding quotes.";

/// Build the user instruction, embedding the raw diff text verbatim.
pub fn build_user_prompt(diff: &str) -> String {
    format!(
        r#"Generate a commit message for the following staged changes.

Rules:
- Subject line in the imperative mood, under 72 characters
- Start with a conventional commit type prefix (feat, fix, docs, style, refactor, perf, test, chore)
- Do not mention file names or paths
- If the diff below is empty, respond with exactly "No changes"

Diff:
{diff}"#
    )
}
