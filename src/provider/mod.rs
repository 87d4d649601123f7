//! Remote completion provider and prompt construction.

pub mod openrouter;
pub mod prompt;

pub use openrouter::{
    Completion, DEFAULT_BASE_URL, FREE_TIER_MARKER, OpenRouterClient, Usage, is_free_model,
};
pub use prompt::{SYSTEM_INSTRUCTION, build_user_prompt};
