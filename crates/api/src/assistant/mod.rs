//! Electoral assistant: builds a data snapshot for the caller's
//! organization, renders it into an LLM prompt, and queries an
//! OpenAI-compatible chat backend.

pub mod client;
pub mod context;

pub use client::{ChatError, ChatModel, ChatRequest, DeepSeekChat};
pub use context::{build_context_text, build_prompt, DataContext, DirigentePerformanceEntry, SYSTEM_PROMPT};
