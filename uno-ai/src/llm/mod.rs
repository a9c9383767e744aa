//! LLM 集成模块
//!
//! 通过远端对话补全 API 让 LLM 为 Uno 选牌。

mod prompt;
mod client;
mod parser;
mod engine;

pub use prompt::PromptTemplate;
pub use client::{
    ChatClient, ChatConfig, CompletionClient, CompletionError, DEFAULT_MODEL, DEFAULT_TIMEOUT_SECS,
};
pub use parser::{Attempt, MoveParser, ParseStrategy};
pub use engine::{LlmEngine, MoveConcern};
