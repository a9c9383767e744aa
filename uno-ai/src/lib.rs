//! Uno LLM 出牌 AI
//!
//! 包含:
//! - 提示构造
//! - 对话补全客户端
//! - 回复解析（有序的兜底策略链）
//! - 出牌引擎

pub mod llm;

pub use llm::{LlmEngine, MoveParser, PromptTemplate};
