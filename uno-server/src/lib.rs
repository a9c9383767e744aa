//! Uno AI 出牌服务端
//!
//! 包含:
//! - 环境配置
//! - HTTP 路由（/ai-move、/reshuffle、/healthz）

pub mod config;
pub mod server;

pub use config::ServerConfig;
pub use server::{router, run, ServerState};
