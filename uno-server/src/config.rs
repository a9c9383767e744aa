//! 服务配置
//!
//! 进程启动时从环境变量（以及 `.env` 文件）读取一次，之后以不可变对象传递。

use std::net::SocketAddr;

use anyhow::{Context, Result};
use uno_ai::llm::{ChatConfig, DEFAULT_MODEL, DEFAULT_TIMEOUT_SECS};

/// 默认监听地址
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:5000";

/// 服务配置
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// HTTP 监听地址
    pub bind_addr: SocketAddr,
    /// 补全接口配置
    pub chat: ChatConfig,
}

impl ServerConfig {
    /// 加载 `.env` 后从进程环境读取
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 从任意键值来源读取
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .with_context(|| format!("{} must be set", key))
        };

        let api_url = required("API_URL")?;
        let api_key = required("API_KEY")?;

        let model = lookup("AI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let timeout_secs = match lookup("AI_TIMEOUT_SECS") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .with_context(|| format!("AI_TIMEOUT_SECS is not a number: {}", raw))?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        let bind_raw = lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_raw
            .parse::<SocketAddr>()
            .with_context(|| format!("BIND_ADDR is not a socket address: {}", bind_raw))?;

        Ok(Self {
            bind_addr,
            chat: ChatConfig {
                api_url,
                api_key,
                model,
                timeout_secs,
            },
        })
    }
}
