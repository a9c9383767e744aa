//! 错误类型定义

use thiserror::Error;

/// 协议错误类型
#[derive(Error, Debug)]
pub enum ProtocolError {
    /// JSON 解析错误
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// 既不是出牌也不是摸牌哨兵
    #[error("Invalid move shape: {reason}")]
    InvalidMoveShape { reason: String },

    /// 未知颜色
    #[error("Unknown card color: {0}")]
    UnknownColor(String),

    /// 牌堆里翻不出有色牌
    #[error("Deck ran out of colored cards")]
    DeckExhausted,
}

impl ProtocolError {
    pub(crate) fn shape(reason: impl Into<String>) -> Self {
        Self::InvalidMoveShape {
            reason: reason.into(),
        }
    }
}

/// 协议操作结果类型
pub type Result<T> = std::result::Result<T, ProtocolError>;
