//! 牌定义

use serde::{Deserialize, Serialize};

/// 牌的颜色
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardColor {
    Red,
    Yellow,
    Green,
    Blue,
    /// 万能牌（wild / wild4）
    Wild,
}

impl CardColor {
    /// 小写名称，与 JSON 表示一致
    pub fn as_str(&self) -> &'static str {
        match self {
            CardColor::Red => "red",
            CardColor::Yellow => "yellow",
            CardColor::Green => "green",
            CardColor::Blue => "blue",
            CardColor::Wild => "wild",
        }
    }

    /// 从小写名称解析
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "red" => Some(CardColor::Red),
            "yellow" => Some(CardColor::Yellow),
            "green" => Some(CardColor::Green),
            "blue" => Some(CardColor::Blue),
            "wild" => Some(CardColor::Wild),
            _ => None,
        }
    }
}

impl std::fmt::Display for CardColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 一张牌
///
/// `value` 是点数或功能名（"0"-"9"、skip、reverse、draw2、wild、wild4），
/// 原样保留，不做校验。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Card {
    pub color: CardColor,
    pub value: String,
}

impl Card {
    /// 创建新牌
    pub fn new(color: CardColor, value: impl Into<String>) -> Self {
        Self {
            color,
            value: value.into(),
        }
    }

    /// 是否为万能牌
    pub fn is_wild(&self) -> bool {
        self.color == CardColor::Wild
    }

    /// 能否打在 `top` 上：颜色匹配当前颜色、点数匹配顶牌，或是万能牌
    ///
    /// 仅用于诊断日志，服务不据此拒绝走法。
    pub fn can_play_on(&self, top: &Card, current_color: CardColor) -> bool {
        self.is_wild() || self.color == current_color || self.value == top.value
    }
}

impl std::fmt::Display for Card {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{} {}]",
            self.color.as_str().to_uppercase(),
            self.value.to_uppercase()
        )
    }
}

/// 手牌
pub type Hand = Vec<Card>;
