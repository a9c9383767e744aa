//! 对局状态（请求载荷）

use serde::{Deserialize, Serialize};

use crate::card::{Card, CardColor, Hand};

/// 请求 AI 出牌时提交的局面
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    /// 手牌，缺省为空
    #[serde(default)]
    pub hand: Hand,
    /// 弃牌堆顶牌
    pub top_card: Card,
    /// 当前颜色，原样接收调用方的字符串；缺省或空白时取顶牌颜色
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_color: Option<String>,
}

impl GameState {
    pub fn new(hand: Hand, top_card: Card) -> Self {
        Self {
            hand,
            top_card,
            current_color: None,
        }
    }

    /// 指定当前颜色（万能牌改色后使用）
    pub fn with_color(mut self, color: CardColor) -> Self {
        self.current_color = Some(color.as_str().to_string());
        self
    }

    /// 调用方给出的非空颜色字符串
    fn requested_color(&self) -> Option<&str> {
        self.current_color
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
    }

    /// 实际生效的当前颜色
    ///
    /// 颜色名不区分大小写；无法识别时退回顶牌颜色。
    pub fn effective_color(&self) -> CardColor {
        self.requested_color()
            .and_then(|c| CardColor::from_name(&c.to_ascii_lowercase()))
            .unwrap_or(self.top_card.color)
    }

    /// 写进提示的颜色描述
    ///
    /// 能识别的颜色统一成小写名；无法识别的字符串原样转交模型。
    pub fn color_label(&self) -> String {
        match self.requested_color() {
            Some(raw) if CardColor::from_name(&raw.to_ascii_lowercase()).is_none() => {
                raw.to_string()
            }
            _ => self.effective_color().to_string(),
        }
    }

    /// 手牌中是否有这张牌
    pub fn holds(&self, card: &Card) -> bool {
        self.hand.contains(card)
    }

    /// 手牌中可以打出的牌
    pub fn playable_cards(&self) -> impl Iterator<Item = &Card> {
        let color = self.effective_color();
        self.hand
            .iter()
            .filter(move |c| c.can_play_on(&self.top_card, color))
    }
}
