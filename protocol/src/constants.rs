//! 协议常量定义

use crate::card::CardColor;

/// 每位玩家起手牌数
pub const HAND_SIZE: usize = 7;

/// 整副牌张数
pub const DECK_SIZE: usize = 108;

/// 有色牌（红黄绿蓝）
pub const SUIT_COLORS: [CardColor; 4] = [
    CardColor::Red,
    CardColor::Yellow,
    CardColor::Green,
    CardColor::Blue,
];

/// 每种颜色各两张的功能牌
pub const ACTION_VALUES: [&str; 3] = ["skip", "reverse", "draw2"];

/// 万能牌牌面
pub const WILD_VALUE: &str = "wild";

/// 万能 +4 牌面
pub const WILD_DRAW_FOUR_VALUE: &str = "wild4";

/// 每种万能牌的张数
pub const WILD_COUNT: usize = 4;

/// 摸牌哨兵中的动作名
pub const DRAW_ACTION: &str = "draw";
