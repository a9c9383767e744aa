//! 走法（响应载荷）

use serde::de::{self, Deserializer};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::card::{Card, CardColor};
use crate::constants::DRAW_ACTION;
use crate::error::{ProtocolError, Result};

/// AI 给出的走法
///
/// JSON 形态只有两种：
/// - `{"color": "red", "value": "5"}` 出这张牌
/// - `{"action": "draw"}` 摸牌
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Move {
    /// 摸牌（无牌可出或无法判断时的兜底）
    Draw,
    /// 出牌
    Play(Card),
}

impl Move {
    pub fn play(color: CardColor, value: impl Into<String>) -> Self {
        Move::Play(Card::new(color, value))
    }

    pub fn is_draw(&self) -> bool {
        matches!(self, Move::Draw)
    }

    /// 要打出的牌
    pub fn card(&self) -> Option<&Card> {
        match self {
            Move::Play(card) => Some(card),
            Move::Draw => None,
        }
    }

    /// 从任意 JSON 值严格转换，多余或缺失的键都视为无效
    pub fn from_json(value: &Value) -> Result<Self> {
        let obj = value
            .as_object()
            .ok_or_else(|| ProtocolError::shape("not a JSON object"))?;

        if obj.contains_key("action") {
            return Self::draw_from_object(obj);
        }
        Self::play_from_object(obj)
    }

    fn draw_from_object(obj: &Map<String, Value>) -> Result<Self> {
        if obj.len() != 1 {
            return Err(ProtocolError::shape("draw sentinel has extra keys"));
        }
        match obj.get("action").and_then(Value::as_str) {
            Some(DRAW_ACTION) => Ok(Move::Draw),
            Some(other) => Err(ProtocolError::shape(format!("unknown action '{}'", other))),
            None => Err(ProtocolError::shape("'action' is not a string")),
        }
    }

    fn play_from_object(obj: &Map<String, Value>) -> Result<Self> {
        if obj.len() != 2 {
            return Err(ProtocolError::shape(format!(
                "card must have exactly 'color' and 'value', got {} keys",
                obj.len()
            )));
        }

        let color = obj
            .get("color")
            .and_then(Value::as_str)
            .ok_or_else(|| ProtocolError::shape("missing string 'color'"))?;
        let value = obj
            .get("value")
            .and_then(Value::as_str)
            .ok_or_else(|| ProtocolError::shape("missing string 'value'"))?;

        let color =
            CardColor::from_name(color).ok_or_else(|| ProtocolError::UnknownColor(color.to_string()))?;

        Ok(Move::play(color, value))
    }
}

impl std::str::FromStr for Move {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(s)?;
        Move::from_json(&value)
    }
}

impl Serialize for Move {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Move::Draw => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("action", DRAW_ACTION)?;
                map.end()
            }
            Move::Play(card) => card.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for Move {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Move::from_json(&value).map_err(de::Error::custom)
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Move::Draw => f.write_str("draw"),
            Move::Play(card) => write!(f, "play {}", card),
        }
    }
}
