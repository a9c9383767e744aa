//! Uno AI 服务共享协议库
//!
//! 包含:
//! - 牌、颜色、手牌等核心数据结构
//! - 请求局面 (GameState) 与响应走法 (Move)
//! - 走法 JSON 的严格形态校验
//! - 标准牌堆与发牌

mod card;
mod constants;
mod deck;
mod error;
mod moves;
mod state;

pub use card::{Card, CardColor, Hand};
pub use constants::*;
pub use deck::{Deal, Deck};
pub use error::{ProtocolError, Result};
pub use moves::Move;
pub use state::GameState;
