//! LLM 走法解析器
//!
//! 把模型的自由文本回复转换成经过形态校验的 [`Move`]。
//! 按顺序尝试一组具名策略：某一策略得到合法走法即生效；
//! 文本是合法 JSON 但形态不对时立即摸牌，不再尝试后续策略；
//! 全部策略都找不到 JSON 也返回摸牌。

use protocol::Move;
use serde_json::Value;
use tracing::{debug, warn};

/// Markdown 代码块标记
const FENCE: &str = "```";

/// 单个策略的解析结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Attempt {
    /// 得到合法走法
    Parsed(Move),
    /// 没有可解析的 JSON，交给下一个策略
    NotJson,
    /// 是 JSON 但既不是出牌也不是摸牌哨兵
    Rejected,
}

/// 一种解析策略
#[derive(Clone, Copy)]
pub struct ParseStrategy {
    /// 策略名，用于日志
    pub name: &'static str,
    /// 输入为模型原始回复
    pub parse: fn(&str) -> Attempt,
}

impl std::fmt::Debug for ParseStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParseStrategy").field("name", &self.name).finish()
    }
}

/// 按顺序尝试的策略
static STRATEGIES: [ParseStrategy; 2] = [
    ParseStrategy {
        name: "strict_json",
        parse: MoveParser::parse_strict,
    },
    ParseStrategy {
        name: "brace_span",
        parse: MoveParser::parse_brace_span,
    },
];

/// LLM 走法解析器
pub struct MoveParser;

impl MoveParser {
    /// 全部解析策略（按尝试顺序）
    pub fn strategies() -> &'static [ParseStrategy] {
        &STRATEGIES
    }

    /// 从 LLM 回复中解析走法，失败时返回摸牌
    pub fn parse_response(response: &str) -> Move {
        for strategy in Self::strategies() {
            match (strategy.parse)(response) {
                Attempt::Parsed(mv) => {
                    debug!("Move parsed by strategy '{}': {}", strategy.name, mv);
                    return mv;
                }
                Attempt::Rejected => {
                    warn!("Strategy '{}' found JSON with wrong shape, drawing", strategy.name);
                    return Move::Draw;
                }
                Attempt::NotJson => {}
            }
        }

        let preview: String = response.chars().take(200).collect();
        warn!("No strategy could parse LLM response, falling back to draw: {}", preview);
        Move::Draw
    }

    /// 严格解析：去掉代码块标记后整体作为一个 JSON 值
    pub fn parse_strict(response: &str) -> Attempt {
        let cleaned = Self::strip_code_fences(response);
        Self::json_to_move(&cleaned, "strict_json")
    }

    /// 启发式解析：在原始回复中取第一个不含 `}` 的 `{...}` 片段
    ///
    /// 嵌套对象会在第一个内层 `}` 处被截断，通常解析失败。
    pub fn parse_brace_span(response: &str) -> Attempt {
        match Self::extract_brace_span(response) {
            Some(span) => Self::json_to_move(span, "brace_span"),
            None => Attempt::NotJson,
        }
    }

    /// 去掉 Markdown 代码块标记（开头可带语言标记，如 ```json），并去除首尾空白
    pub fn strip_code_fences(text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        let mut rest = text;

        while let Some(idx) = rest.find(FENCE) {
            out.push_str(&rest[..idx]);
            rest = &rest[idx + FENCE.len()..];

            let tag_len = rest
                .find(|c: char| !(c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '+')))
                .unwrap_or(rest.len());
            rest = &rest[tag_len..];
        }
        out.push_str(rest);

        out.trim().to_string()
    }

    /// 第一个 `{` 到其后第一个 `}` 的片段，中间至少一个字符
    pub fn extract_brace_span(text: &str) -> Option<&str> {
        let mut from = 0;

        while let Some(offset) = text[from..].find('{') {
            let start = from + offset;
            let close = start + 1 + text[start + 1..].find('}')?;
            if close > start + 1 {
                return Some(&text[start..=close]);
            }
            // `{}` 不算，从下一个位置继续找
            from = start + 1;
        }

        None
    }

    fn json_to_move(text: &str, strategy: &str) -> Attempt {
        let value: Value = match serde_json::from_str(text) {
            Ok(value) => value,
            Err(e) => {
                debug!("[{}] not valid JSON: {}", strategy, e);
                return Attempt::NotJson;
            }
        };

        match Move::from_json(&value) {
            Ok(mv) => Attempt::Parsed(mv),
            Err(e) => {
                warn!("[{}] rejected JSON with wrong shape: {}", strategy, e);
                Attempt::Rejected
            }
        }
    }
}
