//! LLM 提示模板
//!
//! 把手牌、顶牌和当前颜色拼成一段自然语言指令，其中手牌和顶牌以 JSON 片段嵌入。

use protocol::{Card, GameState};

/// LLM 提示模板
pub struct PromptTemplate;

impl PromptTemplate {
    /// 出牌规则说明
    pub fn rules() -> &'static str {
        "A card can be played if it matches the current color, matches the top card's value, \
         or is a wild card."
    }

    /// 回复格式要求：只能是两种 JSON 之一，不能有其他文字
    pub fn response_format() -> &'static str {
        r#"Respond with ONLY a JSON object like {"color": "red", "value": "5"} for the card you want to play. If you cannot play any card, respond with {"action": "draw"}. Do not include any other text, just the JSON."#
    }

    /// 生成出牌请求提示
    pub fn move_request_prompt(state: &GameState) -> String {
        let mut prompt = String::from("You are playing Uno. ");

        prompt.push_str(&format!("Your hand is: {}. ", Self::hand_json(&state.hand)));
        prompt.push_str(&format!(
            "The top card on the discard pile is: {}. ",
            Self::card_json(&state.top_card)
        ));
        prompt.push_str(&format!("The current color is: {}. ", state.color_label()));
        prompt.push_str(Self::rules());
        prompt.push_str(" Pick the best card to play from your hand. ");
        prompt.push_str(Self::response_format());

        prompt
    }

    fn hand_json(hand: &[Card]) -> String {
        // Card 只含字符串和单元枚举，序列化不会失败
        serde_json::to_string(hand).unwrap_or_else(|_| "[]".to_string())
    }

    fn card_json(card: &Card) -> String {
        serde_json::to_string(card).unwrap_or_else(|_| "{}".to_string())
    }
}
