//! LLM 出牌引擎
//!
//! 构造提示 → 单次调用补全接口 → 解析回复。任何失败都落到摸牌。

use std::sync::Arc;

use anyhow::Result;
use protocol::{GameState, Move};
use tracing::{debug, info, warn};

use super::{ChatClient, ChatConfig, CompletionClient, MoveParser, PromptTemplate};

/// 对模型选牌的疑点，只记录日志，不拒绝
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveConcern {
    /// 手牌中没有这张牌
    NotInHand,
    /// 按规则不能打在顶牌上
    NotPlayable,
    /// 手中有可出的牌却选择摸牌
    DrewWithPlayableCard,
}

/// LLM 出牌引擎
#[derive(Clone)]
pub struct LlmEngine {
    client: Arc<dyn CompletionClient>,
}

impl LlmEngine {
    /// 使用任意补全客户端创建
    pub fn new(client: Arc<dyn CompletionClient>) -> Self {
        Self { client }
    }

    /// 使用 HTTP 客户端创建
    pub fn from_config(config: ChatConfig) -> Result<Self> {
        let client = ChatClient::new(config)?;
        Ok(Self::new(Arc::new(client)))
    }

    /// 为当前局面决定走法，从不返回错误
    pub async fn decide_move(&self, state: &GameState) -> Move {
        info!(
            "AI move request: hand={}, top_card={}, current_color={}",
            state.hand.len(),
            state.top_card,
            state.color_label()
        );

        let prompt = PromptTemplate::move_request_prompt(state);
        debug!("LLM prompt length: {} chars", prompt.len());

        let response = match self.client.complete(&prompt).await {
            Ok(response) => response,
            Err(e) => {
                warn!("LLM request failed, drawing instead: {}", e);
                return Move::Draw;
            }
        };

        let preview: String = response.chars().take(500).collect();
        debug!("LLM raw response: {}", preview);

        let mv = MoveParser::parse_response(&response);
        for concern in Self::review_move(&mv, state) {
            warn!("LLM suggested questionable move {}: {:?}", mv, concern);
        }

        info!("AI move: {}", mv);
        mv
    }

    /// 检查出牌是否在手牌中、是否合规，摸牌时检查是否本有牌可出
    pub fn review_move(mv: &Move, state: &GameState) -> Vec<MoveConcern> {
        let Some(card) = mv.card() else {
            return match state.playable_cards().next() {
                Some(_) => vec![MoveConcern::DrewWithPlayableCard],
                None => Vec::new(),
            };
        };

        let mut concerns = Vec::new();
        if !state.holds(card) {
            concerns.push(MoveConcern::NotInHand);
        }
        if !card.can_play_on(&state.top_card, state.effective_color()) {
            concerns.push(MoveConcern::NotPlayable);
        }
        concerns
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::CompletionError;
    use async_trait::async_trait;
    use protocol::{Card, CardColor};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// 返回预设回复的客户端，记录调用次数和收到的提示
    struct ScriptedClient {
        reply: Option<String>,
        calls: AtomicUsize,
        last_prompt: Mutex<Option<String>>,
    }

    impl ScriptedClient {
        fn replying(text: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: Some(text.to_string()),
                calls: AtomicUsize::new(0),
                last_prompt: Mutex::new(None),
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                reply: None,
                calls: AtomicUsize::new(0),
                last_prompt: Mutex::new(None),
            })
        }
    }

    #[async_trait]
    impl CompletionClient for ScriptedClient {
        async fn complete(&self, prompt: &str) -> std::result::Result<String, CompletionError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_prompt.lock().unwrap() = Some(prompt.to_string());
            match &self.reply {
                Some(text) => Ok(text.clone()),
                None => Err(CompletionError::Status {
                    status: 502,
                    body: "bad gateway".to_string(),
                }),
            }
        }
    }

    fn state() -> GameState {
        GameState::new(
            vec![
                Card::new(CardColor::Red, "5"),
                Card::new(CardColor::Green, "7"),
            ],
            Card::new(CardColor::Red, "2"),
        )
    }

    #[tokio::test]
    async fn test_decide_move_plays_parsed_card() {
        let client = ScriptedClient::replying(r#"{"color": "red", "value": "5"}"#);
        let engine = LlmEngine::new(client.clone());

        let mv = engine.decide_move(&state()).await;
        assert_eq!(mv, Move::play(CardColor::Red, "5"));
        assert_eq!(client.calls.load(Ordering::SeqCst), 1);

        let prompt = client.last_prompt.lock().unwrap().clone().unwrap();
        assert!(prompt.contains(r#"{"color":"green","value":"7"}"#));
    }

    #[tokio::test]
    async fn test_call_failure_draws_without_retry() {
        let client = ScriptedClient::failing();
        let engine = LlmEngine::new(client.clone());

        assert_eq!(engine.decide_move(&state()).await, Move::Draw);
        assert_eq!(client.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_unparseable_reply_draws() {
        let engine = LlmEngine::new(ScriptedClient::replying("I cannot decide"));
        assert_eq!(engine.decide_move(&state()).await, Move::Draw);
    }

    #[tokio::test]
    async fn test_card_not_in_hand_is_accepted() {
        let engine = LlmEngine::new(ScriptedClient::replying(r#"{"color": "blue", "value": "9"}"#));
        assert_eq!(
            engine.decide_move(&state()).await,
            Move::play(CardColor::Blue, "9")
        );
    }

    #[test]
    fn test_review_move() {
        let state = state();

        assert_eq!(
            LlmEngine::review_move(&Move::Draw, &state),
            vec![MoveConcern::DrewWithPlayableCard]
        );
        let stuck = GameState::new(vec![Card::new(CardColor::Blue, "8")], Card::new(CardColor::Red, "2"));
        assert!(LlmEngine::review_move(&Move::Draw, &stuck).is_empty());
        assert!(LlmEngine::review_move(&Move::play(CardColor::Red, "5"), &state).is_empty());
        assert_eq!(
            LlmEngine::review_move(&Move::play(CardColor::Green, "7"), &state),
            vec![MoveConcern::NotPlayable]
        );
        assert_eq!(
            LlmEngine::review_move(&Move::play(CardColor::Blue, "9"), &state),
            vec![MoveConcern::NotInHand, MoveConcern::NotPlayable]
        );
    }

    #[test]
    fn test_engine_from_config() {
        let engine = LlmEngine::from_config(ChatConfig::new("http://localhost:1/v1", "k"));
        assert!(engine.is_ok());
    }
}
