//! 牌堆与发牌

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::card::{Card, CardColor, Hand};
use crate::constants::{
    ACTION_VALUES, HAND_SIZE, SUIT_COLORS, WILD_COUNT, WILD_DRAW_FOUR_VALUE, WILD_VALUE,
};
use crate::error::{ProtocolError, Result};

/// 一局的初始发牌结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deal {
    pub hand: Hand,
    pub opponent_hand: Hand,
    pub top_card: Card,
}

/// 牌堆，末尾为堆顶
#[derive(Debug, Clone)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    /// 标准 108 张牌（未洗）
    pub fn standard() -> Self {
        let mut cards = Vec::with_capacity(crate::DECK_SIZE);

        for color in SUIT_COLORS {
            cards.push(Card::new(color, "0"));
            for n in 1..=9 {
                cards.push(Card::new(color, n.to_string()));
                cards.push(Card::new(color, n.to_string()));
            }
            for action in ACTION_VALUES {
                cards.push(Card::new(color, action));
                cards.push(Card::new(color, action));
            }
        }

        for _ in 0..WILD_COUNT {
            cards.push(Card::new(CardColor::Wild, WILD_VALUE));
            cards.push(Card::new(CardColor::Wild, WILD_DRAW_FOUR_VALUE));
        }

        Self { cards }
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn shuffle_with<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.cards.shuffle(rng);
    }

    /// 从堆顶摸一张
    pub fn draw(&mut self) -> Option<Card> {
        self.cards.pop()
    }

    /// 翻出第一张非万能牌，途中的万能牌直接丢弃
    fn flip_top_card(&mut self) -> Result<Card> {
        std::iter::from_fn(|| self.draw())
            .find(|card| !card.is_wild())
            .ok_or(ProtocolError::DeckExhausted)
    }

    /// 洗一副新牌，双方各发 7 张，再翻出第一张非万能牌作为顶牌
    pub fn deal<R: Rng + ?Sized>(rng: &mut R) -> Result<Deal> {
        let mut deck = Self::standard();
        deck.shuffle_with(rng);

        let at = deck.len() - HAND_SIZE;
        let hand: Hand = deck.cards.split_off(at);
        let at = deck.len() - HAND_SIZE;
        let opponent_hand: Hand = deck.cards.split_off(at);

        let top_card = deck.flip_top_card()?;

        Ok(Deal {
            hand,
            opponent_hand,
            top_card,
        })
    }
}
