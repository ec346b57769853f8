//! A player's hand.

use serde::{Deserialize, Serialize};

use crate::cards::{Card, TemplateId};
use crate::core::{GameError, GameResult};

/// Default hand capacity.
pub const HAND_CAPACITY: usize = 10;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hand {
    cards: Vec<Card>,
    capacity: usize,
}

impl Hand {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            cards: Vec::with_capacity(capacity),
            capacity,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    #[must_use]
    pub fn is_full(&self) -> bool {
        self.cards.len() >= self.capacity
    }

    #[must_use]
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Card> {
        self.cards.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Card> {
        self.cards.iter()
    }

    /// Append a card, failing with `HandFull`.
    pub fn push(&mut self, card: Card) -> GameResult<()> {
        if self.is_full() {
            return Err(GameError::HandFull);
        }
        self.cards.push(card);
        Ok(())
    }

    /// Remove the card at `index`, failing with `InvalidIndex`.
    pub fn remove(&mut self, index: usize) -> GameResult<Card> {
        self.check_index(index)?;
        Ok(self.cards.remove(index))
    }

    pub fn check_index(&self, index: usize) -> GameResult<()> {
        if index < self.cards.len() {
            Ok(())
        } else {
            Err(GameError::InvalidIndex {
                index,
                len: self.cards.len(),
            })
        }
    }

    /// Non-golden minion copies of `template` in the hand.
    #[must_use]
    pub fn count_plain_copies(&self, template: TemplateId) -> usize {
        self.cards
            .iter()
            .filter(|c| c.is_minion() && !c.is_golden() && c.template_id() == template)
            .count()
    }
}

impl Default for Hand {
    fn default() -> Self {
        Self::new(HAND_CAPACITY)
    }
}
