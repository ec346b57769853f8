//! Error types.
//!
//! `GameError` covers every rejected player action. Each is a local,
//! expected condition that the action dispatcher shows to the player
//! verbatim. An operation that returns an error has not changed any
//! state.

use thiserror::Error;

use crate::cards::TemplateId;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("not enough gold: have {have}, need {need}")]
    InsufficientGold { have: u32, need: u32 },

    #[error("board is full")]
    BoardFull,

    #[error("hand is full")]
    HandFull,

    #[error("index {index} out of range (len {len})")]
    InvalidIndex { index: usize, len: usize },

    #[error("already at max tier")]
    AlreadyMaxTier,

    #[error("card is not a spell")]
    NotASpell,

    #[error("card is not a minion")]
    NotAMinion,

    #[error("a discover is already pending")]
    DiscoverPending,

    #[error("no discover is pending")]
    NoDiscoverPending,

    #[error("invalid reorder permutation")]
    InvalidPermutation,

    #[error("spell needs a board target")]
    MissingTarget,

    #[error("player has been eliminated")]
    PlayerEliminated,

    #[error("unknown player")]
    UnknownPlayer,
}

pub type GameResult<T> = Result<T, GameError>;

/// Errors raised while building a catalog.
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("invalid template {id}: {reason}")]
    InvalidTemplate { id: TemplateId, reason: String },

    #[error("template {0} registered twice")]
    DuplicateTemplate(TemplateId),

    #[error("unknown template {0}")]
    UnknownTemplate(TemplateId),

    #[error("catalog parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Validate that `permutation` is a bijection over `0..len`.
pub(crate) fn check_permutation(permutation: &[usize], len: usize) -> GameResult<()> {
    if permutation.len() != len {
        return Err(GameError::InvalidPermutation);
    }
    let mut seen = vec![false; len];
    for &i in permutation {
        match seen.get_mut(i) {
            Some(slot) if !*slot => *slot = true,
            _ => return Err(GameError::InvalidPermutation),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = GameError::InsufficientGold { have: 1, need: 3 };
        assert_eq!(err.to_string(), "not enough gold: have 1, need 3");
        assert_eq!(
            GameError::InvalidIndex { index: 4, len: 2 }.to_string(),
            "index 4 out of range (len 2)"
        );
    }

    #[test]
    fn test_check_permutation() {
        assert!(check_permutation(&[2, 0, 1], 3).is_ok());
        assert!(check_permutation(&[], 0).is_ok());
        assert_eq!(check_permutation(&[0, 0, 1], 3), Err(GameError::InvalidPermutation));
        assert_eq!(check_permutation(&[0, 1, 3], 3), Err(GameError::InvalidPermutation));
        assert_eq!(check_permutation(&[0, 1], 3), Err(GameError::InvalidPermutation));
    }
}
