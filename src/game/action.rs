//! Inbound player commands.
//!
//! The session layer decodes a command into a `PlayerAction` and hands
//! it to `Match::apply`. Indices refer to the player's shop, hand, or
//! board as the player last saw them.

use serde::{Deserialize, Serialize};

/// A recruit-phase command.
///
/// ```
/// use tavern_core::game::PlayerAction;
///
/// let json = r#"{ "Place": { "hand_index": 0, "position": 2, "target": null } }"#;
/// let action: PlayerAction = serde_json::from_str(json).unwrap();
/// assert_eq!(action, PlayerAction::Place { hand_index: 0, position: 2, target: None });
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayerAction {
    Buy { index: usize },
    Sell { index: usize },
    Place {
        hand_index: usize,
        position: usize,
        target: Option<usize>,
    },
    /// Board to hand.
    Remove { index: usize },
    Upgrade,
    Refresh,
    ToggleFreeze,
    ReorderBoard(Vec<usize>),
    ReorderShop(Vec<usize>),
    PlaySpell {
        hand_index: usize,
        target: Option<usize>,
    },
    DiscoverPick { index: usize },
}
