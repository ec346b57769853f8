//! Players, actions, and the match that owns them.

mod action;
mod player;
mod state;

pub use action::PlayerAction;
pub use player::Player;
pub use state::{Match, SharedMatch};
