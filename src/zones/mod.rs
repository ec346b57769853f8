//! Player-owned card zones: the board and the hand.

pub mod board;
pub mod hand;

pub use board::{Board, BOARD_CAPACITY};
pub use hand::{Hand, HAND_CAPACITY};
