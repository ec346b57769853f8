//! Shared pool and per-player shops.

pub mod pool;
pub mod shop;

pub use pool::CardPool;
pub use shop::Shop;
