//! Transient combat identifiers.
//!
//! Every minion that enters a battle is tagged with a `CombatId` so the
//! event log can reference it. IDs are unique for one `CombatEngine`
//! invocation only and must never be persisted past it. Outside combat
//! a minion carries `CombatId::NONE`.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CombatId(pub u32);

impl CombatId {
    /// Placeholder carried by minions that are not in a battle.
    pub const NONE: CombatId = CombatId(0);

    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }

    #[must_use]
    pub const fn is_assigned(self) -> bool {
        self.0 != 0
    }
}

impl std::fmt::Display for CombatId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Hands out sequential combat IDs starting at 1.
#[derive(Clone, Debug)]
pub struct CombatIdAllocator {
    next: u32,
}

impl CombatIdAllocator {
    #[must_use]
    pub fn new() -> Self {
        Self { next: 1 }
    }

    pub fn alloc(&mut self) -> CombatId {
        let id = CombatId(self.next);
        self.next += 1;
        id
    }
}

impl Default for CombatIdAllocator {
    fn default() -> Self {
        Self::new()
    }
}
