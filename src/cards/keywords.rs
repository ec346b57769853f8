//! Static keyword traits.
//!
//! A minion's keywords are a bitmask so that combat can test and clear
//! them cheaply. `Keyword` names a single bit and is what the event log
//! reports; `Keywords` is the set.
//!
//! In JSON the set is written as a list of names:
//!
//! ```
//! use tavern_core::cards::{Keyword, Keywords};
//!
//! let kw: Keywords = serde_json::from_str(r#"["Taunt", "DivineShield"]"#).unwrap();
//! assert!(kw.has(Keyword::Taunt));
//! assert!(kw.has(Keyword::DivineShield));
//! assert!(!kw.has(Keyword::Windfury));
//! ```

use serde::{Deserialize, Serialize};
use std::ops::{BitOr, BitOrAssign};

/// One keyword.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Keyword {
    Taunt,
    DivineShield,
    Windfury,
    Poisonous,
    Venomous,
    Stealth,
    Reborn,
    /// Marks a minion with a `Trigger::Battlecry` ability.
    Battlecry,
    /// Marks a minion with a `Trigger::Deathrattle` ability.
    Deathrattle,
}

impl Keyword {
    pub const ALL: [Keyword; 9] = [
        Keyword::Taunt,
        Keyword::DivineShield,
        Keyword::Windfury,
        Keyword::Poisonous,
        Keyword::Venomous,
        Keyword::Stealth,
        Keyword::Reborn,
        Keyword::Battlecry,
        Keyword::Deathrattle,
    ];

    #[must_use]
    pub const fn bit(self) -> u32 {
        1 << (self as u32)
    }
}

/// Bitmask of keywords.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Vec<Keyword>", into = "Vec<Keyword>")]
pub struct Keywords(u32);

impl Keywords {
    pub const NONE: Keywords = Keywords(0);

    #[must_use]
    pub const fn has(self, keyword: Keyword) -> bool {
        self.0 & keyword.bit() != 0
    }

    #[must_use]
    pub const fn with(self, keyword: Keyword) -> Self {
        Self(self.0 | keyword.bit())
    }

    pub fn insert(&mut self, keyword: Keyword) {
        self.0 |= keyword.bit();
    }

    /// Clear `keyword`; returns whether it was set.
    pub fn remove(&mut self, keyword: Keyword) -> bool {
        let had = self.has(keyword);
        self.0 &= !keyword.bit();
        had
    }

    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn iter(self) -> impl Iterator<Item = Keyword> {
        Keyword::ALL.into_iter().filter(move |k| self.has(*k))
    }
}

impl BitOr for Keywords {
    type Output = Keywords;

    fn bitor(self, rhs: Keywords) -> Keywords {
        Keywords(self.0 | rhs.0)
    }
}

impl BitOrAssign for Keywords {
    fn bitor_assign(&mut self, rhs: Keywords) {
        self.0 |= rhs.0;
    }
}

impl From<Keyword> for Keywords {
    fn from(keyword: Keyword) -> Self {
        Keywords(keyword.bit())
    }
}

impl From<Vec<Keyword>> for Keywords {
    fn from(list: Vec<Keyword>) -> Self {
        list.into_iter().fold(Keywords::NONE, Keywords::with)
    }
}

impl From<Keywords> for Vec<Keyword> {
    fn from(set: Keywords) -> Self {
        set.iter().collect()
    }
}

impl FromIterator<Keyword> for Keywords {
    fn from_iter<I: IntoIterator<Item = Keyword>>(iter: I) -> Self {
        iter.into_iter().fold(Keywords::NONE, Keywords::with)
    }
}

impl std::fmt::Debug for Keywords {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}
