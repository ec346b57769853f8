//! Tribes and the majority-tribe count.
//!
//! `calc_majority_tribe` summarises a multiset of tribes. The result only
//! depends on the counts, except for the documented tiebreak: when
//! several tribes share the top count and wildcard (`All`) minions are
//! present, the tribe with the highest identifier wins and absorbs the
//! wildcards. Without wildcards a tie is reported as `Mixed`. Outside a
//! tie, wildcards are added only when a single concrete tribe is present.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Creature faction. Discriminants order the majority tiebreak.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Tribe {
    Beast = 1,
    Demon = 2,
    Dragon = 3,
    Elemental = 4,
    Mech = 5,
    Murloc = 6,
    Pirate = 7,
    Quilboar = 8,
    Naga = 9,
    Undead = 10,
    /// Wildcard: belongs to every tribe.
    All = 255,
}

impl Tribe {
    /// Concrete tribes in identifier order.
    pub const CONCRETE: [Tribe; 10] = [
        Tribe::Beast,
        Tribe::Demon,
        Tribe::Dragon,
        Tribe::Elemental,
        Tribe::Mech,
        Tribe::Murloc,
        Tribe::Pirate,
        Tribe::Quilboar,
        Tribe::Naga,
        Tribe::Undead,
    ];

    #[must_use]
    pub const fn id(self) -> u8 {
        self as u8
    }

    #[must_use]
    pub const fn is_wildcard(self) -> bool {
        matches!(self, Tribe::All)
    }
}

/// Tribes of one template. Most minions have zero or one.
pub type TribeSet = SmallVec<[Tribe; 2]>;

/// Does a minion with `tribes` pass `filter`?
///
/// An empty filter passes everything; a wildcard minion passes any filter.
#[must_use]
pub fn matches_filter(tribes: &[Tribe], filter: &[Tribe]) -> bool {
    filter.is_empty()
        || tribes.iter().any(|t| t.is_wildcard() || filter.contains(t))
}

/// Winner of a majority count.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MajorityTribe {
    /// No concrete tribe present.
    Neutral,
    Tribe(Tribe),
    /// Several tribes tied with no wildcard to break the tie.
    Mixed,
}

/// Result of `calc_majority_tribe`.
///
/// For `Mixed`, `count` is the number of distinct tribes present.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TribeSummary {
    pub majority: MajorityTribe,
    pub count: usize,
}

impl TribeSummary {
    pub const NEUTRAL: TribeSummary = TribeSummary {
        majority: MajorityTribe::Neutral,
        count: 0,
    };
}

/// Count tribes and pick the majority.
///
/// ```
/// use tavern_core::cards::{calc_majority_tribe, MajorityTribe, Tribe};
///
/// let s = calc_majority_tribe(&[Tribe::Beast, Tribe::Demon]);
/// assert_eq!((s.majority, s.count), (MajorityTribe::Mixed, 2));
///
/// let s = calc_majority_tribe(&[Tribe::Beast, Tribe::Demon, Tribe::All]);
/// assert_eq!((s.majority, s.count), (MajorityTribe::Tribe(Tribe::Demon), 2));
///
/// let s = calc_majority_tribe(&[Tribe::All, Tribe::All, Tribe::Murloc]);
/// assert_eq!((s.majority, s.count), (MajorityTribe::Tribe(Tribe::Murloc), 3));
/// ```
#[must_use]
pub fn calc_majority_tribe(tribes: &[Tribe]) -> TribeSummary {
    let mut counts = [0usize; Tribe::CONCRETE.len()];
    let mut wildcards = 0usize;

    for &tribe in tribes {
        if tribe.is_wildcard() {
            wildcards += 1;
        } else {
            counts[usize::from(tribe.id()) - 1] += 1;
        }
    }

    let present: SmallVec<[(Tribe, usize); 4]> = Tribe::CONCRETE
        .iter()
        .zip(counts)
        .filter(|(_, n)| *n > 0)
        .map(|(t, n)| (*t, n))
        .collect();

    let Some(best) = present.iter().map(|(_, n)| *n).max() else {
        return TribeSummary::NEUTRAL;
    };

    // `present` is in identifier order, so the last tied entry has the highest ID.
    let tied: SmallVec<[Tribe; 4]> = present
        .iter()
        .filter(|(_, n)| *n == best)
        .map(|(t, _)| *t)
        .collect();

    match tied.as_slice() {
        // Wildcards only join a lone tribe; a clear leader among several keeps its own count.
        [only] => TribeSummary {
            majority: MajorityTribe::Tribe(*only),
            count: if present.len() == 1 { best + wildcards } else { best },
        },
        [.., highest] if wildcards > 0 => TribeSummary {
            majority: MajorityTribe::Tribe(*highest),
            count: best + wildcards,
        },
        _ => TribeSummary {
            majority: MajorityTribe::Mixed,
            count: present.len(),
        },
    }
}
