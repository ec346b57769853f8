//! Card system: templates, instances, keywords, tribes, catalog.
//!
//! ## Key Types
//!
//! - `CardTemplate`: immutable card data, shared via `Arc`
//! - `Minion` / `Spell` / `Card`: runtime instances
//! - `Keywords`: bitmask of static traits
//! - `Tribe`, `calc_majority_tribe`: faction counting
//! - `Catalog` / `CardRegistry`: template lookup

pub mod definition;
pub mod instance;
pub mod keywords;
pub mod registry;
pub mod tribe;

pub use definition::{CardKind, CardTemplate, GoldenVariant, TemplateId};
pub use instance::{Card, Minion, Spell};
pub use keywords::{Keyword, Keywords};
pub use registry::{CardRegistry, Catalog};
pub use tribe::{calc_majority_tribe, matches_filter, MajorityTribe, Tribe, TribeSet, TribeSummary};
