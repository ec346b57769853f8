//! Template catalog.
//!
//! The simulation only reads templates, through the `Catalog` trait, so a
//! host can back it with whatever store it likes. `CardRegistry` is the
//! in-memory implementation: validated on registration, and loadable from
//! a JSON array of templates.

use std::sync::Arc;

use rustc_hash::FxHashMap;

use super::definition::{CardKind, CardTemplate, TemplateId};
use super::tribe::{matches_filter, Tribe};
use crate::core::CatalogError;

/// Read-only template lookup.
///
/// Query results are ordered by template ID so callers that draw from
/// them with a seeded RNG stay deterministic.
pub trait Catalog: Send + Sync {
    fn by_template_id(&self, id: TemplateId) -> Option<Arc<CardTemplate>>;

    /// Non-token minion templates of exactly `tier` passing the tribe filter.
    fn by_tier_and_tribe(&self, tier: u8, tribes: &[Tribe]) -> Vec<Arc<CardTemplate>>;

    /// Non-token minion templates at or below `max_tier` passing the tribe filter.
    fn by_max_tier_and_tribes(&self, max_tier: u8, tribes: &[Tribe]) -> Vec<Arc<CardTemplate>>;
}

/// In-memory catalog.
///
/// ```
/// use tavern_core::cards::{Catalog, CardRegistry, CardTemplate, TemplateId, Tribe};
///
/// let mut registry = CardRegistry::new();
/// registry
///     .register(CardTemplate::minion(TemplateId::new(1), "Alleycat", 1, 1, 1).with_tribe(Tribe::Beast))
///     .unwrap();
///
/// assert_eq!(registry.by_template_id(TemplateId::new(1)).unwrap().name, "Alleycat");
/// assert_eq!(registry.by_max_tier_and_tribes(6, &[Tribe::Beast]).len(), 1);
/// assert!(registry.by_max_tier_and_tribes(6, &[Tribe::Mech]).is_empty());
/// ```
#[derive(Clone, Debug, Default)]
pub struct CardRegistry {
    templates: FxHashMap<TemplateId, Arc<CardTemplate>>,
    /// Registration IDs, kept sorted.
    order: Vec<TemplateId>,
}

impl CardRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and add a template.
    pub fn register(&mut self, template: CardTemplate) -> Result<Arc<CardTemplate>, CatalogError> {
        if self.templates.contains_key(&template.id) {
            return Err(CatalogError::DuplicateTemplate(template.id));
        }
        template
            .validate()
            .map_err(|reason| CatalogError::InvalidTemplate {
                id: template.id,
                reason,
            })?;

        let id = template.id;
        let template = Arc::new(template);
        self.templates.insert(id, Arc::clone(&template));
        let pos = self.order.partition_point(|&existing| existing < id);
        self.order.insert(pos, id);
        Ok(template)
    }

    /// Build a registry from a JSON array of templates.
    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        let templates: Vec<CardTemplate> = serde_json::from_str(json)?;
        let mut registry = Self::new();
        for template in templates {
            registry.register(template)?;
        }
        Ok(registry)
    }

    /// Look up a template, failing with `UnknownTemplate`.
    pub fn require(&self, id: TemplateId) -> Result<Arc<CardTemplate>, CatalogError> {
        self.by_template_id(id).ok_or(CatalogError::UnknownTemplate(id))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// All templates in ID order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<CardTemplate>> {
        self.order.iter().filter_map(|id| self.templates.get(id))
    }

    fn minions_where(&self, keep: impl Fn(&CardTemplate) -> bool) -> Vec<Arc<CardTemplate>> {
        self.iter()
            .filter(|t| t.kind == CardKind::Minion && !t.token && keep(t))
            .cloned()
            .collect()
    }
}

impl Catalog for CardRegistry {
    fn by_template_id(&self, id: TemplateId) -> Option<Arc<CardTemplate>> {
        self.templates.get(&id).cloned()
    }

    fn by_tier_and_tribe(&self, tier: u8, tribes: &[Tribe]) -> Vec<Arc<CardTemplate>> {
        self.minions_where(|t| t.tier == tier && matches_filter(&t.tribes, tribes))
    }

    fn by_max_tier_and_tribes(&self, max_tier: u8, tribes: &[Tribe]) -> Vec<Arc<CardTemplate>> {
        self.minions_where(|t| t.tier <= max_tier && matches_filter(&t.tribes, tribes))
    }
}
