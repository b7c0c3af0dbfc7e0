//! Type/service chips and free-text search for the viewer.

use std::collections::BTreeSet;

use crate::model::{FeatureMeta, FeatureStore};

/// Which tag group a chip belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ChipGroup {
    Type,
    Service,
}

impl ChipGroup {
    pub fn name(&self) -> &'static str {
        match self {
            ChipGroup::Type => "Type",
            ChipGroup::Service => "Service",
        }
    }
}

/// One toggle in the filter bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chip {
    pub label: String,
    pub group: ChipGroup,
    pub active: bool,
}

/// Tags found in the loaded features, the active subset of each group and
/// the search query.
///
/// The tag sets are derived once per import; toggling and searching only
/// touch the active sets and the query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterIndex {
    types: BTreeSet<String>,
    services: BTreeSet<String>,
    active_types: BTreeSet<String>,
    active_services: BTreeSet<String>,
    /// Trimmed, lowercased.
    query: String,
}

impl FilterIndex {
    /// Scan a store for distinct non-empty types and service tags.
    pub fn build(store: &FeatureStore) -> Self {
        let mut index = Self::default();
        for feature in store.iter() {
            let kind = feature.meta.kind.trim();
            if !kind.is_empty() {
                index.types.insert(kind.to_string());
            }
            index.services.extend(feature.meta.service_tags());
        }
        log::debug!(
            "Filter index: {} types, {} services",
            index.types.len(),
            index.services.len()
        );
        index
    }

    fn sets(&self, group: ChipGroup) -> (&BTreeSet<String>, &BTreeSet<String>) {
        match group {
            ChipGroup::Type => (&self.types, &self.active_types),
            ChipGroup::Service => (&self.services, &self.active_services),
        }
    }

    /// Flip a chip. Returns its new state, or `None` for an unknown tag.
    pub fn toggle(&mut self, group: ChipGroup, label: &str) -> Option<bool> {
        let (known, active) = match group {
            ChipGroup::Type => (&self.types, &mut self.active_types),
            ChipGroup::Service => (&self.services, &mut self.active_services),
        };
        if !known.contains(label) {
            return None;
        }
        let now_active = if active.remove(label) {
            false
        } else {
            active.insert(label.to_string());
            true
        };
        log::debug!("Chip {} '{}' -> {}", group.name(), label, now_active);
        Some(now_active)
    }

    pub fn is_active(&self, group: ChipGroup, label: &str) -> bool {
        self.sets(group).1.contains(label)
    }

    /// Deactivate every chip; the query is kept.
    pub fn clear_active(&mut self) {
        self.active_types.clear();
        self.active_services.clear();
    }

    pub fn set_query(&mut self, query: &str) {
        self.query = query.trim().to_lowercase();
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// All chips, types first, each group sorted by label.
    pub fn chips(&self) -> Vec<Chip> {
        [ChipGroup::Type, ChipGroup::Service]
            .into_iter()
            .flat_map(|group| {
                let (known, active) = self.sets(group);
                known.iter().map(move |label| Chip {
                    label: label.clone(),
                    group,
                    active: active.contains(label),
                })
            })
            .collect()
    }

    /// Visibility predicate: type in the active types (if any), every active
    /// service present, and the name containing the query.
    pub fn matches(&self, meta: &FeatureMeta) -> bool {
        if !self.active_types.is_empty() && !self.active_types.contains(meta.kind.trim()) {
            return false;
        }

        if !self.active_services.is_empty() {
            let tags = meta.service_tags();
            if !self
                .active_services
                .iter()
                .all(|service| tags.iter().any(|t| t == service))
            {
                return false;
            }
        }

        self.query.is_empty() || meta.name.to_lowercase().contains(&self.query)
    }
}
