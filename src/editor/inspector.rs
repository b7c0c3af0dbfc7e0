//! Selection and the four-field metadata inspector.
//!
//! The inspector mirrors the selected feature's metadata into four editable
//! strings. Selecting repopulates them; editing a field writes the trimmed
//! value straight back into the selected feature. Without a selection the
//! inspector is disabled and edits are ignored.

use crate::model::{FeatureId, FeatureMeta, FeatureStore};

/// One of the four editable metadata fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetadataField {
    Name,
    Type,
    Services,
    Target,
}

impl MetadataField {
    pub fn label(&self) -> &'static str {
        match self {
            MetadataField::Name => "Name",
            MetadataField::Type => "Type",
            MetadataField::Services => "Services (comma-separated)",
            MetadataField::Target => "Target URL",
        }
    }

    pub fn all() -> &'static [MetadataField] {
        &[
            MetadataField::Name,
            MetadataField::Type,
            MetadataField::Services,
            MetadataField::Target,
        ]
    }
}

/// Current contents of the four input widgets.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MetadataFields {
    pub name: String,
    pub kind: String,
    pub services: String,
    pub target: String,
}

impl MetadataFields {
    fn from_meta(meta: &FeatureMeta) -> Self {
        Self {
            name: meta.name.clone(),
            kind: meta.kind.clone(),
            services: meta.services.clone(),
            target: meta.target.clone(),
        }
    }

    pub fn get(&self, field: MetadataField) -> &str {
        match field {
            MetadataField::Name => &self.name,
            MetadataField::Type => &self.kind,
            MetadataField::Services => &self.services,
            MetadataField::Target => &self.target,
        }
    }

    fn slot(&mut self, field: MetadataField) -> &mut String {
        match field {
            MetadataField::Name => &mut self.name,
            MetadataField::Type => &mut self.kind,
            MetadataField::Services => &mut self.services,
            MetadataField::Target => &mut self.target,
        }
    }
}

fn meta_slot(meta: &mut FeatureMeta, field: MetadataField) -> &mut String {
    match field {
        MetadataField::Name => &mut meta.name,
        MetadataField::Type => &mut meta.kind,
        MetadataField::Services => &mut meta.services,
        MetadataField::Target => &mut meta.target,
    }
}

/// Selection plus the bound inspector fields.
#[derive(Debug, Clone, Default)]
pub struct Inspector {
    selected: Option<FeatureId>,
    fields: MetadataFields,
}

impl Inspector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self) -> Option<FeatureId> {
        self.selected
    }

    pub fn fields(&self) -> &MetadataFields {
        &self.fields
    }

    /// Editing is only possible with a selection.
    pub fn is_enabled(&self) -> bool {
        self.selected.is_some()
    }

    /// Change the selection and repopulate the fields.
    ///
    /// An ID that is not in `store` clears the selection.
    pub fn select(&mut self, store: &FeatureStore, id: Option<FeatureId>) {
        let feature = id.and_then(|id| store.get(id));
        self.selected = feature.map(|f| f.id);
        self.fields = feature
            .map(|f| MetadataFields::from_meta(&f.meta))
            .unwrap_or_default();
        log::debug!("Selection: {:?}", self.selected);
    }

    /// Re-read the fields after the store changed underneath (e.g. a deletion).
    pub fn refresh(&mut self, store: &FeatureStore) {
        let selected = self.selected;
        self.select(store, selected);
    }

    /// Apply a widget edit. Returns false when nothing is selected.
    pub fn edit(&mut self, store: &mut FeatureStore, field: MetadataField, value: &str) -> bool {
        let Some(id) = self.selected else {
            return false;
        };
        let Some(feature) = store.get_mut(id) else {
            self.select(store, None);
            return false;
        };

        *self.fields.slot(field) = value.to_string();
        *meta_slot(&mut feature.meta, field) = value.trim().to_string();
        true
    }
}
