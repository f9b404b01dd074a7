//! Contract configuration documents.
//!
//! The configuration is what an outside tool hands the compiler: naming,
//! URIs, field declarations and feature tags. Unknown keys are ignored so a
//! generated JSON schema mirror (which adds `slot`/`offset` per field) can
//! be loaded back as a configuration.

use serde::{Deserialize, Serialize};

use crate::entry::Entry;
use crate::feature::Feature;

/// URIs published by the generated contract.
#[derive(Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Uris {
    #[serde(rename = "baseURI", default)]
    pub base: String,
    #[serde(rename = "schemaURI", default)]
    pub schema: String,
    #[serde(rename = "imageURI", default)]
    pub image: String,
}

/// A contract description as supplied by the user.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractConfig {
    pub scope_name: String,
    pub name: String,
    pub symbol: String,
    #[serde(flatten)]
    pub uris: Uris,
    #[serde(default)]
    pub fields: Vec<Entry>,
    #[serde(default)]
    pub features: Vec<Feature>,
}

impl ContractConfig {
    pub fn new(scope_name: impl Into<String>, name: impl Into<String>, symbol: impl Into<String>) -> Self {
        Self {
            scope_name: scope_name.into(),
            name: name.into(),
            symbol: symbol.into(),
            uris: Uris::default(),
            fields: Vec::new(),
            features: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_fields(mut self, fields: Vec<Entry>) -> Self {
        self.fields = fields;
        self
    }

    #[must_use]
    pub fn with_features(mut self, features: Vec<Feature>) -> Self {
        self.features = features;
        self
    }

    #[must_use]
    pub fn with_uris(mut self, uris: Uris) -> Self {
        self.uris = uris;
        self
    }
}
