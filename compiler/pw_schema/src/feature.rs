//! Contract features.
//!
//! Configurations name features from one flat vocabulary ([`Feature`]).
//! Internally that vocabulary carries three separate concerns, each with
//! its own type:
//!
//! - **Shape**: which base contract is extended ([`PatchKind`],
//!   [`FragmentKind`]).
//! - **Capabilities**: independent flags ([`Capabilities`]).
//! - **Reference storage**: derived from the declared fields, not from the
//!   feature list ([`ReferenceMode`]).

use std::fmt;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

/// A feature tag as written in configuration files.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Serialize, Deserialize)]
pub enum Feature {
    #[serde(rename = "PATCH")]
    Patch,
    #[serde(rename = "1155PATCH")]
    Patch1155,
    #[serde(rename = "ACCOUNTPATCH")]
    AccountPatch,
    #[serde(rename = "FRAGMENTMULTI")]
    FragmentMulti,
    #[serde(rename = "FRAGMENTSINGLE")]
    FragmentSingle,
    #[serde(rename = "MINTABLE")]
    Mintable,
    #[serde(rename = "REVERSIBLE")]
    Reversible,
    #[serde(rename = "WEAKREF")]
    WeakRef,
    #[serde(rename = "DYNAMICREFLIBRARY")]
    DynamicRefLibrary,
    #[serde(rename = "LITEREF")]
    LiteRef,
}

impl Feature {
    /// The serialized tag.
    pub const fn tag(self) -> &'static str {
        match self {
            Feature::Patch => "PATCH",
            Feature::Patch1155 => "1155PATCH",
            Feature::AccountPatch => "ACCOUNTPATCH",
            Feature::FragmentMulti => "FRAGMENTMULTI",
            Feature::FragmentSingle => "FRAGMENTSINGLE",
            Feature::Mintable => "MINTABLE",
            Feature::Reversible => "REVERSIBLE",
            Feature::WeakRef => "WEAKREF",
            Feature::DynamicRefLibrary => "DYNAMICREFLIBRARY",
            Feature::LiteRef => "LITEREF",
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// The entity a soulbound ("patch") contract binds its tokens to.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum PatchKind {
    Token,
    TokenSet1155,
    Account,
}

impl PatchKind {
    pub const fn feature(self) -> Feature {
        match self {
            PatchKind::Token => Feature::Patch,
            PatchKind::TokenSet1155 => Feature::Patch1155,
            PatchKind::Account => Feature::AccountPatch,
        }
    }
}

/// Assignment flavour of a fragment contract.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum FragmentKind {
    Single,
    Multi,
}

impl FragmentKind {
    pub const fn feature(self) -> Feature {
        match self {
            FragmentKind::Single => Feature::FragmentSingle,
            FragmentKind::Multi => Feature::FragmentMulti,
        }
    }
}

bitflags! {
    /// Independent capability flags.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
    pub struct Capabilities: u8 {
        const MINTABLE = 1 << 0;
        const REVERSIBLE = 1 << 1;
        const WEAK_REF = 1 << 2;
        const DYNAMIC_REF_LIBRARY = 1 << 3;
        /// Declared explicitly, or implied by a `literef` field.
        const LITEREF = 1 << 4;
    }
}

/// How a contract stores its reference collection.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum ReferenceMode {
    /// No reference field.
    None,
    /// A `literef` field with `arrayLength >= 1`, packed in the layout.
    Fixed { field_id: u32, capacity: u32 },
    /// A `literef` field with `arrayLength == 0`, kept in a growable list.
    Dynamic { field_id: u32 },
}

impl ReferenceMode {
    #[inline]
    pub fn is_dynamic(&self) -> bool {
        matches!(self, ReferenceMode::Dynamic { .. })
    }

    #[inline]
    pub fn field_id(&self) -> Option<u32> {
        match self {
            ReferenceMode::None => None,
            ReferenceMode::Fixed { field_id, .. } | ReferenceMode::Dynamic { field_id } => {
                Some(*field_id)
            }
        }
    }
}

/// The declared features of a contract, split by concern.
///
/// Keeps every declared tag (duplicates collapse) so the validator can
/// report conflicting pairs by name.
#[derive(Clone, Eq, PartialEq, Debug, Default)]
pub struct FeatureSet {
    declared: Vec<Feature>,
}

impl FeatureSet {
    pub fn new(features: &[Feature]) -> Self {
        let mut declared = Vec::with_capacity(features.len());
        for &feature in features {
            if !declared.contains(&feature) {
                declared.push(feature);
            }
        }
        Self { declared }
    }

    /// Declared tags in first-seen order.
    pub fn declared(&self) -> &[Feature] {
        &self.declared
    }

    #[inline]
    pub fn contains(&self, feature: Feature) -> bool {
        self.declared.contains(&feature)
    }

    /// All declared patch kinds. More than one is a validation error.
    pub fn patch_kinds(&self) -> Vec<PatchKind> {
        self.declared
            .iter()
            .filter_map(|f| match f {
                Feature::Patch => Some(PatchKind::Token),
                Feature::Patch1155 => Some(PatchKind::TokenSet1155),
                Feature::AccountPatch => Some(PatchKind::Account),
                _ => None,
            })
            .collect()
    }

    /// All declared fragment kinds. More than one is a validation error.
    pub fn fragment_kinds(&self) -> Vec<FragmentKind> {
        self.declared
            .iter()
            .filter_map(|f| match f {
                Feature::FragmentSingle => Some(FragmentKind::Single),
                Feature::FragmentMulti => Some(FragmentKind::Multi),
                _ => None,
            })
            .collect()
    }

    /// The patch kind of a validated set.
    pub fn patch(&self) -> Option<PatchKind> {
        self.patch_kinds().first().copied()
    }

    /// The fragment kind of a validated set.
    pub fn fragment(&self) -> Option<FragmentKind> {
        self.fragment_kinds().first().copied()
    }

    pub fn capabilities(&self) -> Capabilities {
        self.declared
            .iter()
            .fold(Capabilities::empty(), |caps, f| match f {
                Feature::Mintable => caps | Capabilities::MINTABLE,
                Feature::Reversible => caps | Capabilities::REVERSIBLE,
                Feature::WeakRef => caps | Capabilities::WEAK_REF,
                Feature::DynamicRefLibrary => caps | Capabilities::DYNAMIC_REF_LIBRARY,
                Feature::LiteRef => caps | Capabilities::LITEREF,
                _ => caps,
            })
    }
}
