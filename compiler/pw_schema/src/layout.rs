//! Storage layout planner.
//!
//! Packs field declarations into consecutive 256-bit storage words and
//! records where every field lives (`slot`, `offset`).
//!
//! # Algorithm
//!
//! Planning runs in two phases, each producing a new list instead of
//! rearranging the one being scanned:
//!
//! 1. **Pack order.** Fields are sorted (scalars by size descending, fixed
//!    arrays last), then distributed into 256-bit bins by greedy
//!    first-fit-decreasing. Concatenating the bins gives the packed order.
//!
//! 2. **Placement.** A [`SlotCursor`] walks the packed order. A field that
//!    would cross a word boundary from a non-zero offset, and any fixed
//!    array not already at offset 0, is moved to the start of a fresh word.
//!    Fields wider than a word span consecutive words from offset 0.
//!
//! The alignment rule can waste the tail of a word, so the result may use
//! one word more than an unconstrained optimum. In exchange no field ever
//! starts mid-word and continues into the next one.
//!
//! Dynamic-length fields are resolved but never placed; they live in a
//! separate growable store.

use std::cmp::Reverse;

use rustc_hash::FxHashMap;

use crate::entry::{Entry, FieldShape};
use crate::error::SchemaError;
use crate::field_type::{FieldType, WORD_BITS};

/// Largest field, in bits: 65 536 words.
pub const MAX_FIELD_BITS: u32 = 1 << 24;

/// Upper bound on the words a layout may use. Keeps every slot and bit
/// position representable as `u32`.
pub const MAX_LAYOUT_WORDS: u64 = 1 << 24;

/// Position of a bit inside an entity's word sequence.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub struct SlotCursor {
    pub slot: u32,
    pub offset: u32,
}

impl SlotCursor {
    pub const START: SlotCursor = SlotCursor { slot: 0, offset: 0 };

    pub const fn new(slot: u32, offset: u32) -> Self {
        Self { slot, offset }
    }

    /// Start of the next word.
    #[must_use]
    pub const fn next_slot(self) -> Self {
        Self {
            slot: self.slot + 1,
            offset: 0,
        }
    }

    /// Where a field of `total_bits` must start when the cursor is here.
    #[must_use]
    pub const fn align_for(self, total_bits: u32, is_array: bool) -> Self {
        if self.offset > 0 && (is_array || self.offset.saturating_add(total_bits) > WORD_BITS) {
            self.next_slot()
        } else {
            self
        }
    }

    /// Cursor after `bits` are consumed starting here.
    ///
    /// Only the bits consumed in the final word touched move the offset. A
    /// cursor that lands exactly on a word end rolls over to the next word.
    #[must_use]
    pub const fn advance(self, bits: u32) -> Self {
        if bits == 0 {
            return self;
        }
        let end = self.offset.saturating_add(bits);
        let last_slot = self.slot.saturating_add((end - 1) / WORD_BITS);
        let in_last = end - ((end - 1) / WORD_BITS) * WORD_BITS;
        if in_last == WORD_BITS {
            Self {
                slot: last_slot + 1,
                offset: 0,
            }
        } else {
            Self {
                slot: last_slot,
                offset: in_last,
            }
        }
    }
}

/// A contiguous run of bits a field contributes to one storage word.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct Chunk {
    /// Element index (0 for scalars).
    pub element: u32,
    /// Word index within a multi-word element (0 unless the element is
    /// wider than a word).
    pub part: u32,
    pub slot: u32,
    pub offset: u32,
    pub bits: u32,
}

/// A declaration with its resolved type and final placement.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StorageField {
    pub entry: Entry,
    pub field_type: FieldType,
    pub element_bits: u32,
    pub total_bits: u32,
    pub slot: u32,
    pub offset: u32,
}

impl StorageField {
    /// Resolve a declaration against the catalog. Placement is left at the
    /// origin until the planner assigns it.
    pub fn resolve(entry: &Entry) -> Result<Self, SchemaError> {
        let field_type = FieldType::from_name(&entry.field_type)?;
        let shape = entry.shape();

        if shape == FieldShape::Dynamic && !field_type.is_reference() {
            return Err(SchemaError::DynamicLengthNotSupported {
                key: entry.key.clone(),
                field_type: field_type.name(),
            });
        }
        if matches!(shape, FieldShape::Array(_)) && !field_type.tiles_words() {
            return Err(SchemaError::UnalignedArrayElement {
                key: entry.key.clone(),
                field_type: field_type.name(),
            });
        }

        let element_bits = field_type.bit_width();
        let total_bits = element_bits
            .checked_mul(shape.element_count())
            .filter(|&bits| bits <= MAX_FIELD_BITS)
            .ok_or_else(|| SchemaError::FieldTooLarge {
                key: entry.key.clone(),
                array_length: entry.array_length,
            })?;
        Ok(Self {
            entry: entry.clone(),
            field_type,
            element_bits,
            total_bits,
            slot: 0,
            offset: 0,
        })
    }

    #[inline]
    pub fn id(&self) -> u32 {
        self.entry.id
    }

    #[inline]
    pub fn key(&self) -> &str {
        &self.entry.key
    }

    #[inline]
    pub fn shape(&self) -> FieldShape {
        self.entry.shape()
    }

    #[inline]
    pub fn is_dynamic(&self) -> bool {
        self.shape() == FieldShape::Dynamic
    }

    #[inline]
    pub fn is_array(&self) -> bool {
        matches!(self.shape(), FieldShape::Array(_))
    }

    /// Number of stored elements (1 for scalars, 0 for dynamic fields).
    pub fn element_count(&self) -> u32 {
        match self.shape() {
            FieldShape::Dynamic => 0,
            FieldShape::Scalar => 1,
            FieldShape::Array(n) => n,
        }
    }

    /// Number of consecutive words this field touches.
    pub fn word_span(&self) -> u32 {
        if self.is_dynamic() {
            return 0;
        }
        (self.offset + self.total_bits).div_ceil(WORD_BITS)
    }

    /// Where element `index` starts.
    ///
    /// Elements narrower than a word tile it from the field's offset;
    /// wider elements occupy whole words.
    pub fn element_position(&self, index: u32) -> SlotCursor {
        if self.element_bits >= WORD_BITS {
            let words = self.element_bits / WORD_BITS;
            SlotCursor::new(self.slot + index * words, 0)
        } else {
            let bit = self.offset + index * self.element_bits;
            SlotCursor::new(self.slot + bit / WORD_BITS, bit % WORD_BITS)
        }
    }

    /// Every word-sized piece of this field, element by element.
    pub fn chunks(&self) -> Vec<Chunk> {
        let mut chunks = Vec::new();
        for element in 0..self.element_count() {
            let start = self.element_position(element);
            if self.element_bits > WORD_BITS {
                for part in 0..self.element_bits / WORD_BITS {
                    chunks.push(Chunk {
                        element,
                        part,
                        slot: start.slot + part,
                        offset: 0,
                        bits: WORD_BITS,
                    });
                }
            } else {
                chunks.push(Chunk {
                    element,
                    part: 0,
                    slot: start.slot,
                    offset: start.offset,
                    bits: self.element_bits,
                });
            }
        }
        chunks
    }
}

/// The fields occupying one storage word.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct StorageSlot {
    pub field_ids: Vec<u32>,
}

/// Final layout of an entity's packed storage.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct StorageLayout {
    slots: Vec<StorageSlot>,
    /// Fields in declaration order.
    fields: Vec<StorageField>,
    /// Field ids in packed order.
    packed_order: Vec<u32>,
    by_id: FxHashMap<u32, usize>,
}

impl StorageLayout {
    /// Plan the layout for a list of declarations.
    pub fn plan(entries: &[Entry]) -> Result<Self, SchemaError> {
        let mut fields = entries
            .iter()
            .map(StorageField::resolve)
            .collect::<Result<Vec<_>, _>>()?;

        // every field may waste at most one word to alignment
        let words: u64 = fields
            .iter()
            .map(|f| u64::from(f.total_bits.div_ceil(WORD_BITS)) + 1)
            .sum();
        if words > MAX_LAYOUT_WORDS {
            return Err(SchemaError::LayoutTooLarge { words });
        }

        let sorted = sort_for_packing(&fields);
        let bins = pack_bins(&fields, &sorted);
        let packed: Vec<usize> = bins.iter().flatten().copied().collect();
        let slots = place(&mut fields, &packed);

        tracing::debug!(
            fields = fields.len(),
            bins = bins.len(),
            slots = slots.len(),
            "planned storage layout",
        );

        let by_id = fields
            .iter()
            .enumerate()
            .map(|(i, f)| (f.id(), i))
            .collect();
        let packed_order = packed.iter().map(|&i| fields[i].id()).collect();

        Ok(Self {
            slots,
            fields,
            packed_order,
            by_id,
        })
    }

    pub fn slots(&self) -> &[StorageSlot] {
        &self.slots
    }

    #[inline]
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// All fields in declaration order.
    pub fn fields(&self) -> &[StorageField] {
        &self.fields
    }

    /// Fields stored in the packed words, in declaration order.
    pub fn fixed_fields(&self) -> impl Iterator<Item = &StorageField> {
        self.fields.iter().filter(|f| !f.is_dynamic())
    }

    /// Fields stored outside the packed words.
    pub fn dynamic_fields(&self) -> impl Iterator<Item = &StorageField> {
        self.fields.iter().filter(|f| f.is_dynamic())
    }

    /// Field ids in the order the packer emitted them.
    pub fn packed_order(&self) -> &[u32] {
        &self.packed_order
    }

    pub fn field(&self, id: u32) -> Option<&StorageField> {
        self.by_id.get(&id).map(|&i| &self.fields[i])
    }

    pub fn field_by_key(&self, key: &str) -> Option<&StorageField> {
        self.fields.iter().find(|f| f.key() == key)
    }

    /// Bits of `slot` used by fields that start in it and end in it.
    pub fn non_spanning_bits(&self, slot: usize) -> u32 {
        self.slots
            .get(slot)
            .map(|s| {
                s.field_ids
                    .iter()
                    .filter_map(|&id| self.field(id))
                    .filter(|f| f.word_span() == 1)
                    .map(|f| f.total_bits)
                    .sum()
            })
            .unwrap_or(0)
    }
}

// Phase 1: pack order

/// Indices of placeable fields in packing priority.
///
/// Scalars come first, widest first, with everything a word or wider
/// ranked equal. Fixed arrays follow in declaration order. The sort is
/// stable so ties keep declaration order.
fn sort_for_packing(fields: &[StorageField]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..fields.len())
        .filter(|&i| !fields[i].is_dynamic())
        .collect();
    order.sort_by_key(|&i| {
        let field = &fields[i];
        if field.is_array() {
            (true, Reverse(0))
        } else {
            (false, Reverse(field.total_bits.min(WORD_BITS)))
        }
    });
    order
}

/// Greedy first-fit-decreasing over `sorted`.
///
/// Each pass fills one bin from the fields not yet binned and hands the
/// rest to the next pass. An empty bin always accepts the first remaining
/// field, so every pass makes progress.
fn pack_bins(fields: &[StorageField], sorted: &[usize]) -> Vec<Vec<usize>> {
    let mut bins = Vec::new();
    let mut remaining = sorted.to_vec();

    while !remaining.is_empty() {
        let mut capacity = WORD_BITS;
        let mut bin = Vec::new();
        let mut rest = Vec::with_capacity(remaining.len());

        for idx in remaining {
            let bits = fields[idx].total_bits;
            if capacity == 0 {
                rest.push(idx);
            } else if bits <= capacity {
                bin.push(idx);
                capacity -= bits;
            } else if bits > WORD_BITS && bin.is_empty() {
                bin.push(idx);
                capacity = 0;
            } else {
                rest.push(idx);
            }
        }

        tracing::trace!(bin = bins.len(), fields = bin.len(), unused = capacity, "packed bin");
        bins.push(bin);
        remaining = rest;
    }

    bins
}

// Phase 2: placement

/// Assign `slot`/`offset` to every field in `packed` order and build the
/// per-slot occupancy lists.
fn place(fields: &mut [StorageField], packed: &[usize]) -> Vec<StorageSlot> {
    let mut slots: Vec<StorageSlot> = Vec::new();
    let mut cursor = SlotCursor::START;

    for &idx in packed {
        let field = &mut fields[idx];
        cursor = place_field(field, cursor, &mut slots);
    }

    slots
}

fn place_field(
    field: &mut StorageField,
    cursor: SlotCursor,
    slots: &mut Vec<StorageSlot>,
) -> SlotCursor {
    let start = cursor.align_for(field.total_bits, field.is_array());
    field.slot = start.slot;
    field.offset = start.offset;

    let first = start.slot as usize;
    let last = first + field.word_span() as usize - 1;
    if slots.len() <= last {
        slots.resize_with(last + 1, StorageSlot::default);
    }
    for slot in &mut slots[first..=last] {
        slot.field_ids.push(field.id());
    }

    start.advance(field.total_bits)
}
