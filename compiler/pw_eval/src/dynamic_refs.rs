//! Growable reference store.
//!
//! References live in a list of words, four 64-bit sub-slots per word,
//! filled from sub-slot 0 upwards. Only the last word can be partially
//! filled. A side index maps each reference to the word holding it, which
//! keeps `remove` constant time: the last reference is moved into the
//! removed one's sub-slot.

use alloy_primitives::U256;
use pw_schema::RuntimeError;
use rustc_hash::FxHashMap;

use crate::error::EvalError;
use crate::word::{filled_sub_slots, sub_slot, with_sub_slot, REFS_PER_WORD};

/// Per-entity growable reference list with its side index.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DynamicRefs {
    words: Vec<U256>,
    index: FxHashMap<u64, usize>,
}

impl DynamicRefs {
    pub fn new() -> Self {
        Self::default()
    }

    /// The backing words.
    pub fn words(&self) -> &[U256] {
        &self.words
    }

    /// Word holding `reference` according to the side index.
    pub fn word_of(&self, reference: u64) -> Option<usize> {
        self.index.get(&reference).copied()
    }

    /// Number of stored references.
    pub fn count(&self) -> usize {
        match self.words.last() {
            None => 0,
            Some(&last) => (self.words.len() - 1) * REFS_PER_WORD + filled_sub_slots(last),
        }
    }

    /// Append `reference`.
    ///
    /// Zero marks an empty sub-slot and is rejected. Duplicates are not;
    /// the caller owns uniqueness.
    pub fn add(&mut self, reference: u64) -> Result<(), EvalError> {
        if reference == 0 {
            return Err(RuntimeError::NoReference.into());
        }
        let open = self
            .words
            .last()
            .map(|&last| filled_sub_slots(last))
            .filter(|&filled| filled < REFS_PER_WORD);

        match open {
            Some(position) => {
                let last = self.words.len() - 1;
                self.words[last] = with_sub_slot(self.words[last], position, reference);
                self.index.insert(reference, last);
            }
            None => {
                self.words.push(with_sub_slot(U256::ZERO, 0, reference));
                self.index.insert(reference, self.words.len() - 1);
            }
        }
        tracing::trace!(reference, count = self.count(), "dynamic reference added");
        Ok(())
    }

    /// Fill an empty store, four references per word.
    pub fn add_batch(&mut self, references: &[u64]) -> Result<(), EvalError> {
        if !self.words.is_empty() {
            return Err(RuntimeError::AlreadyHaveReferences.into());
        }
        if references.contains(&0) {
            return Err(RuntimeError::NoReference.into());
        }
        for group in references.chunks(REFS_PER_WORD) {
            let word_index = self.words.len();
            let mut word = U256::ZERO;
            for (position, &reference) in group.iter().enumerate() {
                word = with_sub_slot(word, position, reference);
                self.index.insert(reference, word_index);
            }
            self.words.push(word);
        }
        Ok(())
    }

    /// Remove `reference`, moving the last reference into its place.
    pub fn remove(&mut self, reference: u64) -> Result<(), EvalError> {
        let count = self.count();
        if count == 0 || reference == 0 {
            return Err(RuntimeError::NoReference.into());
        }
        let last_word = (count - 1) / REFS_PER_WORD;
        let last_position = (count - 1) % REFS_PER_WORD;
        let last_reference = sub_slot(self.words[last_word], last_position);

        if reference != last_reference {
            let word_index = self
                .index
                .get(&reference)
                .copied()
                .ok_or(RuntimeError::NoReference)?;
            let word = self
                .words
                .get(word_index)
                .copied()
                .ok_or(RuntimeError::StorageIntegrityError)?;
            let position = (0..REFS_PER_WORD)
                .find(|&i| sub_slot(word, i) == reference)
                .ok_or(RuntimeError::StorageIntegrityError)?;

            self.words[word_index] = with_sub_slot(word, position, last_reference);
            self.index.insert(last_reference, word_index);
        }

        if last_position == 0 {
            self.words.pop();
        } else {
            self.words[last_word] = with_sub_slot(self.words[last_word], last_position, 0);
        }
        self.index.remove(&reference);
        tracing::trace!(reference, count = self.count(), "dynamic reference removed");
        Ok(())
    }

    /// Reference at logical position `index`.
    pub fn load_at(&self, index: usize) -> Result<u64, EvalError> {
        if index >= self.count() {
            return Err(RuntimeError::NoReference.into());
        }
        Ok(sub_slot(self.words[index / REFS_PER_WORD], index % REFS_PER_WORD))
    }

    /// Up to `count` references starting at `offset`; short or empty past
    /// the end.
    pub fn load_page(&self, offset: usize, count: usize) -> Vec<u64> {
        let available = self.count().saturating_sub(offset);
        (offset..offset + count.min(available))
            .map(|i| sub_slot(self.words[i / REFS_PER_WORD], i % REFS_PER_WORD))
            .collect()
    }

    /// Every stored reference in logical order.
    pub fn references(&self) -> Vec<u64> {
        self.load_page(0, self.count())
    }
}
