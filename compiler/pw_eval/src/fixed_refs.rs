//! Fixed-capacity reference store.
//!
//! The reference field's elements are 64-bit sub-slots inside the packed
//! words, zero meaning empty. Nothing is ever compacted: `remove` clears a
//! sub-slot in place and the next `add` reuses the first hole.

use alloy_primitives::U256;
use pw_schema::{RuntimeError, StorageField};

use crate::error::EvalError;
use crate::word::{extract, insert};

/// Reference operations over the packed words of one entity.
pub struct FixedRefs<'a> {
    words: &'a mut [U256],
    field: &'a StorageField,
}

impl<'a> FixedRefs<'a> {
    pub(crate) fn new(words: &'a mut [U256], field: &'a StorageField) -> Self {
        Self { words, field }
    }

    /// Number of sub-slots.
    #[inline]
    pub fn capacity(&self) -> u32 {
        self.field.element_count()
    }

    fn read(&self, index: u32) -> u64 {
        let at = self.field.element_position(index);
        extract(self.words[at.slot as usize], at.offset, self.field.element_bits).as_limbs()[0]
    }

    fn write(&mut self, index: u32, reference: u64) {
        let at = self.field.element_position(index);
        let word = &mut self.words[at.slot as usize];
        *word = insert(*word, at.offset, self.field.element_bits, U256::from(reference));
    }

    /// Store `reference` in the first empty sub-slot and return its index.
    pub fn add(&mut self, reference: u64) -> Result<u32, EvalError> {
        if reference == 0 {
            return Err(RuntimeError::NoReference.into());
        }
        let free = (0..self.capacity())
            .find(|&i| self.read(i) == 0)
            .ok_or(RuntimeError::NoReferenceSlotsAvailable)?;
        self.write(free, reference);
        tracing::trace!(reference, index = free, "fixed reference added");
        Ok(free)
    }

    /// Fill the store from sub-slot 0. The store must be empty.
    pub fn add_batch(&mut self, references: &[u64]) -> Result<(), EvalError> {
        if (0..self.capacity()).any(|i| self.read(i) != 0) {
            return Err(RuntimeError::AlreadyHaveReferences.into());
        }
        if references.len() > self.capacity() as usize {
            return Err(RuntimeError::TooManyReferences.into());
        }
        if references.contains(&0) {
            return Err(RuntimeError::NoReference.into());
        }
        for (i, &reference) in (0u32..).zip(references) {
            self.write(i, reference);
        }
        Ok(())
    }

    /// Clear the first sub-slot holding `reference`.
    pub fn remove(&mut self, reference: u64) -> Result<(), EvalError> {
        if reference == 0 {
            return Err(RuntimeError::NoReference.into());
        }
        let index = (0..self.capacity())
            .find(|&i| self.read(i) == reference)
            .ok_or(RuntimeError::NoReference)?;
        self.write(index, 0);
        tracing::trace!(reference, index, "fixed reference removed");
        Ok(())
    }

    /// The raw sub-slot `index`, zero when empty.
    pub fn load_at(&self, index: u32) -> Result<u64, EvalError> {
        if index >= self.capacity() {
            return Err(RuntimeError::NoReference.into());
        }
        Ok(self.read(index))
    }

    /// Non-empty references in sub-slot order.
    pub fn references(&self) -> Vec<u64> {
        (0..self.capacity())
            .map(|i| self.read(i))
            .filter(|&r| r != 0)
            .collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
