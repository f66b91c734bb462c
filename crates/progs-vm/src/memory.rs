//! Flat register memory: globals and entity fields
//!
//! One contiguous arena of words. Offsets below `entity_base` are the global
//! register file; above it sit `entity_count` blocks of `entity_fields`
//! words each, so an entity field resolves to a plain flat offset and
//! pointer opcodes can reach either region through the same address space.
//!
//! All access goes through checked accessors; an offset outside the arena is
//! a fault, never undefined behavior. The entity/field policy checks are
//! separate and only applied where the bounds-checking policy demands them —
//! the indexed load/store opcodes deliberately skip them.

use crate::error::VmError;
use crate::value::Word;

#[derive(Debug, Clone)]
pub struct Memory {
    words: Vec<Word>,
    entity_base: usize,
    entity_fields: usize,
    entity_count: usize,
}

impl Memory {
    /// Lay out the arena: initial globals followed by zeroed entity blocks
    pub fn new(globals: &[u32], entity_fields: usize, entity_count: usize) -> Self {
        let entity_base = globals.len();
        let mut words = Vec::with_capacity(entity_base + entity_fields * entity_count);
        words.extend(globals.iter().copied().map(Word::from_raw));
        words.resize(entity_base + entity_fields * entity_count, Word::ZERO);
        Memory {
            words,
            entity_base,
            entity_fields,
            entity_count,
        }
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// First flat offset of the entity area
    pub fn entity_base(&self) -> usize {
        self.entity_base
    }

    pub fn entity_count(&self) -> usize {
        self.entity_count
    }

    pub fn entity_fields(&self) -> usize {
        self.entity_fields
    }

    #[inline]
    pub fn word(&self, ofs: usize) -> Result<Word, VmError> {
        self.words
            .get(ofs)
            .copied()
            .ok_or(VmError::OutOfBoundsPointer(ofs))
    }

    #[inline]
    pub fn set_word(&mut self, ofs: usize, w: Word) -> Result<(), VmError> {
        match self.words.get_mut(ofs) {
            Some(slot) => {
                *slot = w;
                Ok(())
            }
            None => Err(VmError::OutOfBoundsPointer(ofs)),
        }
    }

    fn span(&self, ofs: usize, count: usize) -> Result<&[Word], VmError> {
        ofs.checked_add(count)
            .and_then(|end| self.words.get(ofs..end))
            .ok_or(VmError::OutOfBoundsPointer(ofs))
    }

    fn span_mut(&mut self, ofs: usize, count: usize) -> Result<&mut [Word], VmError> {
        ofs.checked_add(count)
            .and_then(move |end| self.words.get_mut(ofs..end))
            .ok_or(VmError::OutOfBoundsPointer(ofs))
    }

    pub fn vec3(&self, ofs: usize) -> Result<[f32; 3], VmError> {
        let s = self.span(ofs, 3)?;
        Ok([s[0].as_f32(), s[1].as_f32(), s[2].as_f32()])
    }

    pub fn set_vec3(&mut self, ofs: usize, v: [f32; 3]) -> Result<(), VmError> {
        let s = self.span_mut(ofs, 3)?;
        for (slot, component) in s.iter_mut().zip(v) {
            *slot = Word::from_f32(component);
        }
        Ok(())
    }

    pub fn quat(&self, ofs: usize) -> Result<[f32; 4], VmError> {
        let s = self.span(ofs, 4)?;
        Ok([s[0].as_f32(), s[1].as_f32(), s[2].as_f32(), s[3].as_f32()])
    }

    pub fn set_quat(&mut self, ofs: usize, q: [f32; 4]) -> Result<(), VmError> {
        let s = self.span_mut(ofs, 4)?;
        for (slot, component) in s.iter_mut().zip(q) {
            *slot = Word::from_f32(component);
        }
        Ok(())
    }

    /// Copy out a contiguous window (locals spill)
    pub fn read_span(&self, ofs: usize, count: usize) -> Result<Vec<Word>, VmError> {
        Ok(self.span(ofs, count)?.to_vec())
    }

    /// Write back a contiguous window (locals restore)
    pub fn write_span(&mut self, ofs: usize, words: &[Word]) -> Result<(), VmError> {
        self.span_mut(ofs, words.len())?.copy_from_slice(words);
        Ok(())
    }

    /// Fill a contiguous window with one word
    pub fn fill_span(&mut self, ofs: usize, count: usize, w: Word) -> Result<(), VmError> {
        self.span_mut(ofs, count)?.fill(w);
        Ok(())
    }

    /// Raw word-group copy, atomic with respect to the group
    pub fn copy_span(&mut self, src: usize, dst: usize, count: usize) -> Result<(), VmError> {
        if src == dst || count == 0 {
            // still validate the ranges
            self.span(src, count)?;
            self.span(dst, count)?;
            return Ok(());
        }
        self.span(src, count)?;
        self.span_mut(dst, count)?;
        // overlap-safe, memmove semantics
        self.words.copy_within(src..src + count, dst);
        Ok(())
    }

    /// Flat offset of `field` within `entity`'s block. Callers gate this
    /// behind the entity checks when the bounds policy is on; with the
    /// policy off a bogus entity wraps to a bogus offset that the checked
    /// accessors reject.
    #[inline]
    pub fn entity_offset(&self, entity: i32, field: u32) -> usize {
        (entity as usize)
            .wrapping_mul(self.entity_fields)
            .wrapping_add(self.entity_base)
            .wrapping_add(field as usize)
    }

    /// Bounds-policy validation of an entity index
    pub fn check_entity_index(&self, entity: i32) -> Result<(), VmError> {
        if entity < 0 || entity as usize >= self.entity_count {
            return Err(VmError::OutOfBoundsEntity(entity));
        }
        Ok(())
    }

    /// Bounds-policy validation of a field access; `span` is the word width
    /// of the access (1, 3, or 4).
    pub fn check_field(&self, field: u32, span: usize) -> Result<(), VmError> {
        if field as usize + span > self.entity_fields {
            return Err(VmError::InvalidField(field));
        }
        Ok(())
    }

    /// Combined entity/field validation, entity index first
    pub fn check_entity(&self, entity: i32, field: u32, span: usize) -> Result<(), VmError> {
        self.check_entity_index(entity)?;
        self.check_field(field, span)
    }
}
