//! Append-only arena of fixed-size integer arrays.
//!
//! Arrays are addressed by their position in creation order. Nothing is freed
//! individually; the whole arena drops with the machine at the end of a run.

use stackvm_common::Word;

/// A heap array. Its length is fixed at creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Array {
    data: Box<[Word]>,
}

impl Array {
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_slice(&self) -> &[Word] {
        &self.data
    }
}

/// Why an array access failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessError {
    /// The id names no array.
    InvalidId,
    /// The index is outside `[0, length)`.
    OutOfBounds { length: usize },
}

#[derive(Debug, Clone)]
pub struct Heap {
    arrays: Vec<Array>,
    capacity: usize,
}

impl Heap {
    pub fn new(capacity: usize) -> Self {
        Self {
            arrays: Vec::new(),
            capacity,
        }
    }

    pub fn is_full(&self) -> bool {
        self.arrays.len() >= self.capacity
    }

    /// Append a new array built from `data` and return its id.
    ///
    /// Returns `None` when the heap is at capacity.
    pub fn alloc(&mut self, data: Vec<Word>) -> Option<usize> {
        if self.is_full() {
            return None;
        }
        let id = self.arrays.len();
        self.arrays.push(Array {
            data: data.into_boxed_slice(),
        });
        Some(id)
    }

    pub fn load(&self, id: Word, index: Word) -> Result<Word, AccessError> {
        let array = self.array(id)?;
        let slot = Self::slot(array.len(), index)?;
        Ok(array.data[slot])
    }

    pub fn store(&mut self, id: Word, index: Word, value: Word) -> Result<(), AccessError> {
        let id = usize::try_from(id).map_err(|_| AccessError::InvalidId)?;
        let array = self.arrays.get_mut(id).ok_or(AccessError::InvalidId)?;
        let slot = Self::slot(array.data.len(), index)?;
        array.data[slot] = value;
        Ok(())
    }

    /// Look up an array by id.
    pub fn array(&self, id: Word) -> Result<&Array, AccessError> {
        usize::try_from(id)
            .ok()
            .and_then(|id| self.arrays.get(id))
            .ok_or(AccessError::InvalidId)
    }

    /// Number of arrays created so far.
    pub fn len(&self) -> usize {
        self.arrays.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arrays.is_empty()
    }

    fn slot(length: usize, index: Word) -> Result<usize, AccessError> {
        usize::try_from(index)
            .ok()
            .filter(|&i| i < length)
            .ok_or(AccessError::OutOfBounds { length })
    }
}
