//! Flat variable environment with a live high-water mark.
//!
//! Slots are reused across call frames without clearing. `env_size` marks the
//! live region of the current frame; slots above it still hold whatever an
//! enclosing or earlier frame left there, and LOAD may read them. Only the
//! configured capacity is checked. Backing storage grows on write; slots never
//! written read as zero.

use stackvm_common::Word;

#[derive(Debug, Clone)]
pub struct Environment {
    slots: Vec<Word>,
    capacity: usize,
    env_size: usize,
}

impl Environment {
    /// Create an environment of `capacity` zeroed slots.
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: Vec::new(),
            capacity,
            env_size: 0,
        }
    }

    /// Read a slot. `None` only when `index` is beyond capacity.
    pub fn get(&self, index: usize) -> Option<Word> {
        if index >= self.capacity {
            return None;
        }
        Some(self.slots.get(index).copied().unwrap_or(0))
    }

    /// Write a slot, raising the high-water mark to cover it.
    pub fn set(&mut self, index: usize, value: Word) -> Option<()> {
        if index >= self.capacity {
            return None;
        }
        self.grow_to(index + 1);
        self.slots[index] = value;
        if index >= self.env_size {
            self.env_size = index + 1;
        }
        Some(())
    }

    /// Current high-water mark.
    pub fn env_size(&self) -> usize {
        self.env_size
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// True if `count` more slots fit above the high-water mark.
    pub fn has_room(&self, count: usize) -> bool {
        self.env_size
            .checked_add(count)
            .is_some_and(|end| end <= self.capacity)
    }

    /// Claim `count` slots above the mark and fill them from `args`.
    ///
    /// `args[0]` lands in the lowest new slot. `None` if they do not fit.
    pub fn bind(&mut self, args: &[Word]) -> Option<()> {
        let base = self.env_size;
        let end = base.checked_add(args.len())?;
        if end > self.capacity {
            return None;
        }
        self.grow_to(end);
        self.slots[base..end].copy_from_slice(args);
        self.env_size = end;
        Some(())
    }

    /// Reset the high-water mark, leaving slot contents in place.
    pub fn restore(&mut self, env_size: usize) {
        self.env_size = env_size;
    }

    fn grow_to(&mut self, len: usize) {
        if self.slots.len() < len {
            self.slots.resize(len, 0);
        }
    }
}
