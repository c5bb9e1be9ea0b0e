//! Bounded operand stack.

use stackvm_common::Word;

/// LIFO of words with a fixed capacity.
///
/// Operations report failure with `None`/`Err` and leave the stack
/// unchanged; the machine attaches the faulting offset.
#[derive(Debug, Clone)]
pub struct OperandStack {
    values: Vec<Word>,
    capacity: usize,
}

impl OperandStack {
    pub fn new(capacity: usize) -> Self {
        Self {
            values: Vec::new(),
            capacity,
        }
    }

    /// Push a value. Returns it back if the stack is full.
    pub fn push(&mut self, value: Word) -> Result<(), Word> {
        if self.values.len() >= self.capacity {
            return Err(value);
        }
        self.values.push(value);
        Ok(())
    }

    pub fn pop(&mut self) -> Option<Word> {
        self.values.pop()
    }

    /// Remove the top `n` values, returned bottom-first.
    ///
    /// Returns `None` and leaves the stack untouched if fewer than `n` are live.
    pub fn pop_n(&mut self, n: usize) -> Option<Vec<Word>> {
        let len = self.values.len();
        if n > len {
            return None;
        }
        Some(self.values.split_off(len - n))
    }

    /// The value `offset` slots below the top (`0` is the top itself).
    pub fn peek(&self, offset: usize) -> Option<Word> {
        let len = self.values.len();
        if offset >= len {
            return None;
        }
        Some(self.values[len - 1 - offset])
    }

    /// Swap the top with the value `offset` slots below it.
    pub fn swap_top(&mut self, offset: usize) -> Option<()> {
        let len = self.values.len();
        if offset >= len {
            return None;
        }
        self.values.swap(len - 1, len - 1 - offset);
        Some(())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Bottom-to-top view of the live values.
    pub fn as_slice(&self) -> &[Word] {
        &self.values
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_pop_is_lifo() {
        let mut stack = OperandStack::new(4);
        stack.push(1).unwrap();
        stack.push(2).unwrap();
        assert_eq!(stack.pop(), Some(2));
        assert_eq!(stack.pop(), Some(1));
        assert_eq!(stack.pop(), None);
    }

    #[test]
    fn push_beyond_capacity_fails() {
        let mut stack = OperandStack::new(2);
        stack.push(1).unwrap();
        stack.push(2).unwrap();
        assert_eq!(stack.push(3), Err(3));
        assert_eq!(stack.len(), 2);
    }

    #[test]
    fn zero_capacity_rejects_everything() {
        let mut stack = OperandStack::new(0);
        assert_eq!(stack.push(7), Err(7));
        assert!(stack.is_empty());
    }

    #[test]
    fn pop_n_returns_values_in_push_order() {
        let mut stack = OperandStack::new(8);
        for v in [1, 2, 3, 4] {
            stack.push(v).unwrap();
        }
        assert_eq!(stack.pop_n(3), Some(vec![2, 3, 4]));
        assert_eq!(stack.as_slice(), &[1]);
        assert_eq!(stack.pop_n(2), None);
        assert_eq!(stack.len(), 1);
        assert_eq!(stack.pop_n(0), Some(vec![]));
    }

    #[test]
    fn peek_offsets() {
        let mut stack = OperandStack::new(4);
        for v in [10, 20, 30] {
            stack.push(v).unwrap();
        }
        assert_eq!(stack.peek(0), Some(30));
        assert_eq!(stack.peek(2), Some(10));
        assert_eq!(stack.peek(3), None);
    }

    #[test]
    fn swap_top_with_offset() {
        let mut stack = OperandStack::new(4);
        for v in [10, 20, 30] {
            stack.push(v).unwrap();
        }
        assert_eq!(stack.swap_top(2), Some(()));
        assert_eq!(stack.as_slice(), &[30, 20, 10]);
        assert_eq!(stack.swap_top(3), None);
    }
}
