//! Call-frame stack for CALL/RET.

/// A call frame for function invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallFrame {
    /// Offset to resume at after RET.
    pub return_ip: usize,
    /// Environment high-water mark to restore on RET.
    pub saved_env_size: usize,
}

/// Bounded LIFO of call frames. Its depth is the call nesting depth.
#[derive(Debug, Clone)]
pub struct CallStack {
    frames: Vec<CallFrame>,
    capacity: usize,
}

impl CallStack {
    pub fn new(capacity: usize) -> Self {
        Self {
            frames: Vec::new(),
            capacity,
        }
    }

    /// Push a frame. Returns it back if the stack is full.
    pub fn push(&mut self, frame: CallFrame) -> Result<(), CallFrame> {
        if self.frames.len() >= self.capacity {
            return Err(frame);
        }
        self.frames.push(frame);
        Ok(())
    }

    pub fn pop(&mut self) -> Option<CallFrame> {
        self.frames.pop()
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(return_ip: usize, saved_env_size: usize) -> CallFrame {
        CallFrame {
            return_ip,
            saved_env_size,
        }
    }

    #[test]
    fn depth_tracks_push_and_pop() {
        let mut calls = CallStack::new(4);
        calls.push(frame(10, 0)).unwrap();
        calls.push(frame(20, 1)).unwrap();
        assert_eq!(calls.depth(), 2);
        assert_eq!(calls.pop(), Some(frame(20, 1)));
        assert_eq!(calls.depth(), 1);
    }

    #[test]
    fn overflow_and_underflow() {
        let mut calls = CallStack::new(1);
        calls.push(frame(1, 0)).unwrap();
        assert_eq!(calls.push(frame(2, 0)), Err(frame(2, 0)));
        calls.pop().unwrap();
        assert_eq!(calls.pop(), None);
    }
}
