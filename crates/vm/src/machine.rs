//! VM state management: the four mutable components plus the instruction pointer.

use crate::config::Config;
use crate::env::Environment;
use crate::error::RuntimeError;
use crate::frames::CallStack;
use crate::heap::Heap;
use crate::stack::OperandStack;
use stackvm_common::{Program, Word};

/// The stackvm virtual machine.
///
/// One `VM` is one execution. It owns its stack, environment, heap and call
/// frames exclusively; nothing is shared with other instances, so running the
/// same program on a fresh `VM` always gives the same outcome.
pub struct VM<'a> {
    /// The program being executed.
    pub(crate) program: &'a Program,
    pub(crate) config: Config,
    pub(crate) stack: OperandStack,
    pub(crate) env: Environment,
    pub(crate) heap: Heap,
    pub(crate) calls: CallStack,
    /// Offset of the next instruction to decode.
    pub(crate) ip: usize,
    /// Offset of the instruction currently executing. Reported in errors.
    pub(crate) at: usize,
}

impl<'a> VM<'a> {
    /// Create a VM with the default configuration.
    pub fn new(program: &'a Program) -> Self {
        Self::with_config(program, Config::default())
    }

    /// Create a VM with explicit limits and halt policy.
    pub fn with_config(program: &'a Program, config: Config) -> Self {
        let limits = config.limits;
        Self {
            program,
            config,
            stack: OperandStack::new(limits.stack_size),
            env: Environment::new(limits.env_size),
            heap: Heap::new(limits.heap_size),
            calls: CallStack::new(limits.call_depth),
            ip: 0,
            at: 0,
        }
    }

    /// Offset of the next instruction to execute.
    pub fn ip(&self) -> usize {
        self.ip
    }

    pub fn stack(&self) -> &OperandStack {
        &self.stack
    }

    pub fn env(&self) -> &Environment {
        &self.env
    }

    pub fn heap(&self) -> &Heap {
        &self.heap
    }

    /// Current call nesting depth.
    pub fn call_depth(&self) -> usize {
        self.calls.depth()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Push a value onto the stack, checking for overflow.
    pub(crate) fn push(&mut self, value: Word) -> Result<(), RuntimeError> {
        self.stack
            .push(value)
            .map_err(|_| RuntimeError::StackOverflow { at: self.at })
    }

    /// Pop a value from the stack.
    pub(crate) fn pop(&mut self) -> Result<Word, RuntimeError> {
        self.stack
            .pop()
            .ok_or(RuntimeError::StackUnderflow { at: self.at })
    }

    pub(crate) fn underflow(&self) -> RuntimeError {
        RuntimeError::StackUnderflow { at: self.at }
    }

    pub(crate) fn env_out_of_bounds(&self, index: usize) -> RuntimeError {
        RuntimeError::EnvironmentIndexOutOfBounds {
            at: self.at,
            index,
            capacity: self.env.capacity(),
        }
    }
}
