//! Engine configuration: component capacities and the halt policy.

/// Default operand stack capacity.
pub const DEFAULT_STACK_SIZE: usize = 1024;

/// Default environment capacity in slots.
pub const DEFAULT_ENV_SIZE: usize = 1024;

/// Default number of arrays the heap may hold.
pub const DEFAULT_HEAP_SIZE: usize = 256;

/// Default maximum call nesting depth.
pub const DEFAULT_CALL_DEPTH: usize = 256;

/// Capacity bounds for the four mutable components.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    /// Operand stack capacity.
    pub stack_size: usize,
    /// Environment capacity.
    pub env_size: usize,
    /// Maximum number of heap arrays.
    pub heap_size: usize,
    /// Maximum call-frame stack depth.
    pub call_depth: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            stack_size: DEFAULT_STACK_SIZE,
            env_size: DEFAULT_ENV_SIZE,
            heap_size: DEFAULT_HEAP_SIZE,
            call_depth: DEFAULT_CALL_DEPTH,
        }
    }
}

/// What HALT checks before returning the top of stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HaltPolicy {
    /// Return whatever is on top. Leftover values and open calls are ignored.
    #[default]
    Permissive,
    /// Require exactly one stack value and no open calls.
    Strict,
}

/// Full engine configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Config {
    pub limits: Limits,
    pub halt: HaltPolicy,
}

impl Config {
    pub fn with_stack_size(mut self, size: usize) -> Self {
        self.limits.stack_size = size;
        self
    }

    pub fn with_env_size(mut self, size: usize) -> Self {
        self.limits.env_size = size;
        self
    }

    pub fn with_heap_size(mut self, size: usize) -> Self {
        self.limits.heap_size = size;
        self
    }

    pub fn with_call_depth(mut self, depth: usize) -> Self {
        self.limits.call_depth = depth;
        self
    }

    pub fn with_halt_policy(mut self, halt: HaltPolicy) -> Self {
        self.halt = halt;
        self
    }
}
