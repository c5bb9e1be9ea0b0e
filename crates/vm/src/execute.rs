//! Main execution loop and opcode dispatch.

use crate::config::HaltPolicy;
use crate::error::RuntimeError;
use crate::frames::CallFrame;
use crate::heap::AccessError;
use crate::machine::VM;
use stackvm_common::{Instruction, Opcode, Word};
use tracing::{debug, trace};

/// Where control goes after one instruction.
enum Flow {
    /// Fall through to the following instruction.
    Next,
    /// Continue at an explicit offset.
    Jump(usize),
    /// Stop with the program result.
    Halt(Word),
}

/// Outcome of a single [`VM::step`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// The instruction completed; `ip` names the next one.
    Continue,
    /// HALT was reached with this result.
    Halted(Word),
}

impl<'a> VM<'a> {
    /// Execute the program until HALT or error.
    pub fn execute(&mut self) -> Result<Word, RuntimeError> {
        let _span = tracing::debug_span!("execute", program_len = self.program.len()).entered();

        loop {
            match self.step() {
                Ok(Step::Continue) => {}
                Ok(Step::Halted(value)) => {
                    debug!(
                        ip = self.ip,
                        result = value,
                        stack_depth = self.stack.len(),
                        call_depth = self.calls.depth(),
                        arrays = self.heap.len(),
                        "halted"
                    );
                    return Ok(value);
                }
                Err(err) => {
                    debug!(error = %err, "execution failed");
                    return Err(err);
                }
            }
        }
    }

    /// Fetch, decode and execute one instruction.
    pub fn step(&mut self) -> Result<Step, RuntimeError> {
        self.at = self.ip;
        let instr = self.program.decode_at(self.ip)?;
        trace!(
            ip = self.ip,
            op = instr.opcode.mnemonic(),
            operand = instr.operand,
            depth = self.stack.len(),
            "dispatch"
        );

        match self.dispatch(&instr)? {
            Flow::Next => self.ip += instr.encoded_len(),
            Flow::Jump(target) => self.ip = target,
            Flow::Halt(value) => return Ok(Step::Halted(value)),
        }
        Ok(Step::Continue)
    }

    fn dispatch(&mut self, instr: &Instruction) -> Result<Flow, RuntimeError> {
        match instr.opcode {
            Opcode::Halt => self.exec_halt(),
            Opcode::Nop => Ok(Flow::Next),

            // Stack
            Opcode::Push => {
                self.push(instr.operand as Word)?;
                Ok(Flow::Next)
            }
            Opcode::Pop => {
                self.pop()?;
                Ok(Flow::Next)
            }
            Opcode::Dup => self.exec_dup(instr.operand as usize),
            Opcode::SwapDup => self.exec_swap_dup(instr.operand as usize),

            // Arithmetic
            Opcode::Add => self.exec_binary(Word::wrapping_add),
            Opcode::Sub => self.exec_binary(Word::wrapping_sub),
            Opcode::Mul => self.exec_binary(Word::wrapping_mul),
            Opcode::Div => self.exec_div(),
            Opcode::Mod => self.exec_mod(),
            Opcode::Neg => {
                let value = self.pop()?;
                self.push(value.wrapping_neg())?;
                Ok(Flow::Next)
            }

            // Comparison
            Opcode::Eq => self.exec_comparison(|l, r| l == r),
            Opcode::Lt => self.exec_comparison(|l, r| l < r),
            Opcode::Gt => self.exec_comparison(|l, r| l > r),
            Opcode::Le => self.exec_comparison(|l, r| l <= r),
            Opcode::Ge => self.exec_comparison(|l, r| l >= r),

            // Control flow
            Opcode::Jmp => Ok(Flow::Jump(instr.operand as usize)),
            Opcode::Jmpf => self.exec_branch(instr.operand as usize, false),
            Opcode::Jmpt => self.exec_branch(instr.operand as usize, true),

            // Environment
            Opcode::Load => self.exec_load(instr.operand as usize),
            Opcode::Store => self.exec_store(instr.operand as usize),

            // Functions
            Opcode::Call => self.exec_call(self.at + instr.encoded_len()),
            Opcode::Ret => self.exec_ret(),

            // Arrays
            Opcode::Array => self.exec_array(),
            Opcode::Aload => self.exec_aload(),
            Opcode::Astore => self.exec_astore(),
        }
    }

    // ---- Stack ----

    fn exec_halt(&self) -> Result<Flow, RuntimeError> {
        if self.config.halt == HaltPolicy::Strict
            && (self.stack.len() != 1 || self.calls.depth() != 0)
        {
            return Err(RuntimeError::UnbalancedHalt {
                at: self.at,
                stack_depth: self.stack.len(),
                call_depth: self.calls.depth(),
            });
        }

        let value = self.stack.peek(0).ok_or_else(|| self.underflow())?;
        Ok(Flow::Halt(value))
    }

    fn exec_dup(&mut self, offset: usize) -> Result<Flow, RuntimeError> {
        let value = self.stack.peek(offset).ok_or_else(|| self.underflow())?;
        self.push(value)?;
        Ok(Flow::Next)
    }

    fn exec_swap_dup(&mut self, offset: usize) -> Result<Flow, RuntimeError> {
        self.stack
            .swap_top(offset)
            .ok_or_else(|| self.underflow())?;
        let top = self.stack.peek(0).ok_or_else(|| self.underflow())?;
        self.push(top)?;
        Ok(Flow::Next)
    }

    // ---- Arithmetic and comparison ----

    /// Binary operator: pop right operand first, then left, push `op(l, r)`.
    fn exec_binary(&mut self, op: fn(Word, Word) -> Word) -> Result<Flow, RuntimeError> {
        let r = self.pop()?;
        let l = self.pop()?;
        self.push(op(l, r))?;
        Ok(Flow::Next)
    }

    fn exec_div(&mut self) -> Result<Flow, RuntimeError> {
        let r = self.pop()?;
        let l = self.pop()?;
        if r == 0 {
            return Err(RuntimeError::DivisionByZero { at: self.at });
        }
        self.push(l.wrapping_div(r))?;
        Ok(Flow::Next)
    }

    fn exec_mod(&mut self) -> Result<Flow, RuntimeError> {
        let r = self.pop()?;
        let l = self.pop()?;
        if r == 0 {
            return Err(RuntimeError::ModuloByZero { at: self.at });
        }
        self.push(l.wrapping_rem(r))?;
        Ok(Flow::Next)
    }

    fn exec_comparison(&mut self, op: fn(Word, Word) -> bool) -> Result<Flow, RuntimeError> {
        let r = self.pop()?;
        let l = self.pop()?;
        self.push(op(l, r) as Word)?;
        Ok(Flow::Next)
    }

    // ---- Control flow ----

    /// Pop a condition and jump when its truthiness equals `jump_if`.
    fn exec_branch(&mut self, target: usize, jump_if: bool) -> Result<Flow, RuntimeError> {
        let condition = self.pop()?;
        if (condition != 0) == jump_if {
            Ok(Flow::Jump(target))
        } else {
            Ok(Flow::Next)
        }
    }

    // ---- Environment ----

    fn exec_load(&mut self, index: usize) -> Result<Flow, RuntimeError> {
        // Slots above env_size are readable: they hold the last value any
        // frame wrote there.
        let value = self
            .env
            .get(index)
            .ok_or_else(|| self.env_out_of_bounds(index))?;
        self.push(value)?;
        Ok(Flow::Next)
    }

    fn exec_store(&mut self, index: usize) -> Result<Flow, RuntimeError> {
        let value = self.pop()?;
        self.env
            .set(index, value)
            .ok_or_else(|| self.env_out_of_bounds(index))?;
        Ok(Flow::Next)
    }

    // ---- Functions ----

    fn exec_call(&mut self, return_ip: usize) -> Result<Flow, RuntimeError> {
        let address = self.pop()?;
        let num_args = self.pop()?;
        let at = self.at;
        let invalid = || RuntimeError::InvalidCallTarget {
            at,
            address,
            num_args,
        };

        let (Ok(target), Ok(count)) = (usize::try_from(address), usize::try_from(num_args)) else {
            return Err(invalid());
        };
        if !self.env.has_room(count) {
            return Err(invalid());
        }

        let saved_env_size = self.env.env_size();
        self.calls
            .push(CallFrame {
                return_ip,
                saved_env_size,
            })
            .map_err(|_| RuntimeError::CallStackOverflow { at })?;

        // Deepest argument first: the last one popped lands in the lowest slot.
        let args = self.stack.pop_n(count).ok_or_else(|| self.underflow())?;
        self.env.bind(&args).ok_or_else(invalid)?;

        debug!(
            at,
            target,
            num_args = count,
            depth = self.calls.depth(),
            "call"
        );
        Ok(Flow::Jump(target))
    }

    fn exec_ret(&mut self) -> Result<Flow, RuntimeError> {
        let value = self.pop()?;
        let frame = self
            .calls
            .pop()
            .ok_or(RuntimeError::CallStackUnderflow { at: self.at })?;

        self.env.restore(frame.saved_env_size);
        self.push(value)?;

        debug!(
            at = self.at,
            return_ip = frame.return_ip,
            value,
            depth = self.calls.depth(),
            "return"
        );
        Ok(Flow::Jump(frame.return_ip))
    }

    // ---- Arrays ----

    fn exec_array(&mut self) -> Result<Flow, RuntimeError> {
        let size = self.pop()?;
        if size <= 0 {
            return Err(RuntimeError::InvalidArraySize { at: self.at, size });
        }
        let exhausted = RuntimeError::HeapExhausted {
            at: self.at,
            capacity: self.config.limits.heap_size,
        };
        if self.heap.is_full() {
            return Err(exhausted);
        }

        // Values were pushed in ascending index order.
        let data = self
            .stack
            .pop_n(size as usize)
            .ok_or_else(|| self.underflow())?;
        let id = self.heap.alloc(data).ok_or_else(|| exhausted.clone())?;
        let id = Word::try_from(id).map_err(|_| exhausted)?;

        debug!(at = self.at, id, size, "array");
        self.push(id)?;
        Ok(Flow::Next)
    }

    fn exec_aload(&mut self) -> Result<Flow, RuntimeError> {
        let index = self.pop()?;
        let id = self.pop()?;
        let value = self
            .heap
            .load(id, index)
            .map_err(|e| self.access_error(e, id, index))?;
        self.push(value)?;
        Ok(Flow::Next)
    }

    fn exec_astore(&mut self) -> Result<Flow, RuntimeError> {
        let value = self.pop()?;
        let index = self.pop()?;
        let id = self.pop()?;
        self.heap
            .store(id, index, value)
            .map_err(|e| self.access_error(e, id, index))?;
        self.push(value)?;
        Ok(Flow::Next)
    }

    fn access_error(&self, err: AccessError, id: Word, index: Word) -> RuntimeError {
        match err {
            AccessError::InvalidId => RuntimeError::InvalidArrayId { at: self.at, id },
            AccessError::OutOfBounds { length } => RuntimeError::ArrayIndexOutOfBounds {
                at: self.at,
                index,
                length,
            },
        }
    }
}
