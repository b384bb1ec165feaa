pub mod ast_interpreter;
pub mod ir_interpreter;
pub mod tape;

use std::io::{self, Read, Write};

use thiserror::Error;

use crate::analyzer::LANES;

use self::tape::Tape;

#[derive(Error, Debug)]
pub enum RuntimeError {
    #[error("tape index {index} is past the memory limit")]
    MemoryLimitExceeded { index: isize },

    #[error("tape index {index} is before the start of the tape")]
    PointerUnderflow { index: isize },

    #[error("loop can never terminate (flag cell is {value})")]
    DeadLoop { value: u8 },

    #[error("read past the end of input")]
    InputExhausted,

    #[error("output stream failed")]
    OutputFailed(#[source] io::Error),

    #[error("out of memory")]
    OutOfMemory,
}

/// Owns everything a program run touches: the tape, the data pointer and the
/// two streams. The interpreters stay stateless and call through here.
pub struct Runtime {
    ptr: isize,
    tape: Box<dyn Tape>,

    in_stream: Box<dyn Read>,
    out_stream: Box<dyn Write>,
}

impl std::fmt::Debug for Runtime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Runtime").field("ptr", &self.ptr).finish_non_exhaustive()
    }
}

impl Runtime {
    pub fn new(
        mut tape: Box<dyn Tape>,
        in_stream: Box<dyn Read>,
        out_stream: Box<dyn Write>,
    ) -> Result<Self, RuntimeError> {
        tape.ensure(0)?;
        Ok(Runtime {
            ptr: 0,
            tape,
            in_stream,
            out_stream,
        })
    }

    pub fn move_ptr(&mut self, delta: isize) -> Result<(), RuntimeError> {
        self.ptr += delta;
        self.tape.ensure(self.ptr)
    }

    /// Grow for a cell at `offset` from the pointer without moving it.
    pub fn reserve(&mut self, offset: isize) -> Result<(), RuntimeError> {
        self.tape.ensure(self.ptr + offset)
    }

    pub fn add(&mut self, value: u8) {
        self.tape.add(self.ptr, value);
    }

    pub fn vec_add(&mut self, lanes: &[u8; LANES]) -> Result<(), RuntimeError> {
        self.tape.add_slice(self.ptr, lanes)
    }

    pub fn set_zero(&mut self) {
        self.tape.set(self.ptr, 0);
    }

    /// The byte every loop tests: `tape[ptr]`.
    pub fn flag(&self) -> u8 {
        self.tape.get(self.ptr)
    }

    pub fn jump_to_next_zero(&mut self, step: isize) -> Result<(), RuntimeError> {
        while self.flag() != 0 {
            self.move_ptr(step)?;
        }
        Ok(())
    }

    /// Drop `count - 1` input bytes, store the last one at the pointer.
    pub fn read(&mut self, count: usize) -> Result<(), RuntimeError> {
        let mut byte = [0u8; 1];
        for _ in 0..count {
            self.in_stream
                .read_exact(&mut byte)
                .map_err(|_| RuntimeError::InputExhausted)?;
        }
        self.tape.set(self.ptr, byte[0]);
        Ok(())
    }

    /// Emit the byte at the pointer `count` times.
    pub fn write(&mut self, count: usize) -> Result<(), RuntimeError> {
        let byte = [self.flag()];
        for _ in 0..count {
            self.out_stream
                .write_all(&byte)
                .map_err(RuntimeError::OutputFailed)?;
        }
        Ok(())
    }

    pub fn flush(&mut self) -> Result<(), RuntimeError> {
        self.out_stream.flush().map_err(RuntimeError::OutputFailed)
    }

    pub fn ptr(&self) -> isize {
        self.ptr
    }

    pub fn cell(&self, index: isize) -> u8 {
        self.tape.get(index)
    }

    pub fn allocated(&self) -> usize {
        self.tape.allocated()
    }

    pub fn high_water(&self) -> isize {
        self.tape.high_water()
    }
}
