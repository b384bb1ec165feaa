use crate::parser::{AstKind, Block, OpKind, Program};

use super::{Runtime, RuntimeError};

/// Executes the parse tree one op at a time, no rewriting. Slow, but its
/// behavior is self-evidently the language's: the differential tests hold
/// the optimizing executor to it.
pub struct AstInterpreter;

impl AstInterpreter {
    pub fn new() -> Self {
        Self
    }

    pub fn run(&mut self, runtime: &mut Runtime, program: &Program) -> Result<(), RuntimeError> {
        self.run_block(runtime, program)
    }

    fn run_block(&mut self, runtime: &mut Runtime, block: &Block) -> Result<(), RuntimeError> {
        for node in &block.instructions {
            match &node.kind {
                AstKind::Op(OpKind::Increment) => runtime.move_ptr(1)?,
                AstKind::Op(OpKind::Decrement) => runtime.move_ptr(-1)?,
                AstKind::Op(OpKind::DerefIncrement) => runtime.add(1),
                AstKind::Op(OpKind::DerefDecrement) => runtime.add(255),
                AstKind::Op(OpKind::Read) => runtime.read(1)?,
                AstKind::Op(OpKind::Write) => runtime.write(1)?,
                AstKind::Loop(body) => {
                    while runtime.flag() != 0 {
                        self.run_block(runtime, body)?;
                    }
                }
            }
        }
        Ok(())
    }
}

impl Default for AstInterpreter {
    fn default() -> Self {
        Self::new()
    }
}
