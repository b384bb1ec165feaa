//! An optimizing Brainfuck interpreter: source text is compiled through a
//! lexer, a summarizing parser and a semantic analyzer into a compact IR,
//! which a tree-walking executor runs against an expandable tape.

pub mod analyzer;
pub mod interpreter;
pub mod lexer;
pub mod parser;

mod util;

use std::io::{Read, Write};

use thiserror::Error;

use analyzer::Ir;
use interpreter::ir_interpreter::IrInterpreter;
use interpreter::tape::{FlatTape, SegmentTape, Tape, DEFAULT_INITIAL_SIZE, DEFAULT_LIMIT};
use interpreter::{Runtime, RuntimeError};
use lexer::lexer::Lexer;
use parser::ParseError;

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}

/// Tape sizing, supplied at execution. Not exposed on the CLI.
#[derive(Debug, Clone, Copy)]
pub struct TapeConfig {
    /// Starting size of the flat tape, in cells
    pub initial_size: usize,
    /// Hard cap on how far the pointer may roam
    pub limit: usize,
}

impl Default for TapeConfig {
    fn default() -> Self {
        TapeConfig {
            initial_size: DEFAULT_INITIAL_SIZE,
            limit: DEFAULT_LIMIT,
        }
    }
}

/// A compiled program, ready to execute any number of times.
pub struct CompiledProgram {
    ir: Ir,
    /// The top-level code reaches left of the origin, so the run needs the
    /// segmented tape
    wants_negative: bool,
}

/// Lex, parse and analyze. Tokens die after parsing and the tree after
/// analysis, so only the IR survives compilation.
pub fn compile(source: &str) -> Result<CompiledProgram, ParseError> {
    let program = {
        let tokens = Lexer::new(source).collect_tokens();
        parser::parser::Parser::new(&tokens).parse_program()?
    };
    let wants_negative = program.summary.min_ptr < 0;
    let ir = analyzer::analyze(&program);
    Ok(CompiledProgram { ir, wants_negative })
}

impl CompiledProgram {
    pub fn ir(&self) -> &Ir {
        &self.ir
    }

    pub fn execute(
        &self,
        input: Box<dyn Read>,
        output: Box<dyn Write>,
        config: TapeConfig,
    ) -> Result<Runtime, RuntimeError> {
        let tape: Box<dyn Tape> = if self.wants_negative {
            Box::new(SegmentTape::new(config.limit))
        } else {
            Box::new(FlatTape::new(config.initial_size, config.limit))
        };

        let mut runtime = Runtime::new(tape, input, output)?;
        IrInterpreter::new().run(&mut runtime, &self.ir)?;
        runtime.flush()?;
        Ok(runtime)
    }
}

/// Compile and execute in one go, with default tape sizing. Every error the
/// pipeline can surface comes out of this one contract.
pub fn run(
    source: &str,
    input: Box<dyn Read>,
    output: Box<dyn Write>,
) -> Result<Runtime, Error> {
    let program = compile(source)?;
    Ok(program.execute(input, output, TapeConfig::default())?)
}
