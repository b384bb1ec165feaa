use std::fmt;

use crate::parser::{AstKind, AstNode, Block, Program};

pub mod io_loop;
pub mod pure_loop;
pub mod summarize;

/// Width, in cells, of the fused-add fast path. Bodies narrower than
/// `LANES / 2` stay scalar.
pub const LANES: usize = 32;

/// The semantic IR the executor walks. Built once per program and
/// append-only after that.
#[derive(Debug, Clone, PartialEq)]
pub enum Ir {
    Root(Vec<Ir>),

    /// `tape[ptr] += v`, wrapping
    Add(u8),
    /// Wrapping byte-wise add of the lane vector into `tape[ptr..ptr+LANES]`
    VecAdd(Box<[u8; LANES]>),
    /// `ptr += d`
    MovePtr(isize),
    /// Skip `n - 1` input bytes, read one into `tape[ptr]`
    Read(usize),
    /// Emit `tape[ptr]` `n` times
    Write(usize),

    /// While `tape[ptr] != 0`, execute the children
    Loop(Vec<Ir>),
    /// Balanced loop whose iteration count follows from the entry flag value
    CountedLoop(Box<CountedLoop>),
    /// No-op on a zero flag; a nonzero flag can never make progress
    EmptyLoop,
    /// `tape[ptr] = 0`
    SetZero,
    /// `while tape[ptr] != 0 { ptr += step }`
    JumpToNextZero(isize),
}

#[derive(Debug, Clone, PartialEq)]
pub struct CountedLoop {
    /// Net change of the flag cell per iteration, nonzero
    pub flag_step: u8,
    /// One canonical iteration, net pointer delta zero
    pub body: Vec<Ir>,
    /// Run once after the final iteration
    pub tail: Vec<Ir>,
    /// Cell span (relative to the entry pointer) covered by `VecAdd` blocks
    /// in the body; empty when the body is scalar
    pub vec_begin: isize,
    pub vec_end: isize,
}

/// Rewrite the parse tree into the semantic IR.
pub fn analyze(program: &Program) -> Ir {
    let mut children = program.instructions.as_slice();
    // cell 0 is zero on entry, so loops before the first basic op never run
    while let Some(AstNode {
        kind: AstKind::Loop(_),
        ..
    }) = children.first()
    {
        children = &children[1..];
    }
    Ir::Root(analyze_block(children))
}

/// Shared by the root and by nested loop bodies: straight-line runs between
/// loop boundaries are canonicalized, loops are dispatched by their summary.
fn analyze_block(instructions: &[AstNode]) -> Vec<Ir> {
    let mut out = vec![];
    let mut run_start = 0;

    for (i, node) in instructions.iter().enumerate() {
        if let AstKind::Loop(block) = &node.kind {
            out.extend(summarize::summarize_ops(&instructions[run_start..i]).ir);
            run_start = i + 1;
            out.push(analyze_loop(block));
        }
    }
    out.extend(summarize::summarize_ops(&instructions[run_start..]).ir);

    out
}

fn analyze_loop(block: &Block) -> Ir {
    let summary = block.summary;
    if summary.has_nested_loops {
        Ir::Loop(analyze_block(&block.instructions))
    } else if summary.has_io {
        io_loop::analyze_io_loop(block)
    } else {
        pure_loop::analyze_pure_loop(block)
    }
}

impl Ir {
    /// Render the IR back into Brainfuck source with the same semantics.
    pub fn decompile(&self) -> String {
        let mut out = String::new();
        self.decompile_into(&mut out);
        out
    }

    fn decompile_into(&self, out: &mut String) {
        match self {
            Ir::Root(children) | Ir::Loop(children) => {
                if let Ir::Loop(_) = self {
                    out.push('[');
                }
                for child in children {
                    child.decompile_into(out);
                }
                if let Ir::Loop(_) = self {
                    out.push(']');
                }
            }
            Ir::Add(v) => push_adds(out, *v),
            Ir::VecAdd(lanes) => {
                let mut at = 0isize;
                for (i, &v) in lanes.iter().enumerate() {
                    if v != 0 {
                        push_moves(out, i as isize - at);
                        at = i as isize;
                        push_adds(out, v);
                    }
                }
                push_moves(out, -at);
            }
            Ir::MovePtr(d) => push_moves(out, *d),
            Ir::Read(n) => out.extend(std::iter::repeat(',').take(*n)),
            Ir::Write(n) => out.extend(std::iter::repeat('.').take(*n)),
            Ir::CountedLoop(counted) => {
                out.push('[');
                for child in &counted.body {
                    child.decompile_into(out);
                }
                out.push(']');
                for child in &counted.tail {
                    child.decompile_into(out);
                }
            }
            Ir::EmptyLoop => out.push_str("[]"),
            Ir::SetZero => out.push_str("[-]"),
            Ir::JumpToNextZero(step) => {
                out.push('[');
                push_moves(out, *step);
                out.push(']');
            }
        }
    }
}

fn push_moves(out: &mut String, delta: isize) {
    if delta >= 0 {
        out.extend(std::iter::repeat('>').take(delta as usize));
    } else {
        out.extend(std::iter::repeat('<').take(delta.unsigned_abs()));
    }
}

fn push_adds(out: &mut String, v: u8) {
    if v < 128 {
        out.extend(std::iter::repeat('+').take(v as usize));
    } else {
        out.extend(std::iter::repeat('-').take(256 - v as usize));
    }
}

impl fmt::Display for Ir {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.decompile())
    }
}
