use crate::parser::{AstKind, AstNode, Block, OpKind};

use super::Ir;

/// A loop with I/O and no nested loops. The barriers make wholesale
/// reordering pointless, so this only run-length merges neighbouring ops.
pub(crate) fn analyze_io_loop(block: &Block) -> Ir {
    let ops = &block.instructions;
    let mut body = vec![];
    let mut i = 0;

    while i < ops.len() {
        match op_at(ops, i) {
            OpKind::DerefIncrement | OpKind::DerefDecrement => {
                let mut delta = 0u8;
                while i < ops.len() {
                    match op_at(ops, i) {
                        OpKind::DerefIncrement => delta = delta.wrapping_add(1),
                        OpKind::DerefDecrement => delta = delta.wrapping_sub(1),
                        _ => break,
                    }
                    i += 1;
                }
                if delta != 0 {
                    body.push(Ir::Add(delta));
                }
            }
            OpKind::Increment | OpKind::Decrement => {
                let mut delta = 0isize;
                while i < ops.len() {
                    match op_at(ops, i) {
                        OpKind::Increment => delta += 1,
                        OpKind::Decrement => delta -= 1,
                        _ => break,
                    }
                    i += 1;
                }
                if delta != 0 {
                    body.push(Ir::MovePtr(delta));
                }
            }
            OpKind::Read => {
                let mut count = 0;
                while i < ops.len() && op_at(ops, i) == OpKind::Read {
                    count += 1;
                    i += 1;
                }
                body.push(Ir::Read(count));
            }
            OpKind::Write => {
                let mut count = 0;
                while i < ops.len() && op_at(ops, i) == OpKind::Write {
                    count += 1;
                    i += 1;
                }
                body.push(Ir::Write(count));
            }
        }
    }

    Ir::Loop(body)
}

fn op_at(ops: &[AstNode], i: usize) -> OpKind {
    let AstKind::Op(op) = &ops[i].kind else {
        unreachable!("io loops have no nested loops");
    };
    *op
}
