use crate::parser::{AstKind, AstNode, Block, OpKind};
use crate::util::gcd;

use super::summarize::summarize_ops;
use super::{CountedLoop, Ir, LANES};

/// Classify a loop with no nested loops and no I/O.
pub(crate) fn analyze_pure_loop(block: &Block) -> Ir {
    let summary = block.summary;
    if !summary.has_add && !summary.has_addptr {
        return Ir::EmptyLoop;
    }
    // no nested loops, so the net move is always known
    let net = summary.net_move.unwrap_or(0);

    if !summary.has_addptr {
        // the flag cell steps by a constant every iteration
        return match flag_delta(&block.instructions) {
            0 => Ir::EmptyLoop,
            step if gcd(step as u32, 256) == 1 => Ir::SetZero,
            // whether an even step ever reaches zero depends on the entry
            // value, so the decision is deferred to the executor's
            // divisibility check
            step => counted(step, vec![Ir::Add(step)], 0, 0),
        };
    }

    if !summary.has_add {
        return if net == 0 {
            Ir::EmptyLoop
        } else {
            Ir::JumpToNextZero(net)
        };
    }

    // mixed: simulate one iteration and look at the net cell deltas
    let sim = summarize_ops(&block.instructions);
    if sim.cells.is_empty() {
        // the adds cancel out; only the pointer motion is left
        return if sim.net == 0 {
            Ir::EmptyLoop
        } else {
            Ir::JumpToNextZero(sim.net)
        };
    }

    let flag_step = sim
        .cells
        .iter()
        .find(|&&(offset, _)| offset == 0)
        .map_or(0, |&(_, delta)| delta);

    if flag_step == 0 || sim.net != 0 {
        // the flag is only zeroed (if ever) by landing on some other cell;
        // nothing better than a plain loop over the canonical body
        return Ir::Loop(sim.ir);
    }

    build_counted(flag_step, &sim.cells)
}

/// Wrapping sum of `+` / `-` in an add-only body.
fn flag_delta(instructions: &[AstNode]) -> u8 {
    let mut delta = 0u8;
    for node in instructions {
        match node.kind {
            AstKind::Op(OpKind::DerefIncrement) => delta = delta.wrapping_add(1),
            AstKind::Op(OpKind::DerefDecrement) => delta = delta.wrapping_sub(1),
            _ => {}
        }
    }
    delta
}

/// Balanced counted loop: scalar body for narrow cell ranges, full-width
/// `VecAdd` blocks over the dense middle for wide ones. Only whole blocks
/// are vectorized; leftover cells past the last block stay scalar.
fn build_counted(flag_step: u8, cells: &[(isize, u8)]) -> Ir {
    let lo = cells[0].0;
    let hi = cells[cells.len() - 1].0;
    let range = (hi - lo + 1) as usize;
    let blocks = if range < LANES / 2 { 0 } else { range / LANES };

    if blocks == 0 {
        let mut body = vec![];
        let mut cur = 0isize;
        for &(offset, delta) in cells.iter().rev() {
            step_to(&mut body, &mut cur, offset);
            body.push(Ir::Add(delta));
        }
        step_to(&mut body, &mut cur, 0);
        return counted(flag_step, body, 0, 0);
    }

    let vec_begin = lo;
    let vec_end = lo + (blocks * LANES) as isize;
    let mut body = vec![];
    let mut cur = 0isize;

    for block in 0..blocks {
        let base = lo + (block * LANES) as isize;
        let mut lanes = [0u8; LANES];
        let mut any = false;
        for &(offset, delta) in cells {
            if offset >= base && offset < base + LANES as isize {
                lanes[(offset - base) as usize] = delta;
                any = true;
            }
        }
        if any {
            step_to(&mut body, &mut cur, base);
            body.push(Ir::VecAdd(Box::new(lanes)));
        }
    }
    for &(offset, delta) in cells {
        if offset >= vec_end {
            step_to(&mut body, &mut cur, offset);
            body.push(Ir::Add(delta));
        }
    }
    step_to(&mut body, &mut cur, 0);

    counted(flag_step, body, vec_begin, vec_end)
}

fn counted(flag_step: u8, body: Vec<Ir>, vec_begin: isize, vec_end: isize) -> Ir {
    Ir::CountedLoop(Box::new(CountedLoop {
        flag_step,
        body,
        tail: vec![],
        vec_begin,
        vec_end,
    }))
}

fn step_to(body: &mut Vec<Ir>, cur: &mut isize, target: isize) {
    if target != *cur {
        body.push(Ir::MovePtr(target - *cur));
        *cur = target;
    }
}
