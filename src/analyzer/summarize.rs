use crate::parser::{AstKind, AstNode, OpKind};

use super::Ir;

/// The net effect of a straight-line run of basic ops, in canonical form.
pub(crate) struct OpSummary {
    /// Canonical `MovePtr` / `Add` / `Read` / `Write` sequence
    pub ir: Vec<Ir>,
    /// Nonzero net cell deltas, ascending offset (relative to entry)
    pub cells: Vec<(isize, u8)>,
    /// Net pointer movement of the run
    pub net: isize,
}

enum Deferred {
    Add(u8),
    Read(usize),
    Write(usize),
}

/// Collapse a straight-line op run into canonical offset form.
///
/// Cell updates commute with each other, so their program order is
/// irrelevant; I/O is a barrier. The run is simulated in reverse over a
/// scratch buffer: pending deltas accumulate per cell, and each I/O op
/// flushes the delta of the cell it touches (the adds that follow it in
/// program order) before being recorded itself.
pub(crate) fn summarize_ops(ops: &[AstNode]) -> OpSummary {
    let (min, max, net) = scan(ops);
    let width = (max - min) as usize + 1;
    let mut mem = vec![0u8; width];
    let mut dirty = vec![false; width];
    // (buffer index, entry), in reverse program order
    let mut deferred: Vec<(usize, Deferred)> = vec![];

    // start at the run's final resting place and retrace it backwards
    let mut p = (net - min) as usize;
    for node in ops.iter().rev() {
        let AstKind::Op(op) = &node.kind else {
            unreachable!("loops are split off before summarizing");
        };
        match op {
            OpKind::DerefIncrement => {
                mem[p] = mem[p].wrapping_add(1);
                dirty[p] = true;
            }
            OpKind::DerefDecrement => {
                mem[p] = mem[p].wrapping_sub(1);
                dirty[p] = true;
            }
            // pointer motion inverts in the reverse walk
            OpKind::Increment => p -= 1,
            OpKind::Decrement => p += 1,
            OpKind::Read | OpKind::Write => {
                if dirty[p] {
                    if mem[p] != 0 {
                        deferred.push((p, Deferred::Add(mem[p])));
                        mem[p] = 0;
                    }
                    dirty[p] = false;
                }
                let is_read = *op == OpKind::Read;
                // a run of the same op on the same cell coalesces
                let coalesced = match deferred.last_mut() {
                    Some((q, Deferred::Read(n))) if *q == p && is_read => {
                        *n += 1;
                        true
                    }
                    Some((q, Deferred::Write(n))) if *q == p && !is_read => {
                        *n += 1;
                        true
                    }
                    _ => false,
                };
                if !coalesced {
                    let entry = if is_read {
                        Deferred::Read(1)
                    } else {
                        Deferred::Write(1)
                    };
                    deferred.push((p, entry));
                }
            }
        }
    }

    let cells: Vec<(isize, u8)> = mem
        .iter()
        .enumerate()
        .filter(|(_, &v)| v != 0)
        .map(|(i, &v)| (min + i as isize, v))
        .collect();

    let mut ir = vec![];
    let mut cur = 0isize;
    // cell deltas first, nearest to the entry pointer outward
    for &(offset, delta) in cells.iter().rev() {
        reposition(&mut ir, &mut cur, offset);
        ir.push(Ir::Add(delta));
    }
    // then the I/O, back in program order
    for (index, entry) in deferred.iter().rev() {
        reposition(&mut ir, &mut cur, min + *index as isize);
        ir.push(match entry {
            Deferred::Add(v) => Ir::Add(*v),
            Deferred::Read(n) => Ir::Read(*n),
            Deferred::Write(n) => Ir::Write(*n),
        });
    }
    reposition(&mut ir, &mut cur, net);

    OpSummary { ir, cells, net }
}

fn reposition(ir: &mut Vec<Ir>, cur: &mut isize, target: isize) {
    if target != *cur {
        ir.push(Ir::MovePtr(target - *cur));
        *cur = target;
    }
}

/// Pointer extent and net movement of a straight-line run.
fn scan(ops: &[AstNode]) -> (isize, isize, isize) {
    let (mut min, mut max, mut p) = (0isize, 0isize, 0isize);
    for node in ops {
        match node.kind {
            AstKind::Op(OpKind::Increment) => {
                p += 1;
                max = max.max(p);
            }
            AstKind::Op(OpKind::Decrement) => {
                p -= 1;
                min = min.min(p);
            }
            _ => {}
        }
    }
    (min, max, p)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::lexer::lexer::Lexer;
    use crate::parser::parser::Parser;

    fn summarize(source: &str) -> OpSummary {
        let tokens = Lexer::new(source).collect_tokens();
        let program = Parser::new(&tokens).parse_program().unwrap();
        summarize_ops(&program.instructions)
    }

    #[test]
    fn empty_run() {
        let s = summarize("");
        assert!(s.ir.is_empty() && s.cells.is_empty());
        assert_eq!(s.net, 0);
    }

    #[test]
    fn pure_motion_collapses() {
        assert_eq!(summarize(">><>>><<").ir, vec![Ir::MovePtr(2)]);
        assert!(summarize("><").ir.is_empty());
    }

    #[test]
    fn cancelling_adds_vanish() {
        assert!(summarize("+->+-<").ir.is_empty());
    }

    #[test]
    fn cells_are_ascending() {
        let s = summarize(">>++<-<+");
        assert_eq!(s.cells, vec![(0, 1), (1, 255), (2, 2)]);
        assert_eq!(s.net, 0);
    }

    #[test]
    fn io_stays_in_program_order() {
        let s = summarize("+.+.+");
        assert_eq!(
            s.ir,
            vec![
                Ir::Add(1),
                Ir::Write(1),
                Ir::Add(1),
                Ir::Write(1),
                Ir::Add(1),
            ]
        );
    }

    #[test]
    fn add_before_read_is_kept_but_harmless() {
        let s = summarize("+,");
        assert_eq!(s.ir, vec![Ir::Add(1), Ir::Read(1)]);
    }

    #[test]
    fn read_then_add() {
        let s = summarize(",+");
        assert_eq!(s.ir, vec![Ir::Read(1), Ir::Add(1)]);
    }

    #[test]
    fn io_runs_coalesce() {
        assert_eq!(summarize("...").ir, vec![Ir::Write(3)]);
        assert_eq!(summarize(",,").ir, vec![Ir::Read(2)]);
        // same cell, balanced motion in between: still one run
        assert_eq!(summarize(".><.").ir, vec![Ir::Write(2)]);
    }

    #[test]
    fn io_runs_do_not_coalesce_across_cells_or_updates() {
        assert_eq!(
            summarize(".>.").ir,
            vec![Ir::Write(1), Ir::MovePtr(1), Ir::Write(1)]
        );
        assert_eq!(
            summarize(".+.").ir,
            vec![Ir::Write(1), Ir::Add(1), Ir::Write(1)]
        );
    }

    #[test]
    fn lands_on_the_net_position() {
        let s = summarize("+>>");
        assert_eq!(s.ir, vec![Ir::Add(1), Ir::MovePtr(2)]);
        assert_eq!(s.net, 2);
    }

    #[test]
    fn mixed_io_at_negative_offsets() {
        let s = summarize(",<,");
        assert_eq!(
            s.ir,
            vec![Ir::Read(1), Ir::MovePtr(-1), Ir::Read(1)]
        );
        assert_eq!(s.net, -1);
    }
}
