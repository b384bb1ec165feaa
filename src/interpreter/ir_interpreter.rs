use crate::analyzer::{CountedLoop, Ir};
use crate::util::counted_iterations;

use super::{Runtime, RuntimeError};

/// Tree-walks the semantic IR.
pub struct IrInterpreter;

impl IrInterpreter {
    pub fn new() -> Self {
        Self
    }

    pub fn run(&mut self, runtime: &mut Runtime, program: &Ir) -> Result<(), RuntimeError> {
        self.run_node(runtime, program)
    }

    fn run_seq(&mut self, runtime: &mut Runtime, nodes: &[Ir]) -> Result<(), RuntimeError> {
        for node in nodes {
            self.run_node(runtime, node)?;
        }
        Ok(())
    }

    fn run_node(&mut self, runtime: &mut Runtime, node: &Ir) -> Result<(), RuntimeError> {
        match node {
            Ir::Root(children) => self.run_seq(runtime, children),

            Ir::Add(v) => {
                runtime.add(*v);
                Ok(())
            }
            Ir::VecAdd(lanes) => runtime.vec_add(lanes),
            Ir::MovePtr(delta) => runtime.move_ptr(*delta),
            Ir::Read(count) => runtime.read(*count),
            Ir::Write(count) => runtime.write(*count),

            Ir::Loop(body) => {
                while runtime.flag() != 0 {
                    self.run_seq(runtime, body)?;
                }
                Ok(())
            }
            Ir::CountedLoop(counted) => self.run_counted(runtime, counted),
            Ir::EmptyLoop => match runtime.flag() {
                0 => Ok(()),
                value => Err(RuntimeError::DeadLoop { value }),
            },
            Ir::SetZero => {
                runtime.set_zero();
                Ok(())
            }
            Ir::JumpToNextZero(step) => runtime.jump_to_next_zero(*step),
        }
    }

    fn run_counted(
        &mut self,
        runtime: &mut Runtime,
        counted: &CountedLoop,
    ) -> Result<(), RuntimeError> {
        let flag = runtime.flag();
        if flag == 0 {
            return Ok(());
        }

        let iterations = counted_iterations(flag, counted.flag_step)
            .ok_or(RuntimeError::DeadLoop { value: flag })?;

        // one growth check covers every VecAdd in the body
        if counted.vec_end > counted.vec_begin {
            runtime.reserve(counted.vec_begin)?;
            runtime.reserve(counted.vec_end - 1)?;
        }

        for _ in 0..iterations {
            self.run_seq(runtime, &counted.body)?;
        }
        self.run_seq(runtime, &counted.tail)
    }
}

impl Default for IrInterpreter {
    fn default() -> Self {
        Self::new()
    }
}
