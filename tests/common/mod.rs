use std::cell::RefCell;
use std::io::{Cursor, Write};
use std::rc::Rc;

use bfopt::interpreter::Runtime;
use bfopt::Error;

/// A `Write` target the test can keep a handle to after the runtime has
/// taken ownership of its clone.
#[derive(Clone, Default)]
pub struct SharedBuffer(Rc<RefCell<Vec<u8>>>);

impl SharedBuffer {
    pub fn contents(&self) -> Vec<u8> {
        self.0.borrow().clone()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[allow(dead_code)]
pub fn run_with_input(source: &str, input: &[u8]) -> Result<(Runtime, Vec<u8>), Error> {
    let out = SharedBuffer::default();
    let runtime = bfopt::run(
        source,
        Box::new(Cursor::new(input.to_vec())),
        Box::new(out.clone()),
    )?;
    Ok((runtime, out.contents()))
}

#[allow(dead_code)]
pub fn run_program(source: &str) -> Result<(Runtime, Vec<u8>), Error> {
    run_with_input(source, &[])
}
