#![allow(dead_code)]

use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;

use dlox::error::{LoxError, RunError, RuntimeError};
use dlox::runner::Runner;

/// A `Write` sink the test keeps a handle to after handing it to the runner.
#[derive(Clone, Default)]
pub struct SharedBuffer(Rc<RefCell<Vec<u8>>>);

impl SharedBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.borrow()).into_owned()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Runs `source` on a fresh runner; returns printed output and the outcome.
pub fn run(source: &str) -> (String, Result<(), RunError>) {
    let buffer = SharedBuffer::default();
    let mut runner = Runner::with_output(Box::new(buffer.clone()));
    let result = runner.run(source);
    (buffer.contents(), result)
}

/// Runs `source` and expects it to succeed; returns its printed lines.
pub fn run_ok(source: &str) -> Vec<String> {
    let (output, result) = run(source);
    if let Err(e) = result {
        panic!("program failed: {}\noutput so far:\n{}", e, output);
    }
    output.lines().map(str::to_owned).collect()
}

/// Runs `source` and expects a runtime error.
pub fn run_runtime_err(source: &str) -> (String, RuntimeError) {
    match run(source) {
        (output, Err(RunError::Runtime(e))) => (output, e),
        (output, other) => panic!("expected runtime error, got {:?}\noutput:\n{}", other, output),
    }
}

/// Runs `source` and expects static diagnostics.
pub fn run_static_err(source: &str) -> Vec<LoxError> {
    match run(source) {
        (_, Err(RunError::Static(errors))) => errors,
        (output, other) => panic!("expected static errors, got {:?}\noutput:\n{}", other, output),
    }
}
