//! RAII guard for call frames
//!
//! [`CallScope`] pops the frame it pushed when dropped, so a call leaves the
//! stack balanced whether its body returns, faults, or panics.

use std::ops::{Deref, DerefMut};

use super::Interpreter;
use super::frame::FrameRef;

/// Borrow of the interpreter for the duration of one pushed frame
pub struct CallScope<'a> {
    interpreter: &'a mut Interpreter,
}

impl Drop for CallScope<'_> {
    fn drop(&mut self) {
        self.interpreter.pop_stack_frame();
    }
}

impl Deref for CallScope<'_> {
    type Target = Interpreter;

    fn deref(&self) -> &Self::Target {
        self.interpreter
    }
}

impl DerefMut for CallScope<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.interpreter
    }
}

impl Interpreter {
    /// Push `frame` and return a guard that pops it on drop
    pub fn scoped_call(&mut self, frame: FrameRef) -> CallScope<'_> {
        self.push_frame(frame);
        CallScope { interpreter: self }
    }

    /// Run `f` inside a fresh frame nested in the current one
    pub fn with_stack_frame<T>(&mut self, f: impl FnOnce(&mut Interpreter) -> T) -> T {
        self.push_stack_frame();
        let mut scoped = CallScope { interpreter: self };
        f(&mut *scoped)
    }
}
