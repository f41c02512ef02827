//! Command sources: who a command runs as, and where its results go.

use super::function::{Function, FunctionLibrary};
use crate::execution::ReturnCallback;
use std::fmt;
use std::rc::Rc;

pub trait CommandSource: Clone + 'static {
    /// Where results of commands run by this source are reported.
    fn callback(&self) -> ReturnCallback;

    fn with_callback(&self, callback: ReturnCallback) -> Self;

    /// Resolve a function for a call made by this source.
    fn function(&self, id: &str) -> Option<Rc<Function<Self>>>;
}

/// Named source backed by a shared function library
#[derive(Clone)]
pub struct BasicSource {
    name: String,
    callback: ReturnCallback,
    library: Rc<FunctionLibrary<BasicSource>>,
}

impl BasicSource {
    pub fn new(name: impl Into<String>, library: Rc<FunctionLibrary<BasicSource>>) -> Self {
        Self {
            name: name.into(),
            callback: ReturnCallback::empty(),
            library,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Same library and callback, different name. Used by forks.
    pub fn with_name(&self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..self.clone()
        }
    }

    pub fn library(&self) -> &Rc<FunctionLibrary<BasicSource>> {
        &self.library
    }
}

impl CommandSource for BasicSource {
    fn callback(&self) -> ReturnCallback {
        self.callback.clone()
    }

    fn with_callback(&self, callback: ReturnCallback) -> Self {
        Self {
            callback,
            ..self.clone()
        }
    }

    fn function(&self, id: &str) -> Option<Rc<Function<Self>>> {
        self.library.get(id)
    }
}

impl fmt::Debug for BasicSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BasicSource")
            .field("name", &self.name)
            .field("functions", &self.library.len())
            .finish()
    }
}
