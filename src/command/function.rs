//! Compiled commands and functions.
//!
//! Produced by a parser that lives elsewhere; the scheduler only needs to know
//! which commands run directly, fork, call a function or return.

use super::source::CommandSource;
use crate::error::CommandError;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

type LeafFn<S> = Rc<dyn Fn(&S) -> Result<i32, CommandError>>;
type RedirectFn<S> = Rc<dyn Fn(&S) -> Result<Vec<S>, CommandError>>;

/// One compiled command
pub enum Command<S> {
    /// Runs against the source and yields an integer result.
    Leaf(LeafFn<S>),
    /// Redirects one source into zero or more sources, then runs `then` for each.
    Fork {
        redirect: RedirectFn<S>,
        then: Rc<Command<S>>,
    },
    /// Calls the function with this id.
    Call(String),
    /// Reports a value to the enclosing frame and cancels the rest of it.
    Return(i32),
}

impl<S> Command<S> {
    pub fn leaf(run: impl Fn(&S) -> Result<i32, CommandError> + 'static) -> Self {
        Command::Leaf(Rc::new(run))
    }

    pub fn fork(
        redirect: impl Fn(&S) -> Result<Vec<S>, CommandError> + 'static,
        then: Command<S>,
    ) -> Self {
        Command::Fork {
            redirect: Rc::new(redirect),
            then: Rc::new(then),
        }
    }

    pub fn call(function: impl Into<String>) -> Self {
        Command::Call(function.into())
    }

    pub fn return_value(value: i32) -> Self {
        Command::Return(value)
    }
}

impl<S> fmt::Debug for Command<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Leaf(_) => f.write_str("Leaf"),
            Command::Fork { then, .. } => f.debug_struct("Fork").field("then", then).finish(),
            Command::Call(id) => f.debug_tuple("Call").field(id).finish(),
            Command::Return(value) => f.debug_tuple("Return").field(value).finish(),
        }
    }
}

/// A function line: the command plus the text it was compiled from
pub struct FunctionLine<S> {
    pub label: String,
    pub command: Rc<Command<S>>,
}

impl<S> Clone for FunctionLine<S> {
    fn clone(&self) -> Self {
        Self {
            label: self.label.clone(),
            command: Rc::clone(&self.command),
        }
    }
}

/// Named, ordered list of command lines
pub struct Function<S> {
    id: String,
    lines: Vec<FunctionLine<S>>,
}

impl<S> Function<S> {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            lines: Vec::new(),
        }
    }

    pub fn with_line(mut self, label: impl Into<String>, command: Command<S>) -> Self {
        self.push_line(label, command);
        self
    }

    pub fn push_line(&mut self, label: impl Into<String>, command: Command<S>) {
        self.lines.push(FunctionLine {
            label: label.into(),
            command: Rc::new(command),
        });
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn lines(&self) -> &[FunctionLine<S>] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

impl<S> fmt::Debug for Function<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Function")
            .field("id", &self.id)
            .field("lines", &self.lines.len())
            .finish()
    }
}

/// Function registry sources resolve calls against
pub struct FunctionLibrary<S> {
    functions: HashMap<String, Rc<Function<S>>>,
}

impl<S: CommandSource> FunctionLibrary<S> {
    pub fn new() -> Self {
        Self {
            functions: HashMap::new(),
        }
    }

    /// Register a function, replacing any previous one with the same id.
    pub fn register(&mut self, function: Function<S>) -> Rc<Function<S>> {
        let function = Rc::new(function);
        self.functions
            .insert(function.id().to_string(), Rc::clone(&function));
        function
    }

    pub fn get(&self, id: &str) -> Option<Rc<Function<S>>> {
        self.functions.get(id).cloned()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.functions.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    /// Registered ids, sorted.
    pub fn ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.functions.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }
}

impl<S: CommandSource> Default for FunctionLibrary<S> {
    fn default() -> Self {
        Self::new()
    }
}
