//! Fixed registry of named template functions.
//!
//! Functions are registered once when a generator starts and are then handed
//! to every expansion unchanged. Each expansion builds its own Tera instance,
//! so the registry holds shared handles rather than the functions themselves.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tera::{Function, Tera, Value};

/// A set of callables exposed to templates by name.
#[derive(Clone, Default)]
pub struct FunctionRegistry {
    functions: Vec<(String, Arc<dyn Function>)>,
}

impl FunctionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a function, replacing any earlier one with the same name.
    pub fn register<F: Function + 'static>(&mut self, name: impl Into<String>, function: F) {
        let name = name.into();
        let function: Arc<dyn Function> = Arc::new(function);
        match self.functions.iter_mut().find(|(n, _)| *n == name) {
            Some((_, slot)) => *slot = function,
            None => self.functions.push((name, function)),
        }
    }

    /// Builder form of [`register`](Self::register).
    pub fn with<F: Function + 'static>(mut self, name: impl Into<String>, function: F) -> Self {
        self.register(name, function);
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.functions.iter().any(|(n, _)| n == name)
    }

    /// Registered names, in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.functions.iter().map(|(n, _)| n.as_str())
    }

    pub(crate) fn install(&self, tera: &mut Tera) {
        for (name, function) in &self.functions {
            tera.register_function(name, Shared(Arc::clone(function)));
        }
    }
}

impl fmt::Debug for FunctionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

struct Shared(Arc<dyn Function>);

impl Function for Shared {
    fn call(&self, args: &HashMap<String, Value>) -> tera::Result<Value> {
        self.0.call(args)
    }

    fn is_safe(&self) -> bool {
        self.0.is_safe()
    }
}
