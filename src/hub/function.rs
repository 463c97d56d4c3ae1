//! Callable utility functions and the modules that group them

use anyhow::{Result, anyhow};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::hub::console::Console;
use crate::types::{FunctionSpec, Value};

pub type Handler = Arc<dyn Fn(&Args, &Console) -> Result<Option<Value>> + Send + Sync>;

/// Coerced arguments for one call, in declaration order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Args {
    values: Vec<(String, Value)>,
}

impl Args {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: Value) {
        let name = name.into();
        match self.values.iter_mut().find(|(n, _)| *n == name) {
            Some((_, slot)) => *slot = value,
            None => self.values.push((name, value)),
        }
    }

    #[cfg(test)]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    fn require(&self, name: &str) -> Result<&Value> {
        self.get(name)
            .ok_or_else(|| anyhow!("missing required argument: '{name}'"))
    }

    pub fn str(&self, name: &str) -> Result<&str> {
        match self.require(name)? {
            Value::Str(s) => Ok(s),
            other => Err(anyhow!("argument '{name}' must be a string, got {other}")),
        }
    }

    pub fn float(&self, name: &str) -> Result<f64> {
        match self.require(name)? {
            Value::Float(x) => Ok(*x),
            Value::Int(i) => Ok(*i as f64),
            other => Err(anyhow!("argument '{name}' must be a float, got {other}")),
        }
    }

    #[cfg(test)]
    pub fn int(&self, name: &str) -> Result<i64> {
        match self.require(name)? {
            Value::Int(i) => Ok(*i),
            other => Err(anyhow!("argument '{name}' must be an integer, got {other}")),
        }
    }

    pub fn bool(&self, name: &str) -> Result<bool> {
        match self.require(name)? {
            Value::Bool(b) => Ok(*b),
            other => Err(anyhow!("argument '{name}' must be a bool, got {other}")),
        }
    }
}

#[derive(Clone)]
pub struct UtilityFunction {
    spec: FunctionSpec,
    handler: Handler,
}

impl UtilityFunction {
    pub fn new<F>(spec: FunctionSpec, handler: F) -> Self
    where
        F: Fn(&Args, &Console) -> Result<Option<Value>> + Send + Sync + 'static,
    {
        Self {
            spec,
            handler: Arc::new(handler),
        }
    }

    pub fn spec(&self) -> &FunctionSpec {
        &self.spec
    }

    pub fn name(&self) -> &str {
        &self.spec.name
    }

    pub fn call(&self, args: &Args, console: &Console) -> Result<Option<Value>> {
        (self.handler)(args, console)
    }
}

impl fmt::Debug for UtilityFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UtilityFunction")
            .field("spec", &self.spec)
            .finish_non_exhaustive()
    }
}

/// A named group of functions, listed by name
#[derive(Debug, Clone)]
pub struct UtilityModule {
    pub name: String,
    pub description: String,
    functions: BTreeMap<String, UtilityFunction>,
}

impl UtilityModule {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            functions: BTreeMap::new(),
        }
    }

    /// Register a function. Names starting with `_` are internal and ignored.
    pub fn insert(&mut self, function: UtilityFunction) -> bool {
        if function.name().starts_with('_') {
            return false;
        }
        self.functions.insert(function.name().to_string(), function);
        true
    }

    pub fn with_function(mut self, function: UtilityFunction) -> Self {
        self.insert(function);
        self
    }

    pub fn function(&self, name: &str) -> Option<&UtilityFunction> {
        self.functions.get(name)
    }

    pub fn functions(&self) -> impl Iterator<Item = &UtilityFunction> {
        self.functions.values()
    }

    pub fn function_names(&self) -> impl Iterator<Item = &str> {
        self.functions.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}
