//! Signature descriptors and argument binding.
//!
//! A [`Signature`] describes the parameters of an event or a listener: an
//! ordered list of named parameters (optionally with defaults), an optional
//! positional tail (`*args`) and an optional named collector (`**kwargs`).
//!
//! Defaults change how a callable may be *called* (see [`Signature::bind`]),
//! never its [`Shape`]: a parameter with a default still counts towards the
//! arity used for listener matching.

use std::collections::HashSet;
use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::args::{Arguments, Kwargs, Value, Varargs};
use crate::shape::Shape;

/// A named parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    default: Option<Value>,
}

impl Parameter {
    /// Parameter without a default.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            default: None,
        }
    }

    /// Parameter with a default value.
    pub fn with_default(name: impl Into<String>, default: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            default: Some(default.into()),
        }
    }

    /// Parameter name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Default value, if any.
    pub const fn default_value(&self) -> Option<&Value> {
        self.default.as_ref()
    }
}

/// Renders `name`, or `name=default` with the default written as JSON
/// (`second=null`, `limit=10`, `label="x"`).
impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.default {
            Some(default) => write!(f, "{}={default}", self.name),
            None => f.write_str(&self.name),
        }
    }
}

/// Parameter list of an event or listener.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature {
    #[serde(default)]
    parameters: Vec<Parameter>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    varargs: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    kwargs: Option<String>,
}

impl Signature {
    /// Empty parameter list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a parameter without a default.
    #[must_use]
    pub fn param(mut self, name: impl Into<String>) -> Self {
        self.parameters.push(Parameter::new(name));
        self
    }

    /// Append a parameter with a default value.
    #[must_use]
    pub fn param_with_default(mut self, name: impl Into<String>, default: impl Into<Value>) -> Self {
        self.parameters.push(Parameter::with_default(name, default));
        self
    }

    /// Accept a positional tail collected under `name`.
    #[must_use]
    pub fn varargs(mut self, name: impl Into<String>) -> Self {
        self.varargs = Some(name.into());
        self
    }

    /// Accept arbitrary named values collected under `name`.
    #[must_use]
    pub fn kwargs(mut self, name: impl Into<String>) -> Self {
        self.kwargs = Some(name.into());
        self
    }

    /// Declared parameters, in order.
    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    /// Names of the non-variadic parameters, defaults included.
    pub fn required(&self) -> impl Iterator<Item = &str> {
        self.parameters.iter().map(Parameter::name)
    }

    /// Number of non-variadic parameters.
    pub fn arity(&self) -> usize {
        self.parameters.len()
    }

    /// True if a positional tail is accepted.
    pub const fn accepts_varargs(&self) -> bool {
        self.varargs.is_some()
    }

    /// True if arbitrary named values are accepted.
    pub const fn accepts_kwargs(&self) -> bool {
        self.kwargs.is_some()
    }

    /// Name of the positional tail, if any.
    pub fn varargs_name(&self) -> Option<&str> {
        self.varargs.as_deref()
    }

    /// Name of the named collector, if any.
    pub fn kwargs_name(&self) -> Option<&str> {
        self.kwargs.as_deref()
    }

    /// Check that every parameter name, tails included, is used once.
    ///
    /// # Errors
    ///
    /// Returns [`BindError::DuplicateParameter`] naming the first repeated name.
    pub fn validate(&self) -> Result<(), BindError> {
        let mut seen = HashSet::new();
        self.parameters
            .iter()
            .map(Parameter::name)
            .chain(self.varargs.as_deref())
            .chain(self.kwargs.as_deref())
            .find(|name| !seen.insert(*name))
            .map_or(Ok(()), |name| {
                Err(BindError::DuplicateParameter {
                    parameter: name.to_string(),
                })
            })
    }

    /// Calling convention used for listener matching.
    pub fn shape(&self) -> Shape {
        Shape::new(self.arity(), self.accepts_varargs(), self.accepts_kwargs())
    }

    /// Bind call arguments to this parameter list.
    ///
    /// # Errors
    ///
    /// Returns a [`BindError`] when there are too many positional values, a
    /// parameter receives two values, a named value matches nothing and no
    /// collector exists, a parameter without default stays unbound, or the
    /// signature itself repeats a parameter name.
    pub fn bind(&self, args: &Arguments) -> Result<BoundArguments, BindError> {
        self.validate()?;
        let mut positional = args.positional().iter();
        let mut slots: IndexMap<String, Option<Value>> = self
            .parameters
            .iter()
            .map(|p| (p.name.clone(), None))
            .collect();

        for slot in slots.values_mut() {
            match positional.next() {
                Some(value) => *slot = Some(value.clone()),
                None => break,
            }
        }

        let rest: Vec<Value> = positional.cloned().collect();
        if !rest.is_empty() && !self.accepts_varargs() {
            return Err(BindError::TooManyPositional {
                expected: self.arity(),
                given: args.positional().len(),
            });
        }

        let mut collected = Kwargs::new();
        for (key, value) in args.named_values() {
            match slots.get_mut(key) {
                Some(Some(_)) => {
                    return Err(BindError::MultipleValues {
                        parameter: key.clone(),
                    });
                }
                Some(slot) => *slot = Some(value.clone()),
                None if self.accepts_kwargs() => {
                    collected.insert(key.clone(), value.clone());
                }
                None => {
                    return Err(BindError::UnexpectedKeyword {
                        keyword: key.clone(),
                    });
                }
            }
        }

        let values = self
            .parameters
            .iter()
            .map(|param| {
                slots
                    .swap_remove(&param.name)
                    .flatten()
                    .or_else(|| param.default.clone())
                    .map(|value| (param.name.clone(), value))
                    .ok_or_else(|| BindError::Missing {
                        parameter: param.name.clone(),
                    })
            })
            .collect::<Result<IndexMap<_, _>, _>>()?;

        Ok(BoundArguments {
            values,
            varargs: Varargs(rest),
            kwargs: collected,
        })
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts: Vec<String> = self.parameters.iter().map(ToString::to_string).collect();
        if let Some(name) = &self.varargs {
            parts.push(format!("*{name}"));
        }
        if let Some(name) = &self.kwargs {
            parts.push(format!("**{name}"));
        }
        f.write_str(&parts.join(", "))
    }
}

/// Reasons a call cannot be bound to a [`Signature`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BindError {
    #[error("expected at most {expected} positional arguments, got {given}")]
    TooManyPositional { expected: usize, given: usize },

    #[error("missing required argument '{parameter}'")]
    Missing { parameter: String },

    #[error("got multiple values for argument '{parameter}'")]
    MultipleValues { parameter: String },

    #[error("unexpected keyword argument '{keyword}'")]
    UnexpectedKeyword { keyword: String },

    #[error("duplicate parameter '{parameter}' in signature")]
    DuplicateParameter { parameter: String },
}

/// Arguments bound to the parameters of a [`Signature`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoundArguments {
    values: IndexMap<String, Value>,
    varargs: Varargs,
    kwargs: Kwargs,
}

impl BoundArguments {
    /// Value bound to a named parameter.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Value bound to the parameter at `index`.
    pub fn at(&self, index: usize) -> Option<&Value> {
        self.values.get_index(index).map(|(_, value)| value)
    }

    /// Values of the named parameters, in declaration order.
    pub fn values(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Positional tail.
    pub const fn varargs(&self) -> &Varargs {
        &self.varargs
    }

    /// Collected named values.
    pub const fn kwargs(&self) -> &Kwargs {
        &self.kwargs
    }

    /// Same values, keyed by the parameter names of `signature`, by position.
    pub fn relabel(&self, signature: &Signature) -> Self {
        let values = signature
            .required()
            .zip(self.values.values())
            .map(|(name, value)| (name.to_string(), value.clone()))
            .collect();
        Self {
            values,
            varargs: self.varargs.clone(),
            kwargs: self.kwargs.clone(),
        }
    }
}
