//! Call arguments passed to `notify` and `handle`.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A single argument value.
pub type Value = serde_json::Value;

/// Named arguments, in the order they were supplied.
pub type Kwargs = IndexMap<String, Value>;

/// Positional tail collected by a variadic parameter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Varargs(pub Vec<Value>);

impl Varargs {
    /// Number of collected values.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if nothing was collected.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over the collected values.
    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.0.iter()
    }
}

/// Positional and named values for one call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Arguments {
    positional: Vec<Value>,
    named: Kwargs,
}

impl Arguments {
    /// Empty argument list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from positional values only.
    pub fn from_values<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self {
            positional: values.into_iter().map(Into::into).collect(),
            named: Kwargs::new(),
        }
    }

    /// Append a positional value.
    #[must_use]
    pub fn arg(mut self, value: impl Into<Value>) -> Self {
        self.positional.push(value.into());
        self
    }

    /// Add (or replace) a named value.
    #[must_use]
    pub fn named(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.named.insert(key.into(), value.into());
        self
    }

    /// Positional values in call order.
    pub fn positional(&self) -> &[Value] {
        &self.positional
    }

    /// Named values in call order.
    pub fn named_values(&self) -> &Kwargs {
        &self.named
    }

    /// Total number of values, positional and named.
    pub fn len(&self) -> usize {
        self.positional.len().saturating_add(self.named.len())
    }

    /// True if the call carries no values at all.
    pub fn is_empty(&self) -> bool {
        self.positional.is_empty() && self.named.is_empty()
    }
}

/// Build [`Arguments`] inline.
///
/// ```
/// use herald_events::args;
///
/// let plain = args!["hello", 2];
/// assert_eq!(plain.positional().len(), 2);
///
/// let mixed = args![1; verbose = true];
/// assert_eq!(mixed.named_values().len(), 1);
///
/// let named_only = args![; a = 1, b = 2];
/// assert!(named_only.positional().is_empty());
/// ```
#[macro_export]
macro_rules! args {
    () => {
        $crate::Arguments::new()
    };
    ($($value:expr),* ; $($key:ident = $named:expr),+ $(,)?) => {
        $crate::Arguments::new()
            $(.arg($value))*
            $(.named(stringify!($key), $named))+
    };
    ($($value:expr),+ $(,)?) => {
        $crate::Arguments::new()$(.arg($value))+
    };
}
