//! Listener/event compatibility.
//!
//! A listener may only be connected to an event whose [`Shape`] is exactly
//! its own: same number of named parameters, same positional tail, same named
//! collector. A listener that could merely *accept* the event's arguments
//! (say, `*args` listening to a one-parameter event) is still rejected.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::signature::Signature;

/// Arity and variadic profile of a callable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Shape {
    pub arity: usize,
    pub varargs: bool,
    pub kwargs: bool,
}

impl Shape {
    /// Create a shape.
    pub const fn new(arity: usize, varargs: bool, kwargs: bool) -> Self {
        Self {
            arity,
            varargs,
            kwargs,
        }
    }

    /// True if a listener of shape `self` may listen to an event of shape `event`.
    pub const fn matches(self, event: Self) -> bool {
        self.arity == event.arity && self.varargs == event.varargs && self.kwargs == event.kwargs
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} positional", self.arity)?;
        if self.varargs {
            f.write_str(", *args")?;
        }
        if self.kwargs {
            f.write_str(", **kwargs")?;
        }
        Ok(())
    }
}

/// Validate a listener signature against the signature declared by `event`.
///
/// # Errors
///
/// Returns [`Error::InvalidSignature`] when the candidate repeats a parameter
/// name, and [`Error::SignatureMismatch`] naming both shapes when they differ.
pub fn check(event: &str, declared: &Signature, candidate: &Signature) -> Result<()> {
    candidate
        .validate()
        .map_err(|e| Error::invalid_signature(event, e))?;
    let expected = declared.shape();
    let found = candidate.shape();
    if found.matches(expected) {
        Ok(())
    } else {
        Err(Error::signature_mismatch(event, expected, found))
    }
}
