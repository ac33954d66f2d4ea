//! Declared events for plain Rust types.
//!
//! A publisher type declares its events once, each with a name, a parameter
//! signature and an optional default reaction. Every value of that type can
//! then be wrapped in a [`Dispatcher`] that keeps its own list of listeners.
//!
//! - **Registry**: per-type declarations, built once and cached
//! - **Inheritance**: a type embedding another publisher inherits its events
//! - **Listeners**: typed closures and observer objects, shape-checked at connect time
//! - **Dispatch**: `handle` runs the default reaction, `notify` calls listeners
//!
//! # Example
//!
//! ```
//! use std::cell::RefCell;
//! use std::rc::Rc;
//! use herald_events::{args, Declarations, Dispatcher, Publisher, Signature, Value};
//!
//! #[derive(Default)]
//! struct Kettle {
//!     boiled: u32,
//! }
//!
//! impl Publisher for Kettle {
//!     fn declare(events: &mut Declarations<Self>) {
//!         events
//!             .declare("on_boil", Signature::new().param("temperature"))
//!             .describe("The water reached its boiling point.")
//!             .reacts(|kettle: &mut Self, _| kettle.boiled += 1);
//!     }
//! }
//!
//! # fn main() -> herald_events::Result<()> {
//! let mut kettle = Dispatcher::new(Kettle::default());
//! let heard = Rc::new(RefCell::new(Vec::new()));
//! let sink = Rc::clone(&heard);
//! kettle.connect("on_boil", move |temperature: Value| sink.borrow_mut().push(temperature))?;
//!
//! kettle.handle("on_boil", &args![100])?;
//! kettle.notify("on_boil", &args![100])?;
//!
//! assert_eq!(kettle.boiled, 1);
//! assert_eq!(heard.borrow().len(), 1);
//! # Ok(())
//! # }
//! ```

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod args;
pub mod dispatcher;
pub mod error;
pub mod listener;
pub mod registry;
pub mod shape;
pub mod signature;

// Re-export main types
pub use args::{Arguments, Kwargs, Value, Varargs};
pub use dispatcher::Dispatcher;
pub use error::{Error, Result};
pub use listener::{
    Connection, Detach, HandlerResult, IntoHandlerResult, IntoListener, Listener, Observer,
};
pub use registry::{Declarations, EventDecl, Publisher, Reaction, Registry};
pub use shape::Shape;
pub use signature::{BindError, BoundArguments, Parameter, Signature};
