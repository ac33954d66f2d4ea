//! Event declarations and the per-type registry.
//!
//! A publisher type lists its events once, in [`Publisher::declare`]. The
//! resulting [`Registry`] is built on first use, cached process-wide by
//! [`TypeId`], and shared by every dispatcher of that type.
//!
//! Inheritance is explicit: a type embedding another publisher calls
//! [`Declarations::inherit`] with a lens to the embedded value. Inherited
//! declarations keep their default reaction, run against the embedded value.
//! A type's own declaration of a name always wins over an inherited one, in
//! whatever order `declare` and `inherit` are called.
//!
//! ```
//! use herald_events::{Declarations, Publisher, Registry, Signature};
//!
//! #[derive(Default)]
//! struct Door {
//!     opened: u32,
//! }
//!
//! impl Publisher for Door {
//!     fn declare(events: &mut Declarations<Self>) {
//!         events
//!             .declare("on_open", Signature::new())
//!             .reacts(|door: &mut Self, _| door.opened += 1);
//!     }
//! }
//!
//! #[derive(Default)]
//! struct AlarmedDoor {
//!     door: Door,
//! }
//!
//! impl Publisher for AlarmedDoor {
//!     fn declare(events: &mut Declarations<Self>) {
//!         events.inherit::<Door>(|d| &mut d.door);
//!         events.declare("on_alarm", Signature::new().param("level"));
//!     }
//! }
//!
//! let registry = Registry::<AlarmedDoor>::of();
//! assert!(registry.contains("on_open"));
//! assert!(registry.contains("on_alarm"));
//! ```

use std::any::{Any, TypeId};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::{Arc, OnceLock};

use indexmap::IndexMap;
use indexmap::map::Entry;
use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::args::Arguments;
use crate::error::{Error, Result};
use crate::listener::{HandlerResult, IntoHandlerResult};
use crate::signature::{BoundArguments, Signature};

/// Default reaction of an event, run against the publisher value.
pub type Reaction<P> = Arc<dyn Fn(&mut P, &BoundArguments) -> HandlerResult + Send + Sync>;

/// A type that declares events.
pub trait Publisher: Sized + 'static {
    /// Register this type's events, own and inherited.
    fn declare(events: &mut Declarations<Self>);

    /// Descriptive text of the type, used for generated documentation.
    fn description() -> Option<&'static str> {
        None
    }
}

/// One declared event.
pub struct EventDecl<P> {
    name: String,
    signature: Signature,
    doc: Option<String>,
    declared_by: &'static str,
    reaction: Reaction<P>,
}

impl<P> Clone for EventDecl<P> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            signature: self.signature.clone(),
            doc: self.doc.clone(),
            declared_by: self.declared_by,
            reaction: Arc::clone(&self.reaction),
        }
    }
}

impl<P: 'static> EventDecl<P> {
    fn new(name: String, signature: Signature, declared_by: &'static str) -> Self {
        Self {
            name,
            signature,
            doc: None,
            declared_by,
            reaction: Arc::new(|_: &mut P, _: &BoundArguments| -> HandlerResult { Ok(()) }),
        }
    }

    /// Event name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared signature, without the publisher itself.
    pub const fn signature(&self) -> &Signature {
        &self.signature
    }

    /// Descriptive text, if any.
    pub fn doc(&self) -> Option<&str> {
        self.doc.as_deref()
    }

    /// Name of the type that declared this event.
    pub const fn declared_by(&self) -> &'static str {
        self.declared_by
    }

    /// Attach descriptive text.
    pub fn describe(&mut self, text: impl Into<String>) -> &mut Self {
        self.doc = Some(text.into());
        self
    }

    /// Set the default reaction. Without one, `handle` only validates arguments.
    pub fn reacts<F, R>(&mut self, reaction: F) -> &mut Self
    where
        F: Fn(&mut P, &BoundArguments) -> R + Send + Sync + 'static,
        R: IntoHandlerResult,
    {
        self.reaction = Arc::new(move |publisher: &mut P, bound: &BoundArguments| {
            reaction(publisher, bound).into_handler_result()
        });
        self
    }

    /// Bind `args` to the declared signature and run the default reaction.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ArgumentBinding`] when `args` do not fit the
    /// signature and [`Error::Reaction`] when the reaction fails.
    pub fn react(&self, publisher: &mut P, args: &Arguments) -> Result<()> {
        let bound = self
            .signature
            .bind(args)
            .map_err(|e| Error::argument_binding(self.name.clone(), e))?;
        (self.reaction)(publisher, &bound).map_err(|e| Error::reaction(self.name.clone(), e))
    }

    fn lift<C: 'static>(&self, lens: fn(&mut C) -> &mut P) -> EventDecl<C> {
        let inner = Arc::clone(&self.reaction);
        EventDecl {
            name: self.name.clone(),
            signature: self.signature.clone(),
            doc: self.doc.clone(),
            declared_by: self.declared_by,
            reaction: Arc::new(move |child: &mut C, bound: &BoundArguments| inner(lens(child), bound)),
        }
    }
}

impl<P> fmt::Debug for EventDecl<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventDecl")
            .field("name", &self.name)
            .field("signature", &self.signature)
            .field("declared_by", &self.declared_by)
            .finish_non_exhaustive()
    }
}

/// Collects the declarations of one publisher type.
pub struct Declarations<P> {
    publisher: &'static str,
    events: IndexMap<String, EventDecl<P>>,
    own: HashSet<String>,
}

impl<P: Publisher> Declarations<P> {
    fn new() -> Self {
        Self {
            publisher: std::any::type_name::<P>(),
            events: IndexMap::new(),
            own: HashSet::new(),
        }
    }

    /// Declare an event of this type, replacing any inherited one.
    pub fn declare(&mut self, name: impl Into<String>, signature: Signature) -> &mut EventDecl<P> {
        let name = name.into();
        self.own.insert(name.clone());
        let decl = EventDecl::new(name.clone(), signature, self.publisher);
        match self.events.entry(name) {
            Entry::Occupied(mut entry) => {
                entry.insert(decl);
                entry.into_mut()
            }
            Entry::Vacant(entry) => entry.insert(decl),
        }
    }

    /// Make the events of an embedded publisher visible on this type.
    ///
    /// Names this type declares itself, or already inherited from an earlier
    /// `inherit` call, are left untouched.
    ///
    /// The ancestry must be acyclic. A type that inherits from itself, directly
    /// or through a chain of embedded publishers, re-enters its own registry
    /// while it is being built: the first `Registry::of` call for it never
    /// returns.
    pub fn inherit<Q: Publisher>(&mut self, lens: fn(&mut P) -> &mut Q) -> &mut Self {
        let parent = Registry::<Q>::of();
        for decl in parent.iter() {
            if self.own.contains(decl.name()) || self.events.contains_key(decl.name()) {
                continue;
            }
            self.events.insert(decl.name().to_string(), decl.lift(lens));
        }
        self
    }
}

/// All events visible on a publisher type.
pub struct Registry<P> {
    publisher: &'static str,
    events: IndexMap<String, EventDecl<P>>,
}

type Slot = Arc<OnceLock<Arc<dyn Any + Send + Sync>>>;

/// Global registry cache, one write-once slot per publisher type.
static REGISTRIES: OnceLock<Mutex<HashMap<TypeId, Slot>>> = OnceLock::new();

fn registries() -> &'static Mutex<HashMap<TypeId, Slot>> {
    REGISTRIES.get_or_init(|| Mutex::new(HashMap::new()))
}

impl<P: Publisher> Registry<P> {
    /// Shared registry of `P`, built on first use.
    pub fn of() -> Arc<Self> {
        // The map lock is released before building so that building a
        // subtype can fetch its parents' registries.
        let slot = {
            let mut slots = registries().lock();
            Arc::clone(slots.entry(TypeId::of::<P>()).or_default())
        };

        let cached = slot.get_or_init(|| {
            let registry: Arc<dyn Any + Send + Sync> = Arc::new(Self::build());
            registry
        });

        // Slots are keyed by `TypeId::of::<P>()`; the value is always a `Self`.
        Arc::clone(cached)
            .downcast::<Self>()
            .unwrap_or_else(|_| Arc::new(Self::build()))
    }

    fn build() -> Self {
        let mut declarations = Declarations::<P>::new();
        P::declare(&mut declarations);

        declarations.events.retain(|name, decl| match decl.signature.validate() {
            Ok(()) => true,
            Err(e) => {
                warn!(
                    publisher = declarations.publisher,
                    event = %name,
                    error = %e,
                    "Dropping event with an invalid signature"
                );
                false
            }
        });

        debug!(
            publisher = declarations.publisher,
            events = declarations.events.len(),
            own = declarations.own.len(),
            "Built event registry"
        );

        Self {
            publisher: declarations.publisher,
            events: declarations.events,
        }
    }
}

impl<P> Registry<P> {
    /// Type name of the publisher.
    pub const fn publisher(&self) -> &'static str {
        self.publisher
    }

    /// Declaration of `name`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownEvent`] if no such event is visible.
    pub fn lookup(&self, name: &str) -> Result<&EventDecl<P>> {
        self.events
            .get(name)
            .ok_or_else(|| Error::unknown_event(name, self.publisher))
    }

    /// True if `name` is visible on this type.
    pub fn contains(&self, name: &str) -> bool {
        self.events.contains_key(name)
    }

    /// Names of all visible events.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.events.keys().map(String::as_str)
    }

    /// All visible declarations; inherited events first, in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &EventDecl<P>> {
        self.events.values()
    }

    /// Number of visible events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// True if the type declares no events.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl<P> fmt::Debug for Registry<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("publisher", &self.publisher)
            .field("events", &self.events.keys().collect::<Vec<_>>())
            .finish()
    }
}
