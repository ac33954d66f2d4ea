//! Per-instance connection table and event firing.
//!
//! A [`Dispatcher`] wraps one publisher value. It keeps the listeners
//! connected to that value and fires its events in two independent ways:
//!
//! - [`Dispatcher::handle`] runs the publisher's own default reaction;
//! - [`Dispatcher::notify`] calls every connected listener, in connection order.
//!
//! Neither implies the other. Call both, in the order the situation needs.
//!
//! Connecting, disconnecting and notifying take `&self`, so a listener holding
//! the dispatcher (e.g. through `Rc`) may call them while a notification is in
//! progress. `notify` works on a snapshot of the listeners taken before the
//! first call.

use std::cell::RefCell;
use std::ops::{Deref, DerefMut};
use std::rc::Rc;
use std::sync::Arc;

use tracing::{debug, trace};

use crate::args::Arguments;
use crate::error::{Error, Result};
use crate::listener::{Connection, Detach, IntoListener, Listener, Observer};
use crate::registry::{Publisher, Registry};
use crate::shape;

/// A publisher value together with its connected listeners.
pub struct Dispatcher<P: Publisher> {
    publisher: P,
    registry: Arc<Registry<P>>,
    connections: RefCell<Vec<Connection>>,
}

impl<P: Publisher> Dispatcher<P> {
    /// Wrap a publisher value. No listeners are connected.
    pub fn new(publisher: P) -> Self {
        Self {
            publisher,
            registry: Registry::of(),
            connections: RefCell::new(Vec::new()),
        }
    }

    /// Registry of the publisher type.
    pub fn registry(&self) -> &Registry<P> {
        &self.registry
    }

    /// The wrapped publisher.
    pub const fn publisher(&self) -> &P {
        &self.publisher
    }

    /// The wrapped publisher, mutably.
    pub fn publisher_mut(&mut self) -> &mut P {
        &mut self.publisher
    }

    /// Unwrap the publisher, dropping every connection.
    pub fn into_inner(self) -> P {
        self.publisher
    }

    /// Connect one listener to `event`.
    ///
    /// # Errors
    ///
    /// Fails with `UnknownEvent`, `UnsupportedCallableKind` or
    /// `SignatureMismatch`; nothing is connected in that case.
    pub fn connect<M>(&self, event: &str, listener: impl IntoListener<M>) -> Result<()> {
        self.connect_many([(event, listener.into_listener())])
            .map(|_| ())
    }

    /// Connect several listeners at once, by event name.
    ///
    /// All candidates are validated before any is connected: a single bad
    /// name or shape rejects the whole call.
    ///
    /// # Errors
    ///
    /// Fails with `UnknownEvent`, `UnsupportedCallableKind` or
    /// `SignatureMismatch`.
    pub fn connect_many<'a, I>(&self, listeners: I) -> Result<usize>
    where
        I: IntoIterator<Item = (&'a str, Listener)>,
    {
        let staged = listeners
            .into_iter()
            .map(|(event, listener)| {
                self.validate(event, &listener)?;
                Ok(Connection::new(event, listener))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(self.commit(staged))
    }

    /// Connect every handler `observer` exposes for this publisher's events.
    ///
    /// Events the observer has no handler for are skipped. Handlers it does
    /// expose are shape-checked; one mismatch rejects the whole call.
    ///
    /// # Errors
    ///
    /// Fails with `UnsupportedCallableKind` or `SignatureMismatch`.
    pub fn connect_observer<O: Observer>(&self, observer: &Rc<O>) -> Result<usize> {
        let staged = self
            .registry
            .names()
            .filter_map(|event| observer.listener(event).map(|listener| (event, listener)))
            .map(|(event, listener)| {
                self.validate(event, &listener)?;
                Ok(Connection::from_observer(event, listener, observer))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(self.commit(staged))
    }

    /// Remove every connection made with `target`.
    ///
    /// `target` is a [`Listener`] (matched by identity, clones included) or
    /// an `Rc` of an observer. Returns the number of removed connections.
    pub fn disconnect(&self, target: &impl Detach) -> usize {
        let mut connections = self.connections.borrow_mut();
        let before = connections.len();
        connections.retain(|connection| !target.detaches(connection));
        let removed = before.saturating_sub(connections.len());

        debug!(
            publisher = self.registry.publisher(),
            removed,
            remaining = connections.len(),
            "Disconnected listeners"
        );
        removed
    }

    /// Call every listener connected to `event`, in connection order.
    ///
    /// `args` are bound once to the event's declared signature, exactly as
    /// [`Dispatcher::handle`] binds them, and every listener receives the
    /// bound values by position. With no listener connected nothing is bound.
    ///
    /// The first failing listener aborts the notification and its error is
    /// returned; later listeners are not called.
    ///
    /// # Errors
    ///
    /// Fails with `UnknownEvent`, `ArgumentBinding` when `args` do not fit
    /// the declared signature, or the first listener's `Listener` error.
    pub fn notify(&self, event: &str, args: &Arguments) -> Result<()> {
        let decl = self.registry.lookup(event)?;

        let snapshot: Vec<Listener> = self
            .connections
            .borrow()
            .iter()
            .filter(|connection| connection.event() == event)
            .map(|connection| connection.listener().clone())
            .collect();

        trace!(
            publisher = self.registry.publisher(),
            event,
            listeners = snapshot.len(),
            "Notifying listeners"
        );

        if snapshot.is_empty() {
            return Ok(());
        }

        let bound = decl
            .signature()
            .bind(args)
            .map_err(|e| Error::argument_binding(event, e))?;

        snapshot
            .iter()
            .try_for_each(|listener| listener.call(event, &bound))
    }

    /// Run the default reaction of `event` on the wrapped publisher.
    ///
    /// Connected listeners are not called.
    ///
    /// # Errors
    ///
    /// Fails with `UnknownEvent`, `ArgumentBinding` when `args` do not fit
    /// the declared signature, or `Reaction` when the reaction fails.
    pub fn handle(&mut self, event: &str, args: &Arguments) -> Result<()> {
        let registry = Arc::clone(&self.registry);
        let decl = registry.lookup(event)?;

        trace!(publisher = registry.publisher(), event, "Handling event");
        decl.react(&mut self.publisher, args)
    }

    /// Number of listeners connected to `event`.
    pub fn connection_count(&self, event: &str) -> usize {
        self.connections
            .borrow()
            .iter()
            .filter(|connection| connection.event() == event)
            .count()
    }

    /// Snapshot of the connection table, in connection order.
    pub fn connections(&self) -> Vec<Connection> {
        self.connections.borrow().clone()
    }

    /// True if any connection was made with `target`.
    pub fn is_connected(&self, target: &impl Detach) -> bool {
        self.connections
            .borrow()
            .iter()
            .any(|connection| target.detaches(connection))
    }

    fn validate(&self, event: &str, listener: &Listener) -> Result<()> {
        let decl = self.registry.lookup(event)?;
        let candidate = listener.introspect(event)?;
        shape::check(event, decl.signature(), candidate)
    }

    fn commit(&self, staged: Vec<Connection>) -> usize {
        let added = staged.len();
        let mut connections = self.connections.borrow_mut();
        for connection in &staged {
            debug!(
                publisher = self.registry.publisher(),
                event = connection.event(),
                from_observer = connection.is_from_observer(),
                "Connected listener"
            );
        }
        connections.extend(staged);
        added
    }
}

impl<P: Publisher + Default> Default for Dispatcher<P> {
    fn default() -> Self {
        Self::new(P::default())
    }
}

impl<P: Publisher> Deref for Dispatcher<P> {
    type Target = P;

    fn deref(&self) -> &P {
        &self.publisher
    }
}

impl<P: Publisher> DerefMut for Dispatcher<P> {
    fn deref_mut(&mut self) -> &mut P {
        &mut self.publisher
    }
}

impl<P: Publisher + std::fmt::Debug> std::fmt::Debug for Dispatcher<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("publisher", &self.publisher)
            .field("connections", &self.connections.borrow())
            .finish()
    }
}
