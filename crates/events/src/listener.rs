//! Listeners, observers and the connections that tie them to events.
//!
//! A [`Listener`] is a callback plus the [`Signature`] it was built from.
//! Typed closures describe themselves through [`IntoListener`]:
//!
//! ```text
//! || ..                          -> ()
//! |a: Value| ..                  -> (arg0)
//! |a: Value, b: Value| ..        -> (arg0, arg1)
//! |rest: Varargs| ..             -> (*args)
//! |options: Kwargs| ..           -> (**kwargs)
//! |a: Value, rest: Varargs| ..   -> (arg0, *args)
//! ```
//!
//! Callbacks with any other calling convention go through
//! [`Listener::new`] with an explicit signature. [`Listener::opaque`] wraps a
//! callback without any description; such a listener is refused at connect
//! time.

use std::any::Any;
use std::fmt;
use std::rc::Rc;

use crate::args::{Kwargs, Value, Varargs};
use crate::error::{Error, Result};
use crate::signature::{BoundArguments, Signature};

/// Outcome of a listener or default reaction.
pub type HandlerResult = anyhow::Result<()>;

type Callback = dyn Fn(&BoundArguments) -> HandlerResult;

/// Return types accepted from callbacks.
pub trait IntoHandlerResult {
    fn into_handler_result(self) -> HandlerResult;
}

impl IntoHandlerResult for () {
    fn into_handler_result(self) -> HandlerResult {
        Ok(())
    }
}

impl<E> IntoHandlerResult for std::result::Result<(), E>
where
    E: Into<anyhow::Error>,
{
    fn into_handler_result(self) -> HandlerResult {
        self.map_err(Into::into)
    }
}

/// A callable that can be connected to an event.
///
/// Cloning is cheap and preserves identity: a clone disconnects the
/// connections made with the original.
#[derive(Clone)]
pub struct Listener {
    signature: Option<Signature>,
    callback: Rc<Callback>,
}

impl Listener {
    /// Listener with an explicit signature.
    pub fn new<F, R>(signature: Signature, callback: F) -> Self
    where
        F: Fn(&BoundArguments) -> R + 'static,
        R: IntoHandlerResult,
    {
        Self {
            signature: Some(signature),
            callback: Rc::new(move |bound: &BoundArguments| callback(bound).into_handler_result()),
        }
    }

    /// Listener without parameter metadata.
    pub fn opaque<F, R>(callback: F) -> Self
    where
        F: Fn(&BoundArguments) -> R + 'static,
        R: IntoHandlerResult,
    {
        Self {
            signature: None,
            callback: Rc::new(move |bound: &BoundArguments| callback(bound).into_handler_result()),
        }
    }

    /// Listener from a typed closure.
    pub fn from_fn<M>(callback: impl IntoListener<M>) -> Self {
        callback.into_listener()
    }

    /// Signature, if the listener carries one.
    pub const fn signature(&self) -> Option<&Signature> {
        self.signature.as_ref()
    }

    /// Signature used when connecting to `event`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedCallableKind`] for opaque listeners.
    pub fn introspect(&self, event: &str) -> Result<&Signature> {
        self.signature
            .as_ref()
            .ok_or_else(|| Error::unsupported_callable(event))
    }

    /// Invoke the listener as a notification of `event`.
    ///
    /// `bound` holds the call arguments already bound to the event's declared
    /// signature. Values reach the listener by position, under its own
    /// parameter names; the tails are passed unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Listener`] if the callback fails.
    pub fn call(&self, event: &str, bound: &BoundArguments) -> Result<()> {
        let result = match &self.signature {
            Some(signature) => (self.callback)(&bound.relabel(signature)),
            None => (self.callback)(bound),
        };
        result.map_err(|e| Error::listener(event, e))
    }

    /// True if both values refer to the same callback.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        std::ptr::addr_eq(Rc::as_ptr(&self.callback), Rc::as_ptr(&other.callback))
    }
}

impl fmt::Debug for Listener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listener")
            .field("signature", &self.signature)
            .field("callback", &Rc::as_ptr(&self.callback).cast::<()>())
            .finish()
    }
}

/// Conversion into a [`Listener`], deriving the signature from the type.
///
/// `Marker` only disambiguates the implementations; it is inferred.
pub trait IntoListener<Marker> {
    fn into_listener(self) -> Listener;
}

impl IntoListener<Listener> for Listener {
    fn into_listener(self) -> Listener {
        self
    }
}

fn positional(bound: &BoundArguments, index: usize) -> Value {
    bound.at(index).cloned().unwrap_or_default()
}

fn fixed(arity: usize) -> Signature {
    (0..arity).fold(Signature::new(), |sig, i| sig.param(format!("arg{i}")))
}

impl<F, R> IntoListener<fn() -> R> for F
where
    F: Fn() -> R + 'static,
    R: IntoHandlerResult,
{
    fn into_listener(self) -> Listener {
        Listener::new(fixed(0), move |_: &BoundArguments| self())
    }
}

impl<F, R> IntoListener<fn(Value) -> R> for F
where
    F: Fn(Value) -> R + 'static,
    R: IntoHandlerResult,
{
    fn into_listener(self) -> Listener {
        Listener::new(fixed(1), move |b: &BoundArguments| self(positional(b, 0)))
    }
}

impl<F, R> IntoListener<fn(Value, Value) -> R> for F
where
    F: Fn(Value, Value) -> R + 'static,
    R: IntoHandlerResult,
{
    fn into_listener(self) -> Listener {
        Listener::new(fixed(2), move |b: &BoundArguments| {
            self(positional(b, 0), positional(b, 1))
        })
    }
}

impl<F, R> IntoListener<fn(Value, Value, Value) -> R> for F
where
    F: Fn(Value, Value, Value) -> R + 'static,
    R: IntoHandlerResult,
{
    fn into_listener(self) -> Listener {
        Listener::new(fixed(3), move |b: &BoundArguments| {
            self(positional(b, 0), positional(b, 1), positional(b, 2))
        })
    }
}

impl<F, R> IntoListener<fn(Varargs) -> R> for F
where
    F: Fn(Varargs) -> R + 'static,
    R: IntoHandlerResult,
{
    fn into_listener(self) -> Listener {
        Listener::new(fixed(0).varargs("args"), move |b: &BoundArguments| {
            self(b.varargs().clone())
        })
    }
}

impl<F, R> IntoListener<fn(Kwargs) -> R> for F
where
    F: Fn(Kwargs) -> R + 'static,
    R: IntoHandlerResult,
{
    fn into_listener(self) -> Listener {
        Listener::new(fixed(0).kwargs("kwargs"), move |b: &BoundArguments| {
            self(b.kwargs().clone())
        })
    }
}

impl<F, R> IntoListener<fn(Value, Varargs) -> R> for F
where
    F: Fn(Value, Varargs) -> R + 'static,
    R: IntoHandlerResult,
{
    fn into_listener(self) -> Listener {
        Listener::new(fixed(1).varargs("args"), move |b: &BoundArguments| {
            self(positional(b, 0), b.varargs().clone())
        })
    }
}

impl<F, R> IntoListener<fn(Value, Kwargs) -> R> for F
where
    F: Fn(Value, Kwargs) -> R + 'static,
    R: IntoHandlerResult,
{
    fn into_listener(self) -> Listener {
        Listener::new(fixed(1).kwargs("kwargs"), move |b: &BoundArguments| {
            self(positional(b, 0), b.kwargs().clone())
        })
    }
}

impl<F, R> IntoListener<fn(Varargs, Kwargs) -> R> for F
where
    F: Fn(Varargs, Kwargs) -> R + 'static,
    R: IntoHandlerResult,
{
    fn into_listener(self) -> Listener {
        Listener::new(
            fixed(0).varargs("args").kwargs("kwargs"),
            move |b: &BoundArguments| self(b.varargs().clone(), b.kwargs().clone()),
        )
    }
}

/// An object exposing handlers by event name.
///
/// Connecting an observer asks it, for every event the publisher declares,
/// for a listener of that name; events it answers `None` for are skipped.
///
/// ```
/// use std::cell::RefCell;
/// use std::rc::Rc;
/// use herald_events::{Listener, Observer, Value};
///
/// #[derive(Default)]
/// struct Journal {
///     lines: RefCell<Vec<String>>,
/// }
///
/// impl Observer for Journal {
///     fn listener(self: &Rc<Self>, event: &str) -> Option<Listener> {
///         let me = Rc::clone(self);
///         match event {
///             "on_message" => Some(Listener::from_fn(move |message: Value| {
///                 me.lines.borrow_mut().push(message.to_string());
///             })),
///             _ => None,
///         }
///     }
/// }
/// ```
pub trait Observer: 'static {
    /// Handler for `event`, if this observer implements one.
    fn listener(self: &Rc<Self>, event: &str) -> Option<Listener>;
}

/// One listener attached to one event of one dispatcher.
#[derive(Clone)]
pub struct Connection {
    event: String,
    listener: Listener,
    source: Option<Rc<dyn Any>>,
}

impl Connection {
    pub(crate) fn new(event: impl Into<String>, listener: Listener) -> Self {
        Self {
            event: event.into(),
            listener,
            source: None,
        }
    }

    pub(crate) fn from_observer<O: Observer>(
        event: impl Into<String>,
        listener: Listener,
        observer: &Rc<O>,
    ) -> Self {
        let source: Rc<dyn Any> = Rc::clone(observer) as Rc<dyn Any>;
        Self {
            event: event.into(),
            listener,
            source: Some(source),
        }
    }

    /// Name of the event listened to.
    pub fn event(&self) -> &str {
        &self.event
    }

    /// The connected listener.
    pub const fn listener(&self) -> &Listener {
        &self.listener
    }

    /// True if the listener was obtained from an observer.
    pub const fn is_from_observer(&self) -> bool {
        self.source.is_some()
    }
}

impl fmt::Debug for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connection")
            .field("event", &self.event)
            .field("listener", &self.listener)
            .field("from_observer", &self.is_from_observer())
            .finish()
    }
}

/// Values accepted by `Dispatcher::disconnect`.
pub trait Detach {
    /// True if `connection` was made with this value.
    fn detaches(&self, connection: &Connection) -> bool;
}

impl Detach for Listener {
    fn detaches(&self, connection: &Connection) -> bool {
        connection.listener.ptr_eq(self)
    }
}

impl<O: Observer> Detach for Rc<O> {
    fn detaches(&self, connection: &Connection) -> bool {
        connection
            .source
            .as_ref()
            .is_some_and(|source| std::ptr::addr_eq(Rc::as_ptr(source), Rc::as_ptr(self)))
    }
}
