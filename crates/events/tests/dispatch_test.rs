//! End-to-end dispatch scenarios: plain listeners, observers, inherited
//! events, argument binding and listener shape checks.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::cell::RefCell;
use std::rc::Rc;

use herald_events::{
    args, Arguments, BoundArguments, Declarations, Dispatcher, Error, Kwargs, Listener, Observer,
    Publisher, Signature, Value, Varargs,
};

type Notes = Rc<RefCell<Vec<String>>>;

fn text(value: &Value) -> String {
    value
        .as_str()
        .map_or_else(|| value.to_string(), ToString::to_string)
}

#[derive(Default)]
struct ParentPublisher {
    notes: Notes,
}

impl Publisher for ParentPublisher {
    fn declare(events: &mut Declarations<Self>) {
        events
            .declare("on_parent_event", Signature::new().param("message"))
            .reacts(|publisher: &mut Self, args| {
                let message = args.get("message").map(text).unwrap_or_default();
                publisher
                    .notes
                    .borrow_mut()
                    .push(format!("ParentPublisher.on_parent_event({message})"));
            });
        events
            .declare("on_argless_event", Signature::new())
            .reacts(|publisher: &mut Self, _| {
                publisher
                    .notes
                    .borrow_mut()
                    .push("ParentPublisher.on_argless_event()".to_string());
            });
        events
            .declare("on_varargs_event", Signature::new().varargs("varargs"))
            .reacts(|publisher: &mut Self, args| {
                let joined: Vec<String> = args.varargs().iter().map(text).collect();
                publisher
                    .notes
                    .borrow_mut()
                    .push(format!("ParentPublisher.on_varargs_event({})", joined.join(", ")));
            });
        events
            .declare("on_kwargs_event", Signature::new().kwargs("kwargs"))
            .reacts(|publisher: &mut Self, args| {
                let mut pairs: Vec<String> = args
                    .kwargs()
                    .iter()
                    .map(|(key, value)| format!("{key}={}", text(value)))
                    .collect();
                pairs.sort();
                publisher
                    .notes
                    .borrow_mut()
                    .push(format!("ParentPublisher.on_kwargs_event({})", pairs.join(", ")));
            });
    }
}

#[derive(Default)]
struct ChildPublisher {
    parent: ParentPublisher,
}

impl Publisher for ChildPublisher {
    fn declare(events: &mut Declarations<Self>) {
        events.inherit::<ParentPublisher>(|child| &mut child.parent);
        events
            .declare("on_child_event", Signature::new().param("message"))
            .reacts(|publisher: &mut Self, args| {
                let message = args.get("message").map(text).unwrap_or_default();
                publisher
                    .parent
                    .notes
                    .borrow_mut()
                    .push(format!("ChildPublisher.on_child_event({message})"));
            });
    }
}

struct NoteTaker {
    notes: Notes,
}

impl NoteTaker {
    fn on_message(self: &Rc<Self>, label: &'static str) -> Listener {
        let me = Rc::clone(self);
        Listener::from_fn(move |message: Value| {
            me.notes
                .borrow_mut()
                .push(format!("Observer.{label}({})", text(&message)));
        })
    }
}

impl Observer for NoteTaker {
    fn listener(self: &Rc<Self>, event: &str) -> Option<Listener> {
        match event {
            "on_parent_event" => Some(self.on_message("on_parent_event")),
            "on_child_event" => Some(self.on_message("on_child_event")),
            _ => None,
        }
    }
}

fn recorder(notes: &Notes, label: &'static str) -> Listener {
    let sink = Rc::clone(notes);
    Listener::from_fn(move |message: Value| {
        sink.borrow_mut().push(format!("{label}({})", text(&message)));
    })
}

fn fire(publisher: &mut Dispatcher<ParentPublisher>, message: &str) {
    let args = args![message];
    publisher.handle("on_parent_event", &args).unwrap();
    publisher.notify("on_parent_event", &args).unwrap();
}

#[test]
fn test_listener_function() {
    let mut publisher = Dispatcher::<ParentPublisher>::default();
    let notes = Rc::clone(&publisher.notes);
    let observer = recorder(&notes, "observer");

    publisher.connect("on_parent_event", observer.clone()).unwrap();
    fire(&mut publisher, "hello");
    assert_eq!(publisher.disconnect(&observer), 1);
    fire(&mut publisher, "goodbye");

    assert_eq!(
        *notes.borrow(),
        vec![
            "ParentPublisher.on_parent_event(hello)",
            "observer(hello)",
            "ParentPublisher.on_parent_event(goodbye)",
        ]
    );
}

#[test]
fn test_listener_connected_twice_is_called_twice() {
    let mut publisher = Dispatcher::<ParentPublisher>::default();
    let notes = Rc::clone(&publisher.notes);
    let observer = recorder(&notes, "lambda");

    publisher
        .connect_many([
            ("on_parent_event", observer.clone()),
            ("on_parent_event", observer.clone()),
        ])
        .unwrap();
    fire(&mut publisher, "hello");
    assert_eq!(publisher.disconnect(&observer), 2);
    fire(&mut publisher, "goodbye");

    assert_eq!(
        *notes.borrow(),
        vec![
            "ParentPublisher.on_parent_event(hello)",
            "lambda(hello)",
            "lambda(hello)",
            "ParentPublisher.on_parent_event(goodbye)",
        ]
    );
}

#[test]
fn test_observer_object() {
    let mut publisher = Dispatcher::<ParentPublisher>::default();
    let notes = Rc::clone(&publisher.notes);
    let observer = Rc::new(NoteTaker {
        notes: Rc::clone(&notes),
    });

    assert_eq!(publisher.connect_observer(&observer).unwrap(), 1);
    assert!(publisher.is_connected(&observer));
    fire(&mut publisher, "hello");
    assert_eq!(publisher.disconnect(&observer), 1);
    fire(&mut publisher, "goodbye");

    assert_eq!(
        *notes.borrow(),
        vec![
            "ParentPublisher.on_parent_event(hello)",
            "Observer.on_parent_event(hello)",
            "ParentPublisher.on_parent_event(goodbye)",
        ]
    );
}

#[test]
fn test_inherited_events() {
    let mut publisher = Dispatcher::<ChildPublisher>::default();
    let notes = Rc::clone(&publisher.parent.notes);
    let observer = Rc::new(NoteTaker {
        notes: Rc::clone(&notes),
    });

    assert_eq!(publisher.connect_observer(&observer).unwrap(), 2);
    for (event, message) in [("on_parent_event", "hello"), ("on_child_event", "bonjour")] {
        let args = args![message];
        publisher.handle(event, &args).unwrap();
        publisher.notify(event, &args).unwrap();
    }

    assert_eq!(
        *notes.borrow(),
        vec![
            "ParentPublisher.on_parent_event(hello)",
            "Observer.on_parent_event(hello)",
            "ChildPublisher.on_child_event(bonjour)",
            "Observer.on_child_event(bonjour)",
        ]
    );
}

struct ThreeHandlers {
    notes: Notes,
}

impl Observer for ThreeHandlers {
    fn listener(self: &Rc<Self>, event: &str) -> Option<Listener> {
        match event {
            "on_parent_event" | "on_child_event" => Some(recorder(&self.notes, "three")),
            "on_argless_event" => Some(recorder_argless(&self.notes)),
            _ => None,
        }
    }
}

#[test]
fn test_observer_attaches_own_and_inherited_handlers() {
    let publisher = Dispatcher::<ChildPublisher>::default();
    let notes = Rc::clone(&publisher.parent.notes);
    let observer = Rc::new(ThreeHandlers {
        notes: Rc::clone(&notes),
    });

    assert_eq!(publisher.connect_observer(&observer).unwrap(), 3);
    publisher.notify("on_parent_event", &args!["inherited"]).unwrap();
    assert_eq!(*notes.borrow(), vec!["three(inherited)"]);
    assert_eq!(publisher.disconnect(&observer), 3);
}

#[test]
fn test_variadic_reactions_receive_their_values() {
    let mut publisher = Dispatcher::<ChildPublisher>::default();
    let notes = Rc::clone(&publisher.parent.notes);

    publisher.handle("on_varargs_event", &args![1, 2]).unwrap();
    publisher
        .handle("on_kwargs_event", &args![; b = 2, a = 1])
        .unwrap();
    publisher.handle("on_argless_event", &args![]).unwrap();

    assert_eq!(
        *notes.borrow(),
        vec![
            "ParentPublisher.on_varargs_event(1, 2)",
            "ParentPublisher.on_kwargs_event(a=1, b=2)",
            "ParentPublisher.on_argless_event()",
        ]
    );
}

#[test]
fn test_legal_arguments() {
    let mut publisher = Dispatcher::<ChildPublisher>::default();
    let calls: [(&str, Arguments); 7] = [
        ("on_argless_event", args![]),
        ("on_parent_event", args![1]),
        ("on_parent_event", args![; message = 1]),
        ("on_varargs_event", args![]),
        ("on_varargs_event", args![1]),
        ("on_varargs_event", args![1, 2]),
        ("on_kwargs_event", args![; a = 1, b = 2]),
    ];
    for (event, args) in &calls {
        publisher
            .handle(event, args)
            .unwrap_or_else(|e| panic!("{event} with {args:?}: {e}"));
    }
}

#[test]
fn test_illegal_arguments() {
    let mut publisher = Dispatcher::<ChildPublisher>::default();
    let calls: [(&str, Arguments); 7] = [
        ("on_parent_event", args![]),
        ("on_argless_event", args![1, 2]),
        ("on_parent_event", args![1, 2]),
        ("on_kwargs_event", args![1, 2]),
        ("on_argless_event", args![; a = 1, b = 2]),
        ("on_parent_event", args![; a = 1, b = 2]),
        ("on_varargs_event", args![; a = 1, b = 2]),
    ];
    for (event, args) in &calls {
        let err = publisher.handle(event, args).unwrap_err();
        assert!(
            matches!(err, Error::ArgumentBinding { .. }),
            "{event} with {args:?}: {err}"
        );
    }
}

#[test]
fn test_notify_rejects_arguments_the_event_refuses() {
    let publisher = Dispatcher::<ParentPublisher>::default();
    publisher
        .connect("on_parent_event", |_message: Value| ())
        .unwrap();

    let err = publisher.notify("on_parent_event", &args![]).unwrap_err();
    assert_eq!(err.as_label(), "argument_binding");
}

#[derive(Default)]
struct Announcer {
    heard: Notes,
}

impl Publisher for Announcer {
    fn declare(events: &mut Declarations<Self>) {
        events
            .declare(
                "on_announce",
                Signature::new()
                    .param("message")
                    .param_with_default("channel", Value::Null),
            )
            .reacts(|announcer: &mut Self, args| {
                let message = args.get("message").map(text).unwrap_or_default();
                let channel = args.get("channel").map(text).unwrap_or_default();
                announcer
                    .heard
                    .borrow_mut()
                    .push(format!("Announcer.on_announce({message}, {channel})"));
            });
    }
}

fn pair_recorder(notes: &Notes) -> Listener {
    let sink = Rc::clone(notes);
    Listener::from_fn(move |message: Value, channel: Value| {
        sink.borrow_mut()
            .push(format!("listener({}, {})", text(&message), text(&channel)));
    })
}

/// # GIVEN
/// An event with a defaulted parameter and a two-argument listener
///
/// # WHEN
/// The same calls are handled and notified, omitting the default or naming
/// the declared parameters
///
/// # THEN
/// Every call `handle` accepts also reaches the listener, with the defaults
/// filled in and named values in their declared positions
#[test]
fn test_notify_accepts_what_the_declaration_accepts() {
    let mut announcer = Dispatcher::<Announcer>::default();
    let notes = Rc::clone(&announcer.heard);
    announcer
        .connect("on_announce", pair_recorder(&notes))
        .unwrap();

    let calls = [
        args!["doors open"],
        args![; message = "doors open"],
        args![; channel = "lobby", message = "doors open"],
    ];
    for args in &calls {
        announcer.handle("on_announce", args).unwrap();
        announcer
            .notify("on_announce", args)
            .unwrap_or_else(|e| panic!("notify with {args:?}: {e}"));
    }

    assert_eq!(
        *notes.borrow(),
        vec![
            "Announcer.on_announce(doors open, null)",
            "listener(doors open, null)",
            "Announcer.on_announce(doors open, null)",
            "listener(doors open, null)",
            "Announcer.on_announce(doors open, lobby)",
            "listener(doors open, lobby)",
        ]
    );
}

#[test]
fn test_named_argument_reaches_one_argument_listener() {
    let publisher = Dispatcher::<ParentPublisher>::default();
    let notes = Rc::clone(&publisher.notes);
    publisher
        .connect("on_parent_event", recorder(&notes, "listener"))
        .unwrap();

    publisher
        .notify("on_parent_event", &args![; message = "hi"])
        .unwrap();
    assert_eq!(*notes.borrow(), vec!["listener(hi)"]);
}

#[test]
fn test_unknown_event() {
    let mut publisher = Dispatcher::<ParentPublisher>::default();
    let err = publisher.handle("on_child_event", &args!["x"]).unwrap_err();
    assert!(matches!(err, Error::UnknownEvent { .. }));

    let err = publisher.notify("on_child_event", &args!["x"]).unwrap_err();
    assert!(matches!(err, Error::UnknownEvent { .. }));

    let err = publisher.connect("on_child_event", |_m: Value| ()).unwrap_err();
    assert!(matches!(err, Error::UnknownEvent { .. }));
}

fn argless() -> Listener {
    Listener::from_fn(|| ())
}
fn one_arg() -> Listener {
    Listener::from_fn(|_arg: Value| ())
}
fn variadic() -> Listener {
    Listener::from_fn(|_varargs: Varargs| ())
}
fn keywords() -> Listener {
    Listener::from_fn(|_kwargs: Kwargs| ())
}

#[test]
fn test_matching_listeners_connect() {
    let publisher = Dispatcher::<ChildPublisher>::default();
    publisher.connect("on_argless_event", argless()).unwrap();
    publisher.connect("on_parent_event", one_arg()).unwrap();
    publisher.connect("on_varargs_event", variadic()).unwrap();
    publisher.connect("on_kwargs_event", keywords()).unwrap();
    assert_eq!(publisher.connections().len(), 4);
}

#[test]
fn test_mismatched_listeners_are_rejected() {
    let publisher = Dispatcher::<ChildPublisher>::default();
    let cases: [(&str, fn() -> Listener); 10] = [
        ("on_parent_event", argless),
        ("on_varargs_event", argless),
        ("on_kwargs_event", argless),
        ("on_argless_event", one_arg),
        ("on_varargs_event", one_arg),
        ("on_kwargs_event", one_arg),
        ("on_parent_event", variadic),
        ("on_kwargs_event", variadic),
        ("on_parent_event", keywords),
        ("on_varargs_event", keywords),
    ];
    for (event, make) in cases {
        let err = publisher.connect(event, make()).unwrap_err();
        assert!(
            matches!(err, Error::SignatureMismatch { .. }),
            "{event}: {err}"
        );
    }
    assert!(publisher.connections().is_empty());
}

#[test]
fn test_opaque_listener_is_rejected() {
    let publisher = Dispatcher::<ParentPublisher>::default();
    let err = publisher
        .connect("on_argless_event", Listener::opaque(|_: &BoundArguments| ()))
        .unwrap_err();
    assert!(matches!(err, Error::UnsupportedCallableKind { .. }));
}

struct WrongShape;

impl Observer for WrongShape {
    fn listener(self: &Rc<Self>, event: &str) -> Option<Listener> {
        match event {
            "on_argless_event" => Some(argless()),
            "on_parent_event" => Some(argless()),
            _ => None,
        }
    }
}

#[test]
fn test_observer_with_wrong_shape_connects_nothing() {
    let publisher = Dispatcher::<ParentPublisher>::default();
    let observer = Rc::new(WrongShape);

    let err = publisher.connect_observer(&observer).unwrap_err();
    assert!(matches!(err, Error::SignatureMismatch { .. }));
    assert!(publisher.connections().is_empty());
    assert!(!publisher.is_connected(&observer));
}

#[test]
fn test_listener_failure_stops_notification() {
    let publisher = Dispatcher::<ParentPublisher>::default();
    let notes = Rc::clone(&publisher.notes);

    publisher
        .connect("on_argless_event", || -> anyhow::Result<()> {
            anyhow::bail!("listener refused")
        })
        .unwrap();
    publisher
        .connect("on_argless_event", recorder_argless(&notes))
        .unwrap();

    let err = publisher.notify("on_argless_event", &args![]).unwrap_err();
    assert!(matches!(err, Error::Listener { .. }));
    assert!(notes.borrow().is_empty());
}

fn recorder_argless(notes: &Notes) -> Listener {
    let sink = Rc::clone(notes);
    Listener::from_fn(move || sink.borrow_mut().push("late".to_string()))
}
