//! Sample publishers used by the `herald` binary.
//!
//! [`Thermostat`] declares a handful of events with every parameter style;
//! [`SmartThermostat`] embeds one, inherits its events and overrides
//! `on_reading`. [`Panel`] is an observer that records what it sees.

use std::cell::RefCell;
use std::rc::Rc;

use anyhow::Context;
use herald_events::{
    args, BoundArguments, Declarations, Dispatcher, Kwargs, Listener, Observer, Publisher,
    Signature, Value, Varargs,
};
use tracing::info;

fn celsius(bound: &BoundArguments) -> anyhow::Result<f64> {
    bound
        .get("celsius")
        .and_then(Value::as_f64)
        .context("celsius must be a number")
}

/// A thermostat that switches heating on below its target temperature.
#[derive(Debug, Clone, PartialEq)]
pub struct Thermostat {
    pub target: f64,
    pub heating: bool,
    pub readings: Vec<f64>,
    pub faults: Vec<Value>,
}

impl Default for Thermostat {
    fn default() -> Self {
        Self {
            target: 20.0,
            heating: false,
            readings: Vec::new(),
            faults: Vec::new(),
        }
    }
}

impl Thermostat {
    fn record(&mut self, reading: f64) {
        self.readings.push(reading);
        self.heating = reading < self.target;
    }
}

impl Publisher for Thermostat {
    fn declare(events: &mut Declarations<Self>) {
        events
            .declare("on_reading", Signature::new().param("celsius"))
            .describe("A new temperature reading, in degrees Celsius, arrived from the sensor.")
            .reacts(|thermostat: &mut Self, bound| -> anyhow::Result<()> {
                thermostat.record(celsius(bound)?);
                Ok(())
            });
        events
            .declare(
                "on_target_changed",
                Signature::new()
                    .param("target")
                    .param_with_default("reason", Value::Null),
            )
            .describe(
                "The target temperature changed.  The optional reason is free text \
                 supplied by whoever made the change.",
            )
            .reacts(|thermostat: &mut Self, bound| -> anyhow::Result<()> {
                thermostat.target = bound
                    .get("target")
                    .and_then(Value::as_f64)
                    .context("target must be a number")?;
                Ok(())
            });
        events
            .declare("on_fault", Signature::new().varargs("codes"))
            .describe("The sensor reported one or more fault codes.")
            .reacts(|thermostat: &mut Self, bound| {
                thermostat.faults.extend(bound.varargs().iter().cloned());
            });
        events
            .declare("on_reset", Signature::new())
            .describe("Readings and faults were cleared.")
            .reacts(|thermostat: &mut Self, _| {
                thermostat.readings.clear();
                thermostat.faults.clear();
                thermostat.heating = false;
            });
    }

    fn description() -> Option<&'static str> {
        Some(
            "
            A thermostat driving a single heating circuit.

            {events}

            Heating is switched on whenever a reading falls below the target.
            ",
        )
    }
}

/// A thermostat that also follows a schedule and keeps a running average.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SmartThermostat {
    pub thermostat: Thermostat,
    pub schedule: Kwargs,
    pub average: Option<f64>,
}

impl Publisher for SmartThermostat {
    fn declare(events: &mut Declarations<Self>) {
        events
            .declare("on_reading", Signature::new().param("celsius"))
            .describe(
                "A new temperature reading arrived.  Also updates the running \
                 average used for learning.",
            )
            .reacts(|smart: &mut Self, bound| -> anyhow::Result<()> {
                let reading = celsius(bound)?;
                smart.thermostat.record(reading);
                let total: f64 = smart.thermostat.readings.iter().sum();
                #[allow(clippy::cast_precision_loss)]
                let count = smart.thermostat.readings.len() as f64;
                smart.average = Some(total / count);
                Ok(())
            });
        events.inherit::<Thermostat>(|smart| &mut smart.thermostat);
        events
            .declare("on_schedule", Signature::new().kwargs("entries"))
            .describe("The heating schedule was replaced.")
            .reacts(|smart: &mut Self, bound| smart.schedule = bound.kwargs().clone());
    }

    fn description() -> Option<&'static str> {
        Some(
            "
            A thermostat that follows a schedule.

            {events}
            ",
        )
    }
}

/// Observer recording readings and faults as text lines.
#[derive(Debug, Default)]
pub struct Panel {
    lines: RefCell<Vec<String>>,
}

impl Panel {
    /// Lines recorded so far.
    pub fn lines(&self) -> Vec<String> {
        self.lines.borrow().clone()
    }

    fn push(&self, line: String) {
        info!(line = %line, "Panel updated");
        self.lines.borrow_mut().push(line);
    }
}

impl Observer for Panel {
    fn listener(self: &Rc<Self>, event: &str) -> Option<Listener> {
        let me = Rc::clone(self);
        match event {
            "on_reading" => Some(Listener::from_fn(move |celsius: Value| {
                me.push(format!("reading {celsius}"));
            })),
            "on_fault" => Some(Listener::from_fn(move |codes: Varargs| {
                let codes: Vec<String> = codes.iter().map(ToString::to_string).collect();
                me.push(format!("fault {}", codes.join(" ")));
            })),
            _ => None,
        }
    }
}

/// Run a scripted walkthrough and return what the panel and the thermostat saw.
///
/// # Errors
///
/// Returns an error if any connect, handle or notify step fails.
pub fn run() -> anyhow::Result<Vec<String>> {
    let mut smart = Dispatcher::new(SmartThermostat::default());
    let panel = Rc::new(Panel::default());

    let connected = smart.connect_observer(&panel)?;
    info!(connected, "Panel connected");

    let targets = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&targets);
    let target_listener = Listener::from_fn(move |target: Value, _reason: Value| {
        sink.borrow_mut().push(format!("target {target}"));
    });
    smart.connect("on_target_changed", target_listener.clone())?;

    for (event, args) in [
        ("on_target_changed", args![21.5, "evening"]),
        ("on_reading", args![19.0]),
        ("on_reading", args![22.0]),
        ("on_fault", args!["E1", "E7"]),
        ("on_schedule", args![; morning = 19, evening = 21.5]),
    ] {
        smart.handle(event, &args)?;
        smart.notify(event, &args)?;
    }

    let removed = smart.disconnect(&panel);
    info!(removed, "Panel disconnected");
    smart.disconnect(&target_listener);

    let mut transcript = panel.lines();
    transcript.extend(targets.borrow().iter().cloned());
    transcript.push(format!(
        "state target={} heating={} average={} schedule={}",
        smart.thermostat.target,
        smart.thermostat.heating,
        smart.average.map_or_else(|| "none".to_string(), |a| a.to_string()),
        smart.schedule.len(),
    ));
    Ok(transcript)
}
