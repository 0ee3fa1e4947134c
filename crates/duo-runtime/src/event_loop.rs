//! Event Loop
//!
//! One iteration per vertical blank: sample hardware, diff against the
//! previous frame, synthesize the implied events, count down timers, then
//! drain the task queue. Runs until no observable work remains or an
//! unhandled failure aborts a non-interactive session.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use duo_events::{Event, EventInit, EventTarget, ScriptError, TaskQueue, types};
use duo_input::{FrameDiff, FrameSampler, SamplerPhase, TouchTransition};

use crate::globals::GlobalScope;
use crate::host::Host;
use crate::report::{ReportSink, TracingSink};
use crate::timers::Timers;

/// Runtime tuning.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuntimeConfig {
    /// Interactive sessions keep the loop alive with no pending work and
    /// survive unhandled failures (a shell prompt owns the session).
    pub interactive: bool,
}

/// The script host runtime: global scope, sampler, timers, and task queue,
/// driven by a [`Host`].
pub struct Runtime<H: Host> {
    host: H,
    scope: Rc<GlobalScope>,
    sampler: FrameSampler,
    timers: Timers,
    tasks: Rc<RefCell<TaskQueue>>,
    sink: Box<dyn ReportSink>,
    interactive: bool,
    abort: bool,
    last_tick: Duration,
}

impl<H: Host> Runtime<H> {
    pub fn new(host: H) -> Self {
        Self::with_config(host, RuntimeConfig::default())
    }

    pub fn with_config(host: H, config: RuntimeConfig) -> Self {
        let last_tick = host.now();
        Self {
            host,
            scope: Rc::new(GlobalScope::new()),
            sampler: FrameSampler::new(),
            timers: Timers::new(),
            tasks: Rc::new(RefCell::new(TaskQueue::new())),
            sink: Box::new(TracingSink),
            interactive: config.interactive,
            abort: false,
            last_tick,
        }
    }

    /// Replace the default reporting sink.
    pub fn set_report_sink(&mut self, sink: Box<dyn ReportSink>) {
        self.sink = sink;
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// The global scope. Script glue clones this to register listeners.
    pub fn scope(&self) -> &Rc<GlobalScope> {
        &self.scope
    }

    /// The timer table. Clones share state with the loop.
    pub fn timers(&self) -> Timers {
        self.timers.clone()
    }

    /// Shared handle to the deferred dispatch queue, for script glue that
    /// needs to enqueue from inside a callback.
    pub fn tasks(&self) -> Rc<RefCell<TaskQueue>> {
        self.tasks.clone()
    }

    pub fn sampler_phase(&self) -> SamplerPhase {
        self.sampler.phase()
    }

    pub fn aborted(&self) -> bool {
        self.abort
    }

    /// Seconds since host startup; the time-stamp origin for events.
    pub fn seconds(&self) -> f64 {
        self.host.now().as_secs_f64()
    }

    /// Queue a dispatch of `event` onto an arbitrary target for the next
    /// task drain.
    pub fn queue_event(&self, target: EventTarget, event: Event) {
        self.tasks.borrow_mut().queue_event(target, Rc::new(event));
    }

    /// Queue a dispatch onto the global scope.
    pub fn queue_global_event(&self, event: Event) {
        self.queue_event(self.scope.target().clone(), event);
    }

    /// Script-facing `dispatchEvent` on the global scope: synchronous, with
    /// listener failures escalated. Returns `true` unless canceled.
    pub fn dispatch_global_event(&mut self, event: &Event) -> bool {
        let outcome = self.scope.dispatch(event);
        self.escalate_all(outcome.failures);
        !outcome.canceled
    }

    /// Report a promise rejection nothing handled. Cancelable through an
    /// `unhandledrejection` listener; otherwise it reaches the sink and
    /// aborts a non-interactive session.
    pub fn report_rejection(&mut self, reason: &str) {
        if self.scope.wants(types::UNHANDLED_REJECTION) {
            let event = Event::rejection(reason).with_time_stamp(self.seconds());
            let outcome = self.scope.dispatch(&event);
            self.escalate_all(outcome.failures);
            if outcome.canceled {
                return;
            }
        }
        self.sink.unhandled_rejection(reason);
        if !self.interactive {
            self.abort = true;
        }
    }

    /// Escalate a script failure: an `error` event first, the sink if no
    /// listener claimed it.
    pub fn raise(&mut self, err: ScriptError) {
        if self.scope.wants(types::ERROR) {
            let event = Event::error(&err).with_time_stamp(self.seconds());
            let outcome = self.scope.dispatch(&event);
            // failures inside error listeners go straight to the sink
            for failure in &outcome.failures {
                self.sink.uncaught_error(failure);
            }
            if outcome.canceled {
                return;
            }
        }
        self.sink.uncaught_error(&err);
        if !self.interactive {
            self.abort = true;
        }
    }

    /// Enter sleep mode unless a `sleep` listener cancels it. This is the
    /// one place a canceled event gates a host side effect.
    pub fn request_sleep(&mut self) {
        let event =
            Event::new(types::SLEEP, EventInit { cancelable: true }).with_time_stamp(self.seconds());
        let outcome = self.scope.dispatch(&event);
        self.escalate_all(outcome.failures);
        if outcome.canceled {
            return;
        }

        self.sampler.suspend();
        self.host.suspend();
        self.sampler.resume();
        self.queue_global_event(Event::simple(types::WAKE).with_time_stamp(self.seconds()));
    }

    /// Stop the script and leave the loop (the `close()` global).
    pub fn request_close(&mut self) {
        self.abort = true;
    }

    /// Power off: stops the loop and forwards to the host.
    pub fn request_shutdown(&mut self) {
        self.abort = true;
        self.host.shutdown();
    }

    /// Run until there is no observable work left or the session aborts.
    pub fn run(&mut self) {
        while !self.abort && (self.interactive || self.has_work()) {
            self.step();
        }
    }

    /// True while any dependent event is observed or tasks/timers pend.
    pub fn has_work(&self) -> bool {
        self.scope.has_dependents()
            || !self.tasks.borrow().is_empty()
            || self.timers.has_pending()
    }

    /// One loop iteration.
    pub fn step(&mut self) {
        self.host.wait_vblank();
        let now = self.host.now();

        let sample = self.host.sample_input();
        if let Some(diff) = self.sampler.tick(sample) {
            self.synthesize_input_events(&diff);
            self.sampler.end_tick();
            if diff.lid_closed {
                self.request_sleep();
            }
        }

        let elapsed = now.saturating_sub(self.last_tick);
        self.last_tick = now;
        self.timers.advance(elapsed.as_millis() as u64);
        let timers = self.timers.clone();
        timers.run_due(|err| self.raise(err));

        self.drain_tasks();
    }

    /// Turn one frame diff into the events scripts asked for.
    fn synthesize_input_events(&mut self, diff: &FrameDiff) {
        let seconds = self.seconds();

        if self.scope.wants(types::VBLANK) {
            self.queue_global_event(Event::simple(types::VBLANK).with_time_stamp(seconds));
        }
        if self.scope.wants(types::BUTTON_DOWN) {
            for button in diff.pressed.iter() {
                self.queue_global_event(
                    Event::button(true, button.name()).with_time_stamp(seconds),
                );
            }
        }
        if self.scope.wants(types::BUTTON_UP) {
            for button in diff.released.iter() {
                self.queue_global_event(
                    Event::button(false, button.name()).with_time_stamp(seconds),
                );
            }
        }

        match diff.touch {
            TouchTransition::Started { x, y } if self.scope.wants(types::TOUCH_START) => {
                self.queue_global_event(Event::touch_start(x, y).with_time_stamp(seconds));
            }
            TouchTransition::Moved { x, y, dx, dy } if self.scope.wants(types::TOUCH_MOVE) => {
                self.queue_global_event(Event::touch_move(x, y, dx, dy).with_time_stamp(seconds));
            }
            TouchTransition::Ended { x, y } if self.scope.wants(types::TOUCH_END) => {
                self.queue_global_event(Event::touch_end(x, y).with_time_stamp(seconds));
            }
            _ => {}
        }

        for key in self.host.drain_keys() {
            let ty = if key.down {
                types::KEY_DOWN
            } else {
                types::KEY_UP
            };
            if self.scope.wants(ty) {
                self.queue_global_event(
                    Event::keyboard(
                        key.down,
                        &key.key,
                        &key.code,
                        key.layout.as_str(),
                        key.repeat,
                        key.shifted,
                    )
                    .with_time_stamp(seconds),
                );
            }
        }
    }

    /// Dispatch the tasks queued before this drain began.
    fn drain_tasks(&mut self) {
        let mut budget = self.tasks.borrow().len();
        while !self.abort {
            let task = self.tasks.borrow_mut().pop_within(&mut budget);
            let Some(task) = task else { break };
            let outcome = if task.target.same_target(self.scope.target()) {
                self.scope.dispatch(&task.event)
            } else {
                task.target.dispatch(&task.event)
            };
            self.escalate_all(outcome.failures);
        }
    }

    fn escalate_all(&mut self, failures: Vec<ScriptError>) {
        for err in failures {
            self.raise(err);
        }
    }
}
