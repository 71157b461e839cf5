// Control state machine: await -> receive -> run -> stop
//
// The outer switch runs at most once per tick (1 Hz). Receiving drains every
// byte that is already waiting, and running drains the whole queue, so a
// single step can take several seconds.

use std::time::Duration;

use tokio::time::{Instant, sleep};
use tracing::{debug, info};

use super::state::{ControlState, Event};
use crate::command::{CommandQueue, CommandSource, TokenParser, demo_path};
use crate::config::{ControlConfig, DrainPolicy, TICK_PERIOD};
use crate::motor::{MotorDriveLoop, MotorOutput, MotorSpeeds};

/// Lets the state machine advance once per elapsed tick period
#[derive(Debug)]
pub struct TickGate {
    epoch: Instant,
    period: Duration,
    last: u128,
}

impl TickGate {
    pub fn new(period: Duration) -> Self {
        Self {
            epoch: Instant::now(),
            period,
            last: 0,
        }
    }

    /// Index of the tick period `now` falls into
    fn tick_at(&self, now: Instant) -> u128 {
        now.duration_since(self.epoch).as_nanos() / self.period.as_nanos().max(1)
    }

    /// True if `now` is in a different tick than the last evaluation
    pub fn is_due(&self, now: Instant) -> bool {
        self.tick_at(now) != self.last
    }

    /// Remember `now` as the tick that was evaluated
    pub fn mark(&mut self, now: Instant) {
        self.last = self.tick_at(now);
    }
}

pub struct ControlStateMachine<S, O> {
    state: ControlState,
    queue: CommandQueue,
    parser: TokenParser,
    drive: MotorDriveLoop<O>,
    source: S,
    config: ControlConfig,
    last_input: Instant,
    gate: TickGate,
}

impl<S: CommandSource, O: MotorOutput> ControlStateMachine<S, O> {
    pub fn new(source: S, output: O, config: ControlConfig) -> Self {
        Self {
            state: ControlState::default(),
            queue: CommandQueue::new(),
            parser: TokenParser::new(),
            drive: MotorDriveLoop::with_period(output, config.ramp_period),
            source,
            config,
            last_input: Instant::now(),
            gate: TickGate::new(TICK_PERIOD),
        }
    }

    /// Run one step if a new tick has started since the last one
    ///
    /// The tick is sampled before the step, so a step that overruns the tick
    /// period lets the next poll run straight away.
    pub async fn poll(&mut self) -> bool {
        let now = Instant::now();
        if !self.gate.is_due(now) {
            return false;
        }
        self.step().await;
        self.gate.mark(now);
        true
    }

    /// Handle the current state once, regardless of the tick gate
    pub async fn step(&mut self) -> ControlState {
        match self.state {
            ControlState::Stopped => {
                self.drive.stop().await;
                self.transition(Event::MotorsHalted);
            }
            ControlState::AwaitingCommands => self.await_commands(),
            ControlState::ReceivingCommands => self.receive_commands(),
            ControlState::RunningProgram => self.run_program().await,
        }
        self.state
    }

    /// Ramp the wheels to rest outside of the normal sequence (shutdown)
    pub async fn halt(&mut self) {
        self.drive.stop().await;
    }

    /// Queue the demo path and run it on the next step
    pub fn load_demo(&mut self) {
        info!("Demo requested");
        self.queue.extend(demo_path());
        self.transition(Event::DemoRequested);
    }

    fn transition(&mut self, event: Event) {
        let next = self.state.next(event);
        if next != self.state {
            info!("State: {} -> {} ({:?})", self.state, next, event);
        }
        self.state = next;
    }

    fn await_commands(&mut self) {
        if self.source.available() {
            self.queue.clear();
            self.parser.reset();
            self.last_input = Instant::now();
            self.transition(Event::InputAvailable);
        }
    }

    fn receive_commands(&mut self) {
        let mut start = false;

        while self.source.available() {
            let Some(byte) = self.source.read_byte() else {
                break;
            };
            let feed = self.parser.feed(byte);
            if let Some(command) = feed.command {
                debug!("Queued command {}", command);
                self.queue.enqueue(command);
            }
            start |= feed.start;
            self.last_input = Instant::now();
        }

        if start {
            info!("Start received, {} command(s) queued", self.queue.len());
            self.transition(Event::Terminator);
        } else if self.last_input.elapsed() > self.config.receive_timeout {
            info!(
                "No input for {}ms, starting with {} command(s)",
                self.config.receive_timeout.as_millis(),
                self.queue.len()
            );
            self.transition(Event::ReceiveTimeout);
        }
    }

    async fn run_program(&mut self) {
        while let Some(angle) = self.queue.dequeue() {
            info!("--> {}", angle);
            self.drive
                .move_to(angle as f64, self.config.execution_speed)
                .await;
            sleep(self.config.command_dwell).await;

            if self.config.drain == DrainPolicy::InterruptOnInput
                && self.queue.has_pending()
                && self.source.available()
            {
                info!("New input, dropping {} queued command(s)", self.queue.len());
                self.queue.clear();
            }
        }

        self.drive.stop().await;
        info!("Program finished");
        self.transition(Event::QueueDrained);
    }

    pub fn state(&self) -> ControlState {
        self.state
    }

    pub fn queue(&self) -> &CommandQueue {
        &self.queue
    }

    pub fn speeds(&self) -> MotorSpeeds {
        self.drive.speeds()
    }

    pub fn drive(&self) -> &MotorDriveLoop<O> {
        &self.drive
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }
}
