//! Composition root of an interactive pomodoro session. [Session] wires the
//! [ProjectRegistry], the [IntervalTimer] and the [Visualizer] together and owns the once per
//! second tick schedule.
//!
//! Time is only attributed to the active project while the timer is in the work phase. That rule
//! lives here and not in the timer, which knows nothing about projects.

pub mod attention;
pub mod command;
pub mod confirmation;
pub mod countdown;
pub mod input;
pub mod shutdown;

use std::{sync::Arc, time::Duration};

use anyhow::Result;
use attention::Attention;
use command::{UserCommand, HELP};
use confirmation::Confirmation;
use countdown::CountdownDisplay;
use input::LineInput;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::{
    chart::{ChartRenderer, Visualizer},
    projects::{registry::ProjectRegistry, store::KeyValueStore},
    timer::{IntervalTimer, TimerEvent},
    utils::clock::Clock,
};

pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Minutes credited to the active project for one work tick.
pub const TICK_MINUTES: f64 = 1. / 60.;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct Session<S, R> {
    registry: ProjectRegistry<S>,
    timer: IntervalTimer,
    visualizer: Visualizer<R>,
    confirmation: Box<dyn Confirmation>,
    attention: Box<dyn Attention>,
    countdown: Box<dyn CountdownDisplay>,
    clock: Arc<dyn Clock>,
    next_tick: Option<Instant>,
}

impl<S: KeyValueStore, R: ChartRenderer> Session<S, R> {
    pub fn new(
        registry: ProjectRegistry<S>,
        timer: IntervalTimer,
        visualizer: Visualizer<R>,
        confirmation: Box<dyn Confirmation>,
        attention: Box<dyn Attention>,
        countdown: Box<dyn CountdownDisplay>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            registry,
            timer,
            visualizer,
            confirmation,
            attention,
            countdown,
            clock,
            next_tick: None,
        }
    }

    pub fn registry(&self) -> &ProjectRegistry<S> {
        &self.registry
    }

    pub fn timer(&self) -> &IntervalTimer {
        &self.timer
    }

    /// Deadline of the next tick, `None` while the timer is stopped.
    pub fn next_tick(&self) -> Option<Instant> {
        self.next_tick
    }

    pub async fn handle(&mut self, command: UserCommand) -> Result<Flow> {
        debug!("Handling {command}");
        match command {
            UserCommand::Start => {
                self.start_timer();
                self.show_countdown();
            }
            UserCommand::Pause => {
                if self.timer.pause() {
                    self.next_tick = None;
                }
                self.show_countdown();
            }
            UserCommand::Reset => {
                self.timer.reset();
                self.next_tick = None;
                self.show_countdown();
            }
            UserCommand::Select(name) => {
                self.registry.select_active(name);
                self.show_countdown();
            }
            UserCommand::Add(name) => {
                self.registry.add_project(&name).await?;
                self.render();
            }
            UserCommand::Chart => self.render(),
            UserCommand::Status => self.show_countdown(),
            UserCommand::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    /// Delivers one elapsed second to the timer and reacts to what happened. Returns
    /// [Flow::Quit] when `shutdown` is cancelled while a finished phase waits for acknowledgment.
    pub async fn advance(&mut self, shutdown: &CancellationToken) -> Result<Flow> {
        self.next_tick = self.next_tick.map(|deadline| deadline + TICK_INTERVAL);
        for event in self.timer.tick() {
            if self.on_timer_event(event, shutdown).await? == Flow::Quit {
                return Ok(Flow::Quit);
            }
        }
        Ok(Flow::Continue)
    }

    async fn on_timer_event(
        &mut self,
        event: TimerEvent,
        shutdown: &CancellationToken,
    ) -> Result<Flow> {
        match event {
            TimerEvent::Tick { phase, .. } => {
                if phase.accrues_time() {
                    // A failed save shouldn't stop the countdown; the next tick saves again.
                    if let Err(e) = self.registry.add_elapsed(TICK_MINUTES).await {
                        error!("Failed to save elapsed time {e:?}");
                    }
                    self.render();
                }
                self.show_countdown();
            }
            TimerEvent::SessionComplete { finished, next } => {
                info!("Finished {finished} session, {next} is up next");
                self.next_tick = None;
                self.attention.ring_alarm();
                self.render();
                self.show_countdown();

                let message = finished.completion_message();
                self.attention.request_focus(message);
                tokio::select! {
                    result = self.confirmation.confirm(message) => result?,
                    _ = shutdown.cancelled() => {
                        info!("Shutdown requested before {message:?} was acknowledged");
                        return Ok(Flow::Quit);
                    }
                }

                self.start_timer();
                self.show_countdown();
            }
        }
        Ok(Flow::Continue)
    }

    /// Processes user input and ticks until the input closes, `quit` is entered or `shutdown`
    /// is cancelled.
    pub async fn run(&mut self, input: Arc<LineInput>, shutdown: CancellationToken) -> Result<()> {
        self.render();
        self.show_countdown();

        loop {
            let clock = self.clock.clone();
            let deadline = self.next_tick;

            tokio::select! {
                _ = shutdown.cancelled() => {
                    info!("Shutdown requested");
                    break;
                }
                line = input.next_line() => {
                    let Some(line) = line? else {
                        info!("Input closed");
                        break;
                    };
                    match line.parse::<UserCommand>() {
                        Ok(command) => {
                            if self.handle(command).await? == Flow::Quit {
                                break;
                            }
                        }
                        Err(e) => println!("{e}"),
                    }
                }
                _ = wait_for_tick(clock.as_ref(), deadline) => {
                    if self.advance(&shutdown).await? == Flow::Quit {
                        break;
                    }
                }
            }
        }

        if self.timer.pause() {
            self.next_tick = None;
        }
        Ok(())
    }

    pub fn print_help(&self) {
        println!("{HELP}");
    }

    fn start_timer(&mut self) {
        if self.timer.start() {
            self.next_tick = Some(self.clock.instant() + TICK_INTERVAL);
        }
    }

    fn render(&mut self) {
        if let Err(e) = self.visualizer.render(self.registry.totals()) {
            warn!("Failed to render chart {e:?}");
        }
    }

    fn show_countdown(&mut self) {
        self.countdown
            .show(&self.timer.state(), self.registry.active());
    }
}

async fn wait_for_tick(clock: &dyn Clock, deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => clock.sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}
