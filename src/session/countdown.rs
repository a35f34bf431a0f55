use std::io::Write;

use tracing::debug;

use crate::timer::TimerState;

/// Shows the countdown. Called after every tick and every timer command.
pub trait CountdownDisplay {
    fn show(&mut self, state: &TimerState, active_project: Option<&str>);
}

/// Prints one status line per update.
pub struct TerminalCountdown<W> {
    out: W,
}

impl<W: Write> TerminalCountdown<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> CountdownDisplay for TerminalCountdown<W> {
    fn show(&mut self, state: &TimerState, active_project: Option<&str>) {
        let status = if state.running { "" } else { " (paused)" };
        let project = active_project.unwrap_or("no project");
        if let Err(e) = writeln!(
            self.out,
            "{} {}{status} [{project}]",
            state.phase,
            state.display()
        )
        .and_then(|_| self.out.flush())
        {
            debug!("Couldn't update countdown {e:?}");
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::timer::{Phase, TimerState};

    use super::{CountdownDisplay, TerminalCountdown};

    #[test]
    fn test_status_line() {
        let mut countdown = TerminalCountdown::new(vec![]);
        countdown.show(
            &TimerState {
                phase: Phase::Work,
                remaining_seconds: 24 * 60 + 5,
                running: true,
            },
            Some("Alpha"),
        );
        countdown.show(
            &TimerState {
                phase: Phase::Break,
                remaining_seconds: 300,
                running: false,
            },
            None,
        );

        let output = String::from_utf8(countdown.into_inner()).unwrap();
        assert_eq!(output, "work 24:05 [Alpha]\nbreak 05:00 (paused) [no project]\n");
    }
}
