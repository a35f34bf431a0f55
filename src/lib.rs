//! Terminal pomodoro timer that keeps track of how many hours go into each project.
//! Work sessions alternate with breaks, every second of work is credited to the active project
//! and the totals are drawn as a bar chart.

pub mod chart;
pub mod cli;
pub mod projects;
pub mod session;
pub mod timer;
pub mod utils;
