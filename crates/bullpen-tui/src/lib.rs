// Bullpen grader front end: command-line handlers and the terminal viewer.

pub mod app;
pub mod cli;
pub mod tui;
