//! Test suites for the dashboard server.

mod support;
mod unit;
