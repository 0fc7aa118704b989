//! Application layer orchestrating the PTO calculator.
//!
//! `PtoCalculator` keeps the form inputs and the projected pay periods in
//! step, and persists them through the snapshot port once edits settle.

pub mod calculator;
pub mod debounce;
