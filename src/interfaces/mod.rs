//! Front ends that feed primitive input into the core and render its output.

pub mod csv;
pub mod terminal;
