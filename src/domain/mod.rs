//! Pure game and PTO logic. Nothing here touches storage, clocks or I/O.

pub mod accrual;
pub mod board;
pub mod form;
pub mod level;
pub mod palette;
pub mod ports;
pub mod pto;
pub mod session;
pub mod snapshot;
