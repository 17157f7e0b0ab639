// src/hal/mod.rs
//! Hardware abstraction layer for simulated test instruments

pub mod simulation;
pub mod simulator;
pub mod traits;
pub mod types;


pub use simulator::{AcquisitionSession, SessionStatus};
pub use traits::*;
pub use types::*;
