//! Inter-task communication
//!
//! The station link task publishes operator inputs here; the control task
//! reads them through the board's panel and gamepad views.

use baton_drivers::station::StationState;

/// Latest operator inputs, disabled until the first valid frame
pub static STATION: StationState = StationState::new();
