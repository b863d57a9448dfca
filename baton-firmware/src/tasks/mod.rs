//! Embassy async tasks
//!
//! Each task runs independently and communicates via signals and the
//! shared station state.

pub mod control;
pub mod station_rx;
pub mod tick;

pub use control::control_task;
pub use station_rx::station_rx_task;
pub use tick::tick_task;
