//! Control task
//!
//! Follows the station's control word and runs one scheduler pass per tick.

use baton_robot::Robot;
use defmt::*;

use super::tick::TICK_SIGNAL;
use crate::board::Board;
use crate::channels::STATION;

#[embassy_executor::task]
pub async fn control_task(robot: &'static mut Robot<Board>, period_ms: u32) {
    info!("Control task started");

    let mut mode = robot.mode();
    let mut last_ms: Option<u32> = None;

    loop {
        let now_ms = TICK_SIGNAL.wait().await;
        if let Some(last) = last_ms {
            let gap = now_ms.wrapping_sub(last);
            if gap > period_ms * 2 {
                warn!("Control loop overran: {} ms since last tick", gap);
            }
        }
        last_ms = Some(now_ms);

        let next = robot.poll_mode(&STATION);
        if next != mode {
            info!("Mode {} -> {}", mode, next);
            mode = next;
        }

        let report = robot.tick();
        trace!("Tick {} at {} ms", report.tick, now_ms);
    }
}
