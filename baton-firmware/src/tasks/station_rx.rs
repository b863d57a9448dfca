//! Station link receive task
//!
//! Decodes status frames from the operator station and publishes them.
//! When no valid frame arrives for [`LINK_TIMEOUT_MS`] the robot is
//! disabled with every input released.

use baton_drivers::station::StationParser;
use defmt::*;
use embassy_rp::uart::BufferedUartRx;
use embassy_time::{with_timeout, Duration, Instant};
use embedded_io_async::Read;

use crate::channels::STATION;

/// Buffer size for UART receive
const RX_BUF_SIZE: usize = 64;

/// Silence after which the link counts as lost
pub const LINK_TIMEOUT_MS: u64 = 250;

#[embassy_executor::task]
pub async fn station_rx_task(mut rx: BufferedUartRx) {
    info!("Station RX task started");

    let mut parser = StationParser::new();
    let mut buf = [0u8; RX_BUF_SIZE];
    let timeout = Duration::from_millis(LINK_TIMEOUT_MS);
    let mut last_frame = Instant::now();
    let mut connected = false;

    loop {
        match with_timeout(timeout, rx.read(&mut buf)).await {
            Ok(Ok(n)) => {
                trace!("RX: {} bytes", n);
                for &byte in &buf[..n] {
                    match parser.feed(byte) {
                        Ok(Some(report)) => {
                            STATION.apply(&report);
                            last_frame = Instant::now();
                            if !connected {
                                info!("Station link up");
                                connected = true;
                            }
                        }
                        Ok(None) => {}
                        Err(e) => warn!("Station frame error: {}", e),
                    }
                }
            }
            Ok(Err(e)) => warn!("UART read error: {}", e),
            Err(_) => {}
        }

        if connected && last_frame.elapsed() > timeout {
            warn!("Station link lost, disabling");
            STATION.mark_stale();
            parser.reset();
            connected = false;
        }
    }
}
