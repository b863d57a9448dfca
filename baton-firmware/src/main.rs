//! Baton - Robot Controller Firmware
//!
//! Main firmware binary for RP2040-based robot controllers. Operator
//! inputs arrive from the station link; the control task runs the command
//! scheduler once per configured tick.

#![no_std]
#![no_main]

extern crate alloc;

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Level, Output};
use embassy_rp::peripherals::UART0;
use embassy_rp::pwm::Pwm;
use embassy_rp::uart::{BufferedInterruptHandler, BufferedUartRx, Config as UartConfig};
use embedded_alloc::LlffHeap as Heap;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use baton_hal_rp2040::servo_config;
use baton_robot::{parse_config, Robot, DEFAULT_CONFIG};

use crate::board::Board;

// Heap allocator for commands and the scheduler tables
#[global_allocator]
static HEAP: Heap = Heap::empty();

// Heap size: 32KB
const HEAP_SIZE: usize = 32 * 1024;

mod board;
mod channels;
mod tasks;

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
});

// Static cells (must live forever for task references)
static RX_BUF: StaticCell<[u8; 256]> = StaticCell::new();
static ROBOT: StaticCell<Robot<Board>> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Baton firmware starting...");

    init_heap();

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    // robot.toml is compiled in and was checked by build.rs
    let config = unwrap!(parse_config(DEFAULT_CONFIG));
    let tick_ms = config.tick_ms;
    info!("Configuration loaded (tick {} ms)", tick_ms);

    // Station link, receive only (115200 baud default)
    let rx_buf = RX_BUF.init([0u8; 256]);
    let rx = BufferedUartRx::new(p.UART0, Irqs, p.PIN_1, rx_buf, UartConfig::default());
    info!("UART initialized for station link");

    let mut board = unwrap!(Board::new());
    unwrap!(board.add_motor_pair(0, Pwm::new_output_ab(p.PWM_SLICE1, p.PIN_2, p.PIN_3, servo_config())));
    unwrap!(board.add_motor_pair(2, Pwm::new_output_ab(p.PWM_SLICE2, p.PIN_4, p.PIN_5, servo_config())));
    unwrap!(board.add_motor_pair(4, Pwm::new_output_ab(p.PWM_SLICE3, p.PIN_6, p.PIN_7, servo_config())));
    unwrap!(board.add_motor_pair(6, Pwm::new_output_ab(p.PWM_SLICE4, p.PIN_8, p.PIN_9, servo_config())));
    unwrap!(board.add_motor_pair(8, Pwm::new_output_ab(p.PWM_SLICE5, p.PIN_10, p.PIN_11, servo_config())));
    unwrap!(board.add_valve(0, Output::new(p.PIN_14, Level::Low)));
    unwrap!(board.add_valve(1, Output::new(p.PIN_15, Level::Low)));
    info!("Outputs initialized at neutral");

    let robot = ROBOT.init(unwrap!(Robot::new(config, &mut board)));
    info!("Robot wired, starting disabled");

    spawner.spawn(tasks::tick_task(tick_ms)).unwrap();
    spawner.spawn(tasks::station_rx_task(rx)).unwrap();
    spawner.spawn(tasks::control_task(robot, tick_ms)).unwrap();

    info!("All tasks spawned, firmware running");
}

/// Initialize the heap allocator
fn init_heap() {
    use core::mem::MaybeUninit;
    static mut HEAP_MEM: [MaybeUninit<u8>; HEAP_SIZE] = [MaybeUninit::uninit(); HEAP_SIZE];
    #[allow(static_mut_refs)]
    unsafe {
        HEAP.init(HEAP_MEM.as_ptr() as usize, HEAP_SIZE)
    }
}
