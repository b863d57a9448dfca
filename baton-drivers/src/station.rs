//! Operator station link
//!
//! The operator station (driver laptop or field radio bridge) streams a
//! status report over UART every control period. The report carries the
//! control word, both button devices and the gamepad axes.
//!
//! Frame format:
//! ```text
//! ┌───────┬────────┬──────┬─────────────┬──────────┐
//! │ START │ LENGTH │ TYPE │ PAYLOAD     │ CHECKSUM │
//! │ 0xA5  │ 1B     │ 1B   │ 0–16B       │ 1B       │
//! └───────┴────────┴──────┴─────────────┴──────────┘
//! ```
//! CHECKSUM is the XOR of LENGTH, TYPE and every payload byte.
//!
//! Status payload (type 0x01, 11 bytes):
//! - flags: bit 0 enabled, bit 1 autonomous
//! - panel buttons, u16 little-endian, bit n = button n+1
//! - gamepad buttons, u16 little-endian, bit n = button n+1
//! - six axes, i8 each, ±127 = full scale

use core::sync::atomic::{AtomicI8, AtomicU16, AtomicU8, Ordering};

use baton_hal::{AxisInput, ButtonInput, ControlWord, ModeSource};
use heapless::Vec;

/// Frame synchronization byte
pub const FRAME_START: u8 = 0xA5;

/// Largest payload the link carries
pub const MAX_PAYLOAD: usize = 16;

/// Message type of a status report
pub const MSG_STATUS: u8 = 0x01;

/// Payload length of a status report
pub const STATUS_LEN: usize = 11;

/// Axes carried by a status report
pub const STATION_AXES: usize = 6;

const FLAG_ENABLED: u8 = 0x01;
const FLAG_AUTONOMOUS: u8 = 0x02;

/// Link errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkError {
    /// Declared payload length exceeds the link maximum
    #[error("payload too long")]
    TooLong,
    /// Checksum mismatch
    #[error("checksum mismatch")]
    Checksum,
    /// Message type not understood
    #[error("unknown message type {0}")]
    UnknownType(u8),
    /// Payload length does not match the message type
    #[error("bad payload length")]
    BadLength,
    /// Output buffer too small for encoding
    #[error("buffer too small")]
    BufferTooSmall,
}

fn checksum(length: u8, msg_type: u8, payload: &[u8]) -> u8 {
    payload.iter().fold(length ^ msg_type, |acc, byte| acc ^ byte)
}

/// Operator inputs from one status report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StationReport {
    pub control: ControlWord,
    /// Panel buttons, bit n = button n+1
    pub panel: u16,
    /// Gamepad buttons, bit n = button n+1
    pub pad: u16,
    pub axes: [i8; STATION_AXES],
}

impl StationReport {
    /// Decode a status payload
    pub fn from_payload(payload: &[u8]) -> Result<Self, LinkError> {
        if payload.len() != STATUS_LEN {
            return Err(LinkError::BadLength);
        }
        let flags = payload[0];
        let mut axes = [0i8; STATION_AXES];
        for (axis, byte) in axes.iter_mut().zip(&payload[5..]) {
            *axis = *byte as i8;
        }
        Ok(Self {
            control: ControlWord {
                enabled: flags & FLAG_ENABLED != 0,
                autonomous: flags & FLAG_AUTONOMOUS != 0,
            },
            panel: u16::from_le_bytes([payload[1], payload[2]]),
            pad: u16::from_le_bytes([payload[3], payload[4]]),
            axes,
        })
    }

    /// Encode a complete status frame; returns the bytes written
    pub fn encode(&self, buffer: &mut [u8]) -> Result<usize, LinkError> {
        let frame_len = STATUS_LEN + 4;
        if buffer.len() < frame_len {
            return Err(LinkError::BufferTooSmall);
        }

        let mut payload = [0u8; STATUS_LEN];
        payload[0] = (self.control.enabled as u8) * FLAG_ENABLED
            | (self.control.autonomous as u8) * FLAG_AUTONOMOUS;
        payload[1..3].copy_from_slice(&self.panel.to_le_bytes());
        payload[3..5].copy_from_slice(&self.pad.to_le_bytes());
        for (byte, axis) in payload[5..].iter_mut().zip(self.axes) {
            *byte = axis as u8;
        }

        let length = STATUS_LEN as u8;
        buffer[0] = FRAME_START;
        buffer[1] = length;
        buffer[2] = MSG_STATUS;
        buffer[3..3 + STATUS_LEN].copy_from_slice(&payload);
        buffer[3 + STATUS_LEN] = checksum(length, MSG_STATUS, &payload);
        Ok(frame_len)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParseState {
    WaitingForStart,
    WaitingForLength,
    WaitingForType,
    ReadingPayload,
    WaitingForChecksum,
}

/// Byte-at-a-time status frame parser
///
/// Bytes before a START byte are skipped, so the parser resynchronizes on
/// its own after line noise.
#[derive(Debug, Clone)]
pub struct StationParser {
    state: ParseState,
    payload: Vec<u8, MAX_PAYLOAD>,
    length: u8,
    msg_type: u8,
}

impl Default for StationParser {
    fn default() -> Self {
        Self::new()
    }
}

impl StationParser {
    pub fn new() -> Self {
        Self {
            state: ParseState::WaitingForStart,
            payload: Vec::new(),
            length: 0,
            msg_type: 0,
        }
    }

    pub fn reset(&mut self) {
        self.state = ParseState::WaitingForStart;
        self.payload.clear();
        self.length = 0;
        self.msg_type = 0;
    }

    /// Feed one byte; yields a report when a valid frame completes
    pub fn feed(&mut self, byte: u8) -> Result<Option<StationReport>, LinkError> {
        match self.state {
            ParseState::WaitingForStart => {
                if byte == FRAME_START {
                    self.state = ParseState::WaitingForLength;
                }
                Ok(None)
            }
            ParseState::WaitingForLength => {
                if usize::from(byte) > MAX_PAYLOAD {
                    self.reset();
                    return Err(LinkError::TooLong);
                }
                self.length = byte;
                self.state = ParseState::WaitingForType;
                Ok(None)
            }
            ParseState::WaitingForType => {
                self.msg_type = byte;
                self.payload.clear();
                self.state = if self.length == 0 {
                    ParseState::WaitingForChecksum
                } else {
                    ParseState::ReadingPayload
                };
                Ok(None)
            }
            ParseState::ReadingPayload => {
                // Capacity checked against the declared length
                let _ = self.payload.push(byte);
                if self.payload.len() == usize::from(self.length) {
                    self.state = ParseState::WaitingForChecksum;
                }
                Ok(None)
            }
            ParseState::WaitingForChecksum => {
                let expected = checksum(self.length, self.msg_type, &self.payload);
                let msg_type = self.msg_type;
                let result = if byte != expected {
                    Err(LinkError::Checksum)
                } else if msg_type != MSG_STATUS {
                    Err(LinkError::UnknownType(msg_type))
                } else {
                    StationReport::from_payload(&self.payload).map(Some)
                };
                self.reset();
                result
            }
        }
    }
}

/// Latest operator inputs, shared between the link task and the control
/// loop
///
/// Starts disabled with every input released.
pub struct StationState {
    flags: AtomicU8,
    panel: AtomicU16,
    pad: AtomicU16,
    axes: [AtomicI8; STATION_AXES],
}

impl Default for StationState {
    fn default() -> Self {
        Self::new()
    }
}

impl StationState {
    pub const fn new() -> Self {
        Self {
            flags: AtomicU8::new(0),
            panel: AtomicU16::new(0),
            pad: AtomicU16::new(0),
            axes: [const { AtomicI8::new(0) }; STATION_AXES],
        }
    }

    /// Publish a report
    pub fn apply(&self, report: &StationReport) {
        self.panel.store(report.panel, Ordering::Relaxed);
        self.pad.store(report.pad, Ordering::Relaxed);
        for (slot, value) in self.axes.iter().zip(report.axes) {
            slot.store(value, Ordering::Relaxed);
        }
        let flags = (report.control.enabled as u8) * FLAG_ENABLED
            | (report.control.autonomous as u8) * FLAG_AUTONOMOUS;
        self.flags.store(flags, Ordering::Release);
    }

    /// Drop to disabled with every input released, after the link goes
    /// quiet
    pub fn mark_stale(&self) {
        self.apply(&StationReport::default());
    }

    /// Button panel view
    pub fn panel(&self) -> StationPanel<'_> {
        StationPanel { state: self }
    }

    /// Gamepad view
    pub fn gamepad(&self) -> StationPad<'_> {
        StationPad { state: self }
    }
}

impl ModeSource for StationState {
    fn control_word(&self) -> ControlWord {
        let flags = self.flags.load(Ordering::Acquire);
        ControlWord {
            enabled: flags & FLAG_ENABLED != 0,
            autonomous: flags & FLAG_AUTONOMOUS != 0,
        }
    }
}

fn bit(mask: u16, port: u8, count: u8) -> bool {
    (1..=count).contains(&port) && mask & (1 << (port - 1)) != 0
}

/// Operator panel buttons from the station
#[derive(Clone, Copy)]
pub struct StationPanel<'a> {
    state: &'a StationState,
}

impl ButtonInput for StationPanel<'_> {
    fn button_count(&self) -> u8 {
        16
    }

    fn button(&self, port: u8) -> bool {
        bit(self.state.panel.load(Ordering::Relaxed), port, self.button_count())
    }
}

/// Driver gamepad from the station
#[derive(Clone, Copy)]
pub struct StationPad<'a> {
    state: &'a StationState,
}

impl ButtonInput for StationPad<'_> {
    fn button_count(&self) -> u8 {
        16
    }

    fn button(&self, port: u8) -> bool {
        bit(self.state.pad.load(Ordering::Relaxed), port, self.button_count())
    }
}

impl AxisInput for StationPad<'_> {
    fn axis(&self, index: u8) -> f32 {
        self.state
            .axes
            .get(usize::from(index))
            .map_or(0.0, |raw| (raw.load(Ordering::Relaxed) as f32 / 127.0).clamp(-1.0, 1.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report() -> StationReport {
        StationReport {
            control: ControlWord::teleop(),
            panel: 0b1000_0000_0000_0001,
            pad: 1 << 5,
            axes: [0, 127, -127, 0, 64, -128],
        }
    }

    fn parse(bytes: &[u8]) -> Result<Option<StationReport>, LinkError> {
        let mut parser = StationParser::new();
        for &byte in bytes {
            if let Some(report) = parser.feed(byte)? {
                return Ok(Some(report));
            }
        }
        Ok(None)
    }

    #[test]
    fn test_frame_layout() {
        let mut buf = [0u8; 20];
        let len = report().encode(&mut buf).unwrap();

        assert_eq!(len, 15);
        assert_eq!(buf[0], FRAME_START);
        assert_eq!(buf[1], STATUS_LEN as u8);
        assert_eq!(buf[2], MSG_STATUS);
        assert_eq!(buf[3], FLAG_ENABLED);
        assert_eq!(&buf[4..6], &[0x01, 0x80]);
    }

    #[test]
    fn test_parse_after_garbage() {
        let mut buf = [0u8; 19];
        buf[..4].copy_from_slice(&[0x00, 0x13, 0xFF, 0x42]);
        report().encode(&mut buf[4..]).unwrap();

        assert_eq!(parse(&buf), Ok(Some(report())));
    }

    #[test]
    fn test_bad_checksum() {
        let mut buf = [0u8; 15];
        report().encode(&mut buf).unwrap();
        buf[14] ^= 0xFF;

        assert_eq!(parse(&buf), Err(LinkError::Checksum));
    }

    #[test]
    fn test_rejects_oversized_length() {
        assert_eq!(parse(&[FRAME_START, 200]), Err(LinkError::TooLong));
    }

    #[test]
    fn test_unknown_type() {
        // Empty payload of type 0x7F; checksum = 0 ^ 0x7F
        assert_eq!(
            parse(&[FRAME_START, 0, 0x7F, 0x7F]),
            Err(LinkError::UnknownType(0x7F))
        );
    }

    #[test]
    fn test_state_views() {
        let state = StationState::new();
        assert_eq!(state.control_word(), ControlWord::disabled());

        state.apply(&report());
        let panel = state.panel();
        let pad = state.gamepad();

        assert_eq!(state.control_word(), ControlWord::teleop());
        assert!(panel.button(1));
        assert!(!panel.button(2));
        assert!(panel.button(16));
        assert!(!panel.button(0));
        assert!(!panel.button(17));
        assert!(pad.button(6));
        assert_eq!(pad.axis(1), 1.0);
        assert_eq!(pad.axis(2), -1.0);
        assert_eq!(pad.axis(5), -1.0);
        assert_eq!(pad.axis(9), 0.0);
    }

    #[test]
    fn test_stale_link_disables() {
        let state = StationState::new();
        state.apply(&report());
        state.mark_stale();

        assert_eq!(state.control_word(), ControlWord::disabled());
        assert!(!state.panel().button(1));
        assert_eq!(state.gamepad().axis(1), 0.0);
    }
}
