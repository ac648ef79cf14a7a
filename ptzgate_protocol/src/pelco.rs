//! Pelco-D serial frames.
//!
//! Pelco-D is a fixed 7-byte frame:
//!
//! * `0xFF`: sync byte
//! * `u8`: device address
//! * `u8`: command 1
//! * `u8`: command 2 (motion opcode)
//! * `u8`: data 1 (pan speed, or preset high use)
//! * `u8`: data 2 (tilt speed, or preset number)
//! * `u8`: checksum — sum of address..data2, mod 256
//!
//! There is no escaping and no response; the motor bus is write-only from
//! the gateway's point of view.

use binrw::binrw;

/// Maximum Pelco-D speed code (`data1`/`data2`).
pub const MAX_SPEED: u8 = 0x3f;

/// Maximum VISCA pan/tilt speed code. VISCA drive commands carry speeds
/// `1..=0x18`; this is intentionally a different scale to
/// [`MAX_SPEED`] — each protocol keeps its native range.
pub const VISCA_MAX_SPEED: u8 = 0x18;

/// `command2` opcode: store the current position as preset `data2`.
pub const SET_PRESET: u8 = 0x03;

/// `command2` opcode: drive to preset `data2`.
pub const GO_TO_PRESET: u8 = 0x07;

/// Device convention: preset 11 is the home position.
pub const HOME_PRESET: u8 = 0x0b;

/// Device convention: the zero-reference preset, distinct from home.
pub const ZERO_REFERENCE_PRESET: u8 = 0x22;

/// Symbolic pan/tilt motions and their `command2` codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanTiltAction {
    Up,
    Down,
    Left,
    Right,
    UpLeft,
    UpRight,
    DownLeft,
    DownRight,
    Stop,
}

impl PanTiltAction {
    /// The Pelco-D `command2` byte for this motion.
    pub const fn command2(self) -> u8 {
        match self {
            Self::Up => 0x08,
            Self::Down => 0x10,
            Self::Left => 0x04,
            Self::Right => 0x02,
            Self::UpLeft => 0x0c,
            Self::UpRight => 0x0a,
            Self::DownLeft => 0x14,
            Self::DownRight => 0x12,
            Self::Stop => 0x00,
        }
    }

    /// Resolves a VISCA drive direction pair.
    ///
    /// VISCA encodes each axis as `1`/`2` for the two directions and `3`
    /// for "no movement", giving a 3×3 grid of nine valid combinations.
    /// Anything else is a protocol violation and maps to [`None`]: there
    /// is no safe direction to substitute.
    pub const fn from_visca(pan: u8, tilt: u8) -> Option<Self> {
        Some(match (pan, tilt) {
            (3, 1) => Self::Up,
            (3, 2) => Self::Down,
            (1, 3) => Self::Left,
            (2, 3) => Self::Right,
            (1, 1) => Self::UpLeft,
            (2, 1) => Self::UpRight,
            (1, 2) => Self::DownLeft,
            (2, 2) => Self::DownRight,
            (3, 3) => Self::Stop,
            _ => return None,
        })
    }
}

/// Converts a speed percentage (0–100) to a Pelco-D speed code,
/// truncating. Out-of-range input saturates at the cast.
pub fn percent_to_speed(percent: f64) -> u8 {
    (percent * f64::from(MAX_SPEED) / 100.0) as u8
}

/// Converts a VISCA speed code (`1..=0x18`) to a percentage of full speed.
pub fn speed_to_percent(code: u8) -> f64 {
    f64::from(code) * 100.0 / f64::from(VISCA_MAX_SPEED)
}

fn checksum_of(address: u8, command1: u8, command2: u8, data1: u8, data2: u8) -> u8 {
    [command1, command2, data1, data2]
        .iter()
        .fold(address, |sum, b| sum.wrapping_add(*b))
}

/// One Pelco-D frame.
///
/// Built by [`PelcoFrame::new`], which computes the checksum once; the
/// frame is never mutated afterwards. Reading rejects frames whose stored
/// checksum does not match the payload.
#[binrw]
#[brw(big, magic = 0xffu8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PelcoFrame {
    pub address: u8,
    pub command1: u8,
    pub command2: u8,
    pub data1: u8,
    pub data2: u8,
    #[br(assert(
        checksum == checksum_of(address, command1, command2, data1, data2),
        "checksum mismatch"
    ))]
    checksum: u8,
}

impl PelcoFrame {
    /// Frame length on the wire, sync byte and checksum included.
    pub const LENGTH: usize = 7;

    pub fn new(address: u8, command1: u8, command2: u8, data1: u8, data2: u8) -> Self {
        Self {
            address,
            command1,
            command2,
            data1,
            data2,
            checksum: checksum_of(address, command1, command2, data1, data2),
        }
    }

    pub const fn checksum(&self) -> u8 {
        self.checksum
    }

    /// The seven wire bytes: `FF, address, c1, c2, d1, d2, checksum`.
    pub const fn to_bytes(&self) -> [u8; Self::LENGTH] {
        [
            0xff,
            self.address,
            self.command1,
            self.command2,
            self.data1,
            self.data2,
            self.checksum,
        ]
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::Result;
    use binrw::{BinRead, BinWrite};
    use std::io::Cursor;

    #[test]
    fn checksum_is_mod_256_sum() {
        let frame = PelcoFrame::new(0x01, 0x00, 0x08, 0x20, 0x20);
        assert_eq!(0x49, frame.checksum());

        // Sum overflow wraps.
        let frame = PelcoFrame::new(0xff, 0xff, 0xff, 0xff, 0xff);
        assert_eq!(0xfb, frame.checksum());
    }

    #[test]
    fn wire_shape() {
        let frame = PelcoFrame::new(0x01, 0x00, PanTiltAction::Right.command2(), 0x3f, 0x00);
        let bytes = frame.to_bytes();

        assert_eq!(PelcoFrame::LENGTH, bytes.len());
        assert_eq!(0xff, bytes[0]);
        assert_eq!([0xff, 0x01, 0x00, 0x02, 0x3f, 0x00, 0x42], bytes);
    }

    #[test]
    fn binrw_matches_to_bytes() -> Result<()> {
        let frame = PelcoFrame::new(0x01, 0x00, GO_TO_PRESET, 0x00, HOME_PRESET);

        let mut out = Cursor::new(Vec::new());
        frame.write(&mut out)?;
        assert_eq!(frame.to_bytes().to_vec(), out.into_inner());

        let parsed = PelcoFrame::read(&mut Cursor::new(frame.to_bytes()))?;
        assert_eq!(frame, parsed);
        Ok(())
    }

    #[test]
    fn corrupt_checksum_rejected() {
        let mut bytes = PelcoFrame::new(0x01, 0x00, 0x08, 0x10, 0x10).to_bytes();
        bytes[6] ^= 0x01;
        assert!(PelcoFrame::read(&mut Cursor::new(bytes)).is_err());
    }

    #[test]
    fn speed_scales() {
        assert_eq!(0x00, percent_to_speed(0.0));
        assert_eq!(0x3f, percent_to_speed(100.0));
        // Truncation, not rounding.
        assert_eq!(0x1f, percent_to_speed(50.0));
        // Negative input saturates to zero at the cast.
        assert_eq!(0x00, percent_to_speed(-10.0));

        assert_eq!(100.0, speed_to_percent(VISCA_MAX_SPEED));
        assert_eq!(50.0, speed_to_percent(0x0c));
    }

    #[test]
    fn visca_speed_survives_conversion() {
        // The asymmetric maxima (0x18 in, 0x3f out) must compose the same
        // way the reference device does: code 8 lands on Pelco speed 21.
        assert_eq!(21, percent_to_speed(speed_to_percent(8)));
        assert_eq!(13, percent_to_speed(speed_to_percent(5)));
    }

    #[test]
    fn direction_table() {
        assert_eq!(Some(PanTiltAction::Up), PanTiltAction::from_visca(3, 1));
        assert_eq!(Some(PanTiltAction::Down), PanTiltAction::from_visca(3, 2));
        assert_eq!(Some(PanTiltAction::Left), PanTiltAction::from_visca(1, 3));
        assert_eq!(Some(PanTiltAction::Right), PanTiltAction::from_visca(2, 3));
        assert_eq!(Some(PanTiltAction::UpLeft), PanTiltAction::from_visca(1, 1));
        assert_eq!(Some(PanTiltAction::UpRight), PanTiltAction::from_visca(2, 1));
        assert_eq!(Some(PanTiltAction::DownLeft), PanTiltAction::from_visca(1, 2));
        assert_eq!(Some(PanTiltAction::DownRight), PanTiltAction::from_visca(2, 2));
        assert_eq!(Some(PanTiltAction::Stop), PanTiltAction::from_visca(3, 3));

        assert_eq!(None, PanTiltAction::from_visca(0, 1));
        assert_eq!(None, PanTiltAction::from_visca(4, 3));
    }
}
