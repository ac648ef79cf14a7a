//! Motion primitives for the pan-tilt head.

use crate::{transport::Transport, Result};
use ptzgate_protocol::pelco::{
    percent_to_speed, PanTiltAction, PelcoFrame, GO_TO_PRESET, HOME_PRESET, SET_PRESET,
    ZERO_REFERENCE_PRESET,
};

/// Stateful façade over the serial transport.
///
/// Owns exactly one transport handle. Every operation builds one fresh
/// [`PelcoFrame`] and writes it — open loop, nothing acknowledges the
/// write.
pub struct MotionController {
    transport: Box<dyn Transport>,
    address: u8,
}

impl MotionController {
    pub fn new(transport: Box<dyn Transport>, address: u8) -> Self {
        Self { transport, address }
    }

    /// Starts the head moving. Speeds are percentages of full speed;
    /// [`PanTiltAction::Stop`] halts it.
    pub fn drive(
        &mut self,
        action: PanTiltAction,
        pan_percent: f64,
        tilt_percent: f64,
    ) -> Result<()> {
        self.send(PelcoFrame::new(
            self.address,
            0x00,
            action.command2(),
            percent_to_speed(pan_percent),
            percent_to_speed(tilt_percent),
        ))
    }

    /// Drives to the home position (preset 11 by device convention).
    pub fn go_home(&mut self) -> Result<()> {
        self.send(PelcoFrame::new(
            self.address,
            0x00,
            GO_TO_PRESET,
            0x00,
            HOME_PRESET,
        ))
    }

    /// Drives to the zero-reference preset.
    pub fn go_to_zero(&mut self) -> Result<()> {
        self.send(PelcoFrame::new(
            self.address,
            0x00,
            GO_TO_PRESET,
            0x00,
            ZERO_REFERENCE_PRESET,
        ))
    }

    /// Stores the current position as `preset`. Range adjustment (VISCA's
    /// zero-based indices vs Pelco's one-based) is the caller's job.
    pub fn set_preset(&mut self, preset: u8) -> Result<()> {
        self.send(PelcoFrame::new(
            self.address,
            0x00,
            SET_PRESET,
            0x00,
            preset,
        ))
    }

    /// Drives to `preset`.
    pub fn go_to_preset(&mut self, preset: u8) -> Result<()> {
        self.send(PelcoFrame::new(
            self.address,
            0x00,
            GO_TO_PRESET,
            0x00,
            preset,
        ))
    }

    /// Raw frame passthrough for opcodes outside the motion vocabulary.
    pub fn manual_command(
        &mut self,
        command1: u8,
        command2: u8,
        data1: u8,
        data2: u8,
    ) -> Result<()> {
        self.send(PelcoFrame::new(
            self.address, command1, command2, data1, data2,
        ))
    }

    fn send(&mut self, frame: PelcoFrame) -> Result<()> {
        let bytes = frame.to_bytes();
        trace!("pelco frame: {}", hex::encode(bytes));
        self.transport.send(&bytes)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::transport::MockTransport;

    fn controller() -> (MotionController, MockTransport) {
        let mock = MockTransport::new();
        (MotionController::new(Box::new(mock.clone()), 0x01), mock)
    }

    #[test]
    fn drive_stop() -> Result<()> {
        let (mut motion, mock) = controller();
        motion.drive(PanTiltAction::Stop, 33.0, 33.0)?;

        assert_eq!(
            Some(vec![0xff, 0x01, 0x00, 0x00, 0x14, 0x14, 0x29]),
            mock.last_frame()
        );
        Ok(())
    }

    #[test]
    fn drive_up_full_speed() -> Result<()> {
        let (mut motion, mock) = controller();
        motion.drive(PanTiltAction::Up, 100.0, 100.0)?;

        assert_eq!(
            Some(vec![0xff, 0x01, 0x00, 0x08, 0x3f, 0x3f, 0x87]),
            mock.last_frame()
        );
        Ok(())
    }

    #[test]
    fn home_and_zero_presets() -> Result<()> {
        let (mut motion, mock) = controller();
        motion.go_home()?;
        motion.go_to_zero()?;

        let frames = mock.frames();
        assert_eq!(vec![0xff, 0x01, 0x00, 0x07, 0x00, 0x0b, 0x13], frames[0]);
        assert_eq!(vec![0xff, 0x01, 0x00, 0x07, 0x00, 0x22, 0x2a], frames[1]);
        Ok(())
    }

    #[test]
    fn preset_set_and_recall() -> Result<()> {
        let (mut motion, mock) = controller();
        motion.set_preset(1)?;
        motion.go_to_preset(5)?;

        let frames = mock.frames();
        assert_eq!(vec![0xff, 0x01, 0x00, 0x03, 0x00, 0x01, 0x05], frames[0]);
        assert_eq!(vec![0xff, 0x01, 0x00, 0x07, 0x00, 0x05, 0x0d], frames[1]);
        Ok(())
    }

    #[test]
    fn manual_passthrough() -> Result<()> {
        let (mut motion, mock) = controller();
        motion.manual_command(0x00, 0x4b, 0x00, 0x21)?;

        assert_eq!(
            Some(vec![0xff, 0x01, 0x00, 0x4b, 0x00, 0x21, 0x6d]),
            mock.last_frame()
        );
        Ok(())
    }
}
