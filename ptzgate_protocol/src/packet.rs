//! VISCA-over-UDP datagram envelope.
//!
//! Sony's "VISCA over IP" framing wraps each classic VISCA message in an
//! 8-byte big-endian header carrying a payload type, a payload length and a
//! sequence number. The gateway speaks this envelope on UDP port 52381.

use crate::Result;
use binrw::{binrw, BinRead, BinWrite};
use std::io::Cursor;

/// Sequence number some controllers stamp on *every* command instead of
/// counting. A packet carrying this value bypasses duplicate detection.
pub const NO_SEQUENCE: u32 = u32::MAX;

/// Payload type codes used in the envelope header.
///
/// This is an open set on the wire: codes outside the documented six parse
/// as [`PayloadType::Unknown`] and are skipped by the server loop rather
/// than rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadType {
    /// `0x0110`: inquiry from a controller.
    Inquiry,
    /// `0x0100`: command from a controller.
    Command,
    /// `0x0111`: reply from the device.
    Reply,
    /// `0x0120`: device setting command.
    Set,
    /// `0x0200`: control message (sequence reset et al).
    Control,
    /// `0x0201`: reply to a control message.
    ControlReply,
    /// Anything else, including the `0` of a sentinel packet.
    Unknown(u16),
}

impl From<u16> for PayloadType {
    fn from(v: u16) -> Self {
        match v {
            0x0110 => Self::Inquiry,
            0x0100 => Self::Command,
            0x0111 => Self::Reply,
            0x0120 => Self::Set,
            0x0200 => Self::Control,
            0x0201 => Self::ControlReply,
            v => Self::Unknown(v),
        }
    }
}

impl From<PayloadType> for u16 {
    fn from(v: PayloadType) -> Self {
        match v {
            PayloadType::Inquiry => 0x0110,
            PayloadType::Command => 0x0100,
            PayloadType::Reply => 0x0111,
            PayloadType::Set => 0x0120,
            PayloadType::Control => 0x0200,
            PayloadType::ControlReply => 0x0201,
            PayloadType::Unknown(v) => v,
        }
    }
}

/// One VISCA-over-UDP envelope.
///
/// ## Packet format
///
/// * `u16`: [payload type][PayloadType]
/// * `u16`: payload length
/// * `u32`: sequence number
/// * `payload length` bytes of payload
///
/// The length field is not stored: it is recomputed from
/// [`payload`][Self::payload] on write, so a well-formed packet always has
/// `payload_length == payload.len()`. Bytes after the declared length are
/// ignored on read.
#[binrw]
#[brw(big)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViscaPacket {
    #[br(map = |v: u16| PayloadType::from(v))]
    #[bw(map = |t: &PayloadType| u16::from(*t))]
    pub payload_type: PayloadType,

    #[br(temp)]
    #[bw(try_calc(u16::try_from(payload.len())))]
    payload_length: u16,

    pub sequence: u32,

    #[br(count = payload_length)]
    pub payload: Vec<u8>,
}

impl ViscaPacket {
    /// Largest datagram the gateway will accept.
    pub const MAX_DATAGRAM: usize = 1024;

    /// The sentinel produced for undecodable input: type `0`, no payload.
    ///
    /// Callers treat this as "ignore this datagram".
    fn sentinel() -> Self {
        Self {
            payload_type: PayloadType::Unknown(0),
            sequence: 0,
            payload: Vec::new(),
        }
    }

    /// Decodes a received datagram, failing soft.
    ///
    /// Truncated or otherwise malformed input yields the zero
    /// [sentinel][Self::sentinel] instead of an error; a noisy controller
    /// must never take the receive loop down.
    pub fn from_datagram(buf: &[u8]) -> Self {
        match Self::read(&mut Cursor::new(buf)) {
            Ok(pkt) => pkt,
            Err(e) => {
                warn!("malformed envelope ({e}): {}", hex::encode(buf));
                Self::sentinel()
            }
        }
    }

    /// Makes the reply envelope for this packet: same sequence number,
    /// type rewritten to [`PayloadType::Reply`], payload replaced.
    ///
    /// Pure transform; sending is the caller's job.
    pub fn make_reply(&self, body: Vec<u8>) -> Self {
        Self {
            payload_type: PayloadType::Reply,
            sequence: self.sequence,
            payload: body,
        }
    }

    /// Serializes the envelope for transmission.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut out = Cursor::new(Vec::with_capacity(8 + self.payload.len()));
        self.write(&mut out)?;
        Ok(out.into_inner())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn command_envelope() -> Result<()> {
        let buf = hex::decode("01000008000000018101060108080303")?;
        let pkt = ViscaPacket::read(&mut Cursor::new(&buf))?;

        assert_eq!(PayloadType::Command, pkt.payload_type);
        assert_eq!(1, pkt.sequence);
        assert_eq!(hex::decode("8101060108080303")?, pkt.payload);

        assert_eq!(buf, pkt.to_bytes()?);
        Ok(())
    }

    #[test]
    fn trailing_bytes_ignored() -> Result<()> {
        // Declared length 2, two extra bytes on the wire.
        let buf = hex::decode("011000020000002a8101beef")?;
        let pkt = ViscaPacket::read(&mut Cursor::new(&buf))?;

        assert_eq!(PayloadType::Inquiry, pkt.payload_type);
        assert_eq!(vec![0x81, 0x01], pkt.payload);
        Ok(())
    }

    #[test]
    fn unknown_type_still_parses() -> Result<()> {
        let buf = hex::decode("abcd000000000005")?;
        let pkt = ViscaPacket::read(&mut Cursor::new(&buf))?;

        assert_eq!(PayloadType::Unknown(0xabcd), pkt.payload_type);
        assert_eq!(5, pkt.sequence);
        assert!(pkt.payload.is_empty());
        Ok(())
    }

    #[test]
    fn malformed_input_yields_sentinel() {
        for garbage in [
            &b""[..],
            &b"\x01"[..],
            &b"\x01\x00\x00\x08\x00\x00"[..],          // truncated header
            &b"\x01\x00\x00\x08\x00\x00\x00\x01\x81"[..], // payload shorter than declared
        ] {
            let pkt = ViscaPacket::from_datagram(garbage);
            assert_eq!(PayloadType::Unknown(0), pkt.payload_type);
            assert_eq!(0, pkt.sequence);
            assert!(pkt.payload.is_empty());
        }
    }

    #[test]
    fn reply_round_trip() -> Result<()> {
        let buf = hex::decode("01100005000013378101043800")?;
        let pkt = ViscaPacket::from_datagram(&buf);

        let reply = pkt.make_reply(vec![0x90, 0x50, 0x02, 0xff]);
        assert_eq!(hex::decode("0111000400001337905002ff")?, reply.to_bytes()?);

        // Header fields survive the round trip.
        let again = ViscaPacket::from_datagram(&reply.to_bytes()?);
        assert_eq!(PayloadType::Reply, again.payload_type);
        assert_eq!(pkt.sequence, again.sequence);
        assert_eq!(vec![0x90, 0x50, 0x02, 0xff], again.payload);
        Ok(())
    }
}
