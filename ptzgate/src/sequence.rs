//! Per-origin duplicate and staleness filtering.

use ptzgate_protocol::{ViscaPacket, NO_SEQUENCE};
use std::{
    collections::HashMap,
    net::SocketAddr,
    time::{Duration, Instant},
};

/// A record older than this is ignored when judging duplicates.
const STALE_AFTER: Duration = Duration::from_millis(60_000);

/// The last accepted packet from one origin.
#[derive(Debug, Clone, Copy)]
struct SequenceRecord {
    sequence: u32,
    received_at: Instant,
}

/// Filters repeated commands per origin address.
///
/// This is deliberately *not* strict monotonic sequence enforcement. The
/// protocol carries live, single-outstanding-command control, so the only
/// question worth asking is "is this the same command repeated?" — a
/// changed sequence number is accepted whether it went up or down.
///
/// Records are created on first contact and overwritten on every accepted
/// packet; they are never deleted, so the map is bounded by the set of
/// distinct controllers seen.
#[derive(Debug, Default)]
pub struct SequenceGuard {
    records: HashMap<SocketAddr, SequenceRecord>,
}

impl SequenceGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if the packet should be processed, updating the
    /// origin's record. `false` means a duplicate of the last command —
    /// drop it without replying.
    ///
    /// A packet is accepted when any of:
    ///
    /// * the origin has no record yet;
    /// * the record is more than [`STALE_AFTER`] old (whatever its
    ///   sequence number);
    /// * the sequence number is the [`NO_SEQUENCE`] sentinel some
    ///   controllers stamp on everything;
    /// * the sequence number differs from the recorded one.
    pub fn accept(&mut self, origin: SocketAddr, packet: &ViscaPacket) -> bool {
        self.accept_at(origin, packet.sequence, Instant::now())
    }

    fn accept_at(&mut self, origin: SocketAddr, sequence: u32, now: Instant) -> bool {
        let fresh = match self.records.get(&origin) {
            None => true,
            Some(record) => {
                now.duration_since(record.received_at) > STALE_AFTER
                    || sequence == NO_SEQUENCE
                    || sequence != record.sequence
            }
        };

        if fresh {
            self.records.insert(
                origin,
                SequenceRecord {
                    sequence,
                    received_at: now,
                },
            );
        } else {
            trace!("repeat of sequence {sequence} from {origin}");
        }

        fresh
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn origin() -> SocketAddr {
        "198.51.100.7:52381".parse().unwrap()
    }

    #[test]
    fn first_contact_always_accepted() {
        let mut guard = SequenceGuard::new();
        assert!(guard.accept_at(origin(), 0, Instant::now()));
    }

    #[test]
    fn repeat_within_window_rejected() {
        let mut guard = SequenceGuard::new();
        let start = Instant::now();

        assert!(guard.accept_at(origin(), 7, start));
        assert!(!guard.accept_at(origin(), 7, start + Duration::from_millis(5)));
        // Still the same command, still inside the window.
        assert!(!guard.accept_at(origin(), 7, start + Duration::from_secs(59)));
    }

    #[test]
    fn changed_sequence_accepted_either_direction() {
        let mut guard = SequenceGuard::new();
        let start = Instant::now();

        assert!(guard.accept_at(origin(), 7, start));
        assert!(guard.accept_at(origin(), 8, start));
        assert!(guard.accept_at(origin(), 3, start));
    }

    #[test]
    fn no_sequence_sentinel_always_accepted() {
        let mut guard = SequenceGuard::new();
        let start = Instant::now();

        assert!(guard.accept_at(origin(), NO_SEQUENCE, start));
        assert!(guard.accept_at(origin(), NO_SEQUENCE, start));
        assert!(guard.accept_at(origin(), NO_SEQUENCE, start + Duration::from_millis(1)));
    }

    #[test]
    fn stale_record_accepts_identical_sequence() {
        let mut guard = SequenceGuard::new();
        let start = Instant::now();

        assert!(guard.accept_at(origin(), 7, start));
        assert!(guard.accept_at(origin(), 7, start + Duration::from_millis(60_001)));
    }

    #[test]
    fn origins_tracked_independently() {
        let mut guard = SequenceGuard::new();
        let start = Instant::now();
        let other: SocketAddr = "198.51.100.8:52381".parse().unwrap();

        assert!(guard.accept_at(origin(), 7, start));
        assert!(guard.accept_at(other, 7, start));
        assert!(!guard.accept_at(origin(), 7, start));
    }
}
