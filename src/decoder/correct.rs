//! Repair of groups whose parity fails, and final checksum verification.
//!
//! A group with a gap has been filled exactly from its parity. A group without a
//! gap whose parity still fails holds one wrong character somewhere. The XOR of
//! the group gives the correction delta but not its position, so each of the
//! eight positions is tried. A candidate is kept only if the running checksum
//! through the repaired group projects onto the next group's spacer, which
//! usually leaves a single survivor.
//!
//! When two neighbouring groups both fail, the shared culprit may be the second
//! group's spacer. That repair is tried first.
//!
//! The search works on immutable snapshots: each candidate is a fresh copy, so a
//! failed branch never leaks into its siblings.

use log::trace;

use super::footer::FooterReading;
use crate::checksum::MessageChecksum;
use crate::group::{group_parity, parity_ok, widths_ok, GROUP_LEN, SPACER_SLOT};

/// Slot values plus the groups still failing parity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub slots: Vec<u8>,
    pub bad: Vec<bool>,
}

impl Snapshot {
    /// Fill every gap from its group's parity and flag the groups that fail it
    pub fn from_gaps(mut slots: Vec<u8>, gaps: &[Option<usize>]) -> Self {
        let bad: Vec<bool> = slots
            .chunks_mut(GROUP_LEN)
            .zip(gaps)
            .map(|(group, gap)| match *gap {
                Some(slot) => {
                    group[slot] = 0;
                    group[slot] = group_parity(group);
                    false
                }
                None => !parity_ok(group),
            })
            .collect();
        Self { slots, bad }
    }

    pub fn group_count(&self) -> usize {
        self.bad.len()
    }

    fn group(&self, n: usize) -> &[u8] {
        &self.slots[n * GROUP_LEN..(n + 1) * GROUP_LEN]
    }

    fn spacer(&self, n: usize) -> u8 {
        self.slots[n * GROUP_LEN + SPACER_SLOT]
    }
}

/// Depth-first repair search over one message.
pub struct Corrector<'a, C: MessageChecksum> {
    checksum: &'a C,
    footer: &'a FooterReading,
    search: bool,
}

impl<'a, C: MessageChecksum> Corrector<'a, C> {
    /// With `search` off, bad groups are not repaired and fail verification.
    pub fn new(checksum: &'a C, footer: &'a FooterReading, search: bool) -> Self {
        Self {
            checksum,
            footer,
            search,
        }
    }

    /// Repair `snapshot` and verify it against the footer.
    ///
    /// Returns the first repaired slot array that passes [`Corrector::verify`].
    pub fn correct(&self, snapshot: &Snapshot) -> Option<Vec<u8>> {
        self.search_from(snapshot, 0, false).map(|done| done.slots)
    }

    fn search_from(&self, snapshot: &Snapshot, n: usize, tried_spacer: bool) -> Option<Snapshot> {
        let groups = snapshot.group_count();
        if !self.search || n == groups {
            if snapshot.bad.iter().any(|&bad| bad) {
                return None;
            }
            return self.verify(&snapshot.slots).then(|| snapshot.clone());
        }

        if !snapshot.bad[n] {
            return self.search_from(snapshot, n + 1, false);
        }

        if !tried_spacer && n + 1 < groups && snapshot.bad[n + 1] {
            trace!("groups {} and {} bad, trying spacer of {}", n, n + 1, n + 1);
            let mut repaired = snapshot.clone();
            let delta = group_parity(snapshot.group(n + 1));
            repaired.slots[(n + 1) * GROUP_LEN + SPACER_SLOT] ^= delta;
            repaired.bad[n + 1] = false;
            return self
                .search_from(&repaired, n, true)
                .or_else(|| self.search_from(snapshot, n, true));
        }

        let delta = group_parity(snapshot.group(n));
        for slot in 0..GROUP_LEN {
            let mut candidate = snapshot.clone();
            candidate.slots[n * GROUP_LEN + slot] ^= delta;
            candidate.bad[n] = false;

            if !widths_ok(candidate.group(n)) {
                continue;
            }
            if n + 1 < groups && !self.spacer_agrees(&candidate, n) {
                continue;
            }
            trace!("group {} repaired at slot {}", n, slot);
            if let Some(done) = self.search_from(&candidate, n + 1, false) {
                return Some(done);
            }
        }
        None
    }

    /// Whether the checksum through group `n` projects onto the spacer of `n + 1`
    fn spacer_agrees(&self, snapshot: &Snapshot, n: usize) -> bool {
        let state = self
            .checksum
            .checksum_slots(&snapshot.slots[..(n + 1) * GROUP_LEN]);
        self.checksum.partial(state) == snapshot.spacer(n + 1)
    }

    /// Recompute the message checksum over `slots`.
    ///
    /// Every spacer after the first must equal the projection of the checksum over
    /// the groups before it, and the final value must agree with the footer on
    /// every trusted bit.
    pub fn verify(&self, slots: &[u8]) -> bool {
        if !widths_ok(slots) {
            return false;
        }

        let mut state = self.checksum.initial();
        for (n, group) in slots.chunks(GROUP_LEN).enumerate() {
            for (slot, &value) in group.iter().enumerate() {
                state = self.checksum.accumulate(state, slot, value);
            }
            if let Some(&spacer) = slots.get((n + 1) * GROUP_LEN + SPACER_SLOT) {
                if self.checksum.partial(state) != spacer {
                    return false;
                }
            }
        }
        self.footer.matches(self.checksum.finalize(state))
    }
}
