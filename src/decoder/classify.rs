//! Alignment of received payload bytes to group slots.
//!
//! Slots alternate between 5-bit and 6-bit characters, so a byte of the wrong
//! class (or outside the alphabet) marks the spot where something went wrong.
//! Such a byte is ambiguous:
//! - it may be corrupted but present: the slot becomes a gap and the byte is used up
//! - the real character may have been dropped: the slot becomes a gap and the byte
//!   is read again for the next slot
//!
//! Both readings are explored depth first, corrupted first. A group tolerates a
//! single gap. A walk is complete when it has filled every slot and used up
//! every payload byte, so the number of dropped characters in any complete walk
//! is fixed by the byte count and the first complete walk found is kept.

use std::collections::HashSet;

use log::trace;

use crate::group::{convert_input, parse_group, SlotClass, GROUP_LEN};

/// Slot values and gap positions produced by a successful walk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alignment {
    /// Normalized slot values, zero where a gap was recorded
    pub slots: Vec<u8>,
    /// Gap slot per group
    pub gaps: Vec<Option<usize>>,
    /// Characters assumed dropped
    pub dropped: usize,
}

impl Alignment {
    fn new(word_count: usize) -> Self {
        Self {
            slots: vec![0; word_count * GROUP_LEN],
            gaps: vec![None; word_count],
            dropped: 0,
        }
    }
}

struct Walker<'a> {
    payload: &'a [u8],
    word_count: usize,
    convert_tabs: bool,
    /// Dropped characters every complete walk must account for
    budget: usize,
    /// `(cursor, group, dropped)` states at group starts known to lead nowhere
    dead: HashSet<(usize, usize, usize)>,
}

/// Align `payload` to `word_count` groups.
///
/// Returns `None` if no walk fills exactly `word_count * 8` slots from exactly
/// `payload.len()` bytes with at most one gap per group.
pub fn align(payload: &[u8], word_count: usize, convert_tabs: bool) -> Option<Alignment> {
    let slot_count = word_count * GROUP_LEN;
    if payload.len() > slot_count {
        return None;
    }

    let mut walker = Walker {
        payload,
        word_count,
        convert_tabs,
        budget: slot_count - payload.len(),
        dead: HashSet::new(),
    };
    walker.walk_from(0, 0, Alignment::new(word_count))
}

impl Walker<'_> {
    /// Continue at the first slot of `group`
    fn walk_from(&mut self, cursor: usize, group: usize, state: Alignment) -> Option<Alignment> {
        if group == self.word_count {
            return (cursor == self.payload.len()).then_some(state);
        }

        let remaining_bytes = self.payload.len() - cursor;
        let remaining_slots = (self.word_count - group) * GROUP_LEN;
        if remaining_bytes > remaining_slots
            || remaining_slots - remaining_bytes > self.budget - state.dropped
        {
            return None;
        }

        let key = (cursor, group, state.dropped);
        if self.dead.contains(&key) {
            return None;
        }
        let result = match self.intact_group(cursor) {
            Some(values) => {
                let mut state = state;
                state.slots[group * GROUP_LEN..(group + 1) * GROUP_LEN].copy_from_slice(&values);
                self.walk_from(cursor + GROUP_LEN, group + 1, state)
            }
            None => self.walk_group(cursor, group, 0, state),
        };
        if result.is_none() {
            self.dead.insert(key);
        }
        result
    }

    /// Values of the eight bytes at `cursor` if every one fits its slot
    fn intact_group(&self, cursor: usize) -> Option<[u8; GROUP_LEN]> {
        let ascii: &[u8; GROUP_LEN] = self
            .payload
            .get(cursor..cursor + GROUP_LEN)?
            .try_into()
            .ok()?;
        parse_group(ascii, self.convert_tabs)
    }

    /// Consume matching bytes from `slot` to the end of `group`
    fn walk_group(
        &mut self,
        mut cursor: usize,
        group: usize,
        mut slot: usize,
        mut state: Alignment,
    ) -> Option<Alignment> {
        while slot < GROUP_LEN {
            let expected = SlotClass::expected(slot);
            match self.payload.get(cursor) {
                Some(&byte) => {
                    let byte = convert_input(byte, self.convert_tabs);
                    if SlotClass::of(byte, false) != expected {
                        return self.branch(cursor, group, slot, state);
                    }
                    state.slots[group * GROUP_LEN + slot] = expected.normalize(byte)?;
                    cursor += 1;
                    slot += 1;
                }
                None => return self.branch(cursor, group, slot, state),
            }
        }
        self.walk_from(cursor, group + 1, state)
    }

    /// Resolve an ambiguous slot as corrupted-but-present, then as dropped
    fn branch(
        &mut self,
        cursor: usize,
        group: usize,
        slot: usize,
        state: Alignment,
    ) -> Option<Alignment> {
        if state.gaps[group].is_some() {
            trace!("second gap in group {} at slot {}", group, slot);
            return None;
        }
        trace!("ambiguous byte {} at group {} slot {}", cursor, group, slot);

        let corrupted = if cursor < self.payload.len() {
            let mut present = state.clone();
            present.gaps[group] = Some(slot);
            self.walk_group(cursor + 1, group, slot + 1, present)
        } else {
            None
        };
        // Every complete walk accounts for the whole budget, so no later walk can
        // beat this one
        if corrupted.is_some() {
            return corrupted;
        }

        if state.dropped == self.budget {
            return None;
        }
        let mut missing = state;
        missing.gaps[group] = Some(slot);
        missing.dropped += 1;
        self.walk_group(cursor, group, slot + 1, missing)
    }
}
