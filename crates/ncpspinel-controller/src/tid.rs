//! Transaction id pool.
//!
//! Ids are drawn from `1..TID_COUNT`; id 0 marks unsolicited frames and is
//! never handed out. Allocation walks cyclically from the id after the last
//! one handed out, so a freed id is not reused until the others have had a
//! turn, but callers must not rely on ids being monotonic.

use ncpspinel_wire::{CommandId, PropertyKey, Tid, TID_COUNT};

/// What an outstanding transaction was started for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransactionSlot {
    pub tid: Tid,
    pub command: CommandId,
    /// `None` for commands that carry no property key.
    pub key: Option<PropertyKey>,
}

/// Fixed-capacity table of in-flight transactions.
#[derive(Debug)]
pub struct TransactionTable {
    in_use: [bool; TID_COUNT],
    next: u8,
    slots: [Option<TransactionSlot>; TID_COUNT],
}

impl Default for TransactionTable {
    fn default() -> Self {
        Self::new()
    }
}

impl TransactionTable {
    /// Number of ids that can be outstanding at once.
    pub const CAPACITY: usize = TID_COUNT - 1;

    pub fn new() -> Self {
        Self {
            in_use: [false; TID_COUNT],
            next: 1,
            slots: [None; TID_COUNT],
        }
    }

    /// Reserve a free id, or `None` if all assignable ids are in use.
    pub fn allocate(&mut self) -> Option<Tid> {
        let start = self.next;
        let mut candidate = start;
        loop {
            if !self.in_use[usize::from(candidate)] {
                self.in_use[usize::from(candidate)] = true;
                self.next = following(candidate);
                return Tid::new(candidate);
            }
            candidate = following(candidate);
            if candidate == start {
                return None;
            }
        }
    }

    /// Attach the originating command to a reserved id.
    pub fn record(&mut self, slot: TransactionSlot) {
        debug_assert!(self.is_in_use(slot.tid), "recording an unreserved tid");
        self.slots[slot.tid.index()] = Some(slot);
    }

    pub fn lookup(&self, tid: Tid) -> Option<&TransactionSlot> {
        if tid.is_notification() {
            return None;
        }
        self.slots[tid.index()].as_ref()
    }

    /// Remove the slot for `tid` and release the id in one step.
    ///
    /// Returns `None`, leaving the table untouched, if no transaction is
    /// recorded under `tid`.
    pub fn take(&mut self, tid: Tid) -> Option<TransactionSlot> {
        if tid.is_notification() {
            return None;
        }
        let slot = self.slots[tid.index()].take()?;
        self.in_use[tid.index()] = false;
        Some(slot)
    }

    /// Release an id and drop whatever was recorded under it.
    pub fn free(&mut self, tid: Tid) {
        if tid.is_notification() {
            return;
        }
        self.in_use[tid.index()] = false;
        self.slots[tid.index()] = None;
    }

    pub fn is_in_use(&self, tid: Tid) -> bool {
        self.in_use[tid.index()]
    }

    /// Number of ids currently reserved.
    pub fn in_use_count(&self) -> usize {
        self.in_use.iter().filter(|&&used| used).count()
    }

    /// Release every id.
    pub fn clear(&mut self) {
        self.in_use = [false; TID_COUNT];
        self.slots = [None; TID_COUNT];
    }
}

fn following(tid: u8) -> u8 {
    if usize::from(tid) + 1 >= TID_COUNT {
        1
    } else {
        tid + 1
    }
}
