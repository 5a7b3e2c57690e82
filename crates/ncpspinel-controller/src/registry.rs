//! One pending-completion slot per lifecycle operation kind.

use std::fmt;

use ncpspinel_wire::command::{CMD_NET_CLEAR, CMD_PROP_VALUE_SET};
use ncpspinel_wire::property::{
    PROP_NET_IF_UP, PROP_NET_LEAVE_GRACEFULLY, PROP_NET_STACK_UP, PROP_THREAD_ACTIVE_DATASET_TLVS,
};
use ncpspinel_wire::{CommandId, PropertyKey};

use crate::error::ControllerError;
use crate::task::{AsyncTask, TaskResult};

/// Caller-facing long-running operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    DatasetSetActive,
    Ip6SetEnabled,
    ThreadSetEnabled,
    ThreadDetachGracefully,
    ThreadErasePersistentInfo,
}

impl Operation {
    pub const ALL: [Operation; 5] = [
        Operation::DatasetSetActive,
        Operation::Ip6SetEnabled,
        Operation::ThreadSetEnabled,
        Operation::ThreadDetachGracefully,
        Operation::ThreadErasePersistentInfo,
    ];

    fn index(self) -> usize {
        match self {
            Operation::DatasetSetActive => 0,
            Operation::Ip6SetEnabled => 1,
            Operation::ThreadSetEnabled => 2,
            Operation::ThreadDetachGracefully => 3,
            Operation::ThreadErasePersistentInfo => 4,
        }
    }

    /// The operation a transaction was started for, judged by the command
    /// and key it was sent with.
    pub fn for_transaction(command: CommandId, key: Option<PropertyKey>) -> Option<Self> {
        match (command, key) {
            (CMD_PROP_VALUE_SET, Some(PROP_THREAD_ACTIVE_DATASET_TLVS)) => {
                Some(Operation::DatasetSetActive)
            }
            (CMD_PROP_VALUE_SET, Some(PROP_NET_IF_UP)) => Some(Operation::Ip6SetEnabled),
            (CMD_PROP_VALUE_SET, Some(PROP_NET_STACK_UP)) => Some(Operation::ThreadSetEnabled),
            (CMD_PROP_VALUE_SET, Some(PROP_NET_LEAVE_GRACEFULLY)) => {
                Some(Operation::ThreadDetachGracefully)
            }
            (CMD_NET_CLEAR, _) => Some(Operation::ThreadErasePersistentInfo),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Operation::DatasetSetActive => "dataset-set-active",
            Operation::Ip6SetEnabled => "ip6-set-enabled",
            Operation::ThreadSetEnabled => "thread-set-enabled",
            Operation::ThreadDetachGracefully => "thread-detach-gracefully",
            Operation::ThreadErasePersistentInfo => "thread-erase-persistent-info",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Outcome of [`OperationRegistry::try_acquire`].
#[derive(Debug)]
pub enum Acquire {
    Acquired,
    /// The slot is occupied; the rejected handle is handed back untouched.
    Busy(AsyncTask),
}

#[derive(Debug, Default)]
pub struct OperationRegistry {
    slots: [Option<AsyncTask>; 5],
}

impl OperationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_pending(&self, operation: Operation) -> bool {
        self.slots[operation.index()].is_some()
    }

    pub fn try_acquire(&mut self, operation: Operation, task: AsyncTask) -> Acquire {
        let slot = &mut self.slots[operation.index()];
        if slot.is_some() {
            return Acquire::Busy(task);
        }
        *slot = Some(task);
        Acquire::Acquired
    }

    /// Clear the slot and finalise its handle. Returns false if nothing was
    /// pending.
    pub fn complete(&mut self, operation: Operation, result: TaskResult) -> bool {
        match self.slots[operation.index()].take() {
            Some(task) => {
                task.complete(result);
                true
            }
            None => false,
        }
    }

    /// Complete every pending handle with [`ControllerError::Aborted`].
    pub fn abort_all(&mut self) -> usize {
        let mut aborted = 0;
        for operation in Operation::ALL {
            if self.complete(operation, Err(ControllerError::Aborted)) {
                aborted += 1;
            }
        }
        aborted
    }

    pub fn pending_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_acquire_is_busy_and_first_survives() {
        let mut registry = OperationRegistry::new();
        let (first, mut first_rx) = AsyncTask::new();
        let (second, _second_rx) = AsyncTask::new();

        assert!(matches!(
            registry.try_acquire(Operation::ThreadSetEnabled, first),
            Acquire::Acquired
        ));
        assert!(matches!(
            registry.try_acquire(Operation::ThreadSetEnabled, second),
            Acquire::Busy(_)
        ));
        assert!(first_rx.try_recv().is_err());

        assert!(registry.complete(Operation::ThreadSetEnabled, Ok(())));
        assert!(matches!(first_rx.try_recv(), Ok(Ok(()))));
        assert!(!registry.is_pending(Operation::ThreadSetEnabled));
    }

    #[test]
    fn kinds_are_independent() {
        let mut registry = OperationRegistry::new();
        for operation in Operation::ALL {
            let (task, _rx) = AsyncTask::new();
            assert!(matches!(
                registry.try_acquire(operation, task),
                Acquire::Acquired
            ));
        }
        assert_eq!(registry.pending_count(), 5);
    }

    #[test]
    fn complete_on_empty_slot_is_a_no_op() {
        let mut registry = OperationRegistry::new();
        assert!(!registry.complete(Operation::Ip6SetEnabled, Ok(())));
    }

    #[test]
    fn abort_all_completes_each_pending_handle() {
        let mut registry = OperationRegistry::new();
        let (a, mut a_rx) = AsyncTask::new();
        let (b, mut b_rx) = AsyncTask::new();
        let _ = registry.try_acquire(Operation::DatasetSetActive, a);
        let _ = registry.try_acquire(Operation::ThreadErasePersistentInfo, b);

        assert_eq!(registry.abort_all(), 2);
        assert!(matches!(a_rx.try_recv(), Ok(Err(ControllerError::Aborted))));
        assert!(matches!(b_rx.try_recv(), Ok(Err(ControllerError::Aborted))));
        assert_eq!(registry.pending_count(), 0);
        assert_eq!(registry.abort_all(), 0);
    }

    #[test]
    fn transactions_map_back_to_operations() {
        assert_eq!(
            Operation::for_transaction(CMD_PROP_VALUE_SET, Some(PROP_NET_STACK_UP)),
            Some(Operation::ThreadSetEnabled)
        );
        assert_eq!(
            Operation::for_transaction(CMD_NET_CLEAR, None),
            Some(Operation::ThreadErasePersistentInfo)
        );
        assert_eq!(
            Operation::for_transaction(CMD_PROP_VALUE_SET, Some(0x9999)),
            None
        );
    }
}
