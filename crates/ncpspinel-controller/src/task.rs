//! Completion handles and the deferred task queue.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;

use tokio::sync::oneshot;

use crate::error::ControllerError;

/// Terminal outcome of a lifecycle operation.
pub type TaskResult = Result<(), ControllerError>;

/// Receiving side of an [`AsyncTask`] created with [`AsyncTask::new`].
pub type TaskReceiver = oneshot::Receiver<TaskResult>;

enum Completion {
    Channel(oneshot::Sender<TaskResult>),
    Handler(Box<dyn FnOnce(TaskResult)>),
}

/// A single-shot completion handle for one lifecycle operation.
///
/// Completing consumes the handle, so a result can be written at most once.
pub struct AsyncTask {
    completion: Completion,
}

impl AsyncTask {
    /// Create a handle whose result is delivered to the returned receiver.
    pub fn new() -> (Self, TaskReceiver) {
        let (tx, rx) = oneshot::channel();
        (
            Self {
                completion: Completion::Channel(tx),
            },
            rx,
        )
    }

    /// Create a handle that runs `handler` with the result.
    ///
    /// The handler runs inside the controller call that completes it. To
    /// issue further controller calls from it, post them through a
    /// [`TaskPoster`].
    pub fn with_handler(handler: impl FnOnce(TaskResult) + 'static) -> Self {
        Self {
            completion: Completion::Handler(Box::new(handler)),
        }
    }

    /// Write the terminal result.
    pub fn complete(self, result: TaskResult) {
        match self.completion {
            Completion::Channel(tx) => {
                // The caller may have stopped waiting; nothing to do then.
                let _ = tx.send(result);
            }
            Completion::Handler(handler) => handler(result),
        }
    }
}

impl fmt::Debug for AsyncTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.completion {
            Completion::Channel(_) => "channel",
            Completion::Handler(_) => "handler",
        };
        f.debug_struct("AsyncTask").field("completion", &kind).finish()
    }
}

type Task<C> = Box<dyn FnOnce(&mut C)>;

/// Single-threaded FIFO of work to run against a context `C`.
pub struct TaskRunner<C> {
    queue: Rc<RefCell<VecDeque<Task<C>>>>,
}

impl<C> Default for TaskRunner<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> TaskRunner<C> {
    pub fn new() -> Self {
        Self {
            queue: Rc::new(RefCell::new(VecDeque::new())),
        }
    }

    pub fn post(&self, task: impl FnOnce(&mut C) + 'static) {
        self.queue.borrow_mut().push_back(Box::new(task));
    }

    /// A cloneable handle for posting from completion handlers.
    pub fn poster(&self) -> TaskPoster<C> {
        TaskPoster {
            queue: Rc::clone(&self.queue),
        }
    }

    /// Pop the oldest task. The queue borrow is released before the caller
    /// runs it, so the task may post more work.
    pub fn pop(&self) -> Option<Box<dyn FnOnce(&mut C)>> {
        self.queue.borrow_mut().pop_front()
    }

    pub fn len(&self) -> usize {
        self.queue.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.borrow().is_empty()
    }
}

/// Posting handle onto a [`TaskRunner`].
pub struct TaskPoster<C> {
    queue: Rc<RefCell<VecDeque<Task<C>>>>,
}

impl<C> Clone for TaskPoster<C> {
    fn clone(&self) -> Self {
        Self {
            queue: Rc::clone(&self.queue),
        }
    }
}

impl<C> TaskPoster<C> {
    pub fn post(&self, task: impl FnOnce(&mut C) + 'static) {
        self.queue.borrow_mut().push_back(Box::new(task));
    }
}
