//! Host-side controller for a Spinel network co-processor.
//!
//! The controller issues property commands for a handful of network
//! lifecycle operations, correlates each reply with the operation that
//! caused it, and forwards unsolicited role reports to an observer.
//! At most one operation of each kind may be pending at a time.

pub mod config;
pub mod decode;
pub mod error;
pub mod ncp;
pub mod observer;
pub mod registry;
pub mod task;
pub mod tid;

pub use config::NcpConfig;
pub use decode::{decode_status, decode_value_is, PropertyValue};
pub use error::{ControllerError, Result};
pub use ncp::NcpSpinel;
pub use observer::{DeviceRole, PropsObserver};
pub use registry::{Acquire, Operation, OperationRegistry};
pub use task::{AsyncTask, TaskPoster, TaskReceiver, TaskResult, TaskRunner};
pub use tid::{TransactionSlot, TransactionTable};
