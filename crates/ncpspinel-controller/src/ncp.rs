//! The Spinel controller.
//!
//! [`NcpSpinel`] turns caller-facing lifecycle operations into property
//! commands, correlates the co-processor's replies by transaction id, and
//! decodes unsolicited property reports for a [`PropsObserver`].
//!
//! Everything runs on one execution context: the caller's operations and
//! the transport's frame callbacks must be funnelled onto the same thread.
//! Work that has to happen "after the current callback" goes through the
//! controller's task queue and is run by [`NcpSpinel::process`].

use bytes::BytesMut;
use ncpspinel_transport::{FrameDisposition, FrameHandler, SpinelInterface};
use ncpspinel_wire::command::{
    command_name, CMD_NET_CLEAR, CMD_PROP_VALUE_INSERTED, CMD_PROP_VALUE_IS,
    CMD_PROP_VALUE_REMOVED, CMD_PROP_VALUE_SET,
};
use ncpspinel_wire::property::{
    property_name, PROP_LAST_STATUS, PROP_NET_IF_UP, PROP_NET_LEAVE_GRACEFULLY,
    PROP_NET_STACK_UP, PROP_THREAD_ACTIVE_DATASET_TLVS,
};
use ncpspinel_wire::{
    decode_frame, encode_frame, CommandId, Encoder, Frame, Header, PropertyKey, Tid, WireError,
};
use tracing::{debug, info, trace, warn};

use crate::config::NcpConfig;
use crate::decode::{decode_status, decode_value_is, PropertyValue};
use crate::error::{ControllerError, Result};
use crate::observer::{DeviceRole, PropsObserver};
use crate::registry::{Acquire, Operation, OperationRegistry};
use crate::task::{AsyncTask, TaskPoster, TaskResult, TaskRunner};
use crate::tid::{TransactionSlot, TransactionTable};

/// Host-side controller for a Spinel network co-processor.
pub struct NcpSpinel<I: SpinelInterface> {
    interface: I,
    config: NcpConfig,
    tids: TransactionTable,
    tx_buffer: BytesMut,
    operations: OperationRegistry,
    observer: Option<Box<dyn PropsObserver>>,
    role: DeviceRole,
    tasks: TaskRunner<Self>,
}

impl<I: SpinelInterface> NcpSpinel<I> {
    /// Create an uninitialised controller.
    ///
    /// Frames delivered before [`init`](Self::init) are handed back to the
    /// transport for later replay.
    pub fn new(interface: I, config: NcpConfig) -> Self {
        Self {
            interface,
            tx_buffer: BytesMut::with_capacity(config.max_frame_size),
            config,
            tids: TransactionTable::new(),
            operations: OperationRegistry::new(),
            observer: None,
            role: DeviceRole::default(),
            tasks: TaskRunner::new(),
        }
    }

    /// Bind the observer and start processing frames.
    pub fn init(&mut self, observer: impl PropsObserver + 'static) {
        self.observer = Some(Box::new(observer));
        info!(iid = %self.config.iid, "spinel controller initialized");
    }

    /// Abort every pending operation, release every transaction id and drop
    /// the observer.
    ///
    /// Queued tasks still run, after the observer is gone, so any operation
    /// they start completes its handle with
    /// [`ControllerError::NotInitialized`].
    pub fn deinit(&mut self) {
        let aborted = self.operations.abort_all();
        self.tids.clear();
        let was_initialized = self.observer.take().is_some();
        let drained = self.process();
        if was_initialized || aborted > 0 || drained > 0 {
            info!(aborted, drained, "spinel controller deinitialized");
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.observer.is_some()
    }

    pub fn coprocessor_version(&self) -> &str {
        self.interface.coprocessor_version()
    }

    /// Last role reported by the co-processor.
    pub fn device_role(&self) -> DeviceRole {
        self.role
    }

    pub fn config(&self) -> &NcpConfig {
        &self.config
    }

    pub fn interface(&self) -> &I {
        &self.interface
    }

    pub fn interface_mut(&mut self) -> &mut I {
        &mut self.interface
    }

    /// Number of transactions awaiting a response.
    pub fn pending_transactions(&self) -> usize {
        self.tids.in_use_count()
    }

    pub fn is_pending(&self, operation: Operation) -> bool {
        self.operations.is_pending(operation)
    }

    /// Queue `task` to run on the next [`process`](Self::process).
    pub fn post(&self, task: impl FnOnce(&mut Self) + 'static) {
        self.tasks.post(task);
    }

    pub fn task_poster(&self) -> TaskPoster<Self> {
        self.tasks.poster()
    }

    /// Run queued tasks until the queue is empty. Returns how many ran.
    pub fn process(&mut self) -> usize {
        let mut ran = 0;
        while let Some(task) = self.tasks.pop() {
            task(self);
            ran += 1;
        }
        ran
    }

    /// Set the active operational dataset. `tlvs` is forwarded verbatim.
    pub fn dataset_set_active_tlvs(&mut self, tlvs: &[u8], task: AsyncTask) {
        self.start_operation(Operation::DatasetSetActive, task, |ncp| {
            ncp.set_property(PROP_THREAD_ACTIVE_DATASET_TLVS, |enc| enc.write_data(tlvs))
        });
    }

    /// Bring the IPv6 interface up or down.
    pub fn ip6_set_enabled(&mut self, enable: bool, task: AsyncTask) {
        self.start_operation(Operation::Ip6SetEnabled, task, |ncp| {
            ncp.set_property(PROP_NET_IF_UP, |enc| enc.write_bool(enable))
        });
    }

    /// Start or stop network participation.
    pub fn thread_set_enabled(&mut self, enable: bool, task: AsyncTask) {
        self.start_operation(Operation::ThreadSetEnabled, task, |ncp| {
            ncp.set_property(PROP_NET_STACK_UP, |enc| enc.write_bool(enable))
        });
    }

    /// Leave the network gracefully.
    pub fn thread_detach_gracefully(&mut self, task: AsyncTask) {
        self.start_operation(Operation::ThreadDetachGracefully, task, |ncp| {
            ncp.set_property(PROP_NET_LEAVE_GRACEFULLY, |_| Ok(()))
        });
    }

    /// Erase the network state persisted on the co-processor.
    pub fn thread_erase_persistent_info(&mut self, task: AsyncTask) {
        self.start_operation(Operation::ThreadErasePersistentInfo, task, |ncp| {
            ncp.send_command(CMD_NET_CLEAR, None, |_| Ok(())).map(drop)
        });
    }

    fn start_operation<F>(&mut self, operation: Operation, task: AsyncTask, send: F)
    where
        F: FnOnce(&mut Self) -> Result<()>,
    {
        if !self.is_initialized() {
            task.complete(Err(ControllerError::NotInitialized));
            return;
        }
        if let Acquire::Busy(task) = self.operations.try_acquire(operation, task) {
            debug!(%operation, "operation already pending");
            task.complete(Err(ControllerError::Busy { operation }));
            return;
        }
        if let Err(err) = send(self) {
            warn!(%operation, error = %err, "failed to send command");
            self.operations.complete(operation, Err(err));
        }
    }

    fn set_property<F>(&mut self, key: PropertyKey, write_value: F) -> Result<()>
    where
        F: FnOnce(&mut Encoder<'_>) -> ncpspinel_wire::Result<()>,
    {
        self.send_command(CMD_PROP_VALUE_SET, Some(key), write_value)
            .map(drop)
    }

    fn send_command<F>(
        &mut self,
        command: CommandId,
        key: Option<PropertyKey>,
        write_payload: F,
    ) -> Result<Tid>
    where
        F: FnOnce(&mut Encoder<'_>) -> ncpspinel_wire::Result<()>,
    {
        let tid = self
            .tids
            .allocate()
            .ok_or(ControllerError::ResourceExhausted)?;

        if let Err(err) = self.transmit(Header::new(self.config.iid, tid), command, key, write_payload)
        {
            self.tids.free(tid);
            return Err(err);
        }

        self.tids.record(TransactionSlot { tid, command, key });
        debug!(
            %tid,
            command = command_name(command),
            key = key.map(property_name),
            "command sent"
        );
        Ok(tid)
    }

    fn transmit<F>(
        &mut self,
        header: Header,
        command: CommandId,
        key: Option<PropertyKey>,
        write_payload: F,
    ) -> Result<()>
    where
        F: FnOnce(&mut Encoder<'_>) -> ncpspinel_wire::Result<()>,
    {
        encode_frame(
            &mut self.tx_buffer,
            self.config.max_frame_size,
            header,
            command,
            key,
            write_payload,
        )
        .map_err(ControllerError::Encode)?;

        let sent = self.interface.send_frame(&self.tx_buffer);
        self.tx_buffer.clear();
        sent.map_err(ControllerError::Transport)
    }

    fn handle_frame(&mut self, frame: &[u8], header: u8) {
        let header = match Header::parse(header) {
            Ok(header) => header,
            Err(err) => {
                warn!(error = %err, "dropping frame");
                return;
            }
        };
        if header.iid() != self.config.iid {
            debug!(iid = %header.iid(), "dropping frame for another interface");
            return;
        }

        let tid = header.tid();
        if tid.is_notification() {
            self.handle_notification(frame);
        } else {
            self.handle_response(tid, frame);
        }
    }

    fn handle_notification(&mut self, raw: &[u8]) {
        let frame = match decode_frame(raw) {
            Ok(frame) => frame,
            Err(err) => {
                warn!(error = %err, "malformed notification");
                return;
            }
        };

        match (frame.command, frame.key) {
            (CMD_PROP_VALUE_IS, Some(key)) => {
                if let Err(err) = self.handle_value_is(key, &frame.payload) {
                    warn!(key = property_name(key), error = %err, "malformed notification");
                }
            }
            (CMD_PROP_VALUE_INSERTED | CMD_PROP_VALUE_REMOVED, key) => {
                debug!(
                    command = command_name(frame.command),
                    key = key.map(property_name),
                    "ignoring unsupported notification"
                );
            }
            (command, _) => {
                warn!(command = command_name(command), "unexpected command in notification");
            }
        }
    }

    fn handle_value_is(&mut self, key: PropertyKey, payload: &[u8]) -> std::result::Result<(), WireError> {
        match decode_value_is(key, payload)? {
            Some(PropertyValue::Role(role)) => {
                info!(%role, "device role reported");
                self.role = role;
                if let Some(observer) = self.observer.as_mut() {
                    observer.set_device_role(role);
                }
            }
            Some(PropertyValue::LastStatus(status)) if status.is_reset() => {
                info!(%status, "co-processor reset");
            }
            Some(PropertyValue::LastStatus(status)) => {
                debug!(%status, "last status");
            }
            None => {
                trace!(key, "ignoring property");
            }
        }
        Ok(())
    }

    fn handle_response(&mut self, tid: Tid, raw: &[u8]) {
        // Release the id before completing, so a completion that issues a
        // new command can reuse it.
        let Some(slot) = self.tids.take(tid) else {
            debug!(%tid, "discarding response for unknown transaction");
            return;
        };

        let result = match decode_frame(raw) {
            Ok(frame) => self.decode_response(&slot, &frame),
            Err(err) => Err(ControllerError::MalformedResponse(err)),
        };
        self.handle_response_for_command(&slot, result);
    }

    fn decode_response(&mut self, slot: &TransactionSlot, frame: &Frame) -> TaskResult {
        match (frame.command, frame.key) {
            (CMD_PROP_VALUE_IS, Some(PROP_LAST_STATUS)) => {
                let status = decode_status(&mut frame.payload_decoder())
                    .map_err(ControllerError::MalformedResponse)?;
                if status.is_ok() {
                    Ok(())
                } else {
                    Err(ControllerError::Remote { status })
                }
            }
            (CMD_PROP_VALUE_IS, Some(key)) => {
                if slot.key != Some(key) {
                    warn!(
                        tid = %slot.tid,
                        expected = slot.key.map(property_name),
                        actual = property_name(key),
                        "response key differs from request"
                    );
                }
                self.handle_value_is(key, &frame.payload)
                    .map_err(ControllerError::MalformedResponse)
            }
            (command, _) => Err(ControllerError::UnexpectedResponse {
                command: command_name(command),
            }),
        }
    }

    fn handle_response_for_command(&mut self, slot: &TransactionSlot, result: TaskResult) {
        let Some(operation) = Operation::for_transaction(slot.command, slot.key) else {
            debug!(tid = %slot.tid, "response for untracked command");
            return;
        };
        debug!(%operation, tid = %slot.tid, ok = result.is_ok(), "operation completed");
        if !self.operations.complete(operation, result) {
            debug!(%operation, "no pending handle for response");
        }
    }
}

impl<I: SpinelInterface> FrameHandler for NcpSpinel<I> {
    fn handle_received_frame(&mut self, frame: &[u8], header: u8) -> FrameDisposition {
        if !self.is_initialized() {
            debug!(len = frame.len(), "saving frame received before init");
            return FrameDisposition::Save;
        }
        self.handle_frame(frame, header);
        FrameDisposition::Handled
    }

    fn handle_saved_frame(&mut self, frame: &[u8]) {
        let Some(&header) = frame.first() else {
            return;
        };
        self.handle_frame(frame, header);
    }
}

impl<I: SpinelInterface> Drop for NcpSpinel<I> {
    fn drop(&mut self) {
        self.deinit();
    }
}
