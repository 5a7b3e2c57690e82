//! Connection plumbing shared by the socket subcommands.
//!
//! The controller is single-threaded, so every subcommand drives it from
//! one loop: read a frame (or time out after [`POLL_INTERVAL`]), hand it to
//! the controller, then drain the controller's task queue.

use std::fs;
use std::os::unix::net::UnixStream;
use std::time::{Duration, Instant};

use ncpspinel_controller::{AsyncTask, DeviceRole, NcpConfig, NcpSpinel, Operation, PropsObserver};
use ncpspinel_transport::{uds, FrameReceiver, StreamInterface, TransportConfig, TransportError};
use ncpspinel_wire::Iid;
use tokio::sync::oneshot::error::TryRecvError;

use crate::cmd::{ConnectArgs, OperationArgs};
use crate::exit::{
    controller_error, io_error, transport_error, CliError, CliResult, DATA_INVALID, INTERNAL,
    SUCCESS, TIMEOUT, USAGE,
};
use crate::output::{print_record, OperationOutput, OutputFormat};

/// How long a blocked read waits before the loop re-checks its deadline.
pub const POLL_INTERVAL: Duration = Duration::from_millis(100);
const WRITE_TIMEOUT: Duration = Duration::from_secs(2);

pub type Controller = NcpSpinel<StreamInterface<UnixStream>>;

pub struct Session {
    pub socket: String,
    pub ncp: Controller,
    receiver: FrameReceiver<UnixStream>,
}

impl Session {
    pub fn open(args: &ConnectArgs, observer: impl PropsObserver + 'static) -> CliResult<Self> {
        let config = load_config(args)?;
        let transport = TransportConfig {
            max_frame_size: config.max_frame_size,
            read_timeout: Some(POLL_INTERVAL),
            write_timeout: Some(WRITE_TIMEOUT),
        };
        let (receiver, interface) = uds::connect(&args.path, &transport)
            .map_err(|err| transport_error("connect failed", err))?;

        let mut ncp = NcpSpinel::new(interface, config);
        ncp.init(observer);

        Ok(Self {
            socket: args.path.display().to_string(),
            ncp,
            receiver,
        })
    }

    /// Deliver at most one frame, then run whatever the controller queued.
    /// A quiet poll interval is not an error.
    pub fn pump(&mut self) -> Result<(), TransportError> {
        match self.receiver.receive(&mut self.ncp) {
            Ok(()) | Err(TransportError::Timeout) => {}
            Err(err) => return Err(err),
        }
        self.ncp.process();
        Ok(())
    }

    /// Start one lifecycle operation and wait for its terminal result.
    pub fn run_operation<F>(
        &mut self,
        operation: Operation,
        timeout: Duration,
        start: F,
    ) -> CliResult<()>
    where
        F: FnOnce(&mut Controller, AsyncTask),
    {
        let (task, mut rx) = AsyncTask::new();
        start(&mut self.ncp, task);

        let deadline = Instant::now() + timeout;
        loop {
            match rx.try_recv() {
                Ok(result) => {
                    return result.map_err(|err| controller_error(operation.name(), err))
                }
                Err(TryRecvError::Closed) => {
                    return Err(CliError::new(
                        INTERNAL,
                        format!("{operation}: handle dropped without a result"),
                    ))
                }
                Err(TryRecvError::Empty) => {}
            }
            if Instant::now() >= deadline {
                return Err(CliError::new(
                    TIMEOUT,
                    format!(
                        "{operation}: no response within {}ms",
                        timeout.as_millis()
                    ),
                ));
            }
            self.pump()
                .map_err(|err| transport_error("receive failed", err))?;
        }
    }
}

/// Connect, run one operation to completion and print the outcome.
pub fn execute<F>(
    args: &OperationArgs,
    operation: Operation,
    format: OutputFormat,
    start: F,
) -> CliResult<i32>
where
    F: FnOnce(&mut Controller, AsyncTask),
{
    let timeout = parse_duration(&args.timeout)?;
    let mut session = Session::open(&args.connect, |_: DeviceRole| {})?;
    session.run_operation(operation, timeout, start)?;

    print_record(
        &OperationOutput {
            operation: operation.name(),
            socket: session.socket.clone(),
            ok: true,
            role: session.ncp.device_role().as_str(),
        },
        format,
    );
    Ok(SUCCESS)
}

fn load_config(args: &ConnectArgs) -> CliResult<NcpConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let raw = fs::read_to_string(path).map_err(|err| {
                io_error(&format!("failed reading {}", path.display()), err)
            })?;
            serde_json::from_str(&raw).map_err(|err| {
                CliError::new(
                    DATA_INVALID,
                    format!("invalid config {}: {err}", path.display()),
                )
            })?
        }
        None => NcpConfig::default(),
    };
    if let Some(iid) = args.iid {
        config.iid = Iid::new(iid).ok_or_else(|| {
            CliError::new(USAGE, format!("--iid must be between 0 and {}", Iid::MAX))
        })?;
    }
    Ok(config)
}

pub fn parse_duration(input: &str) -> CliResult<Duration> {
    let input = input.trim();
    if input.is_empty() {
        return Err(CliError::new(USAGE, "duration must not be empty"));
    }

    let (number, unit) = if let Some(num) = input.strip_suffix("ms") {
        (num, "ms")
    } else if let Some(num) = input.strip_suffix('s') {
        (num, "s")
    } else {
        (input, "s")
    };

    let value: u64 = number
        .parse()
        .map_err(|_| CliError::new(USAGE, format!("invalid duration value: {input}")))?;

    if value == 0 {
        return Err(CliError::new(USAGE, "duration must be greater than zero"));
    }

    match unit {
        "ms" => Ok(Duration::from_millis(value)),
        _ => Ok(Duration::from_secs(value)),
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn connect_args(config: Option<PathBuf>, iid: Option<u8>) -> ConnectArgs {
        ConnectArgs {
            path: PathBuf::from("/tmp/unused.sock"),
            config,
            iid,
        }
    }

    #[test]
    fn parse_duration_seconds_and_millis() {
        assert_eq!(parse_duration("2s").unwrap(), Duration::from_secs(2));
        assert_eq!(parse_duration("150ms").unwrap(), Duration::from_millis(150));
        assert_eq!(parse_duration("3").unwrap(), Duration::from_secs(3));
    }

    #[test]
    fn parse_duration_rejects_invalid_values() {
        assert!(parse_duration("0s").is_err());
        assert!(parse_duration("bad").is_err());
        assert!(parse_duration("").is_err());
    }

    #[test]
    fn iid_flag_overrides_default() {
        let config = load_config(&connect_args(None, Some(3))).unwrap();
        assert_eq!(config.iid.get(), 3);
    }

    #[test]
    fn out_of_range_iid_is_usage_error() {
        let err = load_config(&connect_args(None, Some(4))).unwrap_err();
        assert_eq!(err.code, USAGE);
    }

    #[test]
    fn config_file_is_read_and_overridden() {
        let path = PathBuf::from(format!(
            "/tmp/ncpspinel-config-{}.json",
            std::process::id()
        ));
        fs::write(&path, r#"{ "iid": 1, "max_frame_size": 512 }"#).unwrap();

        let config = load_config(&connect_args(Some(path.clone()), None)).unwrap();
        assert_eq!(config.iid.get(), 1);
        assert_eq!(config.max_frame_size, 512);

        let config = load_config(&connect_args(Some(path.clone()), Some(2))).unwrap();
        assert_eq!(config.iid.get(), 2);

        fs::write(&path, r#"{ "iid": 9 }"#).unwrap();
        let err = load_config(&connect_args(Some(path.clone()), None)).unwrap_err();
        assert_eq!(err.code, DATA_INVALID);

        let _ = fs::remove_file(&path);
    }
}
