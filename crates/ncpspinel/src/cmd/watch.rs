use std::cell::RefCell;
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use ncpspinel_controller::DeviceRole;
use ncpspinel_transport::TransportError;
use tracing::debug;

use crate::cmd::session::Session;
use crate::cmd::WatchArgs;
use crate::exit::{transport_error, CliError, CliResult, FAILURE, INTERNAL, SUCCESS};
use crate::output::{now_unix_seconds, print_record, OutputFormat, RoleOutput};

pub fn run(args: WatchArgs, format: OutputFormat) -> CliResult<i32> {
    let roles: Rc<RefCell<Vec<DeviceRole>>> = Rc::default();
    let sink = Rc::clone(&roles);
    let mut session = Session::open(&args.connect, move |role: DeviceRole| {
        sink.borrow_mut().push(role)
    })?;

    let running = Arc::new(AtomicBool::new(true));
    install_ctrlc_handler(running.clone())?;

    let mut printed = 0usize;
    while running.load(Ordering::SeqCst) {
        match session.pump() {
            Ok(()) => {}
            Err(TransportError::Closed) => {
                debug!(printed, "co-processor closed the connection");
                return match args.count {
                    Some(count) if printed < count => Err(CliError::new(
                        FAILURE,
                        format!("connection closed after {printed} of {count} notifications"),
                    )),
                    _ => Ok(SUCCESS),
                };
            }
            Err(err) => return Err(transport_error("receive failed", err)),
        }

        let reported: Vec<DeviceRole> = roles.borrow_mut().drain(..).collect();
        for role in reported {
            print_record(
                &RoleOutput {
                    role: role.as_str(),
                    socket: session.socket.clone(),
                    timestamp: now_unix_seconds(),
                },
                format,
            );
            printed = printed.saturating_add(1);

            if args.count.is_some_and(|count| printed >= count) {
                return Ok(SUCCESS);
            }
        }
    }

    Ok(SUCCESS)
}

fn install_ctrlc_handler(running: Arc<AtomicBool>) -> CliResult<()> {
    ctrlc::set_handler(move || {
        running.store(false, Ordering::SeqCst);
    })
    .map_err(|err| CliError::new(INTERNAL, format!("signal handler setup failed: {err}")))
}
