use ncpspinel_controller::Operation;

use crate::cmd::session::execute;
use crate::cmd::{ThreadAction, ThreadArgs};
use crate::exit::CliResult;
use crate::output::OutputFormat;

pub fn run(args: ThreadArgs, format: OutputFormat) -> CliResult<i32> {
    let enable = args.action == ThreadAction::Start;
    execute(&args.op, Operation::ThreadSetEnabled, format, |ncp, task| {
        ncp.thread_set_enabled(enable, task)
    })
}
