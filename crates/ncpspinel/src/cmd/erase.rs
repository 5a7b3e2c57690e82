use ncpspinel_controller::Operation;

use crate::cmd::session::execute;
use crate::cmd::OperationArgs;
use crate::exit::CliResult;
use crate::output::OutputFormat;

pub fn run(args: OperationArgs, format: OutputFormat) -> CliResult<i32> {
    execute(&args, Operation::ThreadErasePersistentInfo, format, |ncp, task| {
        ncp.thread_erase_persistent_info(task)
    })
}
