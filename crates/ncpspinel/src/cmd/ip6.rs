use ncpspinel_controller::Operation;

use crate::cmd::session::execute;
use crate::cmd::{Ip6Args, LinkState};
use crate::exit::CliResult;
use crate::output::OutputFormat;

pub fn run(args: Ip6Args, format: OutputFormat) -> CliResult<i32> {
    let enable = args.state == LinkState::Up;
    execute(&args.op, Operation::Ip6SetEnabled, format, |ncp, task| {
        ncp.ip6_set_enabled(enable, task)
    })
}
