use ncpspinel_controller::Operation;

use crate::cmd::session::execute;
use crate::cmd::DatasetArgs;
use crate::exit::{CliError, CliResult, USAGE};
use crate::output::OutputFormat;

pub fn run(args: DatasetArgs, format: OutputFormat) -> CliResult<i32> {
    let tlvs = parse_tlvs(&args.tlvs)?;
    execute(&args.op, Operation::DatasetSetActive, format, |ncp, task| {
        ncp.dataset_set_active_tlvs(&tlvs, task)
    })
}

fn parse_tlvs(input: &str) -> CliResult<Vec<u8>> {
    let compact: String = input.split_whitespace().collect();
    hex::decode(compact).map_err(|err| CliError::new(USAGE, format!("--tlvs is not valid hex: {err}")))
}
