use ncpspinel_controller::TransactionTable;
use ncpspinel_wire::DEFAULT_MAX_FRAME_SIZE;

use crate::cmd::VersionArgs;
use crate::exit::{CliResult, SUCCESS};

pub fn run(args: VersionArgs) -> CliResult<i32> {
    if !args.extended {
        println!("ncpspinel {}", env!("CARGO_PKG_VERSION"));
        return Ok(SUCCESS);
    }

    println!("name: ncpspinel");
    println!("version: {}", env!("CARGO_PKG_VERSION"));
    println!(
        "target: {}",
        option_env!("NCPSPINEL_BUILD_TARGET").unwrap_or("unknown")
    );
    println!("target_os: {}", std::env::consts::OS);
    println!("target_arch: {}", std::env::consts::ARCH);
    println!("max_frame_size: {DEFAULT_MAX_FRAME_SIZE}");
    println!("transaction_ids: {}", TransactionTable::CAPACITY);

    Ok(SUCCESS)
}
