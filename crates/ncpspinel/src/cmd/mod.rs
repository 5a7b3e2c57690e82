use clap::{Args, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::exit::CliResult;
use crate::output::OutputFormat;

pub mod dataset;
pub mod decode;
pub mod detach;
pub mod erase;
pub mod ip6;
pub mod session;
pub mod thread;
pub mod version;
pub mod watch;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Apply an active operational dataset.
    Dataset(DatasetArgs),
    /// Bring the IPv6 interface up or down.
    Ip6(Ip6Args),
    /// Start or stop network participation.
    Thread(ThreadArgs),
    /// Leave the network gracefully.
    Detach(OperationArgs),
    /// Erase the network state persisted on the co-processor.
    Erase(OperationArgs),
    /// Print device role notifications.
    Watch(WatchArgs),
    /// Decode one Spinel frame given as hex.
    Decode(DecodeArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Dataset(args) => dataset::run(args, format),
        Command::Ip6(args) => ip6::run(args, format),
        Command::Thread(args) => thread::run(args, format),
        Command::Detach(args) => detach::run(args, format),
        Command::Erase(args) => erase::run(args, format),
        Command::Watch(args) => watch::run(args, format),
        Command::Decode(args) => decode::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug)]
pub struct ConnectArgs {
    /// Socket path of the co-processor bridge.
    pub path: PathBuf,
    /// Controller configuration file (JSON).
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
    /// Spinel interface id (0-3). Overrides the configuration file.
    #[arg(long)]
    pub iid: Option<u8>,
}

#[derive(Args, Debug)]
pub struct OperationArgs {
    #[command(flatten)]
    pub connect: ConnectArgs,
    /// Maximum time to wait for the co-processor (e.g. 5s, 500ms).
    #[arg(long, default_value = "5s")]
    pub timeout: String,
}

#[derive(Args, Debug)]
pub struct DatasetArgs {
    #[command(flatten)]
    pub op: OperationArgs,
    /// Active dataset TLVs as hex.
    #[arg(long, value_name = "HEX")]
    pub tlvs: String,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum LinkState {
    Up,
    Down,
}

#[derive(Args, Debug)]
pub struct Ip6Args {
    #[command(flatten)]
    pub op: OperationArgs,
    pub state: LinkState,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum ThreadAction {
    Start,
    Stop,
}

#[derive(Args, Debug)]
pub struct ThreadArgs {
    #[command(flatten)]
    pub op: OperationArgs,
    pub action: ThreadAction,
}

#[derive(Args, Debug)]
pub struct WatchArgs {
    #[command(flatten)]
    pub connect: ConnectArgs,
    /// Exit after printing N role notifications.
    #[arg(long)]
    pub count: Option<usize>,
}

#[derive(Args, Debug)]
pub struct DecodeArgs {
    /// Frame bytes as hex, starting with the header byte.
    pub frame: String,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}
