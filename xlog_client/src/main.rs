//! xlog reference client
//! xlog 参考客户端

use std::process::ExitCode;

use clap::Parser;
use log::error;
use xlog::consts::BLOCK_SIZE;
use xlog_client::{ADDR, Conf, NUM, run};

/// Send random blocks to an xlog server and count the acks.
#[derive(Parser, Debug)]
#[command(name = "xlog_client")]
#[command(version, about, long_about = None)]
struct Cli {
  /// Server address, `:PORT` means localhost.
  #[arg(default_value = ADDR)]
  addr: String,

  /// Blocks to send.
  #[arg(short, long, default_value_t = NUM)]
  num: usize,

  /// Block size in bytes.
  #[arg(short, long, default_value_t = BLOCK_SIZE)]
  block_size: usize,
}

#[tokio::main]
async fn main() -> ExitCode {
  let cli = Cli::parse();
  log_init::init();

  let conf = Conf {
    addr: cli.addr,
    num: cli.num,
    block_size: cli.block_size,
    ..Conf::default()
  };

  match run(&conf).await {
    Ok(_) => ExitCode::SUCCESS,
    Err(e) => {
      error!("{e}");
      ExitCode::FAILURE
    }
  }
}
