//! Command line interface
//! 命令行参数

use std::path::PathBuf;

use clap::Parser;
use xlog::{
  Conf,
  consts::{ADDR, BLOCK_SIZE, PATH, SYNC_SIZE},
};

/// Append-only log server: blocks in, one ack byte per synced block out.
#[derive(Parser, Debug)]
#[command(name = "xlog_srv")]
#[command(version, about, long_about = None)]
pub struct Cli {
  /// Listen address, `:PORT` means all interfaces.
  #[arg(default_value = ADDR)]
  pub addr: String,

  /// Path to the log file.
  #[arg(short = 'f', long = "file", default_value = PATH)]
  pub path: PathBuf,

  /// Block size in bytes.
  #[arg(short, long, default_value_t = BLOCK_SIZE)]
  pub block_size: usize,

  /// Max blocks per sync.
  #[arg(short, long, default_value_t = SYNC_SIZE)]
  pub sync_size: usize,

  /// Verbose logging.
  #[arg(short, long)]
  pub verbose: bool,
}

impl Cli {
  pub fn into_conf(self) -> Conf {
    Conf {
      addr: self.addr,
      path: self.path,
      block_size: self.block_size,
      sync_size: self.sync_size,
      verbose: self.verbose,
      ..Conf::default()
    }
  }
}
