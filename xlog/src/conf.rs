//! Service configuration
//! 服务配置

use std::{path::PathBuf, time::Duration};

use log::LevelFilter;

use crate::{
  Error, Result,
  consts::{ADDR, BLOCK_SIZE, IDLE, IO_TIMEOUT, PATH, SYNC_SIZE},
};

/// Service configuration, read once at startup
/// 服务配置，启动时读取一次
#[derive(Debug, Clone)]
pub struct Conf {
  /// Listen address, `:PORT` means all interfaces
  /// 监听地址，`:PORT` 表示所有网卡
  pub addr: String,
  /// Log file path
  /// 日志文件路径
  pub path: PathBuf,
  /// Bytes per block
  /// 每块字节数
  pub block_size: usize,
  /// Max blocks per sync
  /// 单次 sync 的最大块数
  pub sync_size: usize,
  /// Process log level: `Debug` when set, `Info` otherwise, see [`Conf::log_level`].
  /// The library never reads it; the server binary installs the level at startup.
  /// 进程日志级别：开启为 `Debug`，否则为 `Info`，见 [`Conf::log_level`]。
  /// 库内部不读取，由服务端程序在启动时设置。
  pub verbose: bool,
  pub io_timeout: Duration,
  pub idle: Duration,
}

impl Default for Conf {
  fn default() -> Self {
    Self {
      addr: ADDR.into(),
      path: PathBuf::from(PATH),
      block_size: BLOCK_SIZE,
      sync_size: SYNC_SIZE,
      verbose: false,
      io_timeout: IO_TIMEOUT,
      idle: IDLE,
    }
  }
}

impl Conf {
  pub fn check(&self) -> Result<()> {
    if self.block_size == 0 {
      return Err(Error::BadConf("block size is 0"));
    }
    if self.sync_size == 0 {
      return Err(Error::BadConf("sync size is 0"));
    }
    Ok(())
  }

  /// Max log level for the process 进程的最大日志级别
  pub fn log_level(&self) -> LevelFilter {
    if self.verbose {
      LevelFilter::Debug
    } else {
      LevelFilter::Info
    }
  }

  /// Address accepted by the socket layer
  /// 套接字层可接受的地址
  pub fn listen_addr(&self) -> String {
    norm_addr(&self.addr, "0.0.0.0")
  }
}

/// Prefix a bare `:PORT` with a host
/// 为 `:PORT` 补全主机
pub fn norm_addr(addr: &str, host: &str) -> String {
  if addr.starts_with(':') {
    format!("{host}{addr}")
  } else {
    addr.into()
  }
}
