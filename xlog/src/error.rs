//! Error types for xlog
//! xlog 错误类型定义

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("IO: {0}")]
  Io(#[from] std::io::Error),

  #[error("deadline exceeded")]
  Timeout,

  #[error("short read: got {got} of {want} bytes")]
  ShortRead { got: usize, want: usize },

  #[error("writer closed")]
  WriterClosed,

  #[error("bad conf: {0}")]
  BadConf(&'static str),
}

pub type Result<T> = std::result::Result<T, Error>;
