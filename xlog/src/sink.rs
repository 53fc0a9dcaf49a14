//! Storage seam of the writer
//! writer 的存储接口

use crate::{Block, Result};

/// Append-and-sync target, owned by exactly one writer
/// 追加并落盘的目标，仅由唯一的 writer 持有
///
/// Not safe for concurrent callers: the writer thread is the only one.
/// 不支持并发调用：只有 writer 线程会调用。
pub trait Sink {
  /// Write blocks in order, then sync. Either all blocks are durable or Err.
  /// 按序写入后 sync。要么全部落盘，要么返回错误。
  fn append(&mut self, blocks: Vec<Block>) -> impl Future<Output = Result<()>>;
}
