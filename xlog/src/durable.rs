//! Append-only log file
//! 只追加的日志文件
//!
//! File content is the raw concatenation of synced blocks: no header, no length, no crc.
//! 文件内容即已 sync 块的原样拼接：无文件头、无长度、无校验。

use std::path::Path;

use compio::io::AsyncWriteAtExt;
use compio_fs::{File, OpenOptions};
use log::debug;

use crate::{Block, Result, Sink};

/// Durable log 持久日志
pub struct Log {
  file: File,
  pos: u64, // 文件写入偏移
}

impl Log {
  /// Open or create, writing resumes at the current end (never truncates)
  /// 打开或创建，从当前末尾继续写（不截断）
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref();
    let file = OpenOptions::new()
      .write(true)
      .create(true)
      .open(path)
      .await?;
    let pos = file.metadata().await?.len();
    debug!("log opened: {path:?}, pos={pos}");
    Ok(Self { file, pos })
  }

  /// End offset 末尾偏移
  #[inline]
  pub fn pos(&self) -> u64 {
    self.pos
  }
}

impl Sink for Log {
  /// `pos` moves only after the whole request is synced. A failed request
  /// leaves it at the request start, so the next request writes over the
  /// unacked bytes.
  /// 整个请求 sync 成功后 `pos` 才前移。失败的请求使其停在请求起点，
  /// 下一个请求会覆盖这些未确认的字节。
  async fn append(&mut self, blocks: Vec<Block>) -> Result<()> {
    let mut end = self.pos;
    // First failed write aborts, sync skipped
    // 首次写失败即中止，跳过 sync
    for block in blocks {
      let len = block.len() as u64;
      self.file.write_all_at(block, end).await.0?;
      end += len;
    }
    self.file.sync_all().await?;
    self.pos = end;
    Ok(())
  }
}
