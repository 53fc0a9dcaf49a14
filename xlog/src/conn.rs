//! Connection handler: batch blocks, sync, ack
//! 连接处理：攒批、落盘、确认
//!
//! A batch is flushed when it is full, when the stream ends, or when the idle
//! timer fires. The idle timer is armed when the batch goes from empty to
//! non-empty and is not pushed back by later blocks, so no block waits longer
//! than `idle` after the first block of its batch.
//! 批次在以下情况刷新：攒满、流结束、空闲定时器触发。
//! 空闲定时器在批次由空变非空时启动，后续块不会推迟它，
//! 因此任何块的等待时间不超过其批次首块到达后的 `idle`。

use std::{mem, sync::Arc};

use log::debug;
use tokio::{
  io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt},
  time::{Instant, timeout, timeout_at},
};

use crate::{Block, Conf, Error, Result, Submitter, consts::ACK};

/// Why a connection ended 连接结束原因
#[derive(Debug)]
pub enum Close {
  /// Clean end of stream, every block acked
  /// 正常结束，所有块均已确认
  Eof,
  /// Dropped on error, unacked blocks discarded
  /// 因错误关闭，未确认的块被丢弃
  Err(Error),
}

/// What ended a wait for input 等待输入的结果
enum Read {
  Block,
  Idle,
  Eof,
}

/// Per connection state 单连接状态
pub struct Conn<S> {
  id: u64,
  stream: S,
  conf: Arc<Conf>,
  submitter: Submitter,
  batch: Vec<Block>,
  buf: Vec<u8>,
  filled: usize, // buf 内已读字节
  flush_at: Option<Instant>,
}

impl<S: AsyncRead + AsyncWrite + Unpin> Conn<S> {
  pub fn new(id: u64, stream: S, conf: Arc<Conf>, submitter: Submitter) -> Self {
    Self {
      id,
      stream,
      batch: Vec::with_capacity(conf.sync_size),
      buf: vec![0; conf.block_size],
      filled: 0,
      flush_at: None,
      conf,
      submitter,
    }
  }

  /// Serve until the stream ends or fails
  /// 服务直到流结束或出错
  pub async fn run(mut self) -> Close {
    match self.serve().await {
      Ok(()) => Close::Eof,
      Err(e) => Close::Err(e),
    }
  }

  async fn serve(&mut self) -> Result<()> {
    loop {
      // Re-armed after every block and every flush
      // 每读完一块、每次刷新后重新计时
      let deadline = Instant::now() + self.conf.io_timeout;
      match self.read(deadline).await? {
        Read::Block => {
          if self.batch.len() >= self.conf.sync_size {
            self.flush().await?;
          }
        }
        Read::Idle => self.flush().await?,
        Read::Eof => {
          if !self.batch.is_empty() {
            self.flush().await?;
          }
          return Ok(());
        }
      }
    }
  }

  /// Wait for a full block, the idle timer, or the end of stream
  /// 等待完整块、空闲定时器或流结束
  ///
  /// Cancel safe: bytes of a partial block stay in `buf`.
  /// 可安全取消：未读完的块保留在 `buf` 中。
  async fn read(&mut self, deadline: Instant) -> Result<Read> {
    loop {
      let (wake, idle) = match self.flush_at {
        Some(at) if at <= deadline => (at, true),
        _ => (deadline, false),
      };

      let n = match timeout_at(wake, self.stream.read(&mut self.buf[self.filled..])).await {
        Ok(n) => n?,
        Err(_) if idle => return Ok(Read::Idle),
        Err(_) => return Err(Error::Timeout),
      };

      if n == 0 {
        if self.filled == 0 {
          return Ok(Read::Eof);
        }
        return Err(Error::ShortRead {
          got: self.filled,
          want: self.buf.len(),
        });
      }

      self.filled += n;
      if self.filled == self.buf.len() {
        self.filled = 0;
        let block = mem::replace(&mut self.buf, vec![0; self.conf.block_size]);
        if self.batch.is_empty() {
          self.flush_at = Some(Instant::now() + self.conf.idle);
        }
        self.batch.push(block);
        return Ok(Read::Block);
      }
    }
  }

  /// Submit the batch, ack every block once synced
  /// 提交批次，落盘后逐块确认
  async fn flush(&mut self) -> Result<()> {
    let blocks = mem::replace(&mut self.batch, Vec::with_capacity(self.conf.sync_size));
    self.flush_at = None;
    let n = blocks.len();

    self.submitter.submit(blocks).await?;
    debug!("{} synced {n} blocks", self.id);
    self.ack(n).await
  }

  async fn ack(&mut self, n: usize) -> Result<()> {
    let acks = vec![ACK; n];
    let stream = &mut self.stream;
    timeout(self.conf.io_timeout, async {
      stream.write_all(&acks).await?;
      stream.flush().await
    })
    .await
    .map_err(|_| Error::Timeout)??;
    Ok(())
  }
}
