#![cfg_attr(docsrs, feature(doc_cfg))]

//! xlog reference client
//! xlog 参考客户端
//!
//! Sends random blocks and counts the acks coming back.
//! 发送随机块并统计返回的确认。

use std::time::Duration;

use log::{info, warn};
use thiserror::Error;
use tokio::{
  io::{AsyncReadExt, AsyncWriteExt, BufReader},
  net::{
    TcpStream,
    tcp::{OwnedReadHalf, OwnedWriteHalf},
  },
  sync::mpsc,
  time::timeout,
};
use xlog::{
  Block,
  consts::{ACK, BLOCK_SIZE, IO_TIMEOUT},
  norm_addr,
};

#[derive(Debug, Error)]
pub enum Error {
  #[error("IO: {0}")]
  Io(#[from] std::io::Error),

  #[error("bad args: {0}")]
  BadArgs(&'static str),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Default server address 默认服务端地址
pub const ADDR: &str = "127.0.0.1:8080";

/// Default blocks to send 默认发送块数
pub const NUM: usize = 5;

/// Client configuration 客户端配置
#[derive(Debug, Clone)]
pub struct Conf {
  pub addr: String,
  pub num: usize,
  pub block_size: usize,
  pub io_timeout: Duration,
}

impl Default for Conf {
  fn default() -> Self {
    Self {
      addr: ADDR.into(),
      num: NUM,
      block_size: BLOCK_SIZE,
      io_timeout: IO_TIMEOUT,
    }
  }
}

/// Result of one run 单次运行结果
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Stats {
  pub sent: usize,
  pub acked: usize,
}

/// Block filled with one random byte
/// 以单个随机字节填充的块
pub fn random_block(size: usize) -> Block {
  vec![fastrand::u8(..); size]
}

/// Send `num` blocks, collect acks until all acked or the stream fails
/// 发送 `num` 个块，收集确认直到全部确认或连接出错
pub async fn run(conf: &Conf) -> Result<Stats> {
  if conf.num == 0 {
    return Err(Error::BadArgs("num is 0"));
  }
  if conf.block_size == 0 {
    return Err(Error::BadArgs("block size is 0"));
  }

  let stream = TcpStream::connect(norm_addr(&conf.addr, "127.0.0.1")).await?;
  stream.set_nodelay(true)?;
  let (rd, wr) = stream.into_split();

  let (sent_tx, mut sent_rx) = mpsc::unbounded_channel();
  let (ack_tx, mut ack_rx) = mpsc::unbounded_channel();
  let sender = tokio::spawn(send(wr, conf.num, conf.block_size, sent_tx));
  let receiver = tokio::spawn(recv(rd, conf.num, conf.io_timeout, ack_tx));

  let mut stats = Stats::default();
  let mut sending = true;

  loop {
    tokio::select! {
      sent = sent_rx.recv(), if sending => match sent {
        Some(()) => stats.sent += 1,
        None => sending = false,
      },
      ack = ack_rx.recv() => match ack {
        Some(()) => stats.acked += 1,
        None => break,
      },
    }
  }

  // All acked: the sender only has its shutdown left. Otherwise it may be
  // blocked on a dead peer.
  // 全部确认：发送端只剩 shutdown。否则它可能阻塞在失效连接上。
  if stats.acked == conf.num {
    let _ = sender.await;
  } else {
    sender.abort();
  }
  let _ = receiver.await;
  while sent_rx.recv().await.is_some() {
    stats.sent += 1;
  }

  info!("sent {} acked {}", stats.sent, stats.acked);
  Ok(stats)
}

async fn send(mut wr: OwnedWriteHalf, num: usize, size: usize, out: mpsc::UnboundedSender<()>) {
  for _ in 0..num {
    let block = random_block(size);
    if let Err(e) = wr.write_all(&block).await {
      warn!("block sending failed, closing: {e}");
      return;
    }
    if out.send(()).is_err() {
      return;
    }
  }
  // End of stream lets the server sync the tail batch at once
  // 流结束让服务端立即同步最后一批
  if let Err(e) = wr.shutdown().await {
    warn!("shutdown failed: {e}");
  }
}

async fn recv(rd: OwnedReadHalf, num: usize, io_timeout: Duration, out: mpsc::UnboundedSender<()>) {
  let mut reader = BufReader::new(rd);
  for _ in 0..num {
    let stat = match timeout(io_timeout, reader.read_u8()).await {
      Ok(Ok(stat)) => stat,
      Ok(Err(e)) => {
        warn!("ack receiving failed, closing: {e}");
        return;
      }
      Err(_) => {
        warn!("ack receiving timed out, closing");
        return;
      }
    };
    if stat != ACK {
      warn!("block storing failed, closing");
      return;
    }
    if out.send(()).is_err() {
      return;
    }
  }
}
