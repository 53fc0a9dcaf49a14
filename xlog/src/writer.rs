//! Writer actor: the only owner of the sink
//! 写入 actor：sink 的唯一持有者
//!
//! One thread with its own compio runtime drains a bounded queue, one request
//! at a time, so at most one append/sync is in flight. Submitters wait while
//! the queue is full, which throttles fast producers to disk speed.
//! 单线程 + 独立 compio 运行时，逐个处理有界队列中的请求，
//! 同一时刻最多一次 append/sync。队列满时提交方等待，从而把生产速度限制到磁盘速度。

use std::thread;

use compio::runtime::Runtime as CompioRuntime;
use log::{error, info};
use tokio::sync::{mpsc, oneshot};

use crate::{Block, Error, Result, Sink};

/// Queue depth 队列深度
const QUEUE: usize = 1;

/// Write request 写入请求
struct Req {
  blocks: Vec<Block>,
  tx: oneshot::Sender<Result<()>>,
}

/// Totals reported when the writer stops
/// writer 停止时报告的统计
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Stats {
  pub reqs: u64,
  pub blocks: u64,
  pub bytes: u64,
  pub failed: u64,
}

/// Writer handle, used to wait for the writer to finish
/// Writer 句柄，用于等待 writer 结束
///
/// The thread is detached; `done` fires after the sink is dropped.
/// 线程已分离；`done` 在 sink 释放后触发。
pub struct Writer {
  done: oneshot::Receiver<Stats>,
}

/// Queue entry point, one clone per connection
/// 队列入口，每个连接一份克隆
///
/// The queue closes once every clone is dropped.
/// 所有克隆都释放后队列关闭。
#[derive(Clone)]
pub struct Submitter {
  tx: mpsc::Sender<Req>,
}

impl Writer {
  /// Spawn writer thread, `open` runs on it; its error is returned here
  /// 启动 writer 线程，`open` 在该线程内执行，其错误在此返回
  pub async fn spawn<F, Fut, S>(open: F) -> Result<(Self, Submitter)>
  where
    F: FnOnce() -> Fut + Send + 'static,
    Fut: Future<Output = Result<S>>,
    S: Sink,
  {
    let (tx, rx) = mpsc::channel::<Req>(QUEUE);
    let (ready_tx, ready_rx) = oneshot::channel::<Result<()>>();
    let (done_tx, done) = oneshot::channel();

    thread::Builder::new()
      .name("xlog-writer".into())
      .spawn(move || {
        let rt = match CompioRuntime::new() {
          Ok(rt) => rt,
          Err(e) => {
            let _ = ready_tx.send(Err(e.into()));
            return;
          }
        };
        rt.block_on(async move {
          let sink = match open().await {
            Ok(sink) => sink,
            Err(e) => {
              let _ = ready_tx.send(Err(e));
              return;
            }
          };
          let _ = ready_tx.send(Ok(()));
          let _ = done_tx.send(run(sink, rx).await);
        });
      })?;

    match ready_rx.await {
      Ok(Ok(())) => Ok((Self { done }, Submitter { tx })),
      Ok(Err(e)) => Err(e),
      Err(_) => Err(Error::WriterClosed),
    }
  }

  /// Wait until the queue is closed and drained
  /// 等待队列关闭并处理完毕
  pub async fn wait(self) -> Result<Stats> {
    self.done.await.map_err(|_| Error::WriterClosed)
  }
}

impl Submitter {
  /// Enqueue blocks and wait until they are synced
  /// 入队并等待落盘
  pub async fn submit(&self, blocks: Vec<Block>) -> Result<()> {
    let (tx, rx) = oneshot::channel();
    self
      .tx
      .send(Req { blocks, tx })
      .await
      .map_err(|_| Error::WriterClosed)?;
    rx.await.map_err(|_| Error::WriterClosed)?
  }
}

/// Writer main loop Writer 主循环
async fn run<S: Sink>(mut sink: S, mut rx: mpsc::Receiver<Req>) -> Stats {
  let mut stats = Stats::default();

  while let Some(Req { blocks, tx }) = rx.recv().await {
    let n = blocks.len() as u64;
    let bytes: u64 = blocks.iter().map(|b| b.len() as u64).sum();

    let res = sink.append(blocks).await;
    match &res {
      Ok(()) => {
        stats.reqs += 1;
        stats.blocks += n;
        stats.bytes += bytes;
      }
      Err(e) => {
        stats.failed += 1;
        error!("append {n} blocks failed: {e}");
      }
    }
    // Submitter may be gone, nothing to do then
    // 提交方可能已退出，无需处理
    let _ = tx.send(res);
  }

  info!(
    "writer done: reqs={} blocks={} bytes={} failed={}",
    stats.reqs, stats.blocks, stats.bytes, stats.failed
  );
  stats
}
