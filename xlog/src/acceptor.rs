//! Acceptor and graceful shutdown
//! 连接接收与优雅关闭
//!
//! listening → draining → stopped:
//! shutdown closes the listener, waits for every handler, then drops the last
//! submitter so the writer queue closes and the writer can finish.
//! 监听 → 排空 → 停止：
//! 关闭时先关闭监听，等待所有 handler 结束，再释放最后一个 submitter，
//! 使 writer 队列关闭、writer 得以结束。

use std::{
  io::{self, ErrorKind},
  net::SocketAddr,
  sync::Arc,
  time::Duration,
};

use log::{debug, info, warn};
use tokio::{
  net::{TcpListener, TcpStream},
  time::sleep,
};

use crate::{Close, Conf, Conn, Live, Result, Submitter, consts::ACCEPT_BACKOFF};

/// Pause after a failed accept. `None` when only the one pending connection
/// failed; resource errors (fd limit, no buffers) wait so the loop does not spin.
/// accept 失败后的暂停时间。仅单个待接收连接失败时为 `None`；
/// 资源类错误（fd 上限、缓冲不足）需等待，避免空转。
pub fn accept_backoff(e: &io::Error) -> Option<Duration> {
  match e.kind() {
    ErrorKind::ConnectionAborted
    | ErrorKind::ConnectionReset
    | ErrorKind::ConnectionRefused
    | ErrorKind::Interrupted
    | ErrorKind::WouldBlock => None,
    _ => Some(ACCEPT_BACKOFF),
  }
}

pub struct Acceptor {
  listener: TcpListener,
  conf: Arc<Conf>,
  submitter: Submitter,
  live: Live,
  next_id: u64,
}

impl Acceptor {
  pub async fn bind(conf: Arc<Conf>, submitter: Submitter) -> Result<Self> {
    let listener = TcpListener::bind(conf.listen_addr()).await?;
    info!("listening on {}", listener.local_addr()?);
    Ok(Self {
      listener,
      conf,
      submitter,
      live: Live::new(),
      next_id: 0,
    })
  }

  pub fn local_addr(&self) -> Result<SocketAddr> {
    Ok(self.listener.local_addr()?)
  }

  /// Counter of running handlers 运行中 handler 计数
  pub fn live(&self) -> Live {
    self.live.clone()
  }

  /// Accept until `shutdown` resolves, then drain
  /// 持续接收直到 `shutdown` 完成，然后排空
  pub async fn run(mut self, shutdown: impl Future<Output = ()>) {
    let mut shutdown = std::pin::pin!(shutdown);

    loop {
      let res = tokio::select! {
        biased;
        () = &mut shutdown => break,
        res = self.listener.accept() => res,
      };
      match res {
        Ok((stream, peer)) => self.spawn(stream, peer),
        Err(e) => {
          warn!("accept failed: {e}");
          if let Some(pause) = accept_backoff(&e) {
            tokio::select! {
              biased;
              () = &mut shutdown => break,
              () = sleep(pause) => {}
            }
          }
        }
      }
    }

    let Self {
      listener,
      submitter,
      live,
      ..
    } = self;
    drop(listener);
    info!("draining {} connections", live.count());
    live.drained().await;
    // Last sender, the writer queue closes once handlers are gone
    // 最后一个发送端，handler 全部退出后 writer 队列随之关闭
    drop(submitter);
    info!("stopped");
  }

  fn spawn(&mut self, stream: TcpStream, peer: SocketAddr) {
    let id = self.next_id;
    self.next_id += 1;
    debug!("{id} accepted from {peer}");

    if let Err(e) = stream.set_nodelay(true) {
      warn!("{id} set nodelay failed: {e}");
    }

    let guard = self.live.enter();
    let conn = Conn::new(id, stream, self.conf.clone(), self.submitter.clone());
    tokio::spawn(async move {
      // Conn (and its submitter) drops before the guard
      // conn（及其 submitter）先于 guard 释放
      let _guard = guard;
      match conn.run().await {
        Close::Eof => debug!("{id} closed"),
        Close::Err(e) => warn!("{id} {e}, closing"),
      }
    });
  }
}
