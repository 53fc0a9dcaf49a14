//! Live connection counter
//! 在线连接计数

use std::sync::{
  Arc,
  atomic::{AtomicUsize, Ordering::AcqRel, Ordering::Acquire},
};

use event_listener::Event;

struct Inner {
  n: AtomicUsize,
  event: Event,
}

/// Count of running handlers, drain waits for zero
/// 运行中 handler 的计数，drain 等待其归零
#[derive(Clone)]
pub struct Live(Arc<Inner>);

/// Held by one handler, decrements on drop
/// 由单个 handler 持有，drop 时减一
pub struct Guard(Arc<Inner>);

impl Live {
  pub fn new() -> Self {
    Self(Arc::new(Inner {
      n: AtomicUsize::new(0),
      event: Event::new(),
    }))
  }

  pub fn enter(&self) -> Guard {
    self.0.n.fetch_add(1, AcqRel);
    Guard(self.0.clone())
  }

  #[inline]
  pub fn count(&self) -> usize {
    self.0.n.load(Acquire)
  }

  /// Wait until every guard is dropped
  /// 等待所有 guard 释放
  pub async fn drained(&self) {
    while self.count() != 0 {
      let listener = self.0.event.listen();
      if self.count() == 0 {
        break;
      }
      listener.await;
    }
  }
}

impl Default for Live {
  fn default() -> Self {
    Self::new()
  }
}

impl Drop for Guard {
  fn drop(&mut self) {
    if self.0.n.fetch_sub(1, AcqRel) == 1 {
      self.0.event.notify(usize::MAX);
    }
  }
}
