#![cfg_attr(docsrs, feature(doc_cfg))]

//! # xlog - network append-only log
//! 网络追加日志
//!
//! Clients stream fixed-size blocks over TCP. Blocks are batched per connection,
//! appended and synced by a single writer, then acked with one `1` byte each.
//! 客户端通过 TCP 发送定长块。每个连接攒批后交由唯一的 writer 追加并 sync，
//! 然后每块回复一个字节 `1` 作为确认。
//!
//! ```text
//! Acceptor ─spawn→ Conn ─submit→ Writer ─append+sync→ Log
//!                   ↑ ack bytes ←─────────┘
//! ```

mod acceptor;
mod conf;
pub mod consts;
mod conn;
mod durable;
mod error;
mod live;
mod sink;
mod writer;

/// Fixed-size client payload 定长客户端数据
pub type Block = Vec<u8>;

pub use acceptor::{Acceptor, accept_backoff};
pub use conf::{Conf, norm_addr};
pub use conn::{Close, Conn};
pub use durable::Log;
pub use error::{Error, Result};
pub use live::{Guard, Live};
pub use sink::Sink;
pub use writer::{Stats, Submitter, Writer};
