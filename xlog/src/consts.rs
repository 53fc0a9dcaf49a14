//! 常量定义 Constants

use std::time::Duration;

/// 默认监听地址 Default listen address
pub const ADDR: &str = "0.0.0.0:8080";

/// 默认日志文件 Default log file
pub const PATH: &str = "test.xlog";

/// 块大小 Block size
pub const BLOCK_SIZE: usize = 4096;

/// 单次 sync 的最大块数 Max blocks per sync
pub const SYNC_SIZE: usize = 250;

/// 单次读写的超时 Per read / write deadline
pub const IO_TIMEOUT: Duration = Duration::from_secs(90);

/// 空闲刷新间隔 Idle flush interval
pub const IDLE: Duration = Duration::from_millis(100);

/// accept 出错后的退避 Backoff after an accept error
pub const ACCEPT_BACKOFF: Duration = Duration::from_millis(100);

/// 确认字节 Ack byte
pub const ACK: u8 = 1;
