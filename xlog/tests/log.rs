//! Durable log tests
//! 持久日志测试

use aok::{OK, Void};
use xlog::{Log, Sink};

#[static_init::constructor(0)]
extern "C" fn _log_init() {
  log_init::init();
}

/// New log is empty
/// 新建日志为空
#[compio::test]
async fn test_log_new() -> Void {
  let dir = tempfile::tempdir()?;
  let path = dir.path().join("new.xlog");

  let log = Log::open(&path).await?;
  assert_eq!(log.pos(), 0);
  assert!(std::fs::read(&path)?.is_empty());
  OK
}

/// Appends concatenate in order
/// 追加按序拼接
#[compio::test]
async fn test_log_append() -> Void {
  let dir = tempfile::tempdir()?;
  let path = dir.path().join("append.xlog");
  let mut log = Log::open(&path).await?;

  log.append(vec![b"Hi".to_vec()]).await?;
  assert_eq!(std::fs::read(&path)?, b"Hi");

  log.append(vec![b", ".to_vec(), b"there!".to_vec()]).await?;
  assert_eq!(std::fs::read(&path)?, b"Hi, there!");
  assert_eq!(log.pos(), 10);
  OK
}

/// Empty request only syncs
/// 空请求只做 sync
#[compio::test]
async fn test_log_append_empty() -> Void {
  let dir = tempfile::tempdir()?;
  let path = dir.path().join("empty.xlog");
  let mut log = Log::open(&path).await?;

  log.append(Vec::new()).await?;
  assert_eq!(log.pos(), 0);
  assert!(std::fs::read(&path)?.is_empty());
  OK
}

/// Reopen keeps synced bytes and appends after them
/// 重新打开保留已落盘数据并在其后追加
#[compio::test]
async fn test_log_reopen() -> Void {
  let dir = tempfile::tempdir()?;
  let path = dir.path().join("reopen.xlog");

  {
    let mut log = Log::open(&path).await?;
    log.append(vec![b"AAAA".to_vec(), b"BBBB".to_vec()]).await?;
  }

  let mut log = Log::open(&path).await?;
  assert_eq!(log.pos(), 8);
  assert_eq!(std::fs::read(&path)?, b"AAAABBBB");

  log.append(vec![b"CCCC".to_vec()]).await?;
  assert_eq!(std::fs::read(&path)?, b"AAAABBBBCCCC");
  OK
}

/// Missing parent dir is an open error
/// 父目录不存在时打开失败
#[compio::test]
async fn test_log_open_fail() -> Void {
  let dir = tempfile::tempdir()?;
  let path = dir.path().join("missing").join("x.xlog");
  assert!(Log::open(&path).await.is_err());
  OK
}

/// Failed write leaves the offset at the request start
/// 写失败时偏移停在请求起点
#[cfg(target_os = "linux")]
#[compio::test]
async fn test_log_append_fail_keeps_pos() -> Void {
  // Every write to /dev/full fails with ENOSPC
  // 写 /dev/full 总是返回 ENOSPC
  let full = std::path::Path::new("/dev/full");
  if !full.exists() {
    return OK;
  }

  let mut log = Log::open(full).await?;
  let start = log.pos();
  assert!(log.append(vec![b"AAAA".to_vec(), b"BBBB".to_vec()]).await.is_err());
  assert_eq!(log.pos(), start);
  assert!(log.append(vec![b"CCCC".to_vec()]).await.is_err());
  assert_eq!(log.pos(), start);
  OK
}
