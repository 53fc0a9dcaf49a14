//! Configuration and accept backoff tests
//! 配置与 accept 退避测试

use std::io;

use aok::{OK, Void};
use log::LevelFilter;
use xlog::{Conf, Error, accept_backoff, consts::ACCEPT_BACKOFF, norm_addr};

#[static_init::constructor(0)]
extern "C" fn _log_init() {
  log_init::init();
}

/// Verbose only raises the log level
/// verbose 只提升日志级别
#[test]
fn test_log_level() -> Void {
  assert_eq!(Conf::default().log_level(), LevelFilter::Info);
  let conf = Conf {
    verbose: true,
    ..Conf::default()
  };
  assert_eq!(conf.log_level(), LevelFilter::Debug);
  OK
}

/// Zero sizes are rejected
/// 大小为 0 时拒绝
#[test]
fn test_check() -> Void {
  Conf::default().check()?;
  let conf = Conf {
    block_size: 0,
    ..Conf::default()
  };
  assert!(matches!(conf.check(), Err(Error::BadConf(_))));
  let conf = Conf {
    sync_size: 0,
    ..Conf::default()
  };
  assert!(matches!(conf.check(), Err(Error::BadConf(_))));
  OK
}

/// Bare `:PORT` gets the host
/// 裸 `:PORT` 补全主机
#[test]
fn test_norm_addr() -> Void {
  assert_eq!(norm_addr(":8080", "0.0.0.0"), "0.0.0.0:8080");
  assert_eq!(norm_addr("127.0.0.1:9", "0.0.0.0"), "127.0.0.1:9");
  let conf = Conf {
    addr: ":7000".into(),
    ..Conf::default()
  };
  assert_eq!(conf.listen_addr(), "0.0.0.0:7000");
  OK
}

/// Resource errors pause the accept loop, per connection errors do not
/// 资源类错误使 accept 循环暂停，单连接错误不暂停
#[test]
fn test_accept_backoff() -> Void {
  // EMFILE: too many open files
  // EMFILE：打开文件过多
  #[cfg(unix)]
  assert_eq!(
    accept_backoff(&io::Error::from_raw_os_error(24)),
    Some(ACCEPT_BACKOFF)
  );
  assert_eq!(
    accept_backoff(&io::Error::other("no buffer space")),
    Some(ACCEPT_BACKOFF)
  );
  for kind in [
    io::ErrorKind::ConnectionAborted,
    io::ErrorKind::ConnectionReset,
    io::ErrorKind::Interrupted,
  ] {
    assert_eq!(accept_backoff(&io::Error::from(kind)), None);
  }
  OK
}
