//! xlog server
//! xlog 服务端

mod cli;

use std::{process::ExitCode, sync::Arc};

use clap::Parser;
use log::{error, info};
use tokio::signal;
use xlog::{Acceptor, Conf, Log, Stats, Writer};

fn main() -> ExitCode {
  let conf = cli::Cli::parse().into_conf();

  log_init::init();
  log::set_max_level(conf.log_level());

  let rt = match tokio::runtime::Builder::new_multi_thread()
    .enable_all()
    .build()
  {
    Ok(rt) => rt,
    Err(e) => {
      error!("runtime: {e}");
      return ExitCode::FAILURE;
    }
  };

  match rt.block_on(serve(conf)) {
    Ok(stats) => {
      info!("exit: {} blocks in {} syncs", stats.blocks, stats.reqs);
      ExitCode::SUCCESS
    }
    Err(e) => {
      error!("{e}");
      ExitCode::FAILURE
    }
  }
}

/// Run until a shutdown signal, then wait for the writer
/// 运行直到收到关闭信号，然后等待 writer 结束
async fn serve(conf: Conf) -> xlog::Result<Stats> {
  conf.check()?;
  let conf = Arc::new(conf);

  let path = conf.path.clone();
  let (writer, submitter) = Writer::spawn(move || Log::open(path)).await?;
  let acceptor = Acceptor::bind(conf, submitter).await?;

  acceptor.run(shutdown_signal()).await;
  writer.wait().await
}

/// Resolve on SIGINT or SIGTERM
/// 收到 SIGINT 或 SIGTERM 时完成
async fn shutdown_signal() {
  let ctrl_c = async {
    if let Err(e) = signal::ctrl_c().await {
      error!("install SIGINT handler: {e}");
      std::future::pending::<()>().await;
    }
  };

  #[cfg(unix)]
  let terminate = async {
    match signal::unix::signal(signal::unix::SignalKind::terminate()) {
      Ok(mut sig) => {
        sig.recv().await;
      }
      Err(e) => {
        error!("install SIGTERM handler: {e}");
        std::future::pending::<()>().await;
      }
    }
  };

  #[cfg(not(unix))]
  let terminate = std::future::pending::<()>();

  tokio::select! {
    () = ctrl_c => info!("SIGINT, shutting down..."),
    () = terminate => info!("SIGTERM, shutting down..."),
  }
}
