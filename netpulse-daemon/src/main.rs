mod cli;

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;

use netpulse_core::config::NetpulseConfig;
use netpulse_core::error::{ConfigError, NetpulseError};
use netpulse_daemon::logging;
use netpulse_daemon::session::Session;

use crate::cli::DaemonCli;

#[tokio::main]
async fn main() -> Result<()> {
    let args = DaemonCli::parse();

    // 설정 로드 (파일이 없으면 기본값으로 동작)
    let mut config = load_config(&args.config).await?;

    // CLI 오버라이드는 설정 파일과 환경변수보다 우선
    if let Some(level) = args.log_level {
        config.general.log_level = level;
    }
    if let Some(format) = args.log_format {
        config.general.log_format = format;
    }
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("config validation failed: {}", e))?;

    if args.validate {
        println!("configuration OK: {}", args.config.display());
        return Ok(());
    }

    // 로깅 초기화
    logging::init_tracing(&config.general)?;
    tracing::info!("netpulse-daemon starting");

    let data_dir = config.general.data_dir.clone();
    let session = Arc::new(Session::new(config));
    session.start().await;

    // 주기적 상태 로그 태스크
    let status_task = tokio::spawn(status_loop(Arc::clone(&session)));

    // 종료 시그널 대기
    tracing::info!("netpulse-daemon running — capture active");
    tokio::signal::ctrl_c().await?;
    tracing::info!("shutdown signal received");

    status_task.abort();
    session.stop().await;

    // 우아한 종료 후 선택적 내보내기 (기록 실패는 경고로만 보고)
    if args.export_on_exit {
        match session.export_filtered_view().await {
            Ok(document) => write_export(&data_dir, &document.file_name, &document.contents).await,
            Err(e) => tracing::warn!(error = %e, "failed to render export document"),
        }
    }

    tracing::info!("netpulse-daemon shut down");
    Ok(())
}

/// 설정 파일을 로드합니다.
///
/// 파일이 없으면 경고 후 기본값 + 환경변수 오버라이드로 동작합니다.
async fn load_config(path: &Path) -> Result<NetpulseConfig> {
    match NetpulseConfig::load(path).await {
        Ok(config) => Ok(config),
        Err(NetpulseError::Config(ConfigError::FileNotFound { path })) => {
            eprintln!("config file {path} not found, using defaults");
            let mut config = NetpulseConfig::default();
            config.apply_env_overrides();
            Ok(config)
        }
        Err(e) => Err(anyhow::anyhow!("failed to load config: {}", e)),
    }
}

/// 10초마다 세션 상태를 로그로 남깁니다.
async fn status_loop(session: Arc<Session>) {
    let mut interval = tokio::time::interval(Duration::from_secs(10));
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        interval.tick().await;
        let snapshot = session.current_snapshot().await;
        let alerts = session.threat_alerts().await;
        tracing::info!(
            buffered = snapshot.packets.len(),
            total_packets = snapshot.stats.total_packets,
            rate = snapshot.stats.current_rate,
            total_bytes = snapshot.stats.total_bytes,
            threats = snapshot.stats.threat_count,
            active_alerts = alerts.len(),
            "session status"
        );
    }
}

/// 내보내기 문서를 데이터 디렉토리에 기록합니다.
///
/// 기록 실패는 경고로만 보고합니다.
async fn write_export(data_dir: &str, file_name: &str, contents: &str) {
    let path = Path::new(data_dir).join(file_name);
    let result = async {
        tokio::fs::create_dir_all(data_dir).await?;
        tokio::fs::write(&path, contents).await
    }
    .await;

    match result {
        Ok(()) => tracing::info!(path = %path.display(), "export document written"),
        Err(e) => tracing::warn!(path = %path.display(), error = %e, "failed to write export document"),
    }
}
