//! 日志初始化
//!
//! 标准输出归终端界面使用，日志写入数据目录下的 `sadm.log`。
use anyhow::{Context, Result, anyhow};
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

pub const LOG_FILE_NAME: &str = "sadm.log";

/// `RUST_LOG` 优先，其次使用配置中的级别
pub fn build_filter(log_level: &str) -> Result<EnvFilter> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(log_level).context("invalid log level"),
    }
}

/// 初始化文件日志，返回的 guard 需要保持到进程结束
pub fn init_tracing(log_dir: &Path, log_level: &str) -> Result<WorkerGuard> {
    std::fs::create_dir_all(log_dir)
        .with_context(|| format!("创建日志目录失败: {}", log_dir.display()))?;

    let filter = build_filter(log_level)?;
    let appender = tracing_appender::rolling::never(log_dir, LOG_FILE_NAME);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .try_init()
        .map_err(|err| anyhow!(err))
        .context("initialize tracing subscriber")?;

    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_filter_rejects_garbage() {
        // 仅在未设置 RUST_LOG 时校验配置值
        if std::env::var("RUST_LOG").is_err() {
            assert!(build_filter("info").is_ok());
            assert!(build_filter("supplier_admin=debug").is_ok());
            assert!(build_filter("=[").is_err());
        }
    }
}
