//! 应用配置管理
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::models::reminder::DEFAULT_REMINDER_WINDOW_DAYS;

const APP_NAME: &str = "supplier-admin";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 模拟提交耗时（毫秒）
    pub simulated_delay_ms: u64,
    /// 截止日期提醒窗口（天）
    pub reminder_window_days: i64,
    /// 用户列表每页条数
    pub users_per_page: usize,
    /// 日志级别，`RUST_LOG` 优先
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            simulated_delay_ms: 1000,
            reminder_window_days: DEFAULT_REMINDER_WINDOW_DAYS,
            users_per_page: 5,
            log_level: "info".to_string(),
        }
    }
}

fn project_dirs() -> Result<directories::ProjectDirs> {
    directories::ProjectDirs::from("", "", APP_NAME).context("无法确定用户目录")
}

/// 获取配置文件路径
/// Linux: ~/.config/supplier-admin/config.toml
/// macOS: ~/Library/Application Support/supplier-admin/config.toml
/// Windows: %APPDATA%\supplier-admin\config\config.toml
pub fn get_config_path() -> Result<PathBuf> {
    Ok(project_dirs()?.config_dir().join("config.toml"))
}

/// 日志目录
pub fn get_data_dir() -> Result<PathBuf> {
    Ok(project_dirs()?.data_dir().to_path_buf())
}

/// 从指定路径加载配置，文件不存在时返回默认配置
pub fn load_config_from(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("读取配置失败: {}", path.display()))?;
    let config: Config = toml::from_str(&content)
        .with_context(|| format!("解析配置失败: {}", path.display()))?;

    Ok(config)
}

/// 保存配置到指定路径
pub fn save_config_to(config: &Config, path: &Path) -> Result<()> {
    // 确保目录存在
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content)?;

    Ok(())
}

/// 加载配置
pub fn load_config() -> Result<Config> {
    load_config_from(&get_config_path()?)
}

/// 保存配置
pub fn save_config(config: &Config) -> Result<()> {
    save_config_to(config, &get_config_path()?)
}

/// 首次运行时写入默认配置
pub fn load_or_init() -> Result<Config> {
    let path = get_config_path()?;
    if path.exists() {
        load_config_from(&path)
    } else {
        let config = Config::default();
        save_config_to(&config, &path)?;
        tracing::info!(path = %path.display(), "已写入默认配置");
        Ok(config)
    }
}

/// 更新模拟提交耗时
pub fn set_delay(delay_ms: u64) -> Result<()> {
    let mut config = load_config()?;
    config.simulated_delay_ms = delay_ms;
    save_config(&config)?;
    println!("✓ 模拟提交耗时已设置为: {} ms", config.simulated_delay_ms);
    Ok(())
}

/// 更新截止日期提醒窗口
pub fn set_window(days: i64) -> Result<()> {
    if days < 0 {
        anyhow::bail!("提醒窗口不能为负数: {}", days);
    }
    let mut config = load_config()?;
    config.reminder_window_days = days;
    save_config(&config)?;
    println!("✓ 提醒窗口已设置为: {} 天", config.reminder_window_days);
    Ok(())
}

/// 显示当前配置
pub fn show_config() -> Result<()> {
    let config = load_config()?;
    println!("当前配置:");
    println!("  模拟提交耗时: {} ms", config.simulated_delay_ms);
    println!("  提醒窗口:     {} 天", config.reminder_window_days);
    println!("  每页用户数:   {}", config.users_per_page);
    println!("  日志级别:     {}", config.log_level);
    println!();
    println!("配置文件: {}", get_config_path()?.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.users_per_page, 5);
        assert_eq!(config.reminder_window_days, 2);
    }

    #[test]
    fn test_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let config = Config {
            simulated_delay_ms: 250,
            reminder_window_days: 3,
            users_per_page: 8,
            log_level: "debug".to_string(),
        };
        save_config_to(&config, &path).unwrap();

        assert_eq!(load_config_from(&path).unwrap(), config);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "simulated_delay_ms = 10\n").unwrap();

        let config = load_config_from(&path).unwrap();
        assert_eq!(config.simulated_delay_ms, 10);
        assert_eq!(config.users_per_page, 5);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_invalid_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "users_per_page = \"many\"\n").unwrap();

        assert!(load_config_from(&path).is_err());
    }
}
