use std::fs;

use crate::config::AppConfig;
use crate::error::AppError;

/// 执行启动检查
///
/// 1. 检查并创建 SQLite 数据目录
/// 2. 校验图床配置
pub async fn run_startup_checks(config: &AppConfig) -> Result<(), AppError> {
    tracing::info!("开始执行启动检查...");

    ensure_data_dir(config)?;
    check_image_host_config(config);

    tracing::info!("启动检查完成");
    Ok(())
}

/// 确保 SQLite 数据目录存在
fn ensure_data_dir(config: &AppConfig) -> Result<(), AppError> {
    let db_path = config.sqlite_path();
    let Some(dir) = db_path.parent() else {
        return Ok(());
    };
    if dir.as_os_str().is_empty() || dir.exists() {
        return Ok(());
    }

    tracing::warn!("未找到数据目录，正在创建: {:?}", dir);
    fs::create_dir_all(dir).map_err(|e| AppError::Internal(format!("创建数据目录失败: {e}")))?;
    Ok(())
}

/// 图床凭证缺失只告警，不阻断启动（链接模式仍可用）。
fn check_image_host_config(config: &AppConfig) {
    if config.image_host.api_key.is_empty() {
        tracing::warn!("图床 api_key 未配置，文件上传将被图床拒绝");
    }
}
