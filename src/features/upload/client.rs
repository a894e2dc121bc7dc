use std::time::Duration;

use serde::Deserialize;

use crate::config::ImageHostConfig;
use crate::error::AppError;

/// 图床上传客户端
///
/// 每次上传提交一个 multipart 表单（`file` 字节部分 + `api_key` 文本部分），
/// 图床返回持久化后的 `secure_url`。
#[derive(Clone)]
pub struct ImageHostClient {
    client: reqwest::Client,
    upload_endpoint: String,
    api_key: String,
}

/// 图床上传响应体（只关心 secure_url，其余字段忽略）
#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: String,
}

impl ImageHostClient {
    pub fn new(config: &ImageHostConfig) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AppError::Internal(format!("初始化 HTTP Client 失败: {e}")))?;

        Ok(Self {
            client,
            upload_endpoint: config.upload_endpoint.clone(),
            api_key: config.api_key.clone(),
        })
    }

    /// 上传一张图片，返回图床生成的持久 URL。
    pub async fn upload_image(&self, file_name: &str, bytes: Vec<u8>) -> Result<String, AppError> {
        let part = reqwest::multipart::Part::bytes(bytes).file_name(file_name.to_string());
        let form = reqwest::multipart::Form::new()
            .part("file", part)
            .text("api_key", self.api_key.clone());

        let resp = self
            .client
            .post(&self.upload_endpoint)
            .multipart(form)
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(AppError::Upload(format!(
                "图床返回异常状态: {}",
                resp.status()
            )));
        }

        let body: UploadResponse = resp
            .json()
            .await
            .map_err(|e| AppError::Json(format!("解析图床响应失败: {e}")))?;
        Ok(body.secure_url)
    }
}

/// 并发上传一组图片（单次创建最多 4 张），返回值保持输入顺序。
///
/// 任意一张失败则整组失败；已经上传成功的图片不回滚，可能在图床留下孤儿文件。
pub async fn upload_all(
    client: &ImageHostClient,
    files: Vec<(String, Vec<u8>)>,
) -> Result<Vec<String>, AppError> {
    let uploads = files
        .into_iter()
        .map(|(file_name, bytes)| async move { client.upload_image(&file_name, bytes).await });
    futures_util::future::try_join_all(uploads).await
}
