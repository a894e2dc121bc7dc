use std::sync::Arc;

use crate::features::catalog::storage::ProductStorage;
use crate::features::upload::client::ImageHostClient;

/// 聚合的应用共享状态
///
/// 外部服务句柄（存储、图床）以注入方式持有，便于测试时替换端点。
#[derive(Clone)]
pub struct AppState {
    pub storage: Arc<ProductStorage>,
    pub image_host: Arc<ImageHostClient>,
}
