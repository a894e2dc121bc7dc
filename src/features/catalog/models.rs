use serde::{Deserialize, Serialize};

/// 商品实体
///
/// 创建后不可修改，只能整体删除。
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// 商品 ID（服务端生成的 UUID）
    #[schema(example = "6e9c2ab8-4f70-4f3e-9d1a-0b7c2f9f4a11")]
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub category: String,
    pub sub_category: String,
    /// 尺码列表，保持提交时的顺序
    pub sizes: Vec<String>,
    pub bestseller: bool,
    /// 图片 URL 列表（1–4 张），顺序与提交槽位一致
    pub image: Vec<String>,
    /// 创建时间（Unix 毫秒，服务端写入时生成）
    pub date: i64,
}

/// 统一响应信封（消息类）
///
/// 目录接口无论成败都返回 HTTP 200，以 `success` 字段区分结果。
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct StatusMessage {
    pub success: bool,
    #[schema(example = "Product added")]
    pub message: String,
}

impl StatusMessage {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

/// 商品列表响应
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ProductListResponse {
    pub success: bool,
    pub products: Vec<Product>,
}

/// 单个商品响应
///
/// 未命中不是错误：`product` 为 null，`success` 仍为 true。
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct SingleProductResponse {
    pub success: bool,
    pub product: Option<Product>,
}

/// 删除请求体
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct RemoveProductRequest {
    /// 要删除的商品 ID
    pub id: String,
}

/// 单个商品查询请求体
#[derive(Debug, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SingleProductRequest {
    /// 要查询的商品 ID
    pub product_id: String,
}
