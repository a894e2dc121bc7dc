/// 商品目录（CRUD 与图片接入）
pub mod catalog;

/// 健康检查
pub mod health;

/// 图床上传客户端
pub mod upload;
