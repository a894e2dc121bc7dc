pub mod handler;
pub mod links;
pub mod models;
pub mod storage;

// 对外导出路由构建函数，便于 main.rs 引用
pub use handler::create_catalog_router;
