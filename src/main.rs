use std::sync::Arc;

use axum::{Router, routing::get};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use catalog_backend::cors::build_cors_layer;
use catalog_backend::features::catalog::{self, models, storage::ProductStorage};
use catalog_backend::features::health::health_check;
use catalog_backend::features::upload::client::ImageHostClient;
use catalog_backend::startup::run_startup_checks;
use catalog_backend::state::AppState;
use catalog_backend::{AppConfig, ShutdownManager};

#[derive(OpenApi)]
#[openapi(
    paths(
        catalog_backend::features::catalog::handler::add_product,
        catalog_backend::features::catalog::handler::list_products,
        catalog_backend::features::catalog::handler::remove_product,
        catalog_backend::features::catalog::handler::single_product,
        catalog_backend::features::health::handler::health_check,
    ),
    components(
        schemas(
            models::Product,
            models::StatusMessage,
            models::ProductListResponse,
            models::SingleProductResponse,
            models::RemoveProductRequest,
            models::SingleProductRequest,
            catalog_backend::features::health::handler::HealthResponse,
        )
    ),
    tags(
        (name = "Catalog", description = "Catalog APIs"),
        (name = "Health", description = "Health APIs"),
    ),
    info(
        title = "Catalog Backend API",
        version = "0.1.0",
        description = "Product catalog service (Axum)"
    )
)]
pub struct ApiDoc;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "catalog_backend=info,tower_http=info".into()),
        )
        .init();

    // 创建优雅退出管理器
    let shutdown_manager = ShutdownManager::new();

    // Load config
    if let Err(e) = AppConfig::init_global() {
        tracing::error!("Config init failed: {}", e);
        std::process::exit(1);
    }
    let config = AppConfig::global();

    // 启动信号处理器
    shutdown_manager.start_signal_handler();

    // Run startup checks
    if let Err(e) = run_startup_checks(config).await {
        tracing::error!("Startup checks failed: {}", e);
        std::process::exit(1);
    }

    // 商品存储
    let storage = match ProductStorage::connect_sqlite(
        &config.storage.sqlite_path,
        config.storage.sqlite_wal,
    )
    .await
    {
        Ok(s) => s,
        Err(e) => {
            tracing::error!("商品存储初始化失败: {}", e);
            std::process::exit(1);
        }
    };
    if let Err(e) = storage.init_schema().await {
        tracing::error!("商品存储建表失败: {}", e);
        std::process::exit(1);
    }

    // 图床客户端
    let image_host = match ImageHostClient::new(&config.image_host) {
        Ok(c) => c,
        Err(e) => {
            tracing::error!("图床客户端初始化失败: {}", e);
            std::process::exit(1);
        }
    };

    // Shared state
    let app_state = AppState {
        storage: Arc::new(storage),
        image_host: Arc::new(image_host),
    };

    // Routes
    let mut app = Router::<AppState>::new()
        .route("/health", get(health_check))
        .nest(&config.api.prefix, catalog::create_catalog_router())
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .with_state(app_state);

    if let Some(cors) = build_cors_layer(&config.cors) {
        app = app.layer(cors);
    }

    let addr = config.server_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("Bind address failed {}: {}", addr, e);
            std::process::exit(1);
        });

    tracing::info!("Server: http://{}", addr);
    tracing::info!("Docs: http://{}/docs", addr);
    tracing::info!("Health: http://{}/health", addr);
    tracing::info!("Catalog API: http://{}{}/product", addr, config.api.prefix);

    // 收到信号后停止接收新连接，存量连接最多再等 shutdown.timeout_secs 秒
    let signal_manager = shutdown_manager.clone();
    let server = axum::serve(listener, app).with_graceful_shutdown(async move {
        let reason = signal_manager.wait_for_shutdown().await;
        tracing::info!("接收到退出信号: {:?}，开始优雅退出...", reason);
    });

    let drain_manager = shutdown_manager.clone();
    let shutdown_timeout = config.shutdown.timeout_duration();
    let drain_deadline = async move {
        drain_manager.wait_for_shutdown().await;
        tokio::time::sleep(shutdown_timeout).await;
    };

    tokio::select! {
        result = async { server.await } => match result {
            Ok(()) => tracing::info!("服务器已优雅关闭"),
            Err(e) => {
                tracing::error!("服务器运行错误: {}", e);
                std::process::exit(1);
            }
        },
        _ = drain_deadline => {
            tracing::warn!("优雅退出超时（{}秒），强制退出", config.shutdown.timeout_secs);
        }
    }
}
