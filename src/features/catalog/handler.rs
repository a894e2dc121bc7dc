use axum::{
    Router,
    extract::{Multipart, State},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
};
use chrono::Utc;
use uuid::Uuid;

use crate::error::AppError;
use crate::features::upload;
use crate::state::AppState;

use super::links::normalize_share_link;
use super::models::{
    Product, ProductListResponse, RemoveProductRequest, SingleProductRequest,
    SingleProductResponse, StatusMessage,
};

/// 单次创建最多接受的图片槽位数
const MAX_IMAGE_SLOTS: usize = 4;

/// 创建表单的原始字段（multipart 解析结果，未做类型转换）
#[derive(Default)]
struct AddProductForm {
    name: Option<String>,
    description: Option<String>,
    price: Option<String>,
    category: Option<String>,
    sub_category: Option<String>,
    sizes: Option<String>,
    bestseller: Option<String>,
    use_image_links: Option<String>,
    /// imageLink1..imageLink4
    image_links: [Option<String>; MAX_IMAGE_SLOTS],
    /// image1..image4 的 (文件名, 字节)
    files: [Option<(String, Vec<u8>)>; MAX_IMAGE_SLOTS],
}

/// `image1` -> Some(0)，`imageLink4` -> Some(3)；编号越界或无编号返回 None。
fn slot_index(field_name: &str, prefix: &str) -> Option<usize> {
    let n: usize = field_name.strip_prefix(prefix)?.parse().ok()?;
    (1..=MAX_IMAGE_SLOTS).contains(&n).then(|| n - 1)
}

async fn read_form(mut multipart: Multipart) -> Result<AddProductForm, AppError> {
    let mut form = AddProductForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Json(format!("读取 multipart 字段失败: {e}")))?
    {
        let Some(field_name) = field.name().map(str::to_string) else {
            continue;
        };

        match field_name.as_str() {
            "name" => form.name = Some(read_text(field).await?),
            "description" => form.description = Some(read_text(field).await?),
            "price" => form.price = Some(read_text(field).await?),
            "category" => form.category = Some(read_text(field).await?),
            "subCategory" => form.sub_category = Some(read_text(field).await?),
            "sizes" => form.sizes = Some(read_text(field).await?),
            "bestseller" => form.bestseller = Some(read_text(field).await?),
            "useImageLinks" => form.use_image_links = Some(read_text(field).await?),
            other => {
                // 槽位字段：imageLink 前缀要先于 image 前缀匹配
                if let Some(slot) = slot_index(other, "imageLink") {
                    form.image_links[slot] = Some(read_text(field).await?);
                } else if let Some(slot) = slot_index(other, "image") {
                    let file_name = field.file_name().unwrap_or("upload").to_string();
                    let bytes = field
                        .bytes()
                        .await
                        .map_err(|e| AppError::Json(format!("读取上传文件失败: {e}")))?;
                    form.files[slot] = Some((file_name, bytes.to_vec()));
                }
                // 其余未知字段忽略
            }
        }
    }

    Ok(form)
}

async fn read_text(field: axum::extract::multipart::Field<'_>) -> Result<String, AppError> {
    field
        .text()
        .await
        .map_err(|e| AppError::Json(format!("读取 multipart 字段失败: {e}")))
}

/// 收集图片 URL：链接模式走直链改写，上传模式并发推送图床。
/// 两种模式都按槽位 1→4 保序，跳过缺席的槽位。
async fn collect_image_urls(
    state: &AppState,
    form: &mut AddProductForm,
) -> Result<Vec<String>, AppError> {
    if form.use_image_links.as_deref() == Some("true") {
        let links: Vec<String> = form
            .image_links
            .iter()
            .flatten()
            .map(|link| normalize_share_link(link))
            .collect();
        if links.is_empty() {
            return Err(AppError::Validation(
                "At least one image link is required".into(),
            ));
        }
        return Ok(links);
    }

    let files: Vec<(String, Vec<u8>)> = std::mem::take(&mut form.files).into_iter().flatten().collect();
    if files.is_empty() {
        return Err(AppError::Validation("At least one image is required".into()));
    }
    upload::upload_all(&state.image_host, files).await
}

async fn add_product_inner(state: &AppState, multipart: Multipart) -> Result<(), AppError> {
    let mut form = read_form(multipart).await?;

    // 图片先行：上传发生在其余字段转换之前，后续失败不回滚已上传的图片。
    let image = collect_image_urls(state, &mut form).await?;

    let name = form.name.unwrap_or_default();
    if name.is_empty() {
        return Err(AppError::Validation("Product name is required".into()));
    }

    let price: f64 = form
        .price
        .as_deref()
        .unwrap_or_default()
        .trim()
        .parse()
        .map_err(|_| AppError::Validation("Invalid price".into()))?;

    // sizes 必须是 JSON 字符串数组；解析失败走通用失败信封，细节只进日志。
    let sizes_raw = form.sizes.unwrap_or_default();
    let sizes: Vec<String> = serde_json::from_str(&sizes_raw)
        .map_err(|e| AppError::Json(format!("解析 sizes 字段失败: {e}")))?;

    let product = Product {
        id: Uuid::new_v4().to_string(),
        name,
        description: form.description.unwrap_or_default(),
        price,
        category: form.category.unwrap_or_default(),
        sub_category: form.sub_category.unwrap_or_default(),
        sizes,
        bestseller: form.bestseller.as_deref() == Some("true"),
        image,
        date: Utc::now().timestamp_millis(),
    };
    tracing::debug!("新增商品: {:?}", product);

    state.storage.insert_product(&product).await
}

/// 错误出口的统一策略：
/// 校验错误的信息原样返回；其余错误记日志，对外只暴露稳定的通用文案。
fn reject(err: AppError, fallback: &'static str) -> StatusMessage {
    match err {
        AppError::Validation(message) => StatusMessage::fail(message),
        other => {
            tracing::error!("{}: {}", fallback, other);
            StatusMessage::fail(fallback)
        }
    }
}

#[utoipa::path(
    post,
    path = "/product/add",
    summary = "创建商品",
    description = "multipart 表单创建商品。`useImageLinks=true` 时读取 imageLink1..4 并改写网盘分享直链，否则将 image1..4 文件并发上传图床。无论成败均返回 HTTP 200，以 success 字段区分。",
    responses((status = 200, description = "统一信封（success=true 表示创建成功）", body = StatusMessage)),
    tag = "Catalog"
)]
pub async fn add_product(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Json<StatusMessage> {
    match add_product_inner(&state, multipart).await {
        Ok(()) => Json(StatusMessage::ok("Product added")),
        Err(e) => Json(reject(e, "Error adding product")),
    }
}

#[utoipa::path(
    get,
    path = "/product/list",
    summary = "商品列表",
    description = "返回全部商品，不过滤不分页，按插入顺序排列。",
    responses((status = 200, description = "统一信封（success=true 时携带 products）", body = ProductListResponse)),
    tag = "Catalog"
)]
pub async fn list_products(State(state): State<AppState>) -> Response {
    match state.storage.find_all().await {
        Ok(products) => Json(ProductListResponse {
            success: true,
            products,
        })
        .into_response(),
        Err(e) => Json(reject(e, "Error listing products")).into_response(),
    }
}

#[utoipa::path(
    post,
    path = "/product/remove",
    summary = "删除商品",
    description = "按请求体中的 id 删除商品。ID 不存在时同样返回成功，不做区分。",
    request_body = RemoveProductRequest,
    responses((status = 200, description = "统一信封", body = StatusMessage)),
    tag = "Catalog"
)]
pub async fn remove_product(
    State(state): State<AppState>,
    Json(req): Json<RemoveProductRequest>,
) -> Json<StatusMessage> {
    match state.storage.delete_by_id(&req.id).await {
        Ok(()) => Json(StatusMessage::ok("Product removed")),
        Err(e) => Json(reject(e, "Error removing product")),
    }
}

#[utoipa::path(
    post,
    path = "/product/single",
    summary = "查询单个商品",
    description = "按请求体中的 productId 查询商品。未命中不是错误：product 为 null，success 仍为 true。",
    request_body = SingleProductRequest,
    responses((status = 200, description = "统一信封（product 可为 null）", body = SingleProductResponse)),
    tag = "Catalog"
)]
pub async fn single_product(
    State(state): State<AppState>,
    Json(req): Json<SingleProductRequest>,
) -> Response {
    match state.storage.find_by_id(&req.product_id).await {
        Ok(product) => Json(SingleProductResponse {
            success: true,
            product,
        })
        .into_response(),
        Err(e) => Json(reject(e, "Error fetching product")).into_response(),
    }
}

pub fn create_catalog_router() -> Router<AppState> {
    Router::new()
        .route("/product/add", post(add_product))
        .route("/product/list", get(list_products))
        .route("/product/remove", post(remove_product))
        .route("/product/single", post(single_product))
}
