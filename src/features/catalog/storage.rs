use std::path::Path;

use sqlx::{ConnectOptions, Row, SqlitePool, sqlite::SqliteConnectOptions, sqlite::SqliteRow};

use crate::error::AppError;

use super::models::Product;

/// 商品文档存储
///
/// `sizes` 与 `image` 以 JSON 文本列保存，行序即插入顺序。
#[derive(Clone)]
pub struct ProductStorage {
    pub pool: SqlitePool,
}

impl ProductStorage {
    pub async fn connect_sqlite(path: &str, wal: bool) -> Result<Self, AppError> {
        let opt = SqliteConnectOptions::new()
            .filename(Path::new(path))
            .create_if_missing(true)
            .log_statements(tracing::log::LevelFilter::Off);
        let pool = SqlitePool::connect_with(opt)
            .await
            .map_err(|e| AppError::Storage(format!("sqlite connect: {e}")))?;
        if wal {
            sqlx::query("PRAGMA journal_mode=WAL;")
                .execute(&pool)
                .await
                .ok();
        }
        sqlx::query("PRAGMA synchronous=NORMAL;")
            .execute(&pool)
            .await
            .ok();
        Ok(Self { pool })
    }

    pub async fn init_schema(&self) -> Result<(), AppError> {
        let ddl = r#"
        CREATE TABLE IF NOT EXISTS products (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            description TEXT NOT NULL DEFAULT '',
            price REAL NOT NULL,
            category TEXT NOT NULL DEFAULT '',
            sub_category TEXT NOT NULL DEFAULT '',
            sizes TEXT NOT NULL,
            bestseller INTEGER NOT NULL DEFAULT 0,
            image TEXT NOT NULL,
            date INTEGER NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_products_date ON products(date);
        "#;
        sqlx::query(ddl)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::Storage(format!("init schema: {e}")))?;
        Ok(())
    }

    pub async fn insert_product(&self, product: &Product) -> Result<(), AppError> {
        let sizes_json = serde_json::to_string(&product.sizes)
            .map_err(|e| AppError::Internal(format!("编码 sizes 失败: {e}")))?;
        let image_json = serde_json::to_string(&product.image)
            .map_err(|e| AppError::Internal(format!("编码 image 失败: {e}")))?;

        sqlx::query(
            "INSERT INTO products(id, name, description, price, category, sub_category, sizes, bestseller, image, date)
             VALUES(?,?,?,?,?,?,?,?,?,?)",
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price)
        .bind(&product.category)
        .bind(&product.sub_category)
        .bind(&sizes_json)
        .bind(product.bestseller as i64)
        .bind(&image_json)
        .bind(product.date)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Storage(format!("insert product: {e}")))?;
        Ok(())
    }

    /// 返回全部商品，不过滤不分页，保持插入顺序。
    pub async fn find_all(&self) -> Result<Vec<Product>, AppError> {
        let rows = sqlx::query(
            "SELECT id, name, description, price, category, sub_category, sizes, bestseller, image, date
             FROM products ORDER BY rowid ASC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::Storage(format!("find all products: {e}")))?;

        rows.iter().map(row_to_product).collect()
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<Product>, AppError> {
        let row = sqlx::query(
            "SELECT id, name, description, price, category, sub_category, sizes, bestseller, image, date
             FROM products WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::Storage(format!("find product by id: {e}")))?;

        row.as_ref().map(row_to_product).transpose()
    }

    /// 删除指定 ID 的商品。ID 不存在时同样视为成功，不做区分。
    pub async fn delete_by_id(&self, id: &str) -> Result<(), AppError> {
        sqlx::query("DELETE FROM products WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::Storage(format!("delete product: {e}")))?;
        Ok(())
    }
}

fn row_to_product(row: &SqliteRow) -> Result<Product, AppError> {
    let sizes_json: String = row
        .try_get("sizes")
        .map_err(|e| AppError::Storage(format!("read sizes column: {e}")))?;
    let image_json: String = row
        .try_get("image")
        .map_err(|e| AppError::Storage(format!("read image column: {e}")))?;

    Ok(Product {
        id: row
            .try_get("id")
            .map_err(|e| AppError::Storage(format!("read id column: {e}")))?,
        name: row
            .try_get("name")
            .map_err(|e| AppError::Storage(format!("read name column: {e}")))?,
        description: row
            .try_get("description")
            .map_err(|e| AppError::Storage(format!("read description column: {e}")))?,
        price: row
            .try_get("price")
            .map_err(|e| AppError::Storage(format!("read price column: {e}")))?,
        category: row
            .try_get("category")
            .map_err(|e| AppError::Storage(format!("read category column: {e}")))?,
        sub_category: row
            .try_get("sub_category")
            .map_err(|e| AppError::Storage(format!("read sub_category column: {e}")))?,
        sizes: serde_json::from_str(&sizes_json)
            .map_err(|e| AppError::Storage(format!("decode sizes column: {e}")))?,
        bestseller: row
            .try_get::<i64, _>("bestseller")
            .map_err(|e| AppError::Storage(format!("read bestseller column: {e}")))?
            != 0,
        image: serde_json::from_str(&image_json)
            .map_err(|e| AppError::Storage(format!("decode image column: {e}")))?,
        date: row
            .try_get("date")
            .map_err(|e| AppError::Storage(format!("read date column: {e}")))?,
    })
}
