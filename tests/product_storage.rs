use uuid::Uuid;

use catalog_backend::features::catalog::models::Product;
use catalog_backend::features::catalog::storage::ProductStorage;

fn temp_db_path() -> String {
    std::env::temp_dir()
        .join(format!("catalog_storage_test_{}.db", Uuid::new_v4()))
        .to_string_lossy()
        .into_owned()
}

fn sample_product(id: &str, name: &str) -> Product {
    Product {
        id: id.to_string(),
        name: name.to_string(),
        description: "A plain cotton shirt".to_string(),
        price: 49.5,
        category: "Men".to_string(),
        sub_category: "Topwear".to_string(),
        sizes: vec!["S".to_string(), "M".to_string(), "L".to_string()],
        bestseller: true,
        image: vec!["https://img.example.test/shirt.png".to_string()],
        date: 1_700_000_000_000,
    }
}

async fn connect(path: &str) -> ProductStorage {
    let storage = ProductStorage::connect_sqlite(path, false)
        .await
        .expect("connect_sqlite");
    storage.init_schema().await.expect("init_schema");
    storage
}

#[tokio::test]
async fn insert_then_find_by_id_roundtrips_all_fields() {
    let path = temp_db_path();
    let storage = connect(&path).await;

    let product = sample_product("p1", "Shirt");
    storage.insert_product(&product).await.expect("insert");

    let loaded = storage
        .find_by_id("p1")
        .await
        .expect("find_by_id")
        .expect("product present");

    assert_eq!(loaded.id, product.id);
    assert_eq!(loaded.name, product.name);
    assert_eq!(loaded.description, product.description);
    assert_eq!(loaded.price, product.price);
    assert_eq!(loaded.category, product.category);
    assert_eq!(loaded.sub_category, product.sub_category);
    assert_eq!(loaded.sizes, product.sizes);
    assert_eq!(loaded.bestseller, product.bestseller);
    assert_eq!(loaded.image, product.image);
    assert_eq!(loaded.date, product.date);

    let _ = std::fs::remove_file(&path);
}

#[tokio::test]
async fn find_all_returns_insertion_order() {
    let path = temp_db_path();
    let storage = connect(&path).await;

    // 故意不按字典序插入，验证返回的是插入顺序而不是排序结果
    for (id, name) in [("z1", "Zebra"), ("a1", "Apple"), ("m1", "Mango")] {
        storage
            .insert_product(&sample_product(id, name))
            .await
            .expect("insert");
    }

    let all = storage.find_all().await.expect("find_all");
    let ids: Vec<&str> = all.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["z1", "a1", "m1"]);

    let _ = std::fs::remove_file(&path);
}

#[tokio::test]
async fn find_by_id_miss_returns_none() {
    let path = temp_db_path();
    let storage = connect(&path).await;

    let missing = storage.find_by_id("does-not-exist").await.expect("find");
    assert!(missing.is_none());

    let _ = std::fs::remove_file(&path);
}

#[tokio::test]
async fn delete_by_id_is_silent_about_missing_rows() {
    let path = temp_db_path();
    let storage = connect(&path).await;

    storage
        .insert_product(&sample_product("p1", "Shirt"))
        .await
        .expect("insert");

    // 存在的行被删除
    storage.delete_by_id("p1").await.expect("delete existing");
    assert!(storage.find_by_id("p1").await.expect("find").is_none());

    // 不存在的行同样返回 Ok，不区分
    storage
        .delete_by_id("does-not-exist")
        .await
        .expect("delete missing");

    let _ = std::fs::remove_file(&path);
}
