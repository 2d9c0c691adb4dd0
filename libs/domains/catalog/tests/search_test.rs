//! Product search engine tests against real PostgreSQL
//!
//! Seeds a small deterministic dataset (two electronics, one t-shirt)
//! and exercises every filter, their combinations, ordering, and
//! pagination.

use domain_catalog::*;
use rust_decimal::Decimal;
use std::str::FromStr;
use test_utils::TestDatabase;

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

struct Seed {
    products: ProductService<PgProductRepository, PgCategoryRepository>,
    electronics: Category,
    #[allow(dead_code)]
    tshirts: Category,
}

async fn seed(db: &TestDatabase) -> Seed {
    let products = ProductService::new(
        PgProductRepository::new(db.connection()),
        PgCategoryRepository::new(db.connection()),
    );
    let categories = CategoryService::new(PgCategoryRepository::new(db.connection()));

    let electronics = categories
        .create_category(CreateCategory {
            name: "Electronics".to_string(),
            parent_id: None,
        })
        .await
        .unwrap();
    let clothing = categories
        .create_category(CreateCategory {
            name: "Clothing".to_string(),
            parent_id: None,
        })
        .await
        .unwrap();
    let tshirts = categories
        .create_category(CreateCategory {
            name: "T-Shirts".to_string(),
            parent_id: Some(clothing.id),
        })
        .await
        .unwrap();

    for (title, sku, price, category_id) in [
        ("Phone Case", "SKU-CASE-001", "10.00", electronics.id),
        ("Smart Phone", "SKU-PHONE-001", "500.00", electronics.id),
        ("T-Shirt", "SKU-TSHIRT-001", "25.00", tshirts.id),
    ] {
        products
            .create_product(CreateProduct {
                sku: sku.to_string(),
                title: title.to_string(),
                description: None,
                image: None,
                price: dec(price),
                category_id,
            })
            .await
            .unwrap();
    }

    Seed {
        products,
        electronics,
        tshirts,
    }
}

fn skus(results: &[Product]) -> Vec<&str> {
    results.iter().map(|p| p.sku.as_str()).collect()
}

#[tokio::test]
async fn test_search_returns_empty_when_no_matches() {
    let db = TestDatabase::new().await;
    let seed = seed(&db).await;

    let results = seed
        .products
        .search_products(ProductSearchParams {
            title: Some("Should not exist".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();

    assert!(results.is_empty());
}

#[tokio::test]
async fn test_search_no_filters_returns_all() {
    let db = TestDatabase::new().await;
    let seed = seed(&db).await;

    let results = seed
        .products
        .search_products(ProductSearchParams::default())
        .await
        .unwrap();

    assert_eq!(
        skus(&results),
        vec!["SKU-CASE-001", "SKU-PHONE-001", "SKU-TSHIRT-001"]
    );
}

#[tokio::test]
async fn test_search_by_title_match() {
    let db = TestDatabase::new().await;
    let seed = seed(&db).await;

    let results = seed
        .products
        .search_products(ProductSearchParams {
            title: Some("Smart Phone".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(skus(&results), vec!["SKU-PHONE-001"]);
}

#[tokio::test]
async fn test_search_by_partial_title_case_insensitive() {
    let db = TestDatabase::new().await;
    let seed = seed(&db).await;

    let results = seed
        .products
        .search_products(ProductSearchParams {
            title: Some("PHONE".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(skus(&results), vec!["SKU-CASE-001", "SKU-PHONE-001"]);
}

#[tokio::test]
async fn test_search_title_wildcards_are_literal() {
    let db = TestDatabase::new().await;
    let seed = seed(&db).await;

    // "%" must not match everything
    let results = seed
        .products
        .search_products(ProductSearchParams {
            title: Some("%".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();

    assert!(results.is_empty());
}

#[tokio::test]
async fn test_search_by_sku_exact_match() {
    let db = TestDatabase::new().await;
    let seed = seed(&db).await;

    let results = seed
        .products
        .search_products(ProductSearchParams {
            sku: Some("SKU-CASE-001".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(skus(&results), vec!["SKU-CASE-001"]);

    // Substrings do not match
    let results = seed
        .products
        .search_products(ProductSearchParams {
            sku: Some("SKU-CASE".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();

    assert!(results.is_empty());
}

#[tokio::test]
async fn test_search_by_min_price_inclusive() {
    let db = TestDatabase::new().await;
    let seed = seed(&db).await;

    let results = seed
        .products
        .search_products(ProductSearchParams {
            min_price: Some(dec("25")),
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(skus(&results), vec!["SKU-PHONE-001", "SKU-TSHIRT-001"]);
}

#[tokio::test]
async fn test_search_by_max_price_inclusive() {
    let db = TestDatabase::new().await;
    let seed = seed(&db).await;

    let results = seed
        .products
        .search_products(ProductSearchParams {
            max_price: Some(dec("25")),
            ..Default::default()
        })
        .await
        .unwrap();

    // Exactly the 10.00 and 25.00 items, ascending by id
    assert_eq!(skus(&results), vec!["SKU-CASE-001", "SKU-TSHIRT-001"]);
    for product in &results {
        assert!(product.price <= dec("25.00"));
    }
}

#[tokio::test]
async fn test_search_by_min_and_max_price_inclusive() {
    let db = TestDatabase::new().await;
    let seed = seed(&db).await;

    let results = seed
        .products
        .search_products(ProductSearchParams {
            min_price: Some(dec("10")),
            max_price: Some(dec("25")),
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(skus(&results), vec!["SKU-CASE-001", "SKU-TSHIRT-001"]);
    for product in &results {
        assert!(product.price >= dec("10.00"));
        assert!(product.price <= dec("25.00"));
    }
}

#[tokio::test]
async fn test_search_by_category_id() {
    let db = TestDatabase::new().await;
    let seed = seed(&db).await;

    let results = seed
        .products
        .search_products(ProductSearchParams {
            category_id: Some(seed.electronics.id),
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(skus(&results), vec!["SKU-CASE-001", "SKU-PHONE-001"]);
}

#[tokio::test]
async fn test_search_by_unknown_category_id_returns_empty() {
    let db = TestDatabase::new().await;
    let seed = seed(&db).await;

    let results = seed
        .products
        .search_products(ProductSearchParams {
            category_id: Some(100_000_000),
            ..Default::default()
        })
        .await
        .unwrap();

    assert!(results.is_empty());
}

#[tokio::test]
async fn test_search_combined_filters() {
    let db = TestDatabase::new().await;
    let seed = seed(&db).await;

    let results = seed
        .products
        .search_products(ProductSearchParams {
            title: Some("phone".to_string()),
            category_id: Some(seed.electronics.id),
            min_price: Some(dec("100")),
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(skus(&results), vec!["SKU-PHONE-001"]);
}

#[tokio::test]
async fn test_search_invalid_price_range_fails_before_the_store() {
    let db = TestDatabase::new().await;
    let seed = seed(&db).await;

    // Any combination of other filters still fails up front
    let result = seed
        .products
        .search_products(ProductSearchParams {
            title: Some("phone".to_string()),
            min_price: Some(dec("100")),
            max_price: Some(dec("10")),
            category_id: Some(seed.electronics.id),
            ..Default::default()
        })
        .await;

    match result {
        Err(CatalogError::Validation(errors)) => {
            assert_eq!(errors.len(), 1);
            assert_eq!(errors[0].field, "min_price & max_price");
        }
        other => panic!("expected validation error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_search_results_ordered_by_ascending_id() {
    let db = TestDatabase::new().await;
    let seed = seed(&db).await;

    let results = seed
        .products
        .search_products(ProductSearchParams::default())
        .await
        .unwrap();

    assert!(results.windows(2).all(|w| w[0].id < w[1].id));
}

#[tokio::test]
async fn test_search_pagination_limit_offset() {
    let db = TestDatabase::new().await;
    let seed = seed(&db).await;

    let page1 = seed
        .products
        .search_products(ProductSearchParams {
            limit: 1,
            offset: 0,
            ..Default::default()
        })
        .await
        .unwrap();
    let page2 = seed
        .products
        .search_products(ProductSearchParams {
            limit: 1,
            offset: 1,
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(page1.len(), 1);
    assert_eq!(page2.len(), 1);
    assert_ne!(page1[0].sku, page2[0].sku, "pages must not overlap");
    assert!(page1[0].id < page2[0].id);
}

#[tokio::test]
async fn test_search_offset_past_the_end_returns_empty() {
    let db = TestDatabase::new().await;
    let seed = seed(&db).await;

    let results = seed
        .products
        .search_products(ProductSearchParams {
            offset: 50,
            ..Default::default()
        })
        .await
        .unwrap();

    assert!(results.is_empty());
}
