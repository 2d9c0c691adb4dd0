//! Integration tests for the catalog domain
//!
//! These use real PostgreSQL via testcontainers to verify:
//! - Repository queries and sparse updates
//! - Storage constraints (unique sku, restrict/set-null foreign keys)
//! - Service-level aggregated validation against real rows

use domain_catalog::*;
use rust_decimal::Decimal;
use std::str::FromStr;
use test_utils::{assertions::*, TestDatabase, TestDataBuilder};

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn services(
    db: &TestDatabase,
) -> (
    ProductService<PgProductRepository, PgCategoryRepository>,
    CategoryService<PgCategoryRepository>,
) {
    let products = ProductService::new(
        PgProductRepository::new(db.connection()),
        PgCategoryRepository::new(db.connection()),
    );
    let categories = CategoryService::new(PgCategoryRepository::new(db.connection()));
    (products, categories)
}

async fn seed_category(
    categories: &CategoryService<PgCategoryRepository>,
    name: &str,
    parent_id: Option<i32>,
) -> Category {
    categories
        .create_category(CreateCategory {
            name: name.to_string(),
            parent_id,
        })
        .await
        .unwrap()
}

fn product_input(sku: &str, title: &str, price: &str, category_id: i32) -> CreateProduct {
    CreateProduct {
        sku: sku.to_string(),
        title: title.to_string(),
        description: None,
        image: None,
        price: dec(price),
        category_id,
    }
}

// ============================================================================
// Product write pipeline
// ============================================================================

#[tokio::test]
async fn test_create_and_get_product() {
    let db = TestDatabase::new().await;
    let (products, categories) = services(&db);
    let builder = TestDataBuilder::from_test_name("create_and_get");

    let category = seed_category(&categories, &builder.name("category", "root"), None).await;

    let input = CreateProduct {
        sku: builder.sku("main"),
        title: "Smart Phone".to_string(),
        description: Some("A phone".to_string()),
        image: Some("https://example.com/phone.png".parse().unwrap()),
        price: dec("499.99"),
        category_id: category.id,
    };

    let created = products.create_product(input).await.unwrap();

    assert!(created.id > 0);
    assert_eq!(created.sku, builder.sku("main"));
    assert_eq!(created.price, dec("499.99"));
    // The image URL is persisted in canonical string form
    assert_eq!(
        created.image.as_deref(),
        Some("https://example.com/phone.png")
    );

    let retrieved = products.get_product(created.id).await.unwrap();
    assert_eq!(retrieved.id, created.id);

    // Reads eager-load the category summary
    let summary = assert_some(retrieved.category, "category should be loaded");
    assert_eq!(summary.id, category.id);
}

#[tokio::test]
async fn test_create_duplicate_sku_fails_on_sku_field() {
    let db = TestDatabase::new().await;
    let (products, categories) = services(&db);
    let builder = TestDataBuilder::from_test_name("duplicate_sku");

    let category = seed_category(&categories, &builder.name("category", "root"), None).await;
    let sku = builder.sku("dup");

    products
        .create_product(product_input(&sku, "First", "10.00", category.id))
        .await
        .unwrap();

    let result = products
        .create_product(product_input(&sku, "Second", "12.00", category.id))
        .await;

    match result {
        Err(CatalogError::Validation(errors)) => {
            assert_eq!(errors.len(), 1);
            assert_eq!(errors[0].field, "sku");
        }
        other => panic!("expected sku validation error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_racing_create_hits_the_unique_index() {
    let db = TestDatabase::new().await;
    let (_, categories) = services(&db);
    let repo = PgProductRepository::new(db.connection());
    let builder = TestDataBuilder::from_test_name("race_backstop");

    let category = seed_category(&categories, &builder.name("category", "root"), None).await;
    let sku = builder.sku("race");

    // Going through the repository skips the advisory pre-check, the way
    // a concurrent create would after both passed validation. The unique
    // index must still reject the second row with a conflict.
    repo.create(product_input(&sku, "First", "10.00", category.id))
        .await
        .unwrap();

    let result = repo
        .create(product_input(&sku, "Second", "12.00", category.id))
        .await;

    assert!(matches!(
        result,
        Err(CatalogError::Conflict {
            kind: ConflictKind::Unique,
            ..
        })
    ));
}

#[tokio::test]
async fn test_create_with_missing_category_reports_category_id() {
    let db = TestDatabase::new().await;
    let (products, _) = services(&db);
    let builder = TestDataBuilder::from_test_name("missing_category");

    let result = products
        .create_product(product_input(&builder.sku("main"), "Phone", "10.00", 999_999))
        .await;

    match result {
        Err(CatalogError::Validation(errors)) => {
            assert_eq!(errors.len(), 1);
            assert_eq!(errors[0].field, "category_id");
        }
        other => panic!("expected category_id validation error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_partial_update_leaves_price_untouched() {
    let db = TestDatabase::new().await;
    let (products, categories) = services(&db);
    let builder = TestDataBuilder::from_test_name("partial_update");

    let category = seed_category(&categories, &builder.name("category", "root"), None).await;
    let created = products
        .create_product(product_input(
            &builder.sku("main"),
            "Phone Case",
            "10.00",
            category.id,
        ))
        .await
        .unwrap();

    let updated = products
        .update_product(
            created.id,
            UpdateProduct {
                title: Some("Sturdy Phone Case".to_string()),
                description: Some("Now with description".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.title, "Sturdy Phone Case");
    assert_eq!(updated.description.as_deref(), Some("Now with description"));
    assert_eq!(updated.price, dec("10.00"), "unset price must not change");
    assert_eq!(updated.sku, created.sku, "unset sku must not change");
}

#[tokio::test]
async fn test_update_resubmitting_same_sku_succeeds() {
    let db = TestDatabase::new().await;
    let (products, categories) = services(&db);
    let builder = TestDataBuilder::from_test_name("same_sku_resubmit");

    let category = seed_category(&categories, &builder.name("category", "root"), None).await;
    let sku = builder.sku("keep");
    let created = products
        .create_product(product_input(&sku, "Phone", "10.00", category.id))
        .await
        .unwrap();

    // The uniqueness check excludes the row being updated
    let updated = products
        .update_product(
            created.id,
            UpdateProduct {
                sku: Some(sku.clone()),
                price: Some(dec("11.00")),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.sku, sku);
    assert_eq!(updated.price, dec("11.00"));
}

#[tokio::test]
async fn test_update_to_another_products_sku_fails() {
    let db = TestDatabase::new().await;
    let (products, categories) = services(&db);
    let builder = TestDataBuilder::from_test_name("steal_sku");

    let category = seed_category(&categories, &builder.name("category", "root"), None).await;
    let first = products
        .create_product(product_input(&builder.sku("first"), "A", "1.00", category.id))
        .await
        .unwrap();
    let second = products
        .create_product(product_input(&builder.sku("second"), "B", "2.00", category.id))
        .await
        .unwrap();

    let result = products
        .update_product(
            second.id,
            UpdateProduct {
                sku: Some(first.sku.clone()),
                ..Default::default()
            },
        )
        .await;

    match result {
        Err(CatalogError::Validation(errors)) => assert_eq!(errors[0].field, "sku"),
        other => panic!("expected sku validation error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_update_missing_product_is_not_found() {
    let db = TestDatabase::new().await;
    let (products, _) = services(&db);

    let result = products
        .update_product(
            424_242,
            UpdateProduct {
                title: Some("Ghost".to_string()),
                ..Default::default()
            },
        )
        .await;

    assert!(matches!(result, Err(CatalogError::NotFound { .. })));
}

#[tokio::test]
async fn test_delete_product() {
    let db = TestDatabase::new().await;
    let (products, categories) = services(&db);
    let builder = TestDataBuilder::from_test_name("delete_product");

    let category = seed_category(&categories, &builder.name("category", "root"), None).await;
    let created = products
        .create_product(product_input(
            &builder.sku("main"),
            "Phone",
            "10.00",
            category.id,
        ))
        .await
        .unwrap();

    products.delete_product(created.id).await.unwrap();

    assert!(matches!(
        products.get_product(created.id).await,
        Err(CatalogError::NotFound { .. })
    ));
    assert!(matches!(
        products.delete_product(created.id).await,
        Err(CatalogError::NotFound { .. })
    ));
}

#[tokio::test]
async fn test_concurrent_creates_with_same_sku_leave_one_winner() {
    let db = TestDatabase::new().await;
    let (_, categories) = services(&db);
    let builder = TestDataBuilder::from_test_name("concurrent_sku");

    let category = seed_category(&categories, &builder.name("category", "root"), None).await;
    let sku = builder.sku("contested");

    // Both tasks can pass the advisory pre-check; the unique index
    // resolves the race, so at most one create may succeed and every
    // failure must be a validation error or a conflict naming the sku.
    let mut handles = vec![];
    for i in 0..4 {
        let service = ProductService::new(
            PgProductRepository::new(db.connection()),
            PgCategoryRepository::new(db.connection()),
        );
        let input = product_input(&sku, &format!("Contender {}", i), "10.00", category.id);

        handles.push(tokio::spawn(
            async move { service.create_product(input).await },
        ));
    }

    let results: Vec<_> = futures::future::join_all(handles)
        .await
        .into_iter()
        .map(|r| r.unwrap())
        .collect();

    let winners = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(winners, 1, "exactly one create should win the race");

    for result in results {
        match result {
            Ok(product) => assert_eq!(product.sku, sku),
            Err(CatalogError::Validation(errors)) => assert_eq!(errors[0].field, "sku"),
            Err(CatalogError::Conflict {
                kind: ConflictKind::Unique,
                ..
            }) => {}
            other => panic!("unexpected outcome: {:?}", other),
        }
    }
}

// ============================================================================
// Category hierarchy
// ============================================================================

#[tokio::test]
async fn test_category_read_returns_direct_children_only() {
    let db = TestDatabase::new().await;
    let (_, categories) = services(&db);
    let builder = TestDataBuilder::from_test_name("children_one_level");

    let root = seed_category(&categories, &builder.name("category", "root"), None).await;
    let child = seed_category(&categories, &builder.name("category", "child"), Some(root.id)).await;
    // Grandchild must not show up under the root
    seed_category(
        &categories,
        &builder.name("category", "grandchild"),
        Some(child.id),
    )
    .await;

    let tree = categories.get_category(root.id).await.unwrap();
    assert_eq!(tree.children.len(), 1);
    assert_eq!(tree.children[0].id, child.id);
}

#[tokio::test]
async fn test_create_category_with_missing_parent_reports_parent_id() {
    let db = TestDatabase::new().await;
    let (_, categories) = services(&db);
    let builder = TestDataBuilder::from_test_name("missing_parent");

    let result = categories
        .create_category(CreateCategory {
            name: builder.name("category", "orphan"),
            parent_id: Some(999_999),
        })
        .await;

    match result {
        Err(CatalogError::Validation(errors)) => {
            assert_eq!(errors.len(), 1);
            assert_eq!(errors[0].field, "parent_id");
        }
        other => panic!("expected parent_id validation error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_update_category_to_its_own_parent_fails() {
    let db = TestDatabase::new().await;
    let (_, categories) = services(&db);
    let builder = TestDataBuilder::from_test_name("self_parent");

    let category = seed_category(&categories, &builder.name("category", "root"), None).await;

    // Other fields changing alongside must not mask the violation
    let result = categories
        .update_category(
            category.id,
            UpdateCategory {
                name: Some(builder.name("category", "renamed")),
                parent_id: Some(category.id),
            },
        )
        .await;

    match result {
        Err(CatalogError::Validation(errors)) => {
            assert!(errors.iter().any(|e| e.field == "parent_id"));
        }
        other => panic!("expected parent_id validation error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_update_category_reparents() {
    let db = TestDatabase::new().await;
    let (_, categories) = services(&db);
    let builder = TestDataBuilder::from_test_name("reparent");

    let clothing = seed_category(&categories, &builder.name("category", "clothing"), None).await;
    let apparel = seed_category(&categories, &builder.name("category", "apparel"), None).await;
    let tshirts = seed_category(
        &categories,
        &builder.name("category", "tshirts"),
        Some(clothing.id),
    )
    .await;

    let updated = categories
        .update_category(
            tshirts.id,
            UpdateCategory {
                name: None,
                parent_id: Some(apparel.id),
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.parent_id, Some(apparel.id));
    assert_eq!(updated.name, tshirts.name, "unset name must not change");
}

#[tokio::test]
async fn test_delete_parent_detaches_children() {
    let db = TestDatabase::new().await;
    let (_, categories) = services(&db);
    let builder = TestDataBuilder::from_test_name("set_null");

    let parent = seed_category(&categories, &builder.name("category", "parent"), None).await;
    let child = seed_category(
        &categories,
        &builder.name("category", "child"),
        Some(parent.id),
    )
    .await;

    categories.delete_category(parent.id).await.unwrap();

    let orphan = categories.get_category(child.id).await.unwrap();
    assert_eq!(orphan.parent_id, None, "SET NULL must detach the child");
}

#[tokio::test]
async fn test_delete_category_referenced_by_product_is_a_conflict() {
    let db = TestDatabase::new().await;
    let (products, categories) = services(&db);
    let builder = TestDataBuilder::from_test_name("restrict_delete");

    let category = seed_category(&categories, &builder.name("category", "root"), None).await;
    products
        .create_product(product_input(
            &builder.sku("main"),
            "Phone",
            "10.00",
            category.id,
        ))
        .await
        .unwrap();

    let result = categories.delete_category(category.id).await;

    assert!(matches!(
        result,
        Err(CatalogError::Conflict {
            kind: ConflictKind::ForeignKey,
            ..
        })
    ));

    // The category survives the rejected delete
    assert!(categories.get_category(category.id).await.is_ok());
}

#[tokio::test]
async fn test_list_categories_ascending_by_id() {
    let db = TestDatabase::new().await;
    let (_, categories) = services(&db);
    let builder = TestDataBuilder::from_test_name("list_categories");

    for suffix in ["a", "b", "c"] {
        seed_category(&categories, &builder.name("category", suffix), None).await;
    }

    let all = categories.list_categories().await.unwrap();
    assert_eq!(all.len(), 3);
    assert!(all.windows(2).all(|w| w[0].id < w[1].id));
}
