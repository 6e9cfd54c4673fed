use std::sync::Arc;

use axum_test::TestServer;
use chrono::{DateTime, TimeZone, Utc};

use marketech_api::db::MemoryStore;
use marketech_api::models::{CartItem, Product, SearchEntry, User, Visit, WishlistItem};
use marketech_api::routes::{create_router, AppState};

fn ts(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(secs, 0).unwrap()
}

fn product(id: i64, category: &str, description: &str) -> Product {
    Product {
        id,
        name: format!("Product {id}"),
        description: Some(description.to_string()),
        brand: Some("Acme".to_string()),
        model: Some(format!("M-{id}")),
        category: Some(category.to_string()),
        subcategory: None,
        price: 49.99,
        discount: 0.0,
        quantity: 10,
        created_at: ts(id * 100),
    }
}

fn visit(id: i64, user_id: i64, product_id: i64, at_secs: i64) -> Visit {
    Visit {
        id,
        user_id,
        product_id,
        visited_at: Some(ts(at_secs)),
    }
}

fn create_test_server(store: MemoryStore) -> TestServer {
    let state = AppState::new(Arc::new(store));
    let app = create_router(state);
    TestServer::new(app).unwrap()
}

#[tokio::test]
async fn test_health_check() {
    let server = create_test_server(MemoryStore::new());
    let response = server.get("/health").await;
    response.assert_status_ok();

    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_responses_carry_request_id_header() {
    let server = create_test_server(MemoryStore::new());
    let response = server.get("/health").await;
    assert!(response.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn test_get_user_found_and_missing() {
    let store = MemoryStore::new();
    store
        .add_user(User {
            id: 1,
            name: "Maria".to_string(),
            last_name: "Lopez".to_string(),
            email: "maria@example.com".to_string(),
            phone: None,
            address: None,
            created_at: ts(1_000),
        })
        .await;
    let server = create_test_server(store);

    let response = server.get("/user/1").await;
    response.assert_status_ok();
    let user: serde_json::Value = response.json();
    assert_eq!(user["email"], "maria@example.com");

    let response = server.get("/user/99").await;
    response.assert_status_not_found();
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "User not found");
}

#[tokio::test]
async fn test_get_product() {
    let store = MemoryStore::new();
    store.add_product(product(7, "Laptops", "fast laptop")).await;
    let server = create_test_server(store);

    let response = server.get("/product/7").await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["id"], 7);
    assert_eq!(body["category"], "Laptops");

    server.get("/product/8").await.assert_status_not_found();
}

#[tokio::test]
async fn test_visited_products_endpoint() {
    let store = MemoryStore::new();
    store.add_visit(visit(1, 3, 7, 1_000)).await;
    store.add_visit(visit(2, 3, 8, 2_000)).await;
    let server = create_test_server(store);

    let response = server.get("/product_visited/3").await;
    response.assert_status_ok();
    let visits: Vec<serde_json::Value> = response.json();
    assert_eq!(visits.len(), 2);
    // Newest first
    assert_eq!(visits[0]["product_id"], 8);

    server.get("/product_visited/4").await.assert_status_not_found();
}

#[tokio::test]
async fn test_search_history_wishlist_and_cart_endpoints() {
    let store = MemoryStore::new();
    store
        .add_search(SearchEntry {
            id: 1,
            user_id: 3,
            search_term: "gaming laptop".to_string(),
            created_at: ts(1_000),
        })
        .await;
    store
        .add_wishlist_item(WishlistItem {
            id: 1,
            user_id: 3,
            product_id: 7,
            created_at: ts(1_000),
        })
        .await;
    store
        .add_cart_item(CartItem {
            id: 1,
            user_id: 3,
            product_id: 7,
            quantity: 2,
            created_at: ts(1_000),
        })
        .await;
    let server = create_test_server(store);

    let response = server.get("/search_history/3").await;
    response.assert_status_ok();
    let entries: Vec<serde_json::Value> = response.json();
    assert_eq!(entries[0]["search_term"], "gaming laptop");

    let response = server.get("/wishlist/3").await;
    response.assert_status_ok();

    let response = server.get("/shoppingcart/3").await;
    response.assert_status_ok();
    let items: Vec<serde_json::Value> = response.json();
    assert_eq!(items[0]["quantity"], 2);

    // A user with no rows gets a 404 on all three
    server.get("/search_history/9").await.assert_status_not_found();
    server.get("/wishlist/9").await.assert_status_not_found();
    server.get("/shoppingcart/9").await.assert_status_not_found();
}

#[tokio::test]
async fn test_recommendation_ids_flow() {
    let store = MemoryStore::new();
    store
        .add_product(product(1, "Laptops", "acer laptop gaming fast"))
        .await;
    store
        .add_product(product(2, "Laptops", "asus laptop gaming fast"))
        .await;
    store
        .add_product(product(3, "Laptops", "msi laptop gaming fast"))
        .await;
    store
        .add_product(product(4, "Shoes", "leather running shoes"))
        .await;
    store.add_visit(visit(1, 5, 1, 1_000)).await;
    let server = create_test_server(store);

    let response = server.get("/recommendations_ids/5").await;
    response.assert_status_ok();
    let ids: Vec<i64> = response.json();

    assert!(!ids.is_empty());
    assert!(ids.len() <= 16);
    // The visited product is never recommended
    assert!(!ids.contains(&1));
    // Same-category candidates rank before the shoes
    assert_eq!(*ids.last().unwrap(), 4);
}

#[tokio::test]
async fn test_recommendation_ids_missing_history_is_404() {
    let store = MemoryStore::new();
    store
        .add_product(product(1, "Laptops", "acer laptop gaming"))
        .await;
    let server = create_test_server(store);

    let response = server.get("/recommendations_ids/5").await;
    response.assert_status_not_found();
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "No recommendations found");
}

#[tokio::test]
async fn test_recommendations_page_renders_empty_message() {
    let server = create_test_server(MemoryStore::new());

    let response = server.get("/recommendations/5").await;
    response.assert_status_ok();
    assert!(response.text().contains("No recommendations found"));
}

#[tokio::test]
async fn test_recommendations_page_lists_products() {
    let store = MemoryStore::new();
    store
        .add_product(product(1, "Laptops", "acer laptop gaming fast"))
        .await;
    store
        .add_product(product(2, "Laptops", "asus laptop gaming fast"))
        .await;
    store.add_visit(visit(1, 5, 1, 1_000)).await;
    let server = create_test_server(store);

    let response = server.get("/recommendations/5").await;
    response.assert_status_ok();
    let html = response.text();
    assert!(html.contains("Recommendations for user 5"));
    assert!(html.contains("Product 2"));
    assert!(!html.contains("<strong>Name:</strong> Product 1<br>"));
}

#[tokio::test]
async fn test_popularity_ids_ranked_by_visits() {
    let store = MemoryStore::new();
    for id in [1, 2, 3] {
        store.add_product(product(id, "Laptops", "laptop")).await;
    }
    // Product 2 visited three times, product 1 twice, product 3 once
    let visits = [(1, 2), (2, 2), (3, 2), (4, 1), (5, 1), (6, 3)];
    for (id, product_id) in visits {
        store.add_visit(visit(id, id, product_id, id * 100)).await;
    }
    let server = create_test_server(store);

    let response = server.get("/recommendations_popularity_ids").await;
    response.assert_status_ok();
    let ids: Vec<i64> = response.json();
    assert_eq!(ids, vec![2, 1, 3]);
}

#[tokio::test]
async fn test_popularity_ids_empty_is_404() {
    let server = create_test_server(MemoryStore::new());
    let response = server.get("/recommendations_popularity_ids").await;
    response.assert_status_not_found();
}

#[tokio::test]
async fn test_popularity_pages_render() {
    let store = MemoryStore::new();
    store.add_product(product(1, "Laptops", "laptop")).await;
    store.add_visit(visit(1, 9, 1, 100)).await;
    let server = create_test_server(store);

    let response = server.get("/popularity").await;
    response.assert_status_ok();
    let html = response.text();
    assert!(html.contains("Product Popularity"));
    assert!(html.contains("Product 1"));

    let response = server.get("/recommendations_popularity_html").await;
    response.assert_status_ok();
    assert!(response.text().contains("Most Popular Products"));
}
