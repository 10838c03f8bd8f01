use reqwest::StatusCode;
use serde_json::{json, Value};

use stockyard_api::app::services::AppServices;

struct TestServer {
    base_url: String,
    client: reqwest::Client,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        // Build app (same router as prod), but bind to an ephemeral port.
        let app = stockyard_api::app::build_app(AppServices::in_memory());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url,
            client: reqwest::Client::new(),
            handle,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get(&self, path: &str) -> reqwest::Response {
        self.client.get(self.url(path)).send().await.unwrap()
    }

    async fn get_json(&self, path: &str) -> Value {
        let res = self.get(path).await;
        assert_eq!(res.status(), StatusCode::OK, "GET {path}");
        res.json().await.unwrap()
    }

    async fn post(&self, path: &str, body: Value) -> reqwest::Response {
        self.client.post(self.url(path)).json(&body).send().await.unwrap()
    }

    async fn delete(&self, path: &str) -> reqwest::Response {
        self.client.delete(self.url(path)).send().await.unwrap()
    }

    /// POST and return the created id, asserting 201.
    async fn create(&self, path: &str, body: Value) -> String {
        let res = self.post(path, body).await;
        assert_eq!(res.status(), StatusCode::CREATED, "POST {path}");
        let body: Value = res.json().await.unwrap();
        body["id"].as_str().unwrap().to_string()
    }

    async fn warehouse(&self, capacity: i64) -> String {
        self.create(
            "/warehouses",
            json!({"name": "Main", "location": "Bergen", "capacity": capacity}),
        )
        .await
    }

    async fn stock(&self, warehouse_id: &str, product_id: &str, quantity: i64) -> String {
        self.create(
            &format!("/warehouses/{warehouse_id}/inventory"),
            json!({"productId": product_id, "quantity": quantity}),
        )
        .await
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[tokio::test]
async fn health_is_ok() {
    let srv = TestServer::spawn().await;
    assert_eq!(srv.get("/health").await.status(), StatusCode::OK);
}

#[tokio::test]
async fn product_lifecycle_register_get_delete() {
    let srv = TestServer::spawn().await;

    let res = srv
        .post(
            "/products",
            json!({"id": "sku-1", "name": "Hammer", "category": "tools", "price": 19.5}),
        )
        .await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["id"], "sku-1");
    assert_eq!(body["message"], "Product registered.");

    let product = srv.get_json("/products/sku-1").await;
    assert_eq!(
        product,
        json!({"id": "sku-1", "name": "Hammer", "category": "tools", "price": 19.5})
    );

    assert_eq!(srv.delete("/products/sku-1").await.status(), StatusCode::NO_CONTENT);
    assert_eq!(srv.get("/products/sku-1").await.status(), StatusCode::NOT_FOUND);
    assert_eq!(srv.delete("/products/sku-1").await.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn registered_text_fields_read_back_unchanged() {
    let srv = TestServer::spawn().await;
    srv.create(
        "/products",
        json!({"id": "sku-9", "name": " Hammer ", "category": "tools ", "price": 4.5}),
    )
    .await;

    assert_eq!(
        srv.get_json("/products/sku-9").await,
        json!({"id": "sku-9", "name": " Hammer ", "category": "tools ", "price": 4.5})
    );
    assert_eq!(srv.get_json("/products?category=tools%20").await.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn product_registration_accepts_put_and_generates_ids() {
    let srv = TestServer::spawn().await;
    let body = json!({"name": "Saw", "category": "tools", "price": 7});

    let res = srv.client.put(srv.url("/products")).json(&body).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let first: Value = res.json().await.unwrap();
    let second = srv.create("/products", body).await;

    let first = first["id"].as_str().unwrap();
    assert!(!first.is_empty());
    assert_ne!(first, second);
}

#[tokio::test]
async fn duplicate_product_id_is_conflict() {
    let srv = TestServer::spawn().await;
    let body = json!({"id": "dup", "name": "A", "category": "x", "price": 1});
    srv.create("/products", body.clone()).await;

    let res = srv.post("/products", body).await;
    assert_eq!(res.status(), StatusCode::CONFLICT);
    let err: Value = res.json().await.unwrap();
    assert_eq!(err["error"], "conflict");
}

#[tokio::test]
async fn missing_fields_are_validation_errors() {
    let srv = TestServer::spawn().await;

    let res = srv.post("/products", json!({"name": "  ", "price": 1})).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let err: Value = res.json().await.unwrap();
    assert_eq!(err["error"], "validation_error");
    assert!(err["message"].as_str().unwrap().contains("name"));
    assert!(err["message"].as_str().unwrap().contains("category"));

    let res = srv.post("/warehouses", json!({"name": "W", "capacity": null})).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = srv.post("/warehouses/w1/inventory", json!({"quantity": 3})).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    // Nothing was written.
    assert_eq!(srv.get_json("/products").await, json!([]));
    assert_eq!(srv.get_json("/warehouses").await, json!([]));
    assert_eq!(srv.get_json("/warehouses/w1/inventory").await, json!([]));
}

#[tokio::test]
async fn malformed_bodies_are_validation_errors() {
    let srv = TestServer::spawn().await;

    let res = srv
        .client
        .post(srv.url("/products"))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = srv
        .post("/warehouses", json!({"name": "W", "location": "L", "capacity": "lots"}))
        .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let err: Value = res.json().await.unwrap();
    assert_eq!(err["error"], "validation_error");

    let res = srv
        .post("/products", json!({"name": "A", "category": "x", "price": -1}))
        .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn products_can_be_filtered_by_category() {
    let srv = TestServer::spawn().await;
    srv.create("/products", json!({"id": "a", "name": "A", "category": "tools", "price": 1})).await;
    srv.create("/products", json!({"id": "b", "name": "B", "category": "food", "price": 2})).await;

    let all = srv.get_json("/products").await;
    assert_eq!(all.as_array().unwrap().len(), 2);

    let food = srv.get_json("/products?category=food").await;
    assert_eq!(food, json!([{"id": "b", "name": "B", "category": "food", "price": 2.0}]));

    assert_eq!(srv.get_json("/products?category=none").await, json!([]));
}

#[tokio::test]
async fn warehouse_lifecycle_and_cascade_delete() {
    let srv = TestServer::spawn().await;
    let res = srv
        .post("/warehouses", json!({"name": "Main", "location": "Bergen", "capacity": 100}))
        .await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["message"], "Warehouse registered.");
    let id = body["id"].as_str().unwrap().to_string();

    let warehouse = srv.get_json(&format!("/warehouses/{id}")).await;
    assert_eq!(
        warehouse,
        json!({"id": id, "name": "Main", "location": "Bergen", "capacity": 100})
    );
    assert_eq!(srv.get_json("/warehouses").await.as_array().unwrap().len(), 1);

    srv.stock(&id, "p1", 3).await;
    srv.stock(&id, "p2", 4).await;

    assert_eq!(
        srv.delete(&format!("/warehouses/{id}")).await.status(),
        StatusCode::NO_CONTENT
    );
    assert_eq!(
        srv.get(&format!("/warehouses/{id}")).await.status(),
        StatusCode::NOT_FOUND
    );
    assert_eq!(srv.get_json(&format!("/warehouses/{id}/inventory")).await, json!([]));
    assert_eq!(
        srv.delete(&format!("/warehouses/{id}")).await.status(),
        StatusCode::NOT_FOUND
    );
}

#[tokio::test]
async fn inventory_items_are_keyed_by_warehouse_and_item() {
    let srv = TestServer::spawn().await;
    let w1 = srv.warehouse(10).await;
    let w2 = srv.warehouse(10).await;

    let res = srv
        .post(&format!("/warehouses/{w1}/inventory"), json!({"productId": "p1", "quantity": 5}))
        .await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["message"], "Inventory item added.");
    let item = body["id"].as_str().unwrap().to_string();

    let fetched = srv.get_json(&format!("/warehouses/{w1}/inventory/{item}")).await;
    assert_eq!(
        fetched,
        json!({"id": item, "warehouseId": w1, "productId": "p1", "quantity": 5})
    );

    assert_eq!(
        srv.get(&format!("/warehouses/{w2}/inventory/{item}")).await.status(),
        StatusCode::NOT_FOUND
    );
    assert_eq!(
        srv.delete(&format!("/warehouses/{w2}/inventory/{item}")).await.status(),
        StatusCode::NOT_FOUND
    );
    assert_eq!(
        srv.delete(&format!("/warehouses/{w1}/inventory/{item}")).await.status(),
        StatusCode::NO_CONTENT
    );
    assert_eq!(
        srv.get(&format!("/warehouses/{w1}/inventory/{item}")).await.status(),
        StatusCode::NOT_FOUND
    );
}

#[tokio::test]
async fn inventory_accepts_unknown_warehouse() {
    let srv = TestServer::spawn().await;
    srv.stock("ghost", "p1", 2).await;
    let items = srv.get_json("/warehouses/ghost/inventory").await;
    assert_eq!(items.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn capacity_statistics() {
    let srv = TestServer::spawn().await;
    assert_eq!(
        srv.get_json("/statistics/capacity").await,
        json!({"totalCapacity": 0, "usedCapacity": 0, "freeCapacity": 0})
    );

    let a = srv.warehouse(100).await;
    let b = srv.warehouse(50).await;
    srv.stock(&a, "p1", 30).await;
    srv.stock(&b, "p2", 10).await;

    assert_eq!(
        srv.get_json("/statistics/capacity").await,
        json!({"totalCapacity": 150, "usedCapacity": 40, "freeCapacity": 110})
    );

    srv.stock(&b, "p3", 200).await;
    let stats = srv.get_json("/statistics/capacity").await;
    assert_eq!(stats["freeCapacity"], -90);
}

#[tokio::test]
async fn warehouse_value() {
    let srv = TestServer::spawn().await;
    srv.create("/products", json!({"id": "A", "name": "A", "category": "x", "price": 10})).await;
    srv.create("/products", json!({"id": "B", "name": "B", "category": "x", "price": 5})).await;

    let empty = srv.warehouse(10).await;
    let value = srv.get_json(&format!("/warehouses/{empty}/value")).await;
    assert_eq!(value["value"], 0.0);

    let w = srv.warehouse(10).await;
    srv.stock(&w, "A", 3).await;
    srv.stock(&w, "B", 2).await;
    let value = srv.get_json(&format!("/warehouses/{w}/value")).await;
    assert_eq!(value, json!({"warehouseId": w, "value": 40.0, "unpricedLines": 0}));

    // A line whose product is gone counts for nothing.
    srv.stock(&w, "gone", 100).await;
    let value = srv.get_json(&format!("/warehouses/{w}/value")).await;
    assert_eq!(value["value"], 40.0);
    assert_eq!(value["unpricedLines"], 1);

    assert_eq!(
        srv.get("/warehouses/unknown/value").await.status(),
        StatusCode::NOT_FOUND
    );
}

#[tokio::test]
async fn category_counts() {
    let srv = TestServer::spawn().await;
    for category in ["B", "A", "A"] {
        srv.create("/products", json!({"name": "P", "category": category, "price": 1})).await;
    }

    assert_eq!(
        srv.get_json("/statistics/categories").await,
        json!([{"category": "A", "count": 2}, {"category": "B", "count": 1}])
    );
}

#[tokio::test]
async fn repeated_statistics_reads_are_identical() {
    let srv = TestServer::spawn().await;
    srv.create("/products", json!({"id": "A", "name": "A", "category": "x", "price": 2})).await;
    let w = srv.warehouse(10).await;
    srv.stock(&w, "A", 3).await;

    for path in [
        "/statistics/capacity".to_string(),
        "/statistics/categories".to_string(),
        format!("/warehouses/{w}/value"),
    ] {
        assert_eq!(srv.get_json(&path).await, srv.get_json(&path).await);
    }
}

#[tokio::test]
async fn cleanup_resets_everything() {
    let srv = TestServer::spawn().await;
    srv.create("/products", json!({"name": "P", "category": "c", "price": 1})).await;
    let w = srv.warehouse(10).await;
    srv.stock(&w, "p", 1).await;

    let res = srv.post("/cleanup", json!({})).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["message"], "Cleanup completed.");

    assert_eq!(srv.get_json("/products").await, json!([]));
    assert_eq!(srv.get_json("/warehouses").await, json!([]));
    assert_eq!(srv.get_json(&format!("/warehouses/{w}/inventory")).await, json!([]));
    assert_eq!(srv.get_json("/statistics/categories").await, json!([]));
}
