use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use bookshelf_app::bootstrap::build_registry;
use bookshelf_app::modules::books::store::InMemoryBookStore;
use bookshelf_kernel::settings::Settings;
use bookshelf_kernel::InitCtx;
use serde_json::{json, Value};
use tower::ServiceExt;

async fn app() -> Router {
    let settings = Settings::default();
    let registry = build_registry(Arc::new(InMemoryBookStore::new()), &settings);
    registry
        .init_all(&InitCtx {
            settings: &settings,
        })
        .await
        .unwrap();
    bookshelf_http::build_router(&registry, &settings)
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(value) => {
            request = request.header("content-type", "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(request.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), 1024 * 1024).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };
    (status, value)
}

#[tokio::test]
async fn create_without_year_then_fetch() {
    let app = app().await;

    let (status, created) = send(
        &app,
        "POST",
        "/books",
        Some(json!({"title": "The Left Hand of Darkness", "author": "Ursula K. Le Guin"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["year"], 0);
    assert!(created["id"].is_i64());
    assert!(created["created_at"].is_string());

    let uri = format!("/books/{}", created["id"]);
    let (status, fetched) = send(&app, "GET", &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn book_lifecycle() {
    let app = app().await;

    for title in ["Parable of the Sower", "Parable of the Talents"] {
        let (status, _) = send(
            &app,
            "POST",
            "/books",
            Some(json!({"title": title, "author": "Octavia E. Butler", "year": 1993})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, books) = send(&app, "GET", "/books", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(books.as_array().unwrap().len(), 2);
    let created_at = books[1]["created_at"].clone();

    let (status, body) = send(
        &app,
        "PUT",
        "/books/2",
        Some(json!({"title": "Parable of the Talents", "author": "Octavia E. Butler", "year": 1998})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Book updated successfully");

    let (_, updated) = send(&app, "GET", "/books/2", None).await;
    assert_eq!(updated["year"], 1998);
    assert_eq!(updated["created_at"], created_at);

    let (status, body) = send(&app, "DELETE", "/books/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Book deleted successfully");

    let (status, body) = send(&app, "GET", "/books/1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "not_found");

    let (_, books) = send(&app, "GET", "/books", None).await;
    assert_eq!(books.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn update_requires_title_and_author() {
    let app = app().await;
    send(
        &app,
        "POST",
        "/books",
        Some(json!({"title": "Binti", "author": "Nnedi Okorafor"})),
    )
    .await;

    let (status, body) = send(&app, "PUT", "/books/1", Some(json!({"title": "Binti"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["details"][0]["field"], "author");
}

#[tokio::test]
async fn process_url_through_full_stack() {
    let app = app().await;

    let (status, body) = send(
        &app,
        "POST",
        "/process-url",
        Some(json!({"url": "https://BYFOOD.com/Path/?query=123#Fragment", "operation": "canonical"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["processed_url"], "https://BYFOOD.com/Path#Fragment");

    let (status, body) = send(
        &app,
        "POST",
        "/process-url",
        Some(json!({"url": "https://BYFOOD.com/Path/?query=123#Fragment", "operation": "redirection"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["processed_url"],
        "https://www.byfood.com/path/?query=123#fragment"
    );

    let (status, _) = send(
        &app,
        "POST",
        "/process-url",
        Some(json!({"url": "https://example.com", "operation": "foo"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(
        &app,
        "POST",
        "/process-url",
        Some(json!({"operation": "all"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["details"][0]["field"], "url");
}

#[tokio::test]
async fn health_and_openapi() {
    let app = app().await;

    let (status, body) = send(&app, "GET", "/healthz", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Value::String("ok".to_string()));

    let (status, doc) = send(&app, "GET", "/docs/openapi.json", None).await;
    assert_eq!(status, StatusCode::OK);
    for path in ["/books", "/books/{id}", "/process-url", "/healthz"] {
        assert!(doc["paths"][path].is_object(), "missing {path}");
    }
    assert!(doc["components"]["schemas"]["Book"].is_object());
}

#[test]
fn registry_holds_both_modules() {
    let settings = Settings::default();
    let registry = build_registry(Arc::new(InMemoryBookStore::new()), &settings);

    assert_eq!(registry.len(), 2);
    assert_eq!(registry.get_module("books").unwrap().base_path(), "/books");
    assert_eq!(registry.get_module("urls").unwrap().base_path(), "/");
}
