//! End-to-end tests against a running service.

use axum::{http::header, routing::get, Router};
use reqwest::StatusCode;
use serde_json::{json, Value};

use project_service::config::ServiceConfig;

mod common;

use common::{start_file_store, start_server};

async fn create_task(client: &reqwest::Client, server: &common::TestServer, title: &str) -> String {
    let res = client
        .post(server.api("v1/tasks/create"))
        .json(&json!({ "title": title, "type": "simple" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    body["result"]["_id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_create_task_end_to_end() {
    let server = start_server(ServiceConfig::default()).await;
    let client = reqwest::Client::new();

    let res = client
        .post(server.api("v1/tasks/create"))
        .json(&json!({ "title": "Map the water points" }))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.headers().contains_key("x-request-id"));
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["status"], 200);
    assert_eq!(body["message"], "Task created successfully.");
    assert!(body["result"]["_id"].as_str().is_some());
    assert!(body.get("data").is_none());
}

#[tokio::test]
async fn test_create_task_without_title_is_rejected() {
    let server = start_server(ServiceConfig::default()).await;
    let client = reqwest::Client::new();

    let res = client
        .post(server.api("v1/tasks/create"))
        .json(&json!({ "type": "simple" }))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["status"], 400);
    assert_eq!(
        body["message"],
        json!([{ "param": "title", "message": "Title is required." }])
    );

    let list: Value = client
        .get(server.api("v1/tasks/list"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(list["total"], 0);
}

#[tokio::test]
async fn test_list_paginates_and_searches() {
    let server = start_server(ServiceConfig::default()).await;
    let client = reqwest::Client::new();
    for title in ["Water audit", "Tree planting", "Water harvesting"] {
        create_task(&client, &server, title).await;
    }

    let body: Value = client
        .get(server.api("v1/tasks/list?page=2&limit=2"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["total"], 3);
    assert_eq!(body["count"], 1);
    assert_eq!(body["result"].as_array().unwrap().len(), 1);

    let body: Value = client
        .get(server.api("v1/tasks/list?search=water%20h"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["total"], 1);
    assert_eq!(body["result"][0]["title"], "Water harvesting");

    let body: Value = client
        .get(server.api("v1/tasks/list?page=1.9&limit=2.5&status=active"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["total"], 3);
    assert_eq!(body["count"], 2);

    let res = client
        .get(server.api("v1/tasks/list?status=archived"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(
        body["message"],
        json!([{ "param": "status", "message": "Task status is invalid." }])
    );
}

#[tokio::test]
async fn test_details_update_delete() {
    let server = start_server(ServiceConfig::default()).await;
    let client = reqwest::Client::new();
    let id = create_task(&client, &server, "Dig").await;

    let res = client
        .post(server.api(&format!("v1/tasks/update/{}", id)))
        .json(&json!({ "title": "Dig deeper" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let body: Value = client
        .get(server.api(&format!("v1/tasks/details/{}", id)))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["result"]["title"], "Dig deeper");
    assert_eq!(body["result"]["createdBy"], "SYSTEM");

    let res = client
        .delete(server.api(&format!("v1/tasks/delete/{}", id)))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = client
        .get(server.api(&format!("v1/tasks/details/{}", id)))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body, json!({ "status": 404, "message": "Task not found." }));
}

#[tokio::test]
async fn test_malformed_id_is_a_validation_error() {
    let server = start_server(ServiceConfig::default()).await;
    let res = reqwest::get(server.api("v1/tasks/details/not-a-uuid")).await.unwrap();

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["message"][0]["param"], "_id");
}

#[tokio::test]
async fn test_library_categories_use_file_segment() {
    let server = start_server(ServiceConfig::default()).await;
    let client = reqwest::Client::new();

    let res = client
        .post(server.api("v1/library/categories/create"))
        .json(&json!({ "externalId": "water", "name": "Water" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let body: Value = client
        .get(server.api("v1/library/categories/list"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["total"], 1);
    assert_eq!(body["result"][0]["externalId"], "water");
}

#[tokio::test]
async fn test_unknown_routes_are_plain_404() {
    let server = start_server(ServiceConfig::default()).await;

    for path in [
        "/project/v2/tasks/list",
        "/project/v1/unknown/list",
        "/project/v1/tasks/_private",
        "/project/v1/library/list",
        "/elsewhere",
    ] {
        let res = reqwest::get(server.url(path)).await.unwrap();
        assert_eq!(res.status(), StatusCode::NOT_FOUND, "{}", path);
        assert_eq!(res.text().await.unwrap(), "Not found!", "{}", path);
    }
}

#[tokio::test]
async fn test_health() {
    let server = start_server(ServiceConfig::default()).await;
    let body: Value = reqwest::get(server.url("/health"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["status"], "operational");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_request_id_is_propagated() {
    let server = start_server(ServiceConfig::default()).await;
    let res = reqwest::Client::new()
        .get(server.api("v1/tasks/list"))
        .header("x-request-id", "trace-me")
        .send()
        .await
        .unwrap();
    assert_eq!(res.headers()["x-request-id"], "trace-me");
}

#[tokio::test]
async fn test_access_token_enforced_when_enabled() {
    let mut config = ServiceConfig::default();
    config.auth.enabled = true;
    config.auth.internal_access_token = "s3cret".into();
    let server = start_server(config).await;
    let client = reqwest::Client::new();

    let res = client
        .post(server.api("v1/tasks/create"))
        .json(&json!({ "title": "Dig" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body, json!({ "status": 401, "message": "Unauthorized" }));

    let res = client
        .post(server.api("v1/tasks/create"))
        .header("internal-access-token", "s3cret")
        .header("x-user-id", "user-42")
        .json(&json!({ "title": "Dig" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let id = res.json::<Value>().await.unwrap()["result"]["_id"]
        .as_str()
        .unwrap()
        .to_string();

    let body: Value = client
        .get(server.api(&format!("v1/tasks/details/{}", id)))
        .header("internal-access-token", "s3cret")
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["result"]["createdBy"], "user-42");
}

async fn create_certificate(
    client: &reqwest::Client,
    server: &common::TestServer,
    body: Value,
) -> String {
    let res = client
        .post(server.api("v1/certificates/create"))
        .json(&body)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    res.json::<Value>().await.unwrap()["result"]["_id"]
        .as_str()
        .unwrap()
        .to_string()
}

async fn download(client: &reqwest::Client, server: &common::TestServer, id: &str) -> reqwest::Response {
    client
        .get(server.api(&format!("v1/certificates/download/{}", id)))
        .send()
        .await
        .unwrap()
}

fn certificate_root() -> std::path::PathBuf {
    let root = std::env::temp_dir().join(format!("certificates-{}", uuid::Uuid::new_v4()));
    std::fs::create_dir_all(&root).unwrap();
    root
}

fn local_storage(root: &std::path::Path) -> ServiceConfig {
    let mut config = ServiceConfig::default();
    config.storage.certificate_root = root.to_string_lossy().into_owned();
    config
}

fn remote_storage(base_url: String) -> ServiceConfig {
    let mut config = ServiceConfig::default();
    config.storage.remote_base_url = Some(base_url);
    config
}

async fn assert_generic_500(res: reqwest::Response) {
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body, json!({ "status": 500, "message": "Something went wrong." }));
}

#[tokio::test]
async fn test_certificate_download_from_disk() {
    let root = certificate_root();
    std::fs::write(root.join("completion.pdf"), b"%PDF-1.4 certificate").unwrap();
    let server = start_server(local_storage(&root)).await;
    let client = reqwest::Client::new();

    let id = create_certificate(
        &client,
        &server,
        json!({ "name": "Completion", "fileName": "completion.pdf" }),
    )
    .await;

    let res = download(&client, &server, &id).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(
        res.headers()[header::CONTENT_DISPOSITION.as_str()],
        "attachment; filename=completion.pdf"
    );
    assert_eq!(
        res.headers()[header::CONTENT_TYPE.as_str()],
        "application/octet-stream"
    );
    assert_eq!(res.bytes().await.unwrap().as_ref(), b"%PDF-1.4 certificate");

    let _ = std::fs::remove_dir_all(&root);
}

#[tokio::test]
async fn test_client_supplied_file_locations_are_never_served() {
    let root = certificate_root();
    let outside = certificate_root();
    std::fs::write(outside.join("secret.txt"), b"do not serve").unwrap();
    let server = start_server(local_storage(&root)).await;
    let client = reqwest::Client::new();

    let secret = outside.join("secret.txt");
    let escape = format!("../{}/secret.txt", outside.file_name().unwrap().to_str().unwrap());
    for body in [
        json!({ "name": "Completion", "filePath": secret.to_str().unwrap() }),
        json!({ "name": "Completion", "fileUrl": "http://169.254.169.254/latest/meta-data/" }),
        json!({ "name": "Completion", "fileName": secret.to_str().unwrap() }),
        json!({ "name": "Completion", "fileName": escape }),
    ] {
        let id = create_certificate(&client, &server, body.clone()).await;

        let details: Value = client
            .get(server.api(&format!("v1/certificates/details/{}", id)))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert!(details["result"].get("filePath").is_none(), "{}", body);
        assert!(details["result"].get("fileUrl").is_none(), "{}", body);

        let res = download(&client, &server, &id).await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND, "{}", body);
        let error: Value = res.json().await.unwrap();
        assert_eq!(error["message"], "Certificate file not found.");
    }

    let _ = std::fs::remove_dir_all(&root);
    let _ = std::fs::remove_dir_all(&outside);
}

#[tokio::test]
async fn test_certificate_download_from_remote_store() {
    let store = start_file_store(Router::new().route(
        "/files/completion.pdf",
        get(|| async { ([(header::CONTENT_TYPE, "application/pdf")], "remote bytes") }),
    ))
    .await;
    let server = start_server(remote_storage(format!("http://{}/files/", store))).await;
    let client = reqwest::Client::new();

    let id = create_certificate(
        &client,
        &server,
        json!({ "name": "Completion", "fileName": "completion.pdf" }),
    )
    .await;

    let res = download(&client, &server, &id).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers()[header::CONTENT_TYPE.as_str()], "application/pdf");
    let disposition = res.headers()[header::CONTENT_DISPOSITION.as_str()]
        .to_str()
        .unwrap()
        .to_string();
    assert!(disposition.starts_with("attachment; filename="));
    assert!(disposition.ends_with(".pdf"));
    assert_eq!(res.text().await.unwrap(), "remote bytes");
}

#[tokio::test]
async fn test_missing_local_file_is_generic_500() {
    let root = certificate_root();
    let server = start_server(local_storage(&root)).await;
    let client = reqwest::Client::new();

    let id = create_certificate(
        &client,
        &server,
        json!({ "name": "Completion", "fileName": "not-here.pdf" }),
    )
    .await;

    assert_generic_500(download(&client, &server, &id).await).await;
    let _ = std::fs::remove_dir_all(&root);
}

#[tokio::test]
async fn test_remote_error_status_is_generic_500() {
    let store = start_file_store(Router::new()).await;
    let server = start_server(remote_storage(format!("http://{}/files/", store))).await;
    let client = reqwest::Client::new();

    let id = create_certificate(
        &client,
        &server,
        json!({ "name": "Completion", "fileName": "missing.pdf" }),
    )
    .await;

    assert_generic_500(download(&client, &server, &id).await).await;
}

#[tokio::test]
async fn test_unreachable_remote_store_is_generic_500() {
    let closed = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap()
    };
    let server = start_server(remote_storage(format!("http://{}/files/", closed))).await;
    let client = reqwest::Client::new();

    let id = create_certificate(
        &client,
        &server,
        json!({ "name": "Completion", "fileName": "completion.pdf" }),
    )
    .await;

    assert_generic_500(download(&client, &server, &id).await).await;
}
