//! Integration tests for paginated requests using wiremock

use doapi::resources::image::{ImageFilter, ListImages};
use doapi::{Client, DoError};
use serde_json::{json, Value};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn image(id: u64) -> Value {
    json!({
        "id": id,
        "name": format!("image-{}", id),
        "distribution": "Debian",
        "slug": null,
        "public": false,
        "regions": ["fra1"],
        "created_at": "2021-03-04T05:06:07Z",
        "type": "snapshot",
        "min_disk_size": 25,
        "size_gigabytes": 1.73
    })
}

/// One page of a 3-image listing, one image per page
fn page_body(server: &MockServer, page: u64, last_page: u64) -> Value {
    let next = if page < last_page {
        let link = format!("{}/images?page={}&per_page=1", server.uri(), page + 1);
        json!(link)
    } else {
        Value::Null
    };

    json!({
        "images": [image(page)],
        "links": {
            "pages": {
                "first": format!("{}/images?page=1&per_page=1", server.uri()),
                "next": next
            }
        },
        "meta": { "total": last_page }
    })
}

async fn mount_page(server: &MockServer, page: u64, template: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path("/images"))
        .and(query_param("page", page.to_string()))
        .and(query_param("per_page", "1"))
        .respond_with(template)
        .expect(1)
        .mount(server)
        .await;
}

fn first_page_request() -> ListImages {
    ListImages {
        page: Some(1),
        per_page: Some(1),
        ..ListImages::default()
    }
}

fn client_for(server: &MockServer) -> Client {
    Client::with_base_url("test-token", format!("{}/", server.uri())).unwrap()
}

/// Three linked pages are fetched once each, in order
#[tokio::test]
async fn test_walks_all_pages_in_order() {
    let server = MockServer::start().await;
    for page in 1..=3 {
        mount_page(
            &server,
            page,
            ResponseTemplate::new(200).set_body_json(page_body(&server, page, 3)),
        )
        .await;
    }

    let pages = client_for(&server)
        .request_all(&first_page_request())
        .await
        .unwrap();

    let ids: Vec<u64> = pages.iter().map(|p| p.images[0].id).collect();
    assert_eq!(ids, vec![1, 2, 3]);
    assert_eq!(pages[0].meta.total, 3);

    let requested: Vec<String> = server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .map(|r| r.url.query().unwrap_or_default().to_string())
        .collect();
    assert_eq!(
        requested,
        vec![
            "page=1&per_page=1",
            "page=2&per_page=1",
            "page=3&per_page=1",
        ]
    );
}

/// A response without a next link ends the walk after one call
#[tokio::test]
async fn test_single_page() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        1,
        ResponseTemplate::new(200).set_body_json(json!({
            "images": [image(1), image(2)],
            "links": {},
            "meta": { "total": 2 }
        })),
    )
    .await;

    let pages = client_for(&server)
        .request_all(&first_page_request())
        .await
        .unwrap();
    assert_eq!(pages.len(), 1);
    assert_eq!(pages[0].images.len(), 2);
}

/// Failure on page 2 returns the error with page 1 only
#[tokio::test]
async fn test_failure_mid_chain_returns_partial_pages() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        1,
        ResponseTemplate::new(200).set_body_json(page_body(&server, 1, 3)),
    )
    .await;
    mount_page(
        &server,
        2,
        ResponseTemplate::new(500).set_body_json(json!({
            "id": "server_error",
            "message": "Unexpected server-side error"
        })),
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/images"))
        .and(query_param("page", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(&server, 3, 3)))
        .expect(0)
        .mount(&server)
        .await;

    let err = client_for(&server)
        .request_all(&first_page_request())
        .await
        .unwrap_err();

    assert!(err.is_partial());
    assert_eq!(err.pages.len(), 1);
    assert_eq!(err.pages[0].images[0].id, 1);
    assert_eq!(err.source.status(), Some(500));
    assert!(matches!(err.source, DoError::Remote(_)));
}

/// Failure on the first page returns no pages
#[tokio::test]
async fn test_failure_on_first_page_returns_no_pages() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        1,
        ResponseTemplate::new(200).set_body_json(json!({"images": "not a list"})),
    )
    .await;

    let err = client_for(&server)
        .request_all(&first_page_request())
        .await
        .unwrap_err();

    assert!(!err.is_partial());
    assert!(matches!(err.source, DoError::DecodeFailure { .. }));
}

/// Filters survive re-parameterization for later pages
#[tokio::test]
async fn test_filters_carried_to_next_pages() {
    let server = MockServer::start().await;
    for page in 1..=2 {
        Mock::given(method("GET"))
            .and(path("/images"))
            .and(query_param("page", page.to_string()))
            .and(query_param("type", "snapshot"))
            .respond_with(ResponseTemplate::new(200).set_body_json(page_body(&server, page, 2)))
            .expect(1)
            .mount(&server)
            .await;
    }

    let request = first_page_request().filter(ImageFilter::Snapshot);
    let pages = client_for(&server).request_all(&request).await.unwrap();
    assert_eq!(pages.len(), 2);
}

/// Spawned pagination completes on the runtime
#[tokio::test]
async fn test_spawned_request_all() {
    let server = MockServer::start().await;
    for page in 1..=2 {
        mount_page(
            &server,
            page,
            ResponseTemplate::new(200).set_body_json(page_body(&server, page, 2)),
        )
        .await;
    }

    let handle = client_for(&server)
        .spawn_request_all(first_page_request())
        .await;
    let pages = handle.await.unwrap().unwrap();
    assert_eq!(pages.len(), 2);
    assert_eq!(pages[1].images[0].id, 2);
}
