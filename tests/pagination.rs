//! Pagination tests against a wiremock server.

use chrono::{Duration as ChronoDuration, SecondsFormat, Utc};
use futures::TryStreamExt;
use meraki::endpoint::{GET_NETWORK_EVENTS, GET_ORGANIZATION_NETWORKS};
use meraki::pagination::{Direction, PageOptions, Pages, TotalPages};
use meraki::{Client, EndpointMetadata, Error, Params};
use serde_json::{json, Value};
use std::num::NonZeroU32;
use wiremock::matchers::{method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

const NETWORKS_PATH: &str = "/api/v1/organizations/1/networks";
const EVENTS_PATH: &str = "/api/v1/networks/N_1/events";

fn client_for(server: &MockServer) -> meraki::ClientBuilder {
    Client::builder()
        .api_key("test-key")
        .base_url(format!("{}/api/v1", server.uri()))
        .unwrap()
}

fn networks() -> EndpointMetadata {
    GET_ORGANIZATION_NETWORKS.metadata()
}

fn events() -> EndpointMetadata {
    GET_NETWORK_EVENTS.metadata()
}

fn link(server: &MockServer, path: &str, query: &str, rel: &str) -> String {
    format!("<{}{path}?{query}>; rel={rel}", server.uri())
}

fn network_ids(range: std::ops::RangeInclusive<u32>) -> Value {
    Value::Array(range.map(|i| json!({"id": format!("N_{i}")})).collect())
}

/// Two pages of networks: N_1..N_5 linking to N_6..N_8.
async fn mount_network_pages(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path(NETWORKS_PATH))
        .and(query_param_is_missing("startingAfter"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(network_ids(1..=5))
                .insert_header("Link", link(server, NETWORKS_PATH, "perPage=5&startingAfter=N_5", "next")),
        )
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path(NETWORKS_PATH))
        .and(query_param("startingAfter", "N_5"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(network_ids(6..=8))
                .insert_header("Link", link(server, NETWORKS_PATH, "perPage=5", "first")),
        )
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_eager_pages_are_concatenated() {
    let mock_server = MockServer::start().await;
    mount_network_pages(&mock_server).await;

    let client = client_for(&mock_server).build().unwrap();
    let params: Params = json!({"perPage": 5}).as_object().unwrap().clone();

    let result = client
        .collect_pages(&networks(), "/organizations/1/networks", Some(&params), PageOptions::new())
        .await
        .unwrap();

    assert_eq!(result, Some(network_ids(1..=8)));
    assert_eq!(mock_server.received_requests().await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_lazy_pages_match_eager_and_fetch_on_demand() {
    let mock_server = MockServer::start().await;
    mount_network_pages(&mock_server).await;

    let client = client_for(&mock_server)
        .use_iterator_for_get_pages(true)
        .build()
        .unwrap();

    let pages = client
        .get_pages(&networks(), "/organizations/1/networks", None, PageOptions::new())
        .await
        .unwrap();
    let Pages::Stream(mut stream) = pages else {
        panic!("expected a stream");
    };
    assert!(mock_server.received_requests().await.unwrap().is_empty());

    let mut items = Vec::new();
    for _ in 0..5 {
        items.push(stream.try_next().await.unwrap().unwrap());
    }
    assert_eq!(mock_server.received_requests().await.unwrap().len(), 1);

    while let Some(item) = stream.try_next().await.unwrap() {
        items.push(item);
    }
    assert_eq!(mock_server.received_requests().await.unwrap().len(), 2);
    assert_eq!(Value::Array(items), network_ids(1..=8));
}

#[tokio::test]
async fn test_get_pages_defaults_to_eager() {
    let mock_server = MockServer::start().await;
    mount_network_pages(&mock_server).await;

    let client = client_for(&mock_server).build().unwrap();
    let pages = client
        .get_pages(&networks(), "/organizations/1/networks", None, PageOptions::new())
        .await
        .unwrap();

    match pages {
        Pages::Collected(result) => assert_eq!(result, Some(network_ids(1..=8))),
        other => panic!("expected collected pages, got {other:?}"),
    }
}

#[tokio::test]
async fn test_total_pages_limits_requests() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(NETWORKS_PATH))
        .and(query_param_is_missing("startingAfter"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(network_ids(1..=5))
                .insert_header("Link", link(&mock_server, NETWORKS_PATH, "startingAfter=N_5", "next")),
        )
        // Once per walk: eager, then lazy.
        .expect(2)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(query_param("startingAfter", "N_5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(network_ids(6..=8)))
        .expect(0)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server).build().unwrap();
    let options = PageOptions::new().total_pages(TotalPages::Count(NonZeroU32::MIN));

    let result = client
        .collect_pages(&networks(), "/organizations/1/networks", None, options.clone())
        .await
        .unwrap();
    assert_eq!(result, Some(network_ids(1..=5)));

    let items: Vec<Value> = client
        .stream_pages(&networks(), "/organizations/1/networks", None, options)
        .try_collect()
        .await
        .unwrap();
    assert_eq!(Value::Array(items), network_ids(1..=5));
}

async fn pages_with_limit(client: &Client, total_pages: &str) -> meraki::Result<Pages> {
    let total_pages: TotalPages = total_pages.parse()?;
    client
        .get_pages(
            &networks(),
            "/organizations/1/networks",
            None,
            PageOptions::new().total_pages(total_pages),
        )
        .await
}

#[tokio::test]
async fn test_invalid_total_pages_makes_no_request() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server).build().unwrap();

    for invalid in ["0", "-3", "some"] {
        let err = pages_with_limit(&client, invalid).await.unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)), "{invalid}: {err:?}");
    }
    assert!(TotalPages::try_from(0).is_err());
    assert!(mock_server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_items_pages_keep_last_remaining_count() {
    let mock_server = MockServer::start().await;
    let statuses = "/api/v1/organizations/1/devices/statuses/overview";

    Mock::given(method("GET"))
        .and(path(statuses))
        .and(query_param_is_missing("startingAfter"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({
                    "items": [{"serial": "A"}, {"serial": "B"}],
                    "meta": {"counts": {"items": {"total": 3, "remaining": 1}}},
                }))
                .insert_header("Link", link(&mock_server, statuses, "startingAfter=B", "next")),
        )
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path(statuses))
        .and(query_param("startingAfter", "B"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [{"serial": "C"}],
            "meta": {"counts": {"items": {"total": 3, "remaining": 0}}},
        })))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server).build().unwrap();
    let metadata = EndpointMetadata::new(["organizations", "monitor"], "getOrganizationDevicesStatusesOverview");

    let result = client
        .collect_pages(&metadata, "/organizations/1/devices/statuses/overview", None, PageOptions::new())
        .await
        .unwrap()
        .unwrap();

    assert_eq!(result["items"], json!([{"serial": "A"}, {"serial": "B"}, {"serial": "C"}]));
    assert_eq!(result["meta"]["counts"]["items"]["remaining"], 0);

    let items: Vec<Value> = client
        .stream_pages(&metadata, "/organizations/1/devices/statuses/overview", None, PageOptions::new())
        .try_collect()
        .await
        .unwrap();
    assert_eq!(items.len(), 3);
}

#[tokio::test]
async fn test_event_log_forward_is_chronological() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(EVENTS_PATH))
        .and(query_param_is_missing("startingAfter"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({
                    "message": null,
                    "pageStartAt": "2020-01-01T00:00:00Z",
                    "pageEndAt": "2020-01-01T01:00:00Z",
                    "events": [{"id": 2}, {"id": 1}],
                }))
                .insert_header(
                    "Link",
                    link(&mock_server, EVENTS_PATH, "startingAfter=2020-01-01T01%3A00%3A00Z", "next"),
                ),
        )
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path(EVENTS_PATH))
        .and(query_param("startingAfter", "2020-01-01T01:00:00Z"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": null,
            "pageStartAt": "2020-01-01T01:00:00Z",
            "pageEndAt": "2020-01-01T02:00:00Z",
            "events": [{"id": 4}, {"id": 3}],
        })))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server).build().unwrap();

    let result = client
        .collect_pages(&events(), "/networks/N_1/events", None, PageOptions::new())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(result["events"], json!([{"id": 1}, {"id": 2}, {"id": 3}, {"id": 4}]));
    assert_eq!(result["pageStartAt"], "2020-01-01T00:00:00Z");
    assert_eq!(result["pageEndAt"], "2020-01-01T02:00:00Z");

    let streamed: Vec<Value> = client
        .stream_pages(&events(), "/networks/N_1/events", None, PageOptions::new())
        .try_collect()
        .await
        .unwrap();
    assert_eq!(Value::Array(streamed), result["events"]);
}

#[tokio::test]
async fn test_event_log_forward_stops_near_now() {
    let mock_server = MockServer::start().await;
    let recent = (Utc::now() - ChronoDuration::minutes(1)).to_rfc3339_opts(SecondsFormat::Secs, true);

    Mock::given(method("GET"))
        .and(path(EVENTS_PATH))
        .and(query_param_is_missing("startingAfter"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"events": [{"id": 1}]}))
                .insert_header(
                    "Link",
                    link(&mock_server, EVENTS_PATH, &format!("startingAfter={recent}"), "next"),
                ),
        )
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path(EVENTS_PATH))
        .and(query_param("startingAfter", recent.as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"events": [{"id": 2}]})))
        .expect(0)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server).build().unwrap();
    let result = client
        .collect_pages(&events(), "/networks/N_1/events", None, PageOptions::new())
        .await
        .unwrap()
        .unwrap();

    assert_eq!(result["events"], json!([{"id": 1}]));
}

#[tokio::test]
async fn test_event_log_forward_stops_after_end_time() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(EVENTS_PATH))
        .and(query_param_is_missing("startingAfter"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"events": [{"id": 1}]}))
                .insert_header(
                    "Link",
                    link(&mock_server, EVENTS_PATH, "startingAfter=2021-06-01T00%3A00%3A00Z", "next"),
                ),
        )
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path(EVENTS_PATH))
        .and(query_param("startingAfter", "2021-06-01T00:00:00Z"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"events": []})))
        .expect(0)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server).build().unwrap();
    let end_time = "2021-05-01T00:00:00Z".parse().unwrap();
    let options = PageOptions::new().event_log_end_time(end_time);

    let result = client
        .collect_pages(&events(), "/networks/N_1/events", None, options)
        .await
        .unwrap();
    assert_eq!(result, Some(json!({"events": [{"id": 1}]})));
}

#[tokio::test]
async fn test_event_log_backward_stops_before_2014() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(EVENTS_PATH))
        .and(query_param_is_missing("endingBefore"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"events": [{"id": 2}, {"id": 1}]}))
                .insert_header(
                    "Link",
                    link(&mock_server, EVENTS_PATH, "endingBefore=2013-12-01T00%3A00%3A00Z", "prev"),
                ),
        )
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path(EVENTS_PATH))
        .and(query_param("endingBefore", "2013-12-01T00:00:00Z"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"events": []})))
        .expect(0)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server).build().unwrap();
    let options = PageOptions::new().direction(Direction::Prev);

    let result = client
        .collect_pages(&events(), "/networks/N_1/events", None, options)
        .await
        .unwrap()
        .unwrap();

    // Backward walks keep the server's newest-first order.
    assert_eq!(result["events"], json!([{"id": 2}, {"id": 1}]));
}

#[tokio::test]
async fn test_no_content_first_page() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(NETWORKS_PATH))
        .respond_with(ResponseTemplate::new(204))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server).build().unwrap();

    let result = client
        .collect_pages(&networks(), "/organizations/1/networks", None, PageOptions::new())
        .await
        .unwrap();
    assert!(result.is_none());

    let items: Vec<Value> = client
        .stream_pages(&networks(), "/organizations/1/networks", None, PageOptions::new())
        .try_collect()
        .await
        .unwrap();
    assert!(items.is_empty());
}

#[tokio::test]
async fn test_page_error_is_surfaced() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(NETWORKS_PATH))
        .and(query_param_is_missing("startingAfter"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(network_ids(1..=2))
                .insert_header("Link", link(&mock_server, NETWORKS_PATH, "startingAfter=N_2", "next")),
        )
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path(NETWORKS_PATH))
        .and(query_param("startingAfter", "N_2"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({"errors": ["Forbidden"]})))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server).build().unwrap();

    let err = client
        .collect_pages(&networks(), "/organizations/1/networks", None, PageOptions::new())
        .await
        .unwrap_err();
    assert_eq!(err.status().map(|s| s.as_u16()), Some(403));

    let mut stream =
        client.stream_pages(&networks(), "/organizations/1/networks", None, PageOptions::new());
    assert_eq!(stream.try_next().await.unwrap(), Some(json!({"id": "N_1"})));
    assert_eq!(stream.try_next().await.unwrap(), Some(json!({"id": "N_2"})));
    assert!(stream.try_next().await.is_err());
}

#[tokio::test]
async fn test_endpoint_pages_filter_query() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(NETWORKS_PATH))
        .and(query_param("perPage", "5"))
        .and(query_param_is_missing("bogus"))
        .respond_with(ResponseTemplate::new(200).set_body_json(network_ids(1..=2)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server).build().unwrap();
    let args: Params = json!({"perPage": 5, "bogus": true}).as_object().unwrap().clone();

    let pages = client
        .get_endpoint_pages(&GET_ORGANIZATION_NETWORKS, &[("organizationId", "1")], &args, PageOptions::new())
        .await
        .unwrap();

    match pages {
        Pages::Collected(result) => assert_eq!(result, Some(network_ids(1..=2))),
        other => panic!("expected collected pages, got {other:?}"),
    }
}
