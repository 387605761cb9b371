mod common;

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::get;
use axum::Router;
use reqwest::Url;

use common::{payload, results_page, serve, three_results};
use imgsearch::config::{Config, DecodePolicy};
use imgsearch::error::LookupError;
use imgsearch::output::parse_document;
use imgsearch::pipeline::ImageSearch;

type Seen = Arc<Mutex<Vec<(HashMap<String, String>, HeaderMap)>>>;

mod test_helpers {
    use super::*;

    pub fn config_for(endpoint: &str) -> Config {
        Config {
            endpoint: Url::parse(endpoint).unwrap(),
            ..Config::default()
        }
    }

    /// A search endpoint that answers every request with `status` and `body`
    /// and records what it was asked.
    pub async fn fixed_endpoint(status: StatusCode, body: String) -> (String, Seen) {
        let seen: Seen = Arc::new(Mutex::new(Vec::new()));
        let router = Router::new()
            .route(
                "/search",
                get(
                    move |State(seen): State<Seen>,
                          Query(params): Query<HashMap<String, String>>,
                          headers: HeaderMap| {
                        let body = body.clone();
                        async move {
                            seen.lock().unwrap().push((params, headers));
                            (status, body)
                        }
                    },
                ),
            )
            .with_state(seen.clone());
        (serve(router).await, seen)
    }

    pub async fn run(config: Config, query: &str) -> (String, Result<(), LookupError>) {
        let search = ImageSearch::new(config).unwrap();
        let mut out = Vec::new();
        let result = search.run(query, &mut out).await;
        (String::from_utf8(out).unwrap(), result)
    }
}

use test_helpers::*;

#[cfg(test)]
mod success_tests {
    use super::*;

    #[tokio::test]
    async fn test_emits_one_result_per_marker_in_order() {
        let (url, _) = fixed_endpoint(StatusCode::OK, results_page(&three_results())).await;
        let (xml, result) = run(config_for(&url), "cats").await;

        assert!(result.is_ok());
        let doc = parse_document(&xml).unwrap();
        assert!(doc.error.is_none());
        let titles: Vec<&str> = doc.results.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["Album A", "Album B", "Album C"]);
        assert_eq!(doc.results[1].height, 1200);
        assert_eq!(doc.results[1].kind, "png");
        assert_eq!(xml.matches("<Error>").count(), 0);
    }

    #[tokio::test]
    async fn test_request_carries_query_filters_and_headers() {
        let (url, seen) = fixed_endpoint(StatusCode::OK, results_page(&three_results())).await;
        let (_, result) = run(config_for(&url), "modest mouse & friends").await;
        assert!(result.is_ok());

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        let (params, headers) = &seen[0];
        assert_eq!(params["as_q"], "modest mouse & friends");
        assert_eq!(params["tbm"], "isch");
        assert_eq!(params["safe"], "images");
        assert_eq!(params["tbs"], "isz:lt,islt:vga,iar:s");
        assert!(
            headers["user-agent"]
                .to_str()
                .unwrap()
                .starts_with("Mozilla/5.0 (X11; Linux x86_64)")
        );
        assert_eq!(headers["accept-encoding"], "none");
        assert_eq!(headers["accept-charset"], "ISO-8859-1,utf-8;q=0.7,*;q=0.3");
    }

    #[tokio::test]
    async fn test_output_is_deterministic() {
        let (url, _) = fixed_endpoint(StatusCode::OK, results_page(&three_results())).await;
        let (first, _) = run(config_for(&url), "cats").await;
        let (second, _) = run(config_for(&url), "cats").await;
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_escaped_fields_round_trip() {
        let page = results_page(&[payload(
            "http://img.example.com/a.jpg?a=1&b=2",
            10,
            20,
            "jpg",
            "Tom & Jerry <HD>",
            "\"quoted\" description",
        )]);
        let (url, _) = fixed_endpoint(StatusCode::OK, page).await;
        let (xml, _) = run(config_for(&url), "cartoons").await;

        assert!(xml.contains("<Title>Tom &amp; Jerry &lt;HD&gt;</Title>"));
        let doc = parse_document(&xml).unwrap();
        assert_eq!(doc.results[0].title, "Tom & Jerry <HD>");
        assert_eq!(doc.results[0].description, "\"quoted\" description");
        assert_eq!(doc.results[0].url, "http://img.example.com/a.jpg?a=1&b=2");
    }
}

#[cfg(test)]
mod failure_tests {
    use super::*;

    #[tokio::test]
    async fn test_no_markers_reports_no_results() {
        let (url, _) =
            fixed_endpoint(StatusCode::OK, "<html><body>empty</body></html>".into()).await;
        let (xml, result) = run(config_for(&url), "zzzz").await;

        assert!(matches!(result, Err(LookupError::NoResults)));
        assert!(xml.contains("<Error>No results found.</Error>"));
        assert_eq!(xml.matches("<Error>").count(), 1);
        assert_eq!(xml.matches("<Result>").count(), 0);
        assert!(xml.ends_with("</Output>\n"));
    }

    #[tokio::test]
    async fn test_http_error_body_becomes_error_text() {
        for status in [StatusCode::NOT_FOUND, StatusCode::SERVICE_UNAVAILABLE] {
            let body = "<html><body>We're sorry & blocked</body></html>".to_string();
            let (url, _) = fixed_endpoint(status, body.clone()).await;
            let (xml, result) = run(config_for(&url), "cats").await;

            match result {
                Err(LookupError::Http { status: got, .. }) => assert_eq!(got, status),
                other => panic!("expected http error, got {other:?}"),
            }
            let doc = parse_document(&xml).unwrap();
            assert_eq!(doc.error.as_deref(), Some(body.as_str()));
            assert!(doc.results.is_empty());
        }
    }

    #[tokio::test]
    async fn test_http_error_with_marker_body_is_still_an_error() {
        let (url, _) =
            fixed_endpoint(StatusCode::INTERNAL_SERVER_ERROR, results_page(&three_results())).await;
        let (xml, result) = run(config_for(&url), "cats").await;
        assert!(matches!(result, Err(LookupError::Http { .. })));
        assert_eq!(xml.matches("<Result>").count(), 0);
    }

    #[tokio::test]
    async fn test_connection_refused_is_reported() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let (xml, result) = run(config_for(&format!("http://{addr}/search")), "cats").await;
        assert!(matches!(result, Err(LookupError::Transport(_))));
        let doc = parse_document(&xml).unwrap();
        assert!(doc.error.unwrap().starts_with("request failed"));
    }

    #[tokio::test]
    async fn test_slow_endpoint_times_out() {
        let router = Router::new().route(
            "/search",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(10)).await;
                "too late"
            }),
        );
        let url = serve(router).await;
        let config = Config {
            timeout: Some(Duration::from_millis(200)),
            ..config_for(&url)
        };
        let (xml, result) = run(config, "cats").await;
        match result {
            Err(LookupError::Transport(e)) => assert!(e.is_timeout()),
            other => panic!("expected timeout, got {other:?}"),
        }
        assert_eq!(xml.matches("<Error>").count(), 1);
    }
}

#[cfg(test)]
mod policy_tests {
    use super::*;

    fn page_with_malformed_middle() -> String {
        let mut payloads = three_results();
        payloads.insert(1, r#"{"ou":"http://img.example.com/broken.jpg"}"#.to_string());
        results_page(&payloads)
    }

    #[tokio::test]
    async fn test_lenient_skips_malformed_record() {
        let (url, _) = fixed_endpoint(StatusCode::OK, page_with_malformed_middle()).await;
        let (xml, result) = run(config_for(&url), "cats").await;
        assert!(result.is_ok());
        assert_eq!(xml.matches("<Result>").count(), 3);
        assert!(!xml.contains("broken.jpg"));
    }

    #[tokio::test]
    async fn test_strict_reports_single_error() {
        let (url, _) = fixed_endpoint(StatusCode::OK, page_with_malformed_middle()).await;
        let config = Config {
            decode_policy: DecodePolicy::Strict,
            ..config_for(&url)
        };
        let (xml, result) = run(config, "cats").await;
        assert!(matches!(result, Err(LookupError::Decode { index: 1, .. })));
        assert_eq!(xml.matches("<Result>").count(), 0);
        let doc = parse_document(&xml).unwrap();
        assert!(doc.error.unwrap().starts_with("result 1: malformed metadata payload"));
    }
}
