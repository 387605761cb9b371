use once_cell::sync::Lazy;
use reqwest::Url;
use reqwest::header::{
    ACCEPT, ACCEPT_CHARSET, ACCEPT_ENCODING, ACCEPT_LANGUAGE, CONNECTION, HeaderMap, HeaderValue,
    USER_AGENT,
};

use crate::config::QueryEncoding;

/// Filter parameters that precede the query text.
const LEADING_PARAMS: [(&str, &str); 2] = [("as_st", "y"), ("tbm", "isch")];

/// Filter parameters that follow it: no extra terms, safe search, and images
/// larger than VGA with a square aspect ratio.
const TRAILING_PARAMS: [(&str, &str); 7] = [
    ("as_epq", ""),
    ("as_oq", ""),
    ("as_eq", ""),
    ("cr", ""),
    ("as_sitesearch", ""),
    ("safe", "images"),
    ("tbs", "isz:lt,islt:vga,iar:s"),
];

pub static BROWSER_HEADERS: Lazy<HeaderMap> = Lazy::new(|| {
    let mut headers = HeaderMap::new();
    headers.insert(
        USER_AGENT,
        HeaderValue::from_static(
            "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.11 (KHTML, like Gecko) Chrome/23.0.1271.64 Safari/537.11",
        ),
    );
    headers.insert(
        ACCEPT,
        HeaderValue::from_static("text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8"),
    );
    headers.insert(
        ACCEPT_CHARSET,
        HeaderValue::from_static("ISO-8859-1,utf-8;q=0.7,*;q=0.3"),
    );
    headers.insert(ACCEPT_ENCODING, HeaderValue::from_static("none"));
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.8"));
    headers.insert(CONNECTION, HeaderValue::from_static("keep-alive"));
    headers
});

/// A fully built image search request.
#[derive(Debug, Clone)]
pub struct SearchRequest {
    url: Url,
    headers: HeaderMap,
}

impl SearchRequest {
    pub fn new(endpoint: &Url, query: &str, encoding: QueryEncoding) -> SearchRequest {
        SearchRequest {
            url: build_search_url(endpoint, query, encoding),
            headers: BROWSER_HEADERS.clone(),
        }
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }
}

/// Put the image search parameters on `endpoint`. Any query string already
/// on the endpoint is replaced.
pub fn build_search_url(endpoint: &Url, query: &str, encoding: QueryEncoding) -> Url {
    let mut url = endpoint.clone();
    match encoding {
        QueryEncoding::Encoded => {
            url.set_query(None);
            url.query_pairs_mut()
                .extend_pairs(LEADING_PARAMS)
                .append_pair("as_q", query)
                .extend_pairs(TRAILING_PARAMS);
        }
        QueryEncoding::Raw => {
            let raw = format!(
                "{}&as_q={}&{}",
                join_params(&LEADING_PARAMS),
                query,
                join_params(&TRAILING_PARAMS)
            );
            url.set_query(Some(&raw));
        }
    }
    url
}

fn join_params(params: &[(&str, &str)]) -> String {
    params
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&")
}
