#![allow(dead_code)]

use axum::Router;

/// A metadata payload in the shape search pages embed.
pub fn payload(url: &str, height: u32, width: u32, kind: &str, title: &str, desc: &str) -> String {
    serde_json::json!({
        "id": "abc123",
        "isu": "example.com",
        "ou": url,
        "oh": height,
        "ow": width,
        "ity": kind,
        "pt": title,
        "s": desc,
        "rh": "example.com",
    })
    .to_string()
}

/// Escape a payload the way it appears as element text in the page source.
pub fn html_text(raw: &str) -> String {
    raw.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

/// Wrap raw payloads in marker divs, surrounded by some unrelated markup.
pub fn results_page(payloads: &[String]) -> String {
    let mut html = String::from(
        "<!doctype html><html><head><title>cats - Google Search</title></head><body>\
         <div id=\"search\"><div class=\"rg_bx\">",
    );
    for p in payloads {
        html.push_str("<div class=\"rg_el\"><a href=\"#\"><img src=\"data:,\"></a>");
        html.push_str(&format!("<div class=\"rg_meta notranslate\">{}</div>", html_text(p)));
        html.push_str("</div>");
    }
    html.push_str("</div></div></body></html>");
    html
}

pub fn three_results() -> Vec<String> {
    vec![
        payload("http://img.example.com/a.jpg", 600, 600, "jpg", "Album A", "First result"),
        payload("http://img.example.com/b.png", 1200, 1200, "png", "Album B", "Second result"),
        payload("http://img.example.com/c.gif", 800, 640, "gif", "Album C", "Third result"),
    ]
}

/// Serve `router` on an ephemeral local port and return the search url.
pub async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}/search")
}
