//! Draw-history page fixtures and mock source helpers

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Rows in [`history_page`]
pub const HISTORY_ROWS: usize = 20;

/// Numbers every row of [`history_page`] contains, so they end up the heaviest
pub const HOT_NUMBERS: [u8; 3] = [3, 7, 49];

/// A draw-history page: a navigation table, then the history table
///
/// Every row holds a nine-digit period number (never extracted) and seven drawn
/// numbers, so the page yields `HISTORY_ROWS * 7` numbers.
pub fn history_page() -> String {
    let rows: String = (0..HISTORY_ROWS)
        .map(|i| {
            format!(
                "<tr><td>113000{:03}</td><td>7</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>3</td><td>49</td></tr>",
                i + 1,
                10 + i % 10,
                20 + i % 10,
                30 + i % 10,
                40 + i % 9,
            )
        })
        .collect();

    format!(
        r#"<!DOCTYPE html>
<html><head><meta charset="utf-8"><title>大樂透 歷史開獎</title></head>
<body>
<table class="nav"><tr><td>首頁</td><td>12</td></tr><tr><td>開獎</td><td>34</td></tr></table>
<table class="history">
<tr><th>期別</th><th>獎號</th><th>獎號</th><th>獎號</th><th>獎號</th><th>獎號</th><th>獎號</th><th>特別號</th></tr>
{rows}
</table>
</body></html>"#
    )
}

/// A page whose tables never mention a draw-history keyword
pub fn unrelated_page() -> String {
    let rows: String = (0..10)
        .map(|i| format!("<tr><td>item {}</td><td>{}</td></tr>", i, 10 + i))
        .collect();
    format!("<html><body><table>{rows}</table></body></html>")
}

/// A draw-history table with enough rows but too few numbers
pub fn sparse_page() -> String {
    let rows: String = (0..8)
        .map(|i| format!("<tr><td>113000{:03}</td><td>{}</td></tr>", i + 1, 10 + i))
        .collect();
    format!("<html><body><table><tr><th>期別</th><th>特別號</th></tr>{rows}</table></body></html>")
}

/// Serve `body` with status 200 at `route`
pub async fn mount_page(server: &MockServer, route: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/html; charset=utf-8")
                .set_body_string(body),
        )
        .mount(server)
        .await;
}

/// Serve `status` with no body at `route`
pub async fn mount_status(server: &MockServer, route: &str, status: u16) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
}

/// Absolute URLs for `routes` on `server`
pub fn urls(server: &MockServer, routes: &[&str]) -> Vec<String> {
    routes
        .iter()
        .map(|route| format!("{}{}", server.uri(), route))
        .collect()
}
