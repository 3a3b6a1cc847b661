//! Response header helpers: alert headers for mutations and failures, and the
//! `X-Total-Count` / `Link` pair for paginated lists.

use crate::page::Page;
use axum::http::header::{HeaderName, LINK};
use axum::http::{HeaderMap, HeaderValue};
use url::form_urlencoded;

pub const X_TOTAL_COUNT: &str = "x-total-count";

fn insert(headers: &mut HeaderMap, name: &str, value: &str) {
    match (
        HeaderName::from_bytes(name.as_bytes()),
        HeaderValue::from_str(value),
    ) {
        (Ok(name), Ok(value)) => {
            headers.insert(name, value);
        }
        _ => tracing::warn!(header = name, value, "Skipping header that is not valid HTTP"),
    }
}

/// `X-{app}-alert: {app}.{entity}.{action}` and `X-{app}-params: {param}`.
pub fn entity_alert(application: &str, entity: &str, action: &str, param: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    insert(
        &mut headers,
        &format!("x-{application}-alert"),
        &format!("{application}.{entity}.{action}"),
    );
    insert(&mut headers, &format!("x-{application}-params"), param);
    headers
}

pub fn created_alert(application: &str, entity: &str, id: i64) -> HeaderMap {
    entity_alert(application, entity, "created", &id.to_string())
}

pub fn updated_alert(application: &str, entity: &str, id: i64) -> HeaderMap {
    entity_alert(application, entity, "updated", &id.to_string())
}

pub fn deleted_alert(application: &str, entity: &str, id: i64) -> HeaderMap {
    entity_alert(application, entity, "deleted", &id.to_string())
}

/// `X-{app}-error: {message}` and `X-{app}-params: {entity}`.
pub fn failure_alert(application: &str, entity: &str, message: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    insert(&mut headers, &format!("x-{application}-error"), message);
    insert(&mut headers, &format!("x-{application}-params"), entity);
    headers
}

/// Pagination headers for `page`, linking back to `path` with every query
/// parameter except `page` and `size` preserved.
pub fn pagination<T>(path: &str, query: &[(String, String)], page: &Page<T>) -> HeaderMap {
    let mut headers = HeaderMap::new();
    insert(&mut headers, X_TOTAL_COUNT, &page.total.to_string());

    let last = page.total_pages().saturating_sub(1);
    let mut links = Vec::with_capacity(4);
    if page.has_next() {
        links.push(link(path, query, page.page.saturating_add(1), page.size, "next"));
    }
    if page.has_previous() {
        links.push(link(path, query, page.page.saturating_sub(1).min(last), page.size, "prev"));
    }
    links.push(link(path, query, last, page.size, "last"));
    links.push(link(path, query, 0, page.size, "first"));

    insert(&mut headers, LINK.as_str(), &links.join(","));
    headers
}

fn link(path: &str, query: &[(String, String)], page: u32, size: u32, rel: &str) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (key, value) in query {
        if key != "page" && key != "size" {
            serializer.append_pair(key, value);
        }
    }
    serializer.append_pair("page", &page.to_string());
    serializer.append_pair("size", &size.to_string());
    format!("<{path}?{}>; rel=\"{rel}\"", serializer.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::PageRequest;

    fn query(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_alert_headers_use_application_prefix() {
        let headers = created_alert("marketplaceApp", "art", 7);
        assert_eq!(headers["x-marketplaceapp-alert"], "marketplaceApp.art.created");
        assert_eq!(headers["x-marketplaceapp-params"], "7");
    }

    #[test]
    fn test_invalid_header_name_is_skipped() {
        let headers = deleted_alert("bad app", "art", 1);
        assert!(headers.is_empty());
    }

    #[test]
    fn test_middle_page_links_all_directions() {
        let page = PageRequest::new(1, 2).apply((0..5).collect::<Vec<i32>>());
        let headers = pagination(
            "/api/arts",
            &query(&[("page", "1"), ("size", "2"), ("sort", "name,desc")]),
            &page,
        );

        assert_eq!(headers[X_TOTAL_COUNT], "5");
        let link = headers[LINK].to_str().unwrap();
        assert!(link.contains("</api/arts?sort=name%2Cdesc&page=2&size=2>; rel=\"next\""));
        assert!(link.contains("</api/arts?sort=name%2Cdesc&page=0&size=2>; rel=\"prev\""));
        assert!(link.contains("</api/arts?sort=name%2Cdesc&page=2&size=2>; rel=\"last\""));
        assert!(link.contains("</api/arts?sort=name%2Cdesc&page=0&size=2>; rel=\"first\""));
    }

    #[test]
    fn test_empty_table_links_first_and_last_only() {
        let page = PageRequest::default().apply(Vec::<i32>::new());
        let headers = pagination("/api/arts", &[], &page);

        assert_eq!(headers[X_TOTAL_COUNT], "0");
        let link = headers[LINK].to_str().unwrap();
        assert!(!link.contains("rel=\"next\""));
        assert!(!link.contains("rel=\"prev\""));
        assert!(link.contains("</api/arts?page=0&size=20>; rel=\"last\""));
    }

    #[test]
    fn test_page_past_the_end_has_no_next_and_prev_points_to_last() {
        let page = PageRequest::new(u32::MAX, 20).apply(vec![1]);
        let headers = pagination("/api/artists", &[], &page);

        let link = headers[LINK].to_str().unwrap();
        assert!(!link.contains("rel=\"next\""));
        assert!(link.contains("</api/artists?page=0&size=20>; rel=\"prev\""));
        assert!(link.contains("</api/artists?page=0&size=20>; rel=\"last\""));
    }
}
