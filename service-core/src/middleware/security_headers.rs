use axum::{extract::Request, http::header, middleware::Next, response::IntoResponse};

/// CSP for the viewer page: the page loads its 3D library from unpkg through an
/// inline import map.
const PAGE_CSP: &str = "default-src 'self'; \
     script-src 'self' 'unsafe-inline' https://unpkg.com; \
     style-src 'self' 'unsafe-inline'; \
     img-src 'self' data:; \
     connect-src 'self'";

const API_CSP: &str = "default-src 'none'; frame-ancestors 'none'";

/// Browser-rendered routes: the index page and its static assets.
pub fn is_page_route(path: &str) -> bool {
    path == "/" || path.starts_with("/static/")
}

pub async fn security_headers_middleware(req: Request, next: Next) -> impl IntoResponse {
    let is_page = is_page_route(req.uri().path());

    let mut response = next.run(req).await;
    let headers = response.headers_mut();

    headers.insert(
        header::X_CONTENT_TYPE_OPTIONS,
        header::HeaderValue::from_static("nosniff"),
    );
    headers.insert(
        header::X_XSS_PROTECTION,
        header::HeaderValue::from_static("1; mode=block"),
    );
    headers.insert(
        header::STRICT_TRANSPORT_SECURITY,
        header::HeaderValue::from_static("max-age=31536000; includeSubDomains"),
    );

    if is_page {
        headers.insert(
            header::CONTENT_SECURITY_POLICY,
            header::HeaderValue::from_static(PAGE_CSP),
        );
        headers.insert(
            header::X_FRAME_OPTIONS,
            header::HeaderValue::from_static("SAMEORIGIN"),
        );
    } else {
        headers.insert(
            header::CONTENT_SECURITY_POLICY,
            header::HeaderValue::from_static(API_CSP),
        );
        headers.insert(
            header::X_FRAME_OPTIONS,
            header::HeaderValue::from_static("DENY"),
        );
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_routes() {
        assert!(is_page_route("/"));
        assert!(is_page_route("/static/js/main.js"));
        assert!(!is_page_route("/api/compound"));
        assert!(!is_page_route("/staticky"));
    }
}
