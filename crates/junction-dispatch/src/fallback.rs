//! Default fallback handlers.

use http::header::ALLOW;
use http::{HeaderMap, HeaderValue, StatusCode};
use junction_core::{into_handler, BoxHandler, Request};

/// The `Allow` header for a verb list, comma separated.
pub(crate) fn allow_header(verbs: &[String]) -> HeaderMap {
    let mut headers = HeaderMap::new();
    if let Ok(value) = HeaderValue::from_str(&verbs.join(", ")) {
        headers.insert(ALLOW, value);
    }
    headers
}

/// `404 Not Found` with an empty body.
pub(crate) fn not_found() -> BoxHandler {
    into_handler(|_request: Request| async { StatusCode::NOT_FOUND })
}

/// `405 Method Not Allowed` with an empty body and `Allow` listing the
/// verbs registered for the path.
pub(crate) fn method_not_allowed() -> BoxHandler {
    into_handler(|request: Request| async move {
        (
            allow_header(request.allowed_methods()),
            StatusCode::METHOD_NOT_ALLOWED,
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use junction_core::BufferedWriter;

    #[test]
    fn test_allow_header_joined() {
        let headers = allow_header(&["GET".to_string(), "DELETE".to_string()]);
        assert_eq!(headers[ALLOW], "GET, DELETE");
    }

    #[tokio::test]
    async fn test_default_method_not_allowed() {
        let mut request = Request::builder().build();
        request.set_allowed_methods(vec!["GET".to_string()]);

        let mut writer = BufferedWriter::new();
        method_not_allowed()
            .call(request)
            .await
            .write_to(&mut writer);

        let response = writer.into_bytes_response();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(response.headers()[ALLOW], "GET");
        assert!(response.body().is_empty());
    }

    #[tokio::test]
    async fn test_default_not_found() {
        let mut writer = BufferedWriter::new();
        not_found()
            .call(Request::builder().build())
            .await
            .write_to(&mut writer);

        let response = writer.into_bytes_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(response.body().is_empty());
    }
}
