//! Built-in `about:` resources

use url::Url;

use crate::error::{NetError, NetResult};
use crate::response::{Headers, Response};

/// Well-known URL of the error page template
pub const ERROR_PAGE_URL: &str = "about:error";

/// Two-slot error page template. `{url}` and `{error}` are substituted with
/// HTML-escaped values by the view before parsing.
const ERROR_TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<head>
    <title>Page load failed</title>
</head>
<body>
    <h1>Failed to load {url}</h1>
    <p>{error}</p>
</body>
</html>
"#;

const BLANK_PAGE: &str = "<!DOCTYPE html><html><head><title></title></head><body></body></html>";

/// Resolve an `about:` URL against the built-in table
pub(crate) fn builtin(url: &Url) -> NetResult<Response> {
    let body = match url.path() {
        "blank" => BLANK_PAGE,
        "error" => ERROR_TEMPLATE,
        other => return Err(NetError::NoSuchResource(format!("about:{}", other))),
    };

    let mut headers = Headers::new();
    headers.insert("Content-Type", "text/html");
    Ok(Response::new(
        url.clone(),
        200,
        headers,
        body.as_bytes().to_vec(),
    ))
}
