//! Loading state and the error page path

use lammasu_net::FetchHandle;
use url::Url;

/// Redirect hops followed before giving up
pub(crate) const MAX_REDIRECTS: u8 = 8;

/// Loading state of the view
#[derive(Debug, Clone, Default)]
pub enum LoadingState {
    /// No navigation in progress
    #[default]
    Idle,
    /// Resource is being fetched
    Loading {
        /// URL being loaded
        url: Url,
    },
    /// Navigation failed; an error page install is under way
    Failed {
        /// URL that failed, as given
        url: String,
        /// Failure message
        message: String,
    },
}

/// The fetch currently in flight, if any
pub(crate) enum PendingFetch {
    /// An ordinary navigation
    Navigation {
        url: Url,
        redirects: u8,
        handle: FetchHandle,
    },
    /// Fetching the error page template after a failure
    ErrorPage {
        failed_url: String,
        message: String,
        handle: FetchHandle,
    },
}

/// Substitute the failed URL and the message into the error page template.
/// Both values are escaped so they cannot inject markup.
pub(crate) fn render_error_page(template: &str, failed_url: &str, message: &str) -> String {
    template
        .replace("{url}", &escape_html(failed_url))
        .replace("{error}", &escape_html(message))
}

/// Escape text for insertion into HTML
pub(crate) fn escape_html(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
