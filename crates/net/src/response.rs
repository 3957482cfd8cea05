//! Fetch response representation

use std::collections::HashMap;

use url::Url;

/// Response headers with case-insensitive lookup
#[derive(Debug, Clone, Default)]
pub struct Headers {
    map: HashMap<String, String>,
}

impl Headers {
    /// Create an empty header map
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a header; the name is stored lowercased
    pub fn insert(&mut self, name: impl AsRef<str>, value: impl Into<String>) {
        self.map
            .insert(name.as_ref().to_ascii_lowercase(), value.into());
    }

    /// Look up a header by name, case-insensitively
    pub fn get(&self, name: &str) -> Option<&str> {
        self.map
            .get(&name.to_ascii_lowercase())
            .map(|s| s.as_str())
    }

    /// Number of headers
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Check if there are no headers
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

impl FromIterator<(String, String)> for Headers {
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        let mut headers = Headers::new();
        for (name, value) in iter {
            headers.insert(name, value);
        }
        headers
    }
}

/// A fetched resource
#[derive(Debug)]
pub struct Response {
    /// URL the response came from
    pub url: Url,
    /// HTTP status code (200 for non-HTTP schemes)
    pub status: u16,
    /// Response headers
    pub headers: Headers,
    /// Response body as bytes
    pub body: Vec<u8>,
}

impl Response {
    /// Create a new response
    pub fn new(url: Url, status: u16, headers: Headers, body: Vec<u8>) -> Self {
        Self {
            url,
            status,
            headers,
            body,
        }
    }

    /// Check if the response was successful (2xx)
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Get the Content-Type header
    pub fn content_type(&self) -> Option<&str> {
        self.headers.get("Content-Type")
    }

    /// Get the body as a UTF-8 string, replacing invalid sequences
    pub fn text_lossy(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}
