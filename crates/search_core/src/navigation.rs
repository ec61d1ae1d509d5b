use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

pub const SEARCH_PATH: &str = "/search";
pub const SEARCH_QUERY_KEY: &str = "q";

/// RFC 3986 unreserved characters stay literal, everything else is escaped.
const QUERY_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Where the location should point after a submit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationTarget {
    pub path: String,
    pub query: Vec<(String, String)>,
}

impl NavigationTarget {
    /// Results page for `text`, encoded under `q`.
    pub fn search(text: &str) -> Self {
        Self {
            path: SEARCH_PATH.to_string(),
            query: vec![(SEARCH_QUERY_KEY.to_string(), text.to_string())],
        }
    }

    /// Renders `path?key=value&...` with percent-encoded keys and values.
    pub fn to_location(&self) -> String {
        if self.query.is_empty() {
            return self.path.clone();
        }
        let query = self
            .query
            .iter()
            .map(|(key, value)| {
                format!(
                    "{}={}",
                    utf8_percent_encode(key, QUERY_COMPONENT),
                    utf8_percent_encode(value, QUERY_COMPONENT)
                )
            })
            .collect::<Vec<_>>()
            .join("&");
        format!("{}?{}", self.path, query)
    }
}
