//! Query string construction for request URLs.

/// Builds a query string from ordered key/value pairs.
///
/// Keys whose value is `None` are omitted entirely. Returns the empty
/// string when there is nothing to encode; otherwise the result includes
/// the leading `?`. Keys and values are percent-encoded.
///
/// # Example
///
/// ```rust
/// use webflow_api::build_query_string;
///
/// assert_eq!(build_query_string(None), "");
/// assert_eq!(
///     build_query_string(Some(&[("q", Some("shoes".to_string())), ("page", None)])),
///     "?q=shoes"
/// );
/// ```
#[must_use]
pub fn build_query_string(params: Option<&[(&str, Option<String>)]>) -> String {
    let Some(params) = params else {
        return String::new();
    };

    let encoded: Vec<String> = params
        .iter()
        .filter_map(|(key, value)| {
            value.as_ref().map(|value| {
                format!("{}={}", urlencoding::encode(key), urlencoding::encode(value))
            })
        })
        .collect();

    if encoded.is_empty() {
        String::new()
    } else {
        format!("?{}", encoded.join("&"))
    }
}
