//! The URL form of a query: key/values pairs as decoded from a request URL.

use std::collections::BTreeMap;

/// Joins pairs as `k=v&k2=v2`, keys in order, each key and value
/// query-escaped. A pair with an empty value emits the key only.
///
/// ```
/// use std::collections::BTreeMap;
/// use rql::url::encode_url_values;
///
/// let mut values = BTreeMap::new();
/// values.insert("name".to_string(), vec!["john wick".to_string()]);
/// values.insert("eq(a,1)".to_string(), vec![String::new()]);
/// assert_eq!(encode_url_values(&values), "eq%28a%2C1%29&name=john+wick");
/// ```
pub fn encode_url_values(values: &BTreeMap<String, Vec<String>>) -> String {
    let mut buf = String::new();
    for (key, vs) in values {
        let key = query_escape(key);
        for v in vs {
            if !buf.is_empty() {
                buf.push('&');
            }
            buf.push_str(&key);
            if !v.is_empty() {
                buf.push('=');
                buf.push_str(&query_escape(v));
            }
        }
    }
    buf
}

/// The RQL text of a set of pairs: encoded, then percent-decoded as a path,
/// which leaves `+` standing for the spaces of the original values.
pub(crate) fn query_from_values(values: &BTreeMap<String, Vec<String>>) -> String {
    let encoded = encode_url_values(values);
    match urlencoding::decode(&encoded) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => encoded,
    }
}

/// Splits a raw query string into pairs. Pairs with malformed escapes or a
/// `;` are dropped.
///
/// ```
/// use rql::url::values_from_query_string;
///
/// let values = values_from_query_string("a=1&a=2&b&c=x%20y");
/// assert_eq!(values["a"], vec!["1", "2"]);
/// assert_eq!(values["b"], vec![""]);
/// assert_eq!(values["c"], vec!["x y"]);
/// ```
pub fn values_from_query_string(query: &str) -> BTreeMap<String, Vec<String>> {
    let mut values: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for pair in query.split('&') {
        if pair.is_empty() || pair.contains(';') {
            continue;
        }
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        let (Some(key), Some(value)) = (query_unescape(key), query_unescape(value)) else {
            tracing::debug!(pair, "dropped malformed query pair");
            continue;
        };
        values.entry(key).or_default().push(value);
    }
    values
}

fn query_escape(s: &str) -> String {
    urlencoding::encode(s).replace("%20", "+")
}

fn query_unescape(s: &str) -> Option<String> {
    let bytes = s.as_bytes();
    for (i, b) in bytes.iter().enumerate() {
        if *b == b'%'
            && !(bytes.get(i + 1).is_some_and(u8::is_ascii_hexdigit)
                && bytes.get(i + 2).is_some_and(u8::is_ascii_hexdigit))
        {
            return None;
        }
    }
    urlencoding::decode(&s.replace('+', " "))
        .ok()
        .map(|s| s.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_unescape_rejects_bad_escapes() {
        assert_eq!(query_unescape("50%"), None);
        assert_eq!(query_unescape("%zz"), None);
        assert_eq!(query_unescape("a+b%2B"), Some("a b+".to_string()));
    }

    #[test]
    fn test_sort_marker_survives_the_round_trip() {
        let mut values = BTreeMap::new();
        values.insert("sort(+price)".to_string(), vec![String::new()]);
        assert_eq!(query_from_values(&values), "sort(+price)");
    }
}
