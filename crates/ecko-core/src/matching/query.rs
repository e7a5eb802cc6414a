//! Query string parsing and canonical query fingerprints.

use std::collections::{BTreeMap, HashMap};

/// Parse query string into HashMap with URL decoding.
pub fn parse_query_string(query_str: &str) -> HashMap<String, String> {
    let mut result = HashMap::new();

    if query_str.is_empty() {
        return result;
    }

    for pair in query_str.split('&') {
        if pair.is_empty() {
            continue;
        }

        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        let key = decode(key);
        let value = decode(value);

        // Repeated keys collapse into one comma-separated value
        if let Some(existing) = result.get_mut(&key) {
            existing.push(',');
            existing.push_str(&value);
        } else {
            result.insert(key, value);
        }
    }

    result
}

fn decode(s: &str) -> String {
    let s = s.replace('+', " ");
    urlencoding::decode(&s)
        .map(|d| d.into_owned())
        .unwrap_or_else(|_| s.clone())
}

/// Order-independent fingerprint of a query parameter set.
///
/// Keys are sorted and every pair is re-encoded, so `a=1&b=2` and `b=2&a=1`
/// produce the same fingerprint. An empty set has no fingerprint.
pub fn query_fingerprint(params: &HashMap<String, String>) -> Option<String> {
    if params.is_empty() {
        return None;
    }

    let sorted: BTreeMap<&str, &str> = params
        .iter()
        .map(|(k, v)| (k.as_str(), v.as_str()))
        .collect();

    let fingerprint = sorted
        .into_iter()
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&");

    Some(fingerprint)
}
