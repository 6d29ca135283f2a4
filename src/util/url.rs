use crate::provider::error::Error;

use url::Url;

/// Merges `params` into the query of `base`, optionally replacing the fragment.
///
/// Parameters already on `base` are kept in place unless `params` names the same key,
/// in which case the new value replaces every earlier occurrence.
pub fn build_url(
    base: &str,
    params: impl serde::Serialize,
    fragment: Option<&str>,
) -> Result<String, Error> {
    let mut url = Url::parse(base)?;

    let mut query: Vec<(String, String)> = url.query_pairs().into_owned().collect();
    let encoded = serde_urlencoded::to_string(params)?;

    for (key, value) in form_urlencoded::parse(encoded.as_bytes()).into_owned() {
        match query.iter().position(|(k, _)| *k == key) {
            Some(i) => {
                query[i].1 = value;
                let mut seen = false;
                query.retain(|(k, _)| {
                    if *k != key {
                        return true;
                    }
                    let keep = !seen;
                    seen = true;
                    keep
                });
            }
            None => query.push((key, value)),
        }
    }

    if query.is_empty() {
        url.set_query(None);
    } else {
        url.query_pairs_mut().clear().extend_pairs(&query);
    }

    if let Some(fragment) = fragment {
        url.set_fragment(Some(fragment));
    }

    Ok(url.into())
}
