//! Inventory response parsing.
//!
//! The management API answers with either a JSON document or an XML document
//! depending on endpoint version. JSON is tried first; on a JSON parse
//! failure the body is re-read as XML. Domain names from either format are
//! folded into a `BTreeSet`, which both deduplicates API entries and gives
//! the probe loop a stable ordering.

use std::collections::BTreeSet;

use quick_xml::Reader;
use quick_xml::events::Event;

use crate::error::InventoryError;

/// The field/element name carrying a domain in both response formats.
const DOMAIN_FIELD: &str = "domain-name";

/// Parse an inventory response body into a deduplicated set of domain names.
///
/// A well-formed body that simply contains no domains yields an empty set;
/// callers treat that the same as a fetch failure.
///
/// # Errors
///
/// Returns [`InventoryError::UnparsableResponse`] if the body is neither
/// parsable JSON nor parsable XML.
///
/// # Examples
///
/// ```
/// use cdnwatch_inventory::parse_domains;
///
/// let body = r#"[{"domain-name": "a.example.com"}, {"domain-name": "a.example.com"}]"#;
/// let domains = parse_domains(body).unwrap();
/// assert_eq!(domains.len(), 1);
/// ```
pub fn parse_domains(body: &str) -> Result<BTreeSet<String>, InventoryError> {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        return Ok(domains_from_json(&value));
    }
    domains_from_xml(body)
}

/// Collect domain names from a JSON response.
///
/// An array yields every element's `domain-name` string field; a lone object
/// yields its own `domain-name` field. Anything else yields nothing.
fn domains_from_json(value: &serde_json::Value) -> BTreeSet<String> {
    let mut domains = BTreeSet::new();

    match value {
        serde_json::Value::Array(items) => {
            for item in items {
                if let Some(name) = item.get(DOMAIN_FIELD).and_then(|v| v.as_str()) {
                    domains.insert(name.to_owned());
                }
            }
        }
        serde_json::Value::Object(map) => {
            if let Some(name) = map.get(DOMAIN_FIELD).and_then(|v| v.as_str()) {
                domains.insert(name.to_owned());
            }
        }
        _ => {}
    }

    domains
}

/// Collect the text of every `<domain-name>` element in an XML response.
fn domains_from_xml(body: &str) -> Result<BTreeSet<String>, InventoryError> {
    let mut reader = Reader::from_str(body);
    reader.config_mut().trim_text(true);

    let mut domains = BTreeSet::new();
    let mut in_domain_name = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) if e.name().as_ref() == DOMAIN_FIELD.as_bytes() => {
                in_domain_name = true;
            }
            Ok(Event::Text(t)) if in_domain_name => {
                let text = t
                    .unescape()
                    .map_err(|_| InventoryError::UnparsableResponse)?;
                if !text.is_empty() {
                    domains.insert(text.into_owned());
                }
            }
            Ok(Event::End(e)) if e.name().as_ref() == DOMAIN_FIELD.as_bytes() => {
                in_domain_name = false;
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(_) => return Err(InventoryError::UnparsableResponse),
        }
    }

    Ok(domains)
}
