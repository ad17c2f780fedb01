//! Character reference decoding for attribute values.

/// Decode character references in an attribute value.
///
/// Uses the full HTML5 named reference table plus decimal and hex numeric
/// references. Unknown references are kept as written.
pub fn decode_attr_value(value: &str) -> String {
    if !value.contains('&') {
        return value.to_string();
    }
    html_escape::decode_html_entities(value).into_owned()
}
