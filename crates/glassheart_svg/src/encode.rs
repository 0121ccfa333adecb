//! URI component encoding for inline SVG data URIs

const HEX_DIGITS: &[u8; 16] = b"0123456789ABCDEF";

/// Prefix for inline SVG documents embedded as data URIs
pub const SVG_DATA_URI_PREFIX: &str = "data:image/svg+xml;utf8,";

/// Percent-encode a string the way browsers expect inside `data:` URIs
///
/// Leaves `A-Z a-z 0-9 - _ . ! ~ * ' ( )` untouched and encodes every other
/// UTF-8 byte as `%XX` with uppercase hex digits.
pub fn encode_uri_component(input: &str) -> String {
    let mut output = String::with_capacity(input.len() * 3 / 2);

    for byte in input.bytes() {
        if is_unreserved(byte) {
            output.push(byte as char);
        } else {
            output.push('%');
            output.push(HEX_DIGITS[usize::from(byte >> 4)] as char);
            output.push(HEX_DIGITS[usize::from(byte & 0x0F)] as char);
        }
    }

    output
}

/// Wrap a raw SVG document into a `data:image/svg+xml` URI
pub fn svg_data_uri(svg: &str) -> String {
    let mut uri = String::with_capacity(SVG_DATA_URI_PREFIX.len() + svg.len() * 2);
    uri.push_str(SVG_DATA_URI_PREFIX);
    uri.push_str(&encode_uri_component(svg));
    uri
}

fn is_unreserved(byte: u8) -> bool {
    byte.is_ascii_alphanumeric()
        || matches!(
            byte,
            b'-' | b'_' | b'.' | b'!' | b'~' | b'*' | b'\'' | b'(' | b')'
        )
}
