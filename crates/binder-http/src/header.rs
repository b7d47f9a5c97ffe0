//! Header name canonicalization.

/// Returns the canonical form of a header name.
///
/// The first letter and every letter following a hyphen are upper-cased,
/// the rest lower-cased. Names containing a byte that is not a valid token
/// character (a space, for instance) are returned unchanged.
///
/// # Examples
///
/// ```
/// use binder_http::canonical_header_key;
///
/// assert_eq!(canonical_header_key("content-type"), "Content-Type");
/// assert_eq!(canonical_header_key("x-REQUEST-id"), "X-Request-Id");
/// ```
pub fn canonical_header_key(name: &str) -> String {
	if !name.bytes().all(is_token_byte) {
		return name.to_string();
	}

	let mut upper = true;
	name.chars()
		.map(|c| {
			let mapped = if upper {
				c.to_ascii_uppercase()
			} else {
				c.to_ascii_lowercase()
			};
			upper = c == '-';
			mapped
		})
		.collect()
}

fn is_token_byte(b: u8) -> bool {
	b.is_ascii_alphanumeric() || b"!#$%&'*+-.^_`|~".contains(&b)
}
