//! Payload classification by `Content-Type`.

use http::HeaderMap;
use http::header::CONTENT_TYPE;
use std::fmt;

/// Payload kinds the binder distinguishes.
///
/// Only the media type before the first `;` is considered; parameters such
/// as `charset` are ignored.
///
/// # Examples
///
/// ```
/// use binder_http::ContentType;
///
/// assert_eq!(ContentType::from_header("application/json; charset=utf-8"), ContentType::Json);
/// assert_eq!(ContentType::from_header("image/png"), ContentType::Unknown);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ContentType {
	#[default]
	Unknown,
	PlainText,
	Html,
	Json,
	Xml,
	Form,
	EventStream,
}

impl ContentType {
	/// Classifies a raw `Content-Type` header value.
	pub fn from_header(value: &str) -> Self {
		let media_type = value.split(';').next().unwrap_or_default().trim();
		match media_type {
			"text/plain" => Self::PlainText,
			"text/html" | "application/xhtml+xml" => Self::Html,
			"application/json" | "text/javascript" => Self::Json,
			"text/xml" | "application/xml" => Self::Xml,
			"application/x-www-form-urlencoded" => Self::Form,
			"text/event-stream" => Self::EventStream,
			_ => Self::Unknown,
		}
	}

	/// Classifies the first `Content-Type` header of `headers`.
	///
	/// A missing or non-UTF-8 header is [`ContentType::Unknown`].
	pub fn from_headers(headers: &HeaderMap) -> Self {
		headers
			.get(CONTENT_TYPE)
			.and_then(|value| value.to_str().ok())
			.map(Self::from_header)
			.unwrap_or_default()
	}

	/// Short name used in logs and error messages.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Unknown => "unknown",
			Self::PlainText => "plain text",
			Self::Html => "html",
			Self::Json => "json",
			Self::Xml => "xml",
			Self::Form => "form",
			Self::EventStream => "event stream",
		}
	}

	/// Whether the binder decodes bodies of this kind.
	pub const fn has_body_decoder(self) -> bool {
		matches!(self, Self::Json | Self::Xml | Self::Form)
	}
}

impl fmt::Display for ContentType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.pad(self.as_str())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use http::HeaderValue;
	use rstest::rstest;

	#[rstest]
	#[case("text/plain", ContentType::PlainText)]
	#[case("text/html", ContentType::Html)]
	#[case("application/xhtml+xml", ContentType::Html)]
	#[case("application/json", ContentType::Json)]
	#[case("text/javascript", ContentType::Json)]
	#[case("text/xml", ContentType::Xml)]
	#[case("application/xml", ContentType::Xml)]
	#[case("application/x-www-form-urlencoded", ContentType::Form)]
	#[case("text/event-stream", ContentType::EventStream)]
	#[case("multipart/form-data; boundary=x", ContentType::Unknown)]
	#[case("", ContentType::Unknown)]
	fn test_media_type_table(#[case] value: &str, #[case] expected: ContentType) {
		assert_eq!(ContentType::from_header(value), expected);
	}

	#[rstest]
	#[case("application/json;charset=utf-8")]
	#[case("  application/json ; charset=utf-8")]
	#[case("application/json;")]
	fn test_parameters_are_ignored(#[case] value: &str) {
		assert_eq!(ContentType::from_header(value), ContentType::Json);
	}

	#[rstest]
	fn test_match_is_case_sensitive() {
		assert_eq!(ContentType::from_header("Application/JSON"), ContentType::Unknown);
	}

	#[rstest]
	fn test_from_headers() {
		// Arrange
		let mut headers = HeaderMap::new();
		assert_eq!(ContentType::from_headers(&headers), ContentType::Unknown);

		// Act
		headers.insert(CONTENT_TYPE, HeaderValue::from_static("text/xml; charset=utf-8"));

		// Assert
		assert_eq!(ContentType::from_headers(&headers), ContentType::Xml);
	}

	#[rstest]
	fn test_body_decoders() {
		assert!(ContentType::Json.has_body_decoder());
		assert!(ContentType::Form.has_body_decoder());
		assert!(!ContentType::EventStream.has_body_decoder());
		assert_eq!(ContentType::EventStream.to_string(), "event stream");
	}
}
