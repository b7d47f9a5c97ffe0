//! Inbound request as seen by the binder.

use crate::content_type::ContentType;
use crate::error::RequestError;
use bytes::Bytes;
use http::header::{HeaderName, HeaderValue};
use http::{HeaderMap, Method, Uri, Version};
use std::collections::HashMap;

/// Multi-map of decoded `name=value` pairs, in arrival order per name.
pub type Values = HashMap<String, Vec<String>>;

/// Decodes an `application/x-www-form-urlencoded` byte string.
///
/// `+` decodes to a space and invalid percent escapes are kept verbatim.
///
/// # Examples
///
/// ```
/// use binder_http::parse_values;
///
/// let values = parse_values(b"tag=a&tag=b&q=hello+world");
/// assert_eq!(values["tag"], ["a", "b"]);
/// assert_eq!(values["q"], ["hello world"]);
/// ```
pub fn parse_values(input: &[u8]) -> Values {
	let mut values = Values::new();
	for (name, value) in url::form_urlencoded::parse(input) {
		values
			.entry(name.into_owned())
			.or_default()
			.push(value.into_owned());
	}
	values
}

/// An HTTP request whose body has been read into memory.
#[derive(Debug, Clone)]
pub struct Request {
	pub method: Method,
	pub uri: Uri,
	pub version: Version,
	pub headers: HeaderMap,
	/// Path parameters extracted by a router.
	pub path_params: HashMap<String, String>,
	body: Option<Bytes>,
	form: Values,
}

impl Request {
	/// Creates a builder for a `GET /` request.
	///
	/// # Examples
	///
	/// ```
	/// use binder_http::Request;
	/// use http::Method;
	///
	/// let request = Request::builder()
	/// 	.method(Method::POST)
	/// 	.uri("/users?page=2")
	/// 	.header("Content-Type", "application/json")
	/// 	.body(r#"{"name":"ann"}"#)
	/// 	.build()
	/// 	.unwrap();
	///
	/// assert_eq!(request.method, Method::POST);
	/// assert_eq!(request.query_values()["page"], ["2"]);
	/// ```
	pub fn builder() -> RequestBuilder {
		RequestBuilder::default()
	}

	/// Classifies the `Content-Type` header.
	pub fn content_type(&self) -> ContentType {
		ContentType::from_headers(&self.headers)
	}

	/// Decoded query-string parameters.
	pub fn query_values(&self) -> Values {
		self.uri
			.query()
			.map(|query| parse_values(query.as_bytes()))
			.unwrap_or_default()
	}

	/// Form fields parsed from the body, empty until [`Request::parse_form`]
	/// runs.
	pub fn form(&self) -> &Values {
		&self.form
	}

	/// Parses an urlencoded body into the form multi-map, appending to any
	/// values already present.
	pub fn parse_form(&mut self, body: &[u8]) {
		for (name, mut values) in parse_values(body) {
			self.form.entry(name).or_default().append(&mut values);
		}
	}

	/// The unread body, if any.
	pub fn body(&self) -> Option<&Bytes> {
		self.body.as_ref()
	}

	/// Moves the body out of the request. Later calls return `None`.
	pub fn take_body(&mut self) -> Option<Bytes> {
		self.body.take()
	}

	/// Looks up a path parameter.
	pub fn path_param(&self, name: &str) -> Option<&str> {
		self.path_params.get(name).map(String::as_str)
	}

	/// Set a path parameter (used by routers for path variable extraction)
	///
	/// # Examples
	///
	/// ```
	/// use binder_http::Request;
	///
	/// let mut request = Request::builder().uri("/users/123").build().unwrap();
	/// request.set_path_param("id", "123");
	/// assert_eq!(request.path_param("id"), Some("123"));
	/// ```
	pub fn set_path_param(&mut self, key: impl Into<String>, value: impl Into<String>) {
		self.path_params.insert(key.into(), value.into());
	}
}

impl From<http::Request<Bytes>> for Request {
	fn from(request: http::Request<Bytes>) -> Self {
		let (parts, body) = request.into_parts();
		Self {
			method: parts.method,
			uri: parts.uri,
			version: parts.version,
			headers: parts.headers,
			path_params: HashMap::new(),
			body: (!body.is_empty()).then_some(body),
			form: Values::new(),
		}
	}
}

/// Builder for [`Request`].
///
/// Invalid URIs and headers are reported by [`RequestBuilder::build`].
#[derive(Debug)]
pub struct RequestBuilder {
	method: Method,
	uri: String,
	version: Version,
	headers: Vec<(String, String)>,
	header_map: HeaderMap,
	path_params: HashMap<String, String>,
	body: Option<Bytes>,
}

impl Default for RequestBuilder {
	fn default() -> Self {
		Self {
			method: Method::GET,
			uri: "/".to_string(),
			version: Version::HTTP_11,
			headers: Vec::new(),
			header_map: HeaderMap::new(),
			path_params: HashMap::new(),
			body: None,
		}
	}
}

impl RequestBuilder {
	pub fn method(mut self, method: Method) -> Self {
		self.method = method;
		self
	}

	pub fn uri(mut self, uri: impl Into<String>) -> Self {
		self.uri = uri.into();
		self
	}

	pub fn version(mut self, version: Version) -> Self {
		self.version = version;
		self
	}

	/// Appends a header; repeated names keep every value.
	pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.headers.push((name.into(), value.into()));
		self
	}

	/// Appends every header of `headers`.
	pub fn headers(mut self, headers: HeaderMap) -> Self {
		let mut name = None;
		for (key, value) in headers {
			// `None` keys continue the previous name.
			if key.is_some() {
				name = key;
			}
			if let Some(name) = &name {
				self.header_map.append(name.clone(), value);
			}
		}
		self
	}

	pub fn path_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
		self.path_params.insert(key.into(), value.into());
		self
	}

	pub fn body(mut self, body: impl Into<Bytes>) -> Self {
		self.body = Some(body.into());
		self
	}

	/// Builds the request.
	pub fn build(self) -> Result<Request, RequestError> {
		let uri: Uri = self.uri.parse()?;

		let mut headers = self.header_map;
		for (name, value) in self.headers {
			let name = HeaderName::try_from(name)?;
			let value = HeaderValue::try_from(value)?;
			headers.append(name, value);
		}

		Ok(Request {
			method: self.method,
			uri,
			version: self.version,
			headers,
			path_params: self.path_params,
			body: self.body,
			form: Values::new(),
		})
	}
}
