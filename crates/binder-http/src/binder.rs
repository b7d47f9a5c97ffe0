//! Request-to-record binding.

use crate::config::BinderConfig;
use crate::content_type::ContentType;
use crate::error::{BindError, BoxError, InputError, JoinedError};
use crate::header::canonical_header_key;
use crate::merge::MergeDeserializer;
use crate::request::{Request, Values};
use binder_core::{Accessor, Category, Reflect};
use http::{HeaderMap, Method};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Binds request input into destination records.
///
/// A binder holds configuration only and can be shared freely between
/// threads.
///
/// # Examples
///
/// ```
/// use binder_http::{Binder, Request};
/// use binder_core::Reflect;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Reflect, Serialize, Deserialize, Default)]
/// struct GetUser {
/// 	#[bind(uri = "id")]
/// 	pub id: String,
/// 	#[bind(query = "fields")]
/// 	pub fields: Vec<String>,
/// }
///
/// let mut request = Request::builder()
/// 	.uri("/users/7?fields=name&fields=email")
/// 	.path_param("id", "7")
/// 	.build()
/// 	.unwrap();
///
/// let mut input = GetUser::default();
/// Binder::default().bind_input(&mut request, &mut input).unwrap();
///
/// assert_eq!(input.id, "7");
/// assert_eq!(input.fields, ["name", "email"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Binder {
	config: BinderConfig,
}

impl Binder {
	/// Creates a binder with the given configuration.
	pub fn new(config: BinderConfig) -> Self {
		Self { config }
	}

	/// The configuration this binder was built with.
	pub fn config(&self) -> &BinderConfig {
		&self.config
	}

	/// Fills `target` from `request`.
	///
	/// The request body is consumed whatever the outcome. A destination that
	/// cannot be bound fails with [`BindError::InvalidTarget`] before any input
	/// is read. Otherwise the body is decoded according to its content type
	/// (JSON and XML are decoded into `target`, keeping the fields the body
	/// leaves out; urlencoded forms feed the form category), then query, form,
	/// header and path values are applied field by field. Every failure from
	/// those steps is returned together in [`BindError::Input`].
	pub fn bind_input<T>(&self, request: &mut Request, target: &mut T) -> Result<(), BindError>
	where
		T: Reflect + Serialize + DeserializeOwned,
	{
		self.bind(request, target, |content_type, body, target| {
			let decoded = match content_type {
				ContentType::Json => decode_json(body, target),
				ContentType::Xml => decode_xml(body, target),
				_ => Ok(()),
			};
			decoded.map_err(|source| InputError::body(content_type, source))
		})
	}

	/// Fills `target` like [`Binder::bind_input`], without the serde
	/// requirement.
	///
	/// JSON and XML bodies are consumed but not decoded; urlencoded forms are
	/// still parsed into the form category.
	pub fn bind_fields<T: Reflect>(&self, request: &mut Request, target: &mut T) -> Result<(), BindError> {
		self.bind(request, target, |content_type, body, _target| {
			tracing::debug!(%content_type, body_len = body.len(), "body left undecoded");
			Ok(())
		})
	}

	fn bind<T, F>(&self, request: &mut Request, target: &mut T, decode: F) -> Result<(), BindError>
	where
		T: Reflect,
		F: FnOnce(ContentType, &[u8], &mut T) -> Result<(), InputError>,
	{
		let body = request.take_body().unwrap_or_default();
		let categories = self.config.categories();

		Accessor::with_categories(target, categories).map_err(BindError::InvalidTarget)?;

		let content_type = request.content_type();
		tracing::debug!(
			%content_type,
			method = %request.method,
			body_len = body.len(),
			"binding request input"
		);
		let body_result = match content_type {
			ContentType::Form => {
				parse_form_body(request, &body);
				Ok(())
			}
			content_type if content_type.has_body_decoder() => {
				decode(content_type, &body[..], &mut *target)
			}
			_ => {
				tracing::trace!(%content_type, "no body decoder");
				Ok(())
			}
		};

		let mut accessor =
			Accessor::with_categories(target, categories).map_err(BindError::InvalidTarget)?;

		JoinedError::join([
			body_result.map_err(JoinedError::from),
			bind_values(&mut accessor, Category::Query, &request.query_values()),
			bind_values(&mut accessor, Category::Form, request.form()),
			bind_headers(&mut accessor, &request.headers),
			self.bind_uri_params(&mut accessor, request),
		])
		.map_err(|err| {
			tracing::debug!(errors = err.len(), error = %err.one_line(), "request input rejected");
			BindError::Input(err)
		})
	}

	fn bind_uri_params(&self, accessor: &mut Accessor<'_>, request: &Request) -> Result<(), JoinedError> {
		let mut names = accessor.fields(Category::Uri);
		names.sort_unstable();

		JoinedError::join(names.into_iter().map(|name| {
			let value = self.config.uri_param(request, name);
			accessor.set(Category::Uri, name, &[value])
		}))
	}
}

fn parse_form_body(request: &mut Request, body: &[u8]) {
	if [Method::POST, Method::PUT, Method::PATCH].contains(&request.method) {
		request.parse_form(body);
	} else {
		tracing::trace!(method = %request.method, "form body ignored for method");
	}
}

fn decode_json<T: Serialize + DeserializeOwned>(body: &[u8], target: &mut T) -> Result<(), BoxError> {
	let current = serde_json::to_value(&*target)?;
	let mut deserializer = serde_json::Deserializer::from_slice(body);
	let decoded = T::deserialize(MergeDeserializer::new(&mut deserializer, &current))?;
	deserializer.end()?;
	*target = decoded;
	Ok(())
}

fn decode_xml<T: Serialize + DeserializeOwned>(body: &[u8], target: &mut T) -> Result<(), BoxError> {
	let current = serde_json::to_value(&*target)?;
	let mut deserializer = quick_xml::de::Deserializer::from_reader(body);
	*target = T::deserialize(MergeDeserializer::new(&mut deserializer, &current))?;
	Ok(())
}

/// Applies a multi-map in name order.
fn bind_values(accessor: &mut Accessor<'_>, category: Category, values: &Values) -> Result<(), JoinedError> {
	let mut entries: Vec<(&String, &Vec<String>)> = values.iter().collect();
	entries.sort_unstable_by_key(|(name, _)| *name);

	JoinedError::join(
		entries
			.into_iter()
			.map(|(name, values)| accessor.set(category, name, values)),
	)
}

/// Applies every header under its canonical name, in name order.
fn bind_headers(accessor: &mut Accessor<'_>, headers: &HeaderMap) -> Result<(), JoinedError> {
	let mut entries: Vec<(String, Vec<String>)> = headers
		.keys()
		.map(|name| {
			let values = headers
				.get_all(name)
				.iter()
				.map(|value| String::from_utf8_lossy(value.as_bytes()).into_owned())
				.collect();
			(canonical_header_key(name.as_str()), values)
		})
		.collect();
	entries.sort_unstable_by(|(a, _), (b, _)| a.cmp(b));

	JoinedError::join(
		entries
			.iter()
			.map(|(name, values)| accessor.set(Category::Header, name, values)),
	)
}
