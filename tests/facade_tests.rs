//! Binding through the `http_binder` facade, from a plain `http::Request`.

use bytes::Bytes;
use http_binder::{BindError, Binder, BinderConfig, Category, Parsed, Reflect, Request};
use rstest::rstest;
use serde::{Deserialize, Serialize};

#[derive(Reflect, Serialize, Deserialize, Default, Debug)]
struct Address {
	#[bind(header = "X-Region")]
	pub region: String,
	pub city: String,
}

#[derive(Reflect, Serialize, Deserialize, Default, Debug)]
struct UpdateProfile {
	#[bind(uri = "user")]
	pub user: Parsed<u64>,
	#[bind(query = "dry_run")]
	pub dry_run: Option<Parsed<bool>>,
	pub name: String,
	pub address: Address,
}

fn http_request(body: &'static str) -> http::Request<Bytes> {
	http::Request::builder()
		.method(http::Method::PATCH)
		.uri("/users/31/profile?dry_run=true")
		.header(http::header::CONTENT_TYPE, "application/json; charset=utf-8")
		.header("x-region", "eu-north")
		.body(Bytes::from_static(body.as_bytes()))
		.unwrap()
}

#[rstest]
fn test_bind_converted_http_request() {
	// Arrange
	let mut request = Request::from(http_request(
		r#"{"name": "Aino", "address": {"city": "Oulu"}}"#,
	));
	request.set_path_param("user", "31");
	let mut profile = UpdateProfile::default();

	// Act
	Binder::default().bind_input(&mut request, &mut profile).unwrap();

	// Assert
	assert_eq!(*profile.user, 31);
	assert_eq!(profile.dry_run.map(Parsed::into_inner), Some(true));
	assert_eq!(profile.name, "Aino");
	assert_eq!(profile.address.city, "Oulu");
	assert_eq!(profile.address.region, "eu-north");
}

#[rstest]
fn test_path_params_from_router_lookup() {
	// Arrange
	let binder = Binder::new(
		BinderConfig::builder()
			.uri_param_getter(|request, name| {
				let segments: Vec<&str> = request.uri.path().split('/').collect();
				match name {
					"user" => segments.get(2).copied().unwrap_or_default().to_string(),
					_ => String::new(),
				}
			})
			.categories([Category::Uri])
			.build(),
	);
	let mut request = Request::from(http_request(r#"{"name": "Aino", "address": {"city": "Oulu"}}"#));
	let mut profile = UpdateProfile::default();

	// Act
	binder.bind_input(&mut request, &mut profile).unwrap();

	// Assert
	assert_eq!(*profile.user, 31);
	assert_eq!(profile.dry_run, None);
	assert!(profile.address.region.is_empty());
}

#[rstest]
fn test_malformed_body_is_reported_with_field_errors() {
	// Arrange
	let mut request = Request::from(http_request(r#"{"name": 5}"#));
	let mut profile = UpdateProfile::default();

	// Act
	let err = Binder::default()
		.bind_input(&mut request, &mut profile)
		.unwrap_err();

	// Assert
	assert!(matches!(err, BindError::Input(_)));
	let errors = err.input_errors();
	assert_eq!(errors.len(), 2, "{err}");
	assert!(errors[0].to_string().starts_with("decode json body: "));
	assert_eq!(
		errors[1].to_string(),
		"uri parameter \"user\": cannot parse integer from empty string"
	);
	assert_eq!(profile.address.region, "eu-north");
}
