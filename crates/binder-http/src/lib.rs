//! # binder-http
//!
//! Binds the input of an HTTP request into a typed record.
//!
//! ## Overview
//!
//! [`Binder::bind_input`] reads every source a request carries and writes
//! it into the fields of a record deriving [`binder_core::Reflect`]:
//!
//! - the body, decoded according to its [`ContentType`] (JSON, XML or an
//!   urlencoded form)
//! - query-string parameters (`#[bind(query = "..")]`)
//! - form fields (`#[bind(form = "..")]`)
//! - headers, matched by canonical name (`#[bind(header = "..")]`)
//! - path parameters, pulled through [`BinderConfig`]'s lookup
//!   (`#[bind(uri = "..")]`)
//!
//! ```
//! use binder_core::{Parsed, Reflect};
//! use binder_http::{Binder, Request};
//! use http::Method;
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Reflect, Serialize, Deserialize, Default)]
//! struct CreateComment {
//! 	#[bind(uri = "post")]
//! 	pub post: String,
//! 	#[bind(header = "X-Request-Id")]
//! 	pub request_id: Option<String>,
//! 	pub body: String,
//! 	#[bind(query = "notify")]
//! 	pub notify: Parsed<bool>,
//! }
//!
//! let mut request = Request::builder()
//! 	.method(Method::POST)
//! 	.uri("/posts/12/comments?notify=true")
//! 	.header("content-type", "application/json")
//! 	.header("x-request-id", "abc")
//! 	.path_param("post", "12")
//! 	.body(r#"{"body":"Nice!"}"#)
//! 	.build()
//! 	.unwrap();
//!
//! let mut input = CreateComment::default();
//! Binder::default().bind_input(&mut request, &mut input).unwrap();
//!
//! assert_eq!(input.post, "12");
//! assert_eq!(input.request_id.as_deref(), Some("abc"));
//! assert_eq!(input.body, "Nice!");
//! assert!(*input.notify);
//! ```
//!
//! JSON and XML bodies are decoded into the record as it stands: fields the
//! body does not mention keep their values. This needs the record to
//! implement `Serialize` and `Deserialize`. Records without serde support
//! are bound with [`Binder::bind_fields`], which reads every source but
//! those bodies.

pub mod binder;
pub mod config;
pub mod content_type;
pub mod error;
pub mod header;
mod merge;
pub mod request;

pub use binder::Binder;
pub use config::{BinderConfig, BinderConfigBuilder, UriParamGetter};
pub use content_type::ContentType;
pub use error::{BindError, BoxError, InputError, JoinedError, RequestError};
pub use header::canonical_header_key;
pub use request::{Request, RequestBuilder, Values, parse_values};
