//! # http-binder
//!
//! Annotation-driven binding of HTTP request input into typed records.
//!
//! This crate re-exports the workspace members:
//!
//! - [`binder_core`]: the reflection layer, the `Reflect` derive and the
//!   field [`Accessor`]
//! - [`binder_http`]: the [`Request`] model and the [`Binder`]
//!
//! ## Quick Example
//!
//! ```
//! use http_binder::{Binder, Parsed, Reflect, Request};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Reflect, Serialize, Deserialize, Default)]
//! struct Search {
//! 	#[bind(query = "q")]
//! 	pub term: String,
//! 	#[bind(query = "limit")]
//! 	pub limit: Option<Parsed<usize>>,
//! 	#[bind(header = "User-Agent")]
//! 	pub agent: String,
//! }
//!
//! let mut request = Request::builder()
//! 	.uri("/search?q=rust&limit=20")
//! 	.header("user-agent", "curl/8.0")
//! 	.build()
//! 	.unwrap();
//!
//! let mut search = Search::default();
//! Binder::default().bind_input(&mut request, &mut search).unwrap();
//!
//! assert_eq!(search.term, "rust");
//! assert_eq!(search.limit.map(Parsed::into_inner), Some(20));
//! assert_eq!(search.agent, "curl/8.0");
//! ```

pub use binder_core;
pub use binder_http;

pub use binder_core::{
	Accessor, Category, Error, FieldInfo, InvalidTarget, Parsed, Record, Reflect, ReflectKind,
	ReflectMut, ReflectOption, UnmarshalError, UnmarshalStringSlice,
};
pub use binder_http::{
	BindError, Binder, BinderConfig, BinderConfigBuilder, ContentType, InputError, JoinedError,
	Request, RequestBuilder, RequestError, UriParamGetter, canonical_header_key,
};
