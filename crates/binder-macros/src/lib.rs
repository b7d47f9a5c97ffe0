//! Procedural macros for binder-core.
//!
//! See [`macro@Reflect`].

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

mod crate_paths;
mod derive_reflect;

/// Derives `binder_core::Reflect` (and `binder_core::Record` for structs).
///
/// ## Records
///
/// A struct with named fields becomes a record. Each field may declare
/// where its values come from with `#[bind(...)]`, one key per category:
///
/// ```rust,ignore
/// #[derive(Reflect, Default)]
/// pub struct UpdateUser {
/// 	#[bind(uri = "id")]
/// 	pub id: String,
/// 	#[bind(form = "name", query = "name")]
/// 	pub name: Option<String>,
/// 	#[bind(header = "If-Match")]
/// 	pub etag: Option<String>,
/// 	// Walked recursively; its own annotations are honoured.
/// 	pub paging: Paging,
/// 	#[reflect(skip)]
/// 	pub cache: HashMap<String, String>,
/// }
/// ```
///
/// Accepted keys are `query`, `form`, `header` and `uri`. Every field that is
/// not skipped must itself implement `Reflect`. Only `pub` fields are written
/// to; private fields are still walked when they are records.
///
/// ## Leaf types
///
/// `#[reflect(unmarshal)]` marks a type implementing
/// `UnmarshalStringSlice` as a bindable value, and `#[reflect(opaque)]` marks
/// a type the binder never looks into. Both work for any struct or enum.
///
/// ```rust,ignore
/// #[derive(Reflect, Default)]
/// #[reflect(unmarshal)]
/// pub struct Csv(Vec<String>);
///
/// impl UnmarshalStringSlice for Csv { /* ... */ }
/// ```
#[proc_macro_derive(Reflect, attributes(bind, reflect))]
pub fn derive_reflect(input: TokenStream) -> TokenStream {
	let input = parse_macro_input!(input as DeriveInput);
	derive_reflect::derive_reflect_impl(input)
		.unwrap_or_else(|e| e.to_compile_error())
		.into()
}
