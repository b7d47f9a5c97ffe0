//! Derive macro for the Reflect trait
//!
//! Structs with named fields become records: the expansion lists every
//! non-skipped field together with its `#[bind(...)]` declarations and hands
//! out mutable references to them. Types marked `#[reflect(unmarshal)]` or
//! `#[reflect(opaque)]` become leaf values.

use crate::crate_paths::get_binder_core_crate;
use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::ext::IdentExt;
use syn::{Attribute, Data, DeriveInput, Fields, Generics, LitStr, Visibility, parse_quote};

const BIND_ATTRIBUTE_NAME: &str = "bind";
const REFLECT_ATTRIBUTE_NAME: &str = "reflect";

/// Annotation key and `Category` variant, in binding order.
static CATEGORY_KEYS: [(&str, &str); 4] = [
	("query", "Query"),
	("form", "Form"),
	("header", "Header"),
	("uri", "Uri"),
];

/// How the deriving type presents itself to the accessor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ContainerKind {
	Record,
	Unmarshal,
	Opaque,
}

impl ContainerKind {
	fn variant(self) -> syn::Ident {
		match self {
			Self::Record => format_ident!("Record"),
			Self::Unmarshal => format_ident!("Unmarshal"),
			Self::Opaque => format_ident!("Opaque"),
		}
	}
}

/// A reflected record field.
struct RecordField<'a> {
	ident: &'a syn::Ident,
	public: bool,
	/// `Category` variant and source name.
	bindings: Vec<(&'static str, LitStr)>,
}

/// Implementation of the Reflect derive macro
pub(crate) fn derive_reflect_impl(input: DeriveInput) -> syn::Result<TokenStream> {
	let core = get_binder_core_crate()?;
	expand(&input, &core)
}

fn expand(input: &DeriveInput, core: &TokenStream) -> syn::Result<TokenStream> {
	if let Some(lifetime) = input.generics.lifetimes().next() {
		return Err(syn::Error::new_spanned(
			lifetime,
			"Reflect cannot be derived for types with lifetime parameters",
		));
	}

	match parse_container_attributes(&input.attrs)? {
		ContainerKind::Record => expand_record(input, core),
		kind => expand_leaf(input, core, kind),
	}
}

/// Parse `#[reflect(unmarshal)]` / `#[reflect(opaque)]` on the type
fn parse_container_attributes(attrs: &[Attribute]) -> syn::Result<ContainerKind> {
	let mut kind = None;

	for attr in attrs {
		if attr.path().is_ident(BIND_ATTRIBUTE_NAME) {
			return Err(syn::Error::new_spanned(
				attr,
				"`#[bind(...)]` is only allowed on fields",
			));
		}
		if !attr.path().is_ident(REFLECT_ATTRIBUTE_NAME) {
			continue;
		}

		attr.parse_nested_meta(|meta| {
			let found = if meta.path.is_ident("unmarshal") {
				ContainerKind::Unmarshal
			} else if meta.path.is_ident("opaque") {
				ContainerKind::Opaque
			} else {
				return Err(meta.error("unknown reflect option, expected `unmarshal` or `opaque`"));
			};
			if kind.is_some() {
				return Err(meta.error("only one of `unmarshal` and `opaque` may be given"));
			}
			kind = Some(found);
			Ok(())
		})?;
	}

	Ok(kind.unwrap_or(ContainerKind::Record))
}

/// Parse the attributes of one record field. `None` means skipped.
fn parse_field(field: &syn::Field) -> syn::Result<Option<RecordField<'_>>> {
	let mut skip = false;
	let mut bind_attr = None;
	let mut bindings: Vec<(&'static str, LitStr)> = Vec::new();

	for attr in &field.attrs {
		if attr.path().is_ident(REFLECT_ATTRIBUTE_NAME) {
			attr.parse_nested_meta(|meta| {
				if meta.path.is_ident("skip") {
					skip = true;
					Ok(())
				} else {
					Err(meta.error("unknown reflect field option, expected `skip`"))
				}
			})?;
		} else if attr.path().is_ident(BIND_ATTRIBUTE_NAME) {
			bind_attr.get_or_insert(attr);
			attr.parse_nested_meta(|meta| {
				let key = meta
					.path
					.get_ident()
					.map(ToString::to_string)
					.unwrap_or_default();
				let Some((_, variant)) = CATEGORY_KEYS.iter().find(|(known, _)| *known == key) else {
					return Err(meta.error(format!(
						"unknown binding category `{}`, expected one of `query`, `form`, `header`, `uri`",
						key
					)));
				};
				if bindings.iter().any(|(bound, _)| bound == variant) {
					return Err(meta.error(format!("duplicate `{}` binding", key)));
				}

				let name: LitStr = meta.value()?.parse()?;
				if name.value().is_empty() {
					return Err(syn::Error::new_spanned(name, "binding name must not be empty"));
				}
				if *variant == "Header" {
					let canonical = canonical_header_name(&name.value());
					if canonical != name.value() {
						return Err(syn::Error::new_spanned(
							name,
							format!("header names are matched in canonical form, write `{}`", canonical),
						));
					}
				}
				bindings.push((*variant, name));
				Ok(())
			})?;
		}
	}

	if skip {
		if let Some(attr) = bind_attr {
			return Err(syn::Error::new_spanned(
				attr,
				"a field marked `#[reflect(skip)]` cannot be bound",
			));
		}
		return Ok(None);
	}

	let Some(ident) = field.ident.as_ref() else {
		return Err(syn::Error::new_spanned(field, "expected a named field"));
	};

	Ok(Some(RecordField {
		ident,
		public: matches!(field.vis, Visibility::Public(_)),
		bindings,
	}))
}

/// `x-request-id` becomes `X-Request-Id`; names with non-token bytes are
/// kept as written.
fn canonical_header_name(name: &str) -> String {
	let is_token = |b: u8| b.is_ascii_alphanumeric() || b"!#$%&'*+-.^_`|~".contains(&b);
	if !name.bytes().all(is_token) {
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

fn expand_record(input: &DeriveInput, core: &TokenStream) -> syn::Result<TokenStream> {
	let struct_name = &input.ident;

	let fields = match &input.data {
		Data::Struct(data) => match &data.fields {
			Fields::Named(fields) => &fields.named,
			_ => {
				return Err(syn::Error::new_spanned(
					struct_name,
					"Reflect can only be derived for structs with named fields; \
					 mark other types with `#[reflect(unmarshal)]` or `#[reflect(opaque)]`",
				));
			}
		},
		_ => {
			return Err(syn::Error::new_spanned(
				struct_name,
				"Reflect can only be derived for structs; \
				 mark other types with `#[reflect(unmarshal)]` or `#[reflect(opaque)]`",
			));
		}
	};

	let fields = fields
		.iter()
		.map(parse_field)
		.filter_map(Result::transpose)
		.collect::<syn::Result<Vec<_>>>()?;

	let field_count = fields.len();
	let field_infos = fields.iter().map(|field| {
		let name = field.ident.unraw().to_string();
		let public = field.public;
		let bindings = field.bindings.iter().map(|(variant, source)| {
			let variant = format_ident!("{}", variant);
			quote!((#core::Category::#variant, #source))
		});
		quote!(#core::FieldInfo::new(#name, #public, &[#(#bindings),*]))
	});
	let field_idents = fields.iter().map(|field| field.ident);

	let generics = bounded_generics(&input.generics, quote!(#core::Reflect));
	let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();
	let reflect_impl = expand_reflect(struct_name, core, ContainerKind::Record, &generics);

	Ok(quote! {
		#reflect_impl

		impl #impl_generics #core::Record for #struct_name #ty_generics #where_clause {
			fn field_infos(&self) -> &'static [#core::FieldInfo] {
				static FIELDS: [#core::FieldInfo; #field_count] = [#(#field_infos),*];
				&FIELDS
			}

			fn fields_mut(&mut self) -> ::std::vec::Vec<&mut dyn #core::Reflect> {
				::std::vec![#(&mut self.#field_idents as &mut dyn #core::Reflect),*]
			}
		}
	})
}

fn expand_leaf(
	input: &DeriveInput,
	core: &TokenStream,
	kind: ContainerKind,
) -> syn::Result<TokenStream> {
	let fields: Vec<&syn::Field> = match &input.data {
		Data::Struct(data) => data.fields.iter().collect(),
		Data::Enum(data) => data.variants.iter().flat_map(|v| v.fields.iter()).collect(),
		Data::Union(data) => data.fields.named.iter().collect(),
	};
	if let Some(attr) = fields
		.iter()
		.flat_map(|field| field.attrs.iter())
		.find(|attr| attr.path().is_ident(BIND_ATTRIBUTE_NAME))
	{
		return Err(syn::Error::new_spanned(
			attr,
			"`#[bind(...)]` has no effect inside an unmarshal or opaque type",
		));
	}

	let mut generics = bounded_generics(&input.generics, quote!('static));
	if kind == ContainerKind::Unmarshal {
		generics
			.make_where_clause()
			.predicates
			.push(parse_quote!(Self: #core::UnmarshalStringSlice));
	}

	Ok(expand_reflect(&input.ident, core, kind, &generics))
}

fn expand_reflect(
	type_name: &syn::Ident,
	core: &TokenStream,
	kind: ContainerKind,
	generics: &Generics,
) -> TokenStream {
	let variant = kind.variant();
	let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

	quote! {
		impl #impl_generics #core::Reflect for #type_name #ty_generics #where_clause {
			fn reflect_type_name(&self) -> &'static str {
				::core::any::type_name::<Self>()
			}

			fn reflect_kind(&self) -> #core::ReflectKind {
				#core::ReflectKind::#variant
			}

			fn reflect_mut(&mut self) -> #core::ReflectMut<'_> {
				#core::ReflectMut::#variant(self)
			}

			fn into_any(self: ::std::boxed::Box<Self>) -> ::std::boxed::Box<dyn ::core::any::Any> {
				self
			}
		}
	}
}

/// Adds `bound` to every type parameter
fn bounded_generics(generics: &Generics, bound: TokenStream) -> Generics {
	let mut generics = generics.clone();
	let params: Vec<syn::Ident> = generics.type_params().map(|param| param.ident.clone()).collect();

	let where_clause = generics.make_where_clause();
	for param in params {
		where_clause.predicates.push(parse_quote!(#param: #bound));
	}
	generics
}
