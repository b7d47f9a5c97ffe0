//! Helper functions for dynamic crate path resolution using proc_macro_crate

use proc_macro2::TokenStream;
use quote::quote;

/// Resolves the path to the binder_core crate dynamically.
///
/// Callers depending on `binder-core` directly (possibly renamed) get
/// `::binder_core`; callers depending only on the `http-binder` facade get
/// the re-export at `::http_binder::binder_core`.
/// Returns an error if neither crate is found in Cargo.toml.
pub(crate) fn get_binder_core_crate() -> syn::Result<TokenStream> {
	use proc_macro_crate::{FoundCrate, crate_name};

	match crate_name("binder-core") {
		Ok(FoundCrate::Itself) => return Ok(quote!(::binder_core)),
		Ok(FoundCrate::Name(name)) => {
			let ident = syn::Ident::new(&name, proc_macro2::Span::call_site());
			return Ok(quote!(::#ident));
		}
		Err(_) => {}
	}

	match crate_name("http-binder") {
		Ok(FoundCrate::Itself) => Ok(quote!(::http_binder::binder_core)),
		Ok(FoundCrate::Name(name)) => {
			let ident = syn::Ident::new(&name, proc_macro2::Span::call_site());
			Ok(quote!(::#ident::binder_core))
		}
		Err(e) => Err(syn::Error::new(
			proc_macro2::Span::call_site(),
			format!(
				"failed to resolve `binder-core` crate: {}. Ensure `binder-core` or `http-binder` is listed in Cargo.toml dependencies.",
				e
			),
		)),
	}
}
