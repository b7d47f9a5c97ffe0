//! Binder configuration.

use crate::request::Request;
use binder_core::Category;
use std::fmt;
use std::sync::Arc;

/// Looks a path parameter up by name.
///
/// Returns an empty string when the parameter is absent.
pub type UriParamGetter = Arc<dyn Fn(&Request, &str) -> String + Send + Sync>;

/// Binder configuration
///
/// # Examples
///
/// ```
/// use binder_http::BinderConfig;
/// use binder_core::Category;
///
/// let config = BinderConfig::builder()
/// 	.uri_param_getter(|_request, name| format!("<{name}>"))
/// 	.categories([Category::Query, Category::Uri])
/// 	.build();
///
/// assert_eq!(config.categories(), [Category::Query, Category::Uri]);
/// ```
#[derive(Clone)]
pub struct BinderConfig {
	uri_param_getter: UriParamGetter,
	categories: Vec<Category>,
}

impl Default for BinderConfig {
	fn default() -> Self {
		Self {
			uri_param_getter: Arc::new(request_path_param),
			categories: Category::ALL.to_vec(),
		}
	}
}

impl fmt::Debug for BinderConfig {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("BinderConfig")
			.field("uri_param_getter", &"<fn>")
			.field("categories", &self.categories)
			.finish()
	}
}

impl BinderConfig {
	/// Creates the default configuration: every category, path parameters
	/// read from [`Request::path_param`].
	pub fn new() -> Self {
		Self::default()
	}

	/// Creates a builder for fluent configuration
	pub fn builder() -> BinderConfigBuilder {
		BinderConfigBuilder::default()
	}

	/// Categories the binder fills.
	pub fn categories(&self) -> &[Category] {
		&self.categories
	}

	/// Resolves the path parameter `name` for `request`.
	pub fn uri_param(&self, request: &Request, name: &str) -> String {
		(self.uri_param_getter)(request, name)
	}
}

fn request_path_param(request: &Request, name: &str) -> String {
	request.path_param(name).unwrap_or_default().to_string()
}

/// Builder for BinderConfig
#[derive(Default)]
pub struct BinderConfigBuilder {
	uri_param_getter: Option<UriParamGetter>,
	categories: Option<Vec<Category>>,
}

impl BinderConfigBuilder {
	/// Set the path parameter lookup
	pub fn uri_param_getter<F>(mut self, getter: F) -> Self
	where
		F: Fn(&Request, &str) -> String + Send + Sync + 'static,
	{
		self.uri_param_getter = Some(Arc::new(getter));
		self
	}

	/// Restrict binding to the given categories
	///
	/// Duplicates are ignored. An empty set binds every category.
	pub fn categories(mut self, categories: impl IntoIterator<Item = Category>) -> Self {
		let mut selected: Vec<Category> = Vec::new();
		for category in categories {
			if !selected.contains(&category) {
				selected.push(category);
			}
		}
		self.categories = Some(selected);
		self
	}

	/// Build the configuration
	pub fn build(self) -> BinderConfig {
		let default = BinderConfig::default();
		BinderConfig {
			uri_param_getter: self.uri_param_getter.unwrap_or(default.uri_param_getter),
			categories: self
				.categories
				.filter(|categories| !categories.is_empty())
				.unwrap_or(default.categories),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_default_reads_request_path_params() {
		// Arrange
		let config = BinderConfig::new();
		let request = Request::builder()
			.uri("/users/42")
			.path_param("id", "42")
			.build()
			.unwrap();

		// Act
		let id = config.uri_param(&request, "id");
		let missing = config.uri_param(&request, "slug");

		// Assert
		assert_eq!(id, "42");
		assert_eq!(missing, "");
		assert_eq!(config.categories(), Category::ALL);
	}

	#[rstest]
	fn test_builder_overrides() {
		let config = BinderConfig::builder()
			.uri_param_getter(|request, name| format!("{}:{name}", request.uri.path()))
			.categories([Category::Header, Category::Header, Category::Form])
			.build();
		let request = Request::builder().uri("/a").build().unwrap();

		assert_eq!(config.uri_param(&request, "id"), "/a:id");
		assert_eq!(config.categories(), [Category::Header, Category::Form]);
	}

	#[rstest]
	fn test_empty_categories_mean_all() {
		let config = BinderConfig::builder().categories([]).build();

		assert_eq!(config.categories(), Category::ALL);
	}

	#[rstest]
	fn test_debug_hides_getter() {
		let rendered = format!("{:?}", BinderConfig::new());

		assert!(rendered.contains("uri_param_getter: \"<fn>\""));
	}
}
