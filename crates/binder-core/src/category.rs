//! Source categories a record field can bind from.

use std::fmt;

/// Where a group of request values originates.
///
/// The set is closed: every annotation key understood by
/// `#[derive(Reflect)]` maps to exactly one variant.
///
/// # Examples
///
/// ```
/// use binder_core::Category;
///
/// assert_eq!(Category::Header.as_str(), "header");
/// assert_eq!(Category::ALL.len(), 4);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
	/// Query-string parameters.
	Query,
	/// Form fields parsed from an urlencoded body.
	Form,
	/// Request headers.
	Header,
	/// Path parameters extracted by a router.
	Uri,
}

impl Category {
	/// Every category, in binding order.
	pub const ALL: [Category; 4] = [
		Category::Query,
		Category::Form,
		Category::Header,
		Category::Uri,
	];

	/// Annotation key for this category.
	pub const fn as_str(self) -> &'static str {
		match self {
			Category::Query => "query",
			Category::Form => "form",
			Category::Header => "header",
			Category::Uri => "uri",
		}
	}

	/// Looks a category up by its annotation key.
	///
	/// # Examples
	///
	/// ```
	/// use binder_core::Category;
	///
	/// assert_eq!(Category::from_key("uri"), Some(Category::Uri));
	/// assert_eq!(Category::from_key("json"), None);
	/// ```
	pub fn from_key(key: &str) -> Option<Self> {
		Self::ALL.into_iter().find(|category| category.as_str() == key)
	}
}

impl fmt::Display for Category {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.pad(self.as_str())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case(Category::Query, "query")]
	#[case(Category::Form, "form")]
	#[case(Category::Header, "header")]
	#[case(Category::Uri, "uri")]
	fn test_key_round_trips(#[case] category: Category, #[case] key: &str) {
		assert_eq!(category.as_str(), key);
		assert_eq!(category.to_string(), key);
		assert_eq!(Category::from_key(key), Some(category));
	}

	#[rstest]
	fn test_unknown_key_is_rejected() {
		assert_eq!(Category::from_key("Query"), None);
		assert_eq!(Category::from_key(""), None);
	}
}
