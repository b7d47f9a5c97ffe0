//! Accessor error types.

use crate::category::Category;
use crate::reflect::ReflectKind;
use crate::unmarshal::UnmarshalError;
use thiserror::Error;

/// Result type for accessor operations.
pub type Result<T> = std::result::Result<T, Error>;

/// A destination whose declaration cannot be bound.
///
/// These always point at a programming mistake in the destination type,
/// never at bad request input.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum InvalidTarget {
	/// The destination itself is not a record.
	#[error("target must be a record, found {kind} `{type_name}`")]
	NotARecord {
		/// Type of the destination.
		type_name: &'static str,
		/// View the destination reported instead.
		kind: ReflectKind,
	},

	/// An annotated field has a type no setter can write.
	#[error(
		"field {field:?}: `{type_name}` must be String, Vec<String>, an Option of either, or implement UnmarshalStringSlice"
	)]
	UnsupportedField {
		/// Rust name of the field.
		field: &'static str,
		/// Type of the field, or of the `Option` payload.
		type_name: &'static str,
	},
}

/// Accessor errors.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
	/// The destination declaration is not bindable.
	#[error("invalid target: {0}")]
	InvalidTarget(#[from] InvalidTarget),

	/// A setter rejected the supplied values.
	#[error("{category} parameter {name:?}: {source}")]
	Conversion {
		/// Category the values came from.
		category: Category,
		/// Source name the values were supplied under.
		name: String,
		/// Error reported by the setter.
		#[source]
		source: UnmarshalError,
	},
}

impl Error {
	/// Returns `true` for structural errors raised while building an accessor.
	pub fn is_invalid_target(&self) -> bool {
		matches!(self, Self::InvalidTarget(_))
	}

	/// Returns `true` for errors raised by a setter.
	pub fn is_conversion(&self) -> bool {
		matches!(self, Self::Conversion { .. })
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_unsupported_field_names_the_field() {
		let err = Error::from(InvalidTarget::UnsupportedField {
			field: "age",
			type_name: "i64",
		});

		assert!(err.is_invalid_target());
		assert!(err.to_string().starts_with("invalid target: field \"age\": `i64`"));
	}

	#[rstest]
	fn test_conversion_keeps_source() {
		// Arrange
		let source: UnmarshalError = "bad digit".into();

		// Act
		let err = Error::Conversion {
			category: Category::Query,
			name: "page".to_string(),
			source,
		};

		// Assert
		assert!(err.is_conversion());
		assert_eq!(err.to_string(), "query parameter \"page\": bad digit");
		assert_eq!(
			std::error::Error::source(&err).map(|s| s.to_string()),
			Some("bad digit".to_string())
		);
	}
}
