//! Binder error types.
//!
//! Structural problems with the destination abort a bind at once
//! ([`BindError::InvalidTarget`]). Problems with the request input are
//! collected across every source and reported together
//! ([`BindError::Input`]).

use crate::content_type::ContentType;
use std::fmt;
use thiserror::Error;

/// Boxed error of an external body decoder.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// One failure caused by request input.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum InputError {
	/// The body could not be decoded into the destination.
	#[error("decode {content_type} body: {source}")]
	Body {
		content_type: ContentType,
		#[source]
		source: BoxError,
	},

	/// A field rejected the values supplied for it.
	#[error(transparent)]
	Field(#[from] binder_core::Error),
}

impl InputError {
	/// Wraps a body decoder error.
	pub fn body(content_type: ContentType, source: impl Into<BoxError>) -> Self {
		Self::Body {
			content_type,
			source: source.into(),
		}
	}
}

/// Every input failure of one bind, in the order they were found.
///
/// # Examples
///
/// ```
/// use binder_http::{ContentType, InputError, JoinedError};
///
/// let joined = JoinedError::join([
/// 	Ok(()),
/// 	Err(InputError::body(ContentType::Json, "unexpected end of input")),
/// 	Err(InputError::body(ContentType::Xml, "unclosed tag")),
/// ])
/// .unwrap_err();
///
/// assert_eq!(joined.len(), 2);
/// assert_eq!(
/// 	joined.to_string(),
/// 	"decode json body: unexpected end of input\ndecode xml body: unclosed tag"
/// );
/// ```
#[derive(Debug, Default, Error)]
#[error("{}", display_joined(.errors))]
pub struct JoinedError {
	errors: Vec<InputError>,
}

fn display_joined(errors: &[InputError]) -> String {
	errors
		.iter()
		.map(ToString::to_string)
		.collect::<Vec<_>>()
		.join("\n")
}

impl JoinedError {
	/// Combines branch results.
	///
	/// Every result is consumed. Nested joins are flattened, so the outcome
	/// is `Ok(())` exactly when no branch carried an error.
	pub fn join<I, E>(results: I) -> Result<(), JoinedError>
	where
		I: IntoIterator<Item = Result<(), E>>,
		E: Into<JoinedError>,
	{
		let mut joined = JoinedError::default();
		for result in results {
			if let Err(err) = result {
				joined.errors.append(&mut err.into().errors);
			}
		}

		if joined.errors.is_empty() {
			Ok(())
		} else {
			Err(joined)
		}
	}

	/// Renders every message on one line, separated by `"; "`.
	pub fn one_line(&self) -> impl fmt::Display + '_ {
		struct OneLine<'a>(&'a [InputError]);

		impl fmt::Display for OneLine<'_> {
			fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
				for (i, err) in self.0.iter().enumerate() {
					if i > 0 {
						f.write_str("; ")?;
					}
					write!(f, "{err}")?;
				}
				Ok(())
			}
		}

		OneLine(&self.errors)
	}

	pub fn errors(&self) -> &[InputError] {
		&self.errors
	}

	pub fn len(&self) -> usize {
		self.errors.len()
	}

	pub fn is_empty(&self) -> bool {
		self.errors.is_empty()
	}

	pub fn iter(&self) -> std::slice::Iter<'_, InputError> {
		self.errors.iter()
	}

	pub fn into_errors(self) -> Vec<InputError> {
		self.errors
	}
}

impl From<InputError> for JoinedError {
	fn from(err: InputError) -> Self {
		Self { errors: vec![err] }
	}
}

impl From<binder_core::Error> for JoinedError {
	fn from(err: binder_core::Error) -> Self {
		InputError::Field(err).into()
	}
}

impl IntoIterator for JoinedError {
	type Item = InputError;
	type IntoIter = std::vec::IntoIter<InputError>;

	fn into_iter(self) -> Self::IntoIter {
		self.errors.into_iter()
	}
}

impl<'a> IntoIterator for &'a JoinedError {
	type Item = &'a InputError;
	type IntoIter = std::slice::Iter<'a, InputError>;

	fn into_iter(self) -> Self::IntoIter {
		self.errors.iter()
	}
}

/// Error returned by [`Binder::bind_input`](crate::Binder::bind_input).
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BindError {
	/// The destination type cannot be bound. Nothing was read or written.
	#[error("input binder: {0}")]
	InvalidTarget(#[source] binder_core::Error),

	/// One or more input failures.
	#[error("input binder: {0}")]
	Input(#[from] JoinedError),
}

impl BindError {
	/// Input failures, empty for [`BindError::InvalidTarget`].
	pub fn input_errors(&self) -> &[InputError] {
		match self {
			Self::InvalidTarget(_) => &[],
			Self::Input(joined) => joined.errors(),
		}
	}
}

/// Error building a [`Request`](crate::Request).
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RequestError {
	#[error("invalid uri: {0}")]
	InvalidUri(#[from] http::uri::InvalidUri),

	#[error("invalid header name: {0}")]
	InvalidHeaderName(#[from] http::header::InvalidHeaderName),

	#[error("invalid header value: {0}")]
	InvalidHeaderValue(#[from] http::header::InvalidHeaderValue),
}

#[cfg(test)]
mod tests {
	use super::*;
	use binder_core::Category;
	use rstest::rstest;

	fn conversion(name: &str) -> binder_core::Error {
		binder_core::Error::Conversion {
			category: Category::Query,
			name: name.to_string(),
			source: "bad".into(),
		}
	}

	#[rstest]
	fn test_join_all_ok() {
		let result = JoinedError::join([Ok::<(), InputError>(()), Ok(())]);

		assert!(result.is_ok());
	}

	#[rstest]
	fn test_join_flattens_nested_joins() {
		// Arrange
		let inner = JoinedError::join([Err(conversion("a")), Err(conversion("b"))]);
		let other = JoinedError::join([Ok::<(), InputError>(())]);
		let last = Err(JoinedError::from(conversion("c")));

		// Act
		let joined = JoinedError::join([inner, other, last]).unwrap_err();

		// Assert
		assert_eq!(joined.len(), 3);
		assert_eq!(
			joined.to_string(),
			"query parameter \"a\": bad\nquery parameter \"b\": bad\nquery parameter \"c\": bad"
		);
		assert_eq!(
			joined.one_line().to_string(),
			"query parameter \"a\": bad; query parameter \"b\": bad; query parameter \"c\": bad"
		);
	}

	#[rstest]
	fn test_body_error_keeps_source() {
		let err = InputError::body(ContentType::Json, "EOF");

		assert_eq!(err.to_string(), "decode json body: EOF");
		assert_eq!(
			std::error::Error::source(&err).map(ToString::to_string),
			Some("EOF".to_string())
		);
	}

	#[rstest]
	fn test_bind_error_prefix() {
		// Arrange
		let joined = JoinedError::from(conversion("page"));

		// Act
		let err = BindError::from(joined);

		// Assert
		assert_eq!(err.to_string(), "input binder: query parameter \"page\": bad");
		assert_eq!(err.input_errors().len(), 1);
	}
}
