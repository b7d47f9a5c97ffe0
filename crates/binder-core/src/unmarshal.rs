//! The "parse from a string sequence" capability.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Debug, Display};
use std::ops::{Deref, DerefMut};
use std::str::FromStr;

/// Error returned by a custom setter.
///
/// Boxed so that converter authors can bubble any error up with `?`.
pub type UnmarshalError = Box<dyn std::error::Error + Send + Sync>;

/// A type that can update itself from an ordered sequence of strings.
///
/// Implementing this trait (and deriving `Reflect` with
/// `#[reflect(unmarshal)]`) lets a type be bound directly from request
/// values regardless of its representation. The accessor always prefers
/// this capability over the built-in `String`/`Vec<String>` handling.
///
/// The accessor never calls a setter with an empty slice, but setters are
/// free to handle that case on their own.
///
/// # Examples
///
/// ```
/// use binder_core::{UnmarshalError, UnmarshalStringSlice};
///
/// #[derive(Default)]
/// struct Page(u32);
///
/// impl UnmarshalStringSlice for Page {
/// 	fn unmarshal_string_slice(&mut self, values: &[String]) -> Result<(), UnmarshalError> {
/// 		if let Some(first) = values.first() {
/// 			self.0 = first.parse()?;
/// 		}
/// 		Ok(())
/// 	}
/// }
///
/// let mut page = Page::default();
/// page.unmarshal_string_slice(&["3".to_string()]).unwrap();
/// assert_eq!(page.0, 3);
/// assert!(page.unmarshal_string_slice(&["three".to_string()]).is_err());
/// ```
pub trait UnmarshalStringSlice {
	/// Replaces the current value with one parsed from `values`.
	fn unmarshal_string_slice(&mut self, values: &[String]) -> Result<(), UnmarshalError>;
}

/// Binds a field through its [`FromStr`] implementation.
///
/// The first value is parsed; an empty sequence leaves the value untouched.
///
/// # Examples
///
/// ```
/// use binder_core::{Parsed, UnmarshalStringSlice};
///
/// let mut limit: Parsed<u16> = Parsed::default();
/// limit.unmarshal_string_slice(&["25".to_string(), "50".to_string()]).unwrap();
/// assert_eq!(*limit, 25);
/// ```
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Parsed<T>(pub T);

impl<T> Parsed<T> {
	/// Unwrap the Parsed and return the inner value
	pub fn into_inner(self) -> T {
		self.0
	}
}

impl<T> Deref for Parsed<T> {
	type Target = T;
	fn deref(&self) -> &Self::Target {
		&self.0
	}
}

impl<T> DerefMut for Parsed<T> {
	fn deref_mut(&mut self) -> &mut Self::Target {
		&mut self.0
	}
}

impl<T: Debug> Debug for Parsed<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		self.0.fmt(f)
	}
}

impl<T: Display> Display for Parsed<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		self.0.fmt(f)
	}
}

impl<T> UnmarshalStringSlice for Parsed<T>
where
	T: FromStr,
	T::Err: std::error::Error + Send + Sync + 'static,
{
	fn unmarshal_string_slice(&mut self, values: &[String]) -> Result<(), UnmarshalError> {
		if let Some(first) = values.first() {
			self.0 = first.parse()?;
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	fn strings(values: &[&str]) -> Vec<String> {
		values.iter().map(|v| v.to_string()).collect()
	}

	#[rstest]
	fn test_parsed_takes_first_value() {
		// Arrange
		let mut value = Parsed(0_i64);

		// Act
		let result = value.unmarshal_string_slice(&strings(&["-7", "9"]));

		// Assert
		assert!(result.is_ok());
		assert_eq!(value.into_inner(), -7);
	}

	#[rstest]
	fn test_parsed_keeps_value_on_empty_input() {
		let mut value = Parsed(5_u8);

		value.unmarshal_string_slice(&[]).unwrap();

		assert_eq!(*value, 5);
	}

	#[rstest]
	fn test_parsed_reports_parse_error() {
		// Arrange
		let mut value = Parsed(1_u32);

		// Act
		let err = value
			.unmarshal_string_slice(&strings(&["one"]))
			.unwrap_err();

		// Assert
		assert_eq!(err.to_string(), "invalid digit found in string");
		assert_eq!(*value, 1);
	}

	#[rstest]
	fn test_parsed_is_transparent_for_serde() {
		let value: Parsed<bool> = serde_json::from_str("true").unwrap();
		assert!(*value);
		assert_eq!(serde_json::to_string(&value).unwrap(), "true");
	}
}
