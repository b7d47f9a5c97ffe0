//! Runtime view over bindable values.
//!
//! A destination record is walked through trait objects rather than
//! concrete types: every value reports a [`ReflectMut`] view telling the
//! accessor whether it is a record to recurse into, a value that parses
//! itself from strings, an optional slot, or an opaque value.
//!
//! Records and custom types get their implementation from
//! `#[derive(Reflect)]`; the standard library types are covered here.

use crate::category::Category;
use crate::unmarshal::{Parsed, UnmarshalStringSlice};
use std::any::Any;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::fmt;
use std::str::FromStr;

/// A value the accessor can inspect and write through.
pub trait Reflect: Any {
	/// Name of the concrete type, for diagnostics.
	fn reflect_type_name(&self) -> &'static str;

	/// The kind of view [`Reflect::reflect_mut`] returns.
	fn reflect_kind(&self) -> ReflectKind;

	/// Returns a mutable view of this value.
	fn reflect_mut(&mut self) -> ReflectMut<'_>;

	/// Converts a boxed value into `Box<dyn Any>` for downcasting.
	fn into_any(self: Box<Self>) -> Box<dyn Any>;
}

/// Kinds of [`ReflectMut`] views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReflectKind {
	Record,
	Unmarshal,
	Optional,
	Opaque,
}

impl fmt::Display for ReflectKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Record => f.pad("record"),
			Self::Unmarshal => f.pad("custom value"),
			Self::Optional => f.pad("optional value"),
			Self::Opaque => f.pad("opaque value"),
		}
	}
}

/// Mutable view of a reflected value.
pub enum ReflectMut<'a> {
	/// A record whose fields are walked recursively.
	Record(&'a mut dyn Record),
	/// A value parsing itself from a string sequence.
	Unmarshal(&'a mut dyn UnmarshalStringSlice),
	/// An `Option` whose inner value is allocated on first write.
	Optional(&'a mut dyn ReflectOption),
	/// Anything else. `String` and `Vec<String>` are recognized by downcast.
	Opaque(&'a mut dyn Any),
}

impl ReflectMut<'_> {
	/// Returns the kind of this view.
	pub fn kind(&self) -> ReflectKind {
		match self {
			Self::Record(_) => ReflectKind::Record,
			Self::Unmarshal(_) => ReflectKind::Unmarshal,
			Self::Optional(_) => ReflectKind::Optional,
			Self::Opaque(_) => ReflectKind::Opaque,
		}
	}
}

impl fmt::Debug for ReflectMut<'_> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_tuple("ReflectMut").field(&self.kind()).finish()
	}
}

/// Static description of one record field.
///
/// # Examples
///
/// ```
/// use binder_core::{Category, FieldInfo};
///
/// static FIELD: FieldInfo = FieldInfo::new(
/// 	"content_type",
/// 	true,
/// 	&[(Category::Header, "Content-Type")],
/// );
///
/// assert_eq!(FIELD.name(), "content_type");
/// assert_eq!(FIELD.binding(Category::Header), Some("Content-Type"));
/// assert_eq!(FIELD.binding(Category::Query), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldInfo {
	name: &'static str,
	public: bool,
	bindings: &'static [(Category, &'static str)],
}

impl FieldInfo {
	/// Creates a field description.
	pub const fn new(
		name: &'static str,
		public: bool,
		bindings: &'static [(Category, &'static str)],
	) -> Self {
		Self {
			name,
			public,
			bindings,
		}
	}

	/// Rust name of the field.
	pub const fn name(&self) -> &'static str {
		self.name
	}

	/// Whether the field is declared `pub`.
	pub const fn is_public(&self) -> bool {
		self.public
	}

	/// Every declared (category, source name) pair.
	pub const fn bindings(&self) -> &'static [(Category, &'static str)] {
		self.bindings
	}

	/// Source name declared for `category`, if any.
	pub fn binding(&self, category: Category) -> Option<&'static str> {
		self.bindings
			.iter()
			.find(|(declared, _)| *declared == category)
			.map(|(_, name)| *name)
	}
}

/// A struct with named fields.
///
/// `field_infos` and `fields_mut` are parallel: the n-th info describes the
/// n-th value, both in declaration order.
pub trait Record: Reflect {
	/// Descriptions of the reflected fields.
	fn field_infos(&self) -> &'static [FieldInfo];

	/// Mutable access to every reflected field at once.
	fn fields_mut(&mut self) -> Vec<&mut dyn Reflect>;
}

/// An optional slot, implemented by `Option<T>`.
pub trait ReflectOption {
	/// The current inner value, if present.
	fn inner_mut(&mut self) -> Option<&mut dyn Reflect>;

	/// A fresh default inner value.
	fn new_inner(&self) -> Box<dyn Reflect>;

	/// Stores `value` as the inner value.
	///
	/// Hands the value back when it is not of the inner type.
	fn insert_boxed(&mut self, value: Box<dyn Reflect>) -> Result<(), Box<dyn Any>>;
}

impl<T: Reflect + Default> ReflectOption for Option<T> {
	fn inner_mut(&mut self) -> Option<&mut dyn Reflect> {
		self.as_mut().map(|value| value as &mut dyn Reflect)
	}

	fn new_inner(&self) -> Box<dyn Reflect> {
		Box::new(T::default())
	}

	fn insert_boxed(&mut self, value: Box<dyn Reflect>) -> Result<(), Box<dyn Any>> {
		let value = value.into_any().downcast::<T>()?;
		*self = Some(*value);
		Ok(())
	}
}

impl<T: Reflect + Default> Reflect for Option<T> {
	fn reflect_type_name(&self) -> &'static str {
		std::any::type_name::<Self>()
	}

	fn reflect_kind(&self) -> ReflectKind {
		ReflectKind::Optional
	}

	fn reflect_mut(&mut self) -> ReflectMut<'_> {
		ReflectMut::Optional(self)
	}

	fn into_any(self: Box<Self>) -> Box<dyn Any> {
		self
	}
}

impl<T> Reflect for Parsed<T>
where
	T: FromStr + 'static,
	T::Err: std::error::Error + Send + Sync + 'static,
{
	fn reflect_type_name(&self) -> &'static str {
		std::any::type_name::<Self>()
	}

	fn reflect_kind(&self) -> ReflectKind {
		ReflectKind::Unmarshal
	}

	fn reflect_mut(&mut self) -> ReflectMut<'_> {
		ReflectMut::Unmarshal(self)
	}

	fn into_any(self: Box<Self>) -> Box<dyn Any> {
		self
	}
}

// Opaque values are never walked; only `String` and `Vec<String>` are
// bindable among them.
macro_rules! impl_reflect_opaque {
	(<$($param:ident),*> $ty:ty) => {
		impl<$($param: 'static),*> Reflect for $ty {
			fn reflect_type_name(&self) -> &'static str {
				std::any::type_name::<Self>()
			}

			fn reflect_kind(&self) -> ReflectKind {
				ReflectKind::Opaque
			}

			fn reflect_mut(&mut self) -> ReflectMut<'_> {
				ReflectMut::Opaque(self)
			}

			fn into_any(self: Box<Self>) -> Box<dyn Any> {
				self
			}
		}
	};
	($($ty:ty),* $(,)?) => {
		$(impl_reflect_opaque!(<> $ty);)*
	};
}

impl_reflect_opaque!(
	(),
	bool,
	char,
	i8,
	i16,
	i32,
	i64,
	i128,
	isize,
	u8,
	u16,
	u32,
	u64,
	u128,
	usize,
	f32,
	f64,
	String,
	&'static str,
);
impl_reflect_opaque!(<T> Vec<T>);
impl_reflect_opaque!(<T> VecDeque<T>);
impl_reflect_opaque!(<T> Box<T>);
impl_reflect_opaque!(<T, S> HashSet<T, S>);
impl_reflect_opaque!(<T> BTreeSet<T>);
impl_reflect_opaque!(<K, V, S> HashMap<K, V, S>);
impl_reflect_opaque!(<K, V> BTreeMap<K, V>);
