//! Per-record index from (category, name) to field setters.

use crate::category::Category;
use crate::error::{Error, InvalidTarget, Result};
use crate::reflect::{Record, Reflect, ReflectMut, ReflectOption};
use crate::unmarshal::{UnmarshalError, UnmarshalStringSlice};
use std::collections::HashMap;
use std::fmt;

/// Writes request values into one destination record.
///
/// Built once per bind call. Construction walks the record (recursing into
/// nested records), resolves a setter for every `pub` field annotated for
/// one of the requested categories, and indexes it under its declared
/// source name. The accessor owns no data: every setter is a mutable borrow
/// into the destination, which is therefore borrowed for as long as the
/// accessor lives.
///
/// # Examples
///
/// ```
/// use binder_core::{Accessor, Category, Reflect};
///
/// #[derive(Reflect, Default)]
/// struct Search {
/// 	#[bind(query = "q")]
/// 	pub term: String,
/// 	#[bind(query = "tag")]
/// 	pub tags: Vec<String>,
/// }
///
/// let mut search = Search::default();
/// let mut accessor = Accessor::new(&mut search).unwrap();
/// accessor.set(Category::Query, "q", &["rust".to_string()]).unwrap();
/// accessor
/// 	.set(Category::Query, "tag", &["a".to_string(), "b".to_string()])
/// 	.unwrap();
/// drop(accessor);
///
/// assert_eq!(search.term, "rust");
/// assert_eq!(search.tags, ["a", "b"]);
/// ```
pub struct Accessor<'a> {
	setters: Vec<Setter<'a>>,
	index: HashMap<Category, HashMap<&'static str, Vec<usize>>>,
}

impl<'a> Accessor<'a> {
	/// Indexes `target` for every category.
	pub fn new<T: Reflect>(target: &'a mut T) -> Result<Self> {
		Self::with_categories(target, &Category::ALL)
	}

	/// Indexes `target` for the given categories only.
	///
	/// An empty `categories` slice means every category.
	pub fn with_categories<T: Reflect>(target: &'a mut T, categories: &[Category]) -> Result<Self> {
		Self::from_reflect(target, categories)
	}

	/// Indexes a type-erased target.
	pub fn from_reflect(target: &'a mut dyn Reflect, categories: &[Category]) -> Result<Self> {
		let categories: &[Category] = if categories.is_empty() {
			&Category::ALL
		} else {
			categories
		};

		let type_name = target.reflect_type_name();
		let record = match target.reflect_mut() {
			ReflectMut::Record(record) => record,
			other => {
				return Err(InvalidTarget::NotARecord {
					type_name,
					kind: other.kind(),
				}
				.into());
			}
		};

		let mut accessor = Self {
			setters: Vec::new(),
			index: categories
				.iter()
				.map(|category| (*category, HashMap::new()))
				.collect(),
		};
		accessor.travel(record, categories)?;

		tracing::trace!(
			record = type_name,
			setters = accessor.setters.len(),
			keys = accessor.len(),
			"built field accessor"
		);
		Ok(accessor)
	}

	fn travel(&mut self, record: &'a mut dyn Record, categories: &[Category]) -> Result<()> {
		let infos = record.field_infos();

		for (info, field) in infos.iter().zip(record.fields_mut()) {
			let type_name = field.reflect_type_name();
			let view = match field.reflect_mut() {
				ReflectMut::Record(inner) => {
					self.travel(inner, categories)?;
					continue;
				}
				view => view,
			};

			if !info.is_public() {
				continue;
			}

			let bindings: Vec<(Category, &'static str)> = categories
				.iter()
				.filter_map(|category| info.binding(*category).map(|name| (*category, name)))
				.collect();
			if bindings.is_empty() {
				continue;
			}

			let slot = self.setters.len();
			self.setters
				.push(Setter::resolve(info.name(), type_name, view)?);

			for (category, name) in bindings {
				if let Some(names) = self.index.get_mut(&category) {
					names.entry(name).or_default().push(slot);
				}
			}
		}
		Ok(())
	}

	/// Applies `values` to every field registered under `(category, name)`.
	///
	/// Empty `values` and unknown keys are ignored. Setters run in field
	/// declaration order and the first failure is returned; fields after the
	/// failing one keep their previous value.
	pub fn set(&mut self, category: Category, name: &str, values: &[String]) -> Result<()> {
		if values.is_empty() {
			return Ok(());
		}

		let Some(slots) = self.index.get(&category).and_then(|names| names.get(name)) else {
			return Ok(());
		};

		for &slot in slots {
			self.setters[slot].set(values).map_err(|err| match err {
				SetError::Target(err) => Error::InvalidTarget(err),
				SetError::Unmarshal(source) => {
					tracing::debug!(%category, key = name, error = %source, "field setter rejected input");
					Error::Conversion {
						category,
						name: name.to_string(),
						source,
					}
				}
			})?;
		}
		Ok(())
	}

	/// Every distinct source name registered for `category`, in no
	/// particular order.
	pub fn fields(&self, category: Category) -> Vec<&'static str> {
		self.index
			.get(&category)
			.map(|names| names.keys().copied().collect())
			.unwrap_or_default()
	}

	/// Returns `true` when `(category, name)` has at least one setter.
	pub fn contains(&self, category: Category, name: &str) -> bool {
		self.index
			.get(&category)
			.is_some_and(|names| names.contains_key(name))
	}

	/// Number of indexed (category, name) keys.
	pub fn len(&self) -> usize {
		self.index.values().map(HashMap::len).sum()
	}

	/// Returns `true` when no field is bound.
	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}
}

impl fmt::Debug for Accessor<'_> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let mut categories: Vec<_> = self.index.iter().collect();
		categories.sort_by_key(|(category, _)| **category);

		let mut map = f.debug_map();
		for (category, names) in categories {
			let mut names: Vec<_> = names.iter().collect();
			names.sort_by_key(|(name, _)| **name);
			for (name, slots) in names {
				let kinds: Vec<&str> = slots
					.iter()
					.map(|slot| self.setters[*slot].kind_name())
					.collect();
				map.entry(&format_args!("{category}:{name}"), &kinds);
			}
		}
		map.finish()
	}
}

enum SetError {
	Target(InvalidTarget),
	Unmarshal(UnmarshalError),
}

/// Writes a string sequence into exactly one field.
enum Setter<'a> {
	Text(&'a mut String),
	TextList(&'a mut Vec<String>),
	Custom(&'a mut dyn UnmarshalStringSlice),
	Optional {
		field: &'static str,
		slot: &'a mut dyn ReflectOption,
	},
}

impl<'a> Setter<'a> {
	fn resolve(
		field: &'static str,
		type_name: &'static str,
		view: ReflectMut<'a>,
	) -> std::result::Result<Self, InvalidTarget> {
		let unsupported = || InvalidTarget::UnsupportedField { field, type_name };

		match view {
			ReflectMut::Unmarshal(target) => Ok(Setter::Custom(target)),
			ReflectMut::Optional(slot) => {
				// Probe the payload type so a bad `Option<T>` fails here rather
				// than on the first request carrying the value.
				let mut probe = slot.new_inner();
				let probe_type = probe.reflect_type_name();
				Setter::resolve(field, probe_type, probe.reflect_mut())?;
				Ok(Setter::Optional { field, slot })
			}
			ReflectMut::Opaque(any) => {
				let setter = if any.is::<String>() {
					any.downcast_mut::<String>().map(Setter::Text)
				} else if any.is::<Vec<String>>() {
					any.downcast_mut::<Vec<String>>().map(Setter::TextList)
				} else {
					None
				};
				setter.ok_or_else(unsupported)
			}
			ReflectMut::Record(_) => Err(unsupported()),
		}
	}

	fn set(&mut self, values: &[String]) -> std::result::Result<(), SetError> {
		match self {
			Setter::Text(target) => {
				if let Some(first) = values.first() {
					**target = first.clone();
				}
				Ok(())
			}
			Setter::TextList(target) => {
				**target = values.to_vec();
				Ok(())
			}
			Setter::Custom(target) => target
				.unmarshal_string_slice(values)
				.map_err(SetError::Unmarshal),
			Setter::Optional { field, slot } => {
				let field = *field;
				if let Some(inner) = slot.inner_mut() {
					return Self::set_reflect(field, inner, values);
				}

				let mut fresh = slot.new_inner();
				Self::set_reflect(field, fresh.as_mut(), values)?;
				slot.insert_boxed(fresh).map_err(|_| {
					SetError::Target(InvalidTarget::UnsupportedField {
						field,
						type_name: "Option",
					})
				})
			}
		}
	}

	fn set_reflect(
		field: &'static str,
		value: &mut dyn Reflect,
		values: &[String],
	) -> std::result::Result<(), SetError> {
		let type_name = value.reflect_type_name();
		Setter::resolve(field, type_name, value.reflect_mut())
			.map_err(SetError::Target)?
			.set(values)
	}

	fn kind_name(&self) -> &'static str {
		match self {
			Setter::Text(_) => "text",
			Setter::TextList(_) => "text list",
			Setter::Custom(_) => "custom",
			Setter::Optional { .. } => "optional",
		}
	}
}
