//! # binder-core
//!
//! Reflection layer and field accessor for binding request values into
//! typed records.
//!
//! ## Overview
//!
//! A destination record derives [`Reflect`] and annotates the fields it
//! wants filled with `#[bind(...)]`, naming the source under each
//! [`Category`]:
//!
//! ```
//! use binder_core::{Accessor, Category, Parsed, Reflect};
//!
//! #[derive(Reflect, Default)]
//! struct ListUsers {
//! 	#[bind(query = "page")]
//! 	pub page: Parsed<u32>,
//! 	#[bind(header = "Accept-Language")]
//! 	pub language: Option<String>,
//! }
//!
//! let mut input = ListUsers::default();
//! let mut accessor = Accessor::new(&mut input).unwrap();
//! accessor.set(Category::Query, "page", &["2".to_string()]).unwrap();
//! accessor
//! 	.set(Category::Header, "Accept-Language", &["fi".to_string()])
//! 	.unwrap();
//! drop(accessor);
//!
//! assert_eq!(*input.page, 2);
//! assert_eq!(input.language.as_deref(), Some("fi"));
//! ```
//!
//! A field is bindable when its type is `String`, `Vec<String>`, an
//! `Option` of a bindable type, or implements [`UnmarshalStringSlice`].
//! Nested records are walked recursively. Non-`pub` fields are never
//! written.

// Lets the derive macro's `::binder_core` paths resolve inside this crate.
extern crate self as binder_core;

pub mod accessor;
pub mod category;
pub mod error;
pub mod reflect;
pub mod unmarshal;

pub use accessor::Accessor;
pub use category::Category;
pub use error::{Error, InvalidTarget, Result};
pub use reflect::{FieldInfo, Record, Reflect, ReflectKind, ReflectMut, ReflectOption};
pub use unmarshal::{Parsed, UnmarshalError, UnmarshalStringSlice};

pub use binder_macros::Reflect;
