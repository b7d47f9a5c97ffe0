//! Accessor behaviour over derived records.

use binder_core::{
	Accessor, Category, Error, InvalidTarget, Parsed, Reflect, ReflectKind, UnmarshalError,
	UnmarshalStringSlice,
};
use rstest::rstest;

fn strings(values: &[&str]) -> Vec<String> {
	values.iter().map(|v| v.to_string()).collect()
}

/// Integer parsed by its own setter, rejecting anything but digits.
#[derive(Reflect, Debug, Default, PartialEq)]
#[reflect(unmarshal)]
struct Integer(i64);

impl UnmarshalStringSlice for Integer {
	fn unmarshal_string_slice(&mut self, values: &[String]) -> Result<(), UnmarshalError> {
		if let Some(first) = values.first() {
			self.0 = first.parse()?;
		}
		Ok(())
	}
}

/// Comma-separated list; the custom setter wins over the `Vec<String>` one.
#[derive(Reflect, Debug, Default, PartialEq)]
#[reflect(unmarshal)]
struct Csv(Vec<String>);

impl UnmarshalStringSlice for Csv {
	fn unmarshal_string_slice(&mut self, values: &[String]) -> Result<(), UnmarshalError> {
		self.0 = values
			.iter()
			.flat_map(|value| value.split(','))
			.map(str::to_string)
			.collect();
		Ok(())
	}
}

#[derive(Reflect, Default)]
struct Inner {
	#[bind(query = "name")]
	pub name: String,
	#[bind(header = "X-Depth")]
	pub depth: Option<Integer>,
}

#[derive(Reflect, Default)]
struct Middle {
	pub inner: Inner,
	#[bind(query = "name")]
	pub alias: String,
}

#[derive(Reflect, Default)]
struct Outer {
	#[bind(query = "name")]
	pub name: String,
	#[bind(query = "count", form = "count")]
	pub count: Integer,
	#[bind(query = "ids")]
	pub ids: Csv,
	#[bind(form = "tags")]
	pub tags: Vec<String>,
	#[bind(header = "X-Trace")]
	pub trace: Option<String>,
	middle: Middle,
	#[bind(query = "hidden")]
	hidden: String,
	#[reflect(skip)]
	pub cache: std::collections::HashMap<String, String>,
}

#[rstest]
fn test_nested_records_share_names() {
	// Arrange
	let mut outer = Outer::default();
	let mut accessor = Accessor::new(&mut outer).unwrap();

	// Act
	accessor.set(Category::Query, "name", &strings(&["n"])).unwrap();
	drop(accessor);

	// Assert
	assert_eq!(outer.name, "n");
	assert_eq!(outer.middle.alias, "n");
	assert_eq!(outer.middle.inner.name, "n");
}

#[rstest]
fn test_custom_setter() {
	let mut outer = Outer::default();
	let mut accessor = Accessor::new(&mut outer).unwrap();

	accessor.set(Category::Form, "count", &strings(&["42", "7"])).unwrap();
	accessor.set(Category::Query, "ids", &strings(&["1,2", "3"])).unwrap();
	drop(accessor);

	assert_eq!(outer.count, Integer(42));
	assert_eq!(outer.ids, Csv(strings(&["1", "2", "3"])));
}

#[rstest]
fn test_list_and_optional_setters() {
	// Arrange
	let mut outer = Outer::default();
	let mut accessor = Accessor::new(&mut outer).unwrap();

	// Act
	accessor.set(Category::Form, "tags", &strings(&["a", "b"])).unwrap();
	accessor.set(Category::Header, "X-Trace", &strings(&["t-1", "t-2"])).unwrap();
	accessor.set(Category::Header, "X-Depth", &strings(&["3"])).unwrap();
	drop(accessor);

	// Assert
	assert_eq!(outer.tags, ["a", "b"]);
	assert_eq!(outer.trace.as_deref(), Some("t-1"));
	assert_eq!(outer.middle.inner.depth, Some(Integer(3)));
}

#[rstest]
fn test_failed_optional_set_leaves_none() {
	let mut outer = Outer::default();
	let mut accessor = Accessor::new(&mut outer).unwrap();

	let err = accessor
		.set(Category::Header, "X-Depth", &strings(&["deep"]))
		.unwrap_err();
	drop(accessor);

	assert!(err.is_conversion());
	assert_eq!(outer.middle.inner.depth, None);
}

#[rstest]
fn test_existing_optional_value_is_updated() {
	let mut inner = Inner {
		depth: Some(Integer(1)),
		..Inner::default()
	};
	let mut accessor = Accessor::new(&mut inner).unwrap();

	accessor.set(Category::Header, "X-Depth", &strings(&["2"])).unwrap();
	drop(accessor);

	assert_eq!(inner.depth, Some(Integer(2)));
}

#[rstest]
fn test_conversion_error_names_the_source() {
	// Arrange
	let mut outer = Outer::default();
	let mut accessor = Accessor::new(&mut outer).unwrap();

	// Act
	let err = accessor
		.set(Category::Query, "count", &strings(&["many"]))
		.unwrap_err();

	// Assert
	assert!(matches!(
		&err,
		Error::Conversion {
			category: Category::Query,
			name,
			..
		} if name == "count"
	));
	assert_eq!(
		err.to_string(),
		"query parameter \"count\": invalid digit found in string"
	);
}

#[rstest]
#[case::empty_values(Category::Query, "name", &[])]
#[case::unknown_name(Category::Query, "missing", &["x"])]
#[case::wrong_category(Category::Header, "name", &["x"])]
#[case::private_field(Category::Query, "hidden", &["x"])]
fn test_ignored_sets(#[case] category: Category, #[case] name: &str, #[case] values: &[&str]) {
	// Arrange
	let mut outer = Outer::default();
	let mut accessor = Accessor::new(&mut outer).unwrap();

	// Act
	let result = accessor.set(category, name, &strings(values));
	drop(accessor);

	// Assert
	assert!(result.is_ok());
	assert!(outer.name.is_empty());
	assert!(outer.hidden.is_empty());
}

#[rstest]
fn test_fields_per_category() {
	let mut outer = Outer::default();
	let accessor = Accessor::new(&mut outer).unwrap();

	let mut query = accessor.fields(Category::Query);
	query.sort_unstable();
	let mut header = accessor.fields(Category::Header);
	header.sort_unstable();

	assert_eq!(query, ["count", "ids", "name"]);
	assert_eq!(header, ["X-Depth", "X-Trace"]);
	assert!(accessor.fields(Category::Uri).is_empty());
	assert!(!accessor.contains(Category::Query, "hidden"));
	assert_eq!(accessor.len(), 7);
}

#[derive(Reflect, Default)]
struct WithInteger {
	#[bind(query = "age")]
	pub age: i64,
}

#[derive(Reflect, Default)]
struct WithNestedBad {
	pub ok: Inner,
	pub bad: WithInteger,
}

#[derive(Reflect, Default)]
struct WithOptionalRecord {
	#[bind(query = "inner")]
	pub inner: Option<Inner>,
}

#[derive(Reflect, Default)]
struct WithUnannotatedInteger {
	pub age: i64,
	#[bind(query = "name")]
	pub name: String,
}

#[rstest]
fn test_unsupported_field_is_rejected() {
	let mut target = WithNestedBad::default();

	let err = Accessor::new(&mut target).unwrap_err();

	assert!(err.is_invalid_target());
	assert!(matches!(
		err,
		Error::InvalidTarget(InvalidTarget::UnsupportedField {
			field: "age",
			type_name: "i64",
		})
	));
}

#[rstest]
fn test_optional_record_is_rejected() {
	let mut target = WithOptionalRecord::default();

	let err = Accessor::new(&mut target).unwrap_err();

	assert!(matches!(
		err,
		Error::InvalidTarget(InvalidTarget::UnsupportedField { field: "inner", .. })
	));
}

#[rstest]
fn test_unsupported_field_outside_category_is_ignored() {
	let mut target = WithNestedBad::default();

	let accessor = Accessor::with_categories(&mut target, &[Category::Header]);

	assert!(accessor.is_ok());
}

#[rstest]
fn test_unannotated_fields_are_not_resolved() {
	let mut target = WithUnannotatedInteger::default();

	let accessor = Accessor::new(&mut target).unwrap();

	assert_eq!(accessor.len(), 1);
}

#[rstest]
#[case::custom(Box::new(Integer::default()) as Box<dyn Reflect>, ReflectKind::Unmarshal)]
#[case::parsed(Box::new(Parsed(0_u8)) as Box<dyn Reflect>, ReflectKind::Unmarshal)]
#[case::text(Box::new(String::new()) as Box<dyn Reflect>, ReflectKind::Opaque)]
fn test_leaf_targets_are_rejected(#[case] mut target: Box<dyn Reflect>, #[case] kind: ReflectKind) {
	let err = Accessor::from_reflect(target.as_mut(), &[]).unwrap_err();

	match err {
		Error::InvalidTarget(InvalidTarget::NotARecord { kind: found, .. }) => assert_eq!(found, kind),
		other => panic!("unexpected error {other}"),
	}
}
