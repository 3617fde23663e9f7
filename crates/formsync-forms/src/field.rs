//! Field model: values, fixed field sets, value snapshots and error mappings.

use std::collections::BTreeMap;
use std::fmt;
use std::hash::Hash;

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

/// A scalar form value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
	/// Checkbox-like value
	Bool(bool),
	/// Text-like value
	Text(String),
}

impl FieldValue {
	/// Empty text value
	pub fn empty_text() -> Self {
		Self::Text(String::new())
	}

	/// Text content, `None` for booleans
	pub fn as_text(&self) -> Option<&str> {
		match self {
			Self::Text(text) => Some(text),
			Self::Bool(_) => None,
		}
	}

	/// Boolean content, `None` for text
	pub fn as_bool(&self) -> Option<bool> {
		match self {
			Self::Bool(flag) => Some(*flag),
			Self::Text(_) => None,
		}
	}

	/// Whether the value counts as "not filled in" (empty or whitespace text, `false`)
	pub fn is_blank(&self) -> bool {
		match self {
			Self::Text(text) => text.trim().is_empty(),
			Self::Bool(flag) => !flag,
		}
	}
}

impl Default for FieldValue {
	fn default() -> Self {
		Self::empty_text()
	}
}

impl fmt::Display for FieldValue {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Text(text) => f.write_str(text),
			Self::Bool(flag) => write!(f, "{flag}"),
		}
	}
}

impl From<&str> for FieldValue {
	fn from(value: &str) -> Self {
		Self::Text(value.to_string())
	}
}

impl From<String> for FieldValue {
	fn from(value: String) -> Self {
		Self::Text(value)
	}
}

impl From<bool> for FieldValue {
	fn from(value: bool) -> Self {
		Self::Bool(value)
	}
}

/// A fixed, known set of form fields.
///
/// Implemented by a fieldless enum; see [`LoginField`](crate::login::LoginField).
pub trait FieldSet: Copy + Eq + Ord + Hash + fmt::Debug + 'static {
	/// Every field, in display order
	fn all() -> &'static [Self];

	/// Wire name of the field (the key used in payloads and error mappings)
	fn name(self) -> &'static str;

	/// Value the field starts with and returns to on reset
	fn default_value(self) -> FieldValue;

	/// Look a field up by its wire name
	fn from_name(name: &str) -> Option<Self> {
		Self::all().iter().copied().find(|field| field.name() == name)
	}
}

/// Snapshot of every field's value.
///
/// Always holds an entry for each field of `F`. Serializes as a JSON object
/// keyed by field name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormValues<F: FieldSet> {
	values: BTreeMap<F, FieldValue>,
}

impl<F: FieldSet> FormValues<F> {
	/// Every field at its default value
	pub fn defaults() -> Self {
		Self {
			values: F::all()
				.iter()
				.map(|&field| (field, field.default_value()))
				.collect(),
		}
	}

	/// Builder-style [`set`](Self::set)
	pub fn with(mut self, field: F, value: impl Into<FieldValue>) -> Self {
		self.set(field, value);
		self
	}

	/// Overwrite one field
	pub fn set(&mut self, field: F, value: impl Into<FieldValue>) {
		self.values.insert(field, value.into());
	}

	/// Value of one field
	pub fn get(&self, field: F) -> Option<&FieldValue> {
		self.values.get(&field)
	}

	/// Text of one field, `""` for booleans
	pub fn text(&self, field: F) -> &str {
		self.get(field).and_then(FieldValue::as_text).unwrap_or_default()
	}

	/// Flag of one field, `false` for text
	pub fn flag(&self, field: F) -> bool {
		self.get(field).and_then(FieldValue::as_bool).unwrap_or_default()
	}

	/// Fields and values in field order
	pub fn iter(&self) -> impl Iterator<Item = (F, &FieldValue)> {
		self.values.iter().map(|(&field, value)| (field, value))
	}

	/// Payload representation handed to the transport
	pub fn to_json(&self) -> serde_json::Value {
		self.values
			.iter()
			.map(|(field, value)| {
				let value = match value {
					FieldValue::Text(text) => serde_json::Value::String(text.clone()),
					FieldValue::Bool(flag) => serde_json::Value::Bool(*flag),
				};
				(field.name().to_string(), value)
			})
			.collect::<serde_json::Map<_, _>>()
			.into()
	}
}

impl<F: FieldSet> Default for FormValues<F> {
	fn default() -> Self {
		Self::defaults()
	}
}

impl<F: FieldSet> Serialize for FormValues<F> {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		let mut map = serializer.serialize_map(Some(self.values.len()))?;
		for (field, value) in &self.values {
			map.serialize_entry(field.name(), value)?;
		}
		map.end()
	}
}

/// Field name → message.
///
/// Keys are plain strings so server-reported errors for names outside the
/// form's field set pass through untouched. Empty messages are never stored:
/// a field is in error exactly when it has a key here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, String>")]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
	/// No errors
	pub fn new() -> Self {
		Self::default()
	}

	/// Builder-style [`insert`](Self::insert)
	pub fn with(mut self, name: impl Into<String>, message: impl Into<String>) -> Self {
		self.insert(name, message);
		self
	}

	/// Record an error; empty messages are ignored
	pub fn insert(&mut self, name: impl Into<String>, message: impl Into<String>) {
		let message = message.into();
		if !message.is_empty() {
			self.0.insert(name.into(), message);
		}
	}

	/// Drop the error for `name`
	pub fn remove(&mut self, name: &str) -> Option<String> {
		self.0.remove(name)
	}

	/// Message for `name`
	pub fn get(&self, name: &str) -> Option<&str> {
		self.0.get(name).map(String::as_str)
	}

	/// Message for a typed field
	pub fn field<F: FieldSet>(&self, field: F) -> Option<&str> {
		self.get(field.name())
	}

	/// First message among `names`, in the order given
	pub fn first_of<'a>(&self, names: impl IntoIterator<Item = &'a str>) -> Option<&str> {
		names.into_iter().find_map(|name| self.get(name))
	}

	/// Whether `name` is in error
	pub fn contains(&self, name: &str) -> bool {
		self.0.contains_key(name)
	}

	/// Number of fields in error
	pub fn len(&self) -> usize {
		self.0.len()
	}

	/// Whether nothing is in error
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Entries in name order
	pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
		self.0.iter().map(|(name, message)| (name.as_str(), message.as_str()))
	}

	/// Entries whose name is not a field of `F`.
	///
	/// These cannot be shown inline and are rendered as general form errors.
	pub fn non_field<F: FieldSet>(&self) -> impl Iterator<Item = (&str, &str)> {
		self.iter().filter(|(name, _)| F::from_name(name).is_none())
	}
}

impl From<BTreeMap<String, String>> for FieldErrors {
	fn from(map: BTreeMap<String, String>) -> Self {
		map.into_iter().collect()
	}
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FieldErrors {
	fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
		let mut errors = Self::new();
		for (name, message) in iter {
			errors.insert(name, message);
		}
		errors
	}
}

impl IntoIterator for FieldErrors {
	type Item = (String, String);
	type IntoIter = std::collections::btree_map::IntoIter<String, String>;

	fn into_iter(self) -> Self::IntoIter {
		self.0.into_iter()
	}
}
