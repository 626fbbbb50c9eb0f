/* src/cli/compiler/src/ordered_map.rs */

// String-keyed map that keeps insertion order through serde.
// JSON objects read into it keep duplicate keys so callers can reject them.

use std::fmt;
use std::marker::PhantomData;

use serde::de::{Deserialize, Deserializer, MapAccess, Visitor};
use serde::ser::{Serialize, SerializeMap, Serializer};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderedMap<V> {
  entries: Vec<(String, V)>,
}

impl<V> Default for OrderedMap<V> {
  fn default() -> Self {
    Self { entries: Vec::new() }
  }
}

impl<V> OrderedMap<V> {
  pub fn new() -> Self {
    Self::default()
  }

  /// Append an entry. Callers guarantee key uniqueness.
  pub fn push(&mut self, key: impl Into<String>, value: V) {
    self.entries.push((key.into(), value));
  }

  pub fn get(&self, key: &str) -> Option<&V> {
    self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
  }

  pub fn contains_key(&self, key: &str) -> bool {
    self.get(key).is_some()
  }

  pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
    self.entries.iter().map(|(k, v)| (k.as_str(), v))
  }

  pub fn keys(&self) -> impl Iterator<Item = &str> {
    self.entries.iter().map(|(k, _)| k.as_str())
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }
}

impl<V> FromIterator<(String, V)> for OrderedMap<V> {
  fn from_iter<I: IntoIterator<Item = (String, V)>>(iter: I) -> Self {
    Self { entries: iter.into_iter().collect() }
  }
}

impl<V: Serialize> Serialize for OrderedMap<V> {
  fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
  where
    S: Serializer,
  {
    let mut map = serializer.serialize_map(Some(self.entries.len()))?;
    for (key, value) in &self.entries {
      map.serialize_entry(key, value)?;
    }
    map.end()
  }
}

impl<'de, V: Deserialize<'de>> Deserialize<'de> for OrderedMap<V> {
  fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
  where
    D: Deserializer<'de>,
  {
    struct EntriesVisitor<V>(PhantomData<V>);

    impl<'de, V: Deserialize<'de>> Visitor<'de> for EntriesVisitor<V> {
      type Value = OrderedMap<V>;

      fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a JSON object")
      }

      fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
      where
        A: MapAccess<'de>,
      {
        let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
        while let Some((key, value)) = access.next_entry::<String, V>()? {
          entries.push((key, value));
        }
        Ok(OrderedMap { entries })
      }
    }

    deserializer.deserialize_map(EntriesVisitor(PhantomData))
  }
}
