//! Feature containers sent to the ranking service.
//!
//! [`FeatureSet`] is an ordered string-to-string mapping describing one
//! action; [`ContextFeature`] is a single-key mapping describing the current
//! situation (e.g. the car type the user asked for).

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Ordered mapping of feature name to feature value.
///
/// Insertion order is kept on the wire, so the service sees features in
/// catalog column order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeatureSet {
    entries: Vec<(String, String)>,
}

impl FeatureSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `name = value`.
    ///
    /// Returns `false` and leaves the set untouched if `name` is already
    /// present.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) -> bool {
        let name = name.into();
        if self.contains(&name) {
            return false;
        }
        self.entries.push((name, value.into()));
        true
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Feature names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl Serialize for FeatureSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for FeatureSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct FeatureSetVisitor;

        impl<'de> Visitor<'de> for FeatureSetVisitor {
            type Value = FeatureSet;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of feature names to string values")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<FeatureSet, A::Error> {
                let mut set = FeatureSet::new();
                while let Some((k, v)) = access.next_entry::<String, String>()? {
                    if !set.insert(k.clone(), v) {
                        return Err(serde::de::Error::custom(format!(
                            "duplicate feature '{k}'"
                        )));
                    }
                }
                Ok(set)
            }
        }

        deserializer.deserialize_map(FeatureSetVisitor)
    }
}

/// One piece of situational information, serialized as `{"<name>": "<value>"}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextFeature {
    pub name: String,
    pub value: String,
}

impl ContextFeature {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

impl Serialize for ContextFeature {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(&self.name, &self.value)?;
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn feature_set_keeps_insertion_order_on_the_wire() {
        let mut set = FeatureSet::new();
        assert!(set.insert("Type", "SUV"));
        assert!(set.insert("Style", "Family"));
        assert!(set.insert("Engine", "Diesel"));

        let json = serde_json::to_string(&set).expect("serialize");
        assert_eq!(json, r#"{"Type":"SUV","Style":"Family","Engine":"Diesel"}"#);

        let names: Vec<&str> = set.names().collect();
        assert_eq!(names, vec!["Type", "Style", "Engine"]);
    }

    #[test]
    fn feature_set_rejects_duplicate_names() {
        let mut set = FeatureSet::new();
        assert!(set.insert("Type", "SUV"));
        assert!(!set.insert("Type", "Sedan"));
        assert_eq!(set.get("Type"), Some("SUV"));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn feature_set_deserializes_in_document_order() {
        let set: FeatureSet =
            serde_json::from_str(r#"{"z":"1","a":"2"}"#).expect("deserialize");
        let names: Vec<&str> = set.names().collect();
        assert_eq!(names, vec!["z", "a"]);

        let dup = serde_json::from_str::<FeatureSet>(r#"{"a":"1","a":"2"}"#);
        assert!(dup.is_err());
    }

    #[test]
    fn context_feature_is_a_single_key_object() {
        let ctx = ContextFeature::new("feat1", "Sedan");
        let json = serde_json::to_value(&ctx).expect("serialize");
        assert_eq!(json, serde_json::json!({"feat1": "Sedan"}));
    }
}
