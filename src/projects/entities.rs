use std::fmt;

use serde::{
    de::{self, MapAccess, Visitor},
    ser::SerializeMap,
    Deserialize, Deserializer, Serialize, Serializer,
};

/// Accumulated minutes per project, in the order projects were created. Stored on disk as a
/// single json object, `{"name": minutes, ...}`, with keys kept in the same order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectTotals {
    entries: Vec<(String, f64)>,
}

impl ProjectTotals {
    pub fn get(&self, name: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, minutes)| *minutes)
    }

    pub(super) fn get_mut(&mut self, name: &str) -> Option<&mut f64> {
        self.entries
            .iter_mut()
            .find(|(n, _)| n == name)
            .map(|(_, minutes)| minutes)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Appends `name` with zero minutes. Returns `false` if it already exists.
    pub fn insert_new(&mut self, name: &str) -> bool {
        if self.contains(name) {
            return false;
        }
        self.entries.push((name.to_owned(), 0.));
        true
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries.iter().map(|(n, m)| (n.as_str(), *m))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    pub fn first_name(&self) -> Option<&str> {
        self.entries.first().map(|(n, _)| n.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<N: Into<String>> FromIterator<(N, f64)> for ProjectTotals {
    fn from_iter<T: IntoIterator<Item = (N, f64)>>(iter: T) -> Self {
        let mut totals = ProjectTotals::default();
        for (name, minutes) in iter {
            let name = name.into();
            match totals.get_mut(&name) {
                Some(existing) => *existing = minutes,
                None => totals.entries.push((name, minutes)),
            }
        }
        totals
    }
}

impl Serialize for ProjectTotals {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, minutes) in &self.entries {
            map.serialize_entry(name, minutes)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for ProjectTotals {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(TotalsVisitor)
    }
}

struct TotalsVisitor;

impl<'de> Visitor<'de> for TotalsVisitor {
    type Value = ProjectTotals;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a map of project names to minutes")
    }

    fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
        while let Some((name, minutes)) = access.next_entry::<String, f64>()? {
            if !minutes.is_finite() || minutes < 0. {
                return Err(de::Error::custom(format!(
                    "project {name:?} has invalid minutes {minutes}"
                )));
            }
            entries.push((name, minutes));
        }
        Ok(entries.into_iter().collect())
    }
}
