use compact_str::CompactString;

use crate::value::Value;

/// An ordered named-parameter map.
///
/// Rendered SQL always uses colon-style placeholders (`:name`); the
/// execution primitive owns the conversion to whatever the wire protocol
/// wants. Insertion order is preserved so batch statements bind
/// deterministically; inserting an existing name overwrites in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Params {
    entries: Vec<(CompactString, Value)>,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    pub fn insert(&mut self, name: impl Into<CompactString>, value: impl Into<Value>) {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some((_, v)) => *v = value,
            None => self.entries.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|(n, _)| n == name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    /// The subset of parameters whose value is non-null, in order.
    pub fn non_null(&self) -> Params {
        Params {
            entries: self
                .entries
                .iter()
                .filter(|(_, v)| !v.is_null())
                .cloned()
                .collect(),
        }
    }

    /// The subset of parameters named by `fields`, in this map's order.
    pub fn project<'a>(&self, fields: impl IntoIterator<Item = &'a str>) -> Params {
        let wanted: Vec<&str> = fields.into_iter().collect();
        Params {
            entries: self
                .entries
                .iter()
                .filter(|(n, _)| wanted.contains(&n.as_str()))
                .cloned()
                .collect(),
        }
    }
}

impl IntoIterator for Params {
    type Item = (CompactString, Value);
    type IntoIter = std::vec::IntoIter<(CompactString, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl FromIterator<(CompactString, Value)> for Params {
    fn from_iter<I: IntoIterator<Item = (CompactString, Value)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// Builds a [`Params`] map in place.
///
/// ```
/// use crossdao_core::params;
///
/// let p = params! { "id" => 1i64, "name" => "Ada" };
/// assert_eq!(p.len(), 2);
/// ```
#[macro_export]
macro_rules! params {
    () => { $crate::Params::new() };
    ($($name:expr => $value:expr),+ $(,)?) => {{
        let mut p = $crate::Params::new();
        $(p.insert($name, $value);)+
        p
    }};
}
