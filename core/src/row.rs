use hashbrown::HashMap;

use crate::error::{CrossdaoError, Result};
use crate::value::{FromValue, Value};

static NULL: Value = Value::Null;

/// One row returned by the execution primitive, keyed by result-column name.
///
/// The engine renders select lists aliased to entity field names, so lookups
/// here use field names, not physical column names.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    columns: HashMap<String, Value>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.columns.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.columns.get(name)
    }

    /// The value under `name`, or `Null` when the column is absent.
    pub fn value(&self, name: &str) -> &Value {
        self.columns.get(name).unwrap_or(&NULL)
    }

    pub fn get_as<T: FromValue>(&self, name: &str) -> Result<T> {
        T::from_value(self.value(name))
            .map_err(|e| CrossdaoError::Mapping(format!("column `{name}`: {e}")))
    }

    /// The sole value of a one-column row (count queries, sequence fetches).
    pub fn single(&self) -> Result<&Value> {
        if self.columns.len() == 1 {
            Ok(self.columns.values().next().unwrap_or(&NULL))
        } else {
            Err(CrossdaoError::Mapping(format!(
                "expected a single-column row, got {} columns",
                self.columns.len()
            )))
        }
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

impl<N: Into<String>, V: Into<Value>> FromIterator<(N, V)> for Row {
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        Self {
            columns: iter
                .into_iter()
                .map(|(n, v)| (n.into(), v.into()))
                .collect(),
        }
    }
}

/// Maps a [`Row`] into a caller-visible type.
///
/// Derived entities implement this for full bean mapping; [`Row`] itself is
/// the generic map binding and [`Scalar`] the single-column binding.
pub trait FromRow: Sized {
    fn from_row(row: &Row) -> Result<Self>;
}

impl FromRow for Row {
    fn from_row(row: &Row) -> Result<Self> {
        Ok(row.clone())
    }
}

/// Single-column result binding: wraps the row's only value.
#[derive(Debug, Clone, PartialEq)]
pub struct Scalar<T>(pub T);

impl<T: FromValue> FromRow for Scalar<T> {
    fn from_row(row: &Row) -> Result<Self> {
        T::from_value(row.single()?).map(Scalar)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_column_reads_as_null() {
        let row = Row::new();
        assert!(row.value("missing").is_null());
        assert_eq!(row.get_as::<Option<i64>>("missing").unwrap(), None);
    }

    #[test]
    fn scalar_requires_one_column() {
        let mut row = Row::new();
        row.insert("n", 7i64);
        assert_eq!(Scalar::<i64>::from_row(&row).unwrap(), Scalar(7));
        row.insert("m", 8i64);
        assert!(Scalar::<i64>::from_row(&row).is_err());
    }
}
