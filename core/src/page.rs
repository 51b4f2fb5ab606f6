//! Sorting and pagination request/response types.

/// Sort direction for one key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderBy {
    Asc,
    Desc,
}

impl OrderBy {
    pub fn as_sql(&self) -> &'static str {
        match self {
            OrderBy::Asc => "ASC",
            OrderBy::Desc => "DESC",
        }
    }
}

/// An ordered list of sort keys.
///
/// At the engine boundary keys name entity *fields*; the engine maps them to
/// physical columns before any dialect sees them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sort {
    keys: Vec<(String, OrderBy)>,
}

impl Sort {
    pub fn unsorted() -> Self {
        Self::default()
    }

    pub fn by(key: impl Into<String>) -> Self {
        Self::unsorted().and(key, OrderBy::Asc)
    }

    pub fn by_desc(key: impl Into<String>) -> Self {
        Self::unsorted().and(key, OrderBy::Desc)
    }

    pub fn and(mut self, key: impl Into<String>, order: OrderBy) -> Self {
        self.keys.push((key.into(), order));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = (&str, OrderBy)> {
        self.keys.iter().map(|(k, o)| (k.as_str(), *o))
    }

    /// Rewrites every key through `f`, preserving order and direction.
    pub fn map_keys<E>(&self, mut f: impl FnMut(&str) -> Result<String, E>) -> Result<Sort, E> {
        let mut keys = Vec::with_capacity(self.keys.len());
        for (key, order) in &self.keys {
            keys.push((f(key)?, *order));
        }
        Ok(Sort { keys })
    }

    /// `A ASC, B DESC` — the ORDER BY body, without the keyword.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for (i, (key, order)) in self.keys.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            out.push_str(key);
            out.push(' ');
            out.push_str(order.as_sql());
        }
        out
    }
}

/// A 0-based page request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub size: u64,
    pub sort: Sort,
}

impl PageRequest {
    pub fn new(page: u64, size: u64) -> Self {
        Self {
            page,
            size,
            sort: Sort::unsorted(),
        }
    }

    pub fn sorted(mut self, sort: Sort) -> Self {
        self.sort = sort;
        self
    }

    pub fn offset(&self) -> u64 {
        self.page * self.size
    }
}

/// One page of results plus the total row count of the unpaginated query.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u64,
    pub size: u64,
}

impl<T> Page<T> {
    pub fn empty(page: u64, size: u64) -> Self {
        Self {
            items: Vec::new(),
            total: 0,
            page,
            size,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn total_pages(&self) -> u64 {
        if self.size == 0 {
            0
        } else {
            self.total.div_ceil(self.size)
        }
    }
}
