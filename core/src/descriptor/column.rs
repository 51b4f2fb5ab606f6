use compact_str::CompactString;

/// How a column's value is produced at insert time.
///
/// `Identity` means the database assigns the value (auto-increment); such
/// columns are excluded from insert column/value lists entirely. A
/// `Sequence` column is a generated *value* but not an auto-increment
/// column: the engine fetches the next sequence value, assigns it to the
/// entity, and the column stays in the insert list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Generator {
    Identity,
    Sequence(&'static str),
}

/// Declarative input for one mapped field, consumed by
/// [`TableBuilder::column`](super::TableBuilder::column).
#[derive(Debug, Clone)]
pub struct ColumnDef {
    pub(crate) field: &'static str,
    pub(crate) name: Option<&'static str>,
    pub(crate) key: bool,
    pub(crate) generator: Option<Generator>,
}

impl ColumnDef {
    pub const fn new(field: &'static str) -> Self {
        Self {
            field,
            name: None,
            key: false,
            generator: None,
        }
    }

    /// Explicit column name; wins over the naming convention.
    pub const fn name(mut self, name: &'static str) -> Self {
        self.name = Some(name);
        self
    }

    pub const fn key(mut self) -> Self {
        self.key = true;
        self
    }

    pub const fn generated(mut self, generator: Generator) -> Self {
        self.generator = Some(generator);
        self
    }
}

/// One mapped table column. Immutable once built; the primary-key and
/// generator flags never change after construction.
#[derive(Debug, Clone)]
pub struct ColumnDescriptor {
    field: &'static str,
    column: CompactString,
    primary_key: bool,
    generator: Option<Generator>,
}

impl ColumnDescriptor {
    pub(crate) fn new(
        field: &'static str,
        column: CompactString,
        primary_key: bool,
        generator: Option<Generator>,
    ) -> Self {
        Self {
            field,
            column,
            primary_key,
            generator,
        }
    }

    /// The entity field name; doubles as the `:param` placeholder name.
    pub fn field(&self) -> &'static str {
        self.field
    }

    pub fn column(&self) -> &str {
        &self.column
    }

    pub fn is_primary_key(&self) -> bool {
        self.primary_key
    }

    pub fn generator(&self) -> Option<Generator> {
        self.generator
    }

    /// True only for the identity strategy; sequence columns are not
    /// auto-increment columns.
    pub fn is_auto_increment(&self) -> bool {
        matches!(self.generator, Some(Generator::Identity))
    }
}
