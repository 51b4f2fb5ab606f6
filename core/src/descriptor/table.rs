use compact_str::CompactString;
use smallvec::SmallVec;

use super::column::{ColumnDef, ColumnDescriptor, Generator};
use super::naming::Naming;
use crate::error::{CrossdaoError, Result};

/// Derived SQL fragments, computed once at descriptor construction.
#[derive(Debug, Clone)]
struct Fragments {
    /// `ID AS id, ACCOUNT_NAME AS name` (alias skipped when names match)
    select_columns: String,
    /// Insert column list, identity columns excluded
    insert_columns: String,
    /// Matching `:param` list
    insert_values: String,
    /// `COL = :field` over every column
    set_all: String,
    /// `COL = :field` over non-key columns
    set_non_key: String,
    /// `COL = :field AND ...` over key columns (empty without a key)
    where_keys: String,
    /// `COL = :field AND ...` over every column (whole-row fallback)
    where_all: String,
}

/// Immutable descriptor of one entity/table: qualified name, ordered
/// columns, derived key/generator metadata and memoized SQL fragments.
///
/// Valid only with a non-blank table name and at least one column, and with
/// at most one generator column; violations fail at construction, never at
/// query time.
#[derive(Debug, Clone)]
pub struct TableDescriptor {
    type_name: &'static str,
    table: CompactString,
    columns: SmallVec<[ColumnDescriptor; 8]>,
    key_fields: SmallVec<[&'static str; 2]>,
    generated: Option<(&'static str, Generator)>,
    fragments: Fragments,
}

impl TableDescriptor {
    pub fn builder(type_name: &'static str) -> TableBuilder {
        TableBuilder {
            type_name,
            table: None,
            schema: None,
            catalog: None,
            naming: Naming::default(),
            columns: Vec::new(),
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Qualified `catalog.schema.table` name.
    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn columns(&self) -> &[ColumnDescriptor] {
        &self.columns
    }

    pub fn has_primary_key(&self) -> bool {
        !self.key_fields.is_empty()
    }

    /// Field names of the primary-key columns, in declaration order.
    pub fn key_fields(&self) -> &[&'static str] {
        &self.key_fields
    }

    /// The single generated column, if any (identity or sequence).
    pub fn generated(&self) -> Option<(&'static str, Generator)> {
        self.generated
    }

    /// Field name of the identity column, if one exists.
    pub fn auto_increment_field(&self) -> Option<&'static str> {
        match self.generated {
            Some((field, Generator::Identity)) => Some(field),
            _ => None,
        }
    }

    pub fn select_columns(&self) -> &str {
        &self.fragments.select_columns
    }

    pub fn insert_columns(&self) -> &str {
        &self.fragments.insert_columns
    }

    pub fn insert_values(&self) -> &str {
        &self.fragments.insert_values
    }

    pub fn set_all(&self) -> &str {
        &self.fragments.set_all
    }

    pub fn set_non_key(&self) -> &str {
        &self.fragments.set_non_key
    }

    pub fn where_keys(&self) -> &str {
        &self.fragments.where_keys
    }

    pub fn where_all(&self) -> &str {
        &self.fragments.where_all
    }

    /// WHERE body for keyed operations: key columns when a primary key is
    /// declared, the whole-row fallback otherwise.
    pub fn where_clause(&self) -> &str {
        if self.has_primary_key() {
            &self.fragments.where_keys
        } else {
            &self.fragments.where_all
        }
    }

    /// Physical column name for an entity field.
    pub fn column_for(&self, field: &str) -> Result<&str> {
        self.columns
            .iter()
            .find(|c| c.field() == field)
            .map(|c| c.column())
            .ok_or_else(|| CrossdaoError::UnknownSortField {
                field: field.to_owned(),
            })
    }

    /// Fields that are insert parameters (everything but identity columns).
    pub fn insert_fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.columns
            .iter()
            .filter(|c| !c.is_auto_increment())
            .map(|c| c.field())
    }

    /// `COL = :field, ...` over the given fields, in declaration order.
    pub fn set_clause_for(&self, fields: &[&str]) -> String {
        assignment_list(self.columns.iter().filter(|c| fields.contains(&c.field())), ", ")
    }

    /// `COL = :field AND ...` over the given fields, in declaration order.
    pub fn where_clause_for(&self, fields: &[&str]) -> String {
        assignment_list(self.columns.iter().filter(|c| fields.contains(&c.field())), " AND ")
    }
}

fn assignment_list<'a>(
    columns: impl Iterator<Item = &'a ColumnDescriptor>,
    separator: &str,
) -> String {
    let mut buf = String::new();
    for (i, col) in columns.enumerate() {
        if i > 0 {
            buf.push_str(separator);
        }
        buf.push_str(col.column());
        buf.push_str(" = :");
        buf.push_str(col.field());
    }
    buf
}

/// Builder for [`TableDescriptor`]; the derive macro drives this, manual
/// impls may call it directly.
#[derive(Debug)]
pub struct TableBuilder {
    type_name: &'static str,
    table: Option<&'static str>,
    schema: Option<&'static str>,
    catalog: Option<&'static str>,
    naming: Naming,
    columns: Vec<ColumnDef>,
}

impl TableBuilder {
    /// Explicit table name; wins over the naming convention.
    pub fn table(mut self, name: &'static str) -> Self {
        self.table = Some(name);
        self
    }

    pub fn schema(mut self, schema: &'static str) -> Self {
        self.schema = Some(schema);
        self
    }

    pub fn catalog(mut self, catalog: &'static str) -> Self {
        self.catalog = Some(catalog);
        self
    }

    pub fn naming(mut self, naming: Naming) -> Self {
        self.naming = naming;
        self
    }

    pub fn column(mut self, def: ColumnDef) -> Self {
        self.columns.push(def);
        self
    }

    pub fn build(self) -> Result<TableDescriptor> {
        let type_name = self.type_name;
        let not_a_table = |reason: &str| CrossdaoError::NotATableEntity {
            entity: type_name,
            reason: reason.to_owned(),
        };

        let base = match self.table {
            Some(name) => name.to_owned(),
            None => self.naming.table.apply(type_name),
        };
        if base.trim().is_empty() {
            return Err(not_a_table("blank table name"));
        }
        if self.columns.is_empty() {
            return Err(not_a_table("no mapped columns"));
        }

        let columns: SmallVec<[ColumnDescriptor; 8]> = self
            .columns
            .iter()
            .map(|def| {
                let column = match def.name {
                    Some(name) => CompactString::from(name),
                    None => CompactString::from(self.naming.column.apply(def.field)),
                };
                ColumnDescriptor::new(def.field, column, def.key, def.generator)
            })
            .collect();

        let mut generated = None;
        for col in &columns {
            if let Some(generator) = col.generator() {
                if generated.is_some() {
                    return Err(CrossdaoError::MultipleGeneratorColumns { entity: type_name });
                }
                generated = Some((col.field(), generator));
            }
        }

        let key_fields: SmallVec<[&'static str; 2]> = columns
            .iter()
            .filter(|c| c.is_primary_key())
            .map(|c| c.field())
            .collect();

        let mut table = CompactString::default();
        for part in [self.catalog, self.schema, Some(base.as_str())]
            .into_iter()
            .flatten()
        {
            if !table.is_empty() {
                table.push('.');
            }
            table.push_str(part);
        }

        let fragments = build_fragments(&columns);

        Ok(TableDescriptor {
            type_name,
            table,
            columns,
            key_fields,
            generated,
            fragments,
        })
    }
}

fn build_fragments(columns: &[ColumnDescriptor]) -> Fragments {
    let mut select_columns = String::new();
    let mut insert_columns = String::new();
    let mut insert_values = String::new();

    for col in columns {
        if !select_columns.is_empty() {
            select_columns.push_str(", ");
        }
        select_columns.push_str(col.column());
        if col.column() != col.field() {
            select_columns.push_str(" AS ");
            select_columns.push_str(col.field());
        }

        // The database assigns identity values; keep those columns out of
        // the insert list.
        if !col.is_auto_increment() {
            if !insert_columns.is_empty() {
                insert_columns.push_str(", ");
                insert_values.push_str(", ");
            }
            insert_columns.push_str(col.column());
            insert_values.push(':');
            insert_values.push_str(col.field());
        }
    }

    Fragments {
        select_columns,
        insert_columns,
        insert_values,
        set_all: assignment_list(columns.iter(), ", "),
        set_non_key: assignment_list(columns.iter().filter(|c| !c.is_primary_key()), ", "),
        where_keys: assignment_list(columns.iter().filter(|c| c.is_primary_key()), " AND "),
        where_all: assignment_list(columns.iter(), " AND "),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account() -> TableDescriptor {
        TableDescriptor::builder("Account")
            .column(ColumnDef::new("id").key().generated(Generator::Identity))
            .column(ColumnDef::new("name"))
            .build()
            .unwrap()
    }

    #[test]
    fn fragments_exclude_identity_from_insert() {
        let desc = account();
        assert_eq!(desc.table(), "ACCOUNT");
        assert_eq!(desc.insert_columns(), "NAME");
        assert_eq!(desc.insert_values(), ":name");
        assert_eq!(desc.select_columns(), "ID AS id, NAME AS name");
        assert_eq!(desc.where_keys(), "ID = :id");
    }

    #[test]
    fn two_generator_columns_fail_fast() {
        let err = TableDescriptor::builder("Bad")
            .column(ColumnDef::new("a").generated(Generator::Identity))
            .column(ColumnDef::new("b").generated(Generator::Sequence("SEQ_B")))
            .build()
            .unwrap_err();
        assert!(matches!(err, CrossdaoError::MultipleGeneratorColumns { .. }));
    }

    #[test]
    fn qualified_name_prefixes_catalog_and_schema() {
        let desc = TableDescriptor::builder("Account")
            .catalog("CAT")
            .schema("APP")
            .column(ColumnDef::new("id").key())
            .build()
            .unwrap();
        assert_eq!(desc.table(), "CAT.APP.ACCOUNT");
    }

    #[test]
    fn no_columns_is_not_a_table() {
        let err = TableDescriptor::builder("Empty").build().unwrap_err();
        assert!(matches!(err, CrossdaoError::NotATableEntity { .. }));
    }
}
