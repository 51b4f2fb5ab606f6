use compact_str::CompactString;

use super::naming::Naming;
use crate::error::{CrossdaoError, Result};

/// Immutable descriptor of one stored procedure: qualified name plus the
/// ordered input-parameter, output-parameter and result-set binding names.
/// A type is a stored-procedure entity iff the procedure name is non-blank.
#[derive(Debug, Clone)]
pub struct ProcedureDescriptor {
    type_name: &'static str,
    name: CompactString,
    schema: Option<CompactString>,
    catalog: Option<CompactString>,
    in_params: Vec<&'static str>,
    out_params: Vec<&'static str>,
    result_sets: Vec<&'static str>,
}

impl ProcedureDescriptor {
    pub fn builder(type_name: &'static str) -> ProcedureBuilder {
        ProcedureBuilder {
            type_name,
            name: None,
            schema: None,
            catalog: None,
            naming: Naming::default(),
            in_params: Vec::new(),
            out_params: Vec::new(),
            result_sets: Vec::new(),
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn schema(&self) -> Option<&str> {
        self.schema.as_deref()
    }

    pub fn catalog(&self) -> Option<&str> {
        self.catalog.as_deref()
    }

    pub fn in_params(&self) -> &[&'static str] {
        &self.in_params
    }

    pub fn out_params(&self) -> &[&'static str] {
        &self.out_params
    }

    pub fn result_sets(&self) -> &[&'static str] {
        &self.result_sets
    }

    pub fn has_result_sets(&self) -> bool {
        !self.result_sets.is_empty()
    }

    /// `catalog.schema.name` with absent parts skipped.
    pub fn qualified_name(&self) -> String {
        let mut out = String::new();
        for part in [
            self.catalog.as_deref(),
            self.schema.as_deref(),
            Some(self.name.as_str()),
        ]
        .into_iter()
        .flatten()
        {
            if !out.is_empty() {
                out.push('.');
            }
            out.push_str(part);
        }
        out
    }
}

#[derive(Debug)]
pub struct ProcedureBuilder {
    type_name: &'static str,
    name: Option<&'static str>,
    schema: Option<&'static str>,
    catalog: Option<&'static str>,
    naming: Naming,
    in_params: Vec<&'static str>,
    out_params: Vec<&'static str>,
    result_sets: Vec<&'static str>,
}

impl ProcedureBuilder {
    pub fn name(mut self, name: &'static str) -> Self {
        self.name = Some(name);
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

    pub fn input(mut self, param: &'static str) -> Self {
        self.in_params.push(param);
        self
    }

    pub fn output(mut self, param: &'static str) -> Self {
        self.out_params.push(param);
        self
    }

    pub fn result_set(mut self, name: &'static str) -> Self {
        self.result_sets.push(name);
        self
    }

    pub fn build(self) -> Result<ProcedureDescriptor> {
        let name = match self.name {
            Some(name) => name.to_owned(),
            None => self.naming.table.apply(self.type_name),
        };
        if name.trim().is_empty() {
            return Err(CrossdaoError::NotAStoredProcedureEntity {
                entity: self.type_name,
                reason: "blank procedure name".to_owned(),
            });
        }

        Ok(ProcedureDescriptor {
            type_name: self.type_name,
            name: CompactString::from(name),
            schema: self.schema.map(CompactString::from),
            catalog: self.catalog.map(CompactString::from),
            in_params: self.in_params,
            out_params: self.out_params,
            result_sets: self.result_sets,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_defaults_from_type_name() {
        let desc = ProcedureDescriptor::builder("SyncAccounts")
            .input("cutoff")
            .output("processed")
            .build()
            .unwrap();
        assert_eq!(desc.name(), "SYNC_ACCOUNTS");
        assert_eq!(desc.qualified_name(), "SYNC_ACCOUNTS");
    }

    #[test]
    fn qualified_name_includes_schema_and_catalog() {
        let desc = ProcedureDescriptor::builder("X")
            .name("P_SYNC")
            .schema("APP")
            .catalog("CAT")
            .build()
            .unwrap();
        assert_eq!(desc.qualified_name(), "CAT.APP.P_SYNC");
    }
}
