//! Generic CRUD and upsert engine.
//!
//! Every operation follows the same pipeline: resolve the entity descriptor
//! (cached per type), resolve the current datasource's dialect (cached per
//! datasource), render SQL from the descriptor's memoized fragments, hand
//! it to the execution primitive, map the outcome back. The engine never
//! inspects or retries executor errors.

use std::marker::PhantomData;
use std::sync::Arc;

use compact_str::CompactString;
use crossdao_core::registry;
use crossdao_core::{
    CrossdaoError, Entity, Executor, FromValue, Generator, Page, PageRequest, Params,
    Result, Sort, TableDescriptor, Value, crossdao_trace_query,
};
use crossdao_dialects::SqlDialect;

use crate::router::RoutingContext;

impl RoutingContext<'_> {
    /// A CRUD engine for `T` bound to this context's datasource selection.
    /// Fails when `T`'s declaration is invalid (`NotATableEntity`,
    /// `MultipleGeneratorColumns`).
    pub fn dao<T: Entity>(&self) -> Result<Dao<'_, T>> {
        Ok(Dao {
            context: self,
            descriptor: registry::table_of::<T>()?,
            _entity: PhantomData,
        })
    }
}

/// CRUD/upsert operations for one entity type against the context's current
/// datasource. Cheap to construct; holds only the shared descriptor.
pub struct Dao<'c, T: Entity> {
    context: &'c RoutingContext<'c>,
    descriptor: Arc<TableDescriptor>,
    _entity: PhantomData<fn() -> T>,
}

impl<T: Entity> Dao<'_, T> {
    pub fn descriptor(&self) -> &TableDescriptor {
        &self.descriptor
    }

    /// Looks up one row by primary-key values, given in key declaration
    /// order. The query is capped to one row via the dialect's top-N form.
    pub fn find_by_id(
        &self,
        keys: impl IntoIterator<Item = impl Into<Value>>,
    ) -> Result<Option<T>> {
        let params = self.key_params(keys)?;
        let dialect = self.dialect()?;
        let base = dialect.select_base(
            self.descriptor.table(),
            self.descriptor.select_columns(),
            &where_tail(self.descriptor.where_keys()),
        );
        let sql = dialect.top(&base, 1);
        self.query_optional(&sql, &params)
    }

    /// Looks up one row matching the entity's identifying values: its key
    /// columns when it has a primary key, every column otherwise.
    pub fn find(&self, entity: &T) -> Result<Option<T>> {
        let dialect = self.dialect()?;
        let base = dialect.select_base(
            self.descriptor.table(),
            self.descriptor.select_columns(),
            &where_tail(self.descriptor.where_clause()),
        );
        let sql = dialect.top(&base, 1);
        let params = entity.to_params().project(self.where_fields());
        self.query_optional(&sql, &params)
    }

    pub fn exist(&self, entity: &T) -> Result<bool> {
        let dialect = self.dialect()?;
        let sql = dialect.count(
            self.descriptor.table(),
            &where_tail(self.descriptor.where_clause()),
        );
        let params = entity.to_params().project(self.where_fields());
        Ok(self.fetch_count(&sql, &params)? > 0)
    }

    pub fn exist_by_id(&self, keys: impl IntoIterator<Item = impl Into<Value>>) -> Result<bool> {
        let params = self.key_params(keys)?;
        self.exist_where_keys(&params)
    }

    /// All rows, ordered by `sort` (entity field names; mapped to physical
    /// columns before rendering).
    pub fn find_all(&self, sort: &Sort) -> Result<Vec<T>> {
        let dialect = self.dialect()?;
        let base = dialect.select_base(self.descriptor.table(), self.descriptor.select_columns(), "");
        let sql = dialect.sort(&base, &self.mapped_sort(sort)?);
        self.query_many(&sql, &Params::new())
    }

    /// One page of rows plus the total count. Counts first; a zero total
    /// short-circuits without rendering or running the page query, so a
    /// dialect that cannot paginate still answers empty result sets.
    pub fn find_page(&self, request: &PageRequest) -> Result<Page<T>> {
        let dialect = self.dialect()?;
        let base = dialect.select_base(self.descriptor.table(), self.descriptor.select_columns(), "");
        let total = self.fetch_count(&dialect.count_wrapped(&base), &Params::new())?;
        if total == 0 {
            return Ok(Page::empty(request.page, request.size));
        }
        let sort = self.mapped_sort(&request.sort)?;
        let sql = dialect.paginate(&base, request.page, request.size, &sort)?;
        let items = self.query_many(&sql, &Params::new())?;
        Ok(Page {
            items,
            total,
            page: request.page,
            size: request.size,
        })
    }

    /// Inserts one row. A sequence-generated key is fetched and written
    /// onto the entity first, so it is part of the inserted values; an
    /// identity column stays out of the statement entirely.
    pub fn insert(&self, entity: &mut T) -> Result<u64> {
        self.assign_sequence_key(entity)?;
        let (sql, params) = self.render_insert(entity)?;
        self.execute(&sql, &params)
    }

    /// Inserts one row and writes the database-generated key back onto the
    /// entity. Without an identity column this is a plain [`insert`](Self::insert)
    /// (a sequence key is already known before the statement runs).
    pub fn retrieve_insert(&self, entity: &mut T) -> Result<u64> {
        self.assign_sequence_key(entity)?;
        let (sql, params) = self.render_insert(entity)?;
        if self.descriptor.auto_increment_field().is_none() {
            return self.execute(&sql, &params);
        }
        crossdao_trace_query!(&sql, params.len());
        let (count, key) = self.executor()?.execute_returning_key(&sql, &params)?;
        entity.set_generated_key(&key)?;
        Ok(count)
    }

    /// Updates one row. With a primary key: non-key columns are set and the
    /// key columns select the row. Without one: every column is set and the
    /// whole row selects itself (null values included), which only matches
    /// an unchanged row. When nothing remains to set, returns 0 affected
    /// rows without running any SQL.
    pub fn update(&self, entity: &T) -> Result<u64> {
        let set = self.update_set_clause();
        if set.is_empty() {
            return Ok(0);
        }
        let dialect = self.dialect()?;
        let sql = dialect.update(
            self.descriptor.table(),
            set,
            &where_tail(self.descriptor.where_clause()),
        );
        self.execute(&sql, &entity.to_params())
    }

    /// Updates only the entity's non-null, non-key columns. With a primary
    /// key the key columns select the row; without one the non-null columns
    /// do. An all-null entity affects 0 rows without running any SQL.
    pub fn update_with_not_null(&self, entity: &T) -> Result<u64> {
        let params = entity.to_params();
        let non_null = params.non_null();
        let key_fields = self.descriptor.key_fields();
        let set_fields: Vec<&str> = non_null
            .names()
            .filter(|n| !key_fields.iter().any(|k| k == n))
            .collect();
        if set_fields.is_empty() {
            return Ok(0);
        }
        let set = self.descriptor.set_clause_for(&set_fields);
        let dialect = self.dialect()?;

        if self.descriptor.has_primary_key() {
            let mut bound_fields = set_fields;
            bound_fields.extend(key_fields.iter().copied());
            let sql = dialect.update(
                self.descriptor.table(),
                &set,
                &where_tail(self.descriptor.where_keys()),
            );
            self.execute(&sql, &params.project(bound_fields))
        } else {
            let where_fields: Vec<&str> = non_null.names().collect();
            let where_body = self.descriptor.where_clause_for(&where_fields);
            let sql = dialect.update(self.descriptor.table(), &set, &where_tail(&where_body));
            self.execute(&sql, &non_null)
        }
    }

    /// Upsert. Updates when the entity has a primary key, all key values
    /// are non-null and a matching row exists; inserts otherwise (with
    /// generated-key write-back).
    pub fn save(&self, entity: &mut T) -> Result<u64> {
        if self.existing_row(entity)? {
            return self.update(entity);
        }
        self.retrieve_insert(entity)
    }

    /// [`save`](Self::save) whose update path only touches non-null columns.
    pub fn save_with_not_null(&self, entity: &mut T) -> Result<u64> {
        if self.existing_row(entity)? {
            return self.update_with_not_null(entity);
        }
        self.retrieve_insert(entity)
    }

    /// Deletes the row matching the entity's identifying values (keys, or
    /// the whole row without a primary key).
    pub fn delete(&self, entity: &T) -> Result<u64> {
        let dialect = self.dialect()?;
        let sql = dialect.delete(
            self.descriptor.table(),
            &where_tail(self.descriptor.where_clause()),
        );
        let params = entity.to_params().project(self.where_fields());
        self.execute(&sql, &params)
    }

    pub fn delete_by_id(&self, keys: impl IntoIterator<Item = impl Into<Value>>) -> Result<u64> {
        let params = self.key_params(keys)?;
        let dialect = self.dialect()?;
        let sql = dialect.delete(
            self.descriptor.table(),
            &where_tail(self.descriptor.where_keys()),
        );
        self.execute(&sql, &params)
    }

    /// Inserts every entity through one rendered statement and an ordered
    /// parameter list; returns per-element affected counts in input order.
    /// Sequence keys are assigned up front, one fetch per entity; generated
    /// identity keys are not captured for batches.
    pub fn insert_batch(&self, entities: &mut [T]) -> Result<Vec<u64>> {
        if entities.is_empty() {
            return Ok(Vec::new());
        }
        for entity in entities.iter_mut() {
            self.assign_sequence_key(entity)?;
        }
        let dialect = self.dialect()?;
        let sql = dialect.insert(
            self.descriptor.table(),
            self.descriptor.insert_columns(),
            self.descriptor.insert_values(),
        );
        let batches: Vec<Params> = entities
            .iter()
            .map(|e| e.to_params().project(self.descriptor.insert_fields()))
            .collect();
        self.execute_batch(&sql, &batches)
    }

    pub fn update_batch(&self, entities: &[T]) -> Result<Vec<u64>> {
        if entities.is_empty() {
            return Ok(Vec::new());
        }
        let set = self.update_set_clause();
        if set.is_empty() {
            return Ok(vec![0; entities.len()]);
        }
        let dialect = self.dialect()?;
        let sql = dialect.update(
            self.descriptor.table(),
            set,
            &where_tail(self.descriptor.where_clause()),
        );
        let batches: Vec<Params> = entities.iter().map(Entity::to_params).collect();
        self.execute_batch(&sql, &batches)
    }

    pub fn delete_batch(&self, entities: &[T]) -> Result<Vec<u64>> {
        if entities.is_empty() {
            return Ok(Vec::new());
        }
        let dialect = self.dialect()?;
        let sql = dialect.delete(
            self.descriptor.table(),
            &where_tail(self.descriptor.where_clause()),
        );
        let batches: Vec<Params> = entities
            .iter()
            .map(|e| e.to_params().project(self.where_fields()))
            .collect();
        self.execute_batch(&sql, &batches)
    }

    /// Upserts element by element; each entity decides between insert and
    /// update on its own key values.
    pub fn save_batch(&self, entities: &mut [T]) -> Result<Vec<u64>> {
        entities.iter_mut().map(|e| self.save(e)).collect()
    }

    fn executor(&self) -> Result<Arc<dyn Executor>> {
        self.context.executor()
    }

    fn dialect(&self) -> Result<Arc<dyn SqlDialect>> {
        self.context.dialect()
    }

    /// Binds key values to key fields, in declaration order.
    fn key_params(&self, keys: impl IntoIterator<Item = impl Into<Value>>) -> Result<Params> {
        let fields = self.descriptor.key_fields();
        if fields.is_empty() {
            return Err(CrossdaoError::NoPrimaryKey {
                entity: self.descriptor.type_name(),
            });
        }
        let values: Vec<Value> = keys.into_iter().map(Into::into).collect();
        if values.len() != fields.len() {
            return Err(CrossdaoError::ParameterCountMismatch {
                expected: fields.len(),
                actual: values.len(),
            });
        }
        Ok(fields
            .iter()
            .zip(values)
            .map(|(f, v)| (CompactString::from(*f), v))
            .collect())
    }

    /// Fields identifying a row: keys with a primary key, all fields
    /// otherwise.
    fn where_fields(&self) -> Vec<&'static str> {
        if self.descriptor.has_primary_key() {
            self.descriptor.key_fields().to_vec()
        } else {
            self.descriptor.columns().iter().map(|c| c.field()).collect()
        }
    }

    fn update_set_clause(&self) -> &str {
        if self.descriptor.has_primary_key() {
            self.descriptor.set_non_key()
        } else {
            self.descriptor.set_all()
        }
    }

    /// Rewrites sort keys from entity fields to physical columns; an
    /// unmapped field fails before any SQL is rendered.
    fn mapped_sort(&self, sort: &Sort) -> Result<Sort> {
        sort.map_keys(|field| self.descriptor.column_for(field).map(str::to_owned))
    }

    /// True when the upsert should take the update path: primary key
    /// declared, every key value non-null, and the row already present.
    fn existing_row(&self, entity: &T) -> Result<bool> {
        if !self.descriptor.has_primary_key() {
            return Ok(false);
        }
        let params = entity.to_params();
        let keys = self.descriptor.key_fields();
        let all_present = keys
            .iter()
            .all(|k| params.get(k).is_some_and(|v| !v.is_null()));
        if !all_present {
            return Ok(false);
        }
        self.exist_where_keys(&params.project(keys.iter().copied()))
    }

    fn exist_where_keys(&self, params: &Params) -> Result<bool> {
        let dialect = self.dialect()?;
        let sql = dialect.count(
            self.descriptor.table(),
            &where_tail(self.descriptor.where_keys()),
        );
        Ok(self.fetch_count(&sql, params)? > 0)
    }

    /// Pre-assigns a sequence-generated key so the value participates in
    /// the insert like any other column.
    fn assign_sequence_key(&self, entity: &mut T) -> Result<()> {
        let Some((_, Generator::Sequence(sequence))) = self.descriptor.generated() else {
            return Ok(());
        };
        let dialect = self.dialect()?;
        let sql = dialect.sequence_next(sequence)?;
        crossdao_trace_query!(&sql, 0usize);
        let row = self
            .executor()?
            .query_one(&sql, &Params::new())?
            .ok_or_else(|| CrossdaoError::execution("sequence query returned no row"))?;
        entity.set_generated_key(row.single()?)
    }

    fn render_insert(&self, entity: &T) -> Result<(String, Params)> {
        let dialect = self.dialect()?;
        let sql = dialect.insert(
            self.descriptor.table(),
            self.descriptor.insert_columns(),
            self.descriptor.insert_values(),
        );
        let params = entity.to_params().project(self.descriptor.insert_fields());
        Ok((sql, params))
    }

    fn query_optional(&self, sql: &str, params: &Params) -> Result<Option<T>> {
        crossdao_trace_query!(sql, params.len());
        match self.executor()?.query_one(sql, params)? {
            Some(row) => T::from_row(&row).map(Some),
            None => Ok(None),
        }
    }

    fn query_many(&self, sql: &str, params: &Params) -> Result<Vec<T>> {
        crossdao_trace_query!(sql, params.len());
        let rows = self.executor()?.query(sql, params)?;
        rows.iter().map(T::from_row).collect()
    }

    fn fetch_count(&self, sql: &str, params: &Params) -> Result<u64> {
        crossdao_trace_query!(sql, params.len());
        match self.executor()?.query_one(sql, params)? {
            Some(row) => u64::from_value(row.single()?),
            None => Ok(0),
        }
    }

    fn execute(&self, sql: &str, params: &Params) -> Result<u64> {
        crossdao_trace_query!(sql, params.len());
        self.executor()?.execute(sql, params)
    }

    fn execute_batch(&self, sql: &str, batches: &[Params]) -> Result<Vec<u64>> {
        crossdao_trace_query!(sql, batches.len());
        self.executor()?.execute_batch(sql, batches)
    }
}

fn where_tail(body: &str) -> String {
    if body.is_empty() {
        String::new()
    } else {
        format!("WHERE {body}")
    }
}
