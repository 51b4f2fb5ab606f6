mod common;

use common::{Account, Customer, SyncAccounts, Ticket};
use crossdao::{
    CaseStyle, ColumnDef, Entity, Generator, Naming, ProcedureEntity, TableDescriptor,
};

#[test]
fn derived_descriptor_matches_hand_built() {
    let derived = Account::descriptor().unwrap();
    let manual = TableDescriptor::builder("Account")
        .column(ColumnDef::new("id").key().generated(Generator::Identity))
        .column(ColumnDef::new("name"))
        .build()
        .unwrap();

    assert_eq!(derived.table(), manual.table());
    assert_eq!(derived.select_columns(), manual.select_columns());
    assert_eq!(derived.insert_columns(), manual.insert_columns());
    assert_eq!(derived.insert_values(), manual.insert_values());
    assert_eq!(derived.where_keys(), manual.where_keys());
    assert_eq!(derived.key_fields(), manual.key_fields());
}

#[test]
fn registry_resolution_converges_on_one_shared_descriptor() {
    use crossdao::registry;
    use std::sync::Arc;

    let handles: Vec<_> = (0..8)
        .map(|_| std::thread::spawn(|| registry::table_of::<Account>().unwrap()))
        .collect();
    let resolved: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    let first = registry::table_of::<Account>().unwrap();
    let second = registry::table_of::<Account>().unwrap();
    assert!(Arc::ptr_eq(&first, &second));

    // A first-use race may build redundantly, but every caller ends up on
    // the single stored descriptor with the same rendered fragments.
    for descriptor in &resolved {
        assert!(Arc::ptr_eq(descriptor, &first));
        assert_eq!(descriptor.select_columns(), first.select_columns());
        assert_eq!(descriptor.insert_columns(), first.insert_columns());
        assert_eq!(descriptor.where_keys(), first.where_keys());
    }
}

#[test]
fn identity_column_is_excluded_from_insert_lists() {
    let desc = Account::descriptor().unwrap();
    assert_eq!(desc.table(), "ACCOUNT");
    assert_eq!(desc.insert_columns(), "NAME");
    assert_eq!(desc.insert_values(), ":name");
    assert_eq!(desc.auto_increment_field(), Some("id"));
}

#[test]
fn sequence_column_stays_in_insert_lists() {
    let desc = Ticket::descriptor().unwrap();
    assert_eq!(desc.insert_columns(), "ID, SUBJECT");
    assert_eq!(desc.insert_values(), ":id, :subject");
    assert_eq!(desc.generated(), Some(("id", Generator::Sequence("SEQ_TICKET"))));
    assert_eq!(desc.auto_increment_field(), None);
}

#[test]
fn explicit_column_name_wins_over_convention() {
    let desc = Customer::descriptor().unwrap();
    assert_eq!(desc.column_for("email").unwrap(), "EMAIL_ADDR");
    assert_eq!(desc.column_for("city").unwrap(), "CITY");
    assert!(desc.select_columns().contains("EMAIL_ADDR AS email"));
}

#[test]
fn snake_naming_convention() {
    #[derive(Entity, Debug, Clone, Default)]
    #[entity(naming = "snake")]
    struct OrderLine {
        #[column(key)]
        line_no: Option<i64>,
        item_name: Option<String>,
    }

    let desc = OrderLine::descriptor().unwrap();
    assert_eq!(desc.table(), "order_line");
    assert_eq!(desc.column_for("line_no").unwrap(), "line_no");
}

#[test]
fn schema_and_catalog_qualify_the_table() {
    #[derive(Entity, Debug, Clone, Default)]
    #[entity(table = "ACCOUNT", schema = "APP", catalog = "CAT")]
    struct Qualified {
        #[column(key)]
        id: Option<i64>,
    }

    assert_eq!(Qualified::descriptor().unwrap().table(), "CAT.APP.ACCOUNT");
}

#[test]
fn skipped_field_defaults_on_row_mapping() {
    use crossdao::{FromRow, Row};

    #[derive(Entity, Debug, Clone, Default)]
    struct WithCache {
        #[column(key)]
        id: Option<i64>,
        #[column(skip)]
        cached_total: i64,
    }

    let desc = WithCache::descriptor().unwrap();
    assert_eq!(desc.columns().len(), 1);

    let mut row = Row::new();
    row.insert("id", 3i64);
    let entity = WithCache::from_row(&row).unwrap();
    assert_eq!(entity.id, Some(3));
    assert_eq!(entity.cached_total, 0);
}

#[test]
fn upper_snake_is_the_default_convention() {
    assert_eq!(CaseStyle::default(), CaseStyle::UpperSnake);
    let naming = Naming::default();
    assert_eq!(naming.table.apply("OrderLine"), "ORDER_LINE");
}

#[test]
fn procedure_descriptor_orders_bindings() {
    let desc = SyncAccounts::descriptor().unwrap();
    assert_eq!(desc.name(), "P_SYNC_ACCOUNTS");
    assert_eq!(desc.in_params(), ["cutoff"]);
    assert_eq!(desc.out_params(), ["processed"]);
    assert_eq!(desc.result_sets(), ["failed"]);
    assert!(desc.has_result_sets());
}
