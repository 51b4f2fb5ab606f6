mod common;

use common::{Account, AuditEvent, Customer, Ticket, account, mock_router};
use crossdao::{CrossdaoError, PageRequest, Sort, Value};

#[test]
fn find_by_id_caps_to_one_row() {
    let (router, executor) = mock_router("MySQL", "8.0");
    let ctx = router.context();
    let dao = ctx.dao::<Account>().unwrap();

    executor.push_rows(vec![account(7, "Ada")]);
    let found = dao.find_by_id([7i64]).unwrap();
    assert_eq!(
        found,
        Some(Account {
            id: Some(7),
            name: "Ada".to_owned(),
        })
    );

    let calls = executor.calls();
    assert_eq!(
        calls[0].sql,
        "SELECT ID AS id, NAME AS name FROM ACCOUNT WHERE ID = :id LIMIT 1"
    );
    assert_eq!(calls[0].params[0].get("id"), Some(&Value::Int(7)));
}

#[test]
fn find_by_id_misses_cleanly() {
    let (router, executor) = mock_router("MySQL", "8.0");
    let ctx = router.context();
    let dao = ctx.dao::<Account>().unwrap();

    executor.push_rows(Vec::new());
    assert_eq!(dao.find_by_id([99i64]).unwrap(), None);
}

#[test]
fn wrong_key_arity_is_rejected_before_any_sql() {
    let (router, executor) = mock_router("MySQL", "8.0");
    let ctx = router.context();
    let dao = ctx.dao::<Account>().unwrap();

    let err = dao.find_by_id([1i64, 2]).unwrap_err();
    assert!(matches!(
        err,
        CrossdaoError::ParameterCountMismatch {
            expected: 1,
            actual: 2
        }
    ));
    assert_eq!(executor.call_count(), 0);
}

#[test]
fn keyed_lookup_without_primary_key_is_rejected() {
    let (router, executor) = mock_router("MySQL", "8.0");
    let ctx = router.context();
    let dao = ctx.dao::<AuditEvent>().unwrap();

    let err = dao.delete_by_id([1i64]).unwrap_err();
    assert!(matches!(err, CrossdaoError::NoPrimaryKey { entity: "AuditEvent" }));
    assert_eq!(executor.call_count(), 0);
}

#[test]
fn retrieve_insert_excludes_identity_and_writes_the_key_back() {
    let (router, executor) = mock_router("MySQL", "8.0");
    let ctx = router.context();
    let dao = ctx.dao::<Account>().unwrap();

    let mut entity = Account {
        id: None,
        name: "Ada".to_owned(),
    };
    executor.push_generated_key(1, 42i64);

    assert_eq!(dao.retrieve_insert(&mut entity).unwrap(), 1);
    assert_eq!(entity.id, Some(42));

    let calls = executor.calls();
    assert_eq!(calls[0].sql, "INSERT INTO ACCOUNT (NAME) VALUES (:name)");
    let names: Vec<_> = calls[0].params[0].names().collect();
    assert_eq!(names, ["name"]);
}

#[test]
fn generated_key_coerces_from_text() {
    let (router, executor) = mock_router("MySQL", "8.0");
    let ctx = router.context();
    let dao = ctx.dao::<Account>().unwrap();

    let mut entity = Account::default();
    executor.push_generated_key(1, "42");
    dao.retrieve_insert(&mut entity).unwrap();
    assert_eq!(entity.id, Some(42));
}

#[test]
fn sequence_key_is_fetched_before_the_insert() {
    let (router, executor) = mock_router("H2", "2.2");
    let ctx = router.context();
    let dao = ctx.dao::<Ticket>().unwrap();

    let mut ticket = Ticket {
        id: None,
        subject: "Printer on fire".to_owned(),
    };
    executor.push_scalar(101i64);
    executor.push_affected(1);

    assert_eq!(dao.insert(&mut ticket).unwrap(), 1);
    assert_eq!(ticket.id, Some(101));

    let calls = executor.calls();
    assert_eq!(calls[0].sql, "SELECT NEXT VALUE FOR SEQ_TICKET");
    assert_eq!(
        calls[1].sql,
        "INSERT INTO TICKET (ID, SUBJECT) VALUES (:id, :subject)"
    );
    assert_eq!(calls[1].params[0].get("id"), Some(&Value::Int(101)));
}

#[test]
fn sequence_insert_fails_where_the_product_has_no_sequences() {
    let (router, executor) = mock_router("MySQL", "8.0");
    let ctx = router.context();
    let dao = ctx.dao::<Ticket>().unwrap();

    let err = dao.insert(&mut Ticket::default()).unwrap_err();
    assert!(matches!(err, CrossdaoError::UnsupportedOperation { .. }));
    assert_eq!(executor.call_count(), 0);
}

#[test]
fn update_sets_non_key_columns_selected_by_key() {
    let (router, executor) = mock_router("MySQL", "8.0");
    let ctx = router.context();
    let dao = ctx.dao::<Customer>().unwrap();

    let entity = Customer {
        id: Some(7),
        name: Some("Ada".to_owned()),
        email: Some("ada@example.com".to_owned()),
        city: Some("London".to_owned()),
        score: Some(10),
    };
    executor.push_affected(1);

    assert_eq!(dao.update(&entity).unwrap(), 1);
    assert_eq!(
        executor.calls()[0].sql,
        "UPDATE CUSTOMER SET NAME = :name, EMAIL_ADDR = :email, CITY = :city, \
         SCORE = :score WHERE ID = :id"
    );
}

#[test]
fn keyless_update_falls_back_to_the_whole_row() {
    let (router, executor) = mock_router("MySQL", "8.0");
    let ctx = router.context();
    let dao = ctx.dao::<AuditEvent>().unwrap();

    let entity = AuditEvent {
        actor: Some("root".to_owned()),
        action: None,
    };
    executor.push_affected(1);

    dao.update(&entity).unwrap();
    assert_eq!(
        executor.calls()[0].sql,
        "UPDATE AUDIT_EVENT SET ACTOR = :actor, ACTION = :action \
         WHERE ACTOR = :actor AND ACTION = :action"
    );
    // The null action is bound, not dropped; a row whose ACTION differs
    // will not match.
    assert_eq!(
        executor.calls()[0].params[0].get("action"),
        Some(&Value::Null)
    );
}

#[test]
fn update_with_not_null_touches_only_present_columns() {
    let (router, executor) = mock_router("MySQL", "8.0");
    let ctx = router.context();
    let dao = ctx.dao::<Customer>().unwrap();

    let entity = Customer {
        id: Some(7),
        name: Some("Ada".to_owned()),
        email: None,
        city: Some("London".to_owned()),
        score: None,
    };
    executor.push_affected(1);

    assert_eq!(dao.update_with_not_null(&entity).unwrap(), 1);
    let call = &executor.calls()[0];
    assert_eq!(
        call.sql,
        "UPDATE CUSTOMER SET NAME = :name, CITY = :city WHERE ID = :id"
    );
    let names: Vec<_> = call.params[0].names().collect();
    assert_eq!(names, ["id", "name", "city"]);
}

#[test]
fn update_with_not_null_on_an_all_null_entity_runs_nothing() {
    let (router, executor) = mock_router("MySQL", "8.0");
    let ctx = router.context();
    let dao = ctx.dao::<Customer>().unwrap();

    let entity = Customer {
        id: Some(7),
        ..Customer::default()
    };
    assert_eq!(dao.update_with_not_null(&entity).unwrap(), 0);
    assert_eq!(executor.call_count(), 0);
}

#[test]
fn keyless_update_with_not_null_selects_by_non_null_columns() {
    let (router, executor) = mock_router("MySQL", "8.0");
    let ctx = router.context();
    let dao = ctx.dao::<AuditEvent>().unwrap();

    let entity = AuditEvent {
        actor: Some("root".to_owned()),
        action: None,
    };
    executor.push_affected(1);

    dao.update_with_not_null(&entity).unwrap();
    assert_eq!(
        executor.calls()[0].sql,
        "UPDATE AUDIT_EVENT SET ACTOR = :actor WHERE ACTOR = :actor"
    );
}

#[test]
fn save_inserts_when_the_key_is_absent() {
    let (router, executor) = mock_router("MySQL", "8.0");
    let ctx = router.context();
    let dao = ctx.dao::<Account>().unwrap();

    let mut entity = Account {
        id: None,
        name: "Ada".to_owned(),
    };
    executor.push_generated_key(1, 42i64);

    assert_eq!(dao.save(&mut entity).unwrap(), 1);
    assert_eq!(entity.id, Some(42));
    // No existence lookup for a null key.
    assert_eq!(executor.call_count(), 1);
    assert!(executor.calls()[0].sql.starts_with("INSERT"));
}

#[test]
fn save_updates_when_the_row_exists() {
    let (router, executor) = mock_router("MySQL", "8.0");
    let ctx = router.context();
    let dao = ctx.dao::<Account>().unwrap();

    let mut entity = Account {
        id: Some(7),
        name: "Ada".to_owned(),
    };
    executor.push_scalar(1i64);
    executor.push_affected(1);

    assert_eq!(dao.save(&mut entity).unwrap(), 1);
    let calls = executor.calls();
    assert_eq!(calls[0].sql, "SELECT COUNT(*) FROM ACCOUNT WHERE ID = :id");
    assert_eq!(calls[1].sql, "UPDATE ACCOUNT SET NAME = :name WHERE ID = :id");
}

#[test]
fn save_inserts_when_the_keyed_row_is_missing() {
    let (router, executor) = mock_router("MySQL", "8.0");
    let ctx = router.context();
    let dao = ctx.dao::<Account>().unwrap();

    let mut entity = Account {
        id: Some(7),
        name: "Ada".to_owned(),
    };
    executor.push_scalar(0i64);
    executor.push_generated_key(1, 7i64);

    assert_eq!(dao.save(&mut entity).unwrap(), 1);
    assert!(executor.calls()[1].sql.starts_with("INSERT"));
}

#[test]
fn find_page_counts_first_and_short_circuits_on_zero() {
    let (router, executor) = mock_router("MySQL", "8.0");
    let ctx = router.context();
    let dao = ctx.dao::<Account>().unwrap();

    executor.push_scalar(0i64);
    let page = dao.find_page(&PageRequest::new(2, 10)).unwrap();
    assert!(page.is_empty());
    assert_eq!(page.total, 0);

    let calls = executor.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(
        calls[0].sql,
        "SELECT COUNT(*) FROM (SELECT ID AS id, NAME AS name FROM ACCOUNT) C"
    );
}

#[test]
fn find_page_renders_the_dialect_window() {
    let (router, executor) = mock_router("MySQL", "8.0");
    let ctx = router.context();
    let dao = ctx.dao::<Account>().unwrap();

    executor.push_scalar(21i64);
    executor.push_rows(vec![account(20, "Ada")]);

    let request = PageRequest::new(2, 10).sorted(Sort::by("name"));
    let page = dao.find_page(&request).unwrap();
    assert_eq!(page.total, 21);
    assert_eq!(page.total_pages(), 3);
    assert_eq!(page.items.len(), 1);

    assert_eq!(
        executor.calls()[1].sql,
        "SELECT T.* FROM (SELECT ID AS id, NAME AS name FROM ACCOUNT) T \
         ORDER BY NAME ASC LIMIT 20, 10"
    );
}

#[test]
fn find_page_fails_where_the_dialect_cannot_paginate() {
    let (router, executor) = mock_router("PostgreSQL", "16.0");
    let ctx = router.context();
    let dao = ctx.dao::<Account>().unwrap();

    executor.push_scalar(3i64);
    let err = dao
        .find_page(&PageRequest::new(0, 10).sorted(Sort::by("name")))
        .unwrap_err();
    assert!(matches!(
        err,
        CrossdaoError::UnsupportedOperation {
            dialect: "postgresql",
            ..
        }
    ));
}

#[test]
fn sort_fields_map_to_physical_columns() {
    let (router, executor) = mock_router("MySQL", "8.0");
    let ctx = router.context();
    let dao = ctx.dao::<Customer>().unwrap();

    executor.push_rows(Vec::new());
    dao.find_all(&Sort::by_desc("email")).unwrap();
    assert_eq!(
        executor.calls()[0].sql,
        "SELECT ID AS id, NAME AS name, EMAIL_ADDR AS email, CITY AS city, \
         SCORE AS score FROM CUSTOMER ORDER BY EMAIL_ADDR DESC"
    );

    let err = dao.find_all(&Sort::by("signup_date")).unwrap_err();
    assert!(matches!(err, CrossdaoError::UnknownSortField { field } if field == "signup_date"));
}

#[test]
fn exist_counts_by_identifying_columns() {
    let (router, executor) = mock_router("MySQL", "8.0");
    let ctx = router.context();
    let dao = ctx.dao::<Customer>().unwrap();

    let entity = Customer {
        id: Some(7),
        ..Customer::default()
    };
    executor.push_scalar(1i64);
    assert!(dao.exist(&entity).unwrap());
    assert_eq!(
        executor.calls()[0].sql,
        "SELECT COUNT(*) FROM CUSTOMER WHERE ID = :id"
    );

    executor.push_scalar(0i64);
    assert!(!dao.exist_by_id([8i64]).unwrap());
}

#[test]
fn insert_batch_renders_once_and_keeps_input_order() {
    let (router, executor) = mock_router("MySQL", "8.0");
    let ctx = router.context();
    let dao = ctx.dao::<Customer>().unwrap();

    let mut entities = vec![
        Customer {
            id: Some(1),
            name: Some("Ada".to_owned()),
            ..Customer::default()
        },
        Customer {
            id: Some(2),
            name: Some("Grace".to_owned()),
            ..Customer::default()
        },
    ];
    executor.push_affected_each(vec![1, 1]);

    let counts = dao.insert_batch(&mut entities).unwrap();
    assert_eq!(counts, [1, 1]);

    let calls = executor.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(
        calls[0].sql,
        "INSERT INTO CUSTOMER (ID, NAME, EMAIL_ADDR, CITY, SCORE) \
         VALUES (:id, :name, :email, :city, :score)"
    );
    assert_eq!(calls[0].params.len(), 2);
    assert_eq!(calls[0].params[0].get("id"), Some(&Value::Int(1)));
    assert_eq!(calls[0].params[1].get("id"), Some(&Value::Int(2)));
}

#[test]
fn empty_batches_run_nothing() {
    let (router, executor) = mock_router("MySQL", "8.0");
    let ctx = router.context();
    let dao = ctx.dao::<Customer>().unwrap();

    assert!(dao.insert_batch(&mut []).unwrap().is_empty());
    assert!(dao.update_batch(&[]).unwrap().is_empty());
    assert!(dao.delete_batch(&[]).unwrap().is_empty());
    assert_eq!(executor.call_count(), 0);
}

#[test]
fn delete_batch_binds_identifying_values_per_element() {
    let (router, executor) = mock_router("MySQL", "8.0");
    let ctx = router.context();
    let dao = ctx.dao::<Account>().unwrap();

    let entities = vec![
        Account {
            id: Some(1),
            name: "Ada".to_owned(),
        },
        Account {
            id: Some(2),
            name: "Grace".to_owned(),
        },
    ];
    executor.push_affected_each(vec![1, 0]);

    let counts = dao.delete_batch(&entities).unwrap();
    assert_eq!(counts, [1, 0]);

    let call = &executor.calls()[0];
    assert_eq!(call.sql, "DELETE FROM ACCOUNT WHERE ID = :id");
    let first: Vec<_> = call.params[0].names().collect();
    assert_eq!(first, ["id"]);
}

#[test]
fn save_batch_upserts_element_by_element() {
    let (router, executor) = mock_router("MySQL", "8.0");
    let ctx = router.context();
    let dao = ctx.dao::<Account>().unwrap();

    let mut entities = vec![
        // Existing row: count lookup then update.
        Account {
            id: Some(1),
            name: "Ada".to_owned(),
        },
        // Fresh row: straight insert.
        Account {
            id: None,
            name: "Grace".to_owned(),
        },
    ];
    executor.push_scalar(1i64);
    executor.push_affected(1);
    executor.push_generated_key(1, 9i64);

    let counts = dao.save_batch(&mut entities).unwrap();
    assert_eq!(counts, [1, 1]);
    assert_eq!(entities[1].id, Some(9));

    let sqls: Vec<_> = executor.calls().iter().map(|c| c.sql.clone()).collect();
    assert!(sqls[0].starts_with("SELECT COUNT"));
    assert!(sqls[1].starts_with("UPDATE"));
    assert!(sqls[2].starts_with("INSERT"));
}

#[test]
fn executor_errors_pass_through_verbatim() {
    let (router, executor) = mock_router("MySQL", "8.0");
    let ctx = router.context();
    let dao = ctx.dao::<Account>().unwrap();

    executor.push_failure("deadlock detected");
    let err = dao.find_all(&Sort::unsorted()).unwrap_err();
    assert!(matches!(err, CrossdaoError::Execution(ref msg) if msg.contains("deadlock")));
}

#[test]
fn operations_follow_a_datasource_switch() {
    use common::MockExecutor;
    use crossdao::{Executor, Router};
    use std::sync::Arc;

    let main = Arc::new(MockExecutor::new("MySQL", "8.0"));
    let reporting = Arc::new(MockExecutor::new("Oracle", "19.0"));
    let router = Router::builder()
        .datasource("main", main.clone() as Arc<dyn Executor>)
        .datasource("reporting", reporting.clone() as Arc<dyn Executor>)
        .build()
        .unwrap();
    let ctx = router.context();

    reporting.push_rows(Vec::new());
    ctx.with_datasource("reporting", |ctx| {
        let dao = ctx.dao::<Account>().unwrap();
        dao.find_by_id([1i64]).unwrap();
    })
    .unwrap();

    assert_eq!(main.call_count(), 0);
    assert_eq!(reporting.call_count(), 1);
    // Oracle top-N, not MySQL LIMIT.
    assert!(reporting.calls()[0].sql.ends_with("FETCH FIRST 1 ROWS ONLY"));
}
