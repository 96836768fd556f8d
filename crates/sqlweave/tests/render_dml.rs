//! Tests for rendering INSERT, UPDATE and DELETE statements.

mod common;
use common::*;

use sqlweave::ast::{DeleteStatement, UpdateStatement};
use sqlweave::builder::{col, delete_from, insert_into, select, update, SqlValue};
use sqlweave::dialect::Dialect;
use sqlweave::Error;

// ===================================================================
// INSERT
// ===================================================================

#[test]
fn insert_single_row() {
    let q = insert_into("users")
        .columns(&["name", "email", "active"])
        .values([
            text("Alice"),
            text("alice@example.com"),
            SqlValue::Bool(true),
        ])
        .build()
        .unwrap();
    let (rendered, params) = sql(q);
    assert_eq!(
        rendered,
        "INSERT INTO users (name, email, active) VALUES (?, ?, ?)"
    );
    assert_eq!(
        params,
        vec![text("Alice"), text("alice@example.com"), SqlValue::Bool(true)]
    );
}

#[test]
fn insert_multiple_rows_keeps_row_order() {
    let q = insert_into("products")
        .columns(&["sku", "price"])
        .values([text("A-1"), SqlValue::Float(9.5)])
        .values([text("B-2"), SqlValue::Float(12.0)])
        .values([text("C-3"), SqlValue::Null])
        .build()
        .unwrap();
    let (rendered, params) = render_with(q, &POSTGRES);
    assert_eq!(
        rendered,
        "INSERT INTO products (sku, price) VALUES ($1, $2), ($3, $4), ($5, $6)"
    );
    assert_eq!(
        params,
        vec![
            text("A-1"),
            SqlValue::Float(9.5),
            text("B-2"),
            SqlValue::Float(12.0),
            text("C-3"),
            SqlValue::Null,
        ]
    );
}

#[test]
fn insert_quotes_reserved_columns() {
    let q = insert_into("events")
        .columns(&["key", "value", "year"])
        .values([text("k"), text("v"), int(2024)])
        .build()
        .unwrap();
    assert_eq!(
        sql(q.clone()).0,
        "INSERT INTO events (\"key\", \"value\", \"year\") VALUES (?, ?, ?)"
    );
    assert_eq!(
        render_with(q, &SERVER).0,
        "INSERT INTO events (`key`, value, year) VALUES (?, ?, ?)"
    );
}

#[test]
fn insert_row_arity_mismatch() {
    let err = insert_into("users")
        .columns(&["name", "email"])
        .values(["Alice", "alice@example.com"])
        .values(["Bob"])
        .build()
        .unwrap_err();
    assert_eq!(
        err,
        Error::MalformedStatement(String::from(
            "INSERT row 2 has 1 values but 2 columns were named"
        ))
    );
}

#[test]
fn insert_without_columns_fails() {
    let err = insert_into("users").values(["Alice"]).build().unwrap_err();
    assert!(matches!(err, Error::MalformedStatement(_)));
}

// ===================================================================
// Upsert
// ===================================================================

#[test]
fn upsert_do_update_per_dialect() {
    let q = insert_into("inventory")
        .columns(&["sku", "qty"])
        .values([text("A-1"), int(5)])
        .on_conflict_do_update(&["sku"], &["qty"])
        .build()
        .unwrap();

    assert_eq!(
        render_with(q.clone(), &EMBEDDED).0,
        "INSERT INTO inventory (sku, qty) VALUES (?, ?) ON CONFLICT (sku) DO UPDATE SET qty = excluded.qty"
    );
    assert_eq!(
        render_with(q.clone(), &POSTGRES).0,
        "INSERT INTO inventory (sku, qty) VALUES ($1, $2) ON CONFLICT (sku) DO UPDATE SET qty = excluded.qty"
    );
    assert_eq!(
        render_with(q, &SERVER).0,
        "INSERT INTO inventory (sku, qty) VALUES (?, ?) ON DUPLICATE KEY UPDATE qty = VALUES(qty)"
    );
}

#[test]
fn upsert_do_nothing_per_dialect() {
    let q = insert_into("tags")
        .columns(&["label"])
        .values(["rust"])
        .on_conflict_do_nothing(&["label"])
        .build()
        .unwrap();

    assert_eq!(
        sql(q.clone()).0,
        "INSERT INTO tags (label) VALUES (?) ON CONFLICT (label) DO NOTHING"
    );
    assert_eq!(
        render_with(q, &SERVER).0,
        "INSERT IGNORE INTO tags (label) VALUES (?)"
    );
}

#[test]
fn upsert_without_target() {
    let q = insert_into("tags")
        .columns(&["label"])
        .values(["rust"])
        .on_conflict_do_nothing(&[])
        .build()
        .unwrap();
    assert_eq!(
        render_with(q, &POSTGRES).0,
        "INSERT INTO tags (label) VALUES ($1) ON CONFLICT DO NOTHING"
    );
}

#[test]
fn upsert_updating_uninserted_column_fails() {
    let err = insert_into("inventory")
        .columns(&["sku", "qty"])
        .values([text("A-1"), int(5)])
        .on_conflict_do_update(&["sku"], &["price"])
        .build()
        .unwrap_err();
    assert!(matches!(err, Error::MalformedStatement(msg) if msg.contains("price")));
}

// ===================================================================
// UPDATE
// ===================================================================

#[test]
fn update_with_where() {
    let q = update("users")
        .set("name", "Bob")
        .set("age", 31)
        .set("nickname", None::<String>)
        .where_clause(col("id").eq(7))
        .build()
        .unwrap();
    let (rendered, params) = sql(q);
    assert_eq!(
        rendered,
        "UPDATE users SET name = ?, age = ?, nickname = ? WHERE id = ?"
    );
    assert_eq!(params, vec![text("Bob"), int(31), SqlValue::Null, int(7)]);
}

#[test]
fn update_assignment_from_column() {
    let q = update("accounts")
        .set("previous_balance", col("balance"))
        .where_clause(col("accounts.id").eq(1))
        .build()
        .unwrap();
    assert_eq!(
        sql(q).0,
        "UPDATE accounts SET previous_balance = balance WHERE accounts.id = ?"
    );
}

#[test]
fn update_with_subquery_predicate() {
    let inactive = select(["user_id"])
        .from("logins")
        .where_clause(col("last_seen").lt("2023-01-01"))
        .build()
        .unwrap();
    let q = update("users")
        .set("active", false)
        .where_clause(col("id").in_subquery(inactive))
        .build()
        .unwrap();
    let (rendered, params) = render_with(q, &POSTGRES);
    assert_eq!(
        rendered,
        "UPDATE users SET active = $1 WHERE id IN (SELECT user_id FROM logins WHERE last_seen < $2)"
    );
    assert_eq!(params, vec![SqlValue::Bool(false), text("2023-01-01")]);
}

#[test]
fn update_without_where_renders_every_row() {
    let q = update("users").set("active", true).build().unwrap();
    assert_eq!(sql(q).0, "UPDATE users SET active = ?");
}

#[test]
fn update_require_where() {
    let err = update("users")
        .set("active", true)
        .require_where()
        .build()
        .unwrap_err();
    assert_eq!(
        err,
        Error::MalformedStatement(String::from("UPDATE users requires a WHERE clause"))
    );
}

#[test]
fn update_without_assignments_fails_at_render() {
    let statement = UpdateStatement {
        table: String::from("users"),
        assignments: vec![],
        where_clause: None,
    };
    assert_eq!(
        render_err(statement, &EMBEDDED),
        Error::MalformedStatement(String::from("UPDATE requires at least one assignment"))
    );
}

#[test]
fn update_with_unknown_qualifier() {
    let q = update("users")
        .set("active", false)
        .where_clause(col("u.id").eq(1))
        .build()
        .unwrap();
    assert_eq!(
        render_err(q, &SERVER),
        Error::UnresolvedColumn {
            qualifier: String::from("u"),
            column: String::from("id"),
        }
    );
}

// ===================================================================
// DELETE
// ===================================================================

#[test]
fn delete_with_where() {
    let q = delete_from("sessions")
        .where_clause(col("expires_at").lt("2024-01-01"))
        .or_where(col("revoked").eq(true))
        .build()
        .unwrap();
    let (rendered, params) = sql(q);
    assert_eq!(
        rendered,
        "DELETE FROM sessions WHERE expires_at < ? OR revoked = ?"
    );
    assert_eq!(params, vec![text("2024-01-01"), SqlValue::Bool(true)]);
}

#[test]
fn delete_without_where() {
    let q = delete_from("sessions").build().unwrap();
    assert_eq!(sql(q).0, "DELETE FROM sessions");
}

#[test]
fn delete_require_where() {
    let guarded = delete_from("sessions").require_where();
    assert!(!guarded.has_where_clause());
    assert_eq!(
        guarded.clone().build().unwrap_err(),
        Error::MalformedStatement(String::from(
            "DELETE FROM sessions requires a WHERE clause"
        ))
    );
    assert!(guarded.where_clause(col("id").eq(1)).build().is_ok());
}

#[test]
fn delete_reserved_table_name() {
    let q = delete_from("order").where_clause(col("id").eq(1)).build().unwrap();
    assert_eq!(render_with(q.clone(), &EMBEDDED).0, "DELETE FROM \"order\" WHERE id = ?");
    assert_eq!(render_with(q, &SERVER).0, "DELETE FROM `order` WHERE id = ?");
}

#[test]
fn delete_with_empty_table_fails_at_render() {
    let statement = DeleteStatement {
        table: String::new(),
        where_clause: None,
    };
    assert_eq!(
        render_err(statement, &POSTGRES),
        Error::MalformedStatement(String::from("DELETE requires a non-empty table name"))
    );
}

#[test]
fn dml_placeholders_match_params_in_every_dialect() {
    let q = update("orders")
        .set("status", "shipped")
        .set("shipped_at", "2024-05-01 10:00:00")
        .where_clause(col("id").in_list([1, 2, 3]))
        .build()
        .unwrap();
    for dialect in [&EMBEDDED as &dyn Dialect, &SERVER, &POSTGRES] {
        let (rendered, params) = render_with(q.clone(), dialect);
        assert_eq!(count_placeholders(&rendered, dialect), params.len());
        assert_eq!(params.len(), 5);
    }
}
