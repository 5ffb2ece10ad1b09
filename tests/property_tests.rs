//! Property-based tests for statement building and value round trips
//!
//! These verify structural invariants of the query builder:
//! - bound parameter counts always match placeholder counts
//! - insert binds exactly the columns present in the reflected schema
//! - condition rendering preserves order and arity
//! - values survive an insert/select round trip unchanged

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use reflectql::db::builder::{build_delete, build_insert, build_update};
    use reflectql::db::condition::Filters;
    use reflectql::db::schema::{ColumnDef, TableSchema};
    use reflectql::engine::Engine;
    use reflectql::value::{RowData, Value};

    // Test infrastructure

    /// A fixed reflected schema with columns a, b, c
    fn abc_schema() -> TableSchema {
        let column = |name: &str| ColumnDef {
            name: name.to_string(),
            type_name: "TEXT".to_string(),
            notnull: false,
            pk: false,
            dflt_value: None,
        };
        TableSchema {
            name: "t".to_string(),
            columns: vec![column("a"), column("b"), column("c")],
        }
    }

    fn placeholder_count(sql: &str) -> usize {
        sql.matches('?').count()
    }

    fn arb_value() -> impl Strategy<Value = Value> {
        prop_oneof![
            Just(Value::Null),
            any::<i64>().prop_map(Value::Integer),
            "[a-zA-Z0-9 '\"%_-]{0,32}".prop_map(Value::Text),
            prop::collection::vec(any::<u8>(), 0..64).prop_map(Value::Blob),
        ]
    }

    // Property tests

    proptest! {
        /// Insert binds exactly the keys present in the schema, in order;
        /// unknown keys never reach the parameter vector.
        #[test]
        fn prop_insert_binds_only_known_columns(
            keys in prop::collection::btree_set("[a-f]", 0..6),
            value in any::<i64>(),
        ) {
            let mut row = RowData::new();
            for key in &keys {
                row = row.set(key, value);
            }

            let stmt = build_insert(&abc_schema(), &row);
            let known = keys.iter().filter(|k| ["a", "b", "c"].contains(&k.as_str())).count();

            prop_assert_eq!(stmt.params.len(), known);
            prop_assert_eq!(placeholder_count(&stmt.sql), known);
            if known == 0 {
                prop_assert!(stmt.sql.ends_with("DEFAULT VALUES"));
            }
            for key in keys.iter().filter(|k| !["a", "b", "c"].contains(&k.as_str())) {
                let quoted = format!("\"{}\"", key);
                prop_assert!(!stmt.sql.contains(&quoted));
            }
        }

        /// Condition rendering preserves arity and order
        #[test]
        fn prop_filters_preserve_arity_and_order(
            columns in prop::collection::vec("[abc]", 0..8),
            value in any::<i64>(),
        ) {
            let mut filters = Filters::new();
            for column in &columns {
                filters = filters.eq(column, value);
            }

            let predicate = filters.render(&abc_schema()).unwrap();
            prop_assert_eq!(predicate.params.len(), columns.len());
            match &predicate.clause {
                None => prop_assert!(columns.is_empty()),
                Some(clause) => {
                    prop_assert_eq!(clause.matches(" AND ").count(), columns.len() - 1);
                    prop_assert_eq!(clause.matches(" = ?").count(), columns.len());
                }
            }
        }

        /// Update and delete placeholder counts always match their
        /// parameter vectors
        #[test]
        fn prop_write_statements_balance_placeholders(
            set_columns in prop::collection::btree_set("[abc]", 1..4),
            filter_columns in prop::collection::vec("[abc]", 0..4),
            value in any::<i64>(),
        ) {
            let mut row = RowData::new();
            for column in &set_columns {
                row = row.set(column, value);
            }
            let mut filters = Filters::new();
            for column in &filter_columns {
                filters = filters.eq(column, value);
            }

            let update = build_update(&abc_schema(), &row, &filters).unwrap();
            prop_assert_eq!(update.params.len(), placeholder_count(&update.sql));

            let delete = build_delete(&abc_schema(), &filters).unwrap();
            prop_assert_eq!(delete.params.len(), placeholder_count(&delete.sql));
        }

        /// Any storable value survives an insert/select round trip
        #[test]
        fn prop_insert_select_round_trip(value in arb_value()) {
            let engine = Engine::open(":memory:").unwrap();
            engine
                .raw_query("CREATE TABLE kv (id INTEGER PRIMARY KEY, v)")
                .unwrap();

            let id = engine
                .insert("kv", &RowData::new().set("v", value.clone()))
                .unwrap();
            let row = engine
                .select_one("kv", &["v"], &Filters::new().eq("id", id))
                .unwrap()
                .unwrap();

            prop_assert_eq!(row.get(0), Some(&value));
        }
    }
}
