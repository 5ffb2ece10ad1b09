/// Condition Module
///
/// Equality-conjunction predicates: an ordered list of (column, value)
/// conditions combined with logical AND. This is the only predicate form
/// the engine supports — no OR, no inequality, no IS NULL. A hard design
/// constraint, not an oversight.
use crate::core::{ReflectqlError, Result};
use crate::db::quote_ident;
use crate::db::schema::TableSchema;
use crate::value::Value;

/// A single (column, value) pair interpreted as strict equality.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub column: String,
    pub value: Value,
}

/// An ordered conjunction of equality conditions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filters {
    conditions: Vec<Condition>,
}

/// A rendered predicate: a WHERE-clause body with one `?` placeholder per
/// bound value. `clause` is `None` for the empty conjunction, which
/// matches all rows.
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    pub clause: Option<String>,
    pub params: Vec<Value>,
}

impl Filters {
    pub fn new() -> Self {
        Filters::default()
    }

    /// Appends an equality condition on `column`.
    pub fn eq(mut self, column: &str, value: impl Into<Value>) -> Self {
        self.conditions.push(Condition {
            column: column.to_string(),
            value: value.into(),
        });
        self
    }

    pub fn len(&self) -> usize {
        self.conditions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Condition> {
        self.conditions.iter()
    }

    /// Renders the AND-conjunction against a reflected schema.
    ///
    /// Every condition column is validated against the schema before any
    /// statement is built. Empty filters render as the match-all
    /// predicate (no WHERE clause) — intentional: unconditioned updates
    /// and deletes touch every row.
    ///
    /// # Errors
    ///
    /// Returns `ReflectqlError::Schema` when a condition references a
    /// column the table does not have.
    pub fn render(&self, schema: &TableSchema) -> Result<Predicate> {
        for condition in &self.conditions {
            if !schema.contains(&condition.column) {
                return Err(ReflectqlError::Schema(format!(
                    "no such column '{}' in table '{}'",
                    condition.column, schema.name
                )));
            }
        }

        if self.conditions.is_empty() {
            return Ok(Predicate {
                clause: None,
                params: Vec::new(),
            });
        }

        let clause = self
            .conditions
            .iter()
            .map(|c| format!("{} = ?", quote_ident(&c.column)))
            .collect::<Vec<_>>()
            .join(" AND ");
        let params = self.conditions.iter().map(|c| c.value.clone()).collect();

        Ok(Predicate {
            clause: Some(clause),
            params,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::schema::ColumnDef;

    fn users_schema() -> TableSchema {
        let column = |name: &str, type_name: &str| ColumnDef {
            name: name.to_string(),
            type_name: type_name.to_string(),
            notnull: false,
            pk: false,
            dflt_value: None,
        };
        TableSchema {
            name: "users".to_string(),
            columns: vec![
                column("id", "INTEGER"),
                column("name", "TEXT"),
                column("age", "INTEGER"),
            ],
        }
    }

    #[test]
    fn test_render_conjunction() {
        let filters = Filters::new().eq("id", 1).eq("name", "a");
        let predicate = filters.render(&users_schema()).unwrap();

        assert_eq!(
            predicate.clause.as_deref(),
            Some("\"id\" = ? AND \"name\" = ?")
        );
        assert_eq!(
            predicate.params,
            vec![Value::Integer(1), Value::Text("a".to_string())]
        );
    }

    #[test]
    fn test_empty_filters_match_all() {
        let predicate = Filters::new().render(&users_schema()).unwrap();
        assert_eq!(predicate.clause, None);
        assert!(predicate.params.is_empty());
    }

    #[test]
    fn test_unknown_column_is_schema_error() {
        let filters = Filters::new().eq("missing", 1);
        match filters.render(&users_schema()) {
            Err(ReflectqlError::Schema(msg)) => {
                assert!(msg.contains("missing"));
                assert!(msg.contains("users"));
            }
            other => panic!("expected Schema error, got {:?}", other),
        }
    }

    #[test]
    fn test_condition_order_is_preserved() {
        let filters = Filters::new().eq("age", 2).eq("id", 1);
        let predicate = filters.render(&users_schema()).unwrap();
        assert_eq!(
            predicate.clause.as_deref(),
            Some("\"age\" = ? AND \"id\" = ?")
        );
        assert_eq!(predicate.params, vec![Value::Integer(2), Value::Integer(1)]);
    }
}
