use sqlx::{MySql, MySqlExecutor, query::Query};
use sqlx::mysql::MySqlArguments;

/// ===============================
/// SQL bindable value enum
/// ===============================
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    String(String),
    U64(u64),
    Null,
}

impl From<Option<String>> for SqlValue {
    fn from(value: Option<String>) -> Self {
        value.map_or(SqlValue::Null, SqlValue::String)
    }
}

/// ===============================
/// SQL update container
/// ===============================
#[derive(Debug)]
pub struct SqlUpdate {
    pub sql: String,
    pub values: Vec<SqlValue>,
}

/// ===============================
/// Build a partial UPDATE from the columns that were supplied
/// ===============================
///
/// Column names come from the caller, never from request payloads. Returns
/// `None` when there is nothing to set.
pub fn build_update_sql(
    table: &str,
    columns: Vec<(&'static str, SqlValue)>,
    id_column: &str,
    id_value: u64,
) -> Option<SqlUpdate> {
    if columns.is_empty() {
        return None;
    }

    let set_clause = columns
        .iter()
        .map(|(column, _)| format!("{} = ?", column))
        .collect::<Vec<_>>()
        .join(", ");

    let sql = format!(
        "UPDATE {} SET {} WHERE {} = ?",
        table, set_clause, id_column
    );

    let mut values: Vec<SqlValue> = columns.into_iter().map(|(_, v)| v).collect();
    values.push(SqlValue::U64(id_value));

    Some(SqlUpdate { sql, values })
}

fn bind_all<'q>(
    mut query: Query<'q, MySql, MySqlArguments>,
    values: Vec<SqlValue>,
) -> Query<'q, MySql, MySqlArguments> {
    for value in values {
        query = match value {
            SqlValue::String(v) => query.bind(v),
            SqlValue::U64(v) => query.bind(v),
            SqlValue::Null => query.bind(None::<String>),
        };
    }
    query
}

/// ===============================
/// Execute the update
/// ===============================
pub async fn execute_update<'e, E>(executor: E, update: SqlUpdate) -> Result<u64, sqlx::Error>
where
    E: MySqlExecutor<'e>,
{
    let result = bind_all(sqlx::query(&update.sql), update.values)
        .execute(executor)
        .await?;
    Ok(result.rows_affected())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builds_set_clause_in_column_order() {
        let update = build_update_sql(
            "employee",
            vec![
                ("first_name", SqlValue::String("Jane".into())),
                ("bank_name", SqlValue::Null),
            ],
            "id",
            1001,
        )
        .unwrap();

        assert_eq!(
            update.sql,
            "UPDATE employee SET first_name = ?, bank_name = ? WHERE id = ?"
        );
        assert_eq!(update.values.len(), 3);
        assert_eq!(update.values[2], SqlValue::U64(1001));
    }

    #[test]
    fn test_no_columns_means_no_statement() {
        assert!(build_update_sql("employee", Vec::new(), "id", 1).is_none());
    }
}
