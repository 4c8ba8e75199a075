//! Document operations.
//!
//! This module implements [`DocumentStore`] on top of the `documents` table.

use chrono::Utc;
use rusqlite::params_from_iter;
use rusqlite::types::Value as SqlValue;
use serde_json::Value;
use uuid::Uuid;

use super::Database;
use crate::error::{DatabaseError, ServiceResult};
use crate::store::{DocumentStore, FilterClause, ID_FIELD, RawDocument, StoreFilter};

/// Render a filter as SQL conditions plus their bound parameters.
///
/// Field names only ever come from code (`&'static str`) and are still passed
/// as JSON paths through parameters, never spliced into the statement.
fn filter_sql(filter: &StoreFilter, params: &mut Vec<SqlValue>) -> String {
    let mut sql = String::new();

    for clause in filter.clauses() {
        params.push(SqlValue::Text(format!("$.{}", clause.field())));
        let path_idx = params.len();
        params.push(SqlValue::Text(clause.value().to_string()));
        let value_idx = params.len();

        match clause {
            FilterClause::Contains { .. } => sql.push_str(&format!(
                " AND json_type(documents.body, ?{path_idx}) = 'array' \
                 AND EXISTS (SELECT 1 FROM json_each(documents.body, ?{path_idx}) AS item \
                 WHERE item.type = 'text' AND item.value = ?{value_idx})"
            )),
            FilterClause::Equals { .. } => sql.push_str(&format!(
                " AND json_type(documents.body, ?{path_idx}) = 'text' \
                 AND json_extract(documents.body, ?{path_idx}) = ?{value_idx}"
            )),
        }
    }

    sql
}

impl DocumentStore for Database {
    fn create_document(&self, kind: &str, mut payload: RawDocument) -> ServiceResult<String> {
        let id = Uuid::new_v4().to_string();

        // The id lives in its own column; a client-supplied one is discarded
        payload.remove(ID_FIELD);
        let body = serde_json::to_string(&payload).map_err(DatabaseError::Serialization)?;

        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO documents (id, kind, body, created_at) VALUES (?1, ?2, ?3, ?4)",
            rusqlite::params![id, kind, body, Utc::now().to_rfc3339()],
        )
        .map_err(DatabaseError::Query)?;

        Ok(id)
    }

    fn get_documents(
        &self,
        kind: &str,
        filter: &StoreFilter,
        limit: usize,
    ) -> ServiceResult<Vec<RawDocument>> {
        let mut params = vec![SqlValue::Text(kind.to_string())];
        let conditions = filter_sql(filter, &mut params);
        params.push(SqlValue::Integer(
            i64::try_from(limit).unwrap_or(i64::MAX),
        ));
        let limit_idx = params.len();

        let sql = format!(
            "SELECT id, body FROM documents WHERE kind = ?1{conditions} ORDER BY seq LIMIT ?{limit_idx}"
        );

        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(&sql).map_err(DatabaseError::Query)?;

        let rows = stmt
            .query_map(params_from_iter(params), |row| {
                let id: String = row.get(0)?;
                let body: String = row.get(1)?;
                Ok((id, body))
            })
            .map_err(DatabaseError::Query)?;

        let mut docs = Vec::new();
        for row in rows {
            let (id, body) = row.map_err(DatabaseError::Query)?;
            let mut doc: RawDocument =
                serde_json::from_str(&body).map_err(DatabaseError::CorruptDocument)?;
            doc.insert(ID_FIELD.to_string(), Value::String(id));
            docs.push(doc);
        }

        Ok(docs)
    }

    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn list_collections(&self) -> ServiceResult<Vec<String>> {
        let conn = self.conn.lock().unwrap();

        let mut stmt = conn
            .prepare("SELECT DISTINCT kind FROM documents ORDER BY kind")
            .map_err(DatabaseError::Query)?;

        let rows = stmt
            .query_map([], |row| row.get(0))
            .map_err(DatabaseError::Query)?;

        let mut kinds = Vec::new();
        for row in rows {
            kinds.push(row.map_err(DatabaseError::Query)?);
        }

        Ok(kinds)
    }
}
