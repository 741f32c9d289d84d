//! SQLite document collection implementation.
//!
//! Each collection is one table. The filterable fields get their own
//! columns and the payload is kept as JSON:
//!
//! ```text
//! id INTEGER PRIMARY KEY, doc_id INTEGER, doc_version INTEGER, doc TEXT
//! ```
//!
//! with a unique index on (`doc_id`, `doc_version`).
//!
//! # Example
//!
//! ```ignore
//! use folio_stores::SqliteCollection;
//!
//! let collection = SqliteCollection::open("/var/lib/folio/documents.db", "one")?;
//! ```

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use rusqlite::{params, params_from_iter, Connection};

use folio_core::error::{ErrorCode, FolioError, FolioResult};
use folio_core::traits::{CollectionProvider, DocumentCollection, DocumentCursor};
use folio_core::types::{
    ClientDocument, DocumentField, Filter, FilterTranslator, FindOptions, SortDirection,
    StoredDocument,
};

/// A WHERE clause with its positional parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SqlWhere {
    /// Clause text including the leading ` WHERE`, or empty.
    pub clause: String,
    /// Values bound to `?1`, `?2`, ...
    pub params: Vec<i64>,
}

/// Translates [`Filter`]s into SQL against the collection table.
#[derive(Debug, Clone, Copy, Default)]
pub struct SqliteFilterTranslator;

impl SqliteFilterTranslator {
    fn column(field: DocumentField) -> &'static str {
        match field {
            DocumentField::DocId => "doc_id",
            DocumentField::DocVersion => "doc_version",
        }
    }
}

impl FilterTranslator for SqliteFilterTranslator {
    type Output = SqlWhere;
    type Error = FolioError;

    fn translate(&self, filter: &Filter) -> Result<SqlWhere, FolioError> {
        if filter.is_empty() {
            return Ok(SqlWhere::default());
        }

        let conditions: Vec<String> = filter
            .conditions
            .iter()
            .enumerate()
            .map(|(i, cond)| format!("{} = ?{}", Self::column(cond.field), i + 1))
            .collect();

        Ok(SqlWhere {
            clause: format!(" WHERE {}", conditions.join(" AND ")),
            params: filter.conditions.iter().map(|c| c.value).collect(),
        })
    }
}

/// SQLite-backed document collection.
pub struct SqliteCollection {
    /// SQLite connection (wrapped in Mutex for Send + Sync).
    conn: Mutex<Connection>,
    /// Table name.
    table: String,
}

impl SqliteCollection {
    /// Open (or create) a collection in the database file at `path`.
    pub fn open(path: impl AsRef<Path>, table: &str) -> FolioResult<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path).map_err(|e| FolioError::Collection {
            message: format!("Failed to open SQLite database {}: {}", path.display(), e),
            code: ErrorCode::ColConnectionFailed,
            source: Some(Box::new(e)),
        })?;

        tracing::debug!("Opened SQLite database at {}", path.display());
        Self::with_connection(conn, table)
    }

    /// Create a collection in a private in-memory database.
    pub fn in_memory(table: &str) -> FolioResult<Self> {
        let conn = Connection::open_in_memory()?;
        Self::with_connection(conn, table)
    }

    fn with_connection(conn: Connection, table: &str) -> FolioResult<Self> {
        Self::validate_table_name(table)?;
        let collection = Self {
            conn: Mutex::new(conn),
            table: table.to_string(),
        };
        {
            let conn = collection.lock()?;
            collection.create_table(&conn)?;
        }
        Ok(collection)
    }

    /// Table names are interpolated into SQL, so only plain identifiers are
    /// accepted.
    fn validate_table_name(table: &str) -> FolioResult<()> {
        let valid = !table.is_empty()
            && table
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if valid {
            Ok(())
        } else {
            Err(FolioError::Configuration(format!(
                "Invalid collection name for SQLite: '{}'",
                table
            )))
        }
    }

    fn lock(&self) -> FolioResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| FolioError::collection(format!("Failed to acquire lock: {}", e)))
    }

    fn create_table(&self, conn: &Connection) -> FolioResult<()> {
        let sql = format!(
            r#"CREATE TABLE IF NOT EXISTS "{table}" (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                doc_id INTEGER NOT NULL,
                doc_version INTEGER NOT NULL,
                doc TEXT NOT NULL
            );
            CREATE UNIQUE INDEX IF NOT EXISTS "{table}_doc_version_idx"
                ON "{table}" (doc_id, doc_version);"#,
            table = self.table
        );

        conn.execute_batch(&sql)?;
        Ok(())
    }

    fn encode(record: &StoredDocument) -> FolioResult<String> {
        Ok(serde_json::to_string(&record.doc)?)
    }

    fn decode(doc_version: i64, doc_json: &str) -> FolioResult<StoredDocument> {
        let doc: ClientDocument = serde_json::from_str(doc_json).map_err(|e| {
            FolioError::corrupted(format!(
                "Failed to decode stored document at version {}: {}",
                doc_version, e
            ))
        })?;
        Ok(StoredDocument::new(doc, doc_version))
    }

    /// Map a unique index violation to a duplicate version error.
    fn write_error(err: rusqlite::Error, record: &StoredDocument) -> FolioError {
        if let rusqlite::Error::SqliteFailure(e, _) = &err {
            if e.code == rusqlite::ErrorCode::ConstraintViolation {
                return FolioError::duplicate_version(record.doc_id(), record.doc_version);
            }
        }
        err.into()
    }

    fn order_clause(options: &FindOptions) -> String {
        match options.sort {
            Some(sort) => {
                let direction = match sort.direction {
                    SortDirection::Ascending => "ASC",
                    SortDirection::Descending => "DESC",
                };
                format!(
                    " ORDER BY {} {}",
                    SqliteFilterTranslator::column(sort.field),
                    direction
                )
            }
            None => " ORDER BY id".to_string(),
        }
    }
}

#[async_trait]
impl DocumentCollection for SqliteCollection {
    async fn insert(&self, record: StoredDocument) -> FolioResult<()> {
        let doc_json = Self::encode(&record)?;
        let conn = self.lock()?;

        let sql = format!(
            r#"INSERT INTO "{}" (doc_id, doc_version, doc) VALUES (?1, ?2, ?3)"#,
            self.table
        );
        conn.execute(&sql, params![record.doc_id(), record.doc_version, doc_json])
            .map_err(|e| Self::write_error(e, &record))?;

        tracing::debug!(
            "Inserted doc_id {} version {} into '{}'",
            record.doc_id(),
            record.doc_version,
            self.table
        );
        Ok(())
    }

    async fn replace_one(&self, filter: &Filter, record: StoredDocument) -> FolioResult<u64> {
        let doc_json = Self::encode(&record)?;
        let SqlWhere { clause, params } = SqliteFilterTranslator.translate(filter)?;
        let offset = params.len();

        let sql = format!(
            r#"UPDATE "{table}" SET doc_id = ?{a}, doc_version = ?{b}, doc = ?{c}
               WHERE id = (SELECT id FROM "{table}"{clause} ORDER BY id LIMIT 1)"#,
            table = self.table,
            clause = clause,
            a = offset + 1,
            b = offset + 2,
            c = offset + 3,
        );

        let mut values: Vec<rusqlite::types::Value> =
            params.into_iter().map(rusqlite::types::Value::from).collect();
        values.push(record.doc_id().into());
        values.push(record.doc_version.into());
        values.push(doc_json.into());

        let conn = self.lock()?;
        let changed = conn
            .execute(&sql, params_from_iter(values))
            .map_err(|e| Self::write_error(e, &record))?;
        Ok(changed as u64)
    }

    async fn delete_one(&self, filter: &Filter) -> FolioResult<u64> {
        let SqlWhere { clause, params } = SqliteFilterTranslator.translate(filter)?;
        let sql = format!(
            r#"DELETE FROM "{table}" WHERE id = (SELECT id FROM "{table}"{clause} ORDER BY id LIMIT 1)"#,
            table = self.table,
            clause = clause,
        );

        let conn = self.lock()?;
        let deleted = conn.execute(&sql, params_from_iter(params))?;
        Ok(deleted as u64)
    }

    async fn delete_many(&self, filter: &Filter) -> FolioResult<u64> {
        let SqlWhere { clause, params } = SqliteFilterTranslator.translate(filter)?;
        let sql = format!(r#"DELETE FROM "{}"{}"#, self.table, clause);

        let conn = self.lock()?;
        let deleted = conn.execute(&sql, params_from_iter(params))?;
        Ok(deleted as u64)
    }

    async fn find(&self, filter: &Filter, options: FindOptions) -> FolioResult<DocumentCursor> {
        let SqlWhere { clause, params } = SqliteFilterTranslator.translate(filter)?;
        let limit_clause = options
            .limit
            .map(|l| format!(" LIMIT {}", l))
            .unwrap_or_default();

        let sql = format!(
            r#"SELECT doc_version, doc FROM "{}"{}{}{}"#,
            self.table,
            clause,
            Self::order_clause(&options),
            limit_clause
        );

        let conn = self.lock()?;
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(params), |row| {
            Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?))
        })?;

        // Rows are decoded one by one so a bad row becomes an error item in
        // its own position.
        let records: Vec<FolioResult<StoredDocument>> = rows
            .map(|row| match row {
                Ok((doc_version, doc_json)) => Self::decode(doc_version, &doc_json),
                Err(e) => Err(e.into()),
            })
            .collect();

        Ok(stream::iter(records).boxed())
    }

    async fn ensure_indexes(&self) -> FolioResult<()> {
        let conn = self.lock()?;
        self.create_table(&conn)
    }

    fn provider(&self) -> CollectionProvider {
        CollectionProvider::Sqlite
    }
}
