// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;

use rusqlite::Connection;
use rusqlite::Transaction;

use crate::error::Fallible;

/// A key-value store of JSON blobs. Each stored object (settings, the
/// difficulty map, the usage stats) lives under one key and is always
/// written whole, in one transaction.
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    pub fn new(database_path: &str) -> Fallible<Self> {
        let mut conn = Connection::open(database_path)?;
        {
            let tx = conn.transaction()?;
            if !probe_schema_exists(&tx)? {
                tx.execute_batch(include_str!("schema.sql"))?;
                tx.commit()?;
            }
        }
        let conn = Arc::new(Mutex::new(conn));
        Ok(Self { conn })
    }

    /// Read the blob stored under `key`, if any.
    pub fn get(&self, key: &str) -> Fallible<Option<String>> {
        let conn = self.acquire();
        let mut stmt = conn.prepare("select value from store where key = ?;")?;
        let mut rows = stmt.query([key])?;
        if let Some(row) = rows.next()? {
            let value: String = row.get(0)?;
            Ok(Some(value))
        } else {
            Ok(None)
        }
    }

    /// Replace the blob stored under `key`. The write is atomic at the
    /// granularity of the whole blob.
    pub fn put(&self, key: &str, value: &str) -> Fallible<()> {
        let mut conn = self.acquire();
        let tx = conn.transaction()?;
        tx.execute(
            "insert into store (key, value) values (?, ?) on conflict (key) do update set value = excluded.value;",
            (key, value),
        )?;
        tx.commit()?;
        Ok(())
    }

    fn acquire(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap()
    }
}

fn probe_schema_exists(tx: &Transaction) -> Fallible<bool> {
    let sql = "select count(*) from sqlite_master where type='table' AND name=?;";
    let count: i64 = tx.query_row(sql, ["store"], |row| row.get(0))?;
    Ok(count > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_db() -> (tempfile::TempDir, Database) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kotobako.sqlite3");
        let db = Database::new(path.to_str().unwrap()).unwrap();
        (dir, db)
    }

    #[test]
    fn test_get_missing_key() -> Fallible<()> {
        let (_dir, db) = temp_db();
        assert_eq!(db.get("kotobako-settings")?, None);
        Ok(())
    }

    #[test]
    fn test_put_then_get() -> Fallible<()> {
        let (_dir, db) = temp_db();
        db.put("kotobako-settings", "{\"isShuffleOn\":true}")?;
        assert_eq!(
            db.get("kotobako-settings")?,
            Some("{\"isShuffleOn\":true}".to_string())
        );
        Ok(())
    }

    #[test]
    fn test_put_overwrites() -> Fallible<()> {
        let (_dir, db) = temp_db();
        db.put("k", "a")?;
        db.put("k", "b")?;
        assert_eq!(db.get("k")?, Some("b".to_string()));
        Ok(())
    }

    #[test]
    fn test_reopen_preserves_values() -> Fallible<()> {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kotobako.sqlite3");
        {
            let db = Database::new(path.to_str().unwrap())?;
            db.put("k", "v")?;
        }
        let db = Database::new(path.to_str().unwrap())?;
        assert_eq!(db.get("k")?, Some("v".to_string()));
        Ok(())
    }
}
