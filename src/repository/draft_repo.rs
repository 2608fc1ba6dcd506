// ==========================================
// SOFEM-CI 生产录入 - 表单草稿缓存
// ==========================================
// 职责: 按表单 id 缓存字段值（本地、仅供参考、非权威）
// 约束: 调用方对失败只记日志,不影响录入
// ==========================================

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::{Arc, Mutex};

use rusqlite::{params, Connection};

use crate::db::{configure_sqlite_connection, open_sqlite_connection};
use crate::repository::error::{RepositoryError, RepositoryResult};

pub struct DraftRepository {
    conn: Arc<Mutex<Connection>>,
}

impl DraftRepository {
    /// 打开（必要时创建）草稿库
    pub fn open(db_path: &Path) -> RepositoryResult<Self> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))?;
        }
        let path = db_path
            .to_str()
            .ok_or_else(|| RepositoryError::DatabaseConnectionError("非法路径".to_string()))?;
        let conn = open_sqlite_connection(path)
            .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))?;
        Self::from_connection(Arc::new(Mutex::new(conn)))
    }

    /// 内存库（测试及无本地目录时使用）
    pub fn in_memory() -> RepositoryResult<Self> {
        let conn = Connection::open_in_memory()?;
        configure_sqlite_connection(&conn)?;
        Self::from_connection(Arc::new(Mutex::new(conn)))
    }

    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> RepositoryResult<Self> {
        let repo = Self { conn };
        repo.ensure_table()?;
        Ok(repo)
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    fn ensure_table(&self) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS form_draft (
              form_id TEXT NOT NULL,
              field_name TEXT NOT NULL,
              value TEXT NOT NULL,
              updated_at TEXT NOT NULL DEFAULT (datetime('now', 'localtime')),
              PRIMARY KEY (form_id, field_name)
            );
            "#,
        )?;
        Ok(())
    }

    /// 保存单个字段（覆盖旧值）
    pub fn save_field(&self, form_id: &str, field_name: &str, value: &str) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO form_draft (form_id, field_name, value, updated_at)
            VALUES (?1, ?2, ?3, datetime('now', 'localtime'))
            ON CONFLICT(form_id, field_name)
            DO UPDATE SET value = ?3, updated_at = datetime('now', 'localtime')
            "#,
            params![form_id, field_name, value],
        )?;
        Ok(())
    }

    /// 读取某表单的全部草稿字段
    pub fn load(&self, form_id: &str) -> RepositoryResult<BTreeMap<String, String>> {
        let conn = self.get_conn()?;
        let mut stmt =
            conn.prepare("SELECT field_name, value FROM form_draft WHERE form_id = ?1")?;
        let rows = stmt.query_map(params![form_id], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut draft = BTreeMap::new();
        for row in rows {
            let (field, value) = row?;
            draft.insert(field, value);
        }
        Ok(draft)
    }

    /// 清除某表单的草稿，返回删除的字段数
    pub fn clear(&self, form_id: &str) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let affected = conn.execute("DELETE FROM form_draft WHERE form_id = ?1", params![form_id])?;
        Ok(affected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_overwrites_field() {
        let repo = DraftRepository::in_memory().unwrap();
        repo.save_field("productionForm", "prod_finis", "100").unwrap();
        repo.save_field("productionForm", "prod_finis", "120").unwrap();
        repo.save_field("productionForm", "dechets", "4").unwrap();

        let draft = repo.load("productionForm").unwrap();
        assert_eq!(draft.len(), 2);
        assert_eq!(draft.get("prod_finis").map(String::as_str), Some("120"));
    }

    #[test]
    fn test_drafts_are_keyed_by_form() {
        let repo = DraftRepository::in_memory().unwrap();
        repo.save_field("soudure-form", "sou_rema", "3").unwrap();
        repo.save_field("recyclage-form", "rec_broyage", "7").unwrap();

        assert_eq!(repo.clear("soudure-form").unwrap(), 1);
        assert!(repo.load("soudure-form").unwrap().is_empty());
        assert_eq!(repo.load("recyclage-form").unwrap().len(), 1);
    }
}
