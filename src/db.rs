// ==========================================
// SOFEM-CI 生产录入 - SQLite 连接初始化
// ==========================================
// 目标:
// - 所有 Connection::open 统一 PRAGMA 行为
// - 统一 busy_timeout，多个页面同时写草稿时减少 busy 错误
// ==========================================

use rusqlite::Connection;
use std::path::PathBuf;
use std::time::Duration;

/// 默认 busy_timeout（毫秒）
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// 配置 SQLite 连接的统一 PRAGMA
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// 打开 SQLite 连接并应用统一配置
pub fn open_sqlite_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

/// 默认草稿库位置: <data_local_dir>/sofemci/drafts.db
pub fn default_draft_db_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|dir| dir.join("sofemci").join("drafts.db"))
}
