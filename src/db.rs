// ==========================================
// 学校排课管理系统 - SQLite 连接初始化与建表
// ==========================================
// 目标:
// - 统一所有 Connection::open 的 PRAGMA 行为，避免"部分模块外键开启/部分不开启"
// - 统一 busy_timeout，减少并发写入时的偶发 busy 错误
// - 集中建表语句，课表三组唯一索引在库层兜底并发竞态
// ==========================================

use rusqlite::Connection;
use std::time::Duration;

/// 默认 busy_timeout（毫秒）
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// 默认班次数量（系统初始化时 shifts 表为空则播种）
pub const DEFAULT_SHIFT_COUNT: i64 = 3;

/// 配置 SQLite 连接的统一 PRAGMA
///
/// 说明:
/// - foreign_keys 需要"每个连接"单独开启
/// - busy_timeout 需要"每个连接"单独配置
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

/// 初始化数据库 schema
///
/// 课表 lessons 表带三组唯一索引（教师/教室/分组 × 星期 × 节次），
/// 作为"校验-写入"读写竞态的库层兜底: 并发写穿过校验时由唯一约束拦截。
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS teachers (
            id   INTEGER PRIMARY KEY,
            name TEXT NOT NULL UNIQUE
        );

        CREATE TABLE IF NOT EXISTS subjects (
            id   INTEGER PRIMARY KEY,
            name TEXT NOT NULL UNIQUE
        );

        CREATE TABLE IF NOT EXISTS rooms (
            id   INTEGER PRIMARY KEY,
            name TEXT NOT NULL UNIQUE
        );

        CREATE TABLE IF NOT EXISTS shifts (
            id   INTEGER PRIMARY KEY,
            name TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS classes (
            id       INTEGER PRIMARY KEY,
            name     TEXT NOT NULL UNIQUE,
            shift_id INTEGER NOT NULL REFERENCES shifts(id)
        );

        CREATE TABLE IF NOT EXISTS subgroups (
            id       INTEGER PRIMARY KEY,
            name     TEXT NOT NULL UNIQUE,
            class_id INTEGER NOT NULL REFERENCES classes(id)
        );

        CREATE TABLE IF NOT EXISTS class_subject_requirements (
            id           INTEGER PRIMARY KEY,
            class_id     INTEGER NOT NULL REFERENCES classes(id),
            subject_id   INTEGER NOT NULL REFERENCES subjects(id),
            weekly_hours INTEGER NOT NULL,
            UNIQUE(class_id, subject_id)
        );

        CREATE TABLE IF NOT EXISTS teacher_subject_requirements (
            id                   INTEGER PRIMARY KEY,
            teacher_id           INTEGER NOT NULL REFERENCES teachers(id),
            subject_id           INTEGER NOT NULL REFERENCES subjects(id),
            class_id             INTEGER NOT NULL REFERENCES classes(id),
            subgroup_id          INTEGER NOT NULL REFERENCES subgroups(id),
            teacher_weekly_hours INTEGER NOT NULL,
            UNIQUE(teacher_id, subject_id, class_id, subgroup_id)
        );

        CREATE TABLE IF NOT EXISTS teacher_subjects (
            id         INTEGER PRIMARY KEY,
            teacher_id INTEGER NOT NULL REFERENCES teachers(id),
            subject_id INTEGER NOT NULL REFERENCES subjects(id),
            UNIQUE(teacher_id, subject_id)
        );

        CREATE TABLE IF NOT EXISTS lessons (
            id            INTEGER PRIMARY KEY,
            subject_id    INTEGER NOT NULL REFERENCES subjects(id),
            teacher_id    INTEGER NOT NULL REFERENCES teachers(id),
            subgroup_id   INTEGER NOT NULL REFERENCES subgroups(id),
            day_of_week   INTEGER NOT NULL,
            lesson_number INTEGER NOT NULL,
            room_id       INTEGER NOT NULL REFERENCES rooms(id)
        );

        CREATE UNIQUE INDEX IF NOT EXISTS idx_lesson_time_teacher
            ON lessons(day_of_week, lesson_number, teacher_id);
        CREATE UNIQUE INDEX IF NOT EXISTS idx_lesson_time_room
            ON lessons(day_of_week, lesson_number, room_id);
        CREATE UNIQUE INDEX IF NOT EXISTS idx_lesson_time_subgroup
            ON lessons(day_of_week, lesson_number, subgroup_id);
        "#,
    )?;
    Ok(())
}

/// 播种默认班次（仅当 shifts 表为空时执行）
///
/// # 返回
/// - Ok(true): 本次执行了播种
/// - Ok(false): 已有班次数据，跳过
pub fn seed_default_shifts(conn: &Connection) -> rusqlite::Result<bool> {
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM shifts", [], |row| row.get(0))?;
    if count > 0 {
        return Ok(false);
    }

    for shift_id in 1..=DEFAULT_SHIFT_COUNT {
        conn.execute(
            "INSERT INTO shifts (id, name) VALUES (?1, ?2)",
            rusqlite::params![shift_id, format!("{} 班次", shift_id)],
        )?;
    }
    Ok(true)
}
