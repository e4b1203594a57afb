// ==========================================
// 学校排课管理系统 - 学校主数据仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// ==========================================

use crate::domain::school::{ClassGroup, Room, Shift, SubGroup, Subject, Teacher};
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension, Result as SqliteResult};
use std::sync::{Arc, Mutex};

// ==========================================
// SchoolRepository - 学校主数据仓储
// ==========================================
/// 学校主数据仓储
/// 职责: 管理 teachers/subjects/rooms/shifts/classes/subgroups 表的 CRUD
/// 红线: 不含业务逻辑，只负责数据访问
pub struct SchoolRepository {
    conn: Arc<Mutex<Connection>>,
}

impl SchoolRepository {
    /// 从已有连接创建仓储实例
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 获取数据库连接
    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    // ==========================================
    // 教师
    // ==========================================

    /// 创建教师（姓名唯一）
    pub fn create_teacher(&self, name: &str) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        conn.execute("INSERT INTO teachers (name) VALUES (?1)", params![name])?;
        Ok(conn.last_insert_rowid())
    }

    /// 按姓名查询教师
    pub fn find_teacher_by_name(&self, name: &str) -> RepositoryResult<Option<Teacher>> {
        let conn = self.get_conn()?;
        let result = conn
            .query_row(
                "SELECT id, name FROM teachers WHERE name = ?1",
                params![name],
                |row| {
                    Ok(Teacher {
                        id: row.get(0)?,
                        name: row.get(1)?,
                    })
                },
            )
            .optional()?;
        Ok(result)
    }

    /// 按ID查询教师
    pub fn get_teacher(&self, id: i64) -> RepositoryResult<Option<Teacher>> {
        let conn = self.get_conn()?;
        let result = conn
            .query_row(
                "SELECT id, name FROM teachers WHERE id = ?1",
                params![id],
                |row| {
                    Ok(Teacher {
                        id: row.get(0)?,
                        name: row.get(1)?,
                    })
                },
            )
            .optional()?;
        Ok(result)
    }

    /// 查询全部教师
    pub fn list_teachers(&self) -> RepositoryResult<Vec<Teacher>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare("SELECT id, name FROM teachers ORDER BY id ASC")?;
        let teachers = stmt
            .query_map([], |row| {
                Ok(Teacher {
                    id: row.get(0)?,
                    name: row.get(1)?,
                })
            })?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(teachers)
    }

    /// 删除教师
    ///
    /// 先级联删除其 teacher_subjects 任教记录，再删除教师本身。
    pub fn delete_teacher(&self, id: i64) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let tx = conn.unchecked_transaction()?;

        tx.execute(
            "DELETE FROM teacher_subjects WHERE teacher_id = ?1",
            params![id],
        )?;
        let deleted = tx.execute("DELETE FROM teachers WHERE id = ?1", params![id])?;
        if deleted == 0 {
            return Err(RepositoryError::NotFound {
                entity: "Teacher".to_string(),
                id: id.to_string(),
            });
        }

        tx.commit()?;
        Ok(())
    }

    // ==========================================
    // 科目
    // ==========================================

    /// 创建科目（名称唯一）
    pub fn create_subject(&self, name: &str) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        conn.execute("INSERT INTO subjects (name) VALUES (?1)", params![name])?;
        Ok(conn.last_insert_rowid())
    }

    /// 按名称查询科目
    pub fn find_subject_by_name(&self, name: &str) -> RepositoryResult<Option<Subject>> {
        let conn = self.get_conn()?;
        let result = conn
            .query_row(
                "SELECT id, name FROM subjects WHERE name = ?1",
                params![name],
                |row| {
                    Ok(Subject {
                        id: row.get(0)?,
                        name: row.get(1)?,
                    })
                },
            )
            .optional()?;
        Ok(result)
    }

    /// 按ID查询科目
    pub fn get_subject(&self, id: i64) -> RepositoryResult<Option<Subject>> {
        let conn = self.get_conn()?;
        let result = conn
            .query_row(
                "SELECT id, name FROM subjects WHERE id = ?1",
                params![id],
                |row| {
                    Ok(Subject {
                        id: row.get(0)?,
                        name: row.get(1)?,
                    })
                },
            )
            .optional()?;
        Ok(result)
    }

    // ==========================================
    // 教室
    // ==========================================

    /// 创建教室（名称唯一）
    pub fn create_room(&self, name: &str) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        conn.execute("INSERT INTO rooms (name) VALUES (?1)", params![name])?;
        Ok(conn.last_insert_rowid())
    }

    /// 按名称查询教室
    pub fn find_room_by_name(&self, name: &str) -> RepositoryResult<Option<Room>> {
        let conn = self.get_conn()?;
        let result = conn
            .query_row(
                "SELECT id, name FROM rooms WHERE name = ?1",
                params![name],
                |row| {
                    Ok(Room {
                        id: row.get(0)?,
                        name: row.get(1)?,
                    })
                },
            )
            .optional()?;
        Ok(result)
    }

    // ==========================================
    // 班次
    // ==========================================

    /// 按ID查询班次
    pub fn get_shift(&self, id: i64) -> RepositoryResult<Option<Shift>> {
        let conn = self.get_conn()?;
        let result = conn
            .query_row(
                "SELECT id, name FROM shifts WHERE id = ?1",
                params![id],
                |row| {
                    Ok(Shift {
                        id: row.get(0)?,
                        name: row.get(1)?,
                    })
                },
            )
            .optional()?;
        Ok(result)
    }

    /// 查询全部班次
    pub fn list_shifts(&self) -> RepositoryResult<Vec<Shift>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare("SELECT id, name FROM shifts ORDER BY id ASC")?;
        let shifts = stmt
            .query_map([], |row| {
                Ok(Shift {
                    id: row.get(0)?,
                    name: row.get(1)?,
                })
            })?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(shifts)
    }

    // ==========================================
    // 班级
    // ==========================================

    /// 创建班级（名称唯一）
    pub fn create_class(&self, name: &str, shift_id: i64) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        conn.execute(
            "INSERT INTO classes (name, shift_id) VALUES (?1, ?2)",
            params![name, shift_id],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// 按名称查询班级
    pub fn find_class_by_name(&self, name: &str) -> RepositoryResult<Option<ClassGroup>> {
        let conn = self.get_conn()?;
        let result = conn
            .query_row(
                "SELECT id, name, shift_id FROM classes WHERE name = ?1",
                params![name],
                |row| {
                    Ok(ClassGroup {
                        id: row.get(0)?,
                        name: row.get(1)?,
                        shift_id: row.get(2)?,
                    })
                },
            )
            .optional()?;
        Ok(result)
    }

    /// 按ID查询班级
    pub fn get_class(&self, id: i64) -> RepositoryResult<Option<ClassGroup>> {
        let conn = self.get_conn()?;
        let result = conn
            .query_row(
                "SELECT id, name, shift_id FROM classes WHERE id = ?1",
                params![id],
                |row| {
                    Ok(ClassGroup {
                        id: row.get(0)?,
                        name: row.get(1)?,
                        shift_id: row.get(2)?,
                    })
                },
            )
            .optional()?;
        Ok(result)
    }

    // ==========================================
    // 分组
    // ==========================================

    /// 创建分组（名称唯一，约定 "<班级名>-<序号>"）
    pub fn create_subgroup(&self, name: &str, class_id: i64) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        conn.execute(
            "INSERT INTO subgroups (name, class_id) VALUES (?1, ?2)",
            params![name, class_id],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// 按名称查询分组
    pub fn find_subgroup_by_name(&self, name: &str) -> RepositoryResult<Option<SubGroup>> {
        let conn = self.get_conn()?;
        let result = conn
            .query_row(
                "SELECT id, name, class_id FROM subgroups WHERE name = ?1",
                params![name],
                |row| {
                    Ok(SubGroup {
                        id: row.get(0)?,
                        name: row.get(1)?,
                        class_id: row.get(2)?,
                    })
                },
            )
            .optional()?;
        Ok(result)
    }

    /// 按ID查询分组
    pub fn get_subgroup(&self, id: i64) -> RepositoryResult<Option<SubGroup>> {
        let conn = self.get_conn()?;
        let result = conn
            .query_row(
                "SELECT id, name, class_id FROM subgroups WHERE id = ?1",
                params![id],
                |row| {
                    Ok(SubGroup {
                        id: row.get(0)?,
                        name: row.get(1)?,
                        class_id: row.get(2)?,
                    })
                },
            )
            .optional()?;
        Ok(result)
    }

    /// 查询班级下的全部分组
    pub fn list_subgroups_by_class(&self, class_id: i64) -> RepositoryResult<Vec<SubGroup>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, name, class_id FROM subgroups WHERE class_id = ?1 ORDER BY name ASC",
        )?;
        let subgroups = stmt
            .query_map(params![class_id], |row| {
                Ok(SubGroup {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    class_id: row.get(2)?,
                })
            })?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(subgroups)
    }
}
