// ==========================================
// 学校排课管理系统 - 课程仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// 约束: 所有查询使用参数化,防止 SQL 注入
// ==========================================

use crate::domain::lesson::{Lesson, LessonDraft, ResourceKind};
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension, Result as SqliteResult};
use std::sync::{Arc, Mutex};

// ==========================================
// LessonRepository - 课程仓储
// ==========================================
/// 课程仓储
/// 职责: 管理 lessons 表的 CRUD 与冲突/配额计数查询
pub struct LessonRepository {
    conn: Arc<Mutex<Connection>>,
}

impl LessonRepository {
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

    /// 插入课程
    ///
    /// lessons 表的三组唯一索引（教师/教室/分组 × 星期 × 节次）在库层
    /// 兜底并发竞态: 穿过校验的并发写在这里以唯一约束错误暴露。
    pub fn create(&self, draft: &LessonDraft) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO lessons
                (subject_id, teacher_id, subgroup_id, day_of_week, lesson_number, room_id)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            params![
                draft.subject_id,
                draft.teacher_id,
                draft.subgroup_id,
                draft.day_of_week,
                draft.lesson_number,
                draft.room_id,
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// 更新课程
    pub fn update(&self, id: i64, draft: &LessonDraft) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let updated = conn.execute(
            r#"
            UPDATE lessons
            SET subject_id = ?2, teacher_id = ?3, subgroup_id = ?4,
                day_of_week = ?5, lesson_number = ?6, room_id = ?7
            WHERE id = ?1
            "#,
            params![
                id,
                draft.subject_id,
                draft.teacher_id,
                draft.subgroup_id,
                draft.day_of_week,
                draft.lesson_number,
                draft.room_id,
            ],
        )?;
        if updated == 0 {
            return Err(RepositoryError::NotFound {
                entity: "Lesson".to_string(),
                id: id.to_string(),
            });
        }
        Ok(())
    }

    /// 删除课程
    pub fn delete(&self, id: i64) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let deleted = conn.execute("DELETE FROM lessons WHERE id = ?1", params![id])?;
        if deleted == 0 {
            return Err(RepositoryError::NotFound {
                entity: "Lesson".to_string(),
                id: id.to_string(),
            });
        }
        Ok(())
    }

    /// 按ID查询课程
    pub fn get(&self, id: i64) -> RepositoryResult<Option<Lesson>> {
        let conn = self.get_conn()?;
        let result = conn
            .query_row(
                r#"
                SELECT id, subject_id, teacher_id, subgroup_id, day_of_week, lesson_number, room_id
                FROM lessons
                WHERE id = ?1
                "#,
                params![id],
                |row| {
                    Ok(Lesson {
                        id: row.get(0)?,
                        subject_id: row.get(1)?,
                        teacher_id: row.get(2)?,
                        subgroup_id: row.get(3)?,
                        day_of_week: row.get(4)?,
                        lesson_number: row.get(5)?,
                        room_id: row.get(6)?,
                    })
                },
            )
            .optional()?;
        Ok(result)
    }

    /// 查询全部课程（按星期/节次排序）
    pub fn list(&self) -> RepositoryResult<Vec<Lesson>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT id, subject_id, teacher_id, subgroup_id, day_of_week, lesson_number, room_id
            FROM lessons
            ORDER BY day_of_week ASC, lesson_number ASC, id ASC
            "#,
        )?;
        let lessons = stmt
            .query_map([], |row| {
                Ok(Lesson {
                    id: row.get(0)?,
                    subject_id: row.get(1)?,
                    teacher_id: row.get(2)?,
                    subgroup_id: row.get(3)?,
                    day_of_week: row.get(4)?,
                    lesson_number: row.get(5)?,
                    room_id: row.get(6)?,
                })
            })?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(lessons)
    }

    /// 查询某资源在 (星期, 节次) 是否已被其他课程占用
    ///
    /// # 参数
    /// - `kind`: 资源种类（教师/教室/分组），决定按哪一列过滤
    /// - `exclude_lesson_id`: 更新场景下排除课程自身的原占位
    pub fn is_resource_busy(
        &self,
        kind: ResourceKind,
        resource_id: i64,
        day_of_week: i32,
        lesson_number: i32,
        exclude_lesson_id: Option<i64>,
    ) -> RepositoryResult<bool> {
        let conn = self.get_conn()?;
        // 列名来自 ResourceKind 的固定映射，不拼接外部输入
        let sql = format!(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM lessons
                WHERE {} = ?1 AND day_of_week = ?2 AND lesson_number = ?3
                  AND (?4 IS NULL OR id != ?4)
            )
            "#,
            kind.lesson_column()
        );
        let busy: bool = conn.query_row(
            &sql,
            params![resource_id, day_of_week, lesson_number, exclude_lesson_id],
            |row| row.get(0),
        )?;
        Ok(busy)
    }

    /// 统计某 (科目, 分组) 已存在的课程数
    ///
    /// # 参数
    /// - `exclude_lesson_id`: 更新场景下排除课程自身
    pub fn count_for_subgroup_subject(
        &self,
        subject_id: i64,
        subgroup_id: i64,
        exclude_lesson_id: Option<i64>,
    ) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        let count: i64 = conn.query_row(
            r#"
            SELECT COUNT(*) FROM lessons
            WHERE subject_id = ?1 AND subgroup_id = ?2
              AND (?3 IS NULL OR id != ?3)
            "#,
            params![subject_id, subgroup_id, exclude_lesson_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }
}
