// ==========================================
// 学校排课管理系统 - 课时要求仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// ==========================================

use crate::domain::requirement::{
    ClassSubjectRequirement, TeacherSubject, TeacherSubjectRequirement,
};
use crate::domain::school::{Subject, Teacher};
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension, Result as SqliteResult};
use std::sync::{Arc, Mutex};

// ==========================================
// RequirementRepository - 课时要求仓储
// ==========================================
/// 课时要求仓储
/// 职责: 管理 class_subject_requirements / teacher_subject_requirements /
///       teacher_subjects 三张表的数据访问
pub struct RequirementRepository {
    conn: Arc<Mutex<Connection>>,
}

impl RequirementRepository {
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
    // 班级课时要求
    // ==========================================

    /// 按 (班级, 科目) 查询班级课时要求
    pub fn find_class_requirement(
        &self,
        class_id: i64,
        subject_id: i64,
    ) -> RepositoryResult<Option<ClassSubjectRequirement>> {
        let conn = self.get_conn()?;
        let result = conn
            .query_row(
                r#"
                SELECT id, class_id, subject_id, weekly_hours
                FROM class_subject_requirements
                WHERE class_id = ?1 AND subject_id = ?2
                "#,
                params![class_id, subject_id],
                |row| {
                    Ok(ClassSubjectRequirement {
                        id: row.get(0)?,
                        class_id: row.get(1)?,
                        subject_id: row.get(2)?,
                        weekly_hours: row.get(3)?,
                    })
                },
            )
            .optional()?;
        Ok(result)
    }

    /// 新建或更新班级课时要求（唯一键 class_id + subject_id）
    pub fn upsert_class_requirement(
        &self,
        class_id: i64,
        subject_id: i64,
        weekly_hours: i32,
    ) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO class_subject_requirements (class_id, subject_id, weekly_hours)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(class_id, subject_id) DO UPDATE SET weekly_hours = excluded.weekly_hours
            "#,
            params![class_id, subject_id, weekly_hours],
        )?;
        Ok(())
    }

    // ==========================================
    // 教师课时要求
    // ==========================================

    /// 按 (科目, 班级, 分组) 查询教师课时要求
    ///
    /// 配额解析只关心分组维度，不限定教师，故唯一键的 teacher_id 不参与过滤。
    pub fn find_teacher_requirement(
        &self,
        subject_id: i64,
        class_id: i64,
        subgroup_id: i64,
    ) -> RepositoryResult<Option<TeacherSubjectRequirement>> {
        let conn = self.get_conn()?;
        let result = conn
            .query_row(
                r#"
                SELECT id, teacher_id, subject_id, class_id, subgroup_id, teacher_weekly_hours
                FROM teacher_subject_requirements
                WHERE subject_id = ?1 AND class_id = ?2 AND subgroup_id = ?3
                LIMIT 1
                "#,
                params![subject_id, class_id, subgroup_id],
                |row| {
                    Ok(TeacherSubjectRequirement {
                        id: row.get(0)?,
                        teacher_id: row.get(1)?,
                        subject_id: row.get(2)?,
                        class_id: row.get(3)?,
                        subgroup_id: row.get(4)?,
                        teacher_weekly_hours: row.get(5)?,
                    })
                },
            )
            .optional()?;
        Ok(result)
    }

    /// 新建或更新教师课时要求（唯一键 teacher+subject+class+subgroup）
    pub fn upsert_teacher_requirement(
        &self,
        teacher_id: i64,
        subject_id: i64,
        class_id: i64,
        subgroup_id: i64,
        teacher_weekly_hours: i32,
    ) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO teacher_subject_requirements
                (teacher_id, subject_id, class_id, subgroup_id, teacher_weekly_hours)
            VALUES (?1, ?2, ?3, ?4, ?5)
            ON CONFLICT(teacher_id, subject_id, class_id, subgroup_id)
                DO UPDATE SET teacher_weekly_hours = excluded.teacher_weekly_hours
            "#,
            params![teacher_id, subject_id, class_id, subgroup_id, teacher_weekly_hours],
        )?;
        Ok(())
    }

    // ==========================================
    // 教师任教科目
    // ==========================================

    /// 查询教师任教科目记录是否存在
    pub fn find_teacher_subject(
        &self,
        teacher_id: i64,
        subject_id: i64,
    ) -> RepositoryResult<Option<TeacherSubject>> {
        let conn = self.get_conn()?;
        let result = conn
            .query_row(
                r#"
                SELECT id, teacher_id, subject_id
                FROM teacher_subjects
                WHERE teacher_id = ?1 AND subject_id = ?2
                "#,
                params![teacher_id, subject_id],
                |row| {
                    Ok(TeacherSubject {
                        id: row.get(0)?,
                        teacher_id: row.get(1)?,
                        subject_id: row.get(2)?,
                    })
                },
            )
            .optional()?;
        Ok(result)
    }

    /// 创建教师任教科目（已存在则报唯一约束错误）
    pub fn create_teacher_subject(
        &self,
        teacher_id: i64,
        subject_id: i64,
    ) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        conn.execute(
            "INSERT INTO teacher_subjects (teacher_id, subject_id) VALUES (?1, ?2)",
            params![teacher_id, subject_id],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// 删除教师任教科目
    pub fn delete_teacher_subject(&self, id: i64) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let deleted = conn.execute("DELETE FROM teacher_subjects WHERE id = ?1", params![id])?;
        if deleted == 0 {
            return Err(RepositoryError::NotFound {
                entity: "TeacherSubject".to_string(),
                id: id.to_string(),
            });
        }
        Ok(())
    }

    // ==========================================
    // 班级维度查询
    // ==========================================

    /// 查询班级应开设的科目（周课时数 > 0）
    pub fn list_subjects_for_class(&self, class_id: i64) -> RepositoryResult<Vec<Subject>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT DISTINCT s.id, s.name
            FROM subjects s
            JOIN class_subject_requirements r ON r.subject_id = s.id
            WHERE r.class_id = ?1 AND r.weekly_hours > 0
            ORDER BY s.id ASC
            "#,
        )?;
        let subjects = stmt
            .query_map(params![class_id], |row| {
                Ok(Subject {
                    id: row.get(0)?,
                    name: row.get(1)?,
                })
            })?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(subjects)
    }

    /// 查询在某班级授课的教师（存在教师课时要求）
    pub fn list_teachers_for_class(&self, class_id: i64) -> RepositoryResult<Vec<Teacher>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT DISTINCT t.id, t.name
            FROM teachers t
            JOIN teacher_subject_requirements r ON r.teacher_id = t.id
            WHERE r.class_id = ?1
            ORDER BY t.id ASC
            "#,
        )?;
        let teachers = stmt
            .query_map(params![class_id], |row| {
                Ok(Teacher {
                    id: row.get(0)?,
                    name: row.get(1)?,
                })
            })?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(teachers)
    }

    /// 查询在某班级教授某科目的教师
    pub fn list_teachers_for_class_and_subject(
        &self,
        class_id: i64,
        subject_id: i64,
    ) -> RepositoryResult<Vec<Teacher>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT DISTINCT t.id, t.name
            FROM teachers t
            JOIN teacher_subject_requirements r ON r.teacher_id = t.id
            WHERE r.class_id = ?1 AND r.subject_id = ?2
            ORDER BY t.id ASC
            "#,
        )?;
        let teachers = stmt
            .query_map(params![class_id, subject_id], |row| {
                Ok(Teacher {
                    id: row.get(0)?,
                    name: row.get(1)?,
                })
            })?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(teachers)
    }
}
