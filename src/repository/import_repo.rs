// ==========================================
// 学校排课管理系统 - 批量导入仓储
// ==========================================
// 职责: 将对账计划在单一事务内落库
// 红线: 不做推导判定（分组数量/指派关系由引擎层给出），只负责
//       按唯一名称 find-or-create 并物化课时要求
// ==========================================

use crate::domain::import::{ReconcilePlan, ReconcileStats};
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

// ==========================================
// TimetableImportRepository - 批量导入仓储
// ==========================================
/// 批量导入仓储
///
/// 整个对账计划在一个事务内执行: 任一写入失败则全部回滚，
/// 导入不会留下半成品数据。重复执行同一计划不产生新记录（幂等）。
pub struct TimetableImportRepository {
    conn: Arc<Mutex<Connection>>,
}

impl TimetableImportRepository {
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

    /// 在单一事务内执行对账计划
    ///
    /// # 参数
    /// - `plan`: 引擎层推导出的对账计划（全部以唯一名称描述）
    /// - `preferred_shift_id`: 新建班级的首选班次；不存在时回退到最小班次ID
    ///
    /// # 返回
    /// - ReconcileStats: 本次新建/更新的记录计数
    pub fn apply_plan(
        &self,
        plan: &ReconcilePlan,
        preferred_shift_id: i64,
    ) -> RepositoryResult<ReconcileStats> {
        let conn = self.get_conn()?;
        let tx = conn.unchecked_transaction()?;
        let mut stats = ReconcileStats::default();

        // 新建班级使用的班次: 首选班次存在则用之，否则取最小ID的班次
        let default_shift_id = resolve_default_shift(&tx, preferred_shift_id)?;

        // ===== 阶段 1: 实体 find-or-create，名称就地解析为 ID =====
        let mut class_ids: HashMap<String, i64> = HashMap::new();
        for name in &plan.class_names {
            let (id, created) = find_or_create_class(&tx, name, default_shift_id)?;
            if created {
                stats.classes_created += 1;
            }
            class_ids.insert(name.clone(), id);
        }

        let mut subject_ids: HashMap<String, i64> = HashMap::new();
        for name in &plan.subject_names {
            let (id, created) = find_or_create_named(&tx, "subjects", name)?;
            if created {
                stats.subjects_created += 1;
            }
            subject_ids.insert(name.clone(), id);
        }

        let mut teacher_ids: HashMap<String, i64> = HashMap::new();
        for name in &plan.teacher_names {
            let (id, created) = find_or_create_named(&tx, "teachers", name)?;
            if created {
                stats.teachers_created += 1;
            }
            teacher_ids.insert(name.clone(), id);
        }

        // 教室没有下游引用，只做建档与计数
        for name in &plan.room_names {
            let (_id, created) = find_or_create_named(&tx, "rooms", name)?;
            if created {
                stats.rooms_created += 1;
            }
        }

        let mut subgroup_ids: HashMap<String, i64> = HashMap::new();
        for sg in &plan.subgroups {
            let class_id = planned_id(&class_ids, &sg.class_name, "班级")?;
            let (id, created) = find_or_create_subgroup(&tx, &sg.name, class_id)?;
            if created {
                stats.subgroups_created += 1;
            }
            subgroup_ids.insert(sg.name.clone(), id);
        }

        // ===== 阶段 2: 班级课时要求 =====
        for req in &plan.class_requirements {
            let class_id = planned_id(&class_ids, &req.class_name, "班级")?;
            let subject_id = planned_id(&subject_ids, &req.subject_name, "科目")?;
            tx.execute(
                r#"
                INSERT INTO class_subject_requirements (class_id, subject_id, weekly_hours)
                VALUES (?1, ?2, ?3)
                ON CONFLICT(class_id, subject_id)
                    DO UPDATE SET weekly_hours = excluded.weekly_hours
                "#,
                params![class_id, subject_id, req.weekly_hours],
            )?;
            stats.class_requirements_upserted += 1;
        }

        // ===== 阶段 3: 教师任教科目 + 教师课时要求 =====
        for a in &plan.assignments {
            let teacher_id = planned_id(&teacher_ids, &a.teacher_name, "教师")?;
            let subject_id = planned_id(&subject_ids, &a.subject_name, "科目")?;
            let class_id = planned_id(&class_ids, &a.class_name, "班级")?;
            let subgroup_id = planned_id(&subgroup_ids, &a.subgroup_name, "分组")?;

            let inserted = tx.execute(
                r#"
                INSERT INTO teacher_subjects (teacher_id, subject_id)
                VALUES (?1, ?2)
                ON CONFLICT(teacher_id, subject_id) DO NOTHING
                "#,
                params![teacher_id, subject_id],
            )?;
            stats.teacher_subjects_created += inserted;

            tx.execute(
                r#"
                INSERT INTO teacher_subject_requirements
                    (teacher_id, subject_id, class_id, subgroup_id, teacher_weekly_hours)
                VALUES (?1, ?2, ?3, ?4, ?5)
                ON CONFLICT(teacher_id, subject_id, class_id, subgroup_id)
                    DO UPDATE SET teacher_weekly_hours = excluded.teacher_weekly_hours
                "#,
                params![teacher_id, subject_id, class_id, subgroup_id, a.teacher_weekly_hours],
            )?;
            stats.teacher_requirements_upserted += 1;
        }

        tx.commit()?;
        Ok(stats)
    }
}

// ==========================================
// 辅助函数（事务内 find-or-create）
// ==========================================

/// 从阶段 1 的名称→ID 映射中取值
///
/// 计划内的实体必定在阶段 1 全部解析; 取不到说明计划自身不一致
/// （例如手工构造的计划引用了未登记的名称），按内部错误上报而不是 panic。
fn planned_id(
    ids: &HashMap<String, i64>,
    name: &str,
    entity: &str,
) -> RepositoryResult<i64> {
    ids.get(name).copied().ok_or_else(|| {
        RepositoryError::InternalError(format!(
            "对账计划不一致: 引用了计划外的{} '{}'",
            entity, name
        ))
    })
}

/// 解析新建班级使用的班次ID
fn resolve_default_shift(conn: &Connection, preferred_shift_id: i64) -> RepositoryResult<i64> {
    let preferred: Option<i64> = conn
        .query_row(
            "SELECT id FROM shifts WHERE id = ?1",
            params![preferred_shift_id],
            |row| row.get(0),
        )
        .optional()?;
    if let Some(id) = preferred {
        return Ok(id);
    }

    let fallback: Option<i64> = conn
        .query_row("SELECT MIN(id) FROM shifts", [], |row| row.get(0))
        .optional()?
        .flatten();
    fallback.ok_or_else(|| {
        RepositoryError::InternalError("shifts 表为空: 系统初始化未播种默认班次".to_string())
    })
}

/// 按唯一名称 find-or-create（适用于 teachers/subjects/rooms 这类只有 name 的表）
///
/// 注意: table 只接受本模块内的固定字面量，不来自外部输入。
fn find_or_create_named(
    conn: &Connection,
    table: &'static str,
    name: &str,
) -> RepositoryResult<(i64, bool)> {
    let existing: Option<i64> = conn
        .query_row(
            &format!("SELECT id FROM {} WHERE name = ?1", table),
            params![name],
            |row| row.get(0),
        )
        .optional()?;
    if let Some(id) = existing {
        return Ok((id, false));
    }

    conn.execute(
        &format!("INSERT INTO {} (name) VALUES (?1)", table),
        params![name],
    )?;
    Ok((conn.last_insert_rowid(), true))
}

/// 班级 find-or-create（新建时挂到默认班次）
fn find_or_create_class(
    conn: &Connection,
    name: &str,
    shift_id: i64,
) -> RepositoryResult<(i64, bool)> {
    let existing: Option<i64> = conn
        .query_row(
            "SELECT id FROM classes WHERE name = ?1",
            params![name],
            |row| row.get(0),
        )
        .optional()?;
    if let Some(id) = existing {
        return Ok((id, false));
    }

    conn.execute(
        "INSERT INTO classes (name, shift_id) VALUES (?1, ?2)",
        params![name, shift_id],
    )?;
    Ok((conn.last_insert_rowid(), true))
}

/// 分组 find-or-create
fn find_or_create_subgroup(
    conn: &Connection,
    name: &str,
    class_id: i64,
) -> RepositoryResult<(i64, bool)> {
    let existing: Option<i64> = conn
        .query_row(
            "SELECT id FROM subgroups WHERE name = ?1",
            params![name],
            |row| row.get(0),
        )
        .optional()?;
    if let Some(id) = existing {
        return Ok((id, false));
    }

    conn.execute(
        "INSERT INTO subgroups (name, class_id) VALUES (?1, ?2)",
        params![name, class_id],
    )?;
    Ok((conn.last_insert_rowid(), true))
}
