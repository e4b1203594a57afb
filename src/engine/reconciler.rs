// ==========================================
// 学校排课管理系统 - 批量导入对账引擎
// ==========================================
// 输入: 课时矩阵 + 任课名册
// 两阶段: build_plan 纯推导（可独立测试），apply_plan 事务落库
// 策略: 单行异常跳过并告警，不中止整次导入; 落库失败整体回滚
// ==========================================

use crate::config::ScheduleConfig;
use crate::domain::import::{
    HoursMatrix, LoadRosterRow, PlannedAssignment, PlannedClassRequirement, PlannedSubgroup,
    ReconcilePlan, ReconcileSummary, SkippedRosterRow,
};
use crate::engine::repositories::TimetableRepositories;
use crate::repository::RepositoryResult;
use std::collections::{HashMap, HashSet};
use std::time::Instant;
use tracing::{info, warn};
use uuid::Uuid;

// ==========================================
// build_plan - 纯推导阶段
// ==========================================
/// 从课时矩阵与任课名册推导对账计划
///
/// 推导规则:
/// 1. 实体清单按输入首见顺序收集（矩阵行列序优先，名册补充）
/// 2. 按 (班级, 科目) 分组名册行，组内不同教师数 = 分组数量；
///    分组命名 "<班级>-1" .. "<班级>-N"，单教师也建 1 个分组
/// 3. 组内第 i 行（源文件顺序, 0 起）指派到第 i+1 个分组——
///    按位置指派而非按内容匹配
/// 4. 教师课时要求取 (班级, 科目) 的班级课时数，拆分科目的每个
///    分组获得相同的完整配额
/// 5. 位置超出分组数量的行记为跳过行
pub fn build_plan(hours: &HoursMatrix, roster: &[LoadRosterRow]) -> ReconcilePlan {
    let mut plan = ReconcilePlan::default();

    // ===== 实体清单（首见顺序去重） =====
    let mut seen_classes: HashSet<String> = HashSet::new();
    for name in &hours.class_names {
        if seen_classes.insert(name.clone()) {
            plan.class_names.push(name.clone());
        }
    }
    let mut seen_subjects: HashSet<String> = HashSet::new();
    for name in &hours.subject_names {
        if seen_subjects.insert(name.clone()) {
            plan.subject_names.push(name.clone());
        }
    }

    let mut seen_teachers: HashSet<String> = HashSet::new();
    let mut seen_rooms: HashSet<String> = HashSet::new();
    for row in roster {
        // 仅出现在名册中的班级/科目也纳入计划（落库时挂默认班次）
        if seen_classes.insert(row.class_name.clone()) {
            plan.class_names.push(row.class_name.clone());
        }
        if seen_subjects.insert(row.subject_name.clone()) {
            plan.subject_names.push(row.subject_name.clone());
        }
        if seen_teachers.insert(row.teacher_name.clone()) {
            plan.teacher_names.push(row.teacher_name.clone());
        }
        if seen_rooms.insert(row.room_name.clone()) {
            plan.room_names.push(row.room_name.clone());
        }
    }

    // ===== 班级课时要求（矩阵单元格 > 0） =====
    for class_name in &hours.class_names {
        for subject_name in &hours.subject_names {
            if let Some(weekly_hours) = hours.hours_for(class_name, subject_name) {
                plan.class_requirements.push(PlannedClassRequirement {
                    class_name: class_name.clone(),
                    subject_name: subject_name.clone(),
                    weekly_hours,
                });
            }
        }
    }

    // ===== 按 (班级, 科目) 分组名册行（保留源文件行序） =====
    let mut group_order: Vec<(String, String)> = Vec::new();
    let mut groups: HashMap<(String, String), Vec<usize>> = HashMap::new();
    for (index, row) in roster.iter().enumerate() {
        let key = (row.class_name.clone(), row.subject_name.clone());
        groups
            .entry(key.clone())
            .or_insert_with(|| {
                group_order.push(key.clone());
                Vec::new()
            })
            .push(index);
    }

    // ===== 分组推导 + 按位置指派 =====
    let mut seen_subgroups: HashSet<String> = HashSet::new();
    for key in &group_order {
        let (class_name, subject_name) = key;
        let row_indexes = &groups[key];

        // 分组数量 = 组内不同教师数（≥1: 不拆分的科目也走统一的分组外键）
        let distinct_teachers = row_indexes
            .iter()
            .map(|&i| roster[i].teacher_name.as_str())
            .collect::<HashSet<_>>()
            .len();

        for index in 1..=distinct_teachers {
            let name = format!("{}-{}", class_name, index);
            // 同班级不同科目复用同名分组
            if seen_subgroups.insert(name.clone()) {
                plan.subgroups.push(PlannedSubgroup {
                    name,
                    class_name: class_name.clone(),
                });
            }
        }

        // 矩阵缺该单元格时配额为 0: 后续排课会被配额拦截，不在此报错
        let weekly_hours = hours.hours_for(class_name, subject_name).unwrap_or(0);

        for (position, &row_index) in row_indexes.iter().enumerate() {
            let row = &roster[row_index];
            if position >= distinct_teachers {
                warn!(
                    row_index,
                    teacher = %row.teacher_name,
                    class = %class_name,
                    subject = %subject_name,
                    "名册行位置超出推导的分组数量, 跳过该行"
                );
                plan.skipped_rows.push(SkippedRosterRow {
                    row_index,
                    teacher_name: row.teacher_name.clone(),
                    subject_name: row.subject_name.clone(),
                    class_name: class_name.clone(),
                    reason: format!(
                        "行位置 {} 超出 (班级 '{}', 科目 '{}') 的分组数量 {}",
                        position + 1,
                        class_name,
                        subject_name,
                        distinct_teachers
                    ),
                });
                continue;
            }

            plan.assignments.push(PlannedAssignment {
                teacher_name: row.teacher_name.clone(),
                subject_name: subject_name.clone(),
                class_name: class_name.clone(),
                subgroup_name: format!("{}-{}", class_name, position + 1),
                teacher_weekly_hours: weekly_hours,
            });
        }
    }

    plan
}

// ==========================================
// ImportReconciler - 批量导入引擎
// ==========================================
/// 批量导入引擎: 推导对账计划并事务化落库，产出导入摘要
pub struct ImportReconciler {
    repos: TimetableRepositories,
    config: ScheduleConfig,
}

impl ImportReconciler {
    pub fn new(repos: TimetableRepositories, config: ScheduleConfig) -> Self {
        Self { repos, config }
    }

    /// 执行一次批量导入
    ///
    /// 重复执行同一输入不产生新记录（find-or-create 幂等）。
    /// 不支持并发执行: 调用方必须串行化导入请求。
    pub fn reconcile(
        &self,
        hours: &HoursMatrix,
        roster: &[LoadRosterRow],
    ) -> RepositoryResult<ReconcileSummary> {
        let batch_id = Uuid::new_v4().to_string();
        let started = Instant::now();
        info!(
            batch_id = %batch_id,
            classes = hours.class_names.len(),
            subjects = hours.subject_names.len(),
            roster_rows = roster.len(),
            "开始批量导入"
        );

        let plan = build_plan(hours, roster);
        let stats = self
            .repos
            .import
            .apply_plan(&plan, self.config.preferred_default_shift_id)?;

        let summary = ReconcileSummary {
            batch_id,
            imported_at: chrono::Local::now().naive_local(),
            stats,
            skipped_rows: plan.skipped_rows,
            elapsed: started.elapsed(),
        };
        info!(
            batch_id = %summary.batch_id,
            classes_created = stats.classes_created,
            subgroups_created = stats.subgroups_created,
            teacher_requirements = stats.teacher_requirements_upserted,
            skipped = summary.skipped_rows.len(),
            elapsed_ms = summary.elapsed.as_millis() as u64,
            "批量导入完成"
        );
        Ok(summary)
    }
}
