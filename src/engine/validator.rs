// ==========================================
// 学校排课管理系统 - 课程校验器
// ==========================================
// 职责: 把冲突检查与配额检查编排为一次整体校验，
//       并作为课程创建/更新/删除的唯一写入闸口
// 策略: 聚合上报（一次返回全部违规），仅分组引用缺失提前终止
// ==========================================

use crate::domain::{LessonDraft, LessonMutation, LessonRuleViolation, ValidationReport};
use crate::engine::conflict::ConflictChecker;
use crate::engine::quota::QuotaChecker;
use crate::engine::repositories::TimetableRepositories;
use crate::repository::{
    LessonRepository, RepositoryError, RepositoryResult, SchoolRepository,
};
use std::sync::Arc;
use tracing::info;

// ==========================================
// LessonValidator - 课程校验器
// ==========================================
pub struct LessonValidator {
    school: Arc<SchoolRepository>,
    lessons: Arc<LessonRepository>,
    conflicts: ConflictChecker,
    quota: QuotaChecker,
}

impl LessonValidator {
    pub fn new(repos: &TimetableRepositories) -> Self {
        Self {
            school: repos.school.clone(),
            lessons: repos.lessons.clone(),
            conflicts: ConflictChecker::new(repos.lessons.clone()),
            quota: QuotaChecker::new(
                repos.school.clone(),
                repos.requirements.clone(),
                repos.lessons.clone(),
            ),
        }
    }

    /// 校验一份课程数据
    ///
    /// # 参数
    /// - `existing_lesson_id`: 更新场景传入课程自身ID，冲突与配额计数
    ///   均排除该课程（课程移回原时段不会与自己冲突）
    ///
    /// # 返回
    /// - ValidationReport: 全部违规的聚合; is_ok() 为真表示可以写入
    pub fn validate(
        &self,
        draft: &LessonDraft,
        existing_lesson_id: Option<i64>,
    ) -> RepositoryResult<ValidationReport> {
        // 分组是后续检查的锚点（配额需要班级），缺失则提前终止
        let subgroup = match self.school.get_subgroup(draft.subgroup_id)? {
            Some(sg) => sg,
            None => {
                return Ok(ValidationReport {
                    violations: vec![LessonRuleViolation::SubgroupNotFound {
                        subgroup_id: draft.subgroup_id,
                    }],
                })
            }
        };

        let mut violations = self.conflicts.check(draft, existing_lesson_id)?;
        if let Some(violation) = self
            .quota
            .check(draft, subgroup.class_id, existing_lesson_id)?
        {
            violations.push(violation);
        }

        Ok(ValidationReport { violations })
    }

    /// 校验并创建课程
    pub fn create_lesson(&self, draft: &LessonDraft) -> RepositoryResult<LessonMutation> {
        let report = self.validate(draft, None)?;
        if !report.is_ok() {
            return Ok(LessonMutation::Rejected(report.violations));
        }

        let id = self.lessons.create(draft)?;
        info!(
            lesson_id = id,
            day = draft.day_of_week,
            slot = draft.lesson_number,
            "课程已创建"
        );
        Ok(LessonMutation::Applied(id))
    }

    /// 校验并更新课程; 课程不存在返回 NotFound
    pub fn update_lesson(
        &self,
        lesson_id: i64,
        draft: &LessonDraft,
    ) -> RepositoryResult<LessonMutation> {
        if self.lessons.get(lesson_id)?.is_none() {
            return Err(RepositoryError::NotFound {
                entity: "Lesson".to_string(),
                id: lesson_id.to_string(),
            });
        }

        let report = self.validate(draft, Some(lesson_id))?;
        if !report.is_ok() {
            return Ok(LessonMutation::Rejected(report.violations));
        }

        self.lessons.update(lesson_id, draft)?;
        info!(
            lesson_id,
            day = draft.day_of_week,
            slot = draft.lesson_number,
            "课程已更新"
        );
        Ok(LessonMutation::Applied(lesson_id))
    }

    /// 删除课程; 课程不存在返回 NotFound
    pub fn delete_lesson(&self, lesson_id: i64) -> RepositoryResult<()> {
        self.lessons.delete(lesson_id)?;
        info!(lesson_id, "课程已删除");
        Ok(())
    }
}
