// ==========================================
// 学校排课管理系统 - 配额检查器
// ==========================================
// 规则: (分组, 科目) 的已排课数不得超过周课时配额
// 配额解析顺序: 教师课时要求 → 班级课时要求 → 0（未配置）
// ==========================================

use crate::domain::{LessonDraft, LessonRuleViolation};
use crate::repository::{
    LessonRepository, RepositoryResult, RequirementRepository, SchoolRepository,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

// ==========================================
// QuotaSource - 配额来源
// ==========================================
/// 配额来源: 说明周课时上限取自哪一级配置
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuotaSource {
    /// 教师课时要求（分组级，最优先）
    TeacherRequirement,
    /// 班级课时要求（班级级回退）
    ClassRequirement,
    /// 未配置任何要求，配额为 0
    Unspecified,
}

// ==========================================
// QuotaChecker - 配额检查器
// ==========================================
pub struct QuotaChecker {
    school: Arc<SchoolRepository>,
    requirements: Arc<RequirementRepository>,
    lessons: Arc<LessonRepository>,
}

impl QuotaChecker {
    pub fn new(
        school: Arc<SchoolRepository>,
        requirements: Arc<RequirementRepository>,
        lessons: Arc<LessonRepository>,
    ) -> Self {
        Self {
            school,
            requirements,
            lessons,
        }
    }

    /// 解析 (科目, 班级, 分组) 的周课时上限及其来源
    pub fn resolve_weekly_limit(
        &self,
        subject_id: i64,
        class_id: i64,
        subgroup_id: i64,
    ) -> RepositoryResult<(i32, QuotaSource)> {
        if let Some(req) = self
            .requirements
            .find_teacher_requirement(subject_id, class_id, subgroup_id)?
        {
            return Ok((req.teacher_weekly_hours, QuotaSource::TeacherRequirement));
        }

        if let Some(req) = self
            .requirements
            .find_class_requirement(class_id, subject_id)?
        {
            return Ok((req.weekly_hours, QuotaSource::ClassRequirement));
        }

        Ok((0, QuotaSource::Unspecified))
    }

    /// 检查新增/移动一节课后 (分组, 科目) 是否超出周课时配额
    ///
    /// 计数口径: 已排课数（排除 exclude_lesson_id）再计入待写入的这一节。
    ///
    /// # 参数
    /// - `class_id`: 分组所属班级（由调用方解析分组后传入）
    pub fn check(
        &self,
        draft: &LessonDraft,
        class_id: i64,
        exclude_lesson_id: Option<i64>,
    ) -> RepositoryResult<Option<LessonRuleViolation>> {
        let (limit, _source) =
            self.resolve_weekly_limit(draft.subject_id, class_id, draft.subgroup_id)?;

        let existing = self.lessons.count_for_subgroup_subject(
            draft.subject_id,
            draft.subgroup_id,
            exclude_lesson_id,
        )?;
        let attempted = existing as i32 + 1;

        if attempted <= limit {
            return Ok(None);
        }

        Ok(Some(LessonRuleViolation::QuotaExceeded {
            class_name: self.class_display_name(class_id)?,
            subgroup_name: self.subgroup_display_name(draft.subgroup_id)?,
            subject_name: self.subject_display_name(draft.subject_id)?,
            required: limit,
            attempted,
        }))
    }

    // ===== 违规消息中的名称解析（引用缺失时回退为 #id） =====

    fn class_display_name(&self, class_id: i64) -> RepositoryResult<String> {
        Ok(self
            .school
            .get_class(class_id)?
            .map(|c| c.name)
            .unwrap_or_else(|| format!("#{}", class_id)))
    }

    fn subgroup_display_name(&self, subgroup_id: i64) -> RepositoryResult<String> {
        Ok(self
            .school
            .get_subgroup(subgroup_id)?
            .map(|s| s.name)
            .unwrap_or_else(|| format!("#{}", subgroup_id)))
    }

    fn subject_display_name(&self, subject_id: i64) -> RepositoryResult<String> {
        Ok(self
            .school
            .get_subject(subject_id)?
            .map(|s| s.name)
            .unwrap_or_else(|| format!("#{}", subject_id)))
    }
}
