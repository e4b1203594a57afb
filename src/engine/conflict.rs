// ==========================================
// 学校排课管理系统 - 冲突检查器
// ==========================================
// 规则: 同一 (资源, 星期, 节次) 只能安排一节课
// 资源种类: 教师 / 教室 / 分组
// 纯查询，无任何副作用
// ==========================================

use crate::domain::{LessonDraft, LessonRuleViolation, ResourceKind};
use crate::repository::{LessonRepository, RepositoryResult};
use std::sync::Arc;

// ==========================================
// ConflictChecker - 冲突检查器
// ==========================================
pub struct ConflictChecker {
    lessons: Arc<LessonRepository>,
}

impl ConflictChecker {
    pub fn new(lessons: Arc<LessonRepository>) -> Self {
        Self { lessons }
    }

    /// 指定资源在 (星期, 节次) 是否已被占用
    ///
    /// # 参数
    /// - `exclude_lesson_id`: 更新场景下排除课程自身，避免自我冲突
    pub fn is_busy(
        &self,
        kind: ResourceKind,
        resource_id: i64,
        day_of_week: i32,
        lesson_number: i32,
        exclude_lesson_id: Option<i64>,
    ) -> RepositoryResult<bool> {
        self.lessons
            .is_resource_busy(kind, resource_id, day_of_week, lesson_number, exclude_lesson_id)
    }

    /// 检查课程数据的全部时段冲突（教师 / 教室 / 分组）
    ///
    /// 三项检查全部执行，违规聚合返回，不做短路。
    pub fn check(
        &self,
        draft: &LessonDraft,
        exclude_lesson_id: Option<i64>,
    ) -> RepositoryResult<Vec<LessonRuleViolation>> {
        let mut violations = Vec::new();

        if self.is_busy(
            ResourceKind::Teacher,
            draft.teacher_id,
            draft.day_of_week,
            draft.lesson_number,
            exclude_lesson_id,
        )? {
            violations.push(LessonRuleViolation::TeacherConflict {
                teacher_id: draft.teacher_id,
                day: draft.day_of_week,
                slot: draft.lesson_number,
            });
        }

        if self.is_busy(
            ResourceKind::Room,
            draft.room_id,
            draft.day_of_week,
            draft.lesson_number,
            exclude_lesson_id,
        )? {
            violations.push(LessonRuleViolation::RoomConflict {
                room_id: draft.room_id,
                day: draft.day_of_week,
                slot: draft.lesson_number,
            });
        }

        if self.is_busy(
            ResourceKind::SubGroup,
            draft.subgroup_id,
            draft.day_of_week,
            draft.lesson_number,
            exclude_lesson_id,
        )? {
            violations.push(LessonRuleViolation::SubgroupConflict {
                subgroup_id: draft.subgroup_id,
                day: draft.day_of_week,
                slot: draft.lesson_number,
            });
        }

        Ok(violations)
    }
}
