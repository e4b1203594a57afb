// ==========================================
// 学校排课管理系统 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型、校验结果
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod import;
pub mod lesson;
pub mod requirement;
pub mod school;

// 重导出核心类型
pub use import::{
    HoursMatrix, LoadRosterRow, PlannedAssignment, PlannedClassRequirement, PlannedSubgroup,
    ReconcilePlan, ReconcileStats, ReconcileSummary, SkippedRosterRow,
};
pub use lesson::{
    Lesson, LessonDraft, LessonFieldError, LessonMutation, LessonRuleViolation, ResourceKind,
    ValidationReport, MAX_DAY_OF_WEEK,
};
pub use requirement::{ClassSubjectRequirement, TeacherSubject, TeacherSubjectRequirement};
pub use school::{ClassGroup, Room, Shift, SubGroup, Subject, Teacher};
