// ==========================================
// 学校排课管理系统 - 课程领域模型
// ==========================================
// 实体: Lesson (课表的原子单元) 与 LessonDraft (待校验的课程数据)
// 值类型: 资源种类 / 规则违规 / 校验报告 / 写入结果
// ==========================================

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 星期上限 (0=周一 .. 4=周五)
pub const MAX_DAY_OF_WEEK: i32 = 4;

// ==========================================
// Lesson - 课程
// ==========================================
// 课表的原子单元: 一个分组、一个科目、一名教师、一间教室、一个 (星期, 节次)。
// 只能经由 LessonValidator 的校验闸口创建/更新/删除。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lesson {
    pub id: i64,           // 课程ID
    pub subject_id: i64,   // 科目ID
    pub teacher_id: i64,   // 教师ID
    pub subgroup_id: i64,  // 分组ID
    pub day_of_week: i32,  // 星期 (0=周一 .. 4=周五)
    pub lesson_number: i32,// 节次 (从 1 开始)
    pub room_id: i64,      // 教室ID
}

// ==========================================
// LessonDraft - 待校验课程数据
// ==========================================
/// 待校验课程数据
///
/// 字段合法性在构造时检查，而不是在使用时:
/// - day_of_week ∈ [0, 4]
/// - lesson_number ≥ 1
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LessonDraft {
    pub subject_id: i64,
    pub teacher_id: i64,
    pub subgroup_id: i64,
    pub day_of_week: i32,
    pub lesson_number: i32,
    pub room_id: i64,
}

impl LessonDraft {
    /// 构造课程数据，校验字段范围
    pub fn new(
        subject_id: i64,
        teacher_id: i64,
        subgroup_id: i64,
        day_of_week: i32,
        lesson_number: i32,
        room_id: i64,
    ) -> Result<Self, LessonFieldError> {
        if !(0..=MAX_DAY_OF_WEEK).contains(&day_of_week) {
            return Err(LessonFieldError::DayOutOfRange { value: day_of_week });
        }
        if lesson_number < 1 {
            return Err(LessonFieldError::LessonNumberOutOfRange {
                value: lesson_number,
            });
        }
        Ok(Self {
            subject_id,
            teacher_id,
            subgroup_id,
            day_of_week,
            lesson_number,
            room_id,
        })
    }
}

/// 课程字段错误（构造期检查）
#[derive(Error, Debug, PartialEq, Eq)]
pub enum LessonFieldError {
    #[error("星期超出范围: {value}（允许 0=周一 .. 4=周五）")]
    DayOutOfRange { value: i32 },

    #[error("节次超出范围: {value}（节次从 1 开始）")]
    LessonNumberOutOfRange { value: i32 },
}

// ==========================================
// ResourceKind - 排他资源种类
// ==========================================
// 冲突检查的对象: 同一 (资源, 星期, 节次) 只能有一节课
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResourceKind {
    Teacher,
    Room,
    SubGroup,
}

impl ResourceKind {
    /// 资源对应 lessons 表的列名（仓储层拼 SQL 时使用）
    pub fn lesson_column(&self) -> &'static str {
        match self {
            ResourceKind::Teacher => "teacher_id",
            ResourceKind::Room => "room_id",
            ResourceKind::SubGroup => "subgroup_id",
        }
    }

    /// 资源的展示名称
    pub fn display_name(&self) -> &'static str {
        match self {
            ResourceKind::Teacher => "教师",
            ResourceKind::Room => "教室",
            ResourceKind::SubGroup => "分组",
        }
    }
}

// ==========================================
// LessonRuleViolation - 排课规则违规
// ==========================================
/// 排课规则违规
///
/// 违规是校验的"结果值"而不是错误: 校验器收集全部违规后整体返回，
/// 只有分组引用缺失会提前终止（后续检查依赖 class_id）。
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LessonRuleViolation {
    #[error("分组 ID {subgroup_id} 不存在")]
    SubgroupNotFound { subgroup_id: i64 },

    #[error("教师 ID {teacher_id} 在该时段已被占用（星期 {day}, 第 {slot} 节）")]
    TeacherConflict { teacher_id: i64, day: i32, slot: i32 },

    #[error("教室 ID {room_id} 在该时段已被占用（星期 {day}, 第 {slot} 节）")]
    RoomConflict { room_id: i64, day: i32, slot: i32 },

    #[error("分组 ID {subgroup_id} 在该时段已被占用（星期 {day}, 第 {slot} 节）")]
    SubgroupConflict { subgroup_id: i64, day: i32, slot: i32 },

    #[error(
        "班级 '{class_name}' 分组 '{subgroup_name}' 科目 '{subject_name}' 周课时超限: \
         配额 {required}, 计入本次后 {attempted}"
    )]
    QuotaExceeded {
        class_name: String,
        subgroup_name: String,
        subject_name: String,
        required: i32,
        attempted: i32,
    },
}

// ==========================================
// ValidationReport - 校验报告
// ==========================================
/// 校验报告: 聚合全部违规，一次返回给调用方
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidationReport {
    pub violations: Vec<LessonRuleViolation>,
}

impl ValidationReport {
    /// 全部检查通过
    pub fn is_ok(&self) -> bool {
        self.violations.is_empty()
    }

    /// 违规的文字描述列表
    pub fn messages(&self) -> Vec<String> {
        self.violations.iter().map(|v| v.to_string()).collect()
    }
}

// ==========================================
// LessonMutation - 课程写入结果
// ==========================================
/// 课程写入结果: 通过校验并落库, 或被规则拒绝
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum LessonMutation {
    /// 已写入，携带课程ID
    Applied(i64),
    /// 被规则拒绝，携带全部违规
    Rejected(Vec<LessonRuleViolation>),
}

impl LessonMutation {
    pub fn is_applied(&self) -> bool {
        matches!(self, LessonMutation::Applied(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draft_rejects_day_out_of_range() {
        let err = LessonDraft::new(1, 1, 1, 5, 1, 1).unwrap_err();
        assert_eq!(err, LessonFieldError::DayOutOfRange { value: 5 });

        let err = LessonDraft::new(1, 1, 1, -1, 1, 1).unwrap_err();
        assert_eq!(err, LessonFieldError::DayOutOfRange { value: -1 });
    }

    #[test]
    fn test_draft_rejects_nonpositive_lesson_number() {
        let err = LessonDraft::new(1, 1, 1, 0, 0, 1).unwrap_err();
        assert_eq!(err, LessonFieldError::LessonNumberOutOfRange { value: 0 });
    }

    #[test]
    fn test_draft_accepts_valid_fields() {
        let draft = LessonDraft::new(1, 2, 3, 4, 6, 5).unwrap();
        assert_eq!(draft.day_of_week, 4);
        assert_eq!(draft.lesson_number, 6);
    }

    #[test]
    fn test_violation_message_names_resources() {
        let v = LessonRuleViolation::QuotaExceeded {
            class_name: "5A".to_string(),
            subgroup_name: "5A-1".to_string(),
            subject_name: "数学".to_string(),
            required: 4,
            attempted: 5,
        };
        let msg = v.to_string();
        assert!(msg.contains("5A-1"));
        assert!(msg.contains("数学"));
        assert!(msg.contains('4'));
        assert!(msg.contains('5'));
    }
}
