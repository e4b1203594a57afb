// ==========================================
// 学校排课管理系统 - 课时要求领域模型
// ==========================================
// 实体: 班级课时要求 / 教师课时要求 / 教师任教科目
// ==========================================

use serde::{Deserialize, Serialize};

// ==========================================
// ClassSubjectRequirement - 班级课时要求
// ==========================================
// 班级层面某科目的合同周课时数，与班级拆成几个分组无关。
// 唯一键: (class_id, subject_id)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassSubjectRequirement {
    pub id: i64,           // 记录ID
    pub class_id: i64,     // 班级ID
    pub subject_id: i64,   // 科目ID
    pub weekly_hours: i32, // 周课时数 (如 5A 每周 4 节数学)
}

// ==========================================
// TeacherSubjectRequirement - 教师课时要求
// ==========================================
// 某分组某科目由某教师承担的课时配额，配额校验的权威来源。
// 唯一键: (teacher_id, subject_id, class_id, subgroup_id)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeacherSubjectRequirement {
    pub id: i64,                   // 记录ID
    pub teacher_id: i64,           // 教师ID
    pub subject_id: i64,           // 科目ID
    pub class_id: i64,             // 班级ID
    pub subgroup_id: i64,          // 分组ID
    pub teacher_weekly_hours: i32, // 该分组该科目的周课时配额
}

// ==========================================
// TeacherSubject - 教师任教科目
// ==========================================
// 标记教师具备某科目的任教资格，不含课时数。
// 唯一键: (teacher_id, subject_id)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeacherSubject {
    pub id: i64,         // 记录ID
    pub teacher_id: i64, // 教师ID
    pub subject_id: i64, // 科目ID
}
