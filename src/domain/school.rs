// ==========================================
// 学校排课管理系统 - 学校主数据领域模型
// ==========================================
// 实体: 教师/科目/教室/班次/班级/分组
// 约定: 名称在各自表内唯一，id 由存储层分配
// ==========================================

use serde::{Deserialize, Serialize};

// ==========================================
// Teacher - 教师
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Teacher {
    pub id: i64,      // 教师ID
    pub name: String, // 姓名 (唯一)
}

// ==========================================
// Subject - 科目
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subject {
    pub id: i64,      // 科目ID
    pub name: String, // 科目名称 (唯一)
}

// ==========================================
// Room - 教室
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Room {
    pub id: i64,      // 教室ID
    pub name: String, // 教室名称 (唯一)
}

// ==========================================
// Shift - 班次
// ==========================================
// 用途: 班级按班次分组过滤，不参与冲突校验
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Shift {
    pub id: i64,      // 班次ID
    pub name: String, // 班次名称
}

// ==========================================
// ClassGroup - 班级
// ==========================================
// 一个班级只属于一个班次
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassGroup {
    pub id: i64,       // 班级ID
    pub name: String,  // 班级名称 (唯一, 如 "5A")
    pub shift_id: i64, // 所属班次
}

// ==========================================
// SubGroup - 班级分组
// ==========================================
// 课表的最小排课单元: 课程永远排给分组而不是班级。
// 一个班级有 1..N 个分组，科目由多名教师并行授课时班级按分组拆分。
// 命名约定: "<班级名>-<序号>"，如 "5A-1"、"5A-2"
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubGroup {
    pub id: i64,       // 分组ID
    pub name: String,  // 分组名称 (唯一)
    pub class_id: i64, // 所属班级
}
