// ==========================================
// 学校排课管理系统 - 批量导入领域模型
// ==========================================
// 输入: 课时矩阵 (班级×科目) + 任课名册 (教师/科目/班级/教室)
// 输出: 对账计划 (按名称描述的待建实体与课时要求) + 导入摘要
// ==========================================

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

// ==========================================
// HoursMatrix - 课时矩阵
// ==========================================
/// 课时矩阵: 行=班级, 列=科目, 单元格=周课时数
///
/// 保留源文件中的行列顺序; 空白或 0 的单元格视为"不开课"，不予保存。
#[derive(Debug, Clone, Default)]
pub struct HoursMatrix {
    /// 班级名称，按源文件行顺序
    pub class_names: Vec<String>,
    /// 科目名称，按源文件列顺序
    pub subject_names: Vec<String>,
    /// (班级, 科目) → 周课时数，仅保存 > 0 的单元格
    cells: HashMap<(String, String), i32>,
}

impl HoursMatrix {
    pub fn new(class_names: Vec<String>, subject_names: Vec<String>) -> Self {
        Self {
            class_names,
            subject_names,
            cells: HashMap::new(),
        }
    }

    /// 写入单元格；非正数视为"不开课"，忽略
    pub fn set_hours(&mut self, class_name: &str, subject_name: &str, weekly_hours: i32) {
        if weekly_hours > 0 {
            self.cells
                .insert((class_name.to_string(), subject_name.to_string()), weekly_hours);
        }
    }

    /// 读取单元格；未开课返回 None
    pub fn hours_for(&self, class_name: &str, subject_name: &str) -> Option<i32> {
        self.cells
            .get(&(class_name.to_string(), subject_name.to_string()))
            .copied()
    }
}

// ==========================================
// LoadRosterRow - 任课名册行
// ==========================================
/// 任课名册行: (教师, 科目, 班级, 教室)
///
/// 行在源文件中的顺序是分组编号分配的依据，解析时必须保序。
/// weekly_hours 列按导入口径解析但不参与对账（配额以课时矩阵为准）。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadRosterRow {
    pub teacher_name: String,
    pub subject_name: String,
    pub class_name: String,
    pub room_name: String,
    pub weekly_hours: Option<i32>,
}

// ==========================================
// ReconcilePlan - 对账计划
// ==========================================
/// 对账计划: 纯推导阶段的产物，全部以唯一名称描述，
/// 名称在事务化落库阶段才解析为 ID。
#[derive(Debug, Clone, Default)]
pub struct ReconcilePlan {
    /// 待确保存在的班级名（课时矩阵行序 + 名册补充）
    pub class_names: Vec<String>,
    /// 待确保存在的科目名（课时矩阵列序）
    pub subject_names: Vec<String>,
    /// 待确保存在的教师名（名册首见顺序）
    pub teacher_names: Vec<String>,
    /// 待确保存在的教室名（名册首见顺序）
    pub room_names: Vec<String>,
    /// 待确保存在的分组
    pub subgroups: Vec<PlannedSubgroup>,
    /// 班级课时要求 (课时矩阵单元格 > 0)
    pub class_requirements: Vec<PlannedClassRequirement>,
    /// 名册行 → 分组的指派（含教师任教科目与教师课时要求的物化依据）
    pub assignments: Vec<PlannedAssignment>,
    /// 无法指派分组而被跳过的名册行
    pub skipped_rows: Vec<SkippedRosterRow>,
}

/// 待建分组
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedSubgroup {
    pub name: String,       // 如 "5A-1"
    pub class_name: String, // 所属班级名
}

/// 待物化的班级课时要求
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedClassRequirement {
    pub class_name: String,
    pub subject_name: String,
    pub weekly_hours: i32,
}

/// 名册行的分组指派
///
/// teacher_weekly_hours 取该 (班级, 科目) 的班级课时数——拆分科目的
/// 每个分组各自获得完整的班级课时配额；课时矩阵缺该单元格时为 0，
/// 后续对该分组/科目的排课将始终被配额拦截（文档化行为，不报错）。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedAssignment {
    pub teacher_name: String,
    pub subject_name: String,
    pub class_name: String,
    pub subgroup_name: String,
    pub teacher_weekly_hours: i32,
}

/// 被跳过的名册行（部分成功策略: 单行异常不中止整次导入）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedRosterRow {
    /// 行在名册中的位置（0 起）
    pub row_index: usize,
    pub teacher_name: String,
    pub subject_name: String,
    pub class_name: String,
    /// 跳过原因
    pub reason: String,
}

// ==========================================
// ReconcileStats - 落库统计
// ==========================================
/// 事务化落库阶段的计数（仅统计本次新建/更新的记录）
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ReconcileStats {
    pub classes_created: usize,
    pub subjects_created: usize,
    pub teachers_created: usize,
    pub rooms_created: usize,
    pub subgroups_created: usize,
    pub class_requirements_upserted: usize,
    pub teacher_subjects_created: usize,
    pub teacher_requirements_upserted: usize,
}

// ==========================================
// ReconcileSummary - 导入摘要
// ==========================================
/// 一次批量导入的整体结果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconcileSummary {
    /// 批次ID
    pub batch_id: String,
    /// 导入时间
    pub imported_at: NaiveDateTime,
    /// 落库统计
    pub stats: ReconcileStats,
    /// 被跳过的名册行
    pub skipped_rows: Vec<SkippedRosterRow>,
    /// 耗时
    #[serde(skip)]
    pub elapsed: Duration,
}
