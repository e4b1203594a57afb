// ==========================================
// 学校排课管理系统 - 导入模块
// ==========================================
// 文件解析: 课时矩阵与任课名册 → 领域输入类型
// 对账与落库在 engine::reconciler / repository::import_repo
// ==========================================

pub mod error;
pub mod file_parser;

pub use error::{ImportError, ImportResult};
pub use file_parser::{parse_hours_matrix, parse_load_roster};
