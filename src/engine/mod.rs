// ==========================================
// 学校排课管理系统 - 引擎层
// ==========================================
// 业务规则所在: 冲突检查 / 配额检查 / 课程校验闸口 / 批量导入对账
// 引擎只依赖仓储接口，不直接持有 SQL
// ==========================================

pub mod conflict;
pub mod quota;
pub mod reconciler;
pub mod repositories;
pub mod validator;

pub use conflict::ConflictChecker;
pub use quota::{QuotaChecker, QuotaSource};
pub use reconciler::{build_plan, ImportReconciler};
pub use repositories::TimetableRepositories;
pub use validator::LessonValidator;
