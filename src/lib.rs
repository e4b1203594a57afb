// ==========================================
// 学校排课管理系统 - 核心库
// ==========================================
// 技术栈: Rust + SQLite
// 系统定位: 课表约束校验 + 批量数据导入
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 引擎层 - 业务规则
pub mod engine;

// 导入层 - 外部数据
pub mod importer;

// 配置层 - 系统配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一/建表）
pub mod db;

// 日志系统
pub mod logging;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域实体
pub use domain::{
    ClassGroup, ClassSubjectRequirement, Lesson, LessonDraft, Room, Shift, SubGroup, Subject,
    Teacher, TeacherSubject, TeacherSubjectRequirement,
};

// 领域值类型
pub use domain::{
    LessonMutation, LessonRuleViolation, ReconcilePlan, ReconcileSummary, ResourceKind,
    ValidationReport,
};

// 引擎
pub use engine::{
    ConflictChecker, ImportReconciler, LessonValidator, QuotaChecker, QuotaSource,
    TimetableRepositories,
};

// 仓储
pub use repository::{
    LessonRepository, RepositoryError, RepositoryResult, RequirementRepository, SchoolRepository,
    TimetableImportRepository,
};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "学校排课管理系统";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
