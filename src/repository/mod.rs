// ==========================================
// 学校排课管理系统 - 仓储层
// ==========================================
// 职责: SQLite 持久化访问，所有 SQL 收敛在本层
// 分工: school_repo 基础实体 / requirement_repo 课时要求 /
//       lesson_repo 课表 / import_repo 批量导入事务
// ==========================================

pub mod error;
pub mod import_repo;
pub mod lesson_repo;
pub mod requirement_repo;
pub mod school_repo;

pub use error::{RepositoryError, RepositoryResult};
pub use import_repo::TimetableImportRepository;
pub use lesson_repo::LessonRepository;
pub use requirement_repo::RequirementRepository;
pub use school_repo::SchoolRepository;
