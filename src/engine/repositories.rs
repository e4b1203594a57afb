// ==========================================
// 学校排课管理系统 - 仓储聚合
// ==========================================
// 职责: 从单个数据库连接构建全部仓储，供引擎层与入口程序共享
// ==========================================

use crate::repository::{
    LessonRepository, RequirementRepository, SchoolRepository, TimetableImportRepository,
};
use rusqlite::Connection;
use std::sync::{Arc, Mutex};

// ==========================================
// TimetableRepositories - 仓储聚合
// ==========================================
/// 仓储聚合: 各仓储共享同一个 `Arc<Mutex<Connection>>`
#[derive(Clone)]
pub struct TimetableRepositories {
    pub school: Arc<SchoolRepository>,
    pub requirements: Arc<RequirementRepository>,
    pub lessons: Arc<LessonRepository>,
    pub import: Arc<TimetableImportRepository>,
}

impl TimetableRepositories {
    /// 从共享连接构建全部仓储
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self {
            school: Arc::new(SchoolRepository::from_connection(conn.clone())),
            requirements: Arc::new(RequirementRepository::from_connection(conn.clone())),
            lessons: Arc::new(LessonRepository::from_connection(conn.clone())),
            import: Arc::new(TimetableImportRepository::from_connection(conn)),
        }
    }
}
