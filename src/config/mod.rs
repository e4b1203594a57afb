// ==========================================
// 学校排课管理系统 - 运行配置
// ==========================================
// 批量导入的可调参数; 排课的星期/节次范围是领域不变量
// (domain::lesson)，不在配置中重复定义
// 支持从 JSON 文件加载，缺省使用内置默认值
// ==========================================

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;

// ==========================================
// ScheduleConfig - 排课配置
// ==========================================
/// 排课配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleConfig {
    /// 批量导入新建班级的首选班次ID（不存在时回退到最小班次）
    pub preferred_default_shift_id: i64,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            preferred_default_shift_id: 2,
        }
    }
}

impl ScheduleConfig {
    /// 从 JSON 文件加载配置; 文件不存在时使用默认值
    pub fn load_or_default(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("读取配置文件失败: {}", path.display()))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("解析配置文件失败: {}", path.display()))?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ScheduleConfig::default();
        assert_eq!(config.preferred_default_shift_id, 2);
    }

    #[test]
    fn test_missing_file_falls_back_to_default() {
        let config = ScheduleConfig::load_or_default(Path::new("/nonexistent/config.json"))
            .expect("缺失文件应回退到默认配置");
        assert_eq!(config.preferred_default_shift_id, 2);
    }

    #[test]
    fn test_json_overrides_default() {
        let dir = tempfile::tempdir().expect("创建临时目录失败");
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"preferred_default_shift_id": 1}"#).expect("写入配置失败");

        let config = ScheduleConfig::load_or_default(&path).expect("加载配置失败");
        assert_eq!(config.preferred_default_shift_id, 1);
    }

    #[test]
    fn test_empty_json_keeps_defaults() {
        let dir = tempfile::tempdir().expect("创建临时目录失败");
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{}").expect("写入配置失败");

        let config = ScheduleConfig::load_or_default(&path).expect("加载配置失败");
        assert_eq!(config.preferred_default_shift_id, 2);
    }
}
