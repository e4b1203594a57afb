// ==========================================
// 学校排课管理系统 - 命令行入口
// ==========================================
// 用法: school-timetable <数据库路径> <课时矩阵文件> <任课名册文件> [配置文件]
// 职责: 初始化数据库后执行一次批量导入，输出导入摘要
// ==========================================

use anyhow::{bail, Context};
use school_timetable::config::ScheduleConfig;
use school_timetable::db;
use school_timetable::engine::{ImportReconciler, TimetableRepositories};
use school_timetable::importer::{parse_hours_matrix, parse_load_roster};
use school_timetable::logging;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::{info, warn};

fn main() -> anyhow::Result<()> {
    // 初始化日志系统
    logging::init();

    info!("==================================================");
    info!("{}", school_timetable::APP_NAME);
    info!("系统版本: {}", school_timetable::VERSION);
    info!("==================================================");

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 4 {
        bail!(
            "用法: {} <数据库路径> <课时矩阵文件> <任课名册文件> [配置文件]",
            args[0]
        );
    }
    let db_path = args[1].clone();
    let hours_path = PathBuf::from(&args[2]);
    let roster_path = PathBuf::from(&args[3]);
    let config = match args.get(4) {
        Some(path) => ScheduleConfig::load_or_default(Path::new(path))?,
        None => ScheduleConfig::default(),
    };

    // 初始化数据库
    info!("使用数据库: {}", db_path);
    let conn = db::open_sqlite_connection(&db_path).context("打开数据库失败")?;
    db::init_schema(&conn).context("初始化数据库结构失败")?;
    if db::seed_default_shifts(&conn).context("播种默认班次失败")? {
        info!("shifts 表为空, 已播种 {} 个默认班次", db::DEFAULT_SHIFT_COUNT);
    }

    // 解析导入文件
    info!("解析课时矩阵: {}", hours_path.display());
    let hours = parse_hours_matrix(&hours_path).context("解析课时矩阵失败")?;
    info!(
        classes = hours.class_names.len(),
        subjects = hours.subject_names.len(),
        "课时矩阵解析完成"
    );

    info!("解析任课名册: {}", roster_path.display());
    let roster = parse_load_roster(&roster_path).context("解析任课名册失败")?;
    info!(rows = roster.len(), "任课名册解析完成");

    // 执行批量导入
    let repos = TimetableRepositories::from_connection(Arc::new(Mutex::new(conn)));
    let reconciler = ImportReconciler::new(repos, config);
    let summary = reconciler.reconcile(&hours, &roster)?;

    info!("批次ID: {}", summary.batch_id);
    info!(
        "新建: 班级 {} / 科目 {} / 教师 {} / 教室 {} / 分组 {}",
        summary.stats.classes_created,
        summary.stats.subjects_created,
        summary.stats.teachers_created,
        summary.stats.rooms_created,
        summary.stats.subgroups_created
    );
    info!(
        "课时要求: 班级级 {} / 教师级 {} / 任教科目 {}",
        summary.stats.class_requirements_upserted,
        summary.stats.teacher_requirements_upserted,
        summary.stats.teacher_subjects_created
    );
    for skipped in &summary.skipped_rows {
        warn!(
            row = skipped.row_index,
            teacher = %skipped.teacher_name,
            "跳过名册行: {}",
            skipped.reason
        );
    }
    info!("导入完成, 耗时 {} ms", summary.elapsed.as_millis());

    Ok(())
}
