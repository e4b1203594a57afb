// ==========================================
// 学校排课管理系统 - 课程校验器集成测试
// ==========================================
// 覆盖: 时段冲突（教师/教室/分组）、周课时配额、
//       更新时的自我排除、分组缺失短路、写入闸口
// ==========================================


use school_timetable::domain::{LessonDraft, LessonMutation, LessonRuleViolation};
use school_timetable::engine::{LessonValidator, QuotaSource, QuotaChecker};
use school_timetable::RepositoryError;

fn draft(
    subject_id: i64,
    teacher_id: i64,
    subgroup_id: i64,
    day: i32,
    slot: i32,
    room_id: i64,
) -> LessonDraft {
    LessonDraft::new(subject_id, teacher_id, subgroup_id, day, slot, room_id)
        .expect("测试课程数据应合法")
}

// ==========================================
// 配额检查
// ==========================================

#[test]
fn test_quota_allows_up_to_class_requirement_then_rejects() {
    let (_db, repos) = test_helpers::create_test_repos().expect("创建测试数据库失败");
    let (class_id, subgroup_id, subject_id, teacher_id, room_id) =
        test_helpers::seed_minimal_school(&repos).expect("搭建测试数据失败");
    repos
        .requirements
        .upsert_class_requirement(class_id, subject_id, 4)
        .expect("写入班级课时要求失败");

    let validator = LessonValidator::new(&repos);

    // 第 1-4 节次全部通过
    for slot in 1..=4 {
        let result = validator
            .create_lesson(&draft(subject_id, teacher_id, subgroup_id, 0, slot, room_id))
            .expect("校验失败");
        assert!(result.is_applied(), "第 {} 节应通过配额", slot);
    }

    // 第 5 节超出配额 4
    let result = validator
        .create_lesson(&draft(subject_id, teacher_id, subgroup_id, 0, 5, room_id))
        .expect("校验失败");
    match result {
        LessonMutation::Rejected(violations) => {
            assert_eq!(violations.len(), 1);
            assert!(matches!(
                &violations[0],
                LessonRuleViolation::QuotaExceeded {
                    required: 4,
                    attempted: 5,
                    ..
                }
            ));
        }
        LessonMutation::Applied(_) => panic!("超配额的课程不应落库"),
    }
}

#[test]
fn test_quota_message_names_resolved_entities() {
    let (_db, repos) = test_helpers::create_test_repos().expect("创建测试数据库失败");
    let (_class_id, subgroup_id, subject_id, teacher_id, room_id) =
        test_helpers::seed_minimal_school(&repos).expect("搭建测试数据失败");
    // 未配置任何课时要求: 配额为 0，首次创建即被拒

    let validator = LessonValidator::new(&repos);
    let result = validator
        .create_lesson(&draft(subject_id, teacher_id, subgroup_id, 0, 1, room_id))
        .expect("校验失败");

    match result {
        LessonMutation::Rejected(violations) => match &violations[0] {
            LessonRuleViolation::QuotaExceeded {
                class_name,
                subgroup_name,
                subject_name,
                required,
                attempted,
            } => {
                assert_eq!(class_name, "5A");
                assert_eq!(subgroup_name, "5A-1");
                assert_eq!(subject_name, "数学");
                assert_eq!(*required, 0);
                assert_eq!(*attempted, 1);
            }
            other => panic!("期望配额违规, 实际 {:?}", other),
        },
        LessonMutation::Applied(_) => panic!("无配额配置时不应落库"),
    }
}

#[test]
fn test_teacher_requirement_takes_precedence_over_class_requirement() {
    let (_db, repos) = test_helpers::create_test_repos().expect("创建测试数据库失败");
    let (class_id, subgroup_id, subject_id, teacher_id, _room_id) =
        test_helpers::seed_minimal_school(&repos).expect("搭建测试数据失败");
    repos
        .requirements
        .upsert_class_requirement(class_id, subject_id, 4)
        .expect("写入班级课时要求失败");
    repos
        .requirements
        .upsert_teacher_requirement(teacher_id, subject_id, class_id, subgroup_id, 2)
        .expect("写入教师课时要求失败");

    let quota = QuotaChecker::new(
        repos.school.clone(),
        repos.requirements.clone(),
        repos.lessons.clone(),
    );
    let (limit, source) = quota
        .resolve_weekly_limit(subject_id, class_id, subgroup_id)
        .expect("解析配额失败");
    assert_eq!(limit, 2);
    assert_eq!(source, QuotaSource::TeacherRequirement);
}

#[test]
fn test_quota_source_fallback_chain() {
    let (_db, repos) = test_helpers::create_test_repos().expect("创建测试数据库失败");
    let (class_id, subgroup_id, subject_id, _teacher_id, _room_id) =
        test_helpers::seed_minimal_school(&repos).expect("搭建测试数据失败");

    let quota = QuotaChecker::new(
        repos.school.clone(),
        repos.requirements.clone(),
        repos.lessons.clone(),
    );

    // 无任何要求: 0 / Unspecified
    let (limit, source) = quota
        .resolve_weekly_limit(subject_id, class_id, subgroup_id)
        .expect("解析配额失败");
    assert_eq!((limit, source), (0, QuotaSource::Unspecified));

    // 仅班级级要求: 回退到 ClassRequirement
    repos
        .requirements
        .upsert_class_requirement(class_id, subject_id, 3)
        .expect("写入班级课时要求失败");
    let (limit, source) = quota
        .resolve_weekly_limit(subject_id, class_id, subgroup_id)
        .expect("解析配额失败");
    assert_eq!((limit, source), (3, QuotaSource::ClassRequirement));
}

// ==========================================
// 时段冲突
// ==========================================

#[test]
fn test_teacher_conflict_rejected_but_other_slot_succeeds() {
    let (_db, repos) = test_helpers::create_test_repos().expect("创建测试数据库失败");
    let (class_id, subgroup_id, subject_id, teacher_id, room_id) =
        test_helpers::seed_minimal_school(&repos).expect("搭建测试数据失败");
    let subgroup2_id = repos
        .school
        .create_subgroup("5A-2", class_id)
        .expect("创建第二分组失败");
    let room2_id = repos.school.create_room("102").expect("创建第二教室失败");
    repos
        .requirements
        .upsert_class_requirement(class_id, subject_id, 4)
        .expect("写入班级课时要求失败");

    let validator = LessonValidator::new(&repos);
    let first = validator
        .create_lesson(&draft(subject_id, teacher_id, subgroup_id, 2, 3, room_id))
        .expect("校验失败");
    assert!(first.is_applied());

    // 同教师同时段、不同分组不同教室: 教师冲突
    let clash = validator
        .create_lesson(&draft(subject_id, teacher_id, subgroup2_id, 2, 3, room2_id))
        .expect("校验失败");
    match clash {
        LessonMutation::Rejected(violations) => {
            assert!(violations.iter().any(|v| matches!(
                v,
                LessonRuleViolation::TeacherConflict { day: 2, slot: 3, .. }
            )));
        }
        LessonMutation::Applied(_) => panic!("教师冲突的课程不应落库"),
    }

    // 换一个节次即可通过
    let moved = validator
        .create_lesson(&draft(subject_id, teacher_id, subgroup2_id, 2, 4, room2_id))
        .expect("校验失败");
    assert!(moved.is_applied());
}

#[test]
fn test_room_and_subgroup_conflicts_are_aggregated() {
    let (_db, repos) = test_helpers::create_test_repos().expect("创建测试数据库失败");
    let (class_id, subgroup_id, subject_id, teacher_id, room_id) =
        test_helpers::seed_minimal_school(&repos).expect("搭建测试数据失败");
    let teacher2_id = repos
        .school
        .create_teacher("李老师")
        .expect("创建第二教师失败");
    repos
        .requirements
        .upsert_class_requirement(class_id, subject_id, 4)
        .expect("写入班级课时要求失败");

    let validator = LessonValidator::new(&repos);
    let first = validator
        .create_lesson(&draft(subject_id, teacher_id, subgroup_id, 1, 1, room_id))
        .expect("校验失败");
    assert!(first.is_applied());

    // 另一教师、同分组同教室同时段: 教室冲突 + 分组冲突一次性上报
    let report = validator
        .validate(
            &draft(subject_id, teacher2_id, subgroup_id, 1, 1, room_id),
            None,
        )
        .expect("校验失败");
    assert!(!report.is_ok());
    assert!(report
        .violations
        .iter()
        .any(|v| matches!(v, LessonRuleViolation::RoomConflict { .. })));
    assert!(report
        .violations
        .iter()
        .any(|v| matches!(v, LessonRuleViolation::SubgroupConflict { .. })));
}

#[test]
fn test_missing_subgroup_short_circuits_validation() {
    let (_db, repos) = test_helpers::create_test_repos().expect("创建测试数据库失败");
    let (_class_id, _subgroup_id, subject_id, teacher_id, room_id) =
        test_helpers::seed_minimal_school(&repos).expect("搭建测试数据失败");

    let validator = LessonValidator::new(&repos);
    let report = validator
        .validate(&draft(subject_id, teacher_id, 999, 0, 1, room_id), None)
        .expect("校验失败");

    // 分组缺失是唯一违规，后续检查不再执行
    assert_eq!(
        report.violations,
        vec![LessonRuleViolation::SubgroupNotFound { subgroup_id: 999 }]
    );
}

// ==========================================
// 更新与自我排除
// ==========================================

#[test]
fn test_updating_lesson_to_its_own_slot_never_self_conflicts() {
    let (_db, repos) = test_helpers::create_test_repos().expect("创建测试数据库失败");
    let (class_id, subgroup_id, subject_id, teacher_id, room_id) =
        test_helpers::seed_minimal_school(&repos).expect("搭建测试数据失败");
    repos
        .requirements
        .upsert_class_requirement(class_id, subject_id, 1)
        .expect("写入班级课时要求失败");

    let validator = LessonValidator::new(&repos);
    let lesson = draft(subject_id, teacher_id, subgroup_id, 0, 1, room_id);
    let lesson_id = match validator.create_lesson(&lesson).expect("校验失败") {
        LessonMutation::Applied(id) => id,
        LessonMutation::Rejected(v) => panic!("首次创建不应被拒: {:?}", v),
    };

    // 原样更新（配额仅 1 且时段占用的就是自己）: 必须通过
    let report = validator
        .validate(&lesson, Some(lesson_id))
        .expect("校验失败");
    assert!(report.is_ok(), "自身时段不应判为冲突: {:?}", report.violations);
}

#[test]
fn test_update_moves_lesson_and_frees_old_slot() {
    let (_db, repos) = test_helpers::create_test_repos().expect("创建测试数据库失败");
    let (class_id, subgroup_id, subject_id, teacher_id, room_id) =
        test_helpers::seed_minimal_school(&repos).expect("搭建测试数据失败");
    repos
        .requirements
        .upsert_class_requirement(class_id, subject_id, 4)
        .expect("写入班级课时要求失败");

    let validator = LessonValidator::new(&repos);
    let lesson_id = match validator
        .create_lesson(&draft(subject_id, teacher_id, subgroup_id, 2, 3, room_id))
        .expect("校验失败")
    {
        LessonMutation::Applied(id) => id,
        LessonMutation::Rejected(v) => panic!("首次创建不应被拒: {:?}", v),
    };

    // 移动到无冲突的新时段
    let moved = validator
        .update_lesson(
            lesson_id,
            &draft(subject_id, teacher_id, subgroup_id, 3, 1, room_id),
        )
        .expect("校验失败");
    assert!(moved.is_applied());

    // 旧时段已释放: 新课程可以占用 (2, 3)
    let reuse = validator
        .create_lesson(&draft(subject_id, teacher_id, subgroup_id, 2, 3, room_id))
        .expect("校验失败");
    assert!(reuse.is_applied(), "移走后的旧时段应可复用");

    // 新时段被占用: 再次创建 (3, 1) 冲突
    let report = validator
        .validate(&draft(subject_id, teacher_id, subgroup_id, 3, 1, room_id), None)
        .expect("校验失败");
    assert!(!report.is_ok());
}

#[test]
fn test_update_and_delete_of_missing_lesson_are_not_found() {
    let (_db, repos) = test_helpers::create_test_repos().expect("创建测试数据库失败");
    let (_class_id, subgroup_id, subject_id, teacher_id, room_id) =
        test_helpers::seed_minimal_school(&repos).expect("搭建测试数据失败");

    let validator = LessonValidator::new(&repos);
    let update = validator.update_lesson(
        42,
        &draft(subject_id, teacher_id, subgroup_id, 0, 1, room_id),
    );
    assert!(matches!(update, Err(RepositoryError::NotFound { .. })));

    let delete = validator.delete_lesson(42);
    assert!(matches!(delete, Err(RepositoryError::NotFound { .. })));
}
