// ==========================================
// 学校排课管理系统 - 仓储层集成测试
// ==========================================
// 覆盖: 课表唯一索引兜底、教师删除级联、班级范围查询、
//       默认班次播种
// ==========================================


use school_timetable::db;
use school_timetable::domain::LessonDraft;
use school_timetable::RepositoryError;

#[test]
fn test_lesson_unique_indexes_backstop_double_booking() {
    let (_db, repos) = test_helpers::create_test_repos().expect("创建测试数据库失败");
    let (class_id, subgroup_id, subject_id, teacher_id, room_id) =
        test_helpers::seed_minimal_school(&repos).expect("搭建测试数据失败");
    let subgroup2_id = repos
        .school
        .create_subgroup("5A-2", class_id)
        .expect("创建第二分组失败");
    let room2_id = repos.school.create_room("102").expect("创建第二教室失败");

    let first = LessonDraft::new(subject_id, teacher_id, subgroup_id, 0, 1, room_id)
        .expect("课程数据应合法");
    repos.lessons.create(&first).expect("首次写入失败");

    // 绕过校验器直接写库: 唯一索引仍拦截同教师同时段
    let clash = LessonDraft::new(subject_id, teacher_id, subgroup2_id, 0, 1, room2_id)
        .expect("课程数据应合法");
    let result = repos.lessons.create(&clash);
    assert!(matches!(
        result,
        Err(RepositoryError::UniqueConstraintViolation(_))
    ));
}

#[test]
fn test_delete_teacher_cascades_taught_subjects() {
    let (_db, repos) = test_helpers::create_test_repos().expect("创建测试数据库失败");
    let teacher_id = repos.school.create_teacher("张老师").expect("创建教师失败");
    let subject_id = repos.school.create_subject("数学").expect("创建科目失败");
    repos
        .requirements
        .create_teacher_subject(teacher_id, subject_id)
        .expect("创建任教科目失败");

    repos.school.delete_teacher(teacher_id).expect("删除教师失败");

    assert!(repos
        .school
        .get_teacher(teacher_id)
        .expect("查询教师失败")
        .is_none());
    assert!(repos
        .requirements
        .find_teacher_subject(teacher_id, subject_id)
        .expect("查询任教科目失败")
        .is_none());
}

#[test]
fn test_delete_missing_teacher_is_not_found() {
    let (_db, repos) = test_helpers::create_test_repos().expect("创建测试数据库失败");
    let result = repos.school.delete_teacher(42);
    assert!(matches!(result, Err(RepositoryError::NotFound { .. })));
}

#[test]
fn test_duplicate_names_hit_unique_constraint() {
    let (_db, repos) = test_helpers::create_test_repos().expect("创建测试数据库失败");
    repos.school.create_teacher("张老师").expect("创建教师失败");
    let result = repos.school.create_teacher("张老师");
    assert!(matches!(
        result,
        Err(RepositoryError::UniqueConstraintViolation(_))
    ));
}

#[test]
fn test_class_scoped_queries() {
    let (_db, repos) = test_helpers::create_test_repos().expect("创建测试数据库失败");
    let (class_id, subgroup_id, subject_id, teacher_id, _room_id) =
        test_helpers::seed_minimal_school(&repos).expect("搭建测试数据失败");
    let other_class_id = repos.school.create_class("6B", 1).expect("创建班级失败");
    let other_subject_id = repos.school.create_subject("语文").expect("创建科目失败");
    let other_teacher_id = repos.school.create_teacher("李老师").expect("创建教师失败");
    let other_subgroup_id = repos
        .school
        .create_subgroup("6B-1", other_class_id)
        .expect("创建分组失败");

    repos
        .requirements
        .upsert_class_requirement(class_id, subject_id, 4)
        .expect("写入班级课时要求失败");
    repos
        .requirements
        .upsert_teacher_requirement(teacher_id, subject_id, class_id, subgroup_id, 4)
        .expect("写入教师课时要求失败");
    // 另一个班级的数据不应串入
    repos
        .requirements
        .upsert_class_requirement(other_class_id, other_subject_id, 3)
        .expect("写入班级课时要求失败");
    repos
        .requirements
        .upsert_teacher_requirement(
            other_teacher_id,
            other_subject_id,
            other_class_id,
            other_subgroup_id,
            3,
        )
        .expect("写入教师课时要求失败");

    let subjects = repos
        .requirements
        .list_subjects_for_class(class_id)
        .expect("查询班级科目失败");
    assert_eq!(subjects.len(), 1);
    assert_eq!(subjects[0].name, "数学");

    let teachers = repos
        .requirements
        .list_teachers_for_class(class_id)
        .expect("查询班级教师失败");
    assert_eq!(teachers.len(), 1);
    assert_eq!(teachers[0].name, "张老师");

    let by_subject = repos
        .requirements
        .list_teachers_for_class_and_subject(class_id, subject_id)
        .expect("查询科目教师失败");
    assert_eq!(by_subject.len(), 1);
    assert_eq!(by_subject[0].id, teachers[0].id);

    let none = repos
        .requirements
        .list_teachers_for_class_and_subject(class_id, other_subject_id)
        .expect("查询科目教师失败");
    assert!(none.is_empty());
}

#[test]
fn test_shift_seeding_runs_once() {
    let (db_file, repos) = test_helpers::create_test_repos().expect("创建测试数据库失败");
    let shifts = repos.school.list_shifts().expect("查询班次失败");
    assert_eq!(shifts.len() as i64, db::DEFAULT_SHIFT_COUNT);

    // 再次播种不应新增
    let raw = test_helpers::open_raw_connection(&db_file).expect("打开裸连接失败");
    let seeded = db::seed_default_shifts(&raw).expect("播种失败");
    assert!(!seeded);
    let count: i64 = raw
        .query_row("SELECT COUNT(*) FROM shifts", [], |row| row.get(0))
        .expect("统计班次失败");
    assert_eq!(count, db::DEFAULT_SHIFT_COUNT);
}

#[test]
fn test_list_subgroups_by_class_is_scoped_and_ordered() {
    let (_db, repos) = test_helpers::create_test_repos().expect("创建测试数据库失败");
    let class_id = repos.school.create_class("5A", 1).expect("创建班级失败");
    let other_class_id = repos.school.create_class("6B", 1).expect("创建班级失败");
    repos
        .school
        .create_subgroup("5A-2", class_id)
        .expect("创建分组失败");
    repos
        .school
        .create_subgroup("5A-1", class_id)
        .expect("创建分组失败");
    repos
        .school
        .create_subgroup("6B-1", other_class_id)
        .expect("创建分组失败");

    let subgroups = repos
        .school
        .list_subgroups_by_class(class_id)
        .expect("查询分组失败");
    let names: Vec<&str> = subgroups.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["5A-1", "5A-2"]);
}
