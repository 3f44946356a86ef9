//! 仓储集成测试
//!
//! 需要 PostgreSQL。设置 DATABASE_URL 后运行 `cargo test -- --ignored`，
//! sqlx 为每个测试创建独立数据库，迁移在测试内手工应用。

use chrono::{Duration, Utc};
use sqlx::PgPool;

use case_tracker::domain::entities::{CaseQuery, SupportCase};
use case_tracker::domain::repositories::{
    CaseFilter, CaseRepository, CaseSort, QueryRepository, SortField, SortOrder,
};
use case_tracker::domain::unit_of_work::UnitOfWorkFactory;
use case_tracker::domain::value_objects::{CasePriority, CaseStatus, CaseType, Email};
use case_tracker::infrastructure::persistence::{
    migrations, PostgresCaseRepository, PostgresQueryRepository, PostgresUnitOfWorkFactory,
};
use tracker_adapter_postgres::MigrationManager;
use tracker_common::{CaseId, Pagination};

// ============================================================
// 测试辅助
// ============================================================

async fn apply_migrations(pool: &PgPool) {
    let result = MigrationManager::new(pool.clone())
        .migrate(&migrations::all())
        .await
        .unwrap();
    assert!(
        result.is_success(),
        "Migrations failed: {:?}",
        result.errors
    );
}

fn create_test_case(title: &str) -> SupportCase {
    SupportCase::create(
        title.to_string(),
        Some("integration fixture".to_string()),
        CaseType::Support,
        CasePriority::Medium,
        Email::new("fixture@example.com").unwrap(),
    )
    .unwrap()
}

fn create_test_query(case_id: CaseId, query_text: &str) -> CaseQuery {
    CaseQuery::create(
        case_id,
        "orders".to_string(),
        "public".to_string(),
        query_text.to_string(),
        Email::new("fixture@example.com").unwrap(),
        Some(10),
        Some(2),
    )
    .unwrap()
}

// ============================================================
// CaseRepository
// ============================================================

#[sqlx::test(migrations = false)]
#[ignore = "requires database"]
async fn test_case_repository_save_and_find_by_id(pool: PgPool) {
    apply_migrations(&pool).await;
    let repo = PostgresCaseRepository::new(pool);

    let case = create_test_case("Replica lag on orders db");
    repo.save(&case).await.unwrap();

    let found = repo.find_by_id(&case.id).await.unwrap().unwrap();

    assert_eq!(found.id, case.id);
    assert_eq!(found.title, case.title);
    assert_eq!(found.description, case.description);
    assert_eq!(found.case_type, CaseType::Support);
    assert_eq!(found.priority, CasePriority::Medium);
    assert_eq!(found.status, CaseStatus::Open);
    assert_eq!(found.created_by, case.created_by);
    // 列表与单查均不内联查询记录
    assert!(found.queries.is_empty());
}

#[sqlx::test(migrations = false)]
#[ignore = "requires database"]
async fn test_case_repository_find_by_id_miss_returns_none(pool: PgPool) {
    apply_migrations(&pool).await;
    let repo = PostgresCaseRepository::new(pool);

    let found = repo.find_by_id(&CaseId::new()).await.unwrap();

    assert!(found.is_none());
}

#[sqlx::test(migrations = false)]
#[ignore = "requires database"]
async fn test_case_repository_duplicate_id_is_database_error(pool: PgPool) {
    apply_migrations(&pool).await;
    let repo = PostgresCaseRepository::new(pool);

    let case = create_test_case("Duplicate insert");
    repo.save(&case).await.unwrap();

    let result = repo.save(&case).await;

    assert!(result.is_err());
}

#[sqlx::test(migrations = false)]
#[ignore = "requires database"]
async fn test_case_repository_paginates_and_counts(pool: PgPool) {
    apply_migrations(&pool).await;
    let repo = PostgresCaseRepository::new(pool);

    let base = Utc::now() - Duration::hours(1);
    for i in 0..15 {
        let mut case = create_test_case(&format!("Case number {:02}", i));
        case.created_at = base + Duration::minutes(i);
        case.updated_at = case.created_at;
        repo.save(&case).await.unwrap();
    }

    let filter = CaseFilter::default();
    let sort = CaseSort::default();

    let (first_page, total) = repo
        .find_all(&filter, &sort, &Pagination::new(1, 10))
        .await
        .unwrap();
    assert_eq!(total, 15);
    assert_eq!(first_page.len(), 10);
    // 默认 created_at 降序，最新的排最前
    assert_eq!(first_page[0].title, "Case number 14");

    let (second_page, total) = repo
        .find_all(&filter, &sort, &Pagination::new(2, 10))
        .await
        .unwrap();
    assert_eq!(total, 15);
    assert_eq!(second_page.len(), 5);
    assert_eq!(second_page[4].title, "Case number 00");
}

#[sqlx::test(migrations = false)]
#[ignore = "requires database"]
async fn test_case_repository_filters_combine_with_and(pool: PgPool) {
    apply_migrations(&pool).await;
    let repo = PostgresCaseRepository::new(pool);

    let mut matching = create_test_case("High priority outage");
    matching.priority = CasePriority::High;
    matching.status = CaseStatus::InProgress;
    repo.save(&matching).await.unwrap();

    let mut wrong_status = create_test_case("High priority but open");
    wrong_status.priority = CasePriority::High;
    repo.save(&wrong_status).await.unwrap();

    let wrong_priority = create_test_case("Medium in progress");
    repo.save(&wrong_priority).await.unwrap();

    let filter = CaseFilter {
        status: Some(CaseStatus::InProgress),
        priority: Some(CasePriority::High),
        ..Default::default()
    };

    let (cases, total) = repo
        .find_all(&filter, &CaseSort::default(), &Pagination::new(1, 10))
        .await
        .unwrap();

    assert_eq!(total, 1);
    assert_eq!(cases[0].id, matching.id);
}

#[sqlx::test(migrations = false)]
#[ignore = "requires database"]
async fn test_case_repository_search_is_case_insensitive_on_both_columns(pool: PgPool) {
    apply_migrations(&pool).await;
    let repo = PostgresCaseRepository::new(pool);

    let by_title = create_test_case("DEADLOCK detected in settlements");
    repo.save(&by_title).await.unwrap();

    let mut by_description = create_test_case("Nightly batch slow");
    by_description.description = Some("suspected deadlock between workers".to_string());
    repo.save(&by_description).await.unwrap();

    let unrelated = create_test_case("Disk usage alert");
    repo.save(&unrelated).await.unwrap();

    let filter = CaseFilter {
        search: Some("deadlock".to_string()),
        ..Default::default()
    };

    let (cases, total) = repo
        .find_all(&filter, &CaseSort::default(), &Pagination::new(1, 10))
        .await
        .unwrap();

    assert_eq!(total, 2);
    assert!(cases.iter().any(|c| c.id == by_title.id));
    assert!(cases.iter().any(|c| c.id == by_description.id));
}

#[sqlx::test(migrations = false)]
#[ignore = "requires database"]
async fn test_case_repository_date_range_filter(pool: PgPool) {
    apply_migrations(&pool).await;
    let repo = PostgresCaseRepository::new(pool);

    let base = Utc::now() - Duration::days(10);
    for day in 0..5 {
        let mut case = create_test_case(&format!("Day {} case", day));
        case.created_at = base + Duration::days(day);
        case.updated_at = case.created_at;
        repo.save(&case).await.unwrap();
    }

    let filter = CaseFilter {
        date_gte: Some(base + Duration::days(1)),
        date_lte: Some(base + Duration::days(3)),
        ..Default::default()
    };

    let (cases, total) = repo
        .find_all(&filter, &CaseSort::default(), &Pagination::new(1, 10))
        .await
        .unwrap();

    assert_eq!(total, 3);
    assert!(cases.iter().all(|c| c.title != "Day 0 case"));
    assert!(cases.iter().all(|c| c.title != "Day 4 case"));
}

#[sqlx::test(migrations = false)]
#[ignore = "requires database"]
async fn test_case_repository_sorts_by_title_ascending(pool: PgPool) {
    apply_migrations(&pool).await;
    let repo = PostgresCaseRepository::new(pool);

    for title in ["bravo", "alpha", "charlie"] {
        repo.save(&create_test_case(title)).await.unwrap();
    }

    let sort = CaseSort {
        field: SortField::Title,
        order: SortOrder::Asc,
    };

    let (cases, _) = repo
        .find_all(&CaseFilter::default(), &sort, &Pagination::new(1, 10))
        .await
        .unwrap();

    let titles: Vec<&str> = cases.iter().map(|c| c.title.as_str()).collect();
    assert_eq!(titles, vec!["alpha", "bravo", "charlie"]);
}

// ============================================================
// QueryRepository
// ============================================================

#[sqlx::test(migrations = false)]
#[ignore = "requires database"]
async fn test_query_repository_batch_roundtrip_ordered_by_executed_at(pool: PgPool) {
    apply_migrations(&pool).await;
    let case_repo = PostgresCaseRepository::new(pool.clone());
    let query_repo = PostgresQueryRepository::new(pool);

    let case = create_test_case("Query audit trail");
    case_repo.save(&case).await.unwrap();

    let base = Utc::now() - Duration::minutes(30);
    let mut batch = Vec::new();
    // 逆序构造，验证读取按 executed_at 升序
    for i in (0..3).rev() {
        let mut query = create_test_query(case.id.clone(), &format!("SELECT {}", i));
        query.executed_at = base + Duration::minutes(i);
        batch.push(query);
    }
    query_repo.save_many(&batch).await.unwrap();

    let loaded = query_repo.find_by_case_id(&case.id).await.unwrap();

    assert_eq!(loaded.len(), 3);
    assert_eq!(loaded[0].query_text, "SELECT 0");
    assert_eq!(loaded[2].query_text, "SELECT 2");
    assert_eq!(loaded[0].execution_time_ms, Some(10));
    assert_eq!(loaded[0].case_id, case.id);

    let count = query_repo.count_by_case_id(&case.id).await.unwrap();
    assert_eq!(count, 3);
}

#[sqlx::test(migrations = false)]
#[ignore = "requires database"]
async fn test_query_repository_empty_batch_is_noop(pool: PgPool) {
    apply_migrations(&pool).await;
    let query_repo = PostgresQueryRepository::new(pool);

    query_repo.save_many(&[]).await.unwrap();
}

#[sqlx::test(migrations = false)]
#[ignore = "requires database"]
async fn test_query_repository_counts_zero_for_unknown_case(pool: PgPool) {
    apply_migrations(&pool).await;
    let query_repo = PostgresQueryRepository::new(pool);

    let count = query_repo.count_by_case_id(&CaseId::new()).await.unwrap();
    assert_eq!(count, 0);

    let loaded = query_repo.find_by_case_id(&CaseId::new()).await.unwrap();
    assert!(loaded.is_empty());
}

// ============================================================
// Unit of Work
// ============================================================

#[sqlx::test(migrations = false)]
#[ignore = "requires database"]
async fn test_unit_of_work_commit_persists_case_and_queries(pool: PgPool) {
    apply_migrations(&pool).await;
    let factory = PostgresUnitOfWorkFactory::new(pool.clone());

    let mut case = create_test_case("Transactional create");
    let query = create_test_query(case.id.clone(), "SELECT 1");
    case.add_query(query).unwrap();

    let uow = factory.begin().await.unwrap();
    uow.cases().save(&case).await.unwrap();
    uow.queries().save_many(&case.queries).await.unwrap();
    uow.commit().await.unwrap();

    let case_repo = PostgresCaseRepository::new(pool.clone());
    let query_repo = PostgresQueryRepository::new(pool);

    assert!(case_repo.find_by_id(&case.id).await.unwrap().is_some());
    assert_eq!(query_repo.count_by_case_id(&case.id).await.unwrap(), 1);
}

#[sqlx::test(migrations = false)]
#[ignore = "requires database"]
async fn test_unit_of_work_rollback_discards_writes(pool: PgPool) {
    apply_migrations(&pool).await;
    let factory = PostgresUnitOfWorkFactory::new(pool.clone());

    let case = create_test_case("Rolled back create");

    let uow = factory.begin().await.unwrap();
    uow.cases().save(&case).await.unwrap();
    uow.rollback().await.unwrap();

    let case_repo = PostgresCaseRepository::new(pool);
    assert!(case_repo.find_by_id(&case.id).await.unwrap().is_none());
}

#[sqlx::test(migrations = false)]
#[ignore = "requires database"]
async fn test_unit_of_work_failed_batch_leaves_no_case_behind(pool: PgPool) {
    apply_migrations(&pool).await;
    let factory = PostgresUnitOfWorkFactory::new(pool.clone());

    let case = create_test_case("Atomicity check");
    // 指向不存在案例的记录，批量插入触发外键违约
    let orphan = create_test_query(CaseId::new(), "SELECT 1");

    let uow = factory.begin().await.unwrap();
    uow.cases().save(&case).await.unwrap();
    let failure = uow.queries().save_many(&[orphan]).await;
    assert!(failure.is_err());
    uow.rollback().await.unwrap();

    let case_repo = PostgresCaseRepository::new(pool);
    assert!(case_repo.find_by_id(&case.id).await.unwrap().is_none());
}

#[sqlx::test(migrations = false)]
#[ignore = "requires database"]
async fn test_unit_of_work_reads_own_uncommitted_writes(pool: PgPool) {
    apply_migrations(&pool).await;
    let factory = PostgresUnitOfWorkFactory::new(pool.clone());

    let case = create_test_case("Read own writes");

    let uow = factory.begin().await.unwrap();
    uow.cases().save(&case).await.unwrap();

    // 提交前同一事务内即可见
    let in_tx = uow.cases().find_by_id(&case.id).await.unwrap();
    assert!(in_tx.is_some());

    uow.commit().await.unwrap();

    let case_repo = PostgresCaseRepository::new(pool);
    assert!(case_repo.find_by_id(&case.id).await.unwrap().is_some());
}
