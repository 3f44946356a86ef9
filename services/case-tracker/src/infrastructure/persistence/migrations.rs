//! 数据库迁移定义
//!
//! 迁移在代码内维护，服务启动时由 MigrationManager 统一应用。

use tracker_adapter_postgres::Migration;

/// 全部迁移，按版本升序
pub fn all() -> Vec<Migration> {
    vec![
        Migration::new(
            1,
            "create_support_cases",
            r#"
            CREATE TABLE IF NOT EXISTS support_cases (
                id UUID PRIMARY KEY,
                title VARCHAR(200) NOT NULL,
                description TEXT,
                case_type VARCHAR(20) NOT NULL,
                priority VARCHAR(20) NOT NULL,
                status VARCHAR(20) NOT NULL,
                created_by VARCHAR(255) NOT NULL,
                created_at TIMESTAMPTZ NOT NULL,
                updated_at TIMESTAMPTZ NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_support_cases_status ON support_cases (status);
            CREATE INDEX IF NOT EXISTS idx_support_cases_priority ON support_cases (priority);
            CREATE INDEX IF NOT EXISTS idx_support_cases_created_at ON support_cases (created_at);
            "#,
        )
        .with_down("DROP TABLE IF EXISTS support_cases"),
        Migration::new(
            2,
            "create_case_queries",
            r#"
            CREATE TABLE IF NOT EXISTS case_queries (
                id UUID PRIMARY KEY,
                case_id UUID NOT NULL REFERENCES support_cases (id) ON DELETE CASCADE,
                database_name VARCHAR(255) NOT NULL,
                schema_name VARCHAR(255) NOT NULL,
                query_text TEXT NOT NULL,
                execution_time_ms BIGINT,
                rows_affected BIGINT,
                executed_by VARCHAR(255) NOT NULL,
                executed_at TIMESTAMPTZ NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_case_queries_case_id ON case_queries (case_id);
            "#,
        )
        .with_down("DROP TABLE IF EXISTS case_queries"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_versions_strictly_increasing() {
        let migrations = all();

        assert!(!migrations.is_empty());
        for pair in migrations.windows(2) {
            assert!(pair[0].version < pair[1].version);
        }
    }

    #[test]
    fn test_every_migration_has_down() {
        for migration in all() {
            assert!(migration.down_sql.is_some(), "{} lacks down", migration.name);
        }
    }

    #[test]
    fn test_checksums_stable_across_calls() {
        for (first, second) in all().iter().zip(all().iter()) {
            assert_eq!(first.checksum, second.checksum);
        }
    }
}
