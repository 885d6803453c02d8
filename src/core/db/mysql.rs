//! MySQL-backed campus store.

use std::time::Duration;

use async_trait::async_trait;
use sqlx::Row;
use sqlx::mysql::{MySqlConnectOptions, MySqlPool, MySqlPoolOptions};
use tracing::{debug, info, instrument, warn};

use super::record::row_to_record;
use super::{
    CampusStore, DeletedSchedule, NewSchedule, Record, ScheduleKind, StoreError, StoreResult,
    like_pattern,
};
use crate::core::config::DatabaseConfig;

const MEALS_BY_DATE_CATEGORY: &str = r#"
    SELECT *
    FROM smu_meals
    WHERE LOWER(category) = LOWER(?)
      AND (
            DATE(`date`) = ?
         OR COALESCE(
                STR_TO_DATE(`date`, '%Y-%m-%d'),
                STR_TO_DATE(`date`, '%Y.%m.%d'),
                STR_TO_DATE(`date`, '%Y/%m/%d')
            ) = ?
      )
    ORDER BY `date` ASC
"#;

const MEALS_BY_KEYWORD: &str = "SELECT * FROM smu_meals WHERE meal LIKE ? ORDER BY `date` ASC";

const NOTICES_BY_KEYWORD: &str = "SELECT * FROM smu_notices WHERE title LIKE ?";

const EXAMS_BY_SUBJECT: &str = r#"
    SELECT *
    FROM smu_exam
    WHERE subject_name IS NOT NULL
      AND subject_name LIKE ?
    ORDER BY subject_name ASC
"#;

const EXAMS_BY_SUBJECT_AND_PROFESSOR: &str = r#"
    SELECT *
    FROM smu_exam
    WHERE subject_name IS NOT NULL
      AND subject_name LIKE ?
      AND professor IS NOT NULL
      AND professor LIKE ?
    ORDER BY subject_name ASC
"#;

const SCHEDULES_BY_KEYWORD_COMMON: &str = r#"
    SELECT * FROM smu_schedule
    WHERE content LIKE ? AND type = 'common'
    ORDER BY start_date ASC
"#;

const SCHEDULES_BY_KEYWORD_VISIBLE: &str = r#"
    SELECT * FROM smu_schedule
    WHERE content LIKE ?
      AND (type = 'common' OR (type = 'personal' AND user_id = ?))
    ORDER BY start_date ASC
"#;

const SCHEDULES_BY_DATE_COMMON: &str = r#"
    SELECT id, start_date, end_date, content, type, user_id, created_at
    FROM smu_schedule
    WHERE (DATE(start_date) LIKE ?
       OR DATE(end_date) LIKE ?
       OR start_date LIKE ?
       OR end_date LIKE ?)
      AND type = 'common'
    ORDER BY start_date ASC
"#;

const SCHEDULES_BY_DATE_VISIBLE: &str = r#"
    SELECT id, start_date, end_date, content, type, user_id, created_at
    FROM smu_schedule
    WHERE (DATE(start_date) LIKE ?
       OR DATE(end_date) LIKE ?
       OR start_date LIKE ?
       OR end_date LIKE ?)
      AND (type = 'common' OR (type = 'personal' AND user_id = ?))
    ORDER BY start_date ASC
"#;

const INSERT_SCHEDULE: &str = r#"
    INSERT INTO smu_schedule (start_date, end_date, content, type, user_id, created_at)
    VALUES (?, ?, ?, ?, ?, ?)
"#;

const SELECT_PERSONAL_FOR_DELETE: &str = r#"
    SELECT CAST(id AS SIGNED) AS id, content
    FROM smu_schedule
    WHERE content LIKE ? AND type = 'personal' AND user_id = ?
"#;

const DELETE_PERSONAL: &str = r#"
    DELETE FROM smu_schedule
    WHERE content LIKE ? AND type = 'personal' AND user_id = ?
"#;

/// Campus store over a MySQL connection pool.
///
/// The pool connects lazily, so constructing the store never touches the
/// network. Writes are refused up front unless the credentials came from the
/// environment rather than from defaults.
#[derive(Debug, Clone)]
pub struct MySqlStore {
    pool: MySqlPool,
    writes_enabled: bool,
}

impl MySqlStore {
    /// Build a store from configuration without connecting.
    pub fn connect_lazy(config: &DatabaseConfig) -> Self {
        let options = MySqlConnectOptions::new()
            .host(&config.host)
            .port(config.port)
            .username(&config.user)
            .password(&config.password)
            .database(&config.name)
            .charset("utf8mb4");

        let pool = MySqlPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
            .connect_lazy_with(options);

        info!(
            "MySQL store configured for {}:{}/{} (writes {})",
            config.host,
            config.port,
            config.name,
            if config.credentials_from_env {
                "enabled"
            } else {
                "disabled"
            }
        );

        Self::from_pool(pool, config.credentials_from_env)
    }

    /// Wrap an existing pool.
    pub fn from_pool(pool: MySqlPool, writes_enabled: bool) -> Self {
        Self {
            pool,
            writes_enabled,
        }
    }

    fn ensure_writable(&self) -> StoreResult<()> {
        if self.writes_enabled {
            Ok(())
        } else {
            warn!("Refusing write: database credentials were not set in the environment");
            Err(StoreError::MissingConfig)
        }
    }

    async fn fetch_records(
        &self,
        query: sqlx::query::Query<'_, sqlx::MySql, sqlx::mysql::MySqlArguments>,
    ) -> StoreResult<Vec<Record>> {
        let rows = query.fetch_all(&self.pool).await?;
        debug!("Fetched {} row(s)", rows.len());
        Ok(rows.iter().map(row_to_record).collect())
    }
}

#[async_trait]
impl CampusStore for MySqlStore {
    #[instrument(skip(self))]
    async fn meals_by_date_category(
        &self,
        date_iso: &str,
        category: &str,
    ) -> StoreResult<Vec<Record>> {
        self.fetch_records(
            sqlx::query(MEALS_BY_DATE_CATEGORY)
                .bind(category)
                .bind(date_iso)
                .bind(date_iso),
        )
        .await
    }

    #[instrument(skip(self))]
    async fn meals_by_keyword(&self, keyword: &str) -> StoreResult<Vec<Record>> {
        self.fetch_records(sqlx::query(MEALS_BY_KEYWORD).bind(like_pattern(keyword)))
            .await
    }

    #[instrument(skip(self))]
    async fn notices_by_keyword(&self, keyword: &str) -> StoreResult<Vec<Record>> {
        self.fetch_records(sqlx::query(NOTICES_BY_KEYWORD).bind(like_pattern(keyword)))
            .await
    }

    #[instrument(skip(self))]
    async fn exams(&self, keyword: &str, professor: Option<&str>) -> StoreResult<Vec<Record>> {
        let query = match professor {
            Some(professor) => sqlx::query(EXAMS_BY_SUBJECT_AND_PROFESSOR)
                .bind(like_pattern(keyword))
                .bind(like_pattern(professor)),
            None => sqlx::query(EXAMS_BY_SUBJECT).bind(like_pattern(keyword)),
        };
        self.fetch_records(query).await
    }

    #[instrument(skip(self))]
    async fn schedules_by_keyword(
        &self,
        keyword: &str,
        viewer: Option<&str>,
    ) -> StoreResult<Vec<Record>> {
        let query = match viewer {
            Some(user_id) => sqlx::query(SCHEDULES_BY_KEYWORD_VISIBLE)
                .bind(like_pattern(keyword))
                .bind(user_id),
            None => sqlx::query(SCHEDULES_BY_KEYWORD_COMMON).bind(like_pattern(keyword)),
        };
        self.fetch_records(query).await
    }

    #[instrument(skip(self))]
    async fn schedules_by_date(
        &self,
        date_token: &str,
        viewer: Option<&str>,
    ) -> StoreResult<Vec<Record>> {
        let pattern = like_pattern(date_token);
        let sql = if viewer.is_some() {
            SCHEDULES_BY_DATE_VISIBLE
        } else {
            SCHEDULES_BY_DATE_COMMON
        };

        let mut query = sqlx::query(sql)
            .bind(pattern.clone())
            .bind(pattern.clone())
            .bind(pattern.clone())
            .bind(pattern);
        if let Some(user_id) = viewer {
            query = query.bind(user_id);
        }
        self.fetch_records(query).await
    }

    #[instrument(skip_all, fields(owner = %schedule.owner))]
    async fn insert_schedule(&self, schedule: &NewSchedule) -> StoreResult<u64> {
        self.ensure_writable()?;

        let mut tx = self.pool.begin().await?;
        let outcome = sqlx::query(INSERT_SCHEDULE)
            .bind(schedule.start.naive_local())
            .bind(schedule.end.naive_local())
            .bind(&schedule.content)
            .bind(ScheduleKind::Personal.as_str())
            .bind(&schedule.owner)
            .bind(schedule.created_at.naive_local())
            .execute(&mut *tx)
            .await;

        match outcome {
            Ok(done) => {
                tx.commit().await?;
                info!("Inserted schedule {}", done.last_insert_id());
                Ok(done.last_insert_id())
            }
            Err(e) => {
                if let Err(rollback) = tx.rollback().await {
                    warn!("Rollback after failed insert also failed: {}", rollback);
                }
                Err(e.into())
            }
        }
    }

    #[instrument(skip(self))]
    async fn delete_personal_schedules(
        &self,
        content_keyword: &str,
        owner: &str,
    ) -> StoreResult<Vec<DeletedSchedule>> {
        self.ensure_writable()?;

        let pattern = like_pattern(content_keyword);
        let mut tx = self.pool.begin().await?;

        let outcome: Result<Vec<DeletedSchedule>, sqlx::Error> = async {
            let rows = sqlx::query(SELECT_PERSONAL_FOR_DELETE)
                .bind(&pattern)
                .bind(owner)
                .fetch_all(&mut *tx)
                .await?;

            let matched = rows
                .iter()
                .map(|row| {
                    Ok(DeletedSchedule {
                        id: row.try_get("id")?,
                        content: row.try_get::<Option<String>, _>("content")?.unwrap_or_default(),
                    })
                })
                .collect::<Result<Vec<_>, sqlx::Error>>()?;

            if !matched.is_empty() {
                sqlx::query(DELETE_PERSONAL)
                    .bind(&pattern)
                    .bind(owner)
                    .execute(&mut *tx)
                    .await?;
            }
            Ok(matched)
        }
        .await;

        match outcome {
            Ok(deleted) => {
                tx.commit().await?;
                info!("Deleted {} personal schedule(s)", deleted.len());
                Ok(deleted)
            }
            Err(e) => {
                if let Err(rollback) = tx.rollback().await {
                    warn!("Rollback after failed delete also failed: {}", rollback);
                }
                Err(e.into())
            }
        }
    }
}
