use crate::entities::{Report, Source, SourceDraft};
use anyhow::Result;
use chrono::Utc;
use sqlx::SqlitePool;

/// Repository for reports and their sources.
#[derive(Clone)]
pub struct ReportRepository {
    pool: SqlitePool,
}

impl ReportRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a report and all of its sources in one transaction.
    ///
    /// Sources are inserted in slice order, so row ids preserve the label order.
    pub async fn create_with_sources(
        &self,
        query: &str,
        summary_md: &str,
        sources: &[SourceDraft],
    ) -> Result<Report> {
        let mut tx = self.pool.begin().await?;

        let report = sqlx::query_as::<_, Report>(
            r#"
            INSERT INTO reports (query, created_at, summary_md)
            VALUES (?, ?, ?)
            RETURNING id, query, created_at, summary_md
            "#,
        )
        .bind(query)
        .bind(Utc::now())
        .bind(summary_md)
        .fetch_one(&mut *tx)
        .await?;

        for source in sources {
            sqlx::query(
                r#"
                INSERT INTO sources (report_id, title, url, status, note)
                VALUES (?, ?, ?, ?, ?)
                "#,
            )
            .bind(report.id)
            .bind(source.title.as_deref())
            .bind(&source.url)
            .bind(source.status)
            .bind(source.note.as_deref())
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(report)
    }

    /// All reports, newest first.
    pub async fn list(&self) -> Result<Vec<Report>> {
        let reports = sqlx::query_as::<_, Report>(
            r#"
            SELECT id, query, created_at, summary_md
            FROM reports
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(reports)
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<Report>> {
        let report = sqlx::query_as::<_, Report>(
            r#"
            SELECT id, query, created_at, summary_md
            FROM reports
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(report)
    }

    /// Sources of a report in insertion (label) order.
    pub async fn sources_for(&self, report_id: i64) -> Result<Vec<Source>> {
        let sources = sqlx::query_as::<_, Source>(
            r#"
            SELECT id, report_id, title, url, status, note
            FROM sources
            WHERE report_id = ?
            ORDER BY id
            "#,
        )
        .bind(report_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(sources)
    }

    /// Delete a report; its sources go with it.
    pub async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM reports WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
