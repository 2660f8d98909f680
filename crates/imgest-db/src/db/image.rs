use crate::db::error::classify_db_error;
use imgest_core::models::{ImagePage, ImageRecord};
use imgest_core::AppError;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

const IMAGE_COLUMNS: &str = "id, path, checksum, status, created, updated";

/// Repository for ingested image records
#[derive(Clone)]
pub struct ImageRepository {
    pool: PgPool,
}

impl ImageRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Insert a derived record inside `tx` and return the row as stored.
    ///
    /// Constraint failures are classified: a duplicate path is a conflict, an over-long
    /// path or a `DONE` record without checksum is invalid input.
    #[tracing::instrument(
        skip(self, tx, record),
        fields(db.table = "images", db.operation = "insert", image_id = %record.id())
    )]
    pub async fn insert_tx(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        record: &ImageRecord,
    ) -> Result<ImageRecord, AppError> {
        let query = format!(
            "INSERT INTO images ({cols}) VALUES ($1, $2, $3, $4, $5, $6) RETURNING {cols}",
            cols = IMAGE_COLUMNS
        );

        let stored = sqlx::query_as::<Postgres, ImageRecord>(&query)
            .bind(record.id())
            .bind(record.path())
            .bind(record.checksum())
            .bind(record.status())
            .bind(record.created())
            .bind(record.updated())
            .fetch_one(&mut **tx)
            .await
            .map_err(classify_db_error)?;

        tracing::debug!(path = %stored.path(), status = %stored.status(), "Image record inserted");

        Ok(stored)
    }

    /// Fetch one page in creation order together with the total row count.
    ///
    /// Both queries run in a single repeatable-read transaction so the total and the page
    /// come from the same snapshot.
    #[tracing::instrument(skip(self), fields(db.table = "images", db.operation = "select"))]
    pub async fn list_page(&self, offset: i64, limit: i64) -> Result<ImagePage, AppError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ, READ ONLY")
            .execute(&mut *tx)
            .await?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM images")
            .fetch_one(&mut *tx)
            .await?;

        let query = format!(
            "SELECT {} FROM images ORDER BY created ASC, id ASC LIMIT $1 OFFSET $2",
            IMAGE_COLUMNS
        );
        let records = sqlx::query_as::<Postgres, ImageRecord>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(ImagePage {
            records,
            total,
            offset,
            limit,
        })
    }

    #[tracing::instrument(skip(self), fields(db.table = "images", db.operation = "select"))]
    pub async fn get(&self, id: Uuid) -> Result<Option<ImageRecord>, AppError> {
        let query = format!("SELECT {} FROM images WHERE id = $1", IMAGE_COLUMNS);
        let record = sqlx::query_as::<Postgres, ImageRecord>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(record)
    }

    #[tracing::instrument(skip(self), fields(db.table = "images", db.operation = "count"))]
    pub async fn count(&self) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM images")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}
