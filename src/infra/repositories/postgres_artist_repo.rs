use crate::domain::{models::artist::Artist, ports::ArtistRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::PgPool;

pub struct PostgresArtistRepo {
    pool: PgPool,
}

impl PostgresArtistRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ArtistRepository for PostgresArtistRepo {
    async fn fetch_all(&self) -> Result<Vec<Artist>, AppError> {
        sqlx::query_as::<_, Artist>("SELECT * FROM artists ORDER BY id ASC")
            .fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Artist>, AppError> {
        sqlx::query_as::<_, Artist>("SELECT * FROM artists WHERE id = $1").bind(id)
            .fetch_optional(&self.pool).await.map_err(AppError::Database)
    }
}
