use eyre::Result;
use sqlx::{Pool, Postgres};
use tracing::info;

pub async fn initialize_database(pool: &Pool<Postgres>) -> Result<()> {
    info!("Initializing database schema...");

    // Create highlight_terms table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS highlight_terms (
            id BIGSERIAL PRIMARY KEY,
            term VARCHAR(50) NOT NULL UNIQUE,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create highlight_users table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS highlight_users (
            user_id BIGINT NOT NULL,
            term_id BIGINT NOT NULL REFERENCES highlight_terms(id) ON DELETE CASCADE,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            PRIMARY KEY (user_id, term_id)
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create indexes
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_highlight_users_term_id ON highlight_users(term_id);")
        .execute(pool)
        .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_highlight_users_user_id ON highlight_users(user_id);")
        .execute(pool)
        .await?;

    info!("Database schema initialized successfully.");
    Ok(())
}
