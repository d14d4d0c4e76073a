use crate::models::{DbHighlightTerm, DbTermSubscribers, user_id_param};
use eyre::Result;
use sqlx::{Pool, Postgres};

// Highlight Term Repository

pub async fn list_term_subscribers(pool: &Pool<Postgres>) -> Result<Vec<DbTermSubscribers>> {
    let rows = sqlx::query_as::<_, DbTermSubscribers>(
        r#"
        SELECT t.id, t.term, json_agg(u.user_id ORDER BY u.user_id) AS subscribers
        FROM highlight_terms t
        JOIN highlight_users u ON u.term_id = t.id
        GROUP BY t.id, t.term
        ORDER BY t.term ASC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

pub async fn create_or_get_term(pool: &Pool<Postgres>, term: &str) -> Result<DbHighlightTerm> {
    // The no-op update makes RETURNING yield the existing row on conflict.
    let row = sqlx::query_as::<_, DbHighlightTerm>(
        r#"
        INSERT INTO highlight_terms (term)
        VALUES ($1)
        ON CONFLICT (term)
        DO UPDATE SET term = EXCLUDED.term
        RETURNING id, term, created_at
        "#,
    )
    .bind(term)
    .fetch_one(pool)
    .await?;

    Ok(row)
}

pub async fn get_term_by_name(pool: &Pool<Postgres>, term: &str) -> Result<Option<DbHighlightTerm>> {
    let row = sqlx::query_as::<_, DbHighlightTerm>(
        r#"
        SELECT id, term, created_at
        FROM highlight_terms
        WHERE term = $1
        "#,
    )
    .bind(term)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

pub async fn delete_term_if_orphaned(pool: &Pool<Postgres>, term_id: i64) -> Result<bool> {
    let result = sqlx::query(
        r#"
        DELETE FROM highlight_terms t
        WHERE t.id = $1
          AND NOT EXISTS (SELECT 1 FROM highlight_users u WHERE u.term_id = t.id)
        "#,
    )
    .bind(term_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

// Highlight Subscription Repository

pub async fn add_subscription(pool: &Pool<Postgres>, user_id: u64, term_id: i64) -> Result<bool> {
    let result = sqlx::query(
        r#"
        INSERT INTO highlight_users (user_id, term_id)
        VALUES ($1, $2)
        ON CONFLICT (user_id, term_id) DO NOTHING
        "#,
    )
    .bind(user_id_param(user_id))
    .bind(term_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn remove_subscription(pool: &Pool<Postgres>, user_id: u64, term_id: i64) -> Result<bool> {
    let result = sqlx::query(
        r#"
        DELETE FROM highlight_users
        WHERE user_id = $1 AND term_id = $2
        "#,
    )
    .bind(user_id_param(user_id))
    .bind(term_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn count_user_subscriptions(pool: &Pool<Postgres>, user_id: u64) -> Result<i64> {
    let count = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*)
        FROM highlight_users
        WHERE user_id = $1
        "#,
    )
    .bind(user_id_param(user_id))
    .fetch_one(pool)
    .await?;

    Ok(count)
}

pub async fn get_user_terms(pool: &Pool<Postgres>, user_id: u64) -> Result<Vec<DbHighlightTerm>> {
    let rows = sqlx::query_as::<_, DbHighlightTerm>(
        r#"
        SELECT t.id, t.term, t.created_at
        FROM highlight_terms t
        JOIN highlight_users u ON u.term_id = t.id
        WHERE u.user_id = $1
        ORDER BY t.term ASC
        "#,
    )
    .bind(user_id_param(user_id))
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
