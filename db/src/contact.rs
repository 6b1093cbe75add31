use common::error::{AppError, Res};
use sqlx::{Executor, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::{
    dtos::contact::{ContactCreateRequest, ContactFilter, ContactPatch},
    models::contact::Contact,
};

pub async fn get_contacts<'e, E>(executor: E, filter: ContactFilter) -> Res<Vec<Contact>>
where
    E: Executor<'e, Database = Postgres>,
{
    let mut qb: QueryBuilder<Postgres> = QueryBuilder::new("SELECT * FROM contacts");

    if let Some(favorite) = filter.favorite {
        qb.push(" WHERE favorite = ").push_bind(favorite);
    }

    qb.push(" ORDER BY created_at, id LIMIT ")
        .push_bind(filter.limit)
        .push(" OFFSET ")
        .push_bind(filter.offset);

    qb.build_query_as::<Contact>()
        .fetch_all(executor)
        .await
        .map_err(AppError::from)
}

pub async fn get_contact_by_id<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    contact_id: Uuid,
) -> Res<Option<Contact>> {
    sqlx::query_as::<_, Contact>("SELECT * FROM contacts WHERE id = $1")
        .bind(contact_id)
        .fetch_optional(executor)
        .await
        .map_err(AppError::from)
}

pub async fn insert_contact<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    data: ContactCreateRequest,
) -> Res<Contact> {
    sqlx::query_as::<_, Contact>(
        r#"
        INSERT INTO contacts (name, email, phone, favorite, owner)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING *
        "#,
    )
    .bind(data.name)
    .bind(data.email)
    .bind(data.phone)
    .bind(data.favorite)
    .bind(data.owner)
    .fetch_one(executor)
    .await
    .map_err(AppError::from)
}

/// Merges the provided fields into the stored row in one statement.
pub async fn update_contact<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    contact_id: Uuid,
    patch: ContactPatch,
) -> Res<Option<Contact>> {
    sqlx::query_as::<_, Contact>(
        r#"
        UPDATE contacts
        SET name = COALESCE($2, name),
            email = COALESCE($3, email),
            phone = COALESCE($4, phone),
            updated_at = NOW()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(contact_id)
    .bind(patch.name)
    .bind(patch.email)
    .bind(patch.phone)
    .fetch_optional(executor)
    .await
    .map_err(AppError::from)
}

/// Sets `favorite` when a value is given, flips it otherwise.
pub async fn update_contact_favorite<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    contact_id: Uuid,
    favorite: Option<bool>,
) -> Res<Option<Contact>> {
    sqlx::query_as::<_, Contact>(
        r#"
        UPDATE contacts
        SET favorite = COALESCE($2, NOT favorite), updated_at = NOW()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(contact_id)
    .bind(favorite)
    .fetch_optional(executor)
    .await
    .map_err(AppError::from)
}

pub async fn delete_contact<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    contact_id: Uuid,
) -> Res<bool> {
    let result = sqlx::query("DELETE FROM contacts WHERE id = $1")
        .bind(contact_id)
        .execute(executor)
        .await?;
    Ok(result.rows_affected() > 0)
}
