//! Note CRUD against one caller-owned transaction.
//!
//! Reads borrow the transaction; mutations consume it and commit, so every
//! operation issues exactly one commit or none. Callers resolve existence with
//! [`get_note`] before calling [`update_note`] or [`delete_note`], and validate
//! input beforehand; nothing here re-checks it.

use deadpool_postgres::Transaction;

use crate::{
    dto::NoteInput,
    models::{NOTE_COLUMNS, Note},
};

pub async fn list_notes(tx: &Transaction<'_>) -> Result<Vec<Note>, tokio_postgres::Error> {
    let stmt = tx
        .prepare_cached(&format!(
            "SELECT {NOTE_COLUMNS} FROM notes ORDER BY id DESC"
        ))
        .await?;
    let rows = tx.query(&stmt, &[]).await?;

    Ok(rows.iter().map(Note::from_row).collect())
}

pub async fn get_note(
    tx: &Transaction<'_>,
    id: i64,
) -> Result<Option<Note>, tokio_postgres::Error> {
    let stmt = tx
        .prepare_cached(&format!("SELECT {NOTE_COLUMNS} FROM notes WHERE id = $1"))
        .await?;
    let row = tx.query_opt(&stmt, &[&id]).await?;

    Ok(row.as_ref().map(Note::from_row))
}

pub async fn create_note(
    tx: Transaction<'_>,
    input: &impl NoteInput,
) -> Result<Note, tokio_postgres::Error> {
    let stmt = tx
        .prepare_cached(&format!(
            "INSERT INTO notes (title, content) VALUES ($1, $2) RETURNING {NOTE_COLUMNS}"
        ))
        .await?;
    let row = tx
        .query_one(&stmt, &[&input.title().trim(), &input.content().trim()])
        .await?;
    tx.commit().await?;

    Ok(Note::from_row(&row))
}

/// Overwrites title and content of `existing`; last writer wins.
pub async fn update_note(
    tx: Transaction<'_>,
    existing: Note,
    input: &impl NoteInput,
) -> Result<Note, tokio_postgres::Error> {
    let stmt = tx
        .prepare_cached(&format!(
            "UPDATE notes SET title = $1, content = $2 WHERE id = $3 RETURNING {NOTE_COLUMNS}"
        ))
        .await?;
    let row = tx
        .query_one(
            &stmt,
            &[&input.title().trim(), &input.content().trim(), &existing.id],
        )
        .await?;
    tx.commit().await?;

    Ok(Note::from_row(&row))
}

pub async fn delete_note(tx: Transaction<'_>, existing: Note) -> Result<(), tokio_postgres::Error> {
    let stmt = tx
        .prepare_cached("DELETE FROM notes WHERE id = $1")
        .await?;
    tx.execute(&stmt, &[&existing.id]).await?;
    tx.commit().await
}
