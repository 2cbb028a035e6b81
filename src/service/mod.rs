use crate::{
    dto::{NoteCreate, NoteInput, NoteRead, NoteUpdate, ValidationError},
    repository::{Database, DatabaseError, notes},
};

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Note not found")]
    NotFound,

    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error(transparent)]
    Storage(#[from] DatabaseError),
}

impl From<tokio_postgres::Error> for ServiceError {
    fn from(e: tokio_postgres::Error) -> Self {
        Self::Storage(DatabaseError::Query(e))
    }
}

/// Runs each call in its own pooled session and transaction.
#[derive(Clone)]
pub struct NoteService {
    db: Database,
}

impl NoteService {
    pub const fn new(db: Database) -> Self {
        Self { db }
    }

    pub async fn list_notes(&self) -> Result<Vec<NoteRead>, ServiceError> {
        let mut session = self.db.session().await?;
        let tx = session.transaction().await?;

        let notes = notes::list_notes(&tx).await?;

        Ok(notes.into_iter().map(NoteRead::from).collect())
    }

    pub async fn get_note(&self, id: i64) -> Result<NoteRead, ServiceError> {
        let mut session = self.db.session().await?;
        let tx = session.transaction().await?;

        notes::get_note(&tx, id)
            .await?
            .map(NoteRead::from)
            .ok_or(ServiceError::NotFound)
    }

    /// Input is validated before a session is acquired.
    pub async fn create_note(&self, input: NoteCreate) -> Result<NoteRead, ServiceError> {
        input.validate()?;

        let mut session = self.db.session().await?;
        let tx = session.transaction().await?;

        let note = notes::create_note(tx, &input).await?;
        tracing::debug!("Created note {}", note.id);

        Ok(note.into())
    }

    /// A missing note is reported before invalid input.
    pub async fn update_note(&self, id: i64, input: NoteUpdate) -> Result<NoteRead, ServiceError> {
        let mut session = self.db.session().await?;
        let tx = session.transaction().await?;

        let existing = notes::get_note(&tx, id)
            .await?
            .ok_or(ServiceError::NotFound)?;
        input.validate()?;

        let note = notes::update_note(tx, existing, &input).await?;
        tracing::debug!("Updated note {}", note.id);

        Ok(note.into())
    }

    pub async fn delete_note(&self, id: i64) -> Result<(), ServiceError> {
        let mut session = self.db.session().await?;
        let tx = session.transaction().await?;

        let existing = notes::get_note(&tx, id)
            .await?
            .ok_or(ServiceError::NotFound)?;

        notes::delete_note(tx, existing).await?;
        tracing::debug!("Deleted note {}", id);

        Ok(())
    }
}
