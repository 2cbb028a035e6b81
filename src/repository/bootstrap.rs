use tokio_postgres::{Client, error::SqlState};

/// Extensions installed at startup when the server and role allow it.
pub const EXTENSIONS: [&str; 3] = ["citext", "pgcrypto", "vector"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtensionOutcome {
    Created,
    AlreadyPresent,
    /// The role may not create extensions
    Denied,
    /// The server has no such extension installed
    Unavailable,
    Failed,
}

pub fn classify_failure(code: Option<&SqlState>) -> ExtensionOutcome {
    match code {
        Some(code) if *code == SqlState::INSUFFICIENT_PRIVILEGE => ExtensionOutcome::Denied,
        Some(code)
            if *code == SqlState::UNDEFINED_FILE
                || *code == SqlState::UNDEFINED_OBJECT
                || *code == SqlState::FEATURE_NOT_SUPPORTED =>
        {
            ExtensionOutcome::Unavailable
        }
        // a concurrent CREATE EXTENSION won the race
        Some(code)
            if *code == SqlState::DUPLICATE_OBJECT || *code == SqlState::UNIQUE_VIOLATION =>
        {
            ExtensionOutcome::AlreadyPresent
        }
        _ => ExtensionOutcome::Failed,
    }
}

fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

async fn ensure_extension(
    client: &Client,
    name: &str,
) -> Result<ExtensionOutcome, tokio_postgres::Error> {
    let present: bool = client
        .query_one(
            "SELECT EXISTS (SELECT 1 FROM pg_extension WHERE extname = $1)",
            &[&name],
        )
        .await?
        .get(0);

    if present {
        return Ok(ExtensionOutcome::AlreadyPresent);
    }

    client
        .batch_execute(&format!(
            "CREATE EXTENSION IF NOT EXISTS {}",
            quote_ident(name)
        ))
        .await?;

    Ok(ExtensionOutcome::Created)
}

/// Tries every extension in [`EXTENSIONS`] on its own statement. Failures are
/// logged and never returned; the service runs without optional extensions.
pub async fn provision_extensions(client: &Client) -> Vec<(&'static str, ExtensionOutcome)> {
    let mut outcomes = Vec::with_capacity(EXTENSIONS.len());

    for name in EXTENSIONS {
        let outcome = match ensure_extension(client, name).await {
            Ok(outcome) => outcome,
            Err(e) => {
                let outcome = classify_failure(e.code());
                match outcome {
                    ExtensionOutcome::AlreadyPresent => {}
                    ExtensionOutcome::Denied => tracing::warn!(
                        "Not allowed to create extension '{}', continuing without it: {}",
                        name,
                        e
                    ),
                    ExtensionOutcome::Unavailable => tracing::warn!(
                        "Extension '{}' is not available on this server, continuing without it: {}",
                        name,
                        e
                    ),
                    _ => tracing::warn!(
                        "Failed to create extension '{}', continuing without it: {}",
                        name,
                        e
                    ),
                }
                outcome
            }
        };

        match outcome {
            ExtensionOutcome::Created => tracing::info!("Extension '{}' created", name),
            ExtensionOutcome::AlreadyPresent => {
                tracing::debug!("Extension '{}' already present", name);
            }
            _ => {}
        }

        outcomes.push((name, outcome));
    }

    outcomes
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Some(SqlState::INSUFFICIENT_PRIVILEGE), ExtensionOutcome::Denied)]
    #[case(Some(SqlState::UNDEFINED_FILE), ExtensionOutcome::Unavailable)]
    #[case(Some(SqlState::FEATURE_NOT_SUPPORTED), ExtensionOutcome::Unavailable)]
    #[case(Some(SqlState::DUPLICATE_OBJECT), ExtensionOutcome::AlreadyPresent)]
    #[case(Some(SqlState::UNIQUE_VIOLATION), ExtensionOutcome::AlreadyPresent)]
    #[case(Some(SqlState::INVALID_PASSWORD), ExtensionOutcome::Failed)]
    #[case(None, ExtensionOutcome::Failed)]
    fn failures_are_classified(
        #[case] code: Option<SqlState>,
        #[case] expected: ExtensionOutcome,
    ) {
        assert_eq!(classify_failure(code.as_ref()), expected);
    }

    #[test]
    fn identifiers_are_quoted() {
        assert_eq!(quote_ident("citext"), "\"citext\"");
        assert_eq!(quote_ident("we\"ird"), "\"we\"\"ird\"");
    }

    #[tokio::test]
    #[ignore = "requires PostgreSQL (DATABASE_URL)"]
    async fn provisioning_is_repeatable() {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
        let db = crate::repository::Database::connect(&url).unwrap();
        let client = db.session().await.unwrap();

        provision_extensions(&client).await;
        let second = provision_extensions(&client).await;

        assert_eq!(second.len(), EXTENSIONS.len());
        assert!(
            second
                .iter()
                .all(|(_, outcome)| *outcome != ExtensionOutcome::Created)
        );
    }
}
