//! JSONL conversation store.
//!
//! Durable backend: each session gets two newline-delimited JSON files under
//! the data directory, one for turns and one for structured responses.
//! Appends go to the end of the file, matching the port's append-only
//! contract; reads replay the file in order.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;

use crate::domain::conversation::{Role, Turn};
use crate::domain::foundation::{EngineError, SessionId};
use crate::ports::{ConversationStore, ExportMetadata, ResponseRecord, SessionExport};

/// File-backed conversation logs, one JSONL file pair per session.
pub struct JsonlConversationStore {
    data_dir: PathBuf,
}

impl JsonlConversationStore {
    /// Creates a store rooted at `data_dir`. The directory is created on
    /// first append.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    fn turns_path(&self, session_id: &SessionId) -> PathBuf {
        self.data_dir.join(format!("{session_id}.turns.jsonl"))
    }

    fn responses_path(&self, session_id: &SessionId) -> PathBuf {
        self.data_dir.join(format!("{session_id}.responses.jsonl"))
    }

    async fn append_line<T: serde::Serialize>(
        &self,
        path: &Path,
        record: &T,
    ) -> Result<(), EngineError> {
        fs::create_dir_all(&self.data_dir)
            .await
            .map_err(|e| EngineError::storage(format!("create data dir: {e}")))?;

        let mut line = serde_json::to_string(record)
            .map_err(|e| EngineError::storage(format!("serialize record: {e}")))?;
        line.push('\n');

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .await
            .map_err(|e| EngineError::storage(format!("open {}: {e}", path.display())))?;
        file.write_all(line.as_bytes())
            .await
            .map_err(|e| EngineError::storage(format!("append to {}: {e}", path.display())))?;
        Ok(())
    }

    async fn read_lines<T: serde::de::DeserializeOwned>(
        &self,
        path: &Path,
    ) -> Result<Vec<T>, EngineError> {
        let contents = match fs::read_to_string(path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(EngineError::storage(format!(
                    "read {}: {e}",
                    path.display()
                )))
            }
        };

        contents
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| {
                serde_json::from_str(line)
                    .map_err(|e| EngineError::storage(format!("parse {}: {e}", path.display())))
            })
            .collect()
    }
}

#[async_trait]
impl ConversationStore for JsonlConversationStore {
    async fn append_turn(
        &self,
        session_id: &SessionId,
        role: Role,
        text: &str,
    ) -> Result<(), EngineError> {
        let turn = Turn::new(role, text);
        self.append_line(&self.turns_path(session_id), &turn).await
    }

    async fn append_response(
        &self,
        session_id: &SessionId,
        question: &str,
        answer: &str,
    ) -> Result<(), EngineError> {
        let record = ResponseRecord::new(question, answer);
        self.append_line(&self.responses_path(session_id), &record)
            .await
    }

    async fn turns(&self, session_id: &SessionId) -> Result<Vec<Turn>, EngineError> {
        self.read_lines(&self.turns_path(session_id)).await
    }

    async fn responses(&self, session_id: &SessionId) -> Result<Vec<ResponseRecord>, EngineError> {
        self.read_lines(&self.responses_path(session_id)).await
    }

    async fn export(&self, session_id: &SessionId) -> Result<SessionExport, EngineError> {
        let turns = self.turns(session_id).await?;
        let responses = self.responses(session_id).await?;

        Ok(SessionExport {
            metadata: ExportMetadata {
                session_id: *session_id,
                turn_count: turns.len(),
                response_count: responses.len(),
            },
            turns,
            responses,
        })
    }
}
