//! Domain entities: core data structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::error::{DomainError, DomainResult};

/// Persisted credential configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

/// Association of the current directory with one remote project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectLink {
    pub project_id: String,
}

/// Caller identity as reported by the remote service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl User {
    /// Best human-readable label: name, then email, then id.
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .or(self.email.as_deref())
            .unwrap_or(&self.id)
    }
}

/// Remote grouping resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Remote chat record. Owned by the service, never cached locally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chat {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub privacy: Option<String>,
    #[serde(default)]
    pub favorite: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub web_url: Option<String>,
}

impl Chat {
    pub fn is_private(&self) -> bool {
        self.privacy.as_deref() == Some("private")
    }
}

/// Result of a create-chat call.
///
/// The service can answer with either a completed chat or a streamed body.
/// Only the completed variant is usable by a one-shot CLI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatResponse {
    Completed(Chat),
    Stream,
}

/// Model options for a new chat.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_id: Option<String>,
    pub image_generations: bool,
    pub thinking: bool,
}

/// Request body for creating a chat from a single message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewChat {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    pub chat_privacy: Privacy,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    pub model_configuration: ModelConfig,
    pub response_mode: ResponseMode,
}

impl NewChat {
    /// Build a request, rejecting an empty message.
    pub fn new(message: impl Into<String>) -> DomainResult<Self> {
        let message = message.into();
        if message.trim().is_empty() {
            return Err(DomainError::EmptyInput("message"));
        }
        Ok(Self {
            message,
            system: None,
            chat_privacy: Privacy::default(),
            project_id: None,
            model_configuration: ModelConfig::default(),
            response_mode: ResponseMode::Sync,
        })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Privacy {
    #[default]
    Public,
    Private,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseMode {
    Sync,
}

/// Filter for listing chats.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChatQuery {
    pub limit: Option<usize>,
    pub favorites_only: bool,
}

/// A local file sent to seed a chat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceFile {
    pub name: String,
    pub content: String,
}

/// Request body for initializing a chat from files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatInit {
    #[serde(rename = "type")]
    pub kind: InitKind,
    pub files: Vec<SourceFile>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
}

impl ChatInit {
    /// Build a files-based init request, rejecting an empty file set.
    pub fn from_files(files: Vec<SourceFile>, project_id: Option<String>) -> DomainResult<Self> {
        if files.is_empty() {
            return Err(DomainError::NoFilesMatched);
        }
        Ok(Self {
            kind: InitKind::Files,
            files,
            project_id,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InitKind {
    Files,
}

/// Trimmed remote resource id. Blank ids and the dot segments are rejected.
pub fn resource_id<'a>(label: &'static str, raw: &'a str) -> DomainResult<&'a str> {
    let id = raw.trim();
    if id.is_empty() {
        return Err(DomainError::EmptyInput(label));
    }
    if id == "." || id == ".." {
        return Err(DomainError::InvalidId {
            label,
            value: id.to_string(),
        });
    }
    Ok(id)
}

/// Path segments that are never collected.
pub const EXCLUDED_SEGMENTS: [&str; 2] = ["node_modules/", ".git/"];

/// Whether a `/`-separated relative path falls inside an excluded directory.
pub fn is_excluded(path: &str) -> bool {
    let normalized = format!("/{}", path.replace('\\', "/"));
    EXCLUDED_SEGMENTS
        .iter()
        .any(|segment| normalized.contains(&format!("/{segment}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_blank_message_when_building_new_chat_then_rejects() {
        assert_eq!(NewChat::new("   "), Err(DomainError::EmptyInput("message")));
    }

    #[test]
    fn given_no_files_when_building_init_then_rejects() {
        assert_eq!(
            ChatInit::from_files(vec![], None),
            Err(DomainError::NoFilesMatched)
        );
    }

    #[test]
    fn given_dot_segments_when_validating_id_then_rejects() {
        assert_eq!(resource_id("chat id", " c1 "), Ok("c1"));
        assert_eq!(
            resource_id("chat id", "  "),
            Err(DomainError::EmptyInput("chat id"))
        );
        assert!(matches!(
            resource_id("chat id", ".."),
            Err(DomainError::InvalidId { .. })
        ));
        assert!(matches!(
            resource_id("project id", "."),
            Err(DomainError::InvalidId { .. })
        ));
        assert_eq!(resource_id("chat id", "../user"), Ok("../user"));
    }

    #[test]
    fn given_excluded_segments_when_checking_then_matches_only_whole_segments() {
        assert!(is_excluded("node_modules/a/index.ts"));
        assert!(is_excluded("web/node_modules/a.ts"));
        assert!(is_excluded(".git/config"));
        assert!(is_excluded("sub\\.git\\HEAD"));
        assert!(!is_excluded("src/my_node_modules/a.ts"));
        assert!(!is_excluded("src/.github/workflows/ci.yml"));
        assert!(!is_excluded("src/app.ts"));
    }

    #[test]
    fn given_chat_json_when_deserializing_then_reads_camel_case_fields() {
        let chat: Chat = serde_json::from_str(
            r#"{"id":"c1","name":"demo","privacy":"private","favorite":true,
               "createdAt":"2024-05-01T10:00:00Z","webUrl":"https://example.test/chat/c1"}"#,
        )
        .unwrap();
        assert_eq!(chat.id, "c1");
        assert!(chat.favorite);
        assert!(chat.is_private());
        assert_eq!(chat.web_url.as_deref(), Some("https://example.test/chat/c1"));
        assert!(chat.created_at.is_some());
    }

    #[test]
    fn given_user_without_name_when_displaying_then_falls_back_to_email_then_id() {
        let user = User {
            id: "u1".into(),
            name: None,
            email: Some("a@b.c".into()),
        };
        assert_eq!(user.display_name(), "a@b.c");
        let bare = User {
            id: "u1".into(),
            name: None,
            email: None,
        };
        assert_eq!(bare.display_name(), "u1");
    }
}
