//! Chat operations
//!
//! Each operation validates its input before acquiring a client, so invalid
//! invocations never touch the network.

use std::sync::Arc;

use tracing::{debug, instrument};

use crate::application::services::{ClientFactory, CredentialStore, FileCollector};
use crate::application::{ApplicationResult, IoResultExt};
use crate::domain::{
    resource_id, Chat, ChatInit, ChatQuery, ChatResponse, DomainError, ModelConfig, NewChat,
    Privacy,
};
use crate::infrastructure::traits::Browser;

/// Options for `chat create`.
#[derive(Debug, Clone, Default)]
pub struct CreateOptions {
    pub message: String,
    pub system: Option<String>,
    pub model: Option<String>,
    pub image_generations: bool,
    pub thinking: bool,
    pub private: bool,
    /// Attach the linked project, if any
    pub use_project: bool,
}

/// A chat together with the URL it can be viewed at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatOutcome {
    pub chat: Chat,
    pub url: String,
}

/// Result of `chat init`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitOutcome {
    pub chat: Chat,
    pub url: String,
    pub file_count: usize,
    /// Chat state after the follow-up message, when one was sent
    pub follow_up: Option<Chat>,
}

/// Service for remote chat resources.
pub struct ChatService {
    factory: Arc<ClientFactory>,
    credentials: Arc<CredentialStore>,
    collector: Arc<FileCollector>,
    browser: Arc<dyn Browser>,
    web_url: String,
}

impl ChatService {
    pub fn new(
        factory: Arc<ClientFactory>,
        credentials: Arc<CredentialStore>,
        collector: Arc<FileCollector>,
        browser: Arc<dyn Browser>,
        web_url: impl Into<String>,
    ) -> Self {
        Self {
            factory,
            credentials,
            collector,
            browser,
            web_url: web_url.into(),
        }
    }

    #[instrument(skip(self, options), fields(use_project = options.use_project))]
    pub fn create(&self, options: CreateOptions) -> ApplicationResult<ChatOutcome> {
        let mut request = NewChat::new(options.message)?;
        request.system = options.system.filter(|s| !s.trim().is_empty());
        request.chat_privacy = if options.private {
            Privacy::Private
        } else {
            Privacy::Public
        };
        request.model_configuration = ModelConfig {
            model_id: options.model,
            image_generations: options.image_generations,
            thinking: options.thinking,
        };
        request.project_id = self.linked_project_id(options.use_project)?;

        let client = self.factory.client()?;
        match client.create_chat(&request)? {
            ChatResponse::Completed(chat) => Ok(self.outcome(chat)),
            ChatResponse::Stream => Err(DomainError::StreamingResponse.into()),
        }
    }

    /// List chats; `--favorites` and `--limit` are enforced locally as well.
    #[instrument(skip(self))]
    pub fn list(&self, limit: Option<usize>, favorites_only: bool) -> ApplicationResult<Vec<Chat>> {
        if limit == Some(0) {
            return Err(DomainError::InvalidLimit.into());
        }
        let query = ChatQuery {
            limit,
            favorites_only,
        };
        let mut chats = self.factory.client()?.list_chats(&query)?;
        debug!("list: service returned {} chats", chats.len());
        if favorites_only {
            chats.retain(|c| c.favorite);
        }
        if let Some(limit) = limit {
            chats.truncate(limit);
        }
        Ok(chats)
    }

    /// Irreversible; there is no confirmation step.
    #[instrument(skip(self))]
    pub fn delete(&self, id: &str) -> ApplicationResult<()> {
        let id = require_id(id)?;
        self.factory.client()?.delete_chat(id)?;
        Ok(())
    }

    /// Create a chat seeded with files, optionally followed by one message.
    ///
    /// Zero patterns or zero matched files fail before any client is built.
    /// The follow-up is not atomic with the init: if it fails, the chat exists.
    #[instrument(skip(self, message))]
    pub fn init(
        &self,
        patterns: &[String],
        message: Option<&str>,
        use_project: bool,
    ) -> ApplicationResult<InitOutcome> {
        if patterns.is_empty() {
            return Err(DomainError::NoPatterns.into());
        }
        if message.is_some_and(|m| m.trim().is_empty()) {
            return Err(DomainError::EmptyInput("message").into());
        }

        let files = self.collector.collect(patterns)?;
        let file_count = files.len();
        let request = ChatInit::from_files(files, self.linked_project_id(use_project)?)?;

        let client = self.factory.client()?;
        let chat = client.init_chat(&request)?;
        debug!("init: created chat {} from {} files", chat.id, file_count);

        let follow_up = match message {
            Some(m) => Some(client.send_message(&chat.id, m)?),
            None => None,
        };

        let ChatOutcome { chat, url } = self.outcome(chat);
        Ok(InitOutcome {
            chat,
            url,
            file_count,
            follow_up,
        })
    }

    /// URL of a chat by id. No network access.
    pub fn url_for_id(&self, id: &str) -> ApplicationResult<String> {
        let id = require_id(id)?;
        Ok(format!("{}/chat/{}", self.web_url.trim_end_matches('/'), id))
    }

    pub fn open_in_browser(&self, url: &str) -> ApplicationResult<()> {
        self.browser
            .open(url)
            .with_context(format!("open browser for {}", url))
    }

    fn outcome(&self, chat: Chat) -> ChatOutcome {
        let url = chat
            .web_url
            .clone()
            .unwrap_or_else(|| format!("{}/chat/{}", self.web_url.trim_end_matches('/'), chat.id));
        ChatOutcome { chat, url }
    }

    fn linked_project_id(&self, use_project: bool) -> ApplicationResult<Option<String>> {
        if !use_project {
            return Ok(None);
        }
        Ok(self
            .credentials
            .read_project_link()?
            .map(|link| link.project_id))
    }
}

fn require_id(id: &str) -> ApplicationResult<&str> {
    Ok(resource_id("chat id", id)?)
}
