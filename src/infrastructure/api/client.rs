//! Blocking HTTP implementation of the chat API

use reqwest::blocking::{Client, RequestBuilder};
use reqwest::header::CONTENT_TYPE;
use reqwest::Url;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, trace};

use crate::domain::{Chat, ChatInit, ChatQuery, ChatResponse, NewChat, Project, User};
use crate::infrastructure::api::error::{ApiError, ApiResult};
use crate::infrastructure::traits::{ApiConnector, ChatApi};

const USER_AGENT: &str = concat!("chatctl/", env!("CARGO_PKG_VERSION"));

/// Authenticated client bound to one base URL.
pub struct HttpChatApi {
    client: Client,
    base_url: Url,
    api_key: String,
}

/// List endpoints answer either with a bare array or a `{ "data": [...] }` envelope.
#[derive(Deserialize)]
#[serde(untagged)]
enum ChatList {
    Wrapped { data: Vec<Chat> },
    Bare(Vec<Chat>),
}

impl HttpChatApi {
    pub fn new(base_url: &str, api_key: &str) -> ApiResult<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(ApiError::transport)?;
        Self::with_client(client, base_url, api_key)
    }

    fn with_client(client: Client, base_url: &str, api_key: &str) -> ApiResult<Self> {
        let base_url = Url::parse(base_url).map_err(ApiError::transport)?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::transport(format!("not a base URL: {base_url}")));
        }
        Ok(Self {
            client,
            base_url,
            api_key: api_key.to_string(),
        })
    }

    /// Base URL extended by `segments`, each percent-encoded as one path segment.
    fn url(&self, segments: &[&str]) -> ApiResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::transport(format!("not a base URL: {}", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Send the request and fail with a translated error on non-2xx.
    fn execute(&self, request: RequestBuilder, resource: &str) -> ApiResult<reqwest::blocking::Response> {
        let response = request
            .bearer_auth(&self.api_key)
            .send()
            .map_err(ApiError::transport)?;
        let status = response.status();
        debug!("{} -> {}", resource, status);
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().unwrap_or_default();
        trace!("error body: {}", body);
        Err(ApiError::from_response(status.as_u16(), &body, resource))
    }

    fn fetch<T: DeserializeOwned>(&self, request: RequestBuilder, resource: &str) -> ApiResult<T> {
        self.execute(request, resource)?
            .json::<T>()
            .map_err(ApiError::transport)
    }
}

impl ChatApi for HttpChatApi {
    fn current_user(&self) -> ApiResult<User> {
        self.fetch(self.client.get(self.url(&["user"])?), "current user")
    }

    fn create_chat(&self, request: &NewChat) -> ApiResult<ChatResponse> {
        let response = self.execute(self.client.post(self.url(&["chats"])?).json(request), "chats")?;
        let streamed = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.starts_with("text/event-stream"));
        if streamed {
            return Ok(ChatResponse::Stream);
        }
        let chat = response.json::<Chat>().map_err(ApiError::transport)?;
        Ok(ChatResponse::Completed(chat))
    }

    fn list_chats(&self, query: &ChatQuery) -> ApiResult<Vec<Chat>> {
        let mut request = self.client.get(self.url(&["chats"])?);
        if let Some(limit) = query.limit {
            request = request.query(&[("limit", limit.to_string())]);
        }
        if query.favorites_only {
            request = request.query(&[("isFavorite", "true")]);
        }
        let list: ChatList = self.fetch(request, "chats")?;
        Ok(match list {
            ChatList::Wrapped { data } => data,
            ChatList::Bare(chats) => chats,
        })
    }

    fn delete_chat(&self, id: &str) -> ApiResult<()> {
        let resource = format!("chat {id}");
        self.execute(self.client.delete(self.url(&["chats", id])?), &resource)?;
        Ok(())
    }

    fn init_chat(&self, request: &ChatInit) -> ApiResult<Chat> {
        self.fetch(
            self.client.post(self.url(&["chats", "init"])?).json(request),
            "chats/init",
        )
    }

    fn send_message(&self, chat_id: &str, message: &str) -> ApiResult<Chat> {
        let resource = format!("chat {chat_id}");
        self.fetch(
            self.client
                .post(self.url(&["chats", chat_id, "messages"])?)
                .json(&json!({ "message": message })),
            &resource,
        )
    }

    fn get_project(&self, id: &str) -> ApiResult<Project> {
        let resource = format!("project {id}");
        self.fetch(self.client.get(self.url(&["projects", id])?), &resource)
    }
}

/// Builds `HttpChatApi` handles for a fixed base URL.
#[derive(Debug, Clone)]
pub struct HttpConnector {
    base_url: String,
}

impl HttpConnector {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }
}

impl ApiConnector for HttpConnector {
    fn connect(&self, api_key: &str) -> ApiResult<Box<dyn ChatApi>> {
        debug!("connect: base_url={}", self.base_url);
        Ok(Box::new(HttpChatApi::new(&self.base_url, api_key)?))
    }
}
