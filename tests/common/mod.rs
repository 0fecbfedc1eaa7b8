//! Shared mocks for the I/O boundary traits

#![allow(dead_code)]

use std::io;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use chatctl::config::Settings;
use chatctl::domain::{Chat, ChatInit, ChatQuery, ChatResponse, NewChat, Project, User};
use chatctl::infrastructure::api::{ApiError, ApiResult};
use chatctl::infrastructure::di::{ServiceContainer, ServiceDeps};
use chatctl::infrastructure::traits::{
    ApiConnector, Browser, ChatApi, KeyValueStore, MemoryStore, Prompt, RealFileSystem,
};

/// Scriptable remote service. Shared between the connector and the test.
#[derive(Default)]
pub struct MockApi {
    /// Only this key is accepted; `None` accepts any key
    pub accepted_key: Option<String>,
    pub user: Option<User>,
    pub chats: Vec<Chat>,
    pub projects: Vec<Project>,
    /// Every call fails with this error when set
    pub fail_with: Option<ApiError>,
    /// `create_chat` answers with a stream
    pub stream: bool,
    /// `get_project` reports this id instead of the requested one
    pub canonical_project_id: Option<String>,
    pub calls: Mutex<Vec<String>>,
    pub created: Mutex<Vec<NewChat>>,
    pub inits: Mutex<Vec<ChatInit>>,
    pub messages: Mutex<Vec<(String, String)>>,
}

impl MockApi {
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn enter(&self, key: &str, call: &str) -> ApiResult<()> {
        self.calls.lock().unwrap().push(call.to_string());
        if let Some(accepted) = &self.accepted_key {
            if accepted != key {
                return Err(ApiError::Unauthorized {
                    message: "invalid API key".into(),
                });
            }
        }
        match &self.fail_with {
            Some(e) => Err(e.clone()),
            None => Ok(()),
        }
    }
}

/// Handle returned by `MockConnector`, bound to one key.
struct BoundApi {
    api: Arc<MockApi>,
    key: String,
}

impl ChatApi for BoundApi {
    fn current_user(&self) -> ApiResult<User> {
        self.api.enter(&self.key, "current_user")?;
        self.api.user.clone().ok_or(ApiError::NotFound {
            message: "current user".into(),
        })
    }

    fn create_chat(&self, request: &NewChat) -> ApiResult<ChatResponse> {
        self.api.enter(&self.key, "create_chat")?;
        self.api.created.lock().unwrap().push(request.clone());
        if self.api.stream {
            return Ok(ChatResponse::Stream);
        }
        Ok(ChatResponse::Completed(chat("new_chat", false)))
    }

    fn list_chats(&self, _query: &ChatQuery) -> ApiResult<Vec<Chat>> {
        self.api.enter(&self.key, "list_chats")?;
        Ok(self.api.chats.clone())
    }

    fn delete_chat(&self, id: &str) -> ApiResult<()> {
        self.api.enter(&self.key, &format!("delete_chat {id}"))?;
        if self.api.chats.iter().any(|c| c.id == id) {
            Ok(())
        } else {
            Err(ApiError::NotFound {
                message: format!("Chat {id} does not exist"),
            })
        }
    }

    fn init_chat(&self, request: &ChatInit) -> ApiResult<Chat> {
        self.api.enter(&self.key, "init_chat")?;
        self.api.inits.lock().unwrap().push(request.clone());
        Ok(chat("init_chat", false))
    }

    fn send_message(&self, chat_id: &str, message: &str) -> ApiResult<Chat> {
        self.api.enter(&self.key, "send_message")?;
        self.api
            .messages
            .lock()
            .unwrap()
            .push((chat_id.to_string(), message.to_string()));
        Ok(chat(chat_id, false))
    }

    fn get_project(&self, id: &str) -> ApiResult<Project> {
        self.api.enter(&self.key, &format!("get_project {id}"))?;
        let mut project = self
            .api
            .projects
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or(ApiError::NotFound {
                message: format!("project {id}"),
            })?;
        if let Some(canonical) = &self.api.canonical_project_id {
            project.id = canonical.clone();
        }
        Ok(project)
    }
}

/// Connector that records every key it builds a client for.
pub struct MockConnector {
    pub api: Arc<MockApi>,
    pub connects: Mutex<Vec<String>>,
}

impl MockConnector {
    pub fn new(api: Arc<MockApi>) -> Self {
        Self {
            api,
            connects: Mutex::new(Vec::new()),
        }
    }

    pub fn connect_count(&self) -> usize {
        self.connects.lock().unwrap().len()
    }
}

impl ApiConnector for MockConnector {
    fn connect(&self, api_key: &str) -> ApiResult<Box<dyn ChatApi>> {
        self.connects.lock().unwrap().push(api_key.to_string());
        Ok(Box::new(BoundApi {
            api: self.api.clone(),
            key: api_key.to_string(),
        }))
    }
}

/// Prompt answering with a fixed line.
pub struct ScriptedPrompt {
    pub answer: String,
    pub asked: Mutex<Vec<String>>,
}

impl ScriptedPrompt {
    pub fn new(answer: &str) -> Self {
        Self {
            answer: answer.to_string(),
            asked: Mutex::new(Vec::new()),
        }
    }
}

impl Prompt for ScriptedPrompt {
    fn read_line(&self, message: &str) -> io::Result<String> {
        self.asked.lock().unwrap().push(message.to_string());
        Ok(self.answer.clone())
    }
}

/// Browser that records opened URLs.
#[derive(Default)]
pub struct RecordingBrowser {
    pub opened: Mutex<Vec<String>>,
}

impl Browser for RecordingBrowser {
    fn open(&self, url: &str) -> io::Result<()> {
        self.opened.lock().unwrap().push(url.to_string());
        Ok(())
    }
}

pub fn chat(id: &str, favorite: bool) -> Chat {
    Chat {
        id: id.to_string(),
        name: Some(format!("chat {id}")),
        privacy: Some("public".to_string()),
        favorite,
        created_at: None,
        web_url: None,
    }
}

pub fn user() -> User {
    User {
        id: "user_1".into(),
        name: Some("Ada".into()),
        email: Some("ada@example.test".into()),
    }
}

/// Everything a test needs to drive the services and inspect side effects.
pub struct Harness {
    pub services: ServiceContainer,
    pub api: Arc<MockApi>,
    pub connector: Arc<MockConnector>,
    pub store: Arc<MemoryStore>,
    pub prompt: Arc<ScriptedPrompt>,
    pub browser: Arc<RecordingBrowser>,
}

pub struct HarnessBuilder {
    api: MockApi,
    store: Arc<MemoryStore>,
    env_api_key: Option<String>,
    prompt_answer: String,
    work_dir: PathBuf,
}

impl HarnessBuilder {
    pub fn new() -> Self {
        Self {
            api: MockApi {
                user: Some(user()),
                ..Default::default()
            },
            store: Arc::new(MemoryStore::new()),
            env_api_key: None,
            prompt_answer: String::new(),
            work_dir: std::env::temp_dir(),
        }
    }

    pub fn api(mut self, api: MockApi) -> Self {
        self.api = api;
        self
    }

    pub fn store(mut self, store: Arc<MemoryStore>) -> Self {
        self.store = store;
        self
    }

    pub fn env_api_key(mut self, key: &str) -> Self {
        self.env_api_key = Some(key.to_string());
        self
    }

    pub fn stored_api_key(self, key: &str) -> Self {
        self.store
            .set(
                chatctl::infrastructure::traits::StoreKey::Config,
                &format!(r#"{{"apiKey":"{key}"}}"#),
            )
            .unwrap();
        self
    }

    pub fn prompt_answer(mut self, answer: &str) -> Self {
        self.prompt_answer = answer.to_string();
        self
    }

    pub fn work_dir(mut self, dir: PathBuf) -> Self {
        self.work_dir = dir;
        self
    }

    pub fn build(self) -> Harness {
        chatctl::util::testing::init_test_setup();
        let api = Arc::new(self.api);
        let connector = Arc::new(MockConnector::new(api.clone()));
        let prompt = Arc::new(ScriptedPrompt::new(&self.prompt_answer));
        let browser = Arc::new(RecordingBrowser::default());

        let deps = ServiceDeps {
            fs: Arc::new(RealFileSystem),
            store: self.store.clone(),
            connector: connector.clone(),
            prompt: prompt.clone(),
            browser: browser.clone(),
            work_dir: self.work_dir,
            env_api_key: self.env_api_key,
        };
        let services = ServiceContainer::with_deps(Settings::default(), deps);

        Harness {
            services,
            api,
            connector,
            store: self.store,
            prompt,
            browser,
        }
    }
}
