//! Command handlers: one per subcommand, all returning `CliResult`

use std::io;

use clap::CommandFactory;
use clap_complete::generate;
use serde::Serialize;
use tracing::{debug, instrument};

use crate::application::services::{ChatOutcome, CreateOptions, InitOutcome};
use crate::application::ApplicationError;
use crate::cli::args::{ChatCommands, Cli, Commands};
use crate::cli::output;
use crate::cli::CliResult;
use crate::domain::{Chat, User};
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::traits::StoreKey;

/// JSON shape of a created chat.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreatedChatOutput<'a> {
    id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
    url: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    file_count: Option<usize>,
}

pub fn execute_command(cli: &Cli, services: &ServiceContainer) -> CliResult<()> {
    match &cli.command {
        Commands::Login => login(services),
        Commands::Logout => logout(services),
        Commands::Whoami { json } => whoami(services, *json),
        Commands::Chat { command } => execute_chat_command(command, services),
        Commands::Link { project_id } => link(services, project_id),
        Commands::Unlink => unlink(services),
        Commands::Info => info(services),
        Commands::Completion { shell } => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(*shell, &mut cmd, name, &mut io::stdout());
            Ok(())
        }
    }
}

fn execute_chat_command(command: &ChatCommands, services: &ServiceContainer) -> CliResult<()> {
    match command {
        ChatCommands::Create {
            message,
            system,
            model,
            image_gen,
            thinking,
            private,
            no_project,
            json,
        } => {
            let options = CreateOptions {
                message: message.clone(),
                system: system.clone(),
                model: model.clone(),
                image_generations: *image_gen,
                thinking: *thinking,
                private: *private,
                use_project: !*no_project,
            };
            chat_create(services, options, *json)
        }
        ChatCommands::List {
            favorites,
            limit,
            json,
        } => chat_list(services, *limit, *favorites, *json),
        ChatCommands::Open { id, no_browser } => chat_open(services, id, !*no_browser),
        ChatCommands::Delete { id } => chat_delete(services, id),
        ChatCommands::Init {
            patterns,
            message,
            no_project,
            json,
        } => chat_init(services, patterns, message.as_deref(), !*no_project, *json),
    }
}

#[instrument(skip(services))]
fn login(services: &ServiceContainer) -> CliResult<()> {
    let user = services.auth.login()?;
    output::success(&format!("Logged in as {}", user.display_name()));
    Ok(())
}

#[instrument(skip(services))]
fn logout(services: &ServiceContainer) -> CliResult<()> {
    if services.auth.logout()? {
        output::success("Logged out");
    } else {
        output::info("Not logged in, nothing to do");
    }
    Ok(())
}

#[instrument(skip(services))]
fn whoami(services: &ServiceContainer, json: bool) -> CliResult<()> {
    let user = services.auth.whoami()?;
    if json {
        output::json(&user);
    } else {
        print_user(&user);
    }
    Ok(())
}

#[instrument(skip(services, options))]
fn chat_create(services: &ServiceContainer, options: CreateOptions, json: bool) -> CliResult<()> {
    let ChatOutcome { chat, url } = services.chats.create(options)?;
    if json {
        output::json(&CreatedChatOutput {
            id: &chat.id,
            name: chat.name.as_deref(),
            url: &url,
            file_count: None,
        });
    } else {
        output::action("Created chat", &chat.id);
        output::detail(&url);
    }
    Ok(())
}

#[instrument(skip(services))]
fn chat_list(
    services: &ServiceContainer,
    limit: Option<usize>,
    favorites: bool,
    json: bool,
) -> CliResult<()> {
    let chats = services.chats.list(limit, favorites)?;
    output::info(&render_chat_list(&chats, json)?);
    Ok(())
}

/// `chat list` output. JSON mode always yields a JSON array, even when empty.
fn render_chat_list(chats: &[Chat], json: bool) -> CliResult<String> {
    if json {
        return serde_json::to_string_pretty(chats).map_err(|e| {
            ApplicationError::OperationFailed {
                context: "serialize chat list".to_string(),
                source: Box::new(e),
            }
            .into()
        });
    }
    if chats.is_empty() {
        return Ok("No chats found.".to_string());
    }
    Ok(chats
        .iter()
        .map(format_chat_line)
        .collect::<Vec<_>>()
        .join("\n"))
}

#[instrument(skip(services))]
fn chat_open(services: &ServiceContainer, id: &str, launch: bool) -> CliResult<()> {
    let url = services.chats.url_for_id(id)?;
    output::info(&url);
    if launch {
        if let Err(e) = services.chats.open_in_browser(&url) {
            output::warning(&e);
        }
    }
    Ok(())
}

#[instrument(skip(services))]
fn chat_delete(services: &ServiceContainer, id: &str) -> CliResult<()> {
    services.chats.delete(id)?;
    output::success(&format!("Deleted chat {}", id.trim()));
    Ok(())
}

#[instrument(skip(services, message))]
fn chat_init(
    services: &ServiceContainer,
    patterns: &[String],
    message: Option<&str>,
    use_project: bool,
    json: bool,
) -> CliResult<()> {
    let InitOutcome {
        chat,
        url,
        file_count,
        follow_up,
    } = services.chats.init(patterns, message, use_project)?;
    debug!("chat_init: follow-up sent={}", follow_up.is_some());
    if json {
        output::json(&CreatedChatOutput {
            id: &chat.id,
            name: chat.name.as_deref(),
            url: &url,
            file_count: Some(file_count),
        });
    } else {
        output::action("Created chat", &chat.id);
        output::detail(&url);
        output::detail(&format!("{} file(s) uploaded", file_count));
        if follow_up.is_some() {
            output::detail("Follow-up message sent");
        }
    }
    Ok(())
}

#[instrument(skip(services))]
fn link(services: &ServiceContainer, project_id: &str) -> CliResult<()> {
    let project = services.projects.link(project_id)?;
    let label = project.name.as_deref().unwrap_or(&project.id);
    output::success(&format!("Linked to project {} ({})", label, project.id));
    Ok(())
}

#[instrument(skip(services))]
fn unlink(services: &ServiceContainer) -> CliResult<()> {
    match services.projects.unlink()? {
        Some(link) => output::success(&format!("Unlinked project {}", link.project_id)),
        None => output::info("No project linked, nothing to do"),
    }
    Ok(())
}

#[instrument(skip(services))]
fn info(services: &ServiceContainer) -> CliResult<()> {
    output::header("chatctl");
    output::detail(&format!("API URL:      {}", services.settings.api_url));
    output::detail(&format!("Web URL:      {}", services.settings.web_url));
    output::detail(&format!(
        "Config file:  {}",
        services.credentials.location(StoreKey::Config)
    ));
    output::detail(&format!(
        "Link file:    {}",
        services.credentials.location(StoreKey::ProjectLink)
    ));
    let source = match services.clients.key_source()? {
        Some(source) => source.to_string(),
        None => "none (run 'chatctl login')".to_string(),
    };
    output::detail(&format!("API key:      {}", source));
    let linked = match services.projects.linked()? {
        Some(link) => link.project_id,
        None => "none".to_string(),
    };
    output::detail(&format!("Project:      {}", linked));
    Ok(())
}

fn print_user(user: &User) {
    output::action("User", &user.display_name());
    output::detail(&format!("id: {}", user.id));
    if let Some(email) = &user.email {
        output::detail(&format!("email: {}", email));
    }
}

/// One line of `chat list`: id, name, flags, creation time.
fn format_chat_line(chat: &Chat) -> String {
    let mut line = format!(
        "{}  {}",
        chat.id,
        chat.name.as_deref().unwrap_or("(untitled)")
    );
    if chat.favorite {
        line.push_str("  ★");
    }
    if chat.is_private() {
        line.push_str("  [private]");
    }
    if let Some(created) = chat.created_at {
        line.push_str(&format!("  {}", created.format("%Y-%m-%d %H:%M")));
    }
    line
}
