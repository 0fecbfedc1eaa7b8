//! CLI argument definitions using clap

use clap::{ArgAction, Parser, Subcommand};

/// Command-line client for the chat API: manage chats and link projects
#[derive(Parser, Debug)]
#[command(name = "chatctl")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true, arg_required_else_help = true)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Store an API key after validating it
    Login,

    /// Remove the stored API key
    Logout,

    /// Show the authenticated user
    Whoami {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Create, list, open, delete and seed chats
    Chat {
        #[command(subcommand)]
        command: ChatCommands,
    },

    /// Link the current directory to a project
    Link {
        /// Project id
        project_id: String,
    },

    /// Remove the project link of the current directory
    Unlink,

    /// Show configuration, credential source and link status
    Info,

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ChatCommands {
    /// Create a chat from a message
    Create {
        /// First message of the chat
        message: String,
        /// System prompt
        #[arg(short, long)]
        system: Option<String>,
        /// Model id
        #[arg(short, long)]
        model: Option<String>,
        /// Enable image generation
        #[arg(long)]
        image_gen: bool,
        /// Enable extended thinking
        #[arg(long)]
        thinking: bool,
        /// Make the chat private
        #[arg(long)]
        private: bool,
        /// Do not attach the linked project
        #[arg(long)]
        no_project: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List chats
    List {
        /// Only favorite chats
        #[arg(short, long)]
        favorites: bool,
        /// Maximum number of chats
        #[arg(short, long)]
        limit: Option<usize>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print a chat's URL and open it in the browser
    Open {
        /// Chat id
        id: String,
        /// Only print the URL
        #[arg(long)]
        no_browser: bool,
    },

    /// Delete a chat (irreversible)
    Delete {
        /// Chat id
        id: String,
    },

    /// Create a chat seeded with local files
    Init {
        /// Glob patterns, e.g. 'src/**/*.ts'
        patterns: Vec<String>,
        /// Follow-up message sent after the chat is created
        #[arg(short, long)]
        message: Option<String>,
        /// Do not attach the linked project
        #[arg(long)]
        no_project: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

impl Commands {
    /// Whether the command reads `Settings` (API or web URL).
    ///
    /// Purely local commands run even when the settings file is broken.
    pub fn uses_settings(&self) -> bool {
        !matches!(
            self,
            Commands::Logout | Commands::Unlink | Commands::Completion { .. }
        )
    }
}
