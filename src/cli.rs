//! Command-line interface definition for Solace
//!
//! This module defines the CLI structure using clap's derive API.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::api::{AdminResource, PageQuery};

/// Solace - counselling chat client
///
/// Talk to the Solace assistant, browse support resources, and manage the
/// service as an administrator. Conversations are kept locally so they can
/// be resumed later.
#[derive(Parser, Debug, Clone)]
#[command(name = "solace")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/config.yaml")]
    pub config: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Override the local store location
    #[arg(long)]
    pub storage_path: Option<PathBuf>,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands for Solace
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Start an interactive conversation
    Chat {
        /// Resume a stored session by ID
        #[arg(short, long)]
        resume: Option<String>,
    },

    /// Manage locally stored conversations
    Sessions {
        #[command(subcommand)]
        command: SessionCommand,
    },

    /// Browse support resources
    Resources {
        /// Filter by category
        #[arg(long)]
        category: Option<String>,

        /// Filter by location tag
        #[arg(long)]
        location: Option<String>,

        /// Maximum number of resources to show
        #[arg(long)]
        limit: Option<u32>,
    },

    /// Log in and store the access token
    Login {
        /// Account name
        #[arg(short, long)]
        username: String,

        /// Password (prompted for when omitted)
        #[arg(short, long, env = "SOLACE_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },

    /// Create an account
    Register {
        /// Account name
        #[arg(short, long)]
        username: String,

        /// Contact email
        #[arg(short, long)]
        email: String,

        /// Password (prompted for when omitted)
        #[arg(short, long, env = "SOLACE_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },

    /// Forget the stored access token
    Logout,

    /// Show the logged-in account
    Whoami,

    /// Change fields of the logged-in account
    UpdateProfile {
        /// Fields to change as JSON, e.g. '{"email":"amy@example.org"}'
        json: String,
    },

    /// Server-side conversations and unread messages
    Messages {
        #[command(subcommand)]
        command: MessageCommand,
    },

    /// Browse psychologists
    Psychologists {
        #[command(subcommand)]
        command: PsychologistCommand,
    },

    /// Book and manage counselling orders
    Orders {
        #[command(subcommand)]
        command: OrderCommand,
    },

    /// Read published articles
    Articles {
        #[command(subcommand)]
        command: ArticleCommand,
    },

    /// Administrative record management
    Admin {
        /// Kind of record
        #[arg(value_enum)]
        resource: AdminResourceArg,

        #[command(subcommand)]
        command: AdminCommand,
    },
}

/// Local session subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum SessionCommand {
    /// List stored conversations, most recent first
    List,

    /// Print a stored conversation
    Show {
        /// Session ID
        id: String,
    },

    /// Delete a stored conversation
    Delete {
        /// Session ID
        id: String,
    },

    /// Print a freshly generated session ID
    New,
}

/// Pagination flags shared by list commands
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct PageArgs {
    /// Page number (1-based)
    #[arg(long)]
    pub page: Option<u32>,

    /// Records per page
    #[arg(long)]
    pub limit: Option<u32>,

    /// Free-text filter
    #[arg(long)]
    pub search: Option<String>,
}

impl From<PageArgs> for PageQuery {
    fn from(args: PageArgs) -> Self {
        PageQuery {
            page: args.page,
            limit: args.limit,
            search: args.search,
        }
    }
}

/// Server-side message subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum MessageCommand {
    /// Show chat history kept by the server
    History {
        /// Only messages of this user
        #[arg(long)]
        user_id: Option<String>,

        /// Only messages with this psychologist
        #[arg(long)]
        psychologist_id: Option<String>,
    },

    /// Show messages not read yet
    Unread,

    /// Open a named conversation on the server
    Open {
        /// Conversation name
        #[arg(default_value = "New Conversation")]
        name: String,
    },
}

/// Psychologist subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum PsychologistCommand {
    /// List psychologists
    List {
        #[command(flatten)]
        paging: PageArgs,
    },

    /// Show one psychologist
    Show {
        /// Psychologist ID
        id: String,
    },

    /// Psychologists recommended for you
    Recommend,
}

/// Order subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum OrderCommand {
    /// List your orders
    List {
        #[command(flatten)]
        paging: PageArgs,
    },

    /// Show one order
    Show {
        /// Order ID
        id: String,
    },

    /// Book a session from a JSON object
    Create {
        /// Order fields as JSON, e.g. '{"psychologist_id":3}'
        json: String,
    },

    /// Cancel an order
    Cancel {
        /// Order ID
        id: String,
    },
}

/// Article subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum ArticleCommand {
    /// List articles
    List {
        #[command(flatten)]
        paging: PageArgs,
    },

    /// Show one article
    Show {
        /// Article ID
        id: String,
    },
}

/// Admin subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum AdminCommand {
    /// List records
    List {
        #[command(flatten)]
        paging: PageArgs,
    },

    /// Add a record from a JSON object
    Add {
        /// Record fields as JSON, e.g. '{"name":"Dr. Li"}'
        json: String,
    },

    /// Update a record from a JSON object
    Update {
        /// Record ID
        id: String,

        /// Fields to change as JSON
        json: String,
    },

    /// Delete a record
    Delete {
        /// Record ID
        id: String,
    },
}

/// Admin record kinds as accepted on the command line
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminResourceArg {
    Users,
    Psychologists,
    Orders,
    Articles,
}

impl From<AdminResourceArg> for AdminResource {
    fn from(arg: AdminResourceArg) -> Self {
        match arg {
            AdminResourceArg::Users => AdminResource::Users,
            AdminResourceArg::Psychologists => AdminResource::Psychologists,
            AdminResourceArg::Orders => AdminResource::Orders,
            AdminResourceArg::Articles => AdminResource::Articles,
        }
    }
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

impl Default for Cli {
    fn default() -> Self {
        Self {
            config: Some("config/config.yaml".to_string()),
            verbose: false,
            storage_path: None,
            command: Commands::Sessions {
                command: SessionCommand::List,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_default() {
        let cli = Cli::default();
        assert_eq!(cli.config, Some("config/config.yaml".to_string()));
        assert!(!cli.verbose);
        assert!(matches!(
            cli.command,
            Commands::Sessions {
                command: SessionCommand::List
            }
        ));
    }

    #[test]
    fn test_cli_parse_chat_command() {
        let cli = Cli::try_parse_from(["solace", "chat"]).unwrap();
        if let Commands::Chat { resume } = cli.command {
            assert_eq!(resume, None);
        } else {
            panic!("Expected Chat command");
        }
    }

    #[test]
    fn test_cli_parse_chat_resume() {
        let cli = Cli::try_parse_from(["solace", "chat", "--resume", "lx1abc"]).unwrap();
        if let Commands::Chat { resume } = cli.command {
            assert_eq!(resume, Some("lx1abc".to_string()));
        } else {
            panic!("Expected Chat command");
        }
    }

    #[test]
    fn test_cli_parse_sessions_delete() {
        let cli = Cli::try_parse_from(["solace", "sessions", "delete", "abc"]).unwrap();
        if let Commands::Sessions {
            command: SessionCommand::Delete { id },
        } = cli.command
        {
            assert_eq!(id, "abc");
        } else {
            panic!("Expected Sessions Delete command");
        }
    }

    #[test]
    fn test_cli_parse_resources_filters() {
        let cli = Cli::try_parse_from([
            "solace",
            "resources",
            "--category",
            "hotline",
            "--location",
            "Beijing",
            "--limit",
            "5",
        ])
        .unwrap();
        if let Commands::Resources {
            category,
            location,
            limit,
        } = cli.command
        {
            assert_eq!(category.as_deref(), Some("hotline"));
            assert_eq!(location.as_deref(), Some("Beijing"));
            assert_eq!(limit, Some(5));
        } else {
            panic!("Expected Resources command");
        }
    }

    #[test]
    fn test_cli_parse_admin_update() {
        let cli = Cli::try_parse_from([
            "solace",
            "admin",
            "psychologists",
            "update",
            "7",
            r#"{"name":"Dr. Li"}"#,
        ])
        .unwrap();
        if let Commands::Admin { resource, command } = cli.command {
            assert_eq!(resource, AdminResourceArg::Psychologists);
            assert!(matches!(command, AdminCommand::Update { ref id, .. } if id == "7"));
        } else {
            panic!("Expected Admin command");
        }
    }

    #[test]
    fn test_cli_parse_admin_list_paging() {
        let cli = Cli::try_parse_from([
            "solace", "admin", "users", "list", "--page", "2", "--limit", "10", "--search", "amy",
        ])
        .unwrap();
        if let Commands::Admin {
            command: AdminCommand::List { paging },
            ..
        } = cli.command
        {
            let query = PageQuery::from(paging);
            assert_eq!(query.page, Some(2));
            assert_eq!(query.limit, Some(10));
            assert_eq!(query.search.as_deref(), Some("amy"));
        } else {
            panic!("Expected Admin List command");
        }
    }

    #[test]
    fn test_cli_parse_orders_cancel() {
        let cli = Cli::try_parse_from(["solace", "orders", "cancel", "17"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Orders {
                command: OrderCommand::Cancel { ref id }
            } if id == "17"
        ));
    }

    #[test]
    fn test_cli_parse_messages_open_default_name() {
        let cli = Cli::try_parse_from(["solace", "messages", "open"]).unwrap();
        if let Commands::Messages {
            command: MessageCommand::Open { name },
        } = cli.command
        {
            assert_eq!(name, "New Conversation");
        } else {
            panic!("Expected Messages Open command");
        }
    }

    #[test]
    fn test_cli_parse_psychologists_recommend() {
        let cli = Cli::try_parse_from(["solace", "psychologists", "recommend"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Psychologists {
                command: PsychologistCommand::Recommend
            }
        ));
    }

    #[test]
    fn test_cli_rejects_unknown_admin_resource() {
        assert!(Cli::try_parse_from(["solace", "admin", "invoices", "list"]).is_err());
    }

    #[test]
    fn test_cli_parse_storage_path() {
        let cli =
            Cli::try_parse_from(["solace", "--storage-path", "/tmp/store", "sessions", "list"])
                .unwrap();
        assert_eq!(cli.storage_path, Some(PathBuf::from("/tmp/store")));
    }

    #[test]
    fn test_admin_resource_arg_conversion() {
        assert_eq!(
            AdminResource::from(AdminResourceArg::Orders),
            AdminResource::Orders
        );
    }
}
