//! StoryReel CLI
//!
//! Command-line front end over the StoryReel client library. Every backend
//! endpoint is reachable through a subcommand.

pub mod commands;

use clap::{Args, Parser, Subcommand};
use domain::Role;

pub use commands::run;

/// StoryReel CLI
#[derive(Debug, Parser)]
#[command(name = "storyreel-cli")]
#[command(author, version, about = "StoryReel backend client", long_about = None)]
pub struct Cli {
    /// Verbosity level
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Backend URL (overrides configuration)
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    #[command(flatten)]
    pub credentials: Credentials,

    #[command(subcommand)]
    pub command: Commands,
}

/// Log in before running the command
#[derive(Debug, Clone, Default, Args)]
pub struct Credentials {
    /// Account email
    #[arg(long, global = true, requires = "password")]
    pub email: Option<String>,

    /// Account password
    #[arg(long, global = true, env = "STORYREEL_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Log in through the admin endpoint
    #[arg(long, global = true)]
    pub admin: bool,
}

impl Credentials {
    /// Email and password when both were given
    pub fn pair(&self) -> Option<(&str, &str)> {
        self.email.as_deref().zip(self.password.as_deref())
    }
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Restore the session and print who is logged in
    Status,

    /// Create a user account
    Register {
        /// Full name
        #[arg(long)]
        name: String,
        /// Email address
        #[arg(long = "account-email")]
        account_email: String,
        /// Password (lower, upper, digit and special character, at least 8)
        #[arg(long = "account-password")]
        account_password: String,
    },

    /// Log in with --email and --password and print the principal
    Login,

    /// Log out of the user or admin session
    Logout,

    /// Request a password reset email
    ForgotPassword {
        /// Email address of the account
        address: String,
    },

    /// Set a new password from a reset token
    ResetPassword {
        /// Token from the reset email
        #[arg(long)]
        token: String,
        /// New password
        #[arg(long)]
        new_password: String,
        /// Repeat the new password
        #[arg(long)]
        confirm: Option<String>,
    },

    /// Story projects
    #[command(subcommand)]
    Projects(ProjectCommands),

    /// Administration
    #[command(subcommand)]
    Admin(AdminCommands),
}

#[derive(Debug, Subcommand)]
pub enum ProjectCommands {
    /// List projects
    List,

    /// Show one project with its scenes
    Show {
        id: i64,
    },

    /// Start a project from a story
    Create {
        #[arg(long)]
        title: String,
        /// Story text
        #[arg(long)]
        story: String,
        /// Target animation length in seconds (10 to 30)
        #[arg(long, default_value_t = domain::DEFAULT_DURATION_SEC)]
        duration: u32,
    },

    /// Split a project's story into scenes
    Segment {
        id: i64,
    },
}

#[derive(Debug, Subcommand)]
pub enum AdminCommands {
    /// Create an admin account
    Register {
        #[arg(long)]
        name: String,
        #[arg(long = "account-email")]
        account_email: String,
        /// Password (letters and digits, at least 8)
        #[arg(long = "account-password")]
        account_password: String,
    },

    /// Log in as admin with --email and --password
    Login,

    /// Manage user accounts
    #[command(subcommand)]
    Users(UserCommands),
}

#[derive(Debug, Subcommand)]
pub enum UserCommands {
    /// One page of accounts
    List {
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long, default_value_t = 10)]
        limit: u32,
        /// Filter by name or email
        #[arg(long)]
        search: Option<String>,
        /// Filter by role
        #[arg(long)]
        role: Option<Role>,
    },

    Show {
        id: i64,
    },

    /// Create an account
    Create {
        #[arg(long)]
        name: String,
        #[arg(long = "account-email")]
        account_email: String,
        #[arg(long = "account-password")]
        account_password: String,
        #[arg(long, default_value = "user")]
        role: Role,
    },

    /// Change selected fields of an account
    Update {
        id: i64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long = "account-email")]
        account_email: Option<String>,
        #[arg(long = "account-password")]
        account_password: Option<String>,
        #[arg(long)]
        role: Option<Role>,
    },

    SetRole {
        id: i64,
        role: Role,
    },

    /// Switch between admin and user
    ToggleRole {
        id: i64,
    },

    SetPassword {
        id: i64,
        new_password: String,
    },

    Delete {
        id: i64,
    },
}

/// Determine log filter level from verbosity count
pub const fn log_filter_from_verbosity(verbose: u8) -> Option<&'static str> {
    match verbose {
        0 => None,
        1 => Some("info"),
        2 => Some("debug"),
        _ => Some("trace"),
    }
}
