//! Subcommand execution

#![allow(clippy::print_stdout)]

use anyhow::bail;
use application::ApiClient;
use domain::{
    CreateProjectRequest, CreateUserRequest, ForgotPasswordRequest, LoginRequest, Password,
    Principal, ProjectId, RegisterAdminRequest, RegisterUserRequest, ResetPasswordRequest,
    UpdatePasswordRequest, UpdateUserRequest, UserId, UserListQuery,
};
use serde::Serialize;
use serde_json::json;
use tracing::debug;

use crate::{AdminCommands, Cli, Commands, Credentials, ProjectCommands, UserCommands};

/// Run the parsed command against the backend
pub async fn run(cli: Cli, client: &ApiClient) -> anyhow::Result<()> {
    let signed_in = sign_in(client, &cli.credentials).await?;

    match cli.command {
        Commands::Status => {
            let outcome = client.bootstrap().await;
            print_json(&json!({
                "base_url": client.base_url(),
                "token_refreshed": outcome.token_refreshed,
                "user": client.sessions().user().current(),
                "admin": client.sessions().admin().current(),
            }))?;
        },

        Commands::Register {
            name,
            account_email,
            account_password,
        } => {
            let request = RegisterUserRequest {
                full_name: name,
                email: account_email,
                password: Password::new(account_password),
            };
            let message = client.auth().register(&request).await?;
            print_message(message, "Account created");
        },

        Commands::Login | Commands::Admin(AdminCommands::Login) => match signed_in {
            Some(principal) => print_json(&principal)?,
            None => bail!("login needs --email and --password"),
        },

        Commands::Logout => {
            if cli.credentials.admin {
                client.admin_auth().logout_admin().await?;
            } else {
                client.auth().logout().await?;
            }
            print_message(None, "Logged out");
        },

        Commands::ForgotPassword { address } => {
            let message = client
                .auth()
                .forgot_password(&ForgotPasswordRequest { email: address })
                .await?;
            print_message(message, "Reset email requested");
        },

        Commands::ResetPassword {
            token,
            new_password,
            confirm,
        } => {
            let request = ResetPasswordRequest {
                token,
                new_password: Password::new(new_password),
                confirm_password: confirm.map(Password::new),
            };
            let message = client.auth().reset_password(&request).await?;
            print_message(message, "Password updated");
        },

        Commands::Projects(command) => run_projects(command, client).await?,

        Commands::Admin(AdminCommands::Register {
            name,
            account_email,
            account_password,
        }) => {
            let request = RegisterAdminRequest {
                full_name: name,
                email: account_email,
                password: Password::new(account_password),
            };
            let message = client.admin_auth().register_admin(&request).await?;
            print_message(message, "Admin account created");
        },

        Commands::Admin(AdminCommands::Users(command)) => run_users(command, client).await?,
    }

    Ok(())
}

/// Log in when credentials were given
async fn sign_in(
    client: &ApiClient,
    credentials: &Credentials,
) -> anyhow::Result<Option<Principal>> {
    let Some((email, password)) = credentials.pair() else {
        return Ok(None);
    };
    let request = LoginRequest::new(email, password);
    let principal = if credentials.admin {
        client.admin_auth().login_admin(&request).await?
    } else {
        client.auth().login(&request).await?
    };
    debug!(user_id = %principal.id, admin = credentials.admin, "Signed in");
    Ok(Some(principal))
}

async fn run_projects(command: ProjectCommands, client: &ApiClient) -> anyhow::Result<()> {
    let projects = client.projects();
    match command {
        ProjectCommands::List => print_json(&projects.list_projects().await?)?,
        ProjectCommands::Show { id } => {
            print_json(&projects.get_project(ProjectId::new(id)).await?)?;
        },
        ProjectCommands::Create {
            title,
            story,
            duration,
        } => {
            let request = CreateProjectRequest {
                title,
                story_text: story,
                duration_sec: Some(duration),
            };
            print_json(&projects.create_project(&request).await?)?;
        },
        ProjectCommands::Segment { id } => {
            print_json(&projects.generate_segments(ProjectId::new(id)).await?)?;
        },
    }
    Ok(())
}

async fn run_users(command: UserCommands, client: &ApiClient) -> anyhow::Result<()> {
    let users = client.admin_users();
    match command {
        UserCommands::List {
            page,
            limit,
            search,
            role,
        } => {
            let mut query = UserListQuery::page(page, limit);
            if let Some(search) = search {
                query = query.with_search(search);
            }
            if let Some(role) = role {
                query = query.with_role(role);
            }
            let listing = users.list_users(&query).await?;
            let mut output = serde_json::to_value(&listing)?;
            output["total_pages"] = json!(listing.total_pages());
            print_json(&output)?;
        },
        UserCommands::Show { id } => print_json(&users.get_user(UserId::new(id)).await?)?,
        UserCommands::Create {
            name,
            account_email,
            account_password,
            role,
        } => {
            let request = CreateUserRequest {
                full_name: name,
                email: account_email,
                password: Password::new(account_password),
                role,
                confirm_password: None,
            };
            print_json(&users.create_user(&request).await?)?;
        },
        UserCommands::Update {
            id,
            name,
            account_email,
            account_password,
            role,
        } => {
            let request = UpdateUserRequest {
                full_name: name,
                email: account_email,
                password: account_password.map(Password::new),
                role,
                confirm_password: None,
            };
            print_json(&users.update_user(UserId::new(id), &request).await?)?;
        },
        UserCommands::SetRole { id, role } => {
            print_json(&users.update_user_role(UserId::new(id), role).await?)?;
        },
        UserCommands::ToggleRole { id } => {
            let user = users.get_user(UserId::new(id)).await?;
            print_json(&users.toggle_user_role(&user).await?)?;
        },
        UserCommands::SetPassword { id, new_password } => {
            let request = UpdatePasswordRequest {
                password: Password::new(new_password),
            };
            let message = users.update_user_password(UserId::new(id), &request).await?;
            print_message(message, "Password updated");
        },
        UserCommands::Delete { id } => {
            let message = users.delete_user(UserId::new(id)).await?;
            print_message(message, "User deleted");
        },
    }
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_message(message: Option<String>, fallback: &str) {
    println!("✅ {}", message.as_deref().unwrap_or(fallback));
}
