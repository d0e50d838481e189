// CLI module for administrative operations requiring server access

pub mod account;

use std::sync::Arc;

use clap::{Parser, Subcommand};

use crate::app_data::AppData;
use crate::types::internal::auth::Role;

/// EstagioGO backend: API server and administrative commands
#[derive(Parser, Debug)]
#[command(name = "estagiogo")]
#[command(about = "EstagioGO internship program backend", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the API server (default)
    Serve {
        /// Address to bind, overrides HOST
        #[arg(long)]
        host: Option<String>,

        /// Port to bind, overrides PORT
        #[arg(long)]
        port: Option<u16>,
    },

    /// Apply pending database migrations and exit
    Migrate,

    /// Create an account with a chosen password
    CreateAccount {
        #[arg(long)]
        email: String,

        /// Display name
        #[arg(long)]
        name: String,

        /// Administrator, Coordinator, Supervisor or Intern
        #[arg(long)]
        role: Role,

        #[arg(long)]
        password: String,

        /// Skip the mandatory password change on first login
        #[arg(long)]
        first_access_completed: bool,
    },

    /// Issue a new temporary password and require a password change
    ResetPassword {
        #[arg(long)]
        email: String,
    },
}

/// Execute an administrative command
///
/// `Serve` and `Migrate` are handled by main before AppData exists.
pub async fn execute_command(command: Commands, app_data: Arc<AppData>) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Commands::CreateAccount {
            email,
            name,
            role,
            password,
            first_access_completed,
        } => {
            account::create_account(&app_data, &email, &name, role, &password, first_access_completed).await?;
        }
        Commands::ResetPassword { email } => {
            account::reset_password(app_data, &email).await?;
        }
        Commands::Serve { .. } | Commands::Migrate => {
            return Err("serve and migrate are not administrative commands".into());
        }
    }

    Ok(())
}
