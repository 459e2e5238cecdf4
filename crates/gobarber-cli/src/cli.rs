use clap::{Parser, Subcommand};
use gobarber_core::StoreKind;

#[derive(Debug, Parser)]
#[command(name = "gobarber", version, about = "Book your next haircut from the terminal")]
pub struct Cli {
    /// Backend base URL (overrides config and GOBARBER_API_URL)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Where to keep the session: file, keyring or memory
    #[arg(long, global = true)]
    pub store: Option<StoreKind>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Sign in with email and password
    SignIn {
        #[arg(long)]
        email: Option<String>,
    },
    /// Create a new account
    SignUp {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
    },
    /// Show the signed-in user's dashboard
    Dashboard {
        /// Fetch the latest profile from the backend
        #[arg(long)]
        refresh: bool,
    },
    /// Sign out and forget the stored session
    SignOut,
    /// Show whether a session is active
    Status,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["gobarber", "sign-in", "--email", "a@b.com", "--store", "memory"])
            .unwrap();
        assert_eq!(cli.store, Some(StoreKind::Memory));
        match cli.command {
            Command::SignIn { email } => assert_eq!(email.as_deref(), Some("a@b.com")),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_sign_up_requires_name_and_email() {
        assert!(Cli::try_parse_from(["gobarber", "sign-up", "--name", "Ana"]).is_err());
    }
}
