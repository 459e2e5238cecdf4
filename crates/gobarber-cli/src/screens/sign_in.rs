use anyhow::Result;
use gobarber_core::{AuthContext, AuthError, Config, Credentials};
use tracing::{error, warn};

use super::{print_validation, prompt_line, read_password};

pub struct SignIn<'a> {
    auth: AuthContext,
    config: &'a mut Config,
}

impl<'a> SignIn<'a> {
    pub fn new(auth: AuthContext, config: &'a mut Config) -> Self {
        Self { auth, config }
    }

    pub async fn run(self, email: Option<String>) -> Result<()> {
        let email = match email.or_else(|| self.config.last_email.clone()) {
            Some(email) => email,
            None => prompt_line("Email: ")?,
        };
        let password = read_password("Password: ")?;

        let credentials = Credentials::new(email.trim(), password);
        if let Err(errors) = credentials.validate() {
            eprintln!("Please fix the following:");
            print_validation(&errors);
            return Err(errors.into());
        }

        match self.auth.sign_in(&credentials).await {
            Ok(session) => {
                self.config.last_email = Some(credentials.identifier.clone());
                if let Err(e) = self.config.save() {
                    warn!(error = %e, "Failed to save config");
                }
                println!("Welcome back, {}!", session.user.first_name());
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "Sign-in failed");
                eprintln!("Authentication error: {}", user_message(&e));
                Err(e.into())
            }
        }
    }
}

/// User-facing text for a failed sign-in
fn user_message(err: &AuthError) -> String {
    if err.is_invalid_credentials() {
        "Invalid email or password.".to_string()
    } else if err.is_network() {
        "Unable to reach the server. Check your internet connection.".to_string()
    } else if let AuthError::StorageWrite(_) = err {
        "Signed in, but the session could not be saved on this device.".to_string()
    } else {
        format!("Could not sign in: {}", err)
    }
}
