use anyhow::Result;
use gobarber_core::{ApiClient, NewUser};
use tracing::error;

use super::{print_validation, read_password};

pub struct SignUp<'a> {
    api: &'a ApiClient,
}

impl<'a> SignUp<'a> {
    pub fn new(api: &'a ApiClient) -> Self {
        Self { api }
    }

    pub async fn run(self, name: String, email: String) -> Result<()> {
        let password = read_password("Choose a password: ")?;
        let form = NewUser {
            name: name.trim().to_string(),
            email: email.trim().to_string(),
            password,
        };

        if let Err(errors) = form.validate() {
            eprintln!("Please fix the following:");
            print_validation(&errors);
            return Err(errors.into());
        }

        match self.api.create_user(&form).await {
            Ok(user) => {
                println!("Account created for {}.", user.name);
                println!("You can now sign in with `gobarber sign-in --email {}`.", form.email);
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "Sign-up failed");
                eprintln!("Could not create your account, please try again. ({})", e);
                Err(e.into())
            }
        }
    }
}
