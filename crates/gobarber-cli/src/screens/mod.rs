//! Terminal screens. Each one is built from the handles it needs, so a
//! screen that reads session state cannot exist without an `AuthContext`.

mod dashboard;
mod sign_in;
mod sign_up;

use std::io::{self, BufRead, Write};

use anyhow::Result;
use gobarber_core::{AuthContext, AuthState, ValidationErrors};

pub use dashboard::Dashboard;
pub use sign_in::SignIn;
pub use sign_up::SignUp;

/// Environment variable consulted before prompting for a password
const PASSWORD_ENV: &str = "GOBARBER_PASSWORD";

/// Prompt for one line on stdin, trimmed
fn prompt_line(label: &str) -> Result<String> {
    print!("{}", label);
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

/// Password from `GOBARBER_PASSWORD`, or a hidden prompt
fn read_password(label: &str) -> Result<String> {
    if let Ok(password) = std::env::var(PASSWORD_ENV) {
        return Ok(password);
    }
    Ok(rpassword::prompt_password(label)?)
}

fn print_validation(errors: &ValidationErrors) {
    for error in errors.iter() {
        eprintln!("  {}: {}", error.field, error.message);
    }
}

pub async fn sign_out(auth: AuthContext) -> Result<()> {
    let was_signed_in = auth.state().is_authenticated();
    auth.sign_out().await?;
    if was_signed_in {
        println!("Signed out.");
    } else {
        println!("Not signed in.");
    }
    Ok(())
}

pub fn status(auth: &AuthContext) {
    match auth.state() {
        AuthState::Loading => println!("Restoring session..."),
        AuthState::Anonymous => println!("Not signed in."),
        AuthState::Authenticated(session) => match session.user.email {
            Some(ref email) => println!("Signed in as {} <{}>", session.user.name, email),
            None => println!("Signed in as {}", session.user.name),
        },
    }
}
