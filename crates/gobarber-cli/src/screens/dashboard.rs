use anyhow::Result;
use gobarber_core::{ApiClient, AuthContext};
use tracing::warn;

pub struct Dashboard<'a> {
    auth: AuthContext,
    api: &'a ApiClient,
}

impl<'a> Dashboard<'a> {
    pub fn new(auth: AuthContext, api: &'a ApiClient) -> Self {
        Self { auth, api }
    }

    pub async fn run(self, refresh: bool) -> Result<()> {
        let Some(mut user) = self.auth.user() else {
            println!("Not signed in. Run `gobarber sign-in` first.");
            return Ok(());
        };

        if refresh {
            match self.api.profile().await {
                Ok(profile) => user = profile,
                Err(e) => warn!(error = %e, "Profile refresh failed, showing stored user"),
            }
        }

        println!("Welcome, {}", user.name);
        if let Some(ref email) = user.email {
            println!("  {}", email);
        }
        if let Some(since) = user.created_at() {
            println!("  Member since {}", since.format("%Y-%m-%d"));
        }
        Ok(())
    }
}
