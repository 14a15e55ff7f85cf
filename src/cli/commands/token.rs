use serde_json::json;
use uuid::Uuid;

use crate::auth::AuthKeys;
use crate::cli::utils::output_success;
use crate::cli::OutputFormat;
use crate::config::config;

pub fn handle(user: Uuid, email: Option<String>, hours: Option<u64>, output_format: OutputFormat) -> anyhow::Result<()> {
    let security = &config().security;
    if security.jwt_secret.is_empty() {
        anyhow::bail!("JWT_SECRET is not configured");
    }

    let keys = AuthKeys::from_config(security);
    let hours = hours.unwrap_or(security.jwt_expiry_hours);
    let token = keys.issue_with_expiry(user, email, hours)?;

    match output_format {
        OutputFormat::Json => output_success(
            &output_format,
            "Token issued",
            Some(json!({
                "token": token,
                "user_id": user,
                "audience": keys.audience(),
                "expires_in_hours": hours,
            })),
        ),
        // Bare token so it can be captured with $(gigboard token ...)
        OutputFormat::Text => {
            println!("{}", token);
            Ok(())
        }
    }
}
