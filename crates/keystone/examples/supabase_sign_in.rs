use keystone::{
    KeystoneClient,
    supabase::{SupabaseClientBuilder, api_v1::PasswordCredentials},
};

/// # Sign in and print the envelope
///
/// Builds the Supabase backend from the environment, attempts a password
/// sign-in and prints the resulting envelope as JSON.  Wrong credentials show
/// up as `"Invalid email or password"` instead of the raw backend wording.
///
/// ## How to run
///
/// ```bash
/// export SUPABASE_URL=https://<project>.supabase.co
/// export SUPABASE_ANON_KEY=eyJ…
/// cargo run -p keystone --example supabase_sign_in -- ada@example.com hunter2
/// ```
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let mut args = std::env::args().skip(1);
    let (Some(email), Some(password)) = (args.next(), args.next()) else {
        anyhow::bail!("usage: supabase_sign_in <email> <password>");
    };

    // 1. Configuration errors abort here, before anything else runs.
    let backend = SupabaseClientBuilder::new_from_env().build()?;

    // 2. Share one handle; clones point at the same backend.
    let client = KeystoneClient::new(backend);

    // 3. Call through the handle and get an envelope back, never an error.
    let credentials = PasswordCredentials::new(email, password);
    let envelope = client
        .call(|backend| backend.sign_in_with_password(&credentials))
        .await
        .map(|session| session.user);

    println!("{}", serde_json::to_string_pretty(&envelope)?);

    Ok(())
}
