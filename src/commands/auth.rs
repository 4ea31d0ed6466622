use anyhow::Result;
use log::info;
use std::io::Write;

use super::write_json;
use crate::services::AuthApi;

#[tracing::instrument(skip(auth, password, out))]
pub async fn login<A: AuthApi, W: Write>(
    auth: &A,
    email: &str,
    password: &str,
    out: &mut W,
) -> Result<()> {
    let login = auth.login(email, password).await?;
    info!("Logged in as {}", email);
    write_json(out, &login)
}

#[tracing::instrument(skip(auth, password, out))]
pub async fn signup<A: AuthApi, W: Write>(
    auth: &A,
    full_name: &str,
    email: &str,
    password: &str,
    out: &mut W,
) -> Result<()> {
    let registered = auth.sign_up(full_name, email, password).await?;
    info!("Registered {}", email);
    write_json(out, &registered)
}

#[tracing::instrument(skip(auth, out))]
pub async fn logout<A: AuthApi, W: Write>(auth: &A, out: &mut W) -> Result<()> {
    let response = auth.logout().await?;
    write_json(out, &response)
}

#[tracing::instrument(skip(auth, refresh_token, out))]
pub async fn refresh<A: AuthApi, W: Write>(
    auth: &A,
    refresh_token: &str,
    out: &mut W,
) -> Result<()> {
    let response = auth.refresh_token(refresh_token).await?;
    write_json(out, &response)
}
