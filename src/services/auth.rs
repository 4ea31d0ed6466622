use async_trait::async_trait;
use log::debug;
use serde::Serialize;
use serde_json::Value;

use crate::api::{ApiClient, ApiResult};
use crate::models::{LoginResponse, RegisterResponse};

const LOGIN: &str = "/auth/login";
const REGISTER: &str = "/auth/register";
const LOGOUT: &str = "/auth/logout";
const REFRESH_TOKEN: &str = "/auth/refresh-token";

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthApi: Send + Sync {
    async fn login(&self, email: &str, password: &str) -> ApiResult<LoginResponse>;
    async fn sign_up(
        &self,
        full_name: &str,
        email: &str,
        password: &str,
    ) -> ApiResult<RegisterResponse>;
    async fn logout(&self) -> ApiResult<Value>;
    async fn refresh_token(&self, refresh_token: &str) -> ApiResult<Value>;
}

#[derive(Serialize)]
struct Credentials<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct Registration<'a> {
    full_name: &'a str,
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct RefreshRequest<'a> {
    #[serde(rename = "refreshToken")]
    refresh_token: &'a str,
}

#[derive(Clone)]
pub struct AuthService {
    client: ApiClient,
}

impl AuthService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl AuthApi for AuthService {
    #[tracing::instrument(skip(self, password))]
    async fn login(&self, email: &str, password: &str) -> ApiResult<LoginResponse> {
        debug!("Logging in as {}...", email);
        self.client
            .post(LOGIN, &Credentials { email, password })
            .await
    }

    #[tracing::instrument(skip(self, password))]
    async fn sign_up(
        &self,
        full_name: &str,
        email: &str,
        password: &str,
    ) -> ApiResult<RegisterResponse> {
        debug!("Registering {}...", email);
        self.client
            .post(
                REGISTER,
                &Registration {
                    full_name,
                    email,
                    password,
                },
            )
            .await
    }

    #[tracing::instrument(skip(self))]
    async fn logout(&self) -> ApiResult<Value> {
        self.client.post_empty(LOGOUT).await
    }

    #[tracing::instrument(skip(self, refresh_token))]
    async fn refresh_token(&self, refresh_token: &str) -> ApiResult<Value> {
        self.client
            .post(REFRESH_TOKEN, &RefreshRequest { refresh_token })
            .await
    }
}
