#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{HeaderMap, Request, StatusCode};
use chrono::{Duration, Utc};
use http_body_util::BodyExt;
use tower::ServiceExt;

use storefront::modules::auth::AuthStoreUserRepository;
use storefront::modules::menus::MenuRepository;
use storefront::modules::password_recovery::PasswordRecoveryRepository;
use storefront::modules::stores::StoreRepository;
use storefront::router::init_router;
use storefront::state::AppState;
use storefront_auth::create_access_token;
use storefront_config::{CorsConfig, JwtConfig, ServerConfig, StorageConfig};
use storefront_core::{AppError, PaginationMeta};
use storefront_models::auth::{AuthResponse, LoginDto, RegisterStoreUserDto};
use storefront_models::menus::{
    Menu, MenuPageQuery, PaginatedMenusResponse, Product, UpsertMenuDto,
};
use storefront_models::password_recovery::RecoveryCodeValidResponse;
use storefront_models::store_users::StoreUser;
use storefront_models::stores::Store;

pub const STORE_ID: i64 = 42;
pub const USER_ID: i64 = 1;
pub const MAX_LOGO_BYTES: usize = 64;

/// What the next repository call answers with.
#[derive(Debug, Clone, Copy, Default)]
pub enum Outcome {
    #[default]
    Ok,
    Domain(StatusCode, &'static str),
    Fault,
}

impl Outcome {
    fn check(self) -> Result<(), AppError> {
        match self {
            Outcome::Ok => Ok(()),
            Outcome::Domain(status, message) => Err(AppError::new(status, anyhow::anyhow!(message))),
            Outcome::Fault => Err(std::io::Error::other("connection reset by db:5432").into()),
        }
    }
}

pub fn jwt_config() -> JwtConfig {
    JwtConfig {
        secret: "test_secret_key_for_testing_purposes".to_string(),
        access_token_expiry: 3600,
    }
}

pub fn token_for(store_id: i64, user_id: i64) -> String {
    create_access_token(user_id, "owner@corner.bakery", store_id, &jwt_config()).unwrap()
}

pub fn store_user(store_id: i64, id: i64) -> StoreUser {
    StoreUser {
        id,
        store_id,
        name: "Ada Baker".to_string(),
        email: "owner@corner.bakery".to_string(),
        email_verified_at: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

pub fn product(menu_id: i64, id: i64) -> Product {
    Product {
        id,
        menu_id,
        name: "Lemon soda".to_string(),
        description: None,
        price_cents: 350,
        image_url: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

pub fn menu(store_id: i64, id: i64) -> Menu {
    Menu {
        id,
        store_id,
        label: "Drinks".to_string(),
        description: Some("Cold drinks".to_string()),
        products: vec![product(id, 1)],
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

pub fn store(store_id: i64) -> Store {
    Store {
        id: store_id,
        name: "Corner Bakery".to_string(),
        slug: "corner-bakery".to_string(),
        logo_key: None,
        logo_url: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum MenuCall {
    Upsert(i64, UpsertMenuDto),
    FindMany(i64),
    FindManyPaginated(i64, MenuPageQuery),
    FindById(i64, i64),
    FindProductById(i64, i64, i64),
    Delete(i64, i64),
}

#[derive(Default)]
pub struct FakeMenus {
    pub calls: Mutex<Vec<MenuCall>>,
    pub outcome: Mutex<Outcome>,
    /// Delay applied to `find_many` before it answers.
    pub delay: Mutex<Option<std::time::Duration>>,
}

impl FakeMenus {
    fn record(&self, call: MenuCall) -> Result<(), AppError> {
        self.calls.lock().unwrap().push(call);
        self.outcome.lock().unwrap().check()
    }
}

#[async_trait]
impl MenuRepository for FakeMenus {
    async fn upsert(&self, store_id: i64, dto: UpsertMenuDto) -> Result<Menu, AppError> {
        let id = dto.id.unwrap_or(7);
        let label = dto.label.clone();
        self.record(MenuCall::Upsert(store_id, dto))?;
        Ok(Menu {
            label,
            ..menu(store_id, id)
        })
    }

    async fn find_many(&self, store_id: i64) -> Result<Vec<Menu>, AppError> {
        let delay = *self.delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.record(MenuCall::FindMany(store_id))?;
        Ok(vec![menu(store_id, 7), menu(store_id, 8)])
    }

    async fn find_many_paginated(
        &self,
        store_id: i64,
        query: MenuPageQuery,
    ) -> Result<PaginatedMenusResponse, AppError> {
        let pagination = query.pagination();
        self.record(MenuCall::FindManyPaginated(store_id, query))?;
        Ok(PaginatedMenusResponse {
            data: vec![menu(store_id, 7)],
            meta: PaginationMeta::new(11, pagination.page(), pagination.size()),
        })
    }

    async fn find_by_id(&self, store_id: i64, id: i64) -> Result<Menu, AppError> {
        self.record(MenuCall::FindById(store_id, id))?;
        Ok(menu(store_id, id))
    }

    async fn find_product_by_id(
        &self,
        store_id: i64,
        menu_id: i64,
        id: i64,
    ) -> Result<Product, AppError> {
        self.record(MenuCall::FindProductById(store_id, menu_id, id))?;
        Ok(product(menu_id, id))
    }

    async fn delete(&self, store_id: i64, id: i64) -> Result<(), AppError> {
        self.record(MenuCall::Delete(store_id, id))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AuthCall {
    SignUp(String),
    SignIn(String),
    Me(i64, i64),
    ResendEmailValidation(i64, i64),
    ResendEmailValidationByEmail(String),
    IsValidEmail(String),
    VerifyToken(String),
}

#[derive(Default)]
pub struct FakeAuth {
    pub calls: Mutex<Vec<AuthCall>>,
    pub outcome: Mutex<Outcome>,
    pub email_available: bool,
}

impl FakeAuth {
    fn record(&self, call: AuthCall) -> Result<(), AppError> {
        self.calls.lock().unwrap().push(call);
        self.outcome.lock().unwrap().check()
    }

    fn auth_response() -> AuthResponse {
        AuthResponse {
            access_token: token_for(STORE_ID, USER_ID),
            user: store_user(STORE_ID, USER_ID),
        }
    }
}

#[async_trait]
impl AuthStoreUserRepository for FakeAuth {
    async fn sign_up_with_email_and_password(
        &self,
        dto: RegisterStoreUserDto,
    ) -> Result<AuthResponse, AppError> {
        self.record(AuthCall::SignUp(dto.email))?;
        Ok(Self::auth_response())
    }

    async fn sign_in_with_email_and_password(
        &self,
        dto: LoginDto,
    ) -> Result<AuthResponse, AppError> {
        self.record(AuthCall::SignIn(dto.email))?;
        Ok(Self::auth_response())
    }

    async fn me(&self, store_id: i64, user_id: i64) -> Result<StoreUser, AppError> {
        self.record(AuthCall::Me(store_id, user_id))?;
        Ok(store_user(store_id, user_id))
    }

    async fn resend_email_validation(&self, store_id: i64, user_id: i64) -> Result<(), AppError> {
        self.record(AuthCall::ResendEmailValidation(store_id, user_id))
    }

    async fn resend_email_validation_by_email(&self, email: &str) -> Result<(), AppError> {
        self.record(AuthCall::ResendEmailValidationByEmail(email.to_string()))
    }

    async fn is_valid_email(&self, email: &str) -> Result<bool, AppError> {
        self.record(AuthCall::IsValidEmail(email.to_string()))?;
        Ok(self.email_available)
    }

    async fn verify_email_validation_integrity_by_token(
        &self,
        token: &str,
    ) -> Result<(), AppError> {
        self.record(AuthCall::VerifyToken(token.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RecoveryCall {
    Generate(String),
    ChangePassword(String, String),
    Validate(String),
}

#[derive(Default)]
pub struct FakePasswordRecovery {
    pub calls: Mutex<Vec<RecoveryCall>>,
    pub outcome: Mutex<Outcome>,
}

impl FakePasswordRecovery {
    fn record(&self, call: RecoveryCall) -> Result<(), AppError> {
        self.calls.lock().unwrap().push(call);
        self.outcome.lock().unwrap().check()
    }
}

#[async_trait]
impl PasswordRecoveryRepository for FakePasswordRecovery {
    async fn generate(&self, email: &str) -> Result<(), AppError> {
        self.record(RecoveryCall::Generate(email.to_string()))
    }

    async fn change_password(&self, code: &str, password: &str) -> Result<(), AppError> {
        self.record(RecoveryCall::ChangePassword(
            code.to_string(),
            password.to_string(),
        ))
    }

    async fn validate(&self, code: &str) -> Result<RecoveryCodeValidResponse, AppError> {
        self.record(RecoveryCall::Validate(code.to_string()))?;
        Ok(RecoveryCodeValidResponse {
            valid: true,
            expires_at: Utc::now() + Duration::minutes(30),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum StoreCall {
    FindById(i64),
    UpdateLogo(i64, String, Vec<u8>),
}

#[derive(Default)]
pub struct FakeStores {
    pub calls: Mutex<Vec<StoreCall>>,
    pub outcome: Mutex<Outcome>,
}

impl FakeStores {
    fn record(&self, call: StoreCall) -> Result<(), AppError> {
        self.calls.lock().unwrap().push(call);
        self.outcome.lock().unwrap().check()
    }
}

#[async_trait]
impl StoreRepository for FakeStores {
    async fn create(&self, _: &str) -> Result<Store, AppError> {
        unimplemented!("stores are created by the auth service")
    }

    async fn find_by_id(&self, store_id: i64) -> Result<Store, AppError> {
        self.record(StoreCall::FindById(store_id))?;
        Ok(store(store_id))
    }

    async fn update_logo(
        &self,
        store_id: i64,
        content_type: &str,
        content: &[u8],
    ) -> Result<Store, AppError> {
        self.record(StoreCall::UpdateLogo(
            store_id,
            content_type.to_string(),
            content.to_vec(),
        ))?;
        Ok(Store {
            logo_url: Some(format!("http://localhost:3000/files/stores/{}/logo.png", store_id)),
            ..store(store_id)
        })
    }

    async fn delete(&self, _: i64) -> Result<(), AppError> {
        unimplemented!("stores are deleted by the auth service")
    }
}

pub struct TestApp {
    pub menus: Arc<FakeMenus>,
    pub auth: Arc<FakeAuth>,
    pub recovery: Arc<FakePasswordRecovery>,
    pub stores: Arc<FakeStores>,
    pub state: AppState,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_auth(FakeAuth::default())
    }

    pub fn with_auth(auth: FakeAuth) -> Self {
        let menus = Arc::new(FakeMenus::default());
        let auth = Arc::new(auth);
        let recovery = Arc::new(FakePasswordRecovery::default());
        let stores = Arc::new(FakeStores::default());

        let state = AppState {
            jwt_config: jwt_config(),
            cors_config: CorsConfig::from_list("http://localhost:5173"),
            server_config: ServerConfig::default(),
            storage_config: StorageConfig {
                max_bytes: MAX_LOGO_BYTES,
                ..StorageConfig::default()
            },
            menus: menus.clone(),
            auth: auth.clone(),
            password_recovery: recovery.clone(),
            stores: stores.clone(),
            metrics: None,
        };

        Self {
            menus,
            auth,
            recovery,
            stores,
            state,
        }
    }

    pub fn router(&self) -> Router {
        init_router(self.state.clone())
    }

    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.router().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .into_body()
            .collect()
            .await
            .unwrap()
            .to_bytes()
            .to_vec();

        TestResponse {
            status,
            headers,
            body,
        }
    }
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl TestResponse {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).unwrap()
    }

    pub fn set_cookies(&self) -> Vec<String> {
        self.headers
            .get_all("set-cookie")
            .iter()
            .map(|v| v.to_str().unwrap().to_string())
            .collect()
    }
}

pub fn get(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }
    builder.body(Body::empty()).unwrap()
}

pub fn delete(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("DELETE").uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }
    builder.body(Body::empty()).unwrap()
}

pub fn post_json(uri: &str, token: Option<&str>, body: serde_json::Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }
    builder
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}
