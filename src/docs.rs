use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use storefront_core::{ErrorResponse, PaginationMeta};
use storefront_models::auth::{
    AuthResponse, EmailAvailabilityResponse, EmailDto, LoginDto, MessageResponse,
    RegisterStoreUserDto,
};
use storefront_models::menus::{
    Menu, PaginatedMenusResponse, Product, UpsertMenuDto, UpsertProductDto,
};
use storefront_models::password_recovery::{ChangePasswordDto, RecoveryCodeValidResponse};
use storefront_models::store_users::StoreUser;
use storefront_models::stores::Store;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::router::health,
        crate::modules::auth::controller::register,
        crate::modules::auth::controller::login,
        crate::modules::auth::controller::me,
        crate::modules::auth::controller::resend_email_validation,
        crate::modules::auth::controller::resend_email_validation_by_email,
        crate::modules::auth::controller::check_email,
        crate::modules::auth::controller::logout,
        crate::modules::auth::controller::verify_email_validation,
        crate::modules::menus::controller::upsert_menu,
        crate::modules::menus::controller::get_menus,
        crate::modules::menus::controller::get_menus_paginated,
        crate::modules::menus::controller::get_menu_by_id,
        crate::modules::menus::controller::get_product_by_id,
        crate::modules::menus::controller::delete_menu,
        crate::modules::password_recovery::controller::request_password_recovery,
        crate::modules::password_recovery::controller::change_password,
        crate::modules::password_recovery::controller::validate_recovery_code,
        crate::modules::stores::controller::get_store,
        crate::modules::stores::controller::update_logo,
    ),
    components(
        schemas(
            Store,
            StoreUser,
            RegisterStoreUserDto,
            LoginDto,
            EmailDto,
            AuthResponse,
            EmailAvailabilityResponse,
            MessageResponse,
            Menu,
            Product,
            UpsertMenuDto,
            UpsertProductDto,
            PaginatedMenusResponse,
            PaginationMeta,
            ChangePasswordDto,
            RecoveryCodeValidResponse,
            ErrorResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Store user", description = "Registration, sign-in and email validation"),
        (name = "Menus", description = "Menus and products of the signed-in store"),
        (name = "Password recovery", description = "Recovery codes and password change"),
        (name = "Store", description = "Store profile and logo"),
        (name = "Health", description = "Liveness probe")
    ),
    info(
        title = "Storefront API",
        version = "0.1.0",
        description = "Multi-tenant storefront backend built with Rust, Axum, and PostgreSQL.",
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}
