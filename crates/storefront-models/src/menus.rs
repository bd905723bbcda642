//! Menu and product models, plus the DTOs for upserting and listing menus.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use storefront_core::serde::{deserialize_optional_i64, deserialize_optional_trimmed};
use storefront_core::{PaginationMeta, PaginationParams};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Menu {
    pub id: i64,
    pub store_id: i64,
    pub label: String,
    pub description: Option<String>,
    #[sqlx(skip)]
    pub products: Vec<Product>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Product {
    pub id: i64,
    pub menu_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub price_cents: i64,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Creates a menu when `id` is absent, otherwise updates it and replaces its
/// product list with `products`.
#[derive(Debug, Clone, PartialEq, Deserialize, Validate, ToSchema)]
pub struct UpsertMenuDto {
    pub id: Option<i64>,
    #[validate(length(min = 1, max = 100))]
    #[schema(example = "Drinks")]
    pub label: String,
    #[validate(length(max = 500))]
    pub description: Option<String>,
    #[serde(default)]
    #[validate(nested)]
    pub products: Vec<UpsertProductDto>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Validate, ToSchema)]
pub struct UpsertProductDto {
    pub id: Option<i64>,
    #[validate(length(min = 1, max = 255))]
    #[schema(example = "Lemon soda")]
    pub name: String,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
    #[validate(range(min = 0))]
    #[schema(example = 350)]
    pub price_cents: i64,
    #[validate(url)]
    pub image_url: Option<String>,
}

/// Query string of the paginated menu listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct MenuPageQuery {
    /// Page number (1-indexed, default: 1)
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub page: Option<i64>,
    /// Items per page (1-100, default: 10)
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub size: Option<i64>,
    /// Case-insensitive substring of the menu label
    #[serde(default, deserialize_with = "deserialize_optional_trimmed")]
    pub label: Option<String>,
}

impl MenuPageQuery {
    pub fn pagination(&self) -> PaginationParams {
        PaginationParams {
            page: self.page,
            size: self.size,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct PaginatedMenusResponse {
    pub data: Vec<Menu>,
    pub meta: PaginationMeta,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(name: &str, price_cents: i64) -> UpsertProductDto {
        UpsertProductDto {
            id: None,
            name: name.to_string(),
            description: None,
            price_cents,
            image_url: None,
        }
    }

    #[test]
    fn test_upsert_menu_dto_validation() {
        let valid = UpsertMenuDto {
            id: None,
            label: "Drinks".to_string(),
            description: None,
            products: vec![product("Soda", 250)],
        };
        assert!(valid.validate().is_ok());

        let empty_label = UpsertMenuDto {
            label: "".to_string(),
            ..valid.clone()
        };
        assert!(empty_label.validate().is_err());

        let negative_price = UpsertMenuDto {
            products: vec![product("Soda", -1)],
            ..valid
        };
        assert!(negative_price.validate().is_err());
    }

    #[test]
    fn test_upsert_menu_dto_products_default_to_empty() {
        let dto: UpsertMenuDto = serde_json::from_str(r#"{"label":"Desserts"}"#).unwrap();
        assert!(dto.products.is_empty());
        assert_eq!(dto.id, None);
    }

    #[test]
    fn test_invalid_image_url_rejected() {
        let mut item = product("Cake", 500);
        item.image_url = Some("not a url".to_string());
        assert!(item.validate().is_err());
    }

    #[test]
    fn test_menu_page_query_pagination() {
        let query = MenuPageQuery {
            page: Some(2),
            size: Some(500),
            label: None,
        };
        let pagination = query.pagination();
        assert_eq!(pagination.page(), 2);
        assert_eq!(pagination.size(), 100);
    }

    #[test]
    fn test_menu_page_query_blank_label_is_absent() {
        let query: MenuPageQuery =
            serde_json::from_str(r#"{"page":"1","size":"5","label":"   "}"#).unwrap();
        assert_eq!(query.label, None);
        assert_eq!(query.size, Some(5));
    }
}
