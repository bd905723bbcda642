//! Menu persistence. Every query is filtered by the caller's store id, so a
//! menu that belongs to another store is indistinguishable from a missing one.

use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};
use tracing::instrument;

use storefront_core::{AppError, PaginationMeta};
use storefront_models::menus::{
    Menu, MenuPageQuery, PaginatedMenusResponse, Product, UpsertMenuDto, UpsertProductDto,
};

const MENU_COLUMNS: &str = "id, store_id, label, description, created_at, updated_at";
const PRODUCT_COLUMNS: &str =
    "id, menu_id, name, description, price_cents, image_url, created_at, updated_at";

#[async_trait]
pub trait MenuRepository: Send + Sync {
    async fn upsert(&self, store_id: i64, dto: UpsertMenuDto) -> Result<Menu, AppError>;

    async fn find_many(&self, store_id: i64) -> Result<Vec<Menu>, AppError>;

    async fn find_many_paginated(
        &self,
        store_id: i64,
        query: MenuPageQuery,
    ) -> Result<PaginatedMenusResponse, AppError>;

    async fn find_by_id(&self, store_id: i64, id: i64) -> Result<Menu, AppError>;

    async fn find_product_by_id(
        &self,
        store_id: i64,
        menu_id: i64,
        id: i64,
    ) -> Result<Product, AppError>;

    async fn delete(&self, store_id: i64, id: i64) -> Result<(), AppError>;
}

/// Escapes `%`, `_` and `\` so user input matches literally inside `ILIKE`.
pub fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn map_label_conflict(e: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db_err) = &e
        && db_err.is_unique_violation()
    {
        return AppError::conflict("A menu with this label already exists");
    }
    AppError::from(e)
}

pub struct PgMenuRepository {
    db: PgPool,
}

impl PgMenuRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    async fn attach_products(&self, mut menus: Vec<Menu>) -> Result<Vec<Menu>, AppError> {
        if menus.is_empty() {
            return Ok(menus);
        }

        let menu_ids: Vec<i64> = menus.iter().map(|m| m.id).collect();
        let products = sqlx::query_as::<_, Product>(&format!(
            "SELECT {} FROM products WHERE menu_id = ANY($1) ORDER BY id",
            PRODUCT_COLUMNS
        ))
        .bind(&menu_ids)
        .fetch_all(&self.db)
        .await?;

        let mut by_menu: HashMap<i64, Vec<Product>> = HashMap::new();
        for product in products {
            by_menu.entry(product.menu_id).or_default().push(product);
        }
        for menu in &mut menus {
            menu.products = by_menu.remove(&menu.id).unwrap_or_default();
        }

        Ok(menus)
    }

    async fn save_menu(
        tx: &mut Transaction<'_, Postgres>,
        store_id: i64,
        dto: &UpsertMenuDto,
    ) -> Result<Menu, AppError> {
        let label = dto.label.trim();

        match dto.id {
            Some(id) => sqlx::query_as::<_, Menu>(&format!(
                "UPDATE menus SET label = $3, description = $4, updated_at = NOW()
                 WHERE id = $1 AND store_id = $2 RETURNING {}",
                MENU_COLUMNS
            ))
            .bind(id)
            .bind(store_id)
            .bind(label)
            .bind(&dto.description)
            .fetch_optional(&mut **tx)
            .await
            .map_err(map_label_conflict)?
            .ok_or_else(|| AppError::not_found("Menu not found")),
            None => sqlx::query_as::<_, Menu>(&format!(
                "INSERT INTO menus (store_id, label, description) VALUES ($1, $2, $3) RETURNING {}",
                MENU_COLUMNS
            ))
            .bind(store_id)
            .bind(label)
            .bind(&dto.description)
            .fetch_one(&mut **tx)
            .await
            .map_err(map_label_conflict),
        }
    }

    /// Replaces the product list of `menu_id` with `products`.
    async fn replace_products(
        tx: &mut Transaction<'_, Postgres>,
        menu_id: i64,
        products: &[UpsertProductDto],
    ) -> Result<Vec<Product>, AppError> {
        let keep_ids: Vec<i64> = products.iter().filter_map(|p| p.id).collect();

        sqlx::query("DELETE FROM products WHERE menu_id = $1 AND NOT (id = ANY($2))")
            .bind(menu_id)
            .bind(&keep_ids)
            .execute(&mut **tx)
            .await?;

        let mut saved = Vec::with_capacity(products.len());
        for product in products {
            let updated = match product.id {
                Some(id) => {
                    sqlx::query_as::<_, Product>(&format!(
                        "UPDATE products
                         SET name = $3, description = $4, price_cents = $5, image_url = $6,
                             updated_at = NOW()
                         WHERE id = $1 AND menu_id = $2 RETURNING {}",
                        PRODUCT_COLUMNS
                    ))
                    .bind(id)
                    .bind(menu_id)
                    .bind(product.name.trim())
                    .bind(&product.description)
                    .bind(product.price_cents)
                    .bind(&product.image_url)
                    .fetch_optional(&mut **tx)
                    .await?
                }
                None => None,
            };

            let row = match updated {
                Some(row) => row,
                None => {
                    sqlx::query_as::<_, Product>(&format!(
                        "INSERT INTO products (menu_id, name, description, price_cents, image_url)
                         VALUES ($1, $2, $3, $4, $5) RETURNING {}",
                        PRODUCT_COLUMNS
                    ))
                    .bind(menu_id)
                    .bind(product.name.trim())
                    .bind(&product.description)
                    .bind(product.price_cents)
                    .bind(&product.image_url)
                    .fetch_one(&mut **tx)
                    .await?
                }
            };
            saved.push(row);
        }

        Ok(saved)
    }
}

#[async_trait]
impl MenuRepository for PgMenuRepository {
    #[instrument(skip(self, dto), fields(menu_id = ?dto.id))]
    async fn upsert(&self, store_id: i64, dto: UpsertMenuDto) -> Result<Menu, AppError> {
        let mut tx = self.db.begin().await?;

        let mut menu = Self::save_menu(&mut tx, store_id, &dto).await?;
        menu.products = Self::replace_products(&mut tx, menu.id, &dto.products).await?;

        tx.commit().await?;
        Ok(menu)
    }

    #[instrument(skip(self))]
    async fn find_many(&self, store_id: i64) -> Result<Vec<Menu>, AppError> {
        let menus = sqlx::query_as::<_, Menu>(&format!(
            "SELECT {} FROM menus WHERE store_id = $1 ORDER BY created_at DESC, id DESC",
            MENU_COLUMNS
        ))
        .bind(store_id)
        .fetch_all(&self.db)
        .await?;

        self.attach_products(menus).await
    }

    #[instrument(skip(self))]
    async fn find_many_paginated(
        &self,
        store_id: i64,
        query: MenuPageQuery,
    ) -> Result<PaginatedMenusResponse, AppError> {
        let pagination = query.pagination();
        let page = pagination.page();
        let size = pagination.size();
        let label = query.label.as_deref().map(escape_like);

        let total: i64 = sqlx::query_scalar(
            r#"SELECT COUNT(*) FROM menus
               WHERE store_id = $1 AND ($2::text IS NULL OR label ILIKE '%' || $2 || '%')"#,
        )
        .bind(store_id)
        .bind(&label)
        .fetch_one(&self.db)
        .await?;

        let menus = sqlx::query_as::<_, Menu>(&format!(
            "SELECT {} FROM menus
             WHERE store_id = $1 AND ($2::text IS NULL OR label ILIKE '%' || $2 || '%')
             ORDER BY created_at DESC, id DESC
             LIMIT $3 OFFSET $4",
            MENU_COLUMNS
        ))
        .bind(store_id)
        .bind(&label)
        .bind(size)
        .bind(pagination.offset())
        .fetch_all(&self.db)
        .await?;

        Ok(PaginatedMenusResponse {
            data: self.attach_products(menus).await?,
            meta: PaginationMeta::new(total, page, size),
        })
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, store_id: i64, id: i64) -> Result<Menu, AppError> {
        let menu = sqlx::query_as::<_, Menu>(&format!(
            "SELECT {} FROM menus WHERE id = $1 AND store_id = $2",
            MENU_COLUMNS
        ))
        .bind(id)
        .bind(store_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::not_found("Menu not found"))?;

        let mut menus = self.attach_products(vec![menu]).await?;
        menus
            .pop()
            .ok_or_else(|| AppError::internal_error("Menu vanished while loading products"))
    }

    #[instrument(skip(self))]
    async fn find_product_by_id(
        &self,
        store_id: i64,
        menu_id: i64,
        id: i64,
    ) -> Result<Product, AppError> {
        sqlx::query_as::<_, Product>(
            r#"SELECT p.id, p.menu_id, p.name, p.description, p.price_cents, p.image_url,
                      p.created_at, p.updated_at
               FROM products p
               JOIN menus m ON m.id = p.menu_id
               WHERE p.id = $1 AND p.menu_id = $2 AND m.store_id = $3"#,
        )
        .bind(id)
        .bind(menu_id)
        .bind(store_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::not_found("Product not found"))
    }

    #[instrument(skip(self))]
    async fn delete(&self, store_id: i64, id: i64) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM menus WHERE id = $1 AND store_id = $2")
            .bind(id)
            .bind(store_id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("Menu not found"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("soda"), "soda");
        assert_eq!(escape_like("100%"), "100\\%");
        assert_eq!(escape_like("a_b\\c"), "a\\_b\\\\c");
    }
}
