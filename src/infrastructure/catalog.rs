use bigdecimal::BigDecimal;
use diesel::prelude::*;
use uuid::Uuid;

use crate::db::DbPool;
use crate::domain::errors::DomainError;
use crate::domain::ports::Catalog;
use crate::schema::{categories, customization_options, customization_values, menu_items};

use super::models::{
    CategoryRow, CustomizationOptionRow, CustomizationValueRow, MenuItemRow,
};

/// Read-only diesel view of the menu catalog. Order creation uses
/// `unit_price`; the browse methods back the public menu endpoints.
#[derive(Clone)]
pub struct DieselCatalog {
    pool: DbPool,
}

/// A customization option together with its selectable values.
#[derive(Debug, Clone)]
pub struct OptionWithValues {
    pub option: CustomizationOptionRow,
    pub values: Vec<CustomizationValueRow>,
}

impl DieselCatalog {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn categories(&self) -> Result<Vec<CategoryRow>, DomainError> {
        let mut conn = self.pool.get()?;
        Ok(categories::table
            .order(categories::position.asc())
            .select(CategoryRow::as_select())
            .load(&mut conn)?)
    }

    /// Orderable items of one category.
    pub fn items_in_category(&self, category_id: Uuid) -> Result<Vec<MenuItemRow>, DomainError> {
        let mut conn = self.pool.get()?;
        Ok(menu_items::table
            .filter(menu_items::category_id.eq(category_id))
            .filter(menu_items::is_available.eq(true))
            .order(menu_items::name.asc())
            .select(MenuItemRow::as_select())
            .load(&mut conn)?)
    }

    /// One menu item with its customization options and their values, or
    /// `None` if the item does not exist.
    pub fn item_details(
        &self,
        menu_item_id: Uuid,
    ) -> Result<Option<(MenuItemRow, Vec<OptionWithValues>)>, DomainError> {
        let mut conn = self.pool.get()?;

        let item = menu_items::table
            .filter(menu_items::id.eq(menu_item_id))
            .select(MenuItemRow::as_select())
            .first(&mut conn)
            .optional()?;
        let Some(item) = item else {
            return Ok(None);
        };

        let options = customization_options::table
            .filter(customization_options::menu_item_id.eq(item.id))
            .order(customization_options::name.asc())
            .select(CustomizationOptionRow::as_select())
            .load(&mut conn)?;

        let mut detailed = Vec::with_capacity(options.len());
        for option in options {
            let values = customization_values::table
                .filter(customization_values::option_id.eq(option.id))
                .order(customization_values::value.asc())
                .select(CustomizationValueRow::as_select())
                .load(&mut conn)?;
            detailed.push(OptionWithValues { option, values });
        }

        Ok(Some((item, detailed)))
    }
}

impl Catalog for DieselCatalog {
    fn unit_price(&self, menu_item_id: Uuid) -> Result<Option<BigDecimal>, DomainError> {
        let mut conn = self.pool.get()?;
        Ok(menu_items::table
            .filter(menu_items::id.eq(menu_item_id))
            .filter(menu_items::is_available.eq(true))
            .select(menu_items::price)
            .first(&mut conn)
            .optional()?)
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use bigdecimal::BigDecimal;
    use uuid::Uuid;

    use super::DieselCatalog;
    use crate::domain::ports::Catalog;
    use crate::infrastructure::test_support::{seed_category, seed_menu_item, setup_db};

    #[tokio::test]
    async fn unit_price_resolves_only_available_items() {
        let (_container, pool) = setup_db().await;
        let catalog = DieselCatalog::new(pool.clone());
        let category = seed_category(&pool, "Mains");
        let burger = seed_menu_item(&pool, category, "Burger", "40.00", true);
        let retired = seed_menu_item(&pool, category, "Old Special", "12.00", false);

        assert_eq!(
            catalog.unit_price(burger).expect("lookup failed"),
            Some(BigDecimal::from_str("40.00").unwrap())
        );
        assert_eq!(catalog.unit_price(retired).expect("lookup failed"), None);
        assert_eq!(catalog.unit_price(Uuid::new_v4()).expect("lookup failed"), None);
    }

    #[tokio::test]
    async fn browse_hides_unavailable_items() {
        let (_container, pool) = setup_db().await;
        let catalog = DieselCatalog::new(pool.clone());
        let category = seed_category(&pool, "Mains");
        seed_menu_item(&pool, category, "Burger", "40.00", true);
        seed_menu_item(&pool, category, "Old Special", "12.00", false);

        let items = catalog.items_in_category(category).expect("browse failed");
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name, "Burger");

        let listed = catalog.categories().expect("categories failed");
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].name, "Mains");
    }

    #[tokio::test]
    async fn item_details_returns_none_for_unknown_item() {
        let (_container, pool) = setup_db().await;
        let catalog = DieselCatalog::new(pool);

        assert!(catalog
            .item_details(Uuid::new_v4())
            .expect("lookup failed")
            .is_none());
    }
}
