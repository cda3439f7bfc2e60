//! Pricing-row storage: cargo_pricing rows plus their price_fields entries.

use super::{parse_decimal, Repository};
use crate::domain::{
    CargoMethod, CargoPricing, CargoTypeId, LocationId, PriceField, PricingId, PricingMode,
    SupplierId,
};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use tracing::warn;

fn locations_to_json(locations: &[LocationId]) -> String {
    let ids: Vec<i64> = locations.iter().map(|l| l.as_i64()).collect();
    serde_json::to_string(&ids).unwrap_or_else(|_| "[]".to_string())
}

fn locations_from_json(field: &str, json: &str) -> Vec<LocationId> {
    serde_json::from_str::<Vec<i64>>(json)
        .unwrap_or_else(|e| {
            warn!(field = field, value = json, error = %e, "Failed to parse location set, using empty");
            Vec::new()
        })
        .into_iter()
        .map(LocationId::new)
        .collect()
}

fn price_field_from_row(row: &SqliteRow) -> PriceField {
    let mode: String = row.get("pricing_mode");
    let price: String = row.get("price");
    let commission_rate: String = row.get("commission_rate");

    PriceField {
        cargo_type: CargoTypeId::new(row.get("cargo_type_id")),
        pricing_mode: PricingMode::parse(&mode).unwrap_or_else(|| {
            warn!(value = %mode, "Unknown pricing mode in store, defaulting to per_weight");
            PricingMode::PerWeight
        }),
        price: parse_decimal("price", &price),
        commission_rate: parse_decimal("commission_rate", &commission_rate),
        courier_pickup: row.get::<i64, _>("courier_pickup") != 0,
    }
}

impl Repository {
    /// Insert a pricing row and its price fields in one transaction.
    pub async fn insert_pricing(&self, pricing: &CargoPricing) -> Result<PricingId, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            INSERT INTO cargo_pricing (supplier_id, cargo_method, source_locations, destination_locations)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(pricing.supplier_id.as_i64())
        .bind(pricing.cargo_method.as_str())
        .bind(locations_to_json(&pricing.source_locations))
        .bind(locations_to_json(&pricing.destination_locations))
        .execute(&mut *tx)
        .await?;

        let pricing_id = result.last_insert_rowid();

        for field in &pricing.price_fields {
            sqlx::query(
                r#"
                INSERT INTO price_fields
                (pricing_id, cargo_type_id, pricing_mode, price, commission_rate, courier_pickup)
                VALUES (?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(pricing_id)
            .bind(field.cargo_type.as_i64())
            .bind(field.pricing_mode.as_str())
            .bind(field.price.to_canonical_string())
            .bind(field.commission_rate.to_canonical_string())
            .bind(field.courier_pickup as i64)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(PricingId::new(pricing_id))
    }

    /// Replace a pricing row's route sets and price fields in one transaction.
    pub async fn update_pricing(&self, pricing: &CargoPricing) -> Result<(), sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            UPDATE cargo_pricing
            SET cargo_method = ?, source_locations = ?, destination_locations = ?
            WHERE id = ?
            "#,
        )
        .bind(pricing.cargo_method.as_str())
        .bind(locations_to_json(&pricing.source_locations))
        .bind(locations_to_json(&pricing.destination_locations))
        .bind(pricing.id.as_i64())
        .execute(&mut *tx)
        .await?;

        sqlx::query("DELETE FROM price_fields WHERE pricing_id = ?")
            .bind(pricing.id.as_i64())
            .execute(&mut *tx)
            .await?;

        for field in &pricing.price_fields {
            sqlx::query(
                r#"
                INSERT INTO price_fields
                (pricing_id, cargo_type_id, pricing_mode, price, commission_rate, courier_pickup)
                VALUES (?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(pricing.id.as_i64())
            .bind(field.cargo_type.as_i64())
            .bind(field.pricing_mode.as_str())
            .bind(field.price.to_canonical_string())
            .bind(field.commission_rate.to_canonical_string())
            .bind(field.courier_pickup as i64)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    pub async fn get_pricing(&self, id: PricingId) -> Result<Option<CargoPricing>, sqlx::Error> {
        let row = sqlx::query("SELECT * FROM cargo_pricing WHERE id = ?")
            .bind(id.as_i64())
            .fetch_optional(&self.pool)
            .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        Ok(Some(self.pricing_from_row(&row).await?))
    }

    /// All pricing rows for a supplier, price fields included.
    pub async fn list_pricing_for_supplier(
        &self,
        supplier_id: SupplierId,
    ) -> Result<Vec<CargoPricing>, sqlx::Error> {
        let rows = sqlx::query("SELECT * FROM cargo_pricing WHERE supplier_id = ? ORDER BY id ASC")
            .bind(supplier_id.as_i64())
            .fetch_all(&self.pool)
            .await?;

        let mut pricings = Vec::with_capacity(rows.len());
        for row in &rows {
            pricings.push(self.pricing_from_row(row).await?);
        }
        Ok(pricings)
    }

    /// Resolve the unique pricing row covering (supplier, method, route).
    pub async fn find_pricing_for_route(
        &self,
        supplier_id: SupplierId,
        method: CargoMethod,
        source: LocationId,
        destination: LocationId,
    ) -> Result<Option<CargoPricing>, sqlx::Error> {
        let rows = sqlx::query(
            "SELECT * FROM cargo_pricing WHERE supplier_id = ? AND cargo_method = ? ORDER BY id ASC",
        )
        .bind(supplier_id.as_i64())
        .bind(method.as_str())
        .fetch_all(&self.pool)
        .await?;

        for row in &rows {
            let pricing = self.pricing_from_row(row).await?;
            if pricing.covers_route(source, destination) {
                return Ok(Some(pricing));
            }
        }
        Ok(None)
    }

    async fn pricing_from_row(&self, row: &SqliteRow) -> Result<CargoPricing, sqlx::Error> {
        let id: i64 = row.get("id");
        let method: String = row.get("cargo_method");
        let sources: String = row.get("source_locations");
        let destinations: String = row.get("destination_locations");

        let field_rows = sqlx::query(
            "SELECT * FROM price_fields WHERE pricing_id = ? ORDER BY id ASC",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        Ok(CargoPricing {
            id: PricingId::new(id),
            supplier_id: SupplierId::new(row.get("supplier_id")),
            cargo_method: CargoMethod::parse(&method).unwrap_or_else(|| {
                warn!(value = %method, "Unknown cargo method in store, defaulting to land");
                CargoMethod::Land
            }),
            price_fields: field_rows.iter().map(price_field_from_row).collect(),
            source_locations: locations_from_json("source_locations", &sources),
            destination_locations: locations_from_json("destination_locations", &destinations),
        })
    }
}
