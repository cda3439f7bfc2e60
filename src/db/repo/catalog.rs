//! Catalog operations: suppliers, locations, cargo types, customer addresses.

use super::{parse_decimal, Repository};
use crate::domain::{
    AddressId, CargoType, CargoTypeId, CustomerAddress, Decimal, Location, LocationId, Supplier,
    SupplierId, UserId,
};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use tracing::warn;

/// Insert payload for a supplier.
#[derive(Debug, Clone)]
pub struct NewSupplier {
    pub name: String,
    pub phone: String,
    pub min_weight: Decimal,
    pub delivery_estimation_min: i64,
    pub delivery_estimation_max: i64,
    pub auth_token: String,
    pub active: bool,
}

/// Insert payload for a customer address-book entry.
#[derive(Debug, Clone)]
pub struct NewAddress {
    pub user_id: UserId,
    pub contact_name: String,
    pub contact_surname: String,
    pub phone: String,
    pub line: String,
    pub city: String,
    pub location_id: LocationId,
}

fn supplier_from_row(row: &SqliteRow) -> Supplier {
    let min_weight: String = row.get("min_weight");
    let serviced_json: String = row.get("serviced_destinations");
    let serviced_destinations: Vec<LocationId> = serde_json::from_str::<Vec<i64>>(&serviced_json)
        .unwrap_or_else(|e| {
            warn!(value = %serviced_json, error = %e, "Failed to parse serviced destinations, using empty set");
            Vec::new()
        })
        .into_iter()
        .map(LocationId::new)
        .collect();

    Supplier {
        id: SupplierId::new(row.get("id")),
        name: row.get("name"),
        phone: row.get("phone"),
        min_weight: parse_decimal("min_weight", &min_weight),
        delivery_estimation_min: row.get("delivery_estimation_min"),
        delivery_estimation_max: row.get("delivery_estimation_max"),
        auth_token: row.get("auth_token"),
        active: row.get::<i64, _>("active") != 0,
        serviced_destinations,
    }
}

impl Repository {
    // =========================================================================
    // Supplier operations
    // =========================================================================

    pub async fn insert_supplier(&self, supplier: &NewSupplier) -> Result<SupplierId, sqlx::Error> {
        let result = sqlx::query(
            r#"
            INSERT INTO suppliers
            (name, phone, min_weight, delivery_estimation_min, delivery_estimation_max, auth_token, active)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&supplier.name)
        .bind(&supplier.phone)
        .bind(supplier.min_weight.to_canonical_string())
        .bind(supplier.delivery_estimation_min)
        .bind(supplier.delivery_estimation_max)
        .bind(&supplier.auth_token)
        .bind(supplier.active as i64)
        .execute(&self.pool)
        .await?;

        Ok(SupplierId::new(result.last_insert_rowid()))
    }

    pub async fn get_supplier(&self, id: SupplierId) -> Result<Option<Supplier>, sqlx::Error> {
        let row = sqlx::query("SELECT * FROM suppliers WHERE id = ?")
            .bind(id.as_i64())
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|r| supplier_from_row(&r)))
    }

    pub async fn list_active_suppliers(&self) -> Result<Vec<Supplier>, sqlx::Error> {
        let rows = sqlx::query("SELECT * FROM suppliers WHERE active = 1 ORDER BY id ASC")
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.iter().map(supplier_from_row).collect())
    }

    /// Replace a supplier's aggregate serviced-destination set.
    pub async fn set_serviced_destinations(
        &self,
        id: SupplierId,
        destinations: &[LocationId],
    ) -> Result<(), sqlx::Error> {
        let ids: Vec<i64> = destinations.iter().map(|l| l.as_i64()).collect();
        let json = serde_json::to_string(&ids).unwrap_or_else(|_| "[]".to_string());

        sqlx::query("UPDATE suppliers SET serviced_destinations = ? WHERE id = ?")
            .bind(json)
            .bind(id.as_i64())
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    // =========================================================================
    // Location operations
    // =========================================================================

    pub async fn insert_location(&self, name: &str) -> Result<LocationId, sqlx::Error> {
        let result = sqlx::query("INSERT INTO locations (name) VALUES (?)")
            .bind(name)
            .execute(&self.pool)
            .await?;

        Ok(LocationId::new(result.last_insert_rowid()))
    }

    pub async fn get_location(&self, id: LocationId) -> Result<Option<Location>, sqlx::Error> {
        let row = sqlx::query("SELECT id, name FROM locations WHERE id = ?")
            .bind(id.as_i64())
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|r| Location {
            id: LocationId::new(r.get("id")),
            name: r.get("name"),
        }))
    }

    // =========================================================================
    // Cargo-type operations
    // =========================================================================

    pub async fn insert_cargo_type(
        &self,
        name: &str,
        parent_id: Option<CargoTypeId>,
    ) -> Result<CargoTypeId, sqlx::Error> {
        let result = sqlx::query("INSERT INTO cargo_types (name, parent_id) VALUES (?, ?)")
            .bind(name)
            .bind(parent_id.map(|p| p.as_i64()))
            .execute(&self.pool)
            .await?;

        Ok(CargoTypeId::new(result.last_insert_rowid()))
    }

    pub async fn get_cargo_type(&self, id: CargoTypeId) -> Result<Option<CargoType>, sqlx::Error> {
        let row = sqlx::query("SELECT id, name, parent_id FROM cargo_types WHERE id = ?")
            .bind(id.as_i64())
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|r| CargoType {
            id: CargoTypeId::new(r.get("id")),
            name: r.get("name"),
            parent_id: r.get::<Option<i64>, _>("parent_id").map(CargoTypeId::new),
        }))
    }

    /// Leaf check: a cargo type with children groups other types and is not
    /// itself orderable.
    pub async fn cargo_type_has_children(&self, id: CargoTypeId) -> Result<bool, sqlx::Error> {
        let row = sqlx::query("SELECT COUNT(*) as n FROM cargo_types WHERE parent_id = ?")
            .bind(id.as_i64())
            .fetch_one(&self.pool)
            .await?;

        Ok(row.get::<i64, _>("n") > 0)
    }

    // =========================================================================
    // Customer address operations
    // =========================================================================

    pub async fn insert_address(&self, address: &NewAddress) -> Result<AddressId, sqlx::Error> {
        let result = sqlx::query(
            r#"
            INSERT INTO customer_addresses
            (user_id, contact_name, contact_surname, phone, line, city, location_id)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(address.user_id.as_i64())
        .bind(&address.contact_name)
        .bind(&address.contact_surname)
        .bind(&address.phone)
        .bind(&address.line)
        .bind(&address.city)
        .bind(address.location_id.as_i64())
        .execute(&self.pool)
        .await?;

        Ok(AddressId::new(result.last_insert_rowid()))
    }

    pub async fn get_address(
        &self,
        id: AddressId,
    ) -> Result<Option<CustomerAddress>, sqlx::Error> {
        let row = sqlx::query("SELECT * FROM customer_addresses WHERE id = ?")
            .bind(id.as_i64())
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|r| CustomerAddress {
            id: AddressId::new(r.get("id")),
            user_id: UserId::new(r.get("user_id")),
            contact_name: r.get("contact_name"),
            contact_surname: r.get("contact_surname"),
            phone: r.get("phone"),
            line: r.get("line"),
            city: r.get("city"),
            location_id: LocationId::new(r.get("location_id")),
        }))
    }
}
