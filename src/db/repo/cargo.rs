//! Cargo order storage: cargos, their items, and tracking history.

use super::{fmt_datetime, parse_datetime, parse_decimal, Repository};
use crate::domain::{
    AddressSnapshot, Cargo, CargoId, CargoItem, CargoMethod, CargoStatus, CargoTracking,
    CargoTypeId, LocationId, SupplierId, TrackingNumber, UserId,
};
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use tracing::warn;

fn status_from_str(s: &str) -> CargoStatus {
    CargoStatus::parse(s).unwrap_or_else(|| {
        warn!(value = s, "Unknown cargo status in store, defaulting to NEW_REQUEST");
        CargoStatus::NewRequest
    })
}

fn cargo_from_row(row: &SqliteRow, items: Vec<CargoItem>) -> Cargo {
    let status: String = row.get("status");
    let method: String = row.get("cargo_method");
    let total_weight: String = row.get("total_weight");
    let fee: String = row.get("fee");
    let service_fee: String = row.get("service_fee");
    let total_fee: String = row.get("total_fee");
    let estimated: String = row.get("estimated_delivery_date");
    let created_at: String = row.get("created_at");

    Cargo {
        id: CargoId::new(row.get("id")),
        tracking_number: TrackingNumber::new(row.get("tracking_number")),
        status: status_from_str(&status),
        user_id: UserId::new(row.get("user_id")),
        supplier_id: SupplierId::new(row.get("supplier_id")),
        cargo_method: CargoMethod::parse(&method).unwrap_or_else(|| {
            warn!(value = %method, "Unknown cargo method in store, defaulting to land");
            CargoMethod::Land
        }),
        source_location: LocationId::new(row.get("source_location")),
        destination_location: LocationId::new(row.get("destination_location")),
        pickup_address: AddressSnapshot {
            contact_name: row.get("pickup_contact_name"),
            contact_surname: row.get("pickup_contact_surname"),
            phone: row.get("pickup_phone"),
            line: row.get("pickup_line"),
            city: row.get("pickup_city"),
        },
        delivery_address: AddressSnapshot {
            contact_name: row.get("delivery_contact_name"),
            contact_surname: row.get("delivery_contact_surname"),
            phone: row.get("delivery_phone"),
            line: row.get("delivery_line"),
            city: row.get("delivery_city"),
        },
        items,
        total_weight: parse_decimal("total_weight", &total_weight),
        fee: parse_decimal("fee", &fee),
        service_fee: parse_decimal("service_fee", &service_fee),
        total_fee: parse_decimal("total_fee", &total_fee),
        coupon_code: row.get("coupon_code"),
        estimated_delivery_date: parse_datetime("estimated_delivery_date", &estimated),
        delivered_at: row
            .get::<Option<String>, _>("delivered_at")
            .map(|s| parse_datetime("delivered_at", &s)),
        review_eligible: row.get::<i64, _>("review_eligible") != 0,
        note: row.get("note"),
        created_at: parse_datetime("created_at", &created_at),
    }
}

impl Repository {
    /// Insert a cargo, its items, and the first tracking entry atomically.
    ///
    /// The passed cargo's id is ignored; returns the stored copy with the
    /// assigned id.
    pub async fn insert_cargo(&self, cargo: &Cargo) -> Result<Cargo, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            INSERT INTO cargos
            (tracking_number, status, user_id, supplier_id, cargo_method,
             source_location, destination_location,
             pickup_contact_name, pickup_contact_surname, pickup_phone, pickup_line, pickup_city,
             delivery_contact_name, delivery_contact_surname, delivery_phone, delivery_line, delivery_city,
             total_weight, fee, service_fee, total_fee, coupon_code,
             estimated_delivery_date, delivered_at, review_eligible, note, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(cargo.tracking_number.as_str())
        .bind(cargo.status.as_str())
        .bind(cargo.user_id.as_i64())
        .bind(cargo.supplier_id.as_i64())
        .bind(cargo.cargo_method.as_str())
        .bind(cargo.source_location.as_i64())
        .bind(cargo.destination_location.as_i64())
        .bind(&cargo.pickup_address.contact_name)
        .bind(&cargo.pickup_address.contact_surname)
        .bind(&cargo.pickup_address.phone)
        .bind(&cargo.pickup_address.line)
        .bind(&cargo.pickup_address.city)
        .bind(&cargo.delivery_address.contact_name)
        .bind(&cargo.delivery_address.contact_surname)
        .bind(&cargo.delivery_address.phone)
        .bind(&cargo.delivery_address.line)
        .bind(&cargo.delivery_address.city)
        .bind(cargo.total_weight.to_canonical_string())
        .bind(cargo.fee.to_canonical_string())
        .bind(cargo.service_fee.to_canonical_string())
        .bind(cargo.total_fee.to_canonical_string())
        .bind(cargo.coupon_code.as_deref())
        .bind(fmt_datetime(cargo.estimated_delivery_date))
        .bind(cargo.delivered_at.map(fmt_datetime))
        .bind(cargo.review_eligible as i64)
        .bind(cargo.note.as_deref())
        .bind(fmt_datetime(cargo.created_at))
        .execute(&mut *tx)
        .await?;

        let cargo_id = result.last_insert_rowid();

        for item in &cargo.items {
            sqlx::query(
                "INSERT INTO cargo_items (cargo_id, cargo_type_id, weight, qty) VALUES (?, ?, ?, ?)",
            )
            .bind(cargo_id)
            .bind(item.cargo_type.as_i64())
            .bind(item.weight.to_canonical_string())
            .bind(item.qty)
            .execute(&mut *tx)
            .await?;
        }

        sqlx::query(
            "INSERT INTO cargo_tracking (cargo_id, status, note, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(cargo_id)
        .bind(cargo.status.as_str())
        .bind(Option::<String>::None)
        .bind(fmt_datetime(cargo.created_at))
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        let mut stored = cargo.clone();
        stored.id = CargoId::new(cargo_id);
        Ok(stored)
    }

    pub async fn get_cargo(&self, id: CargoId) -> Result<Option<Cargo>, sqlx::Error> {
        let row = sqlx::query("SELECT * FROM cargos WHERE id = ?")
            .bind(id.as_i64())
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Ok(Some(self.hydrate_cargo(&row).await?)),
            None => Ok(None),
        }
    }

    /// Look up a cargo by id with an optional supplier scope constraint.
    pub async fn find_cargo_by_id(
        &self,
        id: CargoId,
        supplier: Option<SupplierId>,
    ) -> Result<Option<Cargo>, sqlx::Error> {
        let row = sqlx::query(
            "SELECT * FROM cargos WHERE id = ? AND (? IS NULL OR supplier_id = ?)",
        )
        .bind(id.as_i64())
        .bind(supplier.map(|s| s.as_i64()))
        .bind(supplier.map(|s| s.as_i64()))
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(Some(self.hydrate_cargo(&row).await?)),
            None => Ok(None),
        }
    }

    /// Look up a cargo by public tracking number with an optional supplier
    /// scope constraint.
    pub async fn find_cargo_by_tracking(
        &self,
        tracking_number: &TrackingNumber,
        supplier: Option<SupplierId>,
    ) -> Result<Option<Cargo>, sqlx::Error> {
        let row = sqlx::query(
            "SELECT * FROM cargos WHERE tracking_number = ? AND (? IS NULL OR supplier_id = ?)",
        )
        .bind(tracking_number.as_str())
        .bind(supplier.map(|s| s.as_i64()))
        .bind(supplier.map(|s| s.as_i64()))
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(Some(self.hydrate_cargo(&row).await?)),
            None => Ok(None),
        }
    }

    pub async fn list_cargos_for_user(&self, user: UserId) -> Result<Vec<Cargo>, sqlx::Error> {
        let rows = sqlx::query("SELECT * FROM cargos WHERE user_id = ? ORDER BY id DESC")
            .bind(user.as_i64())
            .fetch_all(&self.pool)
            .await?;

        let mut cargos = Vec::with_capacity(rows.len());
        for row in &rows {
            cargos.push(self.hydrate_cargo(row).await?);
        }
        Ok(cargos)
    }

    /// Set the cargo status and optionally overwrite the note.
    pub async fn update_cargo_status(
        &self,
        id: CargoId,
        status: CargoStatus,
        note: Option<&str>,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE cargos SET status = ?, note = COALESCE(?, note) WHERE id = ?")
            .bind(status.as_str())
            .bind(note)
            .bind(id.as_i64())
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Mark a cargo delivered: timestamp plus review eligibility.
    pub async fn mark_delivered(
        &self,
        id: CargoId,
        delivered_at: DateTime<Utc>,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE cargos SET delivered_at = ?, review_eligible = 1 WHERE id = ?")
            .bind(fmt_datetime(delivered_at))
            .bind(id.as_i64())
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Append one tracking-history entry. History is insert-only.
    pub async fn append_tracking(
        &self,
        id: CargoId,
        status: CargoStatus,
        note: Option<&str>,
        at: DateTime<Utc>,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO cargo_tracking (cargo_id, status, note, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(id.as_i64())
        .bind(status.as_str())
        .bind(note)
        .bind(fmt_datetime(at))
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Full tracking history for a cargo, oldest first.
    pub async fn tracking_history(&self, id: CargoId) -> Result<Vec<CargoTracking>, sqlx::Error> {
        let rows = sqlx::query(
            "SELECT cargo_id, status, note, created_at FROM cargo_tracking WHERE cargo_id = ? ORDER BY created_at ASC, id ASC",
        )
        .bind(id.as_i64())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .iter()
            .map(|row| {
                let status: String = row.get("status");
                let created_at: String = row.get("created_at");
                CargoTracking {
                    cargo_id: CargoId::new(row.get("cargo_id")),
                    status: status_from_str(&status),
                    note: row.get("note"),
                    created_at: parse_datetime("created_at", &created_at),
                }
            })
            .collect())
    }

    /// Per-status cargo counts for a supplier inside a creation-time window.
    pub async fn cargo_status_counts(
        &self,
        supplier: SupplierId,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<(CargoStatus, i64)>, sqlx::Error> {
        let rows = sqlx::query(
            r#"
            SELECT status, COUNT(*) as n
            FROM cargos
            WHERE supplier_id = ? AND created_at >= ? AND created_at <= ?
            GROUP BY status
            "#,
        )
        .bind(supplier.as_i64())
        .bind(fmt_datetime(from))
        .bind(fmt_datetime(to))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .iter()
            .map(|row| {
                let status: String = row.get("status");
                (status_from_str(&status), row.get::<i64, _>("n"))
            })
            .collect())
    }

    async fn hydrate_cargo(&self, row: &SqliteRow) -> Result<Cargo, sqlx::Error> {
        let cargo_id: i64 = row.get("id");
        let item_rows = sqlx::query(
            "SELECT cargo_type_id, weight, qty FROM cargo_items WHERE cargo_id = ? ORDER BY id ASC",
        )
        .bind(cargo_id)
        .fetch_all(&self.pool)
        .await?;

        let items = item_rows
            .iter()
            .map(|item| {
                let weight: String = item.get("weight");
                CargoItem {
                    cargo_type: CargoTypeId::new(item.get("cargo_type_id")),
                    weight: parse_decimal("weight", &weight),
                    qty: item.get("qty"),
                }
            })
            .collect();

        Ok(cargo_from_row(row, items))
    }
}
