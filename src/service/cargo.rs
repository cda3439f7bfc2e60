//! Cargo creation and lifecycle orchestration.
//!
//! Creation resolves catalog references, computes the fee quote, persists the
//! cargo with its first tracking entry, and emits the two creation events.
//! Status updates append tracking history and emit status events; the
//! transition table stays advisory on this path.

use crate::db::Repository;
use crate::domain::{
    AddressId, AddressSnapshot, Cargo, CargoId, CargoItem, CargoMethod, CargoStatus,
    CargoTracking, Decimal, LocationId, SupplierId, TrackingNumber, TrackingNumberGenerator,
    UserId,
};
use crate::engine::{compute_quote, QuoteError};
use crate::error::AppError;
use crate::notify::{emit_best_effort, CargoEvent, EventSink};
use chrono::{Duration, Utc};
use std::sync::Arc;
use tracing::info;

/// Inputs for cargo creation.
#[derive(Debug, Clone)]
pub struct CreateCargoRequest {
    pub supplier_id: SupplierId,
    pub cargo_method: CargoMethod,
    pub pickup_address_id: AddressId,
    pub delivery_address_id: AddressId,
    pub source_location: LocationId,
    pub destination_location: LocationId,
    pub items: Vec<CargoItem>,
    pub coupon_code: Option<String>,
}

/// How to address a cargo in a status update.
#[derive(Debug, Clone)]
pub enum CargoSelector {
    Id(CargoId),
    Tracking(TrackingNumber),
}

/// Public tracking response payload: the cargo (possibly PII-masked) plus
/// its full history.
#[derive(Debug, Clone)]
pub struct TrackedCargo {
    pub cargo: Cargo,
    pub history: Vec<CargoTracking>,
}

pub struct CargoService {
    repo: Arc<Repository>,
    events: Arc<dyn EventSink>,
    tracking: Arc<dyn TrackingNumberGenerator>,
    tracking_base_url: String,
}

impl CargoService {
    pub fn new(
        repo: Arc<Repository>,
        events: Arc<dyn EventSink>,
        tracking: Arc<dyn TrackingNumberGenerator>,
        tracking_base_url: String,
    ) -> Self {
        Self {
            repo,
            events,
            tracking,
            tracking_base_url,
        }
    }

    /// Create a cargo order for a user.
    ///
    /// All validation happens before any write; a failed request persists
    /// nothing and emits nothing.
    pub async fn create_cargo(
        &self,
        request: CreateCargoRequest,
        user: UserId,
    ) -> Result<Cargo, AppError> {
        let supplier = self
            .repo
            .get_supplier(request.supplier_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("supplier {}", request.supplier_id)))?;

        let pickup = self
            .repo
            .get_address(request.pickup_address_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("address {}", request.pickup_address_id))
            })?;
        let delivery = self
            .repo
            .get_address(request.delivery_address_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("address {}", request.delivery_address_id))
            })?;

        if pickup.user_id != user || delivery.user_id != user {
            return Err(AppError::Forbidden(
                "address does not belong to the requesting user".to_string(),
            ));
        }

        for location in [request.source_location, request.destination_location] {
            self.repo
                .get_location(location)
                .await?
                .ok_or_else(|| AppError::NotFound(format!("location {}", location)))?;
        }

        if !supplier
            .serviced_destinations
            .contains(&request.destination_location)
        {
            return Err(AppError::ServiceArea(format!(
                "destination {} is not serviced by supplier {}",
                request.destination_location, supplier.id
            )));
        }

        let supplier_rows = self.repo.list_pricing_for_supplier(supplier.id).await?;
        let source_serviced = supplier_rows
            .iter()
            .any(|row| row.source_locations.contains(&request.source_location));
        if !source_serviced {
            return Err(AppError::ServiceArea(format!(
                "source {} is not serviced by supplier {}",
                request.source_location, supplier.id
            )));
        }

        let pricing = self
            .repo
            .find_pricing_for_route(
                supplier.id,
                request.cargo_method,
                request.source_location,
                request.destination_location,
            )
            .await?
            .ok_or_else(|| {
                AppError::PricingNotFound(format!(
                    "no {} pricing for supplier {} on route {} -> {}",
                    request.cargo_method,
                    supplier.id,
                    request.source_location,
                    request.destination_location
                ))
            })?;

        for item in &request.items {
            let cargo_type = self
                .repo
                .get_cargo_type(item.cargo_type)
                .await?
                .ok_or_else(|| AppError::NotFound(format!("cargo type {}", item.cargo_type)))?;
            if self.repo.cargo_type_has_children(cargo_type.id).await? {
                return Err(AppError::Validation(format!(
                    "cargo type {} is a parent category, pick a concrete type",
                    cargo_type.name
                )));
            }
        }

        let total_weight = request
            .items
            .iter()
            .fold(Decimal::zero(), |acc, item| acc + item.weight);
        if total_weight < supplier.min_weight {
            return Err(AppError::MinWeight(format!(
                "total weight {} below supplier minimum {}",
                total_weight, supplier.min_weight
            )));
        }

        let now = Utc::now();
        let coupon = match &request.coupon_code {
            Some(code) => {
                let coupon = self
                    .repo
                    .find_coupon(code)
                    .await?
                    .ok_or_else(|| AppError::CouponInvalid(format!("unknown code {}", code)))?;
                coupon
                    .check(supplier.id, total_weight, now)
                    .map_err(|e| AppError::CouponInvalid(e.to_string()))?;
                Some(coupon)
            }
            None => None,
        };

        let quote = compute_quote(
            &request.items,
            &pricing,
            supplier.min_weight,
            coupon.as_ref(),
        )
        .map_err(quote_error)?;

        let tracking_number = self.tracking.next(now);
        let cargo = Cargo {
            id: CargoId::new(0),
            tracking_number: tracking_number.clone(),
            status: CargoStatus::NewRequest,
            user_id: user,
            supplier_id: supplier.id,
            cargo_method: request.cargo_method,
            source_location: request.source_location,
            destination_location: request.destination_location,
            pickup_address: snapshot_of(&pickup),
            delivery_address: snapshot_of(&delivery),
            items: request.items,
            total_weight: quote.total_weight,
            fee: quote.fee,
            service_fee: quote.service_fee,
            total_fee: quote.total_fee,
            coupon_code: request.coupon_code,
            estimated_delivery_date: now + Duration::days(supplier.delivery_estimation_max),
            delivered_at: None,
            review_eligible: false,
            note: None,
            created_at: now,
        };

        let stored = self.repo.insert_cargo(&cargo).await?;

        info!(
            cargo_id = stored.id.as_i64(),
            tracking_number = %stored.tracking_number,
            total_fee = %stored.total_fee,
            "Cargo created"
        );

        emit_best_effort(
            &*self.events,
            CargoEvent::CargoCreated {
                tracking_number: tracking_number.clone(),
                user_phone: stored.pickup_address.phone.clone(),
                supplier_name: supplier.name.clone(),
            },
        )
        .await;
        emit_best_effort(
            &*self.events,
            CargoEvent::CargoCreatedForSupplier {
                tracking_number: tracking_number.clone(),
                supplier_phone: supplier.phone.clone(),
                tracking_link: format!("{}/{}", self.tracking_base_url, tracking_number),
            },
        )
        .await;

        Ok(stored)
    }

    /// Apply a status change to a cargo addressed by id or tracking number,
    /// optionally scoped to a supplier.
    ///
    /// Setting the current status again is a pure field update: no tracking
    /// entry, no events. A genuine change appends one tracking entry and
    /// emits `cargo.status.updated`; the move to Delivered additionally
    /// stamps the delivery time, unlocks reviews, and triggers commission
    /// application plus the review invitation.
    pub async fn update_cargo_status(
        &self,
        selector: CargoSelector,
        new_status: CargoStatus,
        note: Option<String>,
        scope: Option<SupplierId>,
    ) -> Result<Cargo, AppError> {
        let cargo = match &selector {
            CargoSelector::Id(id) => self.repo.find_cargo_by_id(*id, scope).await?,
            CargoSelector::Tracking(tn) => self.repo.find_cargo_by_tracking(tn, scope).await?,
        }
        .ok_or_else(|| AppError::NotFound("cargo not found".to_string()))?;

        if cargo.status == new_status {
            self.repo
                .update_cargo_status(cargo.id, new_status, note.as_deref())
                .await?;
            return self.reload(cargo.id).await;
        }

        let now = Utc::now();
        self.repo
            .update_cargo_status(cargo.id, new_status, note.as_deref())
            .await?;
        self.repo
            .append_tracking(cargo.id, new_status, note.as_deref(), now)
            .await?;

        if new_status == CargoStatus::Delivered {
            self.repo.mark_delivered(cargo.id, now).await?;
        }

        let supplier_name = self
            .repo
            .get_supplier(cargo.supplier_id)
            .await?
            .map(|s| s.name)
            .unwrap_or_default();

        info!(
            cargo_id = cargo.id.as_i64(),
            from = %cargo.status,
            to = %new_status,
            "Cargo status updated"
        );

        emit_best_effort(
            &*self.events,
            CargoEvent::CargoStatusUpdated {
                tracking_number: cargo.tracking_number.clone(),
                new_status,
                user_phone: cargo.pickup_address.phone.clone(),
                supplier_name,
            },
        )
        .await;

        if new_status == CargoStatus::Delivered {
            emit_best_effort(
                &*self.events,
                CargoEvent::ApplyCommissions { cargo_id: cargo.id },
            )
            .await;
            emit_best_effort(
                &*self.events,
                CargoEvent::NewSupplierReview {
                    cargo_id: cargo.id,
                    supplier_id: cargo.supplier_id,
                },
            )
            .await;
        }

        self.reload(cargo.id).await
    }

    /// Owner-scoped read: a cargo is visible only to the user who created it.
    pub async fn get_cargo_for_user(&self, id: CargoId, user: UserId) -> Result<Cargo, AppError> {
        let cargo = self
            .repo
            .get_cargo(id)
            .await?
            .filter(|c| c.user_id == user)
            .ok_or_else(|| AppError::NotFound(format!("cargo {}", id)))?;
        Ok(cargo)
    }

    pub async fn list_cargos_for_user(&self, user: UserId) -> Result<Vec<Cargo>, AppError> {
        Ok(self.repo.list_cargos_for_user(user).await?)
    }

    /// Public tracking lookup. PII fields are partially masked unless the
    /// caller presents the cargo supplier's auth token.
    pub async fn track(
        &self,
        tracking_number: &TrackingNumber,
        auth_token: Option<&str>,
    ) -> Result<TrackedCargo, AppError> {
        let mut cargo = self
            .repo
            .find_cargo_by_tracking(tracking_number, None)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("tracking {}", tracking_number)))?;

        let supplier = self.repo.get_supplier(cargo.supplier_id).await?;
        let authorized = matches!(
            (auth_token, &supplier),
            (Some(token), Some(supplier)) if token == supplier.auth_token
        );

        if !authorized {
            cargo.pickup_address = mask_snapshot(&cargo.pickup_address);
            cargo.delivery_address = mask_snapshot(&cargo.delivery_address);
        }

        let history = self.repo.tracking_history(cargo.id).await?;
        Ok(TrackedCargo { cargo, history })
    }

    pub async fn tracking_history(&self, id: CargoId) -> Result<Vec<CargoTracking>, AppError> {
        Ok(self.repo.tracking_history(id).await?)
    }

    async fn reload(&self, id: CargoId) -> Result<Cargo, AppError> {
        self.repo
            .get_cargo(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("cargo {}", id)))
    }
}

fn quote_error(err: QuoteError) -> AppError {
    match err {
        QuoteError::UnsupportedCargoType(t) => {
            AppError::UnsupportedCargoType(format!("cargo type {}", t))
        }
        QuoteError::MinWeight { total, minimum } => AppError::MinWeight(format!(
            "total weight {} below supplier minimum {}",
            total, minimum
        )),
        QuoteError::EmptyItems => AppError::Validation("cargo has no items".to_string()),
    }
}

fn snapshot_of(address: &crate::domain::CustomerAddress) -> AddressSnapshot {
    AddressSnapshot {
        contact_name: address.contact_name.clone(),
        contact_surname: address.contact_surname.clone(),
        phone: address.phone.clone(),
        line: address.line.clone(),
        city: address.city.clone(),
    }
}

/// Keep a short visible prefix, star the rest.
fn mask_keep_prefix(s: &str, visible: usize) -> String {
    let chars: Vec<char> = s.chars().collect();
    if chars.len() <= visible {
        return "*".repeat(chars.len());
    }
    let mut masked: String = chars[..visible].iter().collect();
    masked.push_str(&"*".repeat(chars.len() - visible));
    masked
}

/// Star everything but a short visible suffix.
fn mask_keep_suffix(s: &str, visible: usize) -> String {
    let chars: Vec<char> = s.chars().collect();
    if chars.len() <= visible {
        return "*".repeat(chars.len());
    }
    let mut masked = "*".repeat(chars.len() - visible);
    masked.extend(chars[chars.len() - visible..].iter());
    masked
}

fn mask_snapshot(snapshot: &AddressSnapshot) -> AddressSnapshot {
    AddressSnapshot {
        contact_name: mask_keep_prefix(&snapshot.contact_name, 2),
        contact_surname: mask_keep_prefix(&snapshot.contact_surname, 2),
        phone: mask_keep_suffix(&snapshot.phone, 2),
        line: mask_keep_prefix(&snapshot.line, 4),
        city: snapshot.city.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_keep_prefix() {
        assert_eq!(mask_keep_prefix("Jonathan", 2), "Jo******");
        assert_eq!(mask_keep_prefix("Al", 2), "**");
        assert_eq!(mask_keep_prefix("", 2), "");
    }

    #[test]
    fn test_mask_keep_suffix() {
        assert_eq!(mask_keep_suffix("5550001122", 2), "********22");
        assert_eq!(mask_keep_suffix("22", 2), "**");
    }

    #[test]
    fn test_mask_snapshot_keeps_city() {
        let snapshot = AddressSnapshot {
            contact_name: "Ada".into(),
            contact_surname: "Marsh".into(),
            phone: "5550001122".into(),
            line: "12 Dock Rd".into(),
            city: "Valletta".into(),
        };
        let masked = mask_snapshot(&snapshot);
        assert_eq!(masked.contact_name, "Ad*");
        assert_eq!(masked.phone, "********22");
        assert_eq!(masked.line, "12 D******");
        assert_eq!(masked.city, "Valletta");
    }
}
