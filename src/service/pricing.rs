//! Pricing-row management: validation, ownership, and the serviced-destination
//! aggregate.

use crate::db::Repository;
use crate::domain::{CargoPricing, LocationId, PricingId, SupplierId};
use crate::error::AppError;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::info;

/// Who is performing a pricing mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Actor {
    Admin,
    Supplier(SupplierId),
}

pub struct PricingService {
    repo: Arc<Repository>,
}

impl PricingService {
    pub fn new(repo: Arc<Repository>) -> Self {
        Self { repo }
    }

    /// Create a pricing row for a supplier.
    ///
    /// Rejects duplicate cargo types within the price list and any row whose
    /// route overlaps an existing row of the same supplier and method.
    pub async fn create_pricing(
        &self,
        pricing: CargoPricing,
        actor: Actor,
    ) -> Result<CargoPricing, AppError> {
        self.authorize(pricing.supplier_id, actor)?;
        self.validate(&pricing, None).await?;

        let id = self.repo.insert_pricing(&pricing).await?;
        self.recompute_serviced_destinations(pricing.supplier_id)
            .await?;

        info!(
            pricing_id = id.as_i64(),
            supplier_id = pricing.supplier_id.as_i64(),
            "Pricing row created"
        );

        let mut stored = pricing;
        stored.id = id;
        Ok(stored)
    }

    /// Replace an existing pricing row, same validation as creation.
    pub async fn update_pricing(
        &self,
        id: PricingId,
        mut pricing: CargoPricing,
        actor: Actor,
    ) -> Result<CargoPricing, AppError> {
        let existing = self
            .repo
            .get_pricing(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("pricing {}", id)))?;

        self.authorize(existing.supplier_id, actor)?;

        pricing.id = id;
        pricing.supplier_id = existing.supplier_id;
        self.validate(&pricing, Some(id)).await?;

        self.repo.update_pricing(&pricing).await?;
        self.recompute_serviced_destinations(pricing.supplier_id)
            .await?;

        Ok(pricing)
    }

    pub async fn list_for_supplier(
        &self,
        supplier: SupplierId,
    ) -> Result<Vec<CargoPricing>, AppError> {
        Ok(self.repo.list_pricing_for_supplier(supplier).await?)
    }

    fn authorize(&self, owner: SupplierId, actor: Actor) -> Result<(), AppError> {
        match actor {
            Actor::Admin => Ok(()),
            Actor::Supplier(supplier) if supplier == owner => Ok(()),
            Actor::Supplier(_) => Err(AppError::Forbidden(
                "pricing belongs to another supplier".to_string(),
            )),
        }
    }

    async fn validate(
        &self,
        pricing: &CargoPricing,
        exclude: Option<PricingId>,
    ) -> Result<(), AppError> {
        self.repo
            .get_supplier(pricing.supplier_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("supplier {}", pricing.supplier_id)))?;

        if pricing.price_fields.is_empty() {
            return Err(AppError::Validation(
                "price list must not be empty".to_string(),
            ));
        }

        if let Some(cargo_type) = pricing.duplicate_cargo_type() {
            return Err(AppError::Validation(format!(
                "cargo type {} appears more than once in the price list",
                cargo_type
            )));
        }

        let siblings = self
            .repo
            .list_pricing_for_supplier(pricing.supplier_id)
            .await?;
        for sibling in &siblings {
            if Some(sibling.id) == exclude || sibling.cargo_method != pricing.cargo_method {
                continue;
            }
            if pricing.overlaps_route(sibling) {
                return Err(AppError::Validation(format!(
                    "route overlaps existing pricing row {}",
                    sibling.id
                )));
            }
        }

        Ok(())
    }

    /// The supplier's aggregate serviced-destination set is the union of the
    /// destination sets across all its pricing rows.
    async fn recompute_serviced_destinations(
        &self,
        supplier: SupplierId,
    ) -> Result<(), AppError> {
        let rows = self.repo.list_pricing_for_supplier(supplier).await?;
        let union: BTreeSet<LocationId> = rows
            .iter()
            .flat_map(|row| row.destination_locations.iter().copied())
            .collect();
        let destinations: Vec<LocationId> = union.into_iter().collect();

        self.repo
            .set_serviced_destinations(supplier, &destinations)
            .await?;
        Ok(())
    }
}
