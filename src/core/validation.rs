//! Composition validation - pure weight/percentage arithmetic for products.
//!
//! A product declares a total weight; the materials composed into it must
//! never exceed that weight in sum, and their percentage shares must never
//! exceed 100. All arithmetic runs on fixed-point decimals (weights at 3
//! decimal places, percentages at 2, half-up rounding) so that boundary
//! equality - a product composed to exactly its full weight or exactly
//! 100% - is accepted rather than lost to float noise.
//!
//! Nothing in this module touches the database; callers load the active
//! compositions for a product and hand them in.

use crate::entities::product_composition;
use crate::errors::{Error, Result};
use rust_decimal::{Decimal, RoundingStrategy};

/// Decimal places stored for weights (kilograms).
pub const WEIGHT_SCALE: u32 = 3;

/// Decimal places stored for percentage shares.
pub const PERCENTAGE_SCALE: u32 = 2;

/// Rounds a weight to its storage scale, half-up. The result always carries
/// exactly three decimal places, so values that lost their scale on a
/// database round-trip print as "4.000" rather than "4".
#[must_use]
pub fn round_weight(value: Decimal) -> Decimal {
    let mut rounded =
        value.round_dp_with_strategy(WEIGHT_SCALE, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(WEIGHT_SCALE);
    rounded
}

/// Rounds a percentage to its storage scale, half-up, always carrying two
/// decimal places.
#[must_use]
pub fn round_percentage(value: Decimal) -> Decimal {
    let mut rounded =
        value.round_dp_with_strategy(PERCENTAGE_SCALE, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(PERCENTAGE_SCALE);
    rounded
}

/// The weight and share of one stored composition, as seen by the validator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompositionAmounts {
    /// Composition row id, used to exclude a record from the sums on update
    pub id: i32,
    /// Material weight in kilograms
    pub weight: Decimal,
    /// Percentage share of the product
    pub percentage: Decimal,
}

impl From<&product_composition::Model> for CompositionAmounts {
    fn from(model: &product_composition::Model) -> Self {
        Self {
            id: model.id,
            weight: model.weight,
            percentage: model.percentage,
        }
    }
}

/// Sums the weights of `entries`, skipping the record identified by
/// `excluding` (the update case, where a row replaces its own contribution).
#[must_use]
pub fn weight_total(entries: &[CompositionAmounts], excluding: Option<i32>) -> Decimal {
    entries
        .iter()
        .filter(|entry| Some(entry.id) != excluding)
        .map(|entry| entry.weight)
        .sum()
}

/// Sums the percentage shares of `entries`, skipping `excluding`.
#[must_use]
pub fn percentage_total(entries: &[CompositionAmounts], excluding: Option<i32>) -> Decimal {
    entries
        .iter()
        .filter(|entry| Some(entry.id) != excluding)
        .map(|entry| entry.percentage)
        .sum()
}

/// Weight capacity still unassigned for a product.
#[must_use]
pub fn remaining_weight(product_weight: Decimal, entries: &[CompositionAmounts]) -> Decimal {
    product_weight - weight_total(entries, None)
}

/// Percentage share still unassigned for a product.
#[must_use]
pub fn remaining_percentage(entries: &[CompositionAmounts]) -> Decimal {
    Decimal::ONE_HUNDRED - percentage_total(entries, None)
}

/// Decides whether a candidate (weight, percentage) pair may be added to a
/// product, or may replace the record identified by `excluding`.
///
/// Checks, in order:
/// 1. the candidate weight is positive
/// 2. the candidate weight alone does not exceed the product weight
/// 3. the summed weights (existing minus `excluding`, plus candidate) do not
///    exceed the product weight
/// 4. the candidate percentage is in (0, 100]
/// 5. the summed percentages do not exceed 100
///
/// Sums reaching the bounds exactly are valid. Errors carry the remaining
/// capacity so callers can report how much would still fit.
///
/// # Errors
/// Returns the first violated constraint as a typed validation error.
pub fn check_candidate(
    product_weight: Decimal,
    entries: &[CompositionAmounts],
    candidate_weight: Decimal,
    candidate_percentage: Decimal,
    excluding: Option<i32>,
) -> Result<()> {
    if candidate_weight <= Decimal::ZERO {
        return Err(Error::InvalidWeight {
            weight: candidate_weight,
        });
    }

    if candidate_weight > product_weight {
        return Err(Error::WeightExceedsProduct {
            weight: round_weight(candidate_weight),
            product_weight: round_weight(product_weight),
        });
    }

    let current_weight = weight_total(entries, excluding);
    if current_weight + candidate_weight > product_weight {
        return Err(Error::WeightCapacityExceeded {
            product_weight: round_weight(product_weight),
            current_total: round_weight(current_weight),
            remaining: round_weight(product_weight - current_weight),
            attempted: round_weight(candidate_weight),
        });
    }

    if candidate_percentage <= Decimal::ZERO || candidate_percentage > Decimal::ONE_HUNDRED {
        return Err(Error::InvalidPercentage {
            percentage: candidate_percentage,
        });
    }

    let current_percentage = percentage_total(entries, excluding);
    if current_percentage + candidate_percentage > Decimal::ONE_HUNDRED {
        return Err(Error::PercentageCapacityExceeded {
            current_total: round_percentage(current_percentage),
            remaining: round_percentage(Decimal::ONE_HUNDRED - current_percentage),
            attempted: round_percentage(candidate_percentage),
        });
    }

    Ok(())
}

/// Detailed weight check over a product's stored compositions.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeightReport {
    /// Whether the summed material weights fit within the product weight
    pub valid: bool,
    /// Human-readable summary including remaining capacity or excess
    pub message: String,
    /// Declared product weight in kilograms
    pub product_weight: Decimal,
    /// Sum of the active compositions' weights
    pub material_weight: Decimal,
    /// Capacity still unassigned (negative when exceeded)
    pub remaining_weight: Decimal,
}

/// Builds a [`WeightReport`] for a product's current compositions.
#[must_use]
pub fn weight_report(product_weight: Decimal, entries: &[CompositionAmounts]) -> WeightReport {
    let material_weight = weight_total(entries, None);
    let remaining = product_weight - material_weight;
    let valid = material_weight <= product_weight;

    let message = if !valid {
        format!(
            "Material weights exceed product weight by {} kg",
            round_weight(material_weight - product_weight)
        )
    } else if material_weight == product_weight {
        "Material weights exactly match product weight".to_string()
    } else {
        format!(
            "Material weights are valid. Remaining capacity: {} kg",
            round_weight(remaining)
        )
    };

    WeightReport {
        valid,
        message,
        product_weight: round_weight(product_weight),
        material_weight: round_weight(material_weight),
        remaining_weight: round_weight(remaining),
    }
}

/// Re-checks the stored compositions of a product against both invariants:
/// summed weight within the product weight, summed percentage within 100.
///
/// Used by the audit endpoint to surface rows that became inconsistent, for
/// example after a product's declared weight was reduced.
///
/// # Errors
/// Returns a validation error naming the exceeded bound and by how much.
pub fn audit(product_weight: Decimal, entries: &[CompositionAmounts]) -> Result<()> {
    let total_weight = weight_total(entries, None);
    if total_weight > product_weight {
        return Err(Error::Validation {
            message: format!(
                "Total material weight ({} kg) exceeds product weight ({} kg) by {} kg. \
                 Please adjust material weights to not exceed the product weight.",
                round_weight(total_weight),
                round_weight(product_weight),
                round_weight(total_weight - product_weight)
            ),
        });
    }

    let total_percentage = percentage_total(entries, None);
    if total_percentage > Decimal::ONE_HUNDRED {
        return Err(Error::Validation {
            message: format!(
                "Total composition percentage ({}%) exceeds 100% by {}%. \
                 Please adjust composition percentages.",
                round_percentage(total_percentage),
                round_percentage(total_percentage - Decimal::ONE_HUNDRED)
            ),
        });
    }

    Ok(())
}
