//! Reconstruction of missing document totals from the fields that are present.
//!
//! Runs once per parsed prediction. Steps are applied in a fixed order and each
//! one sees the totals left by the previous step:
//!
//! 1. `total_tax` from the tax lines (any scope)
//! 2. `total_net` from `total_amount` and the tax lines (document scope only)
//! 3. `total_amount` from `total_net` and the tax lines (document scope only)
//! 4. `total_tax` from the two totals (document scope only)
//!
//! Steps never overwrite a total that already carries a value, with the
//! exception of step 1 which replaces `total_tax` whenever the tax lines add
//! up to a strictly positive amount.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::fields::{array_confidence, array_sum, AmountField, TaxField};

/// Whether a prediction covers the whole document or a single page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageScope {
    Document,
    Page(u32),
}

impl PageScope {
    pub fn from_page_id(page_id: Option<u32>) -> Self {
        match page_id {
            Some(id) => PageScope::Page(id),
            None => PageScope::Document,
        }
    }

    pub fn page_id(self) -> Option<u32> {
        match self {
            PageScope::Document => None,
            PageScope::Page(id) => Some(id),
        }
    }
}

/// The three totals the engine can derive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Totals {
    /// Total including taxes.
    pub total_amount: AmountField,
    /// Total excluding taxes.
    pub total_net: AmountField,
    /// Sum of all taxes.
    pub total_tax: AmountField,
}

impl Totals {
    /// Run every reconstruction step allowed at `scope`.
    pub fn reconstruct(&mut self, taxes: &[TaxField], scope: PageScope) {
        reconstruct(taxes, self, scope);
    }
}

/// Fill in the derivable totals in place.
pub fn reconstruct(taxes: &[TaxField], totals: &mut Totals, scope: PageScope) {
    total_tax_from_taxes(taxes, totals, scope);
    if scope != PageScope::Document {
        return;
    }
    total_net_from_amount_and_taxes(taxes, totals);
    total_amount_from_net_and_taxes(taxes, totals);
    total_tax_from_totals(taxes, totals);
}

fn total_tax_from_taxes(taxes: &[TaxField], totals: &mut Totals, scope: PageScope) {
    if taxes.is_empty() {
        return;
    }
    let value = array_sum(taxes);
    if value <= 0.0 {
        return;
    }
    let confidence = array_confidence(taxes);
    debug!("Reconstructed total_tax={} from {} tax lines", value, taxes.len());
    totals.total_tax = AmountField::reconstructed(Some(value), Some(confidence), scope.page_id());
}

fn total_net_from_amount_and_taxes(taxes: &[TaxField], totals: &mut Totals) {
    let Some(total_amount) = totals.total_amount.amount() else {
        return;
    };
    if taxes.is_empty() || totals.total_net.has_value() {
        return;
    }
    let value = total_amount - array_sum(taxes);
    let confidence = array_confidence(taxes) * totals.total_amount.confidence().unwrap_or(0.0);
    debug!("Reconstructed total_net={} from total_amount and taxes", value);
    totals.total_net = AmountField::reconstructed(Some(value), Some(confidence), None);
}

fn total_amount_from_net_and_taxes(taxes: &[TaxField], totals: &mut Totals) {
    let Some(total_net) = totals.total_net.amount() else {
        return;
    };
    if taxes.is_empty() || totals.total_amount.has_value() {
        return;
    }
    let value = array_sum(taxes) + total_net;
    let confidence = array_confidence(taxes) * totals.total_net.confidence().unwrap_or(0.0);
    debug!("Reconstructed total_amount={} from total_net and taxes", value);
    totals.total_amount = AmountField::reconstructed(Some(value), Some(confidence), None);
}

fn total_tax_from_totals(taxes: &[TaxField], totals: &mut Totals) {
    if totals.total_tax.has_value() {
        return;
    }
    let (Some(total_amount), Some(total_net)) = (totals.total_amount.amount(), totals.total_net.amount())
    else {
        return;
    };
    let value = total_amount - total_net;
    if value < 0.0 {
        return;
    }
    // confidence comes from the tax lines, not from the two totals
    let confidence = array_confidence(taxes);
    debug!("Reconstructed total_tax={} from total_amount - total_net", value);
    totals.total_tax = AmountField::reconstructed(Some(value), Some(confidence), None);
}
