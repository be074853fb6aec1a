//! Attribution & Summary Engine.
//!
//! Pure aggregation over snapshots of the ledgers. Nothing here reads
//! storage or holds state; callers fetch the rows and hand them in, so the
//! totals are recomputed on every read and never block writes.

use rust_decimal::Decimal;
use sea_orm::ActiveEnum;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::expenses::{self, PaidBy};
use crate::models::payments::{self, PaymentStatus};

/// Totals for a set of expenses, split by payer side and category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseSummary {
    pub total_spent: Decimal,
    pub total_by_owner: Decimal,
    pub total_by_contractor: Decimal,
    pub by_category: BTreeMap<String, Decimal>,
}

/// Sum a set of expenses.
///
/// Additive by construction: `total_spent` is always the sum of the owner
/// and contractor buckets, since `paid_by` is a two-valued enum.
pub fn expense_summary(expenses: &[expenses::Model]) -> ExpenseSummary {
    let mut total_spent = Decimal::ZERO;
    let mut total_by_owner = Decimal::ZERO;
    let mut total_by_contractor = Decimal::ZERO;
    let mut by_category: BTreeMap<String, Decimal> = BTreeMap::new();

    for expense in expenses {
        total_spent += expense.amount;
        match expense.paid_by {
            PaidBy::Owner => total_by_owner += expense.amount,
            PaidBy::Contractor => total_by_contractor += expense.amount,
        }
        *by_category.entry(expense.category.to_value()).or_default() += expense.amount;
    }

    ExpenseSummary {
        total_spent,
        total_by_owner,
        total_by_contractor,
        by_category,
    }
}

/// Totals for a set of payments, keyed off the acknowledgement status.
///
/// Disputed amounts are excluded from both the confirmed and pending totals
/// and surfaced separately so they stay visible without inflating either.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentSummary {
    pub total_confirmed: Decimal,
    pub total_pending: Decimal,
    pub total_disputed: Decimal,
}

pub fn payment_summary(payments: &[payments::Model]) -> PaymentSummary {
    let mut total_confirmed = Decimal::ZERO;
    let mut total_pending = Decimal::ZERO;
    let mut total_disputed = Decimal::ZERO;

    for payment in payments {
        match payment.status {
            PaymentStatus::Confirmed => total_confirmed += payment.amount,
            PaymentStatus::Pending => total_pending += payment.amount,
            PaymentStatus::Disputed => total_disputed += payment.amount,
        }
    }

    PaymentSummary {
        total_confirmed,
        total_pending,
        total_disputed,
    }
}
