//! Dollar totals of court transactions, split into the buckets a closing
//! reconciles against.

use serde::{Deserialize, Serialize};

use crate::{CourtTransaction, CourtTransactionKind, Money};

/// Which summary bucket a court transaction feeds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CourtBucket {
    CreditCollected,
    AdvanceOrSuspended,
    Excluded,
}

impl CourtTransactionKind {
    /// Every kind maps to exactly one bucket.
    #[must_use]
    pub fn bucket(self) -> CourtBucket {
        match self {
            Self::CreditCollection => CourtBucket::CreditCollected,
            Self::AdvancePayment | Self::SuspensionCredit => CourtBucket::AdvanceOrSuspended,
            Self::NormalRental => CourtBucket::Excluded,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourtSummary {
    pub credit_collected_usd: Money,
    pub advance_suspended_usd: Money,
    /// Amounts of kinds that do not take part in the closing adjustments.
    pub excluded_usd: Money,
    pub transactions: usize,
}

impl CourtSummary {
    /// Folds transactions into their buckets. The caller decides which
    /// transactions are in scope (usually one business day).
    pub fn from_transactions<'a, I>(transactions: I) -> Self
    where
        I: IntoIterator<Item = &'a CourtTransaction>,
    {
        transactions
            .into_iter()
            .fold(Self::default(), |mut acc, tx| {
                acc.add(tx.kind, tx.amount_usd);
                acc
            })
    }

    fn add(&mut self, kind: CourtTransactionKind, amount_usd: Money) {
        let slot = match kind.bucket() {
            CourtBucket::CreditCollected => &mut self.credit_collected_usd,
            CourtBucket::AdvanceOrSuspended => &mut self.advance_suspended_usd,
            CourtBucket::Excluded => &mut self.excluded_usd,
        };
        *slot = slot.saturating_add(amount_usd);
        self.transactions += 1;
    }

    /// Sum of all three buckets.
    #[must_use]
    pub fn total_usd(&self) -> Money {
        self.credit_collected_usd
            .saturating_add(self.advance_suspended_usd)
            .saturating_add(self.excluded_usd)
    }
}
