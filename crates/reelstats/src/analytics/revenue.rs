use crate::model::{PaymentStatus, RevenueStream, TransactionRecord};

use super::window::DayWindow;

/// Payment totals for the target day.
///
/// `total_revenue` also includes completed payments whose type matches no
/// bucket, so it is always at least the sum of the three buckets.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RevenueMetrics {
    pub total_revenue: f64,
    pub subscription_revenue: f64,
    pub event_revenue: f64,
    pub ppv_revenue: f64,
    pub successful_payments: u64,
    pub failed_payments: u64,
}

impl RevenueMetrics {
    /// Folds the transactions created inside the window.
    ///
    /// Statuses other than completed and failed (pending, refunded, missing)
    /// are neither counted nor summed.
    pub fn collect(transactions: &[TransactionRecord], window: &DayWindow) -> Self {
        transactions
            .iter()
            .filter(|txn| txn.created_at.is_some_and(|at| window.contains(at)))
            .fold(Self::default(), |acc, txn| acc.record(txn))
    }

    fn record(self, txn: &TransactionRecord) -> Self {
        match txn.status {
            PaymentStatus::Completed => {
                let amount = txn.amount.unwrap_or(0.0);
                let mut next = Self {
                    total_revenue: self.total_revenue + amount,
                    successful_payments: self.successful_payments + 1,
                    ..self
                };
                match txn.stream {
                    RevenueStream::Subscription => next.subscription_revenue += amount,
                    RevenueStream::Event => next.event_revenue += amount,
                    RevenueStream::Ppv => next.ppv_revenue += amount,
                    RevenueStream::Other => {}
                }
                next
            }
            PaymentStatus::Failed => Self {
                failed_payments: self.failed_payments + 1,
                ..self
            },
            PaymentStatus::Other => self,
        }
    }
}
