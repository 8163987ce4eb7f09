//! Wallet transaction grouping for list rendering.

use serde::Serialize;
use time::{Duration, OffsetDateTime, Time};

use crate::models::WalletTransaction;

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionBucket {
    #[serde(rename = "Today")]
    Today,
    #[serde(rename = "Last Week")]
    LastWeek,
    #[serde(rename = "Last Month")]
    LastMonth,
}

impl TransactionBucket {
    pub const ORDER: [TransactionBucket; 3] = [
        TransactionBucket::Today,
        TransactionBucket::LastWeek,
        TransactionBucket::LastMonth,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            TransactionBucket::Today => "Today",
            TransactionBucket::LastWeek => "Last Week",
            TransactionBucket::LastMonth => "Last Month",
        }
    }

    /// Bucket for `timestamp`, with "today" starting at midnight in `now`'s offset.
    pub fn classify(timestamp: OffsetDateTime, now: OffsetDateTime) -> Self {
        let start_of_today = now.replace_time(Time::MIDNIGHT);
        let start_of_last_week = start_of_today - Duration::days(7);

        if timestamp >= start_of_today {
            TransactionBucket::Today
        } else if timestamp >= start_of_last_week {
            TransactionBucket::LastWeek
        } else {
            TransactionBucket::LastMonth
        }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum TransactionListItem {
    Header(TransactionBucket),
    Item(WalletTransaction),
}

/// Flattens transactions into header/member runs, newest first.
///
/// Buckets appear in the fixed order Today, Last Week, Last Month; empty
/// buckets get no header. `max_items` truncates after sorting.
pub fn group_transactions(
    transactions: &[WalletTransaction],
    now: OffsetDateTime,
    max_items: Option<usize>,
) -> Vec<TransactionListItem> {
    if transactions.is_empty() {
        return Vec::new();
    }

    let mut sorted: Vec<&WalletTransaction> = transactions.iter().collect();
    sorted.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    if let Some(limit) = max_items {
        sorted.truncate(limit);
    }

    let mut buckets: [Vec<&WalletTransaction>; 3] = [Vec::new(), Vec::new(), Vec::new()];
    for transaction in sorted {
        let index = match TransactionBucket::classify(transaction.timestamp, now) {
            TransactionBucket::Today => 0,
            TransactionBucket::LastWeek => 1,
            TransactionBucket::LastMonth => 2,
        };
        buckets[index].push(transaction);
    }

    let mut items = Vec::new();
    for (bucket, members) in TransactionBucket::ORDER.iter().zip(buckets) {
        if members.is_empty() {
            continue;
        }
        items.push(TransactionListItem::Header(*bucket));
        items.extend(
            members
                .into_iter()
                .map(|transaction| TransactionListItem::Item(transaction.clone())),
        );
    }

    items
}
