use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use makerstore_core::{Price, RoyaltyPercent, UserId, ValueObject};

/// An admin-initiated price/royalty suggestion awaiting designer
/// confirmation.
///
/// Present on a record **iff** the record sits in `ChangesRequested` because
/// of a price proposal (as opposed to a moderator content-change request);
/// its presence is what disambiguates the two flows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingProposal {
    pub price: Price,
    pub royalty: RoyaltyPercent,
    pub notes: Option<String>,
    pub proposed_by: UserId,
    pub proposed_at: DateTime<Utc>,
}

impl ValueObject for PendingProposal {}
