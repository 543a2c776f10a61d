//! Sponsor ad moderation and rotation
//!
//! Submissions always enter as PENDING and stay out of the public rotation
//! until an admin approves them. Approval changes only the status.
//! Rejection deletes the record outright (the session performs the delete);
//! `AdStatus::Rejected` exists in the wire format for documents written by
//! other frontends but this service never writes it.

use chrono::{DateTime, Utc};
use common::{Ad, AdStatus};
use uuid::Uuid;

/// Fields a sponsor fills in
#[derive(Debug, Clone)]
pub struct AdSubmission {
    pub company: String,
    pub text: String,
    pub uri: Option<String>,
    pub color: String,
}

impl AdSubmission {
    /// Materialize a pending ad with a fresh id and the given timestamp.
    pub fn into_pending(self, now: DateTime<Utc>) -> Ad {
        Ad {
            id: Uuid::new_v4().to_string(),
            company: self.company,
            text: self.text,
            uri: self.uri,
            color: self.color,
            status: AdStatus::Pending,
            timestamp: now,
        }
    }
}

/// Status-only approval transition
pub fn approve(ad: &mut Ad) {
    ad.status = AdStatus::Active;
}

/// Ads eligible for the public rotation
pub fn active_ads(ads: &[Ad]) -> Vec<&Ad> {
    ads.iter().filter(|a| a.status == AdStatus::Active).collect()
}

/// One placement slot's view of the rotation
///
/// Each slot starts at its own offset so two simultaneous placements don't
/// show identical content; a fixed timer calls `advance`.
#[derive(Debug)]
pub struct AdRotation {
    position: usize,
}

impl AdRotation {
    /// Slot with a random starting offset
    pub fn new() -> Self {
        Self {
            position: fastrand::usize(..usize::MAX),
        }
    }

    /// Slot with a fixed starting offset (e.g. left = 0, right = 5)
    pub fn with_offset(offset: usize) -> Self {
        Self { position: offset }
    }

    /// The ACTIVE ad currently shown in this slot, if any
    pub fn current<'a>(&self, ads: &'a [Ad]) -> Option<&'a Ad> {
        let active = active_ads(ads);
        if active.is_empty() {
            return None;
        }
        Some(active[self.position % active.len()])
    }

    pub fn advance(&mut self) {
        self.position = self.position.wrapping_add(1);
    }
}

impl Default for AdRotation {
    fn default() -> Self {
        Self::new()
    }
}
