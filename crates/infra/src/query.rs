//! Thin query/read layer over the product record store.
//!
//! Pure reads, offset pagination, no business logic. The development view
//! (everything under review) and the live view (approved + published) mirror
//! what the dashboards display.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use makerstore_core::{Price, ProductId, RoyaltyPercent, UserId};
use makerstore_workflow::{Submission, WorkflowState};

use crate::memory::InMemoryProductStore;

const DEFAULT_PER_PAGE: usize = 10;

/// List filter; all criteria are optional and conjunctive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmissionFilter {
    pub state: Option<WorkflowState>,
    pub designer_id: Option<UserId>,
    /// Case-insensitive substring match on the title.
    pub search: Option<String>,
    /// 1-based page index.
    pub page: usize,
    pub per_page: usize,
}

impl SubmissionFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn with_state(mut self, state: WorkflowState) -> Self {
        self.state = Some(state);
        self
    }

    pub fn with_designer(mut self, designer_id: UserId) -> Self {
        self.designer_id = Some(designer_id);
        self
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    pub fn with_page(mut self, page: usize, per_page: usize) -> Self {
        self.page = page;
        self.per_page = per_page;
        self
    }

    fn matches(&self, record: &Submission) -> bool {
        if let Some(state) = self.state {
            if record.state() != state {
                return false;
            }
        }
        if let Some(designer_id) = self.designer_id {
            if record.designer_id() != Some(designer_id) {
                return false;
            }
        }
        if let Some(search) = &self.search {
            let needle = search.to_lowercase();
            if !record.title().to_lowercase().contains(&needle) {
                return false;
            }
        }
        true
    }
}

/// One page of results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total_items: usize,
    pub total_pages: usize,
}

/// Listing row: the fields the dashboards render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionSummary {
    pub id: ProductId,
    pub title: String,
    pub designer_id: Option<UserId>,
    pub state: WorkflowState,
    /// Effective price: final if set, else the designer's proposal.
    pub price: Option<Price>,
    pub price_is_final: bool,
    pub royalty: Option<RoyaltyPercent>,
    pub has_pending_proposal: bool,
    pub archived: bool,
    pub submitted_at: Option<DateTime<Utc>>,
}

impl SubmissionSummary {
    pub fn from_record(record: &Submission) -> Self {
        Self {
            id: record.id_typed(),
            title: record.title().to_string(),
            designer_id: record.designer_id(),
            state: record.state(),
            price: record.effective_price(),
            price_is_final: record.price_is_final(),
            royalty: record.royalty_percent(),
            has_pending_proposal: record.has_pending_proposal(),
            archived: record.archived(),
            submitted_at: record.audit_log().first_timestamp(),
        }
    }
}

/// Designer portfolio: everything they submitted vs. what is live.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PortfolioCounts {
    pub total_designs: usize,
    pub live_products: usize,
}

/// Read-only listing surface.
pub trait SubmissionQuery {
    /// Records matching the filter across all workflow states.
    fn list(&self, filter: &SubmissionFilter) -> Page<SubmissionSummary>;

    /// Records still in the review pipeline (everything not approved).
    fn list_development(&self, filter: &SubmissionFilter) -> Page<SubmissionSummary>;

    /// Approved records whose catalog listing is currently live.
    fn list_published(&self, filter: &SubmissionFilter) -> Page<SubmissionSummary>;

    /// Submission counts per workflow state (dashboard tiles).
    fn stats(&self) -> BTreeMap<String, usize>;

    fn portfolio_counts(&self, designer_id: UserId) -> PortfolioCounts;
}

fn paginate<T>(items: Vec<T>, page: usize, per_page: usize) -> Page<T> {
    let per_page = if per_page == 0 {
        DEFAULT_PER_PAGE
    } else {
        per_page
    };
    let page = page.max(1);
    let total_items = items.len();
    let total_pages = total_items.div_ceil(per_page);

    let items = items
        .into_iter()
        .skip((page - 1) * per_page)
        .take(per_page)
        .collect();

    Page {
        items,
        total_items,
        total_pages,
    }
}

impl InMemoryProductStore {
    /// Matching records, newest submission first.
    fn collect(&self, filter: &SubmissionFilter, published_only: bool) -> Vec<SubmissionSummary> {
        let slots = match self.slots.read() {
            Ok(slots) => slots,
            Err(_) => return Vec::new(),
        };

        let mut rows: Vec<SubmissionSummary> = slots
            .values()
            .filter(|slot| !slot.trashed)
            .filter(|slot| !published_only || slot.published)
            .filter(|slot| filter.matches(&slot.record))
            .map(|slot| SubmissionSummary::from_record(&slot.record))
            .collect();

        rows.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at).then(a.id.as_uuid().cmp(b.id.as_uuid())));
        rows
    }
}

impl SubmissionQuery for InMemoryProductStore {
    fn list(&self, filter: &SubmissionFilter) -> Page<SubmissionSummary> {
        paginate(self.collect(filter, false), filter.page, filter.per_page)
    }

    fn list_development(&self, filter: &SubmissionFilter) -> Page<SubmissionSummary> {
        let rows = self
            .collect(filter, false)
            .into_iter()
            .filter(|row| row.state.in_development())
            .collect();
        paginate(rows, filter.page, filter.per_page)
    }

    fn list_published(&self, filter: &SubmissionFilter) -> Page<SubmissionSummary> {
        let filter = filter.clone().with_state(WorkflowState::Approved);
        paginate(self.collect(&filter, true), filter.page, filter.per_page)
    }

    fn stats(&self) -> BTreeMap<String, usize> {
        let mut counts: BTreeMap<String, usize> = WorkflowState::ALL
            .iter()
            .map(|s| (s.as_str().to_string(), 0))
            .collect();

        if let Ok(slots) = self.slots.read() {
            for slot in slots.values().filter(|slot| !slot.trashed) {
                *counts
                    .entry(slot.record.state().as_str().to_string())
                    .or_insert(0) += 1;
            }
        }
        counts
    }

    fn portfolio_counts(&self, designer_id: UserId) -> PortfolioCounts {
        let slots = match self.slots.read() {
            Ok(slots) => slots,
            Err(_) => {
                return PortfolioCounts {
                    total_designs: 0,
                    live_products: 0,
                }
            }
        };

        let mine = slots
            .values()
            .filter(|slot| !slot.trashed)
            .filter(|slot| slot.record.designer_id() == Some(designer_id));

        let mut total_designs = 0;
        let mut live_products = 0;
        for slot in mine {
            total_designs += 1;
            if slot.record.state() == WorkflowState::Approved && slot.published {
                live_products += 1;
            }
        }

        PortfolioCounts {
            total_designs,
            live_products,
        }
    }
}
