//! List query: search term, sort order, and pagination.
//!
//! Sorting always places `null` values last, in either direction, so
//! unscored companies sit at the end of a `-ethics_score` listing.

use std::cmp::Ordering;

use crate::company::Company;
use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Pagination defaults
// ---------------------------------------------------------------------------

/// Default number of companies per page.
pub const DEFAULT_LIMIT: u32 = 50;

/// Maximum number of companies per page.
pub const MAX_LIMIT: u32 = 200;

/// Default sort when the caller does not supply one.
pub const DEFAULT_ORDER: &str = "-ethics_score";

// ---------------------------------------------------------------------------
// Sort field / order
// ---------------------------------------------------------------------------

/// Columns a listing may be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Id,
    Name,
    Ticker,
    EthicsScore,
    SourceReason,
    LastUpdated,
}

impl SortField {
    pub const ALL: [SortField; 6] = [
        SortField::Id,
        SortField::Name,
        SortField::Ticker,
        SortField::EthicsScore,
        SortField::SourceReason,
        SortField::LastUpdated,
    ];

    /// Column name as used by the store.
    pub fn as_str(self) -> &'static str {
        match self {
            SortField::Id => "id",
            SortField::Name => "name",
            SortField::Ticker => "ticker",
            SortField::EthicsScore => "ethics_score",
            SortField::SourceReason => "source_reason",
            SortField::LastUpdated => "last_updated",
        }
    }

    /// Look up a column by name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.as_str() == name)
    }
}

/// A sort column plus direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortOrder {
    pub field: SortField,
    pub descending: bool,
}

impl SortOrder {
    /// Parse `field` or `-field` (descending).
    pub fn parse(raw: &str) -> Result<Self, CoreError> {
        let raw = raw.trim();
        let (name, descending) = match raw.strip_prefix('-') {
            Some(rest) => (rest, true),
            None => (raw, false),
        };
        let field = SortField::from_name(name).ok_or_else(|| {
            let allowed: Vec<&str> = SortField::ALL.iter().map(|f| f.as_str()).collect();
            CoreError::Validation(format!(
                "Invalid order field '{name}'. Must be one of: {}",
                allowed.join(", ")
            ))
        })?;
        Ok(Self { field, descending })
    }

    /// Compare two companies under this order, nulls last.
    pub fn compare(&self, a: &Company, b: &Company) -> Ordering {
        match self.field {
            SortField::Id => self.directed(a.id.cmp(&b.id)),
            SortField::Name => self.directed(a.name.cmp(&b.name)),
            SortField::Ticker => self.nulls_last(a.ticker.as_ref(), b.ticker.as_ref()),
            SortField::EthicsScore => self.nulls_last(a.ethics_score, b.ethics_score),
            SortField::SourceReason => {
                self.nulls_last(a.source_reason.as_ref(), b.source_reason.as_ref())
            }
            SortField::LastUpdated => self.nulls_last(a.last_updated, b.last_updated),
        }
    }

    fn directed(&self, ord: Ordering) -> Ordering {
        if self.descending {
            ord.reverse()
        } else {
            ord
        }
    }

    fn nulls_last<T: Ord>(&self, a: Option<T>, b: Option<T>) -> Ordering {
        match (a, b) {
            (Some(a), Some(b)) => self.directed(a.cmp(&b)),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    }
}

impl Default for SortOrder {
    fn default() -> Self {
        Self {
            field: SortField::EthicsScore,
            descending: true,
        }
    }
}

// ---------------------------------------------------------------------------
// Query
// ---------------------------------------------------------------------------

/// A validated listing request.
#[derive(Debug, Clone, PartialEq)]
pub struct CompanyQuery {
    /// Case-insensitive substring matched against name or ticker.
    pub search: Option<String>,
    pub order: SortOrder,
    pub limit: u32,
    pub offset: u32,
}

impl Default for CompanyQuery {
    fn default() -> Self {
        Self {
            search: None,
            order: SortOrder::default(),
            limit: DEFAULT_LIMIT,
            offset: 0,
        }
    }
}

impl CompanyQuery {
    /// Build a query from raw request parameters, applying defaults.
    pub fn from_params(
        q: Option<&str>,
        order: Option<&str>,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<Self, CoreError> {
        let search = q
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        let order = SortOrder::parse(order.unwrap_or(DEFAULT_ORDER))?;

        let limit = match limit {
            None => DEFAULT_LIMIT,
            Some(l) if (1..=i64::from(MAX_LIMIT)).contains(&l) => l as u32,
            Some(l) => {
                return Err(CoreError::Validation(format!(
                    "limit must be between 1 and {MAX_LIMIT} (got {l})"
                )));
            }
        };

        let offset = match offset {
            None => 0,
            Some(o) if (0..=i64::from(u32::MAX)).contains(&o) => o as u32,
            Some(o) => {
                return Err(CoreError::Validation(format!(
                    "offset must be non-negative (got {o})"
                )));
            }
        };

        Ok(Self {
            search,
            order,
            limit,
            offset,
        })
    }

    /// A page of every company ordered by id, used to enumerate the table.
    pub fn page_by_id(offset: u32, limit: u32) -> Self {
        Self {
            search: None,
            order: SortOrder {
                field: SortField::Id,
                descending: false,
            },
            limit,
            offset,
        }
    }

    /// Whether a company passes the search filter.
    pub fn matches(&self, company: &Company) -> bool {
        let Some(term) = &self.search else {
            return true;
        };
        let term = term.to_lowercase();
        company.name.to_lowercase().contains(&term)
            || company
                .ticker
                .as_ref()
                .is_some_and(|t| t.to_lowercase().contains(&term))
    }
}
