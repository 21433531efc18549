//! Relay-style cursor pagination against the Shopify Admin API.
//!
//! Shopify issues opaque cursors with every connection page. This module
//! turns a cursor and a direction into connection arguments, and tracks
//! which page a session is looking at so "next" and "previous" only ever
//! pair `endCursor` with `after` and `startCursor` with `before`.

use core::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Largest page Shopify serves for a connection.
pub const MAX_PAGE_SIZE: u32 = 250;

// =============================================================================
// Cursor
// =============================================================================

/// Opaque pagination token issued by the remote API.
///
/// Cursors are never decoded or modified, only echoed back on the next query.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cursor(String);

impl Cursor {
    /// Wrap a cursor string returned by the API.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Build a cursor from an optional request parameter.
    ///
    /// Missing and empty parameters both mean "no cursor".
    #[must_use]
    pub fn from_param(param: Option<&str>) -> Option<Self> {
        param.filter(|s| !s.is_empty()).map(Self::new)
    }

    /// Returns the raw token.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// =============================================================================
// Direction
// =============================================================================

/// Which side of the cursor to page towards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Items after the cursor (forward, paired with `endCursor`).
    #[default]
    After,
    /// Items before the cursor (backward, paired with `startCursor`).
    Before,
}

/// Returned when a direction parameter is neither `after` nor `before`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown pagination direction: {0:?} (expected \"after\" or \"before\")")]
pub struct DirectionError(pub String);

impl Direction {
    /// Returns the query-parameter spelling.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::After => "after",
            Self::Before => "before",
        }
    }
}

impl FromStr for Direction {
    type Err = DirectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "after" => Ok(Self::After),
            "before" => Ok(Self::Before),
            other => Err(DirectionError(other.to_string())),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Connection arguments
// =============================================================================

/// Connection arguments for a paginated query (`first/after/last/before`).
///
/// Absent arguments are omitted when serialized as GraphQL variables.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PageArgs {
    /// Page size when paging forward.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first: Option<u32>,
    /// Cursor to page forward from.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub after: Option<Cursor>,
    /// Page size when paging backward.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last: Option<u32>,
    /// Cursor to page backward from.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub before: Option<Cursor>,
}

impl PageArgs {
    /// Arguments for the first page: `first = page_size`.
    #[must_use]
    pub const fn first_page(page_size: u32) -> Self {
        Self {
            first: Some(page_size),
            after: None,
            last: None,
            before: None,
        }
    }

    /// Build connection arguments from a cursor and a direction.
    ///
    /// | cursor | direction | result |
    /// |---|---|---|
    /// | `None` | any | `first = page_size` |
    /// | `Some(c)` | `After` | `first = page_size, after = c` |
    /// | `Some(c)` | `Before` | `last = page_size, before = c` |
    #[must_use]
    pub fn build(cursor: Option<Cursor>, direction: Direction, page_size: u32) -> Self {
        match (cursor, direction) {
            (None, _) => Self::first_page(page_size),
            (Some(cursor), Direction::After) => Self {
                first: Some(page_size),
                after: Some(cursor),
                ..Self::default()
            },
            (Some(cursor), Direction::Before) => Self {
                last: Some(page_size),
                before: Some(cursor),
                ..Self::default()
            },
        }
    }

    /// The cursor and direction these arguments page from, if any.
    ///
    /// Inverse of [`PageArgs::build`]; page links are rendered from it.
    #[must_use]
    pub fn cursor(&self) -> Option<(&Cursor, Direction)> {
        self.after
            .as_ref()
            .map(|c| (c, Direction::After))
            .or_else(|| self.before.as_ref().map(|c| (c, Direction::Before)))
    }
}

// =============================================================================
// Pages
// =============================================================================

/// Pagination information returned alongside a page of nodes.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    /// Whether there are more items after this page.
    pub has_next_page: bool,
    /// Whether there are items before this page.
    pub has_previous_page: bool,
    /// Cursor for the first item (null for an empty page).
    pub start_cursor: Option<Cursor>,
    /// Cursor for the last item (null for an empty page).
    pub end_cursor: Option<Cursor>,
}

impl PageInfo {
    /// Arguments for the page after this one, if there is one.
    #[must_use]
    pub fn next_args(&self, page_size: u32) -> Option<PageArgs> {
        if !self.has_next_page {
            return None;
        }
        self.end_cursor
            .clone()
            .map(|cursor| PageArgs::build(Some(cursor), Direction::After, page_size))
    }

    /// Arguments for the page before this one, if there is one.
    #[must_use]
    pub fn previous_args(&self, page_size: u32) -> Option<PageArgs> {
        if !self.has_previous_page {
            return None;
        }
        self.start_cursor
            .clone()
            .map(|cursor| PageArgs::build(Some(cursor), Direction::Before, page_size))
    }
}

/// One page of records plus its pagination info.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    /// Records in upstream order.
    pub items: Vec<T>,
    /// Pagination boundaries and cursors, verbatim from the API.
    pub page_info: PageInfo,
}

impl<T> Page<T> {
    /// Create a page.
    #[must_use]
    pub const fn new(items: Vec<T>, page_info: PageInfo) -> Self {
        Self { items, page_info }
    }
}

// =============================================================================
// Navigation state machine
// =============================================================================

/// Navigation state of a page browser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NavState {
    /// No load in flight.
    #[default]
    Idle,
    /// Loading the first page or an explicitly requested cursor.
    LoadingFirst,
    /// Loading the page after the current one.
    LoadingNext,
    /// Loading the page before the current one.
    LoadingPrevious,
}

impl fmt::Display for NavState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Idle => "idle",
            Self::LoadingFirst => "loading",
            Self::LoadingNext => "loading next page",
            Self::LoadingPrevious => "loading previous page",
        };
        f.write_str(s)
    }
}

/// Errors from the navigation state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum NavigationError {
    /// A load is already in flight; concurrent navigation is rejected.
    #[error("navigation already in progress ({0})")]
    Busy(NavState),
}

/// Tracks the current page of a paginated list and serializes navigation.
///
/// ```text
/// Idle --next [has_next_page]--> LoadingNext --complete--> Idle
/// Idle --previous [has_previous_page]--> LoadingPrevious --complete--> Idle
/// Idle --jump / first_page--> LoadingFirst --complete--> Idle
/// Loading* --abort--> Idle (page unchanged)
/// ```
///
/// `next`/`previous` without a neighbouring page are no-ops that return
/// `Ok(None)` and stay `Idle`. Any request while not `Idle` is `Busy`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigator {
    page_size: u32,
    state: NavState,
    page_info: Option<PageInfo>,
    current: Option<PageArgs>,
    pending: Option<PageArgs>,
}

impl Navigator {
    /// Create a navigator with no page loaded yet.
    #[must_use]
    pub const fn new(page_size: u32) -> Self {
        Self {
            page_size,
            state: NavState::Idle,
            page_info: None,
            current: None,
            pending: None,
        }
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> NavState {
        self.state
    }

    /// Page size used for every request.
    #[must_use]
    pub const fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Page info of the last completed load.
    #[must_use]
    pub const fn page_info(&self) -> Option<&PageInfo> {
        self.page_info.as_ref()
    }

    /// Request the first page.
    ///
    /// # Errors
    ///
    /// Returns `NavigationError::Busy` if a load is in flight.
    pub fn first_page(&mut self) -> Result<PageArgs, NavigationError> {
        self.jump(None, Direction::After)
    }

    /// Request the page at an explicit cursor.
    ///
    /// # Errors
    ///
    /// Returns `NavigationError::Busy` if a load is in flight.
    pub fn jump(
        &mut self,
        cursor: Option<Cursor>,
        direction: Direction,
    ) -> Result<PageArgs, NavigationError> {
        self.ensure_idle()?;
        let args = PageArgs::build(cursor, direction, self.page_size);
        Ok(self.begin(NavState::LoadingFirst, args))
    }

    /// Request the current page again (the first page if none is loaded).
    ///
    /// # Errors
    ///
    /// Returns `NavigationError::Busy` if a load is in flight.
    pub fn reload(&mut self) -> Result<PageArgs, NavigationError> {
        self.ensure_idle()?;
        let args = self
            .current
            .clone()
            .unwrap_or_else(|| PageArgs::first_page(self.page_size));
        Ok(self.begin(NavState::LoadingFirst, args))
    }

    /// Request the next page.
    ///
    /// Returns `Ok(None)` without changing state when there is no next page.
    ///
    /// # Errors
    ///
    /// Returns `NavigationError::Busy` if a load is in flight.
    pub fn next(&mut self) -> Result<Option<PageArgs>, NavigationError> {
        self.ensure_idle()?;
        let args = self
            .page_info
            .as_ref()
            .and_then(|info| info.next_args(self.page_size));
        Ok(args.map(|args| self.begin(NavState::LoadingNext, args)))
    }

    /// Request the previous page.
    ///
    /// Returns `Ok(None)` without changing state when there is no previous page.
    ///
    /// # Errors
    ///
    /// Returns `NavigationError::Busy` if a load is in flight.
    pub fn previous(&mut self) -> Result<Option<PageArgs>, NavigationError> {
        self.ensure_idle()?;
        let args = self
            .page_info
            .as_ref()
            .and_then(|info| info.previous_args(self.page_size));
        Ok(args.map(|args| self.begin(NavState::LoadingPrevious, args)))
    }

    /// Record a finished load and return to `Idle`.
    pub fn complete(&mut self, page_info: PageInfo) {
        self.page_info = Some(page_info);
        if let Some(args) = self.pending.take() {
            self.current = Some(args);
        }
        self.state = NavState::Idle;
    }

    /// Abandon an in-flight load and return to `Idle`, keeping the old page.
    pub fn abort(&mut self) {
        self.pending = None;
        self.state = NavState::Idle;
    }

    fn begin(&mut self, state: NavState, args: PageArgs) -> PageArgs {
        self.state = state;
        self.pending = Some(args.clone());
        args
    }

    const fn ensure_idle(&self) -> Result<(), NavigationError> {
        match self.state {
            NavState::Idle => Ok(()),
            busy => Err(NavigationError::Busy(busy)),
        }
    }
}
