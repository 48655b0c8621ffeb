//! Navigation state machine.
//!
//! Every transition builds the next [`NavigationState`] from a copy of the
//! current one and commits it only once all fallible steps (fetch, push, pop)
//! have succeeded, so a rejected or cancelled transition leaves the state
//! untouched.

use std::num::NonZeroUsize;
use std::sync::Arc;

use log::{debug, info};

use super::breadcrumbs::BreadcrumbStack;
use super::cache::ListingCache;
use super::paginator::{self, Page};
use crate::error::NavError;
use crate::remote::{DirectoryListing, Entry, ListingProvider};

/// Abstract input understood by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavEvent {
    MoveSelectionDown,
    MoveSelectionUp,
    Enter,
    GoBack,
    Quit,
}

/// What a handled event did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Moved,
    Unchanged,
    Descended,
    Ascended,
    Quit,
}

/// Where the user is: breadcrumbs, page and row within the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationState {
    pub breadcrumbs: BreadcrumbStack,
    pub page_index: usize,
    pub selected_row: usize,
}

impl NavigationState {
    pub fn new(breadcrumbs: BreadcrumbStack) -> Self {
        Self {
            breadcrumbs,
            page_index: 0,
            selected_row: 0,
        }
    }

    pub fn current_path(&self) -> &str {
        self.breadcrumbs.current()
    }

    fn reset_position(&mut self) {
        self.page_index = 0;
        self.selected_row = 0;
    }
}

/// One visible row of the screen model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub entry: Entry,
    pub selected: bool,
}

/// Read-only snapshot handed to the renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenModel {
    pub breadcrumb: String,
    pub rows: Vec<Row>,
    pub has_previous_page: bool,
    pub has_next_page: bool,
    pub page_index: usize,
    pub page_count: usize,
    pub total_entries: usize,
    pub status_message: Option<String>,
    /// The status message reports a failure.
    pub status_is_error: bool,
    /// Set once `Quit` has been handled.
    pub exit: bool,
}

/// Row below the selection, continuing onto the next page.
fn step_down(
    state: &NavigationState,
    listing: &DirectoryListing,
    page_size: NonZeroUsize,
) -> Option<NavigationState> {
    let page = paginator::page(listing, page_size, state.page_index);
    if page.is_empty() {
        return None;
    }
    let mut next = state.clone();
    if state.selected_row + 1 < page.len() {
        next.selected_row += 1;
    } else if page.index < paginator::last_page_index(listing.len(), page_size) {
        next.page_index = page.index + 1;
        next.selected_row = 0;
    } else {
        return None;
    }
    Some(next)
}

/// Row above the selection, continuing onto the last row of the previous page.
fn step_up(
    state: &NavigationState,
    listing: &DirectoryListing,
    page_size: NonZeroUsize,
) -> Option<NavigationState> {
    let page = paginator::page(listing, page_size, state.page_index);
    if page.is_empty() {
        return None;
    }
    let mut next = state.clone();
    if state.selected_row > 0 {
        next.selected_row = (state.selected_row - 1).min(page.len() - 1);
    } else if page.index > 0 {
        let previous = paginator::page(listing, page_size, page.index - 1);
        next.page_index = previous.index;
        next.selected_row = previous.len() - 1;
    } else {
        return None;
    }
    Some(next)
}

pub struct NavigationEngine<P> {
    cache: ListingCache<P>,
    page_size: NonZeroUsize,
    state: NavigationState,
    listing: Arc<DirectoryListing>,
    status: Option<String>,
    status_is_error: bool,
    finished: bool,
}

impl<P: ListingProvider> NavigationEngine<P> {
    /// Fetch the starting directory and build the initial state.
    pub async fn start(
        mut cache: ListingCache<P>,
        breadcrumbs: BreadcrumbStack,
        page_size: NonZeroUsize,
    ) -> Result<Self, NavError> {
        let listing = cache.get(breadcrumbs.current()).await?;
        info!(
            "browsing {} ({} entries, page size {page_size})",
            breadcrumbs.render(),
            listing.len()
        );
        Ok(Self {
            cache,
            page_size,
            state: NavigationState::new(breadcrumbs),
            listing,
            status: None,
            status_is_error: false,
            finished: false,
        })
    }

    pub fn state(&self) -> &NavigationState {
        &self.state
    }

    #[allow(dead_code)]
    pub fn cache(&self) -> &ListingCache<P> {
        &self.cache
    }

    #[allow(dead_code)]
    pub fn page_size(&self) -> NonZeroUsize {
        self.page_size
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Show an informational message until the next handled event.
    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status = Some(message.into());
        self.status_is_error = false;
    }

    fn current_page(&self) -> Page<'_> {
        paginator::page(&self.listing, self.page_size, self.state.page_index)
    }

    /// Entry under the cursor, if the directory is non-empty.
    pub fn selected_entry(&self) -> Option<&Entry> {
        self.current_page().entries.get(self.state.selected_row)
    }

    /// Whether handling `event` would need a provider call.
    pub fn needs_fetch(&self, event: NavEvent) -> bool {
        match event {
            NavEvent::Enter => self.selected_entry().is_some_and(|e| {
                e.is_dir
                    && !self
                        .cache
                        .contains(&crate::remote::child_path(self.state.current_path(), &e.name))
            }),
            NavEvent::GoBack => {
                let paths = self.state.breadcrumbs.paths();
                paths.len() > 1 && !self.cache.contains(&paths[paths.len() - 2])
            }
            _ => false,
        }
    }

    /// Apply one event. On `Err` the state is exactly as before the call.
    pub async fn handle(&mut self, event: NavEvent) -> Result<Transition, NavError> {
        if self.finished {
            return Ok(Transition::Unchanged);
        }

        let result = match event {
            NavEvent::MoveSelectionDown => {
                Ok(self.commit_move(step_down(&self.state, &self.listing, self.page_size)))
            }
            NavEvent::MoveSelectionUp => {
                Ok(self.commit_move(step_up(&self.state, &self.listing, self.page_size)))
            }
            NavEvent::Enter => self.enter().await,
            NavEvent::GoBack => self.go_back().await,
            NavEvent::Quit => {
                info!("quit at {}", self.state.breadcrumbs.render());
                self.finished = true;
                Ok(Transition::Quit)
            }
        };

        self.status_is_error = false;
        match &result {
            Err(e) if !e.is_silent() => {
                self.status = Some(e.to_string());
                self.status_is_error = true;
            }
            Err(e) => {
                debug!("{event:?} ignored: {e}");
                self.status = None;
            }
            Ok(_) => self.status = None,
        }
        result
    }

    fn commit_move(&mut self, next: Option<NavigationState>) -> Transition {
        match next {
            Some(next) => {
                self.state = next;
                Transition::Moved
            }
            None => Transition::Unchanged,
        }
    }

    async fn enter(&mut self) -> Result<Transition, NavError> {
        let name = match self.selected_entry() {
            Some(entry) if entry.is_dir => entry.name.clone(),
            _ => return Err(NavError::InvalidDescent),
        };

        let mut next = self.state.clone();
        next.breadcrumbs.push(&name)?;
        let listing = self.cache.get(next.current_path()).await?;
        next.reset_position();

        debug!("entered {}", next.breadcrumbs.render());
        self.state = next;
        self.listing = listing;
        Ok(Transition::Descended)
    }

    async fn go_back(&mut self) -> Result<Transition, NavError> {
        let mut next = self.state.clone();
        next.breadcrumbs.pop()?;
        let listing = self.cache.get(next.current_path()).await?;
        next.reset_position();

        debug!("back to {}", next.breadcrumbs.render());
        self.state = next;
        self.listing = listing;
        Ok(Transition::Ascended)
    }

    pub fn snapshot(&self) -> ScreenModel {
        let page = self.current_page();
        let page_count = paginator::page_count(self.listing.len(), self.page_size);
        let rows = page
            .entries
            .iter()
            .enumerate()
            .map(|(i, entry)| Row {
                entry: entry.clone(),
                selected: i == self.state.selected_row,
            })
            .collect();

        ScreenModel {
            breadcrumb: self.state.breadcrumbs.render(),
            rows,
            has_previous_page: page.index > 0,
            has_next_page: page.index + 1 < page_count,
            page_index: page.index,
            page_count,
            total_entries: self.listing.len(),
            status_message: self.status.clone(),
            status_is_error: self.status_is_error,
            exit: self.finished,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::error::ProviderError;
    use crate::test_support::{numbered_files, FakeProvider};

    fn size(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    async fn engine(provider: FakeProvider, page_size: usize) -> NavigationEngine<FakeProvider> {
        NavigationEngine::start(
            ListingCache::new(provider),
            BreadcrumbStack::new("remote", "root"),
            size(page_size),
        )
        .await
        .unwrap()
    }

    fn scenario_provider() -> FakeProvider {
        FakeProvider::new()
            .with_dir(
                "root",
                vec![Entry::dir("dirA"), Entry::file("fileB", 10), Entry::dir("dirC")],
            )
            .with_dir("root/dirA", numbered_files(3))
            .with_dir("root/dirC", vec![Entry::file("inner", 1)])
    }

    fn assert_invariants<P: ListingProvider>(engine: &NavigationEngine<P>) {
        let state = engine.state();
        let total = engine.listing.len();
        assert_eq!(
            Some(state.current_path()),
            state.breadcrumbs.paths().last().map(String::as_str)
        );
        assert!(state.page_index <= paginator::last_page_index(total, engine.page_size));
        let on_page = engine.current_page().len();
        if on_page == 0 {
            assert_eq!(state.selected_row, 0);
        } else {
            assert!(state.selected_row < on_page);
        }
    }

    #[tokio::test]
    async fn initial_state() {
        let e = engine(scenario_provider(), 10).await;
        assert_eq!(e.state().page_index, 0);
        assert_eq!(e.state().selected_row, 0);
        assert_eq!(e.state().breadcrumbs.depth(), 1);
        assert_eq!(e.cache().provider().calls(), ["root"]);
    }

    #[tokio::test]
    async fn start_fails_when_root_unlistable() {
        let result = NavigationEngine::start(
            ListingCache::new(FakeProvider::new()),
            BreadcrumbStack::new("remote", "nope"),
            size(10),
        )
        .await;
        assert!(matches!(result, Err(NavError::FetchFailed { .. })));
    }

    #[tokio::test]
    async fn scenario_a_descend_into_selected_directory() {
        let mut e = engine(scenario_provider(), 10).await;
        e.handle(NavEvent::MoveSelectionDown).await.unwrap();
        e.handle(NavEvent::MoveSelectionDown).await.unwrap();
        assert_eq!(e.state().selected_row, 2);
        assert_eq!(e.selected_entry().unwrap().name, "dirC");

        assert_eq!(e.handle(NavEvent::Enter).await, Ok(Transition::Descended));
        assert_eq!(e.state().breadcrumbs.paths(), ["root", "root/dirC"]);
        assert_eq!(e.state().page_index, 0);
        assert_eq!(e.state().selected_row, 0);
        assert_eq!(e.cache().provider().calls_for("root/dirC"), 1);
        assert_invariants(&e);
    }

    #[tokio::test]
    async fn scenario_b_go_back_hits_cache() {
        let mut e = engine(scenario_provider(), 10).await;
        e.handle(NavEvent::MoveSelectionDown).await.unwrap();
        e.handle(NavEvent::MoveSelectionDown).await.unwrap();
        e.handle(NavEvent::Enter).await.unwrap();

        assert_eq!(e.handle(NavEvent::GoBack).await, Ok(Transition::Ascended));
        assert_eq!(e.state().breadcrumbs.paths(), ["root"]);
        assert_eq!(e.state().page_index, 0);
        assert_eq!(e.state().selected_row, 0);
        assert_eq!(e.cache().provider().calls_for("root"), 1);
        assert_invariants(&e);
    }

    #[tokio::test]
    async fn scenario_c_scroll_across_page_boundary() {
        let provider = FakeProvider::new().with_dir("root", numbered_files(25));
        let mut e = engine(provider, 10).await;
        for _ in 0..9 {
            e.handle(NavEvent::MoveSelectionDown).await.unwrap();
        }
        assert_eq!((e.state().page_index, e.state().selected_row), (0, 9));

        e.handle(NavEvent::MoveSelectionDown).await.unwrap();
        assert_eq!((e.state().page_index, e.state().selected_row), (1, 0));
        assert_eq!(e.selected_entry().unwrap().name, "f10");

        e.handle(NavEvent::MoveSelectionUp).await.unwrap();
        assert_eq!((e.state().page_index, e.state().selected_row), (0, 9));
        assert_invariants(&e);
    }

    #[tokio::test]
    async fn scenario_d_enter_on_file_is_noop() {
        let mut e = engine(scenario_provider(), 10).await;
        e.handle(NavEvent::MoveSelectionDown).await.unwrap();
        let before = e.state().clone();
        let calls_before = e.cache().provider().calls().len();

        assert_eq!(e.handle(NavEvent::Enter).await, Err(NavError::InvalidDescent));
        assert_eq!(e.state(), &before);
        assert_eq!(e.cache().provider().calls().len(), calls_before);
        assert!(e.snapshot().status_message.is_none());
    }

    #[tokio::test]
    async fn scenario_e_go_back_at_root_is_silent() {
        let mut e = engine(scenario_provider(), 10).await;
        let before = e.state().clone();
        assert_eq!(e.handle(NavEvent::GoBack).await, Err(NavError::AtRoot));
        assert_eq!(e.state(), &before);
        assert!(e.snapshot().status_message.is_none());
    }

    #[tokio::test]
    async fn no_wraparound_at_extremes() {
        let provider = FakeProvider::new().with_dir("root", numbered_files(12));
        let mut e = engine(provider, 5).await;
        assert_eq!(e.handle(NavEvent::MoveSelectionUp).await, Ok(Transition::Unchanged));
        assert_eq!((e.state().page_index, e.state().selected_row), (0, 0));

        for _ in 0..11 {
            e.handle(NavEvent::MoveSelectionDown).await.unwrap();
        }
        assert_eq!((e.state().page_index, e.state().selected_row), (2, 1));
        assert_eq!(e.handle(NavEvent::MoveSelectionDown).await, Ok(Transition::Unchanged));
        assert_eq!((e.state().page_index, e.state().selected_row), (2, 1));
        assert_invariants(&e);
    }

    #[tokio::test]
    async fn walk_whole_listing_keeps_invariants() {
        let provider = FakeProvider::new().with_dir("root", numbered_files(23));
        let mut e = engine(provider, 4).await;
        for _ in 0..30 {
            e.handle(NavEvent::MoveSelectionDown).await.unwrap();
            assert_invariants(&e);
        }
        assert_eq!(e.selected_entry().unwrap().name, "f22");
        for _ in 0..30 {
            e.handle(NavEvent::MoveSelectionUp).await.unwrap();
            assert_invariants(&e);
        }
        assert_eq!(e.selected_entry().unwrap().name, "f00");
    }

    #[tokio::test]
    async fn empty_directory() {
        let provider = FakeProvider::new()
            .with_dir("root", vec![Entry::dir("empty")])
            .with_dir("root/empty", vec![]);
        let mut e = engine(provider, 10).await;
        e.handle(NavEvent::Enter).await.unwrap();

        assert!(e.selected_entry().is_none());
        assert_eq!(e.handle(NavEvent::MoveSelectionDown).await, Ok(Transition::Unchanged));
        assert_eq!(e.handle(NavEvent::MoveSelectionUp).await, Ok(Transition::Unchanged));
        assert_eq!(e.handle(NavEvent::Enter).await, Err(NavError::InvalidDescent));
        assert_invariants(&e);

        let screen = e.snapshot();
        assert!(screen.rows.is_empty());
        assert_eq!(screen.page_count, 1);
        assert!(!screen.has_next_page);
    }

    #[tokio::test]
    async fn fetch_failure_leaves_state_and_reports_status() {
        let provider = FakeProvider::new()
            .with_dir("root", vec![Entry::dir("locked")])
            .failing("root/locked", ProviderError::PermissionDenied);
        let mut e = engine(provider, 10).await;
        let before = e.state().clone();

        let err = e.handle(NavEvent::Enter).await.unwrap_err();
        assert!(matches!(err, NavError::FetchFailed { .. }));
        assert_eq!(e.state(), &before);
        assert!(e.snapshot().status_is_error);
        let status = e.snapshot().status_message.unwrap();
        assert!(status.contains("root/locked"));
        assert!(status.contains("permission denied"));

        // Retry issues a fresh request; a later successful move clears the message.
        assert!(e.handle(NavEvent::Enter).await.is_err());
        assert_eq!(e.cache().provider().calls_for("root/locked"), 2);
        e.handle(NavEvent::MoveSelectionDown).await.unwrap();
        assert!(e.snapshot().status_message.is_none());
    }

    #[tokio::test]
    async fn go_back_refetches_invalidated_parent() {
        let mut e = engine(scenario_provider(), 10).await;
        e.handle(NavEvent::Enter).await.unwrap();
        e.cache.invalidate("root");
        e.handle(NavEvent::GoBack).await.unwrap();
        assert_eq!(e.cache().provider().calls_for("root"), 2);
    }

    #[tokio::test]
    async fn go_back_failure_leaves_state_and_reports_status() {
        let provider = FakeProvider::new()
            .with_dir("root/deep", numbered_files(15))
            .failing("root", ProviderError::Transport {
                message: "connection reset".into(),
            });
        let mut breadcrumbs = BreadcrumbStack::new("remote", "root");
        breadcrumbs.push("deep").unwrap();
        let mut e = NavigationEngine::start(ListingCache::new(provider), breadcrumbs, size(10))
            .await
            .unwrap();
        for _ in 0..12 {
            e.handle(NavEvent::MoveSelectionDown).await.unwrap();
        }
        let before = e.state().clone();
        assert_eq!((before.page_index, before.selected_row), (1, 2));

        let err = e.handle(NavEvent::GoBack).await.unwrap_err();
        assert!(matches!(err, NavError::FetchFailed { ref path, .. } if path == "root"));
        assert_eq!(e.state(), &before);
        assert_eq!(e.snapshot().breadcrumb, "remote:root/deep");
        assert_invariants(&e);

        let screen = e.snapshot();
        assert!(screen.status_is_error);
        assert!(screen.status_message.unwrap().contains("connection reset"));
        assert!(!e.cache().contains("root"));
    }

    #[tokio::test]
    async fn revisiting_directory_does_not_refetch() {
        let mut e = engine(scenario_provider(), 10).await;
        for _ in 0..3 {
            e.handle(NavEvent::Enter).await.unwrap();
            e.handle(NavEvent::GoBack).await.unwrap();
        }
        assert_eq!(e.cache().provider().calls_for("root/dirA"), 1);
        assert_eq!(e.cache().provider().calls_for("root"), 1);
    }

    #[tokio::test]
    async fn cancelled_fetch_leaves_state_untouched() {
        let provider = FakeProvider::new()
            .with_dir("root", vec![Entry::dir("slow")])
            .stalled("root/slow");
        let mut e = engine(provider, 10).await;
        let before = e.state().clone();

        let outcome =
            tokio::time::timeout(Duration::from_millis(20), e.handle(NavEvent::Enter)).await;
        assert!(outcome.is_err());
        assert_eq!(e.state(), &before);
        assert!(!e.cache().contains("root/slow"));
        assert_eq!(e.snapshot().breadcrumb, "remote:root");
    }

    #[tokio::test]
    async fn quit_is_terminal() {
        let mut e = engine(scenario_provider(), 10).await;
        assert_eq!(e.handle(NavEvent::Quit).await, Ok(Transition::Quit));
        assert!(e.is_finished());
        assert!(e.snapshot().exit);

        let before = e.state().clone();
        assert_eq!(e.handle(NavEvent::MoveSelectionDown).await, Ok(Transition::Unchanged));
        assert_eq!(e.handle(NavEvent::Enter).await, Ok(Transition::Unchanged));
        assert_eq!(e.state(), &before);
    }

    #[tokio::test]
    async fn snapshot_marks_selection_and_pages() {
        let provider = FakeProvider::new().with_dir("root", numbered_files(25));
        let mut e = engine(provider, 10).await;
        for _ in 0..12 {
            e.handle(NavEvent::MoveSelectionDown).await.unwrap();
        }
        let screen = e.snapshot();
        assert_eq!(screen.breadcrumb, "remote:root");
        assert_eq!(screen.rows.len(), 10);
        assert_eq!(screen.page_index, 1);
        assert_eq!(screen.page_count, 3);
        assert_eq!(screen.total_entries, 25);
        assert!(screen.has_previous_page);
        assert!(screen.has_next_page);
        let selected: Vec<&str> = screen
            .rows
            .iter()
            .filter(|r| r.selected)
            .map(|r| r.entry.name.as_str())
            .collect();
        assert_eq!(selected, ["f12"]);
        assert!(!screen.exit);
    }

    #[tokio::test]
    async fn needs_fetch_reflects_cache() {
        let mut e = engine(scenario_provider(), 10).await;
        assert!(e.needs_fetch(NavEvent::Enter));
        assert!(!e.needs_fetch(NavEvent::GoBack));
        assert!(!e.needs_fetch(NavEvent::MoveSelectionDown));
        e.handle(NavEvent::Enter).await.unwrap();
        assert!(!e.needs_fetch(NavEvent::GoBack));
        e.handle(NavEvent::GoBack).await.unwrap();
        assert!(!e.needs_fetch(NavEvent::Enter));
        e.handle(NavEvent::MoveSelectionDown).await.unwrap();
        assert!(!e.needs_fetch(NavEvent::Enter));
    }
}
