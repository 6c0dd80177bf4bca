//! Orchestration of fetch, accumulation, classification, and publication.

use std::sync::{Arc, Mutex, Weak};

use tracing::{debug, info, warn};

use crate::auth::{AccessToken, User};
use crate::fetcher::{FetchError, ListingFetcher};
use crate::loading::{LoadingGate, LoadingState};
use crate::models::{Listing, ListingType, Multireddit, Subreddit};
use crate::pagination::PaginationState;
use crate::presentation::{classify, PresentationModel};
use crate::signal::Signal;

/// View-model for one paginated link list.
///
/// Owns the accumulated pages, the loading gate, and the published snapshots;
/// consumers observe the `title`, `items`, and `loading_state` signals and
/// trigger [`request_next_page`](Self::request_next_page) when they approach
/// the end of the rendered sequence.
#[derive(Clone)]
pub struct LinkListViewModel {
    inner: Arc<Inner>,
}

struct Inner {
    title: Signal<String>,
    listing_type: Signal<ListingType>,
    items: Signal<Vec<Arc<PresentationModel>>>,
    loading_state: Signal<LoadingState>,
    user: Option<User>,
    token: Option<AccessToken>,
    path: String,
    fetcher: Arc<dyn ListingFetcher>,
    state: Mutex<ListState>,
}

/// Mutable state behind one lock: all mutation happens on the logical owner.
struct ListState {
    pagination: PaginationState,
    gate: LoadingGate,
}

impl LinkListViewModel {
    #[must_use]
    pub fn new(
        fetcher: Arc<dyn ListingFetcher>,
        user: Option<User>,
        token: Option<AccessToken>,
        title: impl Into<String>,
        path: impl Into<String>,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                title: Signal::new(title.into()),
                listing_type: Signal::new(ListingType::default()),
                items: Signal::new(Vec::new()),
                loading_state: Signal::new(LoadingState::Normal),
                user,
                token,
                path: path.into(),
                fetcher,
                state: Mutex::new(ListState {
                    pagination: PaginationState::new(),
                    gate: LoadingGate::new(),
                }),
            }),
        }
    }

    #[must_use]
    pub fn for_subreddit(
        fetcher: Arc<dyn ListingFetcher>,
        user: Option<User>,
        token: Option<AccessToken>,
        subreddit: &Subreddit,
    ) -> Self {
        Self::new(
            fetcher,
            user,
            token,
            subreddit.display_name.clone(),
            subreddit.path.clone(),
        )
    }

    #[must_use]
    pub fn for_multireddit(
        fetcher: Arc<dyn ListingFetcher>,
        user: Option<User>,
        token: Option<AccessToken>,
        multireddit: &Multireddit,
    ) -> Self {
        Self::new(
            fetcher,
            user,
            token,
            multireddit.name.clone(),
            multireddit.path.clone(),
        )
    }

    /// Display title; constant for the lifetime of the view-model.
    #[must_use]
    pub fn title(&self) -> &Signal<String> {
        &self.inner.title
    }

    /// Current sort mode.
    #[must_use]
    pub fn listing_type(&self) -> &Signal<ListingType> {
        &self.inner.listing_type
    }

    /// Published presentation models, replaced wholesale on every merge.
    #[must_use]
    pub fn items(&self) -> &Signal<Vec<Arc<PresentationModel>>> {
        &self.inner.items
    }

    /// Current loading state; emits on every transition.
    #[must_use]
    pub fn loading_state(&self) -> &Signal<LoadingState> {
        &self.inner.loading_state
    }

    /// The i-th published item, or `None` when out of bounds.
    #[must_use]
    pub fn view_model_for_index(&self, index: usize) -> Option<Arc<PresentationModel>> {
        self.inner.items.get().get(index).cloned()
    }

    /// Trigger a fetch of the next page.
    ///
    /// A no-op while a fetch is already in flight. All fetch inputs (sort,
    /// cursor, token, path) are snapshotted atomically before the request so
    /// no input can change mid-flight. The result is delivered through a weak
    /// reference: if the view-model is torn down before the fetch completes,
    /// the delivery is discarded without mutating anything.
    pub fn request_next_page(&self) {
        let inner = &self.inner;
        let snapshot = {
            let mut state = inner.state.lock().expect("list state mutex poisoned");
            if !state.gate.try_begin() {
                debug!(path = %inner.path, "Page request ignored, fetch already in flight");
                return;
            }
            FetchSnapshot {
                sort: inner.listing_type.get(),
                after: state.pagination.next_cursor().map(String::from),
                token: inner.token.clone(),
                path: inner.path.clone(),
            }
        };
        inner.loading_state.set(LoadingState::Loading);
        debug!(
            path = %snapshot.path,
            sort = snapshot.sort.as_str(),
            after = snapshot.after.as_deref().unwrap_or("-"),
            "Requesting next page"
        );

        // The fetch holds the fetcher strongly and always runs to completion;
        // only the application of its result is tied to the view-model's
        // liveness.
        let fetcher = Arc::clone(&inner.fetcher);
        let weak = Arc::downgrade(inner);
        tokio::spawn(async move {
            let result = fetcher
                .fetch(
                    snapshot.sort,
                    snapshot.after.as_deref(),
                    snapshot.token.as_ref(),
                    &snapshot.path,
                )
                .await;

            let Some(inner) = Weak::upgrade(&weak) else {
                debug!("View-model gone, discarding fetch result");
                return;
            };
            inner.apply_fetch_result(result);
        });
    }
}

struct FetchSnapshot {
    sort: ListingType,
    after: Option<String>,
    token: Option<AccessToken>,
    path: String,
}

impl Inner {
    fn apply_fetch_result(&self, result: Result<Listing, FetchError>) {
        let mut state = self.state.lock().expect("list state mutex poisoned");
        match result {
            Ok(listing) => {
                let new_links = listing.links.clone();
                state.pagination.append(listing);

                // Classification runs once per link, at absorption time;
                // previously published models are untouched.
                let mut items = self.items.get();
                for link in new_links {
                    let model = Arc::new(classify(link, self.user.as_ref(), self.token.as_ref()));
                    model.preload_data();
                    items.push(model);
                }

                let next_state = state.gate.finish_success(items.len());
                info!(
                    path = %self.path,
                    total = items.len(),
                    pages = state.pagination.listing_count(),
                    state = next_state.as_str(),
                    "Merged listing page"
                );
                self.items.set(items);
                self.loading_state.set(next_state);
            }
            Err(e) => {
                warn!(path = %self.path, error = %e, "Listing fetch failed");
                let next_state = state.gate.finish_failure();
                self.loading_state.set(next_state);
            }
        }
    }
}

impl std::fmt::Debug for LinkListViewModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LinkListViewModel")
            .field("title", &self.inner.title)
            .field("path", &self.inner.path)
            .field("loading_state", &self.inner.loading_state)
            .finish_non_exhaustive()
    }
}
