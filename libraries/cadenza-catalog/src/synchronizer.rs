//! List synchronizer - catalog caches and favorite propagation
//!
//! Owns the browse list (listing or search results), the favorites and
//! history caches, and the single detail record. Each cache group has its own
//! [`RequestTracker`], so an older response can neither overwrite a newer one
//! nor clear a loading flag that a newer call still holds.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use cadenza_core::{
    CatalogClient, CatalogError, FavoriteSync, MusicStatus, Page, PageQuery, PaginationSnapshot,
    RequestToken, RequestTracker, Result, Track, TrackDetail, TrackId, DEFAULT_PAGE,
};
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::events::CatalogEvent;
use crate::types::{RequestGroup, SyncConfig};

#[derive(Default)]
struct Trackers {
    list: RequestTracker,
    favorites: RequestTracker,
    history: RequestTracker,
    detail: RequestTracker,
}

impl Trackers {
    fn get(&self, group: RequestGroup) -> &RequestTracker {
        match group {
            RequestGroup::List => &self.list,
            RequestGroup::Favorites => &self.favorites,
            RequestGroup::History => &self.history,
            RequestGroup::Detail => &self.detail,
        }
    }

    fn get_mut(&mut self, group: RequestGroup) -> &mut RequestTracker {
        match group {
            RequestGroup::List => &mut self.list,
            RequestGroup::Favorites => &mut self.favorites,
            RequestGroup::History => &mut self.history,
            RequestGroup::Detail => &mut self.detail,
        }
    }
}

struct SyncState {
    tracks: Vec<Track>,
    pagination: PaginationSnapshot,
    keyword: Option<String>,
    favorites: Vec<Track>,
    history: Vec<Track>,
    detail: Option<TrackDetail>,
    requests: Trackers,
    pending_events: Vec<CatalogEvent>,
}

impl SyncState {
    fn new(page_size: u32) -> Self {
        Self {
            tracks: Vec::new(),
            pagination: initial_pagination(page_size),
            keyword: None,
            favorites: Vec::new(),
            history: Vec::new(),
            detail: None,
            requests: Trackers::default(),
            pending_events: Vec::new(),
        }
    }

    fn emit(&mut self, event: CatalogEvent) {
        self.pending_events.push(event);
    }

    fn begin(&mut self, group: RequestGroup) -> RequestToken {
        let token = self.requests.get_mut(group).begin();
        self.emit(CatalogEvent::LoadingChanged {
            group,
            loading: true,
        });
        token
    }

    /// Returns `true` if the response for `token` may be committed
    fn finish(&mut self, group: RequestGroup, token: RequestToken) -> bool {
        let latest = self.requests.get_mut(group).finish(token);
        if latest {
            self.emit(CatalogEvent::LoadingChanged {
                group,
                loading: false,
            });
        }
        latest
    }

    fn set_keyword(&mut self, keyword: Option<String>) {
        if self.keyword != keyword {
            self.keyword.clone_from(&keyword);
            self.emit(CatalogEvent::KeywordChanged { keyword });
        }
    }

    fn emit_list(&mut self) {
        self.emit(CatalogEvent::ListChanged {
            length: self.tracks.len(),
            pagination: self.pagination,
        });
    }

    fn apply_favorite(&mut self, id: TrackId, favorite: bool) -> bool {
        let mut changed = false;

        for track in self
            .tracks
            .iter_mut()
            .chain(self.history.iter_mut())
            .chain(self.favorites.iter_mut())
            .filter(|t| t.id == id)
        {
            changed |= track.favorite != favorite;
            track.favorite = favorite;
        }

        if let Some(detail) = self.detail.as_mut().filter(|d| d.id() == id) {
            changed |= detail.track.favorite != favorite;
            detail.track.favorite = favorite;
        }

        // Only removal is mirrored into the favorites cache
        if !favorite {
            let before = self.favorites.len();
            self.favorites.retain(|t| t.id != id);
            if self.favorites.len() != before {
                changed = true;
                self.emit(CatalogEvent::FavoritesChanged {
                    length: self.favorites.len(),
                });
            }
        }

        if changed {
            self.emit(CatalogEvent::FavoriteChanged {
                track_id: id,
                favorite,
            });
        }
        changed
    }
}

fn initial_pagination(page_size: u32) -> PaginationSnapshot {
    PaginationSnapshot {
        size: page_size,
        ..PaginationSnapshot::default()
    }
}

/// Paginated catalog cache kept consistent across listing, search,
/// favorites, history and detail views
///
/// All methods take `&self`; share it behind an `Arc`. The state lock is
/// never held across a catalog call.
pub struct ListSynchronizer {
    catalog: Arc<dyn CatalogClient>,
    page_size: u32,
    state: Mutex<SyncState>,
    observers: Mutex<Vec<Arc<dyn FavoriteSync>>>,
    events: broadcast::Sender<CatalogEvent>,
}

impl ListSynchronizer {
    pub fn new(catalog: Arc<dyn CatalogClient>) -> Self {
        Self::with_config(catalog, SyncConfig::default())
    }

    pub fn with_config(catalog: Arc<dyn CatalogClient>, config: SyncConfig) -> Self {
        let page_size = config.page_size.max(1);
        let (events, _) = broadcast::channel(config.event_capacity.max(1));
        debug!(page_size, "Created list synchronizer");

        Self {
            catalog,
            page_size,
            state: Mutex::new(SyncState::new(page_size)),
            observers: Mutex::new(Vec::new()),
            events,
        }
    }

    /// Subscribe to cache change notifications
    pub fn subscribe(&self) -> broadcast::Receiver<CatalogEvent> {
        self.events.subscribe()
    }

    /// Register another cache that must follow favorite toggles
    pub fn add_favorite_observer(&self, observer: Arc<dyn FavoriteSync>) {
        self.observers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(observer);
    }

    fn lock(&self) -> MutexGuard<'_, SyncState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, mut state: MutexGuard<'_, SyncState>) {
        let events = std::mem::take(&mut state.pending_events);
        drop(state);
        for event in events {
            let _ = self.events.send(event);
        }
    }

    fn start(&self, group: RequestGroup) -> RequestToken {
        let mut state = self.lock();
        let token = state.begin(group);
        self.publish(state);
        token
    }

    // ===== Browse list =====

    /// Fetch one page of approved tracks.
    ///
    /// Missing query values fall back to the current pagination snapshot.
    /// With `append` the page is concatenated onto the cached list as-is;
    /// otherwise it replaces it.
    pub async fn fetch_list(&self, query: PageQuery, append: bool) -> Result<Page<Track>> {
        let (token, page, size) = {
            let mut state = self.lock();
            let (page, size) = query.resolve(state.pagination.page, state.pagination.size);
            let token = state.begin(RequestGroup::List);
            self.publish(state);
            (token, page, size)
        };
        debug!(page, size, append, "Fetching catalog page");

        let result = self.catalog.list(page, size, MusicStatus::Approved).await;
        self.commit_list(token, result, append)
    }

    /// Search the catalog, replacing the cached list.
    ///
    /// The keyword becomes active immediately, so `load_more` and
    /// `refresh_list` route through search from here on.
    pub async fn search_music(&self, keyword: &str, query: PageQuery) -> Result<Page<Track>> {
        let (page, size) = query.resolve(DEFAULT_PAGE, self.page_size);
        let token = {
            let mut state = self.lock();
            state.set_keyword(Some(keyword.to_string()));
            let token = state.begin(RequestGroup::List);
            self.publish(state);
            token
        };
        debug!(keyword, page, size, "Searching catalog");

        let result = self.catalog.search(keyword, page, size).await;
        self.commit_list(token, result, false)
    }

    fn commit_list(
        &self,
        token: RequestToken,
        result: Result<Page<Track>>,
        append: bool,
    ) -> Result<Page<Track>> {
        let mut state = self.lock();
        let latest = state.finish(RequestGroup::List, token);

        match &result {
            Ok(data) if latest => {
                if append {
                    state.tracks.extend(data.list.iter().cloned());
                } else {
                    state.tracks.clone_from(&data.list);
                }
                state.pagination = data.snapshot();
                state.emit_list();
            }
            Ok(_) => debug!(token = token.get(), "Discarding superseded catalog page"),
            Err(e) if latest => warn!(error = %e, "Failed to load catalog page"),
            Err(e) => debug!(error = %e, "Superseded catalog request failed"),
        }

        self.publish(state);
        result
    }

    /// Fetch the next page of the active query.
    ///
    /// Returns `Ok(None)` without a request when there is no further page or
    /// the browse list is already loading.
    pub async fn load_more(&self) -> Result<Option<Page<Track>>> {
        let (next_page, keyword) = {
            let state = self.lock();
            if !state.pagination.has_more() || state.requests.list.is_loading() {
                return Ok(None);
            }
            (state.pagination.page + 1, state.keyword.clone())
        };

        let query = PageQuery::page(next_page);
        let page = match keyword {
            Some(keyword) => self.search_music(&keyword, query).await?,
            None => self.fetch_list(query, true).await?,
        };
        Ok(Some(page))
    }

    /// Re-issue the active query from the first page
    pub async fn refresh_list(&self) -> Result<Page<Track>> {
        let keyword = {
            let mut state = self.lock();
            state.pagination.page = DEFAULT_PAGE;
            state.keyword.clone()
        };

        match keyword {
            Some(keyword) => self.search_music(&keyword, PageQuery::default()).await,
            None => self.fetch_list(PageQuery::default(), false).await,
        }
    }

    /// Forget the search keyword; the cached list is kept
    pub fn clear_search(&self) {
        let mut state = self.lock();
        state.set_keyword(None);
        self.publish(state);
    }

    // ===== Favorites, history, detail =====

    /// Replace the favorites cache with one page of favorites
    pub async fn fetch_favorite_list(&self, query: PageQuery) -> Result<Page<Track>> {
        let (page, size) = query.resolve(DEFAULT_PAGE, self.page_size);
        let token = self.start(RequestGroup::Favorites);

        let result = self.catalog.favorites(page, size).await;

        let mut state = self.lock();
        let latest = state.finish(RequestGroup::Favorites, token);
        match &result {
            Ok(data) if latest => {
                state.favorites.clone_from(&data.list);
                let length = state.favorites.len();
                state.emit(CatalogEvent::FavoritesChanged { length });
            }
            Ok(_) => debug!("Discarding superseded favorites page"),
            Err(e) if latest => warn!(error = %e, "Failed to load favorites"),
            Err(_) => {}
        }
        self.publish(state);
        result
    }

    /// Replace the history cache with one page of play history
    pub async fn fetch_play_history(&self, query: PageQuery) -> Result<Page<Track>> {
        let (page, size) = query.resolve(DEFAULT_PAGE, self.page_size);
        let token = self.start(RequestGroup::History);

        let result = self.catalog.history(page, size).await;

        let mut state = self.lock();
        let latest = state.finish(RequestGroup::History, token);
        match &result {
            Ok(data) if latest => {
                state.history.clone_from(&data.list);
                let length = state.history.len();
                state.emit(CatalogEvent::HistoryChanged { length });
            }
            Ok(_) => debug!("Discarding superseded history page"),
            Err(e) if latest => warn!(error = %e, "Failed to load play history"),
            Err(_) => {}
        }
        self.publish(state);
        result
    }

    /// Replace the detail cache with the record of `id`
    pub async fn fetch_music_detail(&self, id: TrackId) -> Result<TrackDetail> {
        if !id.is_valid() {
            return Err(CatalogError::InvalidInput("track id is required".to_string()));
        }
        let token = self.start(RequestGroup::Detail);

        let result = self.catalog.detail(id).await;

        let mut state = self.lock();
        let latest = state.finish(RequestGroup::Detail, token);
        match &result {
            Ok(detail) if latest => {
                state.detail = Some(detail.clone());
                state.emit(CatalogEvent::DetailChanged { track_id: Some(id) });
            }
            Ok(_) => debug!(track_id = %id, "Discarding superseded detail"),
            Err(e) if latest => warn!(track_id = %id, error = %e, "Failed to load track detail"),
            Err(_) => {}
        }
        self.publish(state);
        result
    }

    /// Favorite or unfavorite `id` depending on its `current` flag.
    ///
    /// On success the new flag is applied to every cache holding the track,
    /// including registered observers, and returned.
    pub async fn toggle_favorite(&self, id: TrackId, current: bool) -> Result<bool> {
        if !id.is_valid() {
            return Err(CatalogError::InvalidInput("track id is required".to_string()));
        }

        let outcome = if current {
            self.catalog.unfavorite(id).await
        } else {
            self.catalog.favorite(id).await
        };
        if let Err(e) = outcome {
            warn!(track_id = %id, error = %e, "Favorite toggle failed");
            return Err(e);
        }

        let favorite = !current;
        self.apply_favorite(id, favorite);

        let observers = self
            .observers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        for observer in observers {
            observer.apply_favorite(id, favorite);
        }

        info!(track_id = %id, favorite, "Favorite toggled");
        Ok(favorite)
    }

    /// Empty every cache and forget the keyword.
    ///
    /// Requests still in flight are superseded and will not repopulate.
    pub fn reset_state(&self) {
        let mut state = self.lock();
        for group in RequestGroup::ALL {
            let tracker = state.requests.get_mut(group);
            let was_loading = tracker.is_loading();
            tracker.invalidate();
            if was_loading {
                state.emit(CatalogEvent::LoadingChanged {
                    group,
                    loading: false,
                });
            }
        }

        state.tracks.clear();
        state.favorites.clear();
        state.history.clear();
        state.detail = None;
        state.pagination = initial_pagination(self.page_size);
        state.set_keyword(None);

        state.emit_list();
        state.emit(CatalogEvent::FavoritesChanged { length: 0 });
        state.emit(CatalogEvent::HistoryChanged { length: 0 });
        state.emit(CatalogEvent::DetailChanged { track_id: None });
        self.publish(state);
        debug!("Catalog caches reset");
    }

    // ===== State Queries =====

    /// Cached browse list
    pub fn tracks(&self) -> Vec<Track> {
        self.lock().tracks.clone()
    }

    pub fn favorites(&self) -> Vec<Track> {
        self.lock().favorites.clone()
    }

    pub fn history(&self) -> Vec<Track> {
        self.lock().history.clone()
    }

    pub fn detail(&self) -> Option<TrackDetail> {
        self.lock().detail.clone()
    }

    pub fn pagination(&self) -> PaginationSnapshot {
        self.lock().pagination
    }

    /// Active search keyword
    pub fn keyword(&self) -> Option<String> {
        self.lock().keyword.clone()
    }

    /// The browse list is loading
    pub fn is_loading(&self) -> bool {
        self.lock().requests.list.is_loading()
    }

    pub fn is_group_loading(&self, group: RequestGroup) -> bool {
        self.lock().requests.get(group).is_loading()
    }

    /// Another page exists after the cached one
    pub fn has_more(&self) -> bool {
        self.lock().pagination.has_more()
    }

    /// The browse list is empty and not loading
    pub fn is_empty(&self) -> bool {
        let state = self.lock();
        state.tracks.is_empty() && !state.requests.list.is_loading()
    }
}

impl FavoriteSync for ListSynchronizer {
    fn apply_favorite(&self, id: TrackId, favorite: bool) -> bool {
        let mut state = self.lock();
        let changed = state.apply_favorite(id, favorite);
        self.publish(state);
        changed
    }
}

impl fmt::Debug for ListSynchronizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.lock();
        f.debug_struct("ListSynchronizer")
            .field("tracks", &state.tracks.len())
            .field("pagination", &state.pagination)
            .field("keyword", &state.keyword)
            .field("favorites", &state.favorites.len())
            .field("history", &state.history.len())
            .finish_non_exhaustive()
    }
}
