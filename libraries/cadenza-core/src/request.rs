//! Latest-request-wins bookkeeping for asynchronous catalog calls
//!
//! Every operation that writes to a cache takes a token before awaiting the
//! network and checks it when the response arrives. Only the most recently
//! issued token of a group may commit; everything older is stale.

/// Token identifying one issued request within a group
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestToken(u64);

impl RequestToken {
    /// Sequence number of this token
    pub fn get(self) -> u64 {
        self.0
    }
}

/// Per-group request sequencer and loading flag
///
/// The loading flag is true exactly while the latest issued request has not
/// finished. Not thread-safe on its own; owners keep it behind the same lock
/// as the cache it guards.
#[derive(Debug, Default)]
pub struct RequestTracker {
    latest: u64,
    loading: bool,
}

impl RequestTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a new token, superseding all earlier ones, and mark the group
    /// as loading.
    pub fn begin(&mut self) -> RequestToken {
        self.latest += 1;
        self.loading = true;
        RequestToken(self.latest)
    }

    /// Whether `token` is still the most recently issued one
    pub fn is_latest(&self, token: RequestToken) -> bool {
        token.0 == self.latest
    }

    /// Mark `token` as finished.
    ///
    /// Returns `true` if the caller may commit its result. Stale tokens leave
    /// the loading flag alone.
    pub fn finish(&mut self, token: RequestToken) -> bool {
        if self.is_latest(token) {
            self.loading = false;
            true
        } else {
            false
        }
    }

    /// Supersede every outstanding token without issuing a new request
    pub fn invalidate(&mut self) {
        self.latest += 1;
        self.loading = false;
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latest_token_commits_and_clears_loading() {
        let mut tracker = RequestTracker::new();
        assert!(!tracker.is_loading());

        let token = tracker.begin();
        assert!(tracker.is_loading());
        assert!(tracker.finish(token));
        assert!(!tracker.is_loading());
    }

    #[test]
    fn stale_token_is_discarded_and_keeps_loading() {
        let mut tracker = RequestTracker::new();
        let first = tracker.begin();
        let second = tracker.begin();

        assert!(!tracker.finish(first));
        assert!(tracker.is_loading());

        assert!(tracker.finish(second));
        assert!(!tracker.is_loading());
    }

    #[test]
    fn out_of_order_completion_keeps_latest_result() {
        let mut tracker = RequestTracker::new();
        let first = tracker.begin();
        let second = tracker.begin();

        assert!(tracker.finish(second));
        assert!(!tracker.finish(first));
        assert!(!tracker.is_loading());
    }

    #[test]
    fn invalidate_supersedes_in_flight_requests() {
        let mut tracker = RequestTracker::new();
        let token = tracker.begin();

        tracker.invalidate();

        assert!(!tracker.is_loading());
        assert!(!tracker.is_latest(token));
        assert!(!tracker.finish(token));
    }

    #[test]
    fn tokens_increase_monotonically() {
        let mut tracker = RequestTracker::new();
        let a = tracker.begin();
        let b = tracker.begin();
        assert!(b > a);
        assert_eq!(b.get(), a.get() + 1);
    }
}
