//! Play-mode navigation rules
//!
//! | Mode     | has_prev          | has_next          | prev target            | next target          |
//! |----------|-------------------|-------------------|------------------------|----------------------|
//! | Sequence | index > 0         | index < len - 1   | index - 1              | index + 1            |
//! | Loop     | list non-empty    | list non-empty    | index - 1, wraps       | same index           |
//! | Random   | list non-empty    | list non-empty    | random index ≠ current | random index ≠ current |
//!
//! "No current index" counts as sitting before the first entry.

use cadenza_core::PlayMode;
use rand::Rng;

/// Whether `prev` would act
pub fn has_prev(mode: PlayMode, index: Option<usize>, len: usize) -> bool {
    if len == 0 {
        return false;
    }
    match mode {
        PlayMode::Random | PlayMode::Loop => true,
        PlayMode::Sequence => index.is_some_and(|i| i > 0),
    }
}

/// Whether `next` would act
pub fn has_next(mode: PlayMode, index: Option<usize>, len: usize) -> bool {
    if len == 0 {
        return false;
    }
    match mode {
        PlayMode::Random | PlayMode::Loop => true,
        PlayMode::Sequence => index.map_or(true, |i| i + 1 < len),
    }
}

/// Index `prev` should play, or `None` when it is a no-op
pub fn prev_target<R: Rng + ?Sized>(
    mode: PlayMode,
    index: Option<usize>,
    len: usize,
    rng: &mut R,
) -> Option<usize> {
    if !has_prev(mode, index, len) {
        return None;
    }
    match mode {
        PlayMode::Random => Some(random_index(index, len, rng)),
        PlayMode::Sequence | PlayMode::Loop => match index {
            Some(i) if i > 0 => Some(i - 1),
            _ => Some(len - 1),
        },
    }
}

/// Index `next` should play, or `None` when it is a no-op
pub fn next_target<R: Rng + ?Sized>(
    mode: PlayMode,
    index: Option<usize>,
    len: usize,
    rng: &mut R,
) -> Option<usize> {
    if !has_next(mode, index, len) {
        return None;
    }
    match mode {
        PlayMode::Random => Some(random_index(index, len, rng)),
        PlayMode::Loop => index.filter(|i| *i < len),
        PlayMode::Sequence => Some(index.map_or(0, |i| i + 1)),
    }
}

/// Uniformly random index different from `current` when `len > 1`.
///
/// Redraws until the result differs, so a track never repeats back-to-back.
pub fn random_index<R: Rng + ?Sized>(current: Option<usize>, len: usize, rng: &mut R) -> usize {
    if len <= 1 {
        return 0;
    }
    loop {
        let candidate = rng.gen_range(0..len);
        if Some(candidate) != current {
            return candidate;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    #[test]
    fn empty_playlist_never_navigates() {
        for mode in PlayMode::ALL {
            assert!(!has_prev(mode, None, 0));
            assert!(!has_next(mode, None, 0));
            assert_eq!(next_target(mode, None, 0, &mut rng()), None);
            assert_eq!(prev_target(mode, None, 0, &mut rng()), None);
        }
    }

    #[test]
    fn sequence_walks_forward_and_stops_at_end() {
        let mode = PlayMode::Sequence;
        assert_eq!(next_target(mode, Some(0), 3, &mut rng()), Some(1));
        assert_eq!(next_target(mode, Some(1), 3, &mut rng()), Some(2));
        assert_eq!(next_target(mode, Some(2), 3, &mut rng()), None);
        assert!(!has_next(mode, Some(2), 3));
    }

    #[test]
    fn sequence_without_index_starts_at_first() {
        assert!(has_next(PlayMode::Sequence, None, 3));
        assert_eq!(next_target(PlayMode::Sequence, None, 3, &mut rng()), Some(0));
        assert!(!has_prev(PlayMode::Sequence, None, 3));
    }

    #[test]
    fn sequence_prev_stops_at_start() {
        assert_eq!(prev_target(PlayMode::Sequence, Some(2), 3, &mut rng()), Some(1));
        assert_eq!(prev_target(PlayMode::Sequence, Some(0), 3, &mut rng()), None);
    }

    #[test]
    fn loop_replays_and_wraps_backwards() {
        let mode = PlayMode::Loop;
        assert_eq!(next_target(mode, Some(1), 3, &mut rng()), Some(1));
        assert_eq!(prev_target(mode, Some(1), 3, &mut rng()), Some(0));
        assert_eq!(prev_target(mode, Some(0), 3, &mut rng()), Some(2));
        assert_eq!(next_target(mode, None, 3, &mut rng()), None);
    }

    #[test]
    fn random_never_repeats_current() {
        let mut rng = rng();
        for current in 0..4 {
            for _ in 0..50 {
                let next = next_target(PlayMode::Random, Some(current), 4, &mut rng).unwrap();
                assert_ne!(next, current);
                assert!(next < 4);
            }
        }
    }

    #[test]
    fn random_with_single_track_picks_it() {
        assert_eq!(random_index(Some(0), 1, &mut rng()), 0);
        assert_eq!(prev_target(PlayMode::Random, Some(0), 1, &mut rng()), Some(0));
    }
}
