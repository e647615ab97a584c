//! Integration tests for the playback engine.
//!
//! Play URL resolution is driven through a gated catalog so overlapping
//! calls can be interleaved deterministically.

mod common;

use std::sync::Arc;

use cadenza_core::{FavoriteSync, PlayMode, TrackId};
use cadenza_playback::{PlaybackConfig, PlaybackEngine, PlaybackError, PlaybackEvent};
use common::{current_id, engine_with, info_for, track, tracks, GatedCatalog, RecordingSettings};

// =============================================================================
// Overlapping play() calls
// =============================================================================

mod overlapping_plays {
    use super::*;

    #[tokio::test]
    async fn later_selection_wins_when_earlier_resolves_last() {
        let catalog = GatedCatalog::new();
        let engine = engine_with(catalog.clone());
        let gate_a = catalog.gate(1);

        let first = tokio::spawn({
            let engine = engine.clone();
            async move { engine.play(track(1)).await }
        });
        catalog.wait_for_calls(1).await;
        assert!(engine.is_loading());

        engine.play(track(2)).await.unwrap();
        assert_eq!(current_id(&engine), Some(2));
        assert!(!engine.is_loading());

        gate_a.send(Ok(info_for(1))).unwrap();
        first.await.unwrap().unwrap();

        assert_eq!(current_id(&engine), Some(2));
        assert_eq!(engine.playlist().len(), 1, "stale track must not be appended");
        assert!(!engine.is_loading());
    }

    #[tokio::test]
    async fn stale_completion_keeps_loading_flag_for_pending_latest() {
        let catalog = GatedCatalog::new();
        let engine = engine_with(catalog.clone());
        let gate_a = catalog.gate(1);
        let gate_b = catalog.gate(2);

        let first = tokio::spawn({
            let engine = engine.clone();
            async move { engine.play(track(1)).await }
        });
        catalog.wait_for_calls(1).await;
        let second = tokio::spawn({
            let engine = engine.clone();
            async move { engine.play(track(2)).await }
        });
        catalog.wait_for_calls(2).await;

        gate_a.send(Ok(info_for(1))).unwrap();
        first.await.unwrap().unwrap();
        assert!(engine.is_loading(), "latest request is still pending");
        assert_eq!(current_id(&engine), None);

        gate_b.send(Ok(info_for(2))).unwrap();
        second.await.unwrap().unwrap();
        assert!(!engine.is_loading());
        assert_eq!(current_id(&engine), Some(2));
    }

    #[tokio::test]
    async fn stale_failure_is_reported_but_not_applied() {
        let catalog = GatedCatalog::new();
        let engine = engine_with(catalog.clone());
        let gate_a = catalog.gate(1);

        let first = tokio::spawn({
            let engine = engine.clone();
            async move { engine.play(track(1)).await }
        });
        catalog.wait_for_calls(1).await;
        engine.play(track(2)).await.unwrap();

        let mut events = engine.subscribe();
        gate_a
            .send(Err(cadenza_core::CatalogError::network("timeout")))
            .unwrap();
        let result = first.await.unwrap();

        assert!(matches!(result, Err(PlaybackError::Catalog(_))));
        assert_eq!(current_id(&engine), Some(2));
        assert!(engine.is_playing());
        assert!(events.try_recv().is_err(), "stale failure emits nothing");
    }

    #[tokio::test]
    async fn stop_discards_in_flight_resolution() {
        let catalog = GatedCatalog::new();
        let engine = engine_with(catalog.clone());
        let gate = catalog.gate(1);

        let pending = tokio::spawn({
            let engine = engine.clone();
            async move { engine.play(track(1)).await }
        });
        catalog.wait_for_calls(1).await;

        engine.stop();
        assert!(!engine.is_loading());

        gate.send(Ok(info_for(1))).unwrap();
        pending.await.unwrap().unwrap();

        assert_eq!(current_id(&engine), None);
        assert!(!engine.is_playing());
        assert!(engine.is_playlist_empty());
    }

    #[tokio::test]
    async fn favorite_applied_during_resolution_survives_commit() {
        let catalog = GatedCatalog::new();
        let engine = engine_with(catalog.clone());
        let gate = catalog.gate(1);

        let pending = tokio::spawn({
            let engine = engine.clone();
            async move { engine.play(track(1)).await }
        });
        catalog.wait_for_calls(1).await;

        engine.apply_favorite(TrackId::new(1), true);
        gate.send(Ok(info_for(1))).unwrap();
        pending.await.unwrap().unwrap();

        assert!(engine.current_track().unwrap().favorite);
        assert!(engine.playlist()[0].favorite);

        // Nothing carries over to the next play
        engine.stop();
        engine.play(track(2)).await.unwrap();
        assert!(!engine.current_track().unwrap().favorite);
    }

    #[tokio::test]
    async fn stop_forgets_favorites_applied_while_pending() {
        let catalog = GatedCatalog::new();
        let engine = engine_with(catalog.clone());
        let gate = catalog.gate(1);

        let pending = tokio::spawn({
            let engine = engine.clone();
            async move { engine.play(track(1)).await }
        });
        catalog.wait_for_calls(1).await;

        engine.apply_favorite(TrackId::new(1), true);
        engine.stop();
        gate.send(Ok(info_for(1))).unwrap();
        pending.await.unwrap().unwrap();

        engine.play(track(1)).await.unwrap();
        assert!(!engine.current_track().unwrap().favorite);
    }
}

// =============================================================================
// play() contract
// =============================================================================

mod play {
    use super::*;

    #[tokio::test]
    async fn merges_play_info_into_snapshot_only() {
        let engine = engine_with(GatedCatalog::new());
        engine.play(track(3)).await.unwrap();

        let current = engine.current_track().unwrap();
        assert_eq!(current.play_url.as_deref(), Some("http://files/3.mp3"));
        assert_eq!(current.duration, 180);
        assert_eq!(engine.duration(), 180.0);
        assert_eq!(engine.current_time(), 0.0);

        let listed = &engine.playlist()[0];
        assert!(listed.play_url.is_none());
    }

    #[tokio::test]
    async fn duration_falls_back_to_track_then_zero() {
        let catalog = GatedCatalog::new();
        let engine = engine_with(catalog.clone());

        let gate = catalog.gate(1);
        gate.send(Ok(cadenza_core::PlayInfo::new("u1"))).unwrap();
        engine.play(track(1)).await.unwrap();
        assert_eq!(engine.duration(), 120.0);

        let gate = catalog.gate(2);
        gate.send(Ok(cadenza_core::PlayInfo::new("u2").with_duration(0)))
            .unwrap();
        engine.play(track(2).with_duration(0)).await.unwrap();
        assert_eq!(engine.duration(), 0.0);
        assert_eq!(engine.progress(), 0.0);
    }

    #[tokio::test]
    async fn failure_keeps_previous_track_playing() {
        let catalog = GatedCatalog::new();
        let engine = engine_with(catalog.clone());
        engine.play(track(1)).await.unwrap();
        engine.update_current_time(42.0);
        catalog.fail(2);

        let before = engine.state();
        let err = engine.play(track(2)).await.unwrap_err();

        assert!(matches!(err, PlaybackError::Catalog(_)));
        assert_eq!(engine.state(), before);
    }

    #[tokio::test]
    async fn failure_emits_play_failed() {
        let catalog = GatedCatalog::new();
        let engine = engine_with(catalog.clone());
        catalog.fail(5);
        let mut events = engine.subscribe();

        let _ = engine.play(track(5)).await;

        let mut failed = false;
        while let Ok(event) = events.try_recv() {
            if let PlaybackEvent::PlayFailed { track_id, .. } = event {
                assert_eq!(track_id, TrackId::new(5));
                failed = true;
            }
        }
        assert!(failed);
    }

    #[tokio::test]
    async fn play_by_index_ignores_out_of_range() {
        let catalog = GatedCatalog::new();
        let engine = engine_with(catalog.clone());
        engine.add_all_to_playlist(tracks(&[1, 2]), false);

        engine.play_by_index(5).await.unwrap();
        assert!(catalog.calls().is_empty());

        engine.play_by_index(1).await.unwrap();
        assert_eq!(current_id(&engine), Some(2));
        assert_eq!(engine.current_index(), Some(1));
    }
}

// =============================================================================
// Play modes
// =============================================================================

mod play_modes {
    use super::*;

    #[tokio::test]
    async fn sequence_stops_at_last_track() {
        let catalog = GatedCatalog::new();
        let engine = engine_with(catalog.clone());
        engine.add_all_to_playlist(tracks(&[1, 2, 3]), true);
        engine.play_by_index(0).await.unwrap();

        engine.play_next().await.unwrap();
        assert_eq!(engine.current_index(), Some(1));
        engine.play_next().await.unwrap();
        assert_eq!(engine.current_index(), Some(2));
        assert!(!engine.has_next());

        engine.play_next().await.unwrap();
        assert_eq!(engine.current_index(), Some(2));
        assert_eq!(catalog.calls().len(), 3);
    }

    #[tokio::test]
    async fn sequence_prev_stops_at_first_track() {
        let engine = engine_with(GatedCatalog::new());
        engine.add_all_to_playlist(tracks(&[1, 2]), true);
        engine.play_by_index(1).await.unwrap();

        engine.play_prev().await.unwrap();
        assert_eq!(engine.current_index(), Some(0));
        assert!(!engine.has_prev());

        engine.play_prev().await.unwrap();
        assert_eq!(engine.current_index(), Some(0));
    }

    #[tokio::test]
    async fn random_never_repeats_current_track() {
        let engine = engine_with(GatedCatalog::new());
        engine.set_play_mode(PlayMode::Random);
        engine.add_all_to_playlist(tracks(&[1, 2, 3, 4]), true);
        engine.play_by_index(0).await.unwrap();

        for _ in 0..40 {
            let before = engine.current_index();
            engine.play_next().await.unwrap();
            assert_ne!(engine.current_index(), before);

            let before = engine.current_index();
            engine.play_prev().await.unwrap();
            assert_ne!(engine.current_index(), before);
        }
    }

    #[tokio::test]
    async fn loop_on_ended_restarts_in_place() {
        let catalog = GatedCatalog::new();
        let engine = engine_with(catalog.clone());
        engine.add_all_to_playlist(tracks(&[1, 2, 3]), true);
        engine.play_by_index(1).await.unwrap();
        engine.set_play_mode(PlayMode::Loop);
        engine.update_current_time(170.0);
        engine.pause();

        engine.on_ended().await.unwrap();

        assert_eq!(engine.current_index(), Some(1));
        assert_eq!(engine.current_time(), 0.0);
        assert!(engine.is_playing());
        assert_eq!(catalog.calls().len(), 1, "loop replay needs no new url");
    }

    #[tokio::test]
    async fn loop_next_replays_and_prev_wraps() {
        let engine = engine_with(GatedCatalog::new());
        engine.add_all_to_playlist(tracks(&[1, 2, 3]), true);
        engine.play_by_index(0).await.unwrap();
        engine.set_play_mode(PlayMode::Loop);

        engine.play_next().await.unwrap();
        assert_eq!(engine.current_index(), Some(0));

        engine.play_prev().await.unwrap();
        assert_eq!(engine.current_index(), Some(2));
    }

    #[tokio::test]
    async fn sequence_on_ended_advances() {
        let engine = engine_with(GatedCatalog::new());
        engine.add_all_to_playlist(tracks(&[1, 2]), true);
        engine.play_by_index(0).await.unwrap();

        engine.on_ended().await.unwrap();
        assert_eq!(current_id(&engine), Some(2));
    }
}

// =============================================================================
// Playlist editing
// =============================================================================

mod playlist {
    use super::*;

    #[tokio::test]
    async fn removing_last_remaining_current_track_stops() {
        let engine = engine_with(GatedCatalog::new());
        engine.play(track(1)).await.unwrap();

        engine.remove_from_playlist(TrackId::new(1)).await.unwrap();

        assert!(!engine.is_playing());
        assert!(engine.current_track().is_none());
        assert_eq!(engine.current_index(), None);
        assert!(engine.play_url().is_none());
    }

    #[tokio::test]
    async fn removing_current_track_plays_successor() {
        let engine = engine_with(GatedCatalog::new());
        engine.add_all_to_playlist(tracks(&[1, 2, 3]), true);
        engine.play_by_index(1).await.unwrap();

        engine.remove_from_playlist(TrackId::new(2)).await.unwrap();
        assert_eq!(current_id(&engine), Some(3));
        assert_eq!(engine.current_index(), Some(1));

        engine.remove_from_playlist(TrackId::new(3)).await.unwrap();
        assert_eq!(current_id(&engine), Some(1), "falls back to the new last entry");
        assert_eq!(engine.current_index(), Some(0));
    }

    #[tokio::test]
    async fn removing_earlier_track_keeps_current_logical_track() {
        let engine = engine_with(GatedCatalog::new());
        engine.add_all_to_playlist(tracks(&[1, 2, 3]), true);
        engine.play_by_index(2).await.unwrap();

        engine.remove_from_playlist(TrackId::new(1)).await.unwrap();

        assert_eq!(engine.current_index(), Some(1));
        assert_eq!(current_id(&engine), Some(3));
        assert!(engine.is_playing());
    }

    #[tokio::test]
    async fn removing_unknown_id_is_noop() {
        let engine = engine_with(GatedCatalog::new());
        engine.add_all_to_playlist(tracks(&[1]), true);
        engine.remove_from_playlist(TrackId::new(9)).await.unwrap();
        assert_eq!(engine.playlist().len(), 1);
    }

    #[tokio::test]
    async fn failed_successor_leaves_player_paused_without_index() {
        let catalog = GatedCatalog::new();
        let engine = engine_with(catalog.clone());
        engine.add_all_to_playlist(tracks(&[1, 2]), true);
        engine.play_by_index(0).await.unwrap();
        catalog.fail(2);

        let result = engine.remove_from_playlist(TrackId::new(1)).await;

        assert!(result.is_err());
        assert!(!engine.is_playing());
        assert_eq!(engine.current_index(), None);
        engine.resume();
        assert!(!engine.is_playing(), "cannot resume a removed track");
    }

    #[tokio::test]
    async fn append_skips_existing_ids() {
        let engine = engine_with(GatedCatalog::new());
        engine.add_all_to_playlist(tracks(&[1, 2]), false);
        engine.add_all_to_playlist(tracks(&[2, 3]), false);
        assert!(!engine.add_to_playlist(track(1)));
        assert!(engine.add_to_playlist(track(4)));

        let ids: Vec<u64> = engine.playlist().iter().map(|t| t.id.get()).collect();
        assert_eq!(ids, vec![1, 2, 3, 4]);
    }

    #[tokio::test]
    async fn replace_follows_current_track_or_stops() {
        let engine = engine_with(GatedCatalog::new());
        engine.add_all_to_playlist(tracks(&[1, 2, 3]), true);
        engine.play_by_index(2).await.unwrap();

        engine.add_all_to_playlist(tracks(&[3, 4, 3]), true);
        assert_eq!(engine.current_index(), Some(0));
        assert_eq!(engine.playlist().len(), 2);
        assert!(engine.is_playing());

        engine.add_all_to_playlist(tracks(&[5]), true);
        assert!(engine.current_track().is_none());
        assert!(!engine.is_playing());
        assert_eq!(engine.current_index(), None);
    }

    #[tokio::test]
    async fn clear_playlist_resets_everything() {
        let engine = engine_with(GatedCatalog::new());
        engine.add_all_to_playlist(tracks(&[1, 2]), true);
        engine.play_by_index(0).await.unwrap();

        engine.clear_playlist();

        let state = engine.state();
        assert!(state.is_playlist_empty());
        assert_eq!(state.current_index, None);
        assert!(!state.is_playing);
        assert_eq!(state.duration, 0.0);
        assert!(!state.has_next);
    }
}

// =============================================================================
// Settings persistence
// =============================================================================

mod settings {
    use super::*;

    #[test]
    fn restores_volume_and_mode_from_settings() {
        let settings = RecordingSettings::new(0.25, PlayMode::Random);
        let engine = PlaybackEngine::new(GatedCatalog::new(), settings);

        assert_eq!(engine.volume(), 0.25);
        assert_eq!(engine.play_mode(), PlayMode::Random);
    }

    #[test]
    fn persists_only_real_changes() {
        let settings = RecordingSettings::new(0.5, PlayMode::Sequence);
        let engine = PlaybackEngine::new(GatedCatalog::new(), settings.clone());

        engine.set_volume(0.5);
        engine.set_volume(0.9);
        engine.set_volume(3.0);
        engine.toggle_mute();
        engine.set_play_mode(PlayMode::Sequence);
        engine.toggle_play_mode();

        assert_eq!(*settings.volume_writes.lock().unwrap(), vec![0.9_f32, 1.0]);
        assert_eq!(*settings.mode_writes.lock().unwrap(), vec![PlayMode::Loop]);
    }

    #[test]
    fn write_failures_do_not_block_changes() {
        let engine = PlaybackEngine::with_config(
            GatedCatalog::new(),
            RecordingSettings::failing(),
            PlaybackConfig::default(),
        );

        engine.set_volume(0.1);
        engine.toggle_play_mode();

        assert_eq!(engine.volume(), 0.1);
        assert_eq!(engine.play_mode(), PlayMode::Loop);
    }

    #[tokio::test]
    async fn engine_is_shareable_across_tasks() {
        let engine: Arc<PlaybackEngine> = engine_with(GatedCatalog::new());
        let handle = tokio::spawn({
            let engine = engine.clone();
            async move { engine.play(track(7)).await }
        });
        handle.await.unwrap().unwrap();
        assert_eq!(current_id(&engine), Some(7));
    }
}
