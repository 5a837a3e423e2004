use super::*;
use crate::assert_errors;
use crate::common::constants::INF;
use crate::config::config::DbConfig;

fn lru_config() -> DbConfig {
    DbConfig {
        replacer: "LRUReplacer".to_string(),
        ..DbConfig::default()
    }
}

fn lru_k_config(k: usize) -> DbConfig {
    DbConfig {
        replacer: "LRUKReplacer".to_string(),
        lru_k: k,
        ..DbConfig::default()
    }
}

#[test]
fn test_from_config_dispatch() {
    assert!(matches!(
        Replacer::from_config(&lru_config()),
        Replacer::Lru(_)
    ));
    assert!(matches!(
        Replacer::from_config(&lru_k_config(2)),
        Replacer::LruK(_)
    ));
}

#[test]
fn test_unknown_replacer_name_is_fatal() {
    let config = DbConfig {
        replacer: "ClockReplacer".to_string(),
        ..DbConfig::default()
    };
    assert_errors!(Replacer::from_config(&config));
}

mod lru {
    use super::*;

    #[test]
    fn test_victim_none_when_empty() {
        let mut replacer = LruReplacer::new();
        assert_eq!(None, replacer.victim());
    }

    /// Two evictable frames; the older pin is the victim.
    #[test]
    fn test_evicts_least_recently_pinned() {
        let mut replacer = LruReplacer::new();
        replacer.pin(1);
        replacer.pin(2);
        replacer.unpin(1);
        replacer.unpin(2);

        assert_eq!(2, replacer.size());
        assert_eq!(Some(1), replacer.victim());
        assert_eq!(Some(2), replacer.victim());
        assert_eq!(None, replacer.victim());
    }

    #[test]
    fn test_pin_moves_frame_to_front() {
        let mut replacer = LruReplacer::new();
        replacer.pin(1);
        replacer.pin(2);
        // 1 becomes the most recent again.
        replacer.pin(1);
        replacer.unpin(1);
        replacer.unpin(2);

        assert_eq!(Some(2), replacer.victim());
    }

    #[test]
    fn test_pin_clears_evictable_flag() {
        let mut replacer = LruReplacer::new();
        replacer.pin(1);
        replacer.unpin(1);
        assert_eq!(1, replacer.size());

        replacer.pin(1);
        assert_eq!(0, replacer.size());
        assert_eq!(None, replacer.victim());
    }

    #[test]
    fn test_unpin_is_idempotent() {
        let mut replacer = LruReplacer::new();
        replacer.pin(1);
        replacer.unpin(1);
        replacer.unpin(1);
        assert_eq!(1, replacer.size());

        // unknown frames are ignored.
        replacer.unpin(99);
        assert_eq!(1, replacer.size());
    }

    #[test]
    fn test_victim_skips_pinned_frames() {
        let mut replacer = LruReplacer::new();
        replacer.pin(1);
        replacer.pin(2);
        replacer.unpin(2);

        // 1 is older but not evictable.
        assert_eq!(Some(2), replacer.victim());
        assert_eq!(None, replacer.victim());
    }

    #[test]
    fn test_remove_drops_entry() {
        let mut replacer = LruReplacer::new();
        replacer.pin(1);
        replacer.unpin(1);
        replacer.remove(1);
        assert_eq!(0, replacer.size());
        assert_eq!(None, replacer.victim());
    }
}

mod lru_k {
    use super::*;

    #[test]
    fn test_victim_none_when_empty() {
        let mut replacer = LruKReplacer::new(2);
        assert_eq!(None, replacer.victim());
    }

    #[test]
    fn test_pin_advances_logical_clock() {
        let mut replacer = LruKReplacer::new(3);
        assert_eq!(0, replacer.current_timestamp());

        replacer.pin(1);
        replacer.pin(1);
        assert_eq!(2, replacer.current_timestamp());

        let node = replacer.node(&1).unwrap();
        assert_eq!(2, node.history.len());
        assert_eq!(0, *node.history.front().unwrap());
        assert_eq!(1, *node.history.back().unwrap());
    }

    #[test]
    fn test_history_bounded_to_k() {
        let mut replacer = LruKReplacer::new(2);
        for _ in 0..5 {
            replacer.pin(1);
        }
        let node = replacer.node(&1).unwrap();
        assert_eq!(2, node.history.len());
        // the two most recent timestamps survive.
        assert_eq!(3, *node.history.front().unwrap());
        assert_eq!(4, *node.history.back().unwrap());
    }

    #[test]
    fn test_backward_k_distance() {
        let mut replacer = LruKReplacer::new(2);
        replacer.pin(1);
        assert_eq!(
            INF,
            replacer
                .node(&1)
                .unwrap()
                .backward_k_distance(replacer.current_timestamp(), 2)
        );

        replacer.pin(1);
        // history = [0, 1], clock = 2.
        assert_eq!(
            2,
            replacer
                .node(&1)
                .unwrap()
                .backward_k_distance(replacer.current_timestamp(), 2)
        );
    }

    /// Frames pinned once each in order A, B, C all have infinite
    /// k-distance; the tie breaks to the earliest first timestamp.
    #[test]
    fn test_cold_frames_tie_break_on_first_timestamp() {
        let (a, b, c) = (1, 2, 3);
        let mut replacer = LruKReplacer::new(2);
        replacer.pin(a);
        replacer.pin(b);
        replacer.pin(c);
        replacer.unpin(a);
        replacer.unpin(b);
        replacer.unpin(c);

        assert_eq!(Some(a), replacer.victim());
        assert_eq!(Some(b), replacer.victim());
        assert_eq!(Some(c), replacer.victim());
    }

    /// Pin A and B twice each (interleaved), C once; the sole frame with
    /// infinite backward k-distance is the victim.
    #[test]
    fn test_infinite_distance_beats_finite() {
        let (a, b, c) = (1, 2, 3);
        let mut replacer = LruKReplacer::new(2);
        replacer.pin(a);
        replacer.pin(b);
        replacer.pin(a);
        replacer.pin(b);
        replacer.pin(c);
        replacer.unpin(a);
        replacer.unpin(b);
        replacer.unpin(c);

        assert_eq!(Some(c), replacer.victim());
    }

    #[test]
    fn test_largest_finite_distance_wins() {
        let (a, b) = (1, 2);
        let mut replacer = LruKReplacer::new(2);
        replacer.pin(a); // ts 0
        replacer.pin(a); // ts 1
        replacer.pin(b); // ts 2
        replacer.pin(b); // ts 3
        replacer.unpin(a);
        replacer.unpin(b);

        // distances: a = 4 - 0, b = 4 - 2.
        assert_eq!(Some(a), replacer.victim());
        assert_eq!(Some(b), replacer.victim());
    }

    #[test]
    fn test_victim_skips_pinned_frames() {
        let mut replacer = LruKReplacer::new(2);
        replacer.pin(1);
        replacer.pin(2);
        replacer.unpin(2);

        assert_eq!(Some(2), replacer.victim());
        assert_eq!(None, replacer.victim());
    }

    #[test]
    fn test_unpin_unknown_frame_is_noop() {
        let mut replacer = LruKReplacer::new(2);
        replacer.unpin(42);
        assert_eq!(0, replacer.size());
        assert!(replacer.node(&42).is_none());
    }

    #[test]
    fn test_size_tracks_evictable_count() {
        let mut replacer = LruKReplacer::new(2);
        replacer.pin(1);
        replacer.pin(2);
        assert_eq!(0, replacer.size());

        replacer.unpin(1);
        replacer.unpin(2);
        assert_eq!(2, replacer.size());

        replacer.pin(1);
        assert_eq!(1, replacer.size());

        replacer.victim();
        assert_eq!(0, replacer.size());
    }

    #[test]
    fn test_remove_unevictable_frame_panics() {
        let mut replacer = LruKReplacer::new(2);
        replacer.pin(1);
        assert_errors!(replacer.remove(1));
    }

    #[test]
    fn test_remove_unknown_frame_is_noop() {
        let mut replacer = LruKReplacer::new(2);
        replacer.remove(7);
        assert_eq!(0, replacer.size());
    }
}
