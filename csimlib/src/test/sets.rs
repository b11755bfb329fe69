use crate::cache::Outcome;
use crate::lru::{LinkedLruSet, LruSet, TimestampLruSet};

fn fills_without_eviction<S: LruSet>() {
    let mut set = S::new(4);
    for tag in 0..4 {
        assert_eq!(set.access(tag), Outcome::Miss);
        assert_eq!(set.len(), tag as usize + 1);
    }
    assert_eq!(set.tags_by_recency(), vec![3, 2, 1, 0]);
}

fn repeat_hits<S: LruSet>() {
    let mut set = S::new(2);
    assert_eq!(set.access(42), Outcome::Miss);
    assert_eq!(set.access(42), Outcome::Hit);
    assert_eq!(set.len(), 1);
}

fn evicts_least_recently_touched<S: LruSet>() {
    let mut set = S::new(3);
    for tag in [1, 2, 3] {
        set.access(tag);
    }
    // Touching 1 leaves 2 as the least recently used
    assert_eq!(set.access(1), Outcome::Hit);
    assert_eq!(set.access(4), Outcome::MissWithEviction);
    assert_eq!(set.tags_by_recency(), vec![4, 1, 3]);
    assert_eq!(set.access(2), Outcome::MissWithEviction);
    assert_eq!(set.tags_by_recency(), vec![2, 4, 1]);
    assert_eq!(set.access(1), Outcome::Hit);
    assert_eq!(set.tags_by_recency(), vec![1, 2, 4]);
    assert_eq!(set.len(), 3);
}

fn zero_associativity_never_evicts<S: LruSet>() {
    let mut set = S::new(0);
    for _ in 0..3 {
        assert_eq!(set.access(7), Outcome::Miss);
    }
    assert!(set.is_empty());
    assert!(set.tags_by_recency().is_empty());
}

fn direct_mapped_thrashes<S: LruSet>() {
    let mut set = S::new(1);
    assert_eq!(set.access(0), Outcome::Miss);
    assert_eq!(set.access(1), Outcome::MissWithEviction);
    assert_eq!(set.access(0), Outcome::MissWithEviction);
    assert_eq!(set.access(0), Outcome::Hit);
    assert_eq!(set.tags_by_recency(), vec![0]);
}

#[test]
fn linked_set() {
    fills_without_eviction::<LinkedLruSet>();
    repeat_hits::<LinkedLruSet>();
    evicts_least_recently_touched::<LinkedLruSet>();
    zero_associativity_never_evicts::<LinkedLruSet>();
    direct_mapped_thrashes::<LinkedLruSet>();
}

#[test]
fn timestamp_set() {
    fills_without_eviction::<TimestampLruSet>();
    repeat_hits::<TimestampLruSet>();
    evicts_least_recently_touched::<TimestampLruSet>();
    zero_associativity_never_evicts::<TimestampLruSet>();
    direct_mapped_thrashes::<TimestampLruSet>();
}

#[test]
fn timestamp_lines_stay_unique() {
    let mut set = TimestampLruSet::new(4);
    for tag in [5, 6, 5, 7, 8, 9, 6, 5] {
        set.access(tag);
    }
    let mut tags = set.lines().iter().filter(|line| line.valid).map(|line| line.tag).collect::<Vec<_>>();
    tags.sort();
    tags.dedup();
    assert_eq!(tags.len(), set.len());
    assert_eq!(set.len(), 4);
}

#[test]
fn representations_agree_on_random_tags() {
    let mut rng = fastrand::Rng::with_seed(0x5eed);
    for associativity in [1, 2, 3, 4, 8, 16] {
        let mut linked = LinkedLruSet::new(associativity);
        let mut timestamp = TimestampLruSet::new(associativity);
        for _ in 0..5_000 {
            let tag = rng.u64(0..(associativity as u64 * 2 + 1));
            assert_eq!(linked.access(tag), timestamp.access(tag));
            assert_eq!(linked.tags_by_recency(), timestamp.tags_by_recency());
            assert!(linked.len() <= associativity);
        }
    }
}
