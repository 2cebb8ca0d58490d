// Black-box tests for the LRU cache: capacity bound, eviction order, and
// recency promotion.

use siptable::{LruCache, Update};

#[test]
fn miss_then_hit() {
    let mut cache: LruCache<String, i32> = LruCache::new(3);
    assert_eq!(cache.get(&"foo".to_string()), None);

    cache.update("foo".to_string(), 1).unwrap();
    assert_eq!(cache.get(&"foo".to_string()), Some(&1));
    assert_eq!(cache.len(), 1);
}

#[test]
fn eviction_removes_least_recently_used() {
    let mut cache: LruCache<String, i32> = LruCache::new(3);
    cache.update("foo".to_string(), 1).unwrap();
    cache.update("bar".to_string(), 2).unwrap();
    cache.update("baz".to_string(), 3).unwrap();

    // "ball" is the fourth key; "foo" is least recently used and must go.
    let outcome = cache.update("ball".to_string(), 4).unwrap();
    assert_eq!(
        outcome,
        Update::Evicted {
            key: "foo".to_string(),
            value: 1
        }
    );

    assert_eq!(cache.len(), 3);
    assert_eq!(cache.get(&"foo".to_string()), None);
    assert_eq!(cache.get(&"bar".to_string()), Some(&2));
    assert_eq!(cache.get(&"baz".to_string()), Some(&3));
    assert_eq!(cache.get(&"ball".to_string()), Some(&4));
}

#[test]
fn reads_promote_recency() {
    let mut cache: LruCache<String, i32> = LruCache::new(3);
    cache.update("foo".to_string(), 1).unwrap();
    cache.update("bar".to_string(), 2).unwrap();
    cache.update("baz".to_string(), 3).unwrap();
    cache.update("ball".to_string(), 4).unwrap(); // evicts foo

    // Touch bar; baz becomes the least recently used.
    assert_eq!(cache.get(&"bar".to_string()), Some(&2));
    let outcome = cache.update("quux".to_string(), 5).unwrap();
    assert_eq!(
        outcome,
        Update::Evicted {
            key: "baz".to_string(),
            value: 3
        }
    );
    assert_eq!(cache.get(&"bar".to_string()), Some(&2));
    assert_eq!(cache.get(&"baz".to_string()), None);
}

#[test]
fn update_of_present_key_never_evicts() {
    let mut cache: LruCache<String, i32> = LruCache::new(2);
    cache.update("a".to_string(), 1).unwrap();
    cache.update("b".to_string(), 2).unwrap();

    // Overwriting a full cache replaces in place and promotes.
    let outcome = cache.update("a".to_string(), 10).unwrap();
    assert_eq!(outcome, Update::Replaced(1));
    assert_eq!(cache.len(), 2);
    assert_eq!(cache.get(&"a".to_string()), Some(&10));
    assert_eq!(cache.get(&"b".to_string()), Some(&2));

    // "a" was promoted by the overwrite and then "b" by the get, so a new
    // key evicts "a".
    let outcome = cache.update("c".to_string(), 3).unwrap();
    assert_eq!(
        outcome,
        Update::Evicted {
            key: "a".to_string(),
            value: 10
        }
    );
}

#[test]
fn length_never_exceeds_capacity() {
    let mut cache: LruCache<u64, u64> = LruCache::new(7);
    for i in 0..500 {
        cache.update(i % 23, i).unwrap();
        assert!(cache.len() <= 7, "len exceeded capacity at step {i}");
    }
}

#[test]
fn capacity_one_holds_latest() {
    let mut cache: LruCache<&str, i32> = LruCache::new(1);
    assert_eq!(cache.update("a", 1).unwrap(), Update::Inserted);
    assert_eq!(
        cache.update("b", 2).unwrap(),
        Update::Evicted { key: "a", value: 1 }
    );
    assert_eq!(cache.get(&"a"), None);
    assert_eq!(cache.get(&"b"), Some(&2));
    assert_eq!(cache.len(), 1);
}

#[test]
fn get_mut_edits_cached_value() {
    let mut cache: LruCache<&str, Vec<u32>> = LruCache::new(2);
    cache.update("v", vec![1, 2]).unwrap();
    cache.get_mut(&"v").unwrap().push(3);
    assert_eq!(cache.get(&"v"), Some(&vec![1, 2, 3]));
}

#[test]
fn recency_iter_tracks_operations() {
    let mut cache: LruCache<&str, i32> = LruCache::new(4);
    for (k, v) in [("a", 1), ("b", 2), ("c", 3), ("d", 4)] {
        cache.update(k, v).unwrap();
    }
    cache.get(&"b");
    cache.update("c", 30).unwrap();

    let order: Vec<&str> = cache.iter().map(|(&k, _)| k).collect();
    assert_eq!(order, ["c", "b", "d", "a"]);
    let values: Vec<i32> = cache.iter().map(|(_, &v)| v).collect();
    assert_eq!(values, [30, 2, 4, 1]);
}

#[test]
fn evicted_values_are_returned_exactly_once() {
    // Capacity 2 with 10 unique keys: each insert past the second returns
    // one evicted entry; nothing is dropped silently or twice.
    let mut cache: LruCache<u32, String> = LruCache::new(2);
    let mut evicted = Vec::new();
    for i in 0..10 {
        match cache.update(i, format!("v{i}")).unwrap() {
            Update::Inserted => {}
            Update::Evicted { key, value } => evicted.push((key, value)),
            Update::Replaced(_) => panic!("keys are unique"),
        }
    }
    assert_eq!(evicted.len(), 8);
    for (idx, (key, value)) in evicted.iter().enumerate() {
        assert_eq!(*key, idx as u32);
        assert_eq!(value, &format!("v{idx}"));
    }
}
