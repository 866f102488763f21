//! 属性测试框架
//!
//! 使用proptest验证LRU TLB的计数与缺失分类规律

use std::collections::HashSet;

use proptest::prelude::*;
use tlbsim_mem::{AccessOutcome, LruTlb};

const PAGE: u64 = 4096;

/// 属性测试: 每次提交后计数器保持一致
proptest! {
    #[test]
    fn prop_counters_consistent(
        capacity in 1usize..32,
        addrs in prop::collection::vec(any::<u64>(), 0..300),
    ) {
        let mut tlb = LruTlb::new(capacity, PAGE).expect("valid config");

        for addr in &addrs {
            tlb.submit(*addr);
            let stats = tlb.stats();
            prop_assert_eq!(stats.hits + stats.misses, stats.accesses);
            prop_assert_eq!(stats.cold_misses + stats.capacity_misses, stats.misses);
        }

        prop_assert_eq!(tlb.stats().accesses, addrs.len() as u64);
    }
}

/// 属性测试: 连续两次访问同一地址 -> 第二次必定命中
proptest! {
    #[test]
    fn prop_reaccess_is_hit(
        capacity in 1usize..8,
        prefix in prop::collection::vec(0u64..64, 0..50),
        addr in any::<u64>(),
    ) {
        let mut tlb = LruTlb::new(capacity, PAGE).expect("valid config");
        for page in &prefix {
            tlb.submit(page * PAGE);
        }

        let before = tlb.stats();
        tlb.submit(addr);
        prop_assert_eq!(tlb.submit(addr), AccessOutcome::Hit);

        let after = tlb.stats();
        prop_assert_eq!(after.accesses, before.accesses + 2);
        prop_assert_eq!(after.hits, before.hits + 1);
        prop_assert!(after.misses <= before.misses + 1);
    }
}

/// 属性测试: 每个页面的冷缺失恰好一次（首次访问），之后的缺失都是容量缺失
proptest! {
    #[test]
    fn prop_cold_miss_once(
        capacity in 1usize..6,
        pages in prop::collection::vec(0u64..24, 1..400),
        page_size in 1u64..10_000,
    ) {
        let mut tlb = LruTlb::new(capacity, page_size).expect("valid config");
        let mut first_seen = HashSet::new();

        for page in &pages {
            let addr = page * page_size;
            let outcome = tlb.submit(addr);
            if first_seen.insert(*page) {
                prop_assert_eq!(outcome, AccessOutcome::ColdMiss);
            } else {
                prop_assert_ne!(outcome, AccessOutcome::ColdMiss);
            }
        }

        let stats = tlb.stats();
        prop_assert_eq!(stats.cold_misses, first_seen.len() as u64);
        prop_assert_eq!(tlb.seen_pages().len(), first_seen.len());
        for page in &first_seen {
            prop_assert!(tlb.seen_pages().contains(page));
        }
    }
}

/// 属性测试: 容量足以容纳所有页面时不会出现容量缺失
proptest! {
    #[test]
    fn prop_no_capacity_miss_when_working_set_fits(
        pages in prop::collection::vec(0u64..16, 1..300),
    ) {
        let mut tlb = LruTlb::new(16, PAGE).expect("valid config");
        for page in &pages {
            tlb.submit(page * PAGE);
        }
        prop_assert_eq!(tlb.stats().capacity_misses, 0);
    }
}

/// 属性测试: 循环访问 capacity + 1 个页面时，冷缺失之后全部是容量缺失
proptest! {
    #[test]
    fn prop_cyclic_thrashing(capacity in 1usize..16, rounds in 2u64..6) {
        let cycle = capacity as u64 + 1;
        let mut tlb = LruTlb::new(capacity, PAGE).expect("valid config");

        for i in 0..cycle * rounds {
            tlb.submit((i % cycle) * PAGE);
        }

        let stats = tlb.stats();
        prop_assert_eq!(stats.hits, 0);
        prop_assert_eq!(stats.cold_misses, cycle);
        prop_assert_eq!(stats.capacity_misses, cycle * (rounds - 1));
    }
}

#[test]
fn test_lru_scenario_a_b_a_c() {
    let (a, b, c) = (0x1000, 0x2000, 0x3000);
    let mut tlb = LruTlb::new(2, PAGE).expect("valid config");

    for addr in [a, b, a, c] {
        tlb.submit(addr);
    }

    assert_eq!(tlb.submit(a), AccessOutcome::Hit);
    assert_eq!(tlb.submit(b), AccessOutcome::CapacityMiss);
}

#[test]
fn test_seen_pages_survive_eviction() {
    let mut tlb = LruTlb::new(1, PAGE).expect("valid config");
    for page in 0..10 {
        tlb.submit(page * PAGE);
    }
    assert_eq!(tlb.seen_pages().len(), 10);
    assert_eq!(tlb.stats().cold_misses, 10);
}

#[test]
fn test_zero_page_size_is_config_error() {
    assert!(LruTlb::new(8, 0).is_err());
    assert!(LruTlb::new(0, PAGE).is_err());
}
