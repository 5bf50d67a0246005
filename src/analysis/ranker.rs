use serde::Serialize;
use std::cmp::Ordering;

/// A candidate that made it into a top-N list, with its primary score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ranked<T> {
    pub item: T,
    pub score: usize,
}

/// Bounded top-N selection.
///
/// Keeps a working list of at most `n` entries sorted by descending score,
/// with `tie_break` ordering equal scores (`Ordering::Less` means the left
/// item ranks higher). A candidate arriving once the list is full replaces
/// the last entry only if it ranks strictly higher than it; the list is then
/// re-sorted. Sorting is stable, so candidates the comparator cannot tell
/// apart keep the order in which they were visited.
pub fn top_n<T, I, S, C>(candidates: I, n: usize, score: S, tie_break: C) -> Vec<Ranked<T>>
where
    I: IntoIterator<Item = T>,
    S: Fn(&T) -> usize,
    C: Fn(&T, &T) -> Ordering,
{
    let rank = |a: &Ranked<T>, b: &Ranked<T>| {
        b.score
            .cmp(&a.score)
            .then_with(|| tie_break(&a.item, &b.item))
    };

    let mut kept: Vec<Ranked<T>> = Vec::new();
    if n == 0 {
        return kept;
    }

    for item in candidates {
        let candidate = Ranked {
            score: score(&item),
            item,
        };

        if kept.len() < n {
            kept.push(candidate);
            if kept.len() == n {
                kept.sort_by(|a, b| rank(a, b));
            }
            continue;
        }

        let beats_worst = kept
            .last()
            .map(|worst| rank(&candidate, worst) == Ordering::Less)
            .unwrap_or(false);
        if beats_worst {
            kept.pop();
            kept.push(candidate);
            kept.sort_by(|a, b| rank(a, b));
        }
    }

    // Fewer candidates than requested: the list never filled up.
    if kept.len() < n {
        kept.sort_by(|a, b| rank(a, b));
    }

    kept
}

/// Tie-break for rankings where equal scores carry no further order.
pub fn no_tie_break<T>(_: &T, _: &T) -> Ordering {
    Ordering::Equal
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scores(ranked: &[Ranked<(u32, usize)>]) -> Vec<usize> {
        ranked.iter().map(|r| r.score).collect()
    }

    fn by_value(items: &[(u32, usize)], n: usize) -> Vec<Ranked<(u32, usize)>> {
        top_n(items.iter().copied(), n, |(_, s)| *s, no_tie_break)
    }

    #[test]
    fn test_length_is_min_of_n_and_population() {
        let items: Vec<(u32, usize)> = (0..7).map(|i| (i, (i as usize * 3) % 5)).collect();
        for n in 0..10 {
            assert_eq!(by_value(&items, n).len(), n.min(items.len()), "n = {}", n);
        }
    }

    #[test]
    fn test_zero_width_is_empty() {
        assert!(by_value(&[(1, 5), (2, 9)], 0).is_empty());
        assert!(by_value(&[], 0).is_empty());
    }

    #[test]
    fn test_keeps_highest_scores_descending() {
        let items = [(1, 3), (2, 8), (3, 1), (4, 5), (5, 9), (6, 2), (7, 7)];
        let ranked = by_value(&items, 3);
        assert_eq!(scores(&ranked), vec![9, 8, 7]);
        assert_eq!(ranked[0].item.0, 5);
    }

    #[test]
    fn test_small_population_is_sorted() {
        let ranked = by_value(&[(1, 2), (2, 7), (3, 4)], 10);
        assert_eq!(scores(&ranked), vec![7, 4, 2]);
    }

    #[test]
    fn test_equal_score_does_not_evict() {
        // (3, 5) ties with the worst kept entry and must not displace it.
        let ranked = by_value(&[(1, 9), (2, 5), (3, 5)], 2);
        let ids: Vec<u32> = ranked.iter().map(|r| r.item.0).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn test_full_ties_keep_visit_order() {
        let items = [(1, 4), (2, 4), (3, 4), (4, 4)];
        let ranked = by_value(&items, 3);
        let ids: Vec<u32> = ranked.iter().map(|r| r.item.0).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_tie_break_orders_and_evicts() {
        // (id, primary, secondary); higher secondary wins among equal primaries
        let items = [(1, 2, 1), (2, 1, 50), (3, 2, 4), (4, 2, 3)];
        let ranked = top_n(
            items.iter().copied(),
            2,
            |(_, primary, _)| *primary,
            |a, b| b.2.cmp(&a.2),
        );
        let ids: Vec<u32> = ranked.iter().map(|r| r.item.0).collect();
        assert_eq!(ids, vec![3, 4]);
    }

    #[test]
    fn test_repeated_calls_are_identical() {
        let items = [(1, 3), (2, 3), (3, 6), (4, 0), (5, 6)];
        assert_eq!(by_value(&items, 3), by_value(&items, 3));
    }
}
