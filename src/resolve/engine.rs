use crate::rules::OrdinalSelect;

/// One active predicate category over a candidate sequence.
pub(crate) struct Category<'a, C> {
    pub(crate) holds: Box<dyn Fn(&C) -> bool + 'a>,
}

impl<'a, C> Category<'a, C> {
    pub(crate) fn new(holds: impl Fn(&C) -> bool + 'a) -> Self {
        Category {
            holds: Box::new(holds),
        }
    }
}

/// Core selection pass: positions of the candidates satisfying every active
/// category plus the tie-break axes.
///
/// Each category keeps its own running match counter (the ordinal of the
/// current hit within that category), and its own "last index": the raw
/// declaration position of the final candidate satisfying that category alone,
/// precomputed only when a match-axis selection is requested. A category
/// contributes `holds(candidate) && match_index.admits(counter, last)` to the
/// AND; every category is evaluated for every candidate so the counters stay
/// accurate even when an earlier category already failed. The order axis is
/// checked against the raw position and the final position of the whole
/// sequence.
///
/// The match-axis selection applies to every active category independently.
/// Combining it with categories of different hit sets selects only candidates
/// on which all the per-category ordinals line up, which can easily be empty;
/// this is intentional and pinned by tests.
pub(crate) fn run_match<C>(
    candidates: &[C],
    categories: &[Category<'_, C>],
    match_index: Option<OrdinalSelect>,
    order_index: Option<OrdinalSelect>,
) -> Vec<usize> {
    if categories.is_empty() && order_index.is_none() {
        return (0..candidates.len()).collect();
    }

    let lasts: Vec<i64> = categories
        .iter()
        .map(|category| {
            if match_index.is_some() {
                candidates
                    .iter()
                    .rposition(|c| (category.holds)(c))
                    .map_or(-1, |i| i as i64)
            } else {
                -1
            }
        })
        .collect();
    let sequence_last = candidates.len() as i64 - 1;

    let mut counters = vec![-1i64; categories.len()];
    let mut selected = Vec::new();
    for (position, candidate) in candidates.iter().enumerate() {
        let mut all_hold = true;
        for (slot, category) in categories.iter().enumerate() {
            let hold = (category.holds)(candidate);
            if hold {
                counters[slot] += 1;
            }
            let pass = hold
                && match_index.is_none_or(|select| select.admits(counters[slot], lasts[slot]));
            all_hold = pass && all_hold;
        }
        if let Some(select) = order_index {
            all_hold = select.admits(position as i64, sequence_last) && all_hold;
        }
        if all_hold {
            selected.push(position);
        }
    }
    selected
}

#[cfg(test)]
mod tests {
    use super::*;

    fn evens_and_big() -> Vec<Category<'static, i32>> {
        vec![
            Category::new(|n: &i32| n % 2 == 0),
            Category::new(|n: &i32| *n >= 10),
        ]
    }

    #[test]
    fn no_categories_selects_everything() {
        let candidates = [1, 2, 3];
        assert_eq!(run_match(&candidates, &[], None, None), vec![0, 1, 2]);
    }

    #[test]
    fn categories_are_anded() {
        let candidates = [4, 11, 12, 7, 20];
        let categories = evens_and_big();
        assert_eq!(
            run_match(&candidates, &categories, None, None),
            vec![2, 4]
        );
    }

    #[test]
    fn match_axis_counts_per_category() {
        let candidates = [4, 12, 20];
        let categories = vec![Category::new(|n: &i32| n % 2 == 0)];
        assert_eq!(
            run_match(&candidates, &categories, Some(OrdinalSelect::at(1)), None),
            vec![1]
        );
        assert_eq!(
            run_match(&candidates, &categories, Some(OrdinalSelect::last()), None),
            vec![2]
        );
    }

    #[test]
    fn negative_target_counts_from_the_end() {
        // hits at positions 1 and 2; last index 2, so -1 selects counter 1
        let candidates = [3, 12, 20];
        let categories = vec![Category::new(|n: &i32| n % 2 == 0)];
        assert_eq!(
            run_match(&candidates, &categories, Some(OrdinalSelect::at(-1)), None),
            vec![2]
        );
    }

    #[test]
    fn misaligned_per_category_ordinals_select_nothing() {
        // first category hits at 0,1,2; second at 1,2. Ordinal 0 of the first
        // is position 0, where the second category fails.
        let candidates = [2, 12, 20];
        let categories = evens_and_big();
        assert!(run_match(&candidates, &categories, Some(OrdinalSelect::first()), None).is_empty());
    }

    #[test]
    fn order_axis_uses_raw_position() {
        let candidates = [1, 2, 3];
        assert_eq!(
            run_match(&candidates, &[], None, Some(OrdinalSelect::last())),
            vec![2]
        );
        assert_eq!(
            run_match(&candidates, &[], None, Some(OrdinalSelect::at(1))),
            vec![1]
        );
    }
}
