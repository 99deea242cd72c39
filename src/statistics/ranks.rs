//! Ranking helpers shared by the rank-based tests

/// 1-based ranks where tied values receive the average of their positions.
pub fn average_ranks(values: &[f64]) -> Vec<f64> {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));

    let mut ranks = vec![0.0; values.len()];
    let mut start = 0;
    while start < order.len() {
        let mut end = start + 1;
        while end < order.len() && values[order[end]] == values[order[start]] {
            end += 1;
        }

        // Positions start..end (0-based) share the mean of ranks start+1..=end.
        let rank = (start + end + 1) as f64 / 2.0;
        for &index in &order[start..end] {
            ranks[index] = rank;
        }
        start = end;
    }

    ranks
}

/// Sizes of every run of equal values (including runs of length one).
pub fn tie_sizes(values: &[f64]) -> Vec<usize> {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let mut sizes = Vec::new();
    let mut start = 0;
    while start < sorted.len() {
        let mut end = start + 1;
        while end < sorted.len() && sorted[end] == sorted[start] {
            end += 1;
        }
        sizes.push(end - start);
        start = end;
    }

    sizes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_average_ranks_without_ties() {
        assert_eq!(average_ranks(&[30.0, 10.0, 20.0]), vec![3.0, 1.0, 2.0]);
    }

    #[test]
    fn test_average_ranks_with_ties() {
        assert_eq!(
            average_ranks(&[1.0, 2.0, 2.0, 3.0, 2.0]),
            vec![1.0, 3.0, 3.0, 5.0, 3.0]
        );
    }

    #[test]
    fn test_tie_sizes() {
        let mut sizes = tie_sizes(&[5.0, 1.0, 5.0, 2.0, 5.0, 1.0]);
        sizes.sort_unstable();
        assert_eq!(sizes, vec![1, 2, 3]);
        assert!(tie_sizes(&[]).is_empty());
    }
}
