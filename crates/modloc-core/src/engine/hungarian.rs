/// Solves the rectangular assignment problem with `rows <= cols`, minimizing the
/// total cost (Kuhn–Munkres with row-by-row augmentation and potentials).
///
/// Returns, for every row, the column assigned to it. All costs must be finite
/// and every row must have the same length.
pub(crate) fn min_cost_assignment(cost: &[Vec<f64>]) -> Vec<usize> {
    let n = cost.len();
    if n == 0 {
        return Vec::new();
    }
    let m = cost[0].len();
    debug_assert!(m >= n, "assignment requires at least as many columns as rows");
    debug_assert!(cost.iter().all(|row| row.len() == m));

    // 1-based internally; column 0 is the virtual source of each augmentation.
    let mut u = vec![0.0; n + 1];
    let mut v = vec![0.0; m + 1];
    let mut p = vec![0usize; m + 1];
    let mut way = vec![0usize; m + 1];

    for i in 1..=n {
        p[0] = i;
        let mut j0 = 0;
        let mut minv = vec![f64::INFINITY; m + 1];
        let mut used = vec![false; m + 1];

        loop {
            used[j0] = true;
            let i0 = p[j0];
            let mut delta = f64::INFINITY;
            let mut j1 = 0;

            for j in 1..=m {
                if used[j] {
                    continue;
                }
                let reduced = cost[i0 - 1][j - 1] - u[i0] - v[j];
                if reduced < minv[j] {
                    minv[j] = reduced;
                    way[j] = j0;
                }
                if minv[j] < delta {
                    delta = minv[j];
                    j1 = j;
                }
            }

            for j in 0..=m {
                if used[j] {
                    u[p[j]] += delta;
                    v[j] -= delta;
                } else {
                    minv[j] -= delta;
                }
            }

            j0 = j1;
            if p[j0] == 0 {
                break;
            }
        }

        loop {
            let j1 = way[j0];
            p[j0] = p[j1];
            j0 = j1;
            if j0 == 0 {
                break;
            }
        }
    }

    let mut assignment = vec![0; n];
    for j in 1..=m {
        if p[j] != 0 {
            assignment[p[j] - 1] = j - 1;
        }
    }
    assignment
}

#[cfg(test)]
mod tests {
    use super::*;

    fn total(cost: &[Vec<f64>], assignment: &[usize]) -> f64 {
        assignment
            .iter()
            .enumerate()
            .map(|(row, &col)| cost[row][col])
            .sum()
    }

    #[test]
    fn empty_problem_has_empty_assignment() {
        assert!(min_cost_assignment(&[]).is_empty());
    }

    #[test]
    fn solves_classic_square_instance() {
        let cost = vec![
            vec![4.0, 1.0, 3.0],
            vec![2.0, 0.0, 5.0],
            vec![3.0, 2.0, 2.0],
        ];
        let assignment = min_cost_assignment(&cost);
        assert_eq!(total(&cost, &assignment), 5.0);
        assert_eq!(assignment, vec![1, 0, 2]);
    }

    #[test]
    fn solves_rectangular_instance() {
        let cost = vec![vec![-10.0, -5.0, 0.0, 0.0], vec![-9.0, -1.0, 0.0, 0.0]];
        let assignment = min_cost_assignment(&cost);
        assert_eq!(total(&cost, &assignment), -14.0);
    }

    #[test]
    fn assigns_distinct_columns() {
        let cost = vec![vec![-1.0; 5]; 4];
        let mut assignment = min_cost_assignment(&cost);
        assignment.sort_unstable();
        assignment.dedup();
        assert_eq!(assignment.len(), 4);
    }
}
