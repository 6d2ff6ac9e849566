//! Schulze method: Condorcet-consistent ordering via strongest paths.

use super::pairwise::Pairwise;

/// Widest-path strengths `p[i][j]` over the positive margin graph.
pub fn strongest_paths(pairwise: &Pairwise) -> Vec<Vec<f64>> {
    let n = pairwise.n();
    let mut p = vec![vec![0.0; n]; n];
    for (i, row) in p.iter_mut().enumerate() {
        for (j, cell) in row.iter_mut().enumerate() {
            if i != j {
                *cell = (pairwise.wins(i, j) - pairwise.wins(j, i)).max(0.0);
            }
        }
    }

    for i in 0..n {
        for j in 0..n {
            if j == i {
                continue;
            }
            for k in 0..n {
                if k == i || k == j {
                    continue;
                }
                let via = p[j][i].min(p[i][k]);
                if via > p[j][k] {
                    p[j][k] = via;
                }
            }
        }
    }
    p
}

/// Total order of all candidate indices, best first.
///
/// Repeatedly extracts the undefeated candidate (nobody remaining has a
/// stronger path to it than it has back) with the highest outgoing strength.
/// When no remaining candidate is undefeated, the rest are appended in
/// ascending index order. That tail order is an approximation, not a fair
/// tie-break, but it guarantees termination and reproducibility.
pub fn schulze_method(pairwise: &Pairwise) -> Vec<usize> {
    let n = pairwise.n();
    let p = strongest_paths(pairwise);
    let mut remaining: Vec<usize> = (0..n).collect();
    let mut ranking = Vec::with_capacity(n);

    while !remaining.is_empty() {
        let undefeated = remaining
            .iter()
            .copied()
            .filter(|&i| remaining.iter().all(|&j| j == i || p[j][i] <= p[i][j]));

        let best = undefeated.fold(None::<(usize, f64)>, |best, i| {
            let strength: f64 = remaining.iter().filter(|&&j| j != i).map(|&j| p[i][j]).sum();
            match best {
                Some((_, s)) if s >= strength => best,
                _ => Some((i, strength)),
            }
        });

        match best {
            Some((winner, _)) => {
                ranking.push(winner);
                remaining.retain(|&i| i != winner);
            }
            None => {
                ranking.append(&mut remaining);
            }
        }
    }

    ranking
}
