//! Face-edge membership test
//!
//! Answers, for each query edge, whether it bounds at least one face.
//! Direction-agnostic: every pair is normalized so the smaller vertex
//! index comes first, and lookups run against one sorted pool of face
//! edges instead of comparing pair by pair.

/// For each edge, whether it is an edge of at least one face.
///
/// Pure function: same inputs, same output, no hidden state.
pub fn edge_in_face(edges: &[[usize; 2]], faces: &[[usize; 3]]) -> Vec<bool> {
    let mut pool: Vec<[usize; 2]> = Vec::with_capacity(faces.len() * 3);
    for f in faces {
        for (a, b) in [(f[0], f[1]), (f[1], f[2]), (f[2], f[0])] {
            pool.push([a.min(b), a.max(b)]);
        }
    }
    pool.sort_unstable();

    edges
        .iter()
        .map(|e| {
            let key = [e[0].min(e[1]), e[0].max(e[1])];
            pool.binary_search(&key).is_ok()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_face_edges_in_either_direction() {
        let faces = [[0, 1, 2], [2, 3, 0]];
        let edges = [[0, 1], [1, 0], [2, 0], [1, 3], [4, 5]];
        assert_eq!(
            edge_in_face(&edges, &faces),
            vec![true, true, true, false, false]
        );
    }

    #[test]
    fn empty_faces_match_nothing() {
        assert_eq!(edge_in_face(&[[0, 1]], &[]), vec![false]);
    }

    #[test]
    fn empty_edges_give_empty_result() {
        assert!(edge_in_face(&[], &[[0, 1, 2]]).is_empty());
    }

    #[test]
    fn is_idempotent() {
        let faces = [[4, 1, 7], [7, 1, 2], [0, 4, 7]];
        let edges = [[1, 4], [7, 2], [0, 7], [5, 6], [2, 4]];
        let first = edge_in_face(&edges, &faces);
        let second = edge_in_face(&edges, &faces);
        assert_eq!(first, second);
    }
}
