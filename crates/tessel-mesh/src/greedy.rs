/// Merges equal, non-empty mask cells into rectangles.
///
/// Scans row-major (`v` outer, `u` inner). From each unvisited cell the run is
/// widened along `u` while the key matches, then grown along `v` while the whole
/// next row segment matches. `emit` receives `(u, v, w, h, key)`.
#[inline]
pub fn greedy_rects<K: Copy + Eq>(
    width: usize,
    height: usize,
    mask: &[Option<K>],
    mut emit: impl FnMut(usize, usize, usize, usize, K),
) {
    debug_assert_eq!(mask.len(), width * height);
    let mut used = vec![false; width * height];
    for v in 0..height {
        for u in 0..width {
            let idx = v * width + u;
            let Some(key) = mask[idx] else { continue };
            if used[idx] {
                continue;
            }
            let code = Some(key);
            let mut w = 1;
            while u + w < width && mask[v * width + u + w] == code && !used[v * width + u + w] {
                w += 1;
            }
            let mut h = 1;
            'expand: while v + h < height {
                for i in 0..w {
                    let j = (v + h) * width + u + i;
                    if mask[j] != code || used[j] {
                        break 'expand;
                    }
                }
                h += 1;
            }
            emit(u, v, w, h, key);
            for vv in 0..h {
                for uu in 0..w {
                    used[(v + vv) * width + u + uu] = true;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn collect(width: usize, height: usize, mask: &[Option<u8>]) -> Vec<(usize, usize, usize, usize, u8)> {
        let mut out = Vec::new();
        greedy_rects(width, height, mask, |u, v, w, h, k| out.push((u, v, w, h, k)));
        out
    }

    #[test]
    fn uniform_mask_is_one_rect() {
        let mask = vec![Some(1u8); 12];
        assert_eq!(collect(4, 3, &mask), vec![(0, 0, 4, 3, 1)]);
    }

    #[test]
    fn differing_keys_split() {
        #[rustfmt::skip]
        let mask = vec![
            Some(1), Some(1), Some(2),
            Some(1), Some(1), Some(2),
            None,    Some(1), Some(1),
        ];
        assert_eq!(
            collect(3, 3, &mask),
            vec![(0, 0, 2, 2, 1), (2, 0, 1, 2, 2), (1, 2, 2, 1, 1)]
        );
    }

    #[test]
    fn height_stops_on_partial_row() {
        #[rustfmt::skip]
        let mask = vec![
            Some(7), Some(7),
            Some(7), None,
        ];
        assert_eq!(collect(2, 2, &mask), vec![(0, 0, 2, 1, 7), (0, 1, 1, 1, 7)]);
    }

    proptest! {
        #[test]
        fn rects_cover_each_filled_cell_once(
            (w, h, mask) in (1usize..9, 1usize..9).prop_flat_map(|(w, h)| {
                (Just(w), Just(h), proptest::collection::vec(proptest::option::of(0u8..3), w * h))
            })
        ) {
            let mut hits = vec![0u32; w * h];
            for (u, v, rw, rh, key) in collect(w, h, &mask) {
                for vv in v..v + rh {
                    for uu in u..u + rw {
                        prop_assert_eq!(mask[vv * w + uu], Some(key));
                        hits[vv * w + uu] += 1;
                    }
                }
            }
            for (cell, n) in mask.iter().zip(&hits) {
                prop_assert_eq!(*n, u32::from(cell.is_some()));
            }
        }
    }
}
