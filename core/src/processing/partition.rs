use serde::Serialize;
use std::ops::Range;

/// Half-open range of beam slots owned by one worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Segment {
    pub start: usize,
    pub end: usize,
}

impl Segment {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }
}

/// Splits `0..length` into `workers` contiguous, disjoint segments.
///
/// Segment `t` covers `[t * length / W, (t + 1) * length / W)`. Zero workers
/// yields a single segment spanning the whole buffer. When there are more
/// workers than slots the surplus segments are empty.
pub fn partition(length: usize, workers: usize) -> Vec<Segment> {
    let parts = workers.max(1);
    (0..parts)
        .map(|index| Segment {
            start: boundary(length, parts, index),
            end: boundary(length, parts, index + 1),
        })
        .collect()
}

fn boundary(length: usize, parts: usize, index: usize) -> usize {
    (length as u128 * index as u128 / parts as u128) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_exact_cover(length: usize, segments: &[Segment]) {
        let mut cursor = 0;
        for segment in segments {
            assert_eq!(segment.start, cursor, "gap or overlap at {}", cursor);
            assert!(segment.start <= segment.end);
            cursor = segment.end;
        }
        assert_eq!(cursor, length);
    }

    #[test]
    fn zero_workers_is_a_single_segment() {
        assert_eq!(partition(17, 0), vec![Segment { start: 0, end: 17 }]);
    }

    #[test]
    fn even_split_has_equal_segments() {
        let segments = partition(12, 4);
        assert!(segments.iter().all(|segment| segment.len() == 3));
        assert_exact_cover(12, &segments);
    }

    #[test]
    fn partitions_are_disjoint_and_covering() {
        for length in [1, 2, 7, 10, 99, 100, 1001, 48_001] {
            for workers in 0..=16 {
                let segments = partition(length, workers);
                assert_eq!(segments.len(), workers.max(1));
                assert_exact_cover(length, &segments);

                let largest = segments.iter().map(Segment::len).max().unwrap();
                let smallest = segments.iter().map(Segment::len).min().unwrap();
                assert!(largest - smallest <= 1);
            }
        }
    }

    #[test]
    fn surplus_workers_get_empty_segments() {
        let segments = partition(3, 8);
        assert_exact_cover(3, &segments);
        assert_eq!(segments.iter().filter(|segment| segment.is_empty()).count(), 5);
    }
}
