use crate::prelude::{BeamError, BeamResult};
use crate::processing::partition::Segment;

/// Zero-initialised output arena for one beamforming run.
///
/// Workers never see the arena itself, only the disjoint slices handed out
/// by [`BeamBuffer::split_segments`].
pub struct BeamBuffer {
    samples: Vec<f64>,
}

impl BeamBuffer {
    /// Allocates `length` zeroed slots, refusing requests above `limit`.
    pub fn zeroed(length: usize, limit: Option<usize>) -> BeamResult<Self> {
        if length == 0 {
            return Err(BeamError::Geometry("beam length is zero".into()));
        }
        if let Some(limit) = limit {
            if length > limit {
                return Err(BeamError::ResourceExhaustion(format!(
                    "beam of {} samples exceeds limit of {}",
                    length, limit
                )));
            }
        }

        let mut samples = Vec::new();
        samples.try_reserve_exact(length).map_err(|err| {
            BeamError::ResourceExhaustion(format!("allocating {} samples: {}", length, err))
        })?;
        samples.resize(length, 0.0);
        Ok(Self { samples })
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Hands out one mutable slice per segment.
    ///
    /// Segments must tile the buffer in order; anything else is rejected
    /// before a slice is produced.
    pub fn split_segments(
        &mut self,
        segments: &[Segment],
    ) -> BeamResult<Vec<(Segment, &mut [f64])>> {
        let mut cursor = 0;
        for segment in segments {
            if segment.start != cursor || segment.end < segment.start {
                return Err(BeamError::Parameter(format!(
                    "segment {}..{} does not continue at {}",
                    segment.start, segment.end, cursor
                )));
            }
            cursor = segment.end;
        }
        if cursor != self.samples.len() {
            return Err(BeamError::Parameter(format!(
                "segments cover {} of {} samples",
                cursor,
                self.samples.len()
            )));
        }

        let mut rest: &mut [f64] = &mut self.samples;
        let mut parts = Vec::with_capacity(segments.len());
        for segment in segments {
            let (head, tail) = std::mem::take(&mut rest).split_at_mut(segment.len());
            parts.push((*segment, head));
            rest = tail;
        }
        Ok(parts)
    }

    pub fn into_samples(self) -> Vec<f64> {
        self.samples
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::partition::partition;

    #[test]
    fn allocation_is_zeroed() {
        let buffer = BeamBuffer::zeroed(5, None).unwrap();
        assert_eq!(buffer.into_samples(), vec![0.0; 5]);
    }

    #[test]
    fn zero_length_is_rejected() {
        assert!(matches!(
            BeamBuffer::zeroed(0, None),
            Err(BeamError::Geometry(_))
        ));
    }

    #[test]
    fn limit_is_reported_as_exhaustion() {
        assert!(matches!(
            BeamBuffer::zeroed(11, Some(10)),
            Err(BeamError::ResourceExhaustion(_))
        ));
    }

    #[test]
    fn slices_write_back_to_their_own_range() {
        let mut buffer = BeamBuffer::zeroed(10, None).unwrap();
        let segments = partition(10, 3);
        for (segment, slice) in buffer.split_segments(&segments).unwrap() {
            assert_eq!(slice.len(), segment.len());
            for (offset, slot) in slice.iter_mut().enumerate() {
                *slot = (segment.start + offset) as f64;
            }
        }
        let expected: Vec<f64> = (0..10).map(|value| value as f64).collect();
        assert_eq!(buffer.into_samples(), expected);
    }

    #[test]
    fn overlapping_segments_are_rejected() {
        let mut buffer = BeamBuffer::zeroed(10, None).unwrap();
        let segments = [Segment { start: 0, end: 6 }, Segment { start: 5, end: 10 }];
        assert!(matches!(
            buffer.split_segments(&segments),
            Err(BeamError::Parameter(_))
        ));
    }

    #[test]
    fn short_cover_is_rejected() {
        let mut buffer = BeamBuffer::zeroed(10, None).unwrap();
        let segments = [Segment { start: 0, end: 9 }];
        assert!(buffer.split_segments(&segments).is_err());
    }
}
