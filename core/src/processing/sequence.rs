use crate::prelude::{BatchError, BatchResult};
use ndarray::Array3;

/// Fixed-length sequence of magnitude maps with a validity mask. Padded
/// positions hold zero maps and a false mask entry.
#[derive(Debug, Clone)]
pub struct Sequence {
    pub frames: Vec<Array3<f32>>,
    pub mask: Vec<bool>,
}

/// Normalizes one batch's accumulated maps to a fixed sequence length by
/// zero-padding or uniform-stride resampling, preserving temporal order.
pub struct SequenceAssembler {
    seq_len: usize,
}

impl SequenceAssembler {
    pub fn new(seq_len: usize) -> Self {
        Self { seq_len }
    }

    pub fn assemble(&self, maps: Vec<Array3<f32>>) -> BatchResult<Sequence> {
        if maps.is_empty() {
            return Err(BatchError::EmptyBatch);
        }
        let shape = maps[0].shape().to_vec();
        for map in &maps[1..] {
            if map.shape() != shape.as_slice() {
                return Err(BatchError::ShapeMismatch {
                    expected: shape,
                    found: map.shape().to_vec(),
                });
            }
        }

        let count = maps.len();
        if count == self.seq_len {
            return Ok(Sequence {
                mask: vec![true; count],
                frames: maps,
            });
        }

        if count < self.seq_len {
            let dim = maps[0].raw_dim();
            let mut frames = maps;
            let mut mask = vec![true; count];
            frames.resize_with(self.seq_len, || Array3::zeros(dim));
            mask.resize(self.seq_len, false);
            return Ok(Sequence { frames, mask });
        }

        let wanted = uniform_indices(count, self.seq_len);
        let mut frames = Vec::with_capacity(self.seq_len);
        let mut next = wanted.iter().peekable();
        for (index, map) in maps.into_iter().enumerate() {
            if next.peek().map(|&&wanted| wanted) == Some(index) {
                frames.push(map);
                next.next();
            }
        }
        Ok(Sequence {
            mask: vec![true; frames.len()],
            frames,
        })
    }
}

/// Uniform-stride index selection over `[0, count)`, inclusive of both the
/// first and last element.
fn uniform_indices(count: usize, len: usize) -> Vec<usize> {
    if len == 0 {
        return Vec::new();
    }
    if len == 1 {
        return vec![0];
    }
    (0..len).map(|i| i * (count - 1) / (len - 1)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array3;

    fn map_with_value(value: f32) -> Array3<f32> {
        Array3::from_elem((2, 3, 1), value)
    }

    fn numbered_maps(count: usize) -> Vec<Array3<f32>> {
        (0..count).map(|i| map_with_value(i as f32)).collect()
    }

    #[test]
    fn short_batch_is_right_padded_with_masked_zero_maps() {
        let assembler = SequenceAssembler::new(180);
        let sequence = assembler.assemble(numbered_maps(100)).unwrap();

        assert_eq!(sequence.frames.len(), 180);
        assert_eq!(sequence.mask.len(), 180);
        assert!(sequence.mask[..100].iter().all(|&m| m));
        assert!(sequence.mask[100..].iter().all(|&m| !m));
        for (i, frame) in sequence.frames[..100].iter().enumerate() {
            assert_eq!(frame[[0, 0, 0]], i as f32);
        }
        for frame in &sequence.frames[100..] {
            assert!(frame.iter().all(|&v| v == 0.0));
            assert_eq!(frame.shape(), &[2, 3, 1]);
        }
    }

    #[test]
    fn long_batch_is_resampled_with_uniform_stride() {
        let assembler = SequenceAssembler::new(180);
        let sequence = assembler.assemble(numbered_maps(300)).unwrap();

        assert_eq!(sequence.frames.len(), 180);
        assert!(sequence.mask.iter().all(|&m| m));
        assert_eq!(sequence.frames[0][[0, 0, 0]], 0.0);
        assert_eq!(sequence.frames[179][[0, 0, 0]], 299.0);
        let values: Vec<f32> = sequence
            .frames
            .iter()
            .map(|f| f[[0, 0, 0]])
            .collect();
        assert!(values.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn exact_length_batch_passes_through_unchanged() {
        let assembler = SequenceAssembler::new(180);
        let sequence = assembler.assemble(numbered_maps(180)).unwrap();

        assert_eq!(sequence.frames.len(), 180);
        assert!(sequence.mask.iter().all(|&m| m));
        for (i, frame) in sequence.frames.iter().enumerate() {
            assert_eq!(frame[[0, 0, 0]], i as f32);
        }
    }

    #[test]
    fn empty_batch_is_a_batch_level_failure() {
        let assembler = SequenceAssembler::new(180);
        assert!(matches!(
            assembler.assemble(Vec::new()),
            Err(BatchError::EmptyBatch)
        ));
    }

    #[test]
    fn mismatched_map_shapes_fail_the_batch() {
        let assembler = SequenceAssembler::new(4);
        let maps = vec![map_with_value(1.0), Array3::zeros((2, 5, 1))];
        assert!(matches!(
            assembler.assemble(maps),
            Err(BatchError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn uniform_indices_cover_both_endpoints() {
        let indices = uniform_indices(300, 180);
        assert_eq!(indices.len(), 180);
        assert_eq!(indices[0], 0);
        assert_eq!(indices[179], 299);
        assert!(indices.windows(2).all(|pair| pair[0] < pair[1]));
    }
}
