use ndarray::Array2;
use num_complex::Complex32;
use rustfft::{Fft, FftPlanner};
use std::sync::Arc;

/// Helper that wraps the `rustfft` planner for reuse across frames.
pub struct FftHelper {
    fft: Arc<dyn Fft<f32>>,
    scratch: Vec<Complex32>,
    size: usize,
}

impl FftHelper {
    pub fn new(size: usize) -> Self {
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(size);
        let scratch = vec![Complex32::default(); fft.get_inplace_scratch_len()];
        Self { fft, scratch, size }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Transforms every row of `data` in place along the second axis.
    ///
    /// Rows must have length `size` and the array must be in standard
    /// (row-major) layout so each row is a contiguous slice.
    pub fn forward_rows(&mut self, data: &mut Array2<Complex32>) {
        debug_assert_eq!(data.ncols(), self.size);
        for mut row in data.rows_mut() {
            let slice = row
                .as_slice_mut()
                .expect("row-major layout required for in-place FFT");
            self.fft.process_with_scratch(slice, &mut self.scratch);
        }
    }
}

/// Circularly shifts every row so the zero-frequency bin lands at the center
/// index `ncols / 2`, matching a centered Doppler spectrum.
pub fn fftshift_rows(data: &mut Array2<Complex32>) {
    let n = data.ncols();
    if n < 2 {
        return;
    }
    let split = (n + 1) / 2;
    for mut row in data.rows_mut() {
        let slice = row
            .as_slice_mut()
            .expect("row-major layout required for fftshift");
        slice.rotate_left(split);
    }
}
