use std::f64::consts::PI;

/// Taylor amplitude taper with `nbar` near-in terms and the given side-lobe
/// suppression in dB, normalized to unit gain at the window midpoint.
///
/// Applied along the pulse dimension before the Doppler FFT to hold spectral
/// side-lobes below the clutter floor.
pub fn taylor(len: usize, nbar: usize, sidelobe_db: f64) -> Vec<f64> {
    let n = len as f64;
    let a = sidelobe_db.abs() / 20.0;
    let a_val = (10.0_f64.powf(a) + (10.0_f64.powf(2.0 * a) - 1.0).max(0.0).sqrt()).ln() / PI;

    let nbar = nbar.max(1);
    let sigma2 = (nbar as f64 * nbar as f64)
        / (a_val * a_val + (nbar as f64 - 0.5) * (nbar as f64 - 0.5));

    // Near-in term weights F_m with the alternating sign of the Taylor
    // series; the m-th cosine carries (-1)^(m+1) * num / den.
    let mut terms = Vec::with_capacity(nbar - 1);
    for m in 1..nbar {
        let sign = if m % 2 == 1 { 1.0 } else { -1.0 };
        let mut num = 1.0;
        let mut den = 1.0;
        for p in 1..nbar {
            num *= 1.0
                - (m as f64 * m as f64)
                    / (sigma2 * (a_val * a_val + (p as f64 - 0.5) * (p as f64 - 0.5)));
            if p != m {
                den *= 1.0 - (m as f64 * m as f64) / (p as f64 * p as f64);
            }
        }
        terms.push(if den.abs() > 1e-30 { sign * num / den } else { 0.0 });
    }

    let series = |pos: f64| {
        let mut val = 1.0;
        for (idx, f_m) in terms.iter().enumerate() {
            let m = (idx + 1) as f64;
            val += f_m * (2.0 * PI * m * (pos - (n - 1.0) / 2.0) / n).cos();
        }
        val
    };

    // Normalized at the window midpoint, which for even lengths sits between
    // the two center samples.
    let center = series((n - 1.0) / 2.0);
    let scale = if center.abs() > 0.0 { 1.0 / center } else { 1.0 };
    (0..len).map(|i| series(i as f64) * scale).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn taylor_window_has_requested_length() {
        assert_eq!(taylor(64, 4, 30.0).len(), 64);
        assert_eq!(taylor(1, 4, 30.0).len(), 1);
    }

    #[test]
    fn taylor_window_is_symmetric_with_unit_peak() {
        let w = taylor(65, 4, 30.0);
        for i in 0..w.len() / 2 {
            assert!((w[i] - w[w.len() - 1 - i]).abs() < 1e-12);
        }
        assert!((w[32] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn taylor_window_tapers_toward_edges() {
        let w = taylor(64, 4, 30.0);
        assert!(w[0] < w[16]);
        assert!(w[16] < w[32]);
        assert!(w[0] > 0.0);
    }

    #[test]
    fn taylor_window_is_a_nonnegative_amplitude_taper() {
        for len in [8usize, 16, 31, 64, 180] {
            let w = taylor(len, 4, 30.0);
            for (i, &c) in w.iter().enumerate() {
                assert!(c > 0.0, "length {len} coefficient {i} is {c}");
            }
        }
    }

    #[test]
    fn taylor_window_matches_reference_coefficients() {
        // 30 dB, nbar 4 values computed with the canonical Taylor series.
        let w = taylor(16, 4, 30.0);
        assert!((w[0] - 0.252321041674507).abs() < 1e-12);
        assert!((w[7] - 0.9938522715770962).abs() < 1e-12);
        assert!((w[8] - w[7]).abs() < 1e-12);

        let w = taylor(64, 4, 30.0);
        assert!((w[0] - 0.24366924011181884).abs() < 1e-12);
        assert!((w[16] - 0.6799889977803616).abs() < 1e-12);
        assert!((w[31] - 0.9996147627306068).abs() < 1e-12);
    }
}
