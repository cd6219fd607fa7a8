//! Distortion metrics between an original and a reconstructed image.
//!
//! All metrics require matrices of identical dimensions with pixels in
//! [0, 255]. A zero-noise comparison (exact reconstruction) yields
//! `f64::INFINITY` for the ratio metrics.

use crate::error::Result;
use crate::image::Matrix;

/// Maximum pixel value, the peak of [`peak_psnr`]
pub const PEAK_VALUE: f64 = 255.0;

/// Signal and noise energy of a comparison
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Powers {
    /// Sum of squared signal values
    pub signal: f64,
    /// Sum of squared differences
    pub noise: f64,
    /// Number of values compared
    pub count: usize,
}

/// Signal and noise power of `distorted` against `signal`
pub fn powers(signal: &Matrix, distorted: &Matrix) -> Result<Powers> {
    signal.check_same_dims(distorted)?;
    signal.check_pixel_range()?;
    distorted.check_pixel_range()?;

    let mut powers = Powers { count: signal.len(), ..Default::default() };
    for (&s, &d) in signal.as_slice().iter().zip(distorted.as_slice()) {
        let s = s as f64;
        let diff = s - d as f64;
        powers.signal += s * s;
        powers.noise += diff * diff;
    }
    Ok(powers)
}

/// `10 * log10(signal power / noise power)`, referenced to the signal's own energy.
///
/// Returns `f64::INFINITY` when the images are identical.
pub fn psnr(signal: &Matrix, distorted: &Matrix) -> Result<f64> {
    let p = powers(signal, distorted)?;
    Ok(ratio_db(p.signal, p.noise))
}

/// Signal-to-noise ratio in dB; the same energy ratio as [`psnr`]
pub fn snr(signal: &Matrix, distorted: &Matrix) -> Result<f64> {
    psnr(signal, distorted)
}

/// Mean squared error
pub fn mse(signal: &Matrix, distorted: &Matrix) -> Result<f64> {
    let p = powers(signal, distorted)?;
    if p.count == 0 {
        return Ok(0.0);
    }
    Ok(p.noise / p.count as f64)
}

/// `10 * log10(255^2 / mse)`, the conventional 8-bit peak SNR
pub fn peak_psnr(signal: &Matrix, distorted: &Matrix) -> Result<f64> {
    let mse = mse(signal, distorted)?;
    Ok(ratio_db(PEAK_VALUE * PEAK_VALUE, mse))
}

fn ratio_db(reference: f64, noise: f64) -> f64 {
    if noise == 0.0 {
        return f64::INFINITY;
    }
    10.0 * (reference / noise).log10()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_identical_single_pixel_is_infinite() {
        let signal = Matrix::from_rows(&[[10]]).unwrap();
        let distorted = Matrix::from_rows(&[[10]]).unwrap();
        assert_eq!(psnr(&signal, &distorted).unwrap(), f64::INFINITY);
        assert_eq!(peak_psnr(&signal, &distorted).unwrap(), f64::INFINITY);
    }

    #[test]
    fn test_identical_black_is_infinite() {
        let black = Matrix::new(2, 2);
        assert_eq!(psnr(&black, &black).unwrap(), f64::INFINITY);
    }

    #[test]
    fn test_known_ratio() {
        // signal power 100 + 100 = 200, noise 1 + 1 = 2 -> 10 * log10(100) = 20 dB
        let signal = Matrix::from_rows(&[[10, 10]]).unwrap();
        let distorted = Matrix::from_rows(&[[11, 9]]).unwrap();
        let db = psnr(&signal, &distorted).unwrap();
        assert!((db - 20.0).abs() < 1e-12);
        assert_eq!(snr(&signal, &distorted).unwrap(), db);
    }

    #[test]
    fn test_mse_and_peak() {
        let signal = Matrix::from_rows(&[[0, 0], [0, 0]]).unwrap();
        let distorted = Matrix::from_rows(&[[255, 0], [0, 0]]).unwrap();
        let m = mse(&signal, &distorted).unwrap();
        assert!((m - 255.0 * 255.0 / 4.0).abs() < 1e-9);

        let db = peak_psnr(&signal, &distorted).unwrap();
        assert!((db - 10.0 * 4f64.log10()).abs() < 1e-9);
    }

    #[test]
    fn test_dimension_mismatch() {
        let a = Matrix::new(2, 2);
        let b = Matrix::new(2, 3);
        assert!(matches!(psnr(&a, &b), Err(Error::DimensionMismatch { .. })));
        assert!(matches!(mse(&a, &b), Err(Error::DimensionMismatch { .. })));
    }

    #[test]
    fn test_value_range() {
        let a = Matrix::from_rows(&[[10, 20]]).unwrap();
        let b = Matrix::from_rows(&[[10, 256]]).unwrap();
        assert!(matches!(psnr(&a, &b), Err(Error::ValueOutOfRange { value: 256, .. })));
        assert!(matches!(psnr(&b, &a), Err(Error::ValueOutOfRange { .. })));
    }
}
