//! Alcohol quantity derivation
//!
//! Converts a drink's volume and strength into grams of ethanol. Every
//! drink-creation path (manual log, quick add, label scan, updates) goes
//! through [`derive_alcohol_grams`] so stored grams always agree with the
//! stored volume and ABV.

/// Density of ethanol in g/mL
pub const ETHANOL_DENSITY_G_PER_ML: f64 = 0.789;

/// Grams of ethanol in `volume_ml` of a drink at `abv_percent`.
///
/// Total over the reals: out-of-range input is not rejected here, it is the
/// caller's job to validate before storing.
pub fn derive_alcohol_grams(volume_ml: f64, abv_percent: f64) -> f64 {
    volume_ml * (abv_percent / 100.0) * ETHANOL_DENSITY_G_PER_ML
}

/// Anything that carries an already-derived alcohol mass.
///
/// The impact analyzer reads this and never recomputes grams itself.
pub trait AlcoholContent {
    fn alcohol_grams(&self) -> f64;
}

impl AlcoholContent for f64 {
    fn alcohol_grams(&self) -> f64 {
        *self
    }
}

impl<T: AlcoholContent + ?Sized> AlcoholContent for &T {
    fn alcohol_grams(&self) -> f64 {
        (**self).alcohol_grams()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_matches_formula() {
        let cases = [(568.0, 4.5), (175.0, 13.0), (25.0, 40.0), (330.0, 5.0), (1000.0, 100.0)];
        for (volume, abv) in cases {
            let expected = volume * abv / 100.0 * 0.789;
            assert!((derive_alcohol_grams(volume, abv) - expected).abs() < 1e-9);
        }
    }

    #[test]
    fn test_zero_volume_or_abv() {
        assert_eq!(derive_alcohol_grams(0.0, 40.0), 0.0);
        assert_eq!(derive_alcohol_grams(500.0, 0.0), 0.0);
    }

    #[test]
    fn test_pint_of_beer() {
        // 568 * 0.045 * 0.789
        assert!((derive_alcohol_grams(568.0, 4.5) - 20.16684).abs() < 1e-3);
    }

    #[test]
    fn test_deterministic() {
        let a = derive_alcohol_grams(123.456, 7.89);
        let b = derive_alcohol_grams(123.456, 7.89);
        assert_eq!(a.to_bits(), b.to_bits());
    }

    #[test]
    fn test_permissive_for_invalid_input() {
        assert!(derive_alcohol_grams(-100.0, 5.0) < 0.0);
        assert!(derive_alcohol_grams(100.0, 250.0) > derive_alcohol_grams(100.0, 100.0));
    }
}
