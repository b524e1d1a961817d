use thiserror::Error;

// ---------------------------------------------------------------------------
// Engineered features
// ---------------------------------------------------------------------------

/// The three engineered columns the models were trained with.
///
/// Computed through one code path for both the bulk reference dataset and a
/// single user-entered record, so the feature distribution at prediction time
/// matches the one at load time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DerivedFeatures {
    /// `Price_in_Lakhs * 1e5 / Size_in_SqFt` (rupees per square foot).
    pub price_per_sqft: f64,
    /// Nearby schools per 1000 sqft of floor area.
    pub school_density_score: f64,
    /// Nearby hospitals per 1000 sqft of floor area.
    pub hospital_density_score: f64,
}

#[derive(Debug, Error, PartialEq)]
pub enum FeatureError {
    #[error("Size_in_SqFt must be a positive number, got {0}")]
    InvalidSize(f64),
}

impl DerivedFeatures {
    /// Compute the engineered features from raw listing attributes.
    ///
    /// Rejects non-positive or non-finite sizes instead of letting a
    /// division by zero propagate into the models.
    pub fn compute(
        size_in_sqft: f64,
        price_in_lakhs: f64,
        nearby_schools: i64,
        nearby_hospitals: i64,
    ) -> Result<Self, FeatureError> {
        if !size_in_sqft.is_finite() || size_in_sqft <= 0.0 {
            return Err(FeatureError::InvalidSize(size_in_sqft));
        }
        let kilo_sqft = size_in_sqft / 1000.0;
        Ok(DerivedFeatures {
            price_per_sqft: price_in_lakhs * 1e5 / size_in_sqft,
            school_density_score: nearby_schools as f64 / kilo_sqft,
            hospital_density_score: nearby_hospitals as f64 / kilo_sqft,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn worked_example() {
        let d = DerivedFeatures::compute(1200.0, 100.0, 3, 2).unwrap();
        assert!((d.price_per_sqft - 100.0 * 1e5 / 1200.0).abs() < 1e-9);
        assert!((d.price_per_sqft - 8333.333333).abs() < 1e-5);
        assert!((d.school_density_score - 2.5).abs() < 1e-12);
        assert!((d.hospital_density_score - 2.0 / 1.2).abs() < 1e-12);
    }

    #[test]
    fn price_per_sqft_is_exact_for_positive_sizes() {
        for &(size, price) in &[(500.0, 10.0), (1.0, 5000.0), (19999.0, 42.5)] {
            let d = DerivedFeatures::compute(size, price, 0, 0).unwrap();
            assert_eq!(d.price_per_sqft, price * 1e5 / size);
        }
    }

    #[test]
    fn zero_size_rejected() {
        assert_eq!(
            DerivedFeatures::compute(0.0, 100.0, 3, 2),
            Err(FeatureError::InvalidSize(0.0))
        );
    }

    #[test]
    fn negative_and_non_finite_sizes_rejected() {
        assert!(DerivedFeatures::compute(-10.0, 100.0, 3, 2).is_err());
        assert!(DerivedFeatures::compute(f64::NAN, 100.0, 3, 2).is_err());
        assert!(DerivedFeatures::compute(f64::INFINITY, 100.0, 3, 2).is_err());
    }
}
