/// Inference layer: opaque pre-trained model capabilities behind traits,
/// plus the facade that turns a form submission into an investment verdict.
///
/// The models were fitted offline; nothing here reproduces their internals.
/// This layer owns only the loading and invocation contract.
pub mod onnx;

use anyhow::{Result, bail};

use crate::data::stats::DatasetStats;
use crate::features::DerivedFeatures;
use crate::schema::{FeatureRow, PropertyInput};

// ---------------------------------------------------------------------------
// Capability traits – one pure function each
// ---------------------------------------------------------------------------

/// The pre-trained "good investment" classifier.
pub trait InvestmentClassifier {
    /// Probability that the property is a good investment, in `[0, 1]`.
    fn predict_probability(&self, row: &FeatureRow) -> Result<f64>;
}

/// The pre-trained 5-year price regressor.
pub trait PriceRegressor {
    /// Predicted price in lakhs, 5 years out.
    fn predict_value(&self, row: &FeatureRow) -> Result<f64>;
}

// ---------------------------------------------------------------------------
// Analysis result
// ---------------------------------------------------------------------------

/// The classification label, thresholded at 0.5 (inclusive).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    GoodInvestment,
    NotIdeal,
}

impl Verdict {
    pub fn from_probability(probability: f64) -> Self {
        if probability >= 0.5 {
            Verdict::GoodInvestment
        } else {
            Verdict::NotIdeal
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Verdict::GoodInvestment => "GOOD INVESTMENT",
            Verdict::NotIdeal => "NOT IDEAL",
        }
    }
}

/// One complete investment analysis for a submitted property.
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    /// Classifier output, guaranteed in `[0, 1]`.
    pub good_probability: f64,
    /// Regressor output: estimated price in lakhs, 5 years out.
    pub future_price_lakhs: f64,
    pub verdict: Verdict,
}

// ---------------------------------------------------------------------------
// Advisor – the facade over both capabilities
// ---------------------------------------------------------------------------

/// Owns the two model handles for the process lifetime. Loaded once at
/// startup and passed around by reference; there is no global state.
pub struct Advisor {
    classifier: Box<dyn InvestmentClassifier>,
    regressor: Box<dyn PriceRegressor>,
}

impl Advisor {
    pub fn new(
        classifier: Box<dyn InvestmentClassifier>,
        regressor: Box<dyn PriceRegressor>,
    ) -> Self {
        Advisor {
            classifier,
            regressor,
        }
    }

    /// Derive features, assemble and validate the 24-column row, and run
    /// both models. One synchronous call per button press; model errors
    /// propagate to the caller.
    pub fn analyze(&self, input: &PropertyInput, stats: &DatasetStats) -> Result<Analysis> {
        let derived = DerivedFeatures::compute(
            input.size_in_sqft,
            input.price_in_lakhs,
            input.nearby_schools,
            input.nearby_hospitals,
        )?;
        let row = FeatureRow::assemble(input, &derived, stats)?;

        let good_probability = self.classifier.predict_probability(&row)?;
        if !(0.0..=1.0).contains(&good_probability) {
            bail!("classifier returned probability {good_probability}, expected [0, 1]");
        }
        let future_price_lakhs = self.regressor.predict_value(&row)?;

        log::debug!(
            "analysis: p(good)={good_probability:.4}, future price={future_price_lakhs:.1}L"
        );

        Ok(Analysis {
            good_probability,
            future_price_lakhs,
            verdict: Verdict::from_probability(good_probability),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedClassifier(f64);
    impl InvestmentClassifier for FixedClassifier {
        fn predict_probability(&self, _row: &FeatureRow) -> Result<f64> {
            Ok(self.0)
        }
    }

    struct FixedRegressor(f64);
    impl PriceRegressor for FixedRegressor {
        fn predict_value(&self, _row: &FeatureRow) -> Result<f64> {
            Ok(self.0)
        }
    }

    fn advisor(probability: f64, price: f64) -> Advisor {
        Advisor::new(
            Box::new(FixedClassifier(probability)),
            Box::new(FixedRegressor(price)),
        )
    }

    fn input() -> PropertyInput {
        PropertyInput {
            state: "Maharashtra".into(),
            city: "Mumbai".into(),
            locality: "Andheri".into(),
            property_type: "Apartment".into(),
            bhk: 3,
            size_in_sqft: 1200.0,
            price_in_lakhs: 100.0,
            furnished_status: "Semi-Furnished".into(),
            floor_no: 2,
            total_floors: 10,
            nearby_schools: 3,
            nearby_hospitals: 2,
        }
    }

    fn stats() -> DatasetStats {
        DatasetStats {
            year_built_median: 2005.0,
            age_of_property_median: 20.0,
            public_transport_mode: "High".into(),
            parking_space_mode: "Yes".into(),
            security_mode: "Yes".into(),
            amenities_mode: "Gym".into(),
            facing_mode: "East".into(),
            owner_type_mode: "Owner".into(),
            availability_status_mode: "Ready_to_Move".into(),
        }
    }

    #[test]
    fn analysis_carries_both_model_outputs() {
        let a = advisor(0.8, 145.0).analyze(&input(), &stats()).unwrap();
        assert_eq!(a.good_probability, 0.8);
        assert_eq!(a.future_price_lakhs, 145.0);
        assert_eq!(a.verdict, Verdict::GoodInvestment);
    }

    #[test]
    fn verdict_threshold_boundary_is_inclusive() {
        assert_eq!(Verdict::from_probability(0.5), Verdict::GoodInvestment);
        assert_eq!(Verdict::from_probability(0.49999), Verdict::NotIdeal);
        assert_eq!(Verdict::from_probability(0.0), Verdict::NotIdeal);
        assert_eq!(Verdict::from_probability(1.0), Verdict::GoodInvestment);
    }

    #[test]
    fn out_of_range_probability_is_an_error() {
        assert!(advisor(1.2, 100.0).analyze(&input(), &stats()).is_err());
        assert!(advisor(-0.1, 100.0).analyze(&input(), &stats()).is_err());
    }

    #[test]
    fn invalid_size_fails_before_models_run() {
        let mut bad = input();
        bad.size_in_sqft = 0.0;
        let err = advisor(0.8, 100.0).analyze(&bad, &stats()).unwrap_err();
        assert!(err.to_string().contains("positive"));
    }
}
