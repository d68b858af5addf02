use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::services::points_valuation::{PointsValuationRequest, PointsValuationService};
use crate::utils::numeric_input::deserialize_numeric;

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct ProfitInput {
    #[serde(default, deserialize_with = "deserialize_numeric")]
    pub selling_price: f64,
    #[serde(default, deserialize_with = "deserialize_numeric")]
    pub platform_fee: f64,
    #[serde(default, deserialize_with = "deserialize_numeric")]
    pub shipping_fee: f64,
    #[serde(default, deserialize_with = "deserialize_numeric")]
    pub purchase_price: f64,
    #[serde(flatten)]
    pub points: PointsValuationRequest,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ProfitResult {
    pub cash_profit: f64,
    /// Yen value of all points earned, `platform_points_value + card_points_value`.
    pub points_value: f64,
    /// `cash_profit + points_value`
    pub total_profit: f64,
    pub platform_points_value: f64,
    pub card_points_value: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ProfitSummary {
    pub count: usize,
    pub cash_profit: f64,
    pub points_value: f64,
    pub total_profit: f64,
}

impl ProfitSummary {
    pub fn from_results(results: &[ProfitResult]) -> Self {
        let (cash_profit, points_value) = results
            .iter()
            .fold((0.0, 0.0), |(cash, points), r| (cash + r.cash_profit, points + r.points_value));
        Self {
            count: results.len(),
            cash_profit,
            points_value,
            total_profit: cash_profit + points_value,
        }
    }
}

/// Defines profit for a resale transaction: cash side, points side and ROI.
#[derive(Clone)]
pub struct ProfitCalculator {
    valuation: PointsValuationService,
}

impl ProfitCalculator {
    pub fn new(valuation: PointsValuationService) -> Self {
        Self { valuation }
    }

    pub fn valuation(&self) -> &PointsValuationService {
        &self.valuation
    }

    pub fn cash_profit(
        selling_price: f64,
        platform_fee: f64,
        shipping_fee: f64,
        purchase_price: f64,
    ) -> f64 {
        selling_price - platform_fee - shipping_fee - purchase_price
    }

    pub async fn total_profit(&self, input: &ProfitInput) -> ProfitResult {
        let cash_profit = Self::cash_profit(
            input.selling_price,
            input.platform_fee,
            input.shipping_fee,
            input.purchase_price,
        );
        let points = self.valuation.value_request(&input.points).await;

        ProfitResult {
            cash_profit,
            points_value: points.total_value,
            total_profit: cash_profit + points.total_value,
            platform_points_value: points.platform_points_value,
            card_points_value: points.card_points_value,
        }
    }

    /// Each input goes through `total_profit` in order; the summary is folded
    /// from those results.
    pub async fn total_profit_batch(
        &self,
        inputs: &[ProfitInput],
    ) -> (Vec<ProfitResult>, ProfitSummary) {
        let mut results = Vec::with_capacity(inputs.len());
        for input in inputs {
            results.push(self.total_profit(input).await);
        }
        let summary = ProfitSummary::from_results(&results);
        (results, summary)
    }

    /// Total profit as a percentage of the cash actually spent
    /// (`purchase_price - point_paid`). Returns 0 when nothing or less than
    /// nothing was paid in cash.
    pub fn roi(total_profit: f64, purchase_price: f64, point_paid: f64) -> f64 {
        let actual_cash_spent = purchase_price - point_paid;
        if actual_cash_spent <= 0.0 {
            return 0.0;
        }
        (total_profit / actual_cash_spent) * 100.0
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::repos::points_platform::{InMemoryPlatformResolver, PointsPlatform};

    fn calculator() -> ProfitCalculator {
        let resolver = InMemoryPlatformResolver::new()
            .with_platform("A", PointsPlatform::new("Platform A", 0.5))
            .with_platform("B", PointsPlatform::new("Card B", 1.0))
            .with_platform("odd", PointsPlatform::new("Odd Rate", 0.37));
        ProfitCalculator::new(PointsValuationService::new(Arc::new(resolver)))
    }

    fn input(selling: f64, purchase: f64, platform_points: f64, card_points: f64) -> ProfitInput {
        ProfitInput {
            selling_price: selling,
            platform_fee: selling * 0.1,
            shipping_fee: 50.0,
            purchase_price: purchase,
            points: PointsValuationRequest {
                platform_points,
                platform_points_platform_id: Some("A".into()),
                card_points,
                card_points_platform_id: Some("B".into()),
            },
        }
    }

    #[test]
    fn test_cash_profit() {
        let cases = vec![
            ((1000.0, 100.0, 50.0, 600.0), 250.0),
            ((500.0, 50.0, 80.0, 600.0), -230.0),
            ((0.0, 0.0, 0.0, 0.0), 0.0),
            ((-10.0, 0.0, 0.0, -10.0), 0.0),
        ];
        for ((selling, fee, shipping, purchase), expected) in cases {
            assert_eq!(ProfitCalculator::cash_profit(selling, fee, shipping, purchase), expected);
        }
    }

    #[tokio::test]
    async fn test_total_profit() {
        let result = calculator()
            .total_profit(&ProfitInput {
                selling_price: 1000.0,
                platform_fee: 100.0,
                shipping_fee: 50.0,
                purchase_price: 600.0,
                points: PointsValuationRequest {
                    platform_points: 100.0,
                    platform_points_platform_id: Some("A".into()),
                    card_points: 50.0,
                    card_points_platform_id: Some("B".into()),
                },
            })
            .await;

        assert_eq!(
            result,
            ProfitResult {
                cash_profit: 250.0,
                points_value: 100.0,
                total_profit: 350.0,
                platform_points_value: 50.0,
                card_points_value: 50.0,
            }
        );
    }

    #[tokio::test]
    async fn test_total_profit_without_points() {
        let result = calculator()
            .total_profit(&ProfitInput {
                selling_price: 3000.0,
                platform_fee: 300.0,
                shipping_fee: 210.0,
                purchase_price: 1980.0,
                points: PointsValuationRequest::default(),
            })
            .await;

        assert_eq!(result.points_value, 0.0);
        assert_eq!(result.total_profit, result.cash_profit);
        assert_eq!(result.cash_profit, 510.0);
    }

    #[tokio::test]
    async fn test_total_profit_invariant_holds_for_generated_inputs() {
        let calculator = calculator();
        // Small LCG so the inputs are varied but reproducible.
        let mut seed: u64 = 0x2545_F491_4F6C_DD1D;
        let mut next = move || {
            seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            ((seed >> 33) as f64 / (1u64 << 31) as f64) * 20000.0 - 5000.0
        };

        for _ in 0..200 {
            let mut generated = input(next(), next(), next(), next());
            generated.points.platform_points_platform_id = Some("odd".into());
            let result = calculator.total_profit(&generated).await;

            assert_eq!(result.total_profit, result.cash_profit + result.points_value);
            assert_eq!(
                result.points_value,
                result.platform_points_value + result.card_points_value
            );
        }
    }

    #[tokio::test]
    async fn test_total_profit_batch() {
        let calculator = calculator();
        let inputs = vec![
            input(1000.0, 600.0, 100.0, 50.0),
            input(2500.0, 2000.0, 0.0, 10.0),
            input(800.0, 900.0, 40.0, 0.0),
        ];

        let (results, summary) = calculator.total_profit_batch(&inputs).await;

        assert_eq!(results.len(), 3);
        for (input, result) in inputs.iter().zip(&results) {
            assert_eq!(*result, calculator.total_profit(input).await);
        }
        assert_eq!(summary.count, 3);
        assert_eq!(
            summary.cash_profit,
            results[0].cash_profit + results[1].cash_profit + results[2].cash_profit
        );
        assert_eq!(summary.total_profit, summary.cash_profit + summary.points_value);
    }

    #[tokio::test]
    async fn test_total_profit_batch_empty() {
        let (results, summary) = calculator().total_profit_batch(&[]).await;
        assert!(results.is_empty());
        assert_eq!(summary, ProfitSummary::default());
    }

    #[test]
    fn test_roi() {
        assert_eq!(ProfitCalculator::roi(250.0, 600.0, 0.0), (250.0 / 600.0) * 100.0);
        assert!((ProfitCalculator::roi(250.0, 600.0, 0.0) - 41.67).abs() < 0.01);
        assert_eq!(ProfitCalculator::roi(250.0, 600.0, 100.0), 50.0);
        assert_eq!(ProfitCalculator::roi(-300.0, 600.0, 0.0), -50.0);
    }

    #[test]
    fn test_roi_saturates_when_no_cash_spent() {
        assert_eq!(ProfitCalculator::roi(250.0, 600.0, 600.0), 0.0);
        assert_eq!(ProfitCalculator::roi(250.0, 0.0, 0.0), 0.0);
        assert_eq!(ProfitCalculator::roi(250.0, 600.0, 700.0), 0.0);
    }
}
