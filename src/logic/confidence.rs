use crate::models::CategoryAdvice;

/// Score reported when there is nothing to average.
pub const CONFIDENCE_FLOOR: f64 = 1.0;

/// Overall confidence: mean of the category confidences, rounded to one decimal.
///
/// Zero confidences are treated as missing. Weather advice is never passed in.
pub fn aggregate(advice: &[&CategoryAdvice]) -> f64 {
    let valid: Vec<i32> = advice
        .iter()
        .map(|a| a.confidence)
        .filter(|c| *c != 0)
        .collect();

    if valid.is_empty() {
        return CONFIDENCE_FLOOR;
    }

    let mean = valid.iter().map(|c| f64::from(*c)).sum::<f64>() / valid.len() as f64;
    round_to_tenth(mean)
}

fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
