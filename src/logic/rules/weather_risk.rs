use crate::models::{
    tags, AdvisoryInputs, CurrentWeather, Severity, WarningType, WeatherAdvice, WeatherReading,
    WeatherWarning,
};

/// Weather risk resolver - derives warnings from current temperature and humidity
///
/// Thresholds are evaluated independently, so several warnings can fire at once:
/// - temp >35°C: heat stress (high)
/// - humidity >80%: fungal risk (medium)
/// - temp >30°C and humidity >70%: disease pressure (high)
/// - temp <10°C: cold stress (medium)
///
/// Confidence is 8, raised to 9 with more than two warnings and lowered to 6 with none.
pub struct WeatherRiskResolver;

const HEAT_STRESS_TEMP_C: f64 = 35.0;
const FUNGAL_RISK_HUMIDITY: f64 = 80.0;
const DISEASE_PRESSURE_TEMP_C: f64 = 30.0;
const DISEASE_PRESSURE_HUMIDITY: f64 = 70.0;
const COLD_STRESS_TEMP_C: f64 = 10.0;
const CLEAR_SKY_MONITOR_TEMP_C: f64 = 25.0;

const BASE_CONFIDENCE: i32 = 8;
const MULTI_RISK_CONFIDENCE: i32 = 9;
const NO_RISK_CONFIDENCE: i32 = 6;

impl WeatherRiskResolver {
    pub fn resolve(&self, weather: &WeatherReading, inputs: &AdvisoryInputs) -> WeatherAdvice {
        let temp = weather.temperature;
        let humidity = weather.humidity;
        let crop = inputs.known_crop();

        let mut warnings: Vec<WeatherWarning> = Vec::new();
        let mut recommendations: Vec<String> = Vec::new();

        if temp > HEAT_STRESS_TEMP_C {
            warnings.push(WeatherWarning::new(
                WarningType::HeatStress,
                Severity::High,
                format!(
                    "High temperature ({}°C) may cause heat stress to crops",
                    temp
                ),
            ));
            recommendations.extend(
                [
                    "Irrigate during early morning or evening to reduce evaporation losses",
                    "Apply mulch to conserve soil moisture and keep root zones cool",
                    "Avoid fertilizer application and spraying during peak afternoon heat",
                ]
                .map(String::from),
            );
            if let Some(crop) = crop {
                recommendations.push(format!(
                    "Monitor {} closely for wilting and leaf scorch",
                    crop
                ));
            }
        }

        if humidity > FUNGAL_RISK_HUMIDITY {
            warnings.push(WeatherWarning::new(
                WarningType::FungalRisk,
                Severity::Medium,
                format!(
                    "High humidity ({}%) increases the risk of fungal diseases",
                    humidity
                ),
            ));
            recommendations.extend(
                [
                    "Ensure adequate spacing between plants for air circulation",
                    "Avoid overhead irrigation to keep foliage dry",
                    "Inspect leaves regularly for spots, mildew or rot",
                    "Consider a preventive fungicide if disease symptoms appear",
                ]
                .map(String::from),
            );
            if let Some(crop) = crop {
                recommendations.push(format!(
                    "Check {} for early signs of fungal infection",
                    crop
                ));
            }
        }

        if temp > DISEASE_PRESSURE_TEMP_C && humidity > DISEASE_PRESSURE_HUMIDITY {
            warnings.push(WeatherWarning::new(
                WarningType::DiseasePressure,
                Severity::High,
                "Warm and humid conditions favour rapid pest and disease development",
            ));
        }

        if temp < COLD_STRESS_TEMP_C {
            warnings.push(WeatherWarning::new(
                WarningType::ColdStress,
                Severity::Medium,
                format!("Low temperature ({}°C) may cause cold stress to crops", temp),
            ));
            recommendations.extend(
                [
                    "Protect young plants with covers or mulch during cold nights",
                    "Irrigate lightly in the evening to reduce frost damage",
                    "Delay sowing of warm-season crops until temperatures rise",
                ]
                .map(String::from),
            );
        }

        if (20.0..=30.0).contains(&temp) && (40.0..=70.0).contains(&humidity) {
            recommendations.extend(
                [
                    "Current weather conditions are favourable for crop growth",
                    "Continue regular crop management practices",
                ]
                .map(String::from),
            );
        }

        let description = weather.description.to_lowercase();
        if description.contains("rain") {
            recommendations
                .push("Rain expected or ongoing - reduce or postpone irrigation".to_string());
        }
        if description.contains("clear") && temp > CLEAR_SKY_MONITOR_TEMP_C {
            recommendations.push(
                "Clear and warm weather - monitor soil moisture and irrigate as needed"
                    .to_string(),
            );
        }

        let confidence = match warnings.len() {
            0 => NO_RISK_CONFIDENCE,
            n if n > 2 => MULTI_RISK_CONFIDENCE,
            _ => BASE_CONFIDENCE,
        };

        let explanation = if warnings.is_empty() {
            format!(
                "Weather analysis of {}°C, {}% humidity and {} found no significant crop risks",
                temp, humidity, weather.description
            )
        } else {
            format!(
                "Weather analysis of {}°C, {}% humidity and {} identified {} risk factor(s)",
                temp,
                humidity,
                weather.description,
                warnings.len()
            )
        };

        WeatherAdvice {
            current_weather: CurrentWeather {
                temperature: format!("{}°C", temp),
                humidity: format!("{}%", humidity),
                description: weather.description.clone(),
            },
            warnings,
            recommendations,
            confidence,
            explanation,
            rule_applied: tags::WEATHER_ANALYSIS.to_string(),
        }
    }
}
