//! Simulated weather reports
//!
//! Never contacts a weather service. Every report says it is simulated.

use rand::Rng;

use crate::application::responses::pick;
use crate::infrastructure::config::{Config, Mode};

pub const CONDITIONS: [&str; 8] = [
    "sunny",
    "partly cloudy",
    "cloudy",
    "rainy",
    "stormy",
    "snowy",
    "windy",
    "foggy",
];

/// Inclusive temperature range in °C
pub const MIN_TEMPERATURE: i32 = 0;
pub const MAX_TEMPERATURE: i32 = 35;

#[derive(Debug, Clone)]
pub struct WeatherProvider {
    enabled: bool,
    mode: Mode,
}

impl WeatherProvider {
    pub fn new(enabled: bool, mode: Mode) -> Self {
        Self { enabled, mode }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.features.weather, config.mode)
    }

    pub fn report<R: Rng>(&self, location: &str, rng: &mut R) -> String {
        if !self.enabled {
            return match self.mode {
                Mode::Online => "Weather information is currently disabled. Would you like me to enable this feature?",
                Mode::Offline => "Weather information is currently disabled.",
            }
            .to_string();
        }

        let location = location.trim();
        if location.is_empty() {
            return "I need a location to check the weather. For example, 'weather in New York'.".to_string();
        }

        let condition = pick(&CONDITIONS, rng);
        let temperature = rng.gen_range(MIN_TEMPERATURE..=MAX_TEMPERATURE);
        tracing::info!("Simulated weather for {}: {} {}°C", location, condition, temperature);

        match self.mode {
            Mode::Online => format!(
                "The weather in {} is currently {} with a temperature of {}°C. \
This is a simulated response. To get real weather data, you would need to integrate with a weather API.",
                location, condition, temperature
            ),
            Mode::Offline => format!(
                "I'm in offline mode, so here's a simulated weather report for {}: Currently {} with a temperature of {}°C.",
                location, condition, temperature
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use regex::Regex;

    #[test]
    fn test_report_names_location_and_stays_in_range() {
        let provider = WeatherProvider::new(true, Mode::Online);
        let re = Regex::new(r"currently (.+) with a temperature of (\d+)°C").unwrap();
        let mut rng = StdRng::seed_from_u64(42);

        for _ in 0..100 {
            let report = provider.report("paris", &mut rng);
            assert!(report.contains("paris"));
            assert!(report.contains("simulated"));

            let caps = re.captures(&report).expect("report format");
            assert!(CONDITIONS.contains(&&caps[1]));
            let t: i32 = caps[2].parse().unwrap();
            assert!((MIN_TEMPERATURE..=MAX_TEMPERATURE).contains(&t));
        }
    }

    #[test]
    fn test_offline_wording() {
        let provider = WeatherProvider::new(true, Mode::Offline);
        let mut rng = StdRng::seed_from_u64(1);
        let report = provider.report("london", &mut rng);
        assert!(report.starts_with("I'm in offline mode, so here's a simulated weather report for london"));
    }

    #[test]
    fn test_needs_location() {
        let provider = WeatherProvider::new(true, Mode::Online);
        let mut rng = StdRng::seed_from_u64(1);
        assert!(provider.report("  ", &mut rng).starts_with("I need a location"));
    }

    #[test]
    fn test_disabled() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(
            WeatherProvider::new(false, Mode::Offline).report("paris", &mut rng),
            "Weather information is currently disabled."
        );
    }
}
