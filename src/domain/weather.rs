/// Current conditions for one coordinate pair, as reported by the provider.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct WeatherSnapshot {
    pub city: String,
    pub condition_main: String,
    pub condition_desc: String,
    pub temp: f64,
    pub feels_like: f64,
    pub humidity: u32,
    pub wind_speed: f64,
    pub icon: String,
}
