use serde_aux::field_attributes::deserialize_option_number_from_string;

#[derive(serde::Serialize, serde::Deserialize, Debug)]
pub struct ErrorBody {
    pub error: String,
}

#[derive(serde::Deserialize, Debug)]
pub struct CoordinatesBody {
    #[serde(default, deserialize_with = "deserialize_option_number_from_string")]
    pub lat: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_option_number_from_string")]
    pub lon: Option<f64>,
}

impl CoordinatesBody {
    /// Zero is a valid coordinate; only absent or non-finite values are missing.
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        let lat = self.lat.filter(|v| v.is_finite())?;
        let lon = self.lon.filter(|v| v.is_finite())?;
        Some((lat, lon))
    }
}

#[derive(serde::Deserialize, Debug)]
pub struct GeocodeBody {
    #[serde(default)]
    pub query: Option<String>,
}
