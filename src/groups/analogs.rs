//! Analog group: scalar sensor channels sharing one time base.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::core::{Column, Sampled, SampledSeries, SeriesRepr, Table};
use crate::util::{Error, Result};

/// One scalar sensor stream (EMG, amplifier output, ...).
///
/// `data` holds raw values; `scale` and `offset` describe how to reach
/// engineering units but are never applied on storage.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnalogChannel {
    units: String,
    data: Vec<f64>,
    #[serde(default = "unit_scale")]
    scale: f64,
    #[serde(default)]
    offset: f64,
    #[serde(default)]
    description: String,
}

fn unit_scale() -> f64 {
    1.0
}

impl AnalogChannel {
    pub fn new(units: impl Into<String>, data: Vec<f64>) -> Self {
        Self {
            units: units.into(),
            data,
            scale: 1.0,
            offset: 0.0,
            description: String::new(),
        }
    }

    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_offset(mut self, offset: f64) -> Self {
        self.offset = offset;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn units(&self) -> &str {
        &self.units
    }

    /// Raw samples.
    pub fn data(&self) -> &[f64] {
        &self.data
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn offset(&self) -> f64 {
        self.offset
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Samples in engineering units: `(raw - offset) * scale * gen_scale`.
    pub fn engineering_values(&self, gen_scale: f64) -> Vec<f64> {
        let factor = self.scale * gen_scale;
        self.data.iter().map(|v| (v - self.offset) * factor).collect()
    }
}

/// Analog channels sampled on one [`SampledSeries`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "AnalogsRepr")]
pub struct Analogs {
    series: SampledSeries,
    channels: BTreeMap<String, AnalogChannel>,
    gen_scale: f64,
}

#[derive(Deserialize)]
pub(crate) struct AnalogsRepr {
    series: SeriesRepr,
    channels: BTreeMap<String, AnalogChannel>,
    #[serde(default = "unit_scale")]
    gen_scale: f64,
}

impl TryFrom<AnalogsRepr> for Analogs {
    type Error = Error;

    fn try_from(r: AnalogsRepr) -> Result<Self> {
        let series = SampledSeries::try_from(r.series)?;
        Ok(Self::new(series, r.channels, r.gen_scale))
    }
}

impl Analogs {
    pub fn new(
        series: SampledSeries,
        channels: BTreeMap<String, AnalogChannel>,
        gen_scale: f64,
    ) -> Self {
        Self {
            series,
            channels,
            gen_scale,
        }
    }

    /// General scale factor shared by every channel.
    pub fn gen_scale(&self) -> f64 {
        self.gen_scale
    }

    pub fn channels(&self) -> &BTreeMap<String, AnalogChannel> {
        &self.channels
    }

    pub fn channel_names(&self) -> impl Iterator<Item = &str> {
        self.channels.keys().map(String::as_str)
    }

    /// Look up a channel by name.
    pub fn channel(&self, name: &str) -> Result<&AnalogChannel> {
        self.channels
            .get(name)
            .ok_or_else(|| Error::ChannelNotFound(name.to_string()))
    }

    /// Wide table of raw channel values, one column per channel.
    ///
    /// Scale, offset and `gen_scale` are not applied; see
    /// [`AnalogChannel::engineering_values`].
    pub fn to_table(&self) -> Result<Table> {
        Table::from_columns(
            self.channels
                .iter()
                .map(|(name, ch)| Column::from_f64(name.as_str(), &ch.data))
                .collect(),
        )
    }
}

impl Sampled for Analogs {
    fn series(&self) -> &SampledSeries {
        &self.series
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::ErrorKind;

    fn analogs() -> Analogs {
        let series = SampledSeries::new(0, 3, 1000.0).unwrap();
        let mut channels = BTreeMap::new();
        channels.insert(
            "EMG1".to_string(),
            AnalogChannel::new("V", vec![1.0, 2.0, 3.0, 4.0])
                .with_scale(2.0)
                .with_offset(1.0),
        );
        channels.insert("EMG2".to_string(), AnalogChannel::new("V", vec![0.0; 4]));
        Analogs::new(series, channels, 0.5)
    }

    #[test]
    fn test_engineering_values() {
        let a = analogs();
        let ch = a.channel("EMG1").unwrap();
        assert_eq!(ch.engineering_values(a.gen_scale()), vec![0.0, 1.0, 2.0, 3.0]);
        assert_eq!(ch.data(), &[1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_channel_lookup() {
        let err = analogs().channel("EMG9").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Lookup);
    }

    #[test]
    fn test_to_table_raw_values() {
        let table = analogs().to_table().unwrap();
        let names: Vec<&str> = table.column_names().collect();
        assert_eq!(names, vec!["EMG1", "EMG2"]);
        assert_eq!(table.column("EMG1").unwrap().to_f64(), vec![1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_to_table_uneven_channels() {
        let series = SampledSeries::new(0, 3, 1000.0).unwrap();
        let mut channels = BTreeMap::new();
        channels.insert("A".to_string(), AnalogChannel::new("V", vec![0.0; 4]));
        channels.insert("B".to_string(), AnalogChannel::new("V", vec![0.0; 3]));
        let err = Analogs::new(series, channels, 1.0).to_table().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Shape);
    }

    #[test]
    fn test_sampled_time() {
        let a = analogs();
        assert_eq!(a.total_frames(), 4);
        assert_eq!(a.time()[2], 0.002);
    }

    #[test]
    fn test_channel_serde_defaults() {
        let ch: AnalogChannel = serde_json::from_str(r#"{"units":"V","data":[1.0]}"#).unwrap();
        assert_eq!(ch.scale(), 1.0);
        assert_eq!(ch.offset(), 0.0);
    }
}
