//! Chart series construction
//!
//! Converts a newest-first page of readings into two point series that run
//! oldest to newest, keeping every other reading.

use alloc::string::{String, ToString};
use alloc::vec::Vec;

use crate::reading::{Centi, Reading};

/// Padding added below the minimum and above the maximum temperature
pub const TEMPERATURE_AXIS_MARGIN: Centi = Centi::from_units(2);

/// Padding added below the minimum and above the maximum humidity
pub const HUMIDITY_AXIS_MARGIN: Centi = Centi::from_units(3);

/// Keep one reading out of this many
const DOWNSAMPLE_STRIDE: usize = 2;

/// A plotted value with its x position and axis label
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesPoint {
    /// Position in the oldest-first reading list
    pub x: u32,
    pub value: Centi,
    pub label: String,
}

/// Inclusive value range of an axis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxisRange {
    pub min: Centi,
    pub max: Centi,
}

impl AxisRange {
    /// Span of the values in `points`, widened by `margin` on both sides
    fn around(points: &[SeriesPoint], margin: Centi) -> Option<Self> {
        let min = points.iter().map(|p| p.value).min()?;
        let max = points.iter().map(|p| p.value).max()?;
        Some(Self {
            min: min.saturating_sub(margin),
            max: max.saturating_add(margin),
        })
    }
}

/// Temperature and humidity series sharing one x domain
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChartSeries {
    temperature: Vec<SeriesPoint>,
    humidity: Vec<SeriesPoint>,
    labels: Vec<String>,
    temperature_axis: Option<AxisRange>,
    humidity_axis: Option<AxisRange>,
}

impl ChartSeries {
    /// Build series from a newest-first page of readings
    pub fn build(readings: &[Reading]) -> Self {
        let labels: Vec<String> = readings
            .iter()
            .rev()
            .map(|r| r.time_label().to_string())
            .collect();

        let kept = readings
            .iter()
            .rev()
            .enumerate()
            .step_by(DOWNSAMPLE_STRIDE);

        let mut temperature = Vec::with_capacity(readings.len().div_ceil(DOWNSAMPLE_STRIDE));
        let mut humidity = Vec::with_capacity(temperature.capacity());
        for (x, reading) in kept {
            let x = x as u32;
            let label = reading.time_label().to_string();
            temperature.push(SeriesPoint {
                x,
                value: reading.temperature(),
                label: label.clone(),
            });
            humidity.push(SeriesPoint {
                x,
                value: reading.humidity(),
                label,
            });
        }

        let temperature_axis = AxisRange::around(&temperature, TEMPERATURE_AXIS_MARGIN);
        let humidity_axis = AxisRange::around(&humidity, HUMIDITY_AXIS_MARGIN);

        Self {
            temperature,
            humidity,
            labels,
            temperature_axis,
            humidity_axis,
        }
    }

    pub fn temperature(&self) -> &[SeriesPoint] {
        &self.temperature
    }

    pub fn humidity(&self) -> &[SeriesPoint] {
        &self.humidity
    }

    pub fn temperature_axis(&self) -> Option<AxisRange> {
        self.temperature_axis
    }

    pub fn humidity_axis(&self) -> Option<AxisRange> {
        self.humidity_axis
    }

    /// Number of x positions, including dropped readings
    pub fn x_len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.temperature.is_empty()
    }

    /// Axis label for an x position; empty outside the domain
    pub fn label_at(&self, x: u32) -> &str {
        self.labels.get(x as usize).map(String::as_str).unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::format;

    /// Newest-first readings, one per minute counting down from 12:59
    fn readings(temperatures: &[i32], humidities: &[i32]) -> Vec<Reading> {
        temperatures
            .iter()
            .zip(humidities)
            .enumerate()
            .map(|(i, (&t, &h))| {
                Reading::new(
                    format!("2021-03-04 12:{:02}:30", 59 - i),
                    Centi::from_hundredths(t),
                    Centi::from_hundredths(h),
                )
            })
            .collect()
    }

    #[test]
    fn test_downsampling_keeps_even_positions() {
        let input = readings(&[2600, 2500, 2400, 2300, 2200, 2100], &[4000; 6]);
        let series = ChartSeries::build(&input);

        let xs: Vec<u32> = series.temperature().iter().map(|p| p.x).collect();
        assert_eq!(xs, [0, 2, 4]);

        // Reversed list is [21, 22, 23, 24, 25, 26]; positions 0, 2, 4 survive
        let values: Vec<i32> = series
            .temperature()
            .iter()
            .map(|p| p.value.hundredths())
            .collect();
        assert_eq!(values, [2100, 2300, 2500]);
    }

    #[test]
    fn test_series_share_x_domain() {
        let input = readings(&[2000, 2100, 2200, 2300, 2400], &[4000, 4100, 4200, 4300, 4400]);
        let series = ChartSeries::build(&input);

        assert_eq!(series.temperature().len(), 3);
        for (t, h) in series.temperature().iter().zip(series.humidity()) {
            assert_eq!(t.x, h.x);
            assert_eq!(t.label, h.label);
        }
    }

    #[test]
    fn test_axis_bounds() {
        let input = readings(&[0, 2500, 0, 2000], &[0, 6000, 0, 4000]);
        let series = ChartSeries::build(&input);

        // Reversed positions 1 and 3 hold the zeros and are dropped
        assert_eq!(
            series.temperature_axis(),
            Some(AxisRange {
                min: Centi::from_units(18),
                max: Centi::from_units(27),
            })
        );
        assert_eq!(
            series.humidity_axis(),
            Some(AxisRange {
                min: Centi::from_units(37),
                max: Centi::from_units(63),
            })
        );
    }

    #[test]
    fn test_labels_for_every_position() {
        let input = readings(&[2000; 4], &[4000; 4]);
        let series = ChartSeries::build(&input);

        assert_eq!(series.x_len(), 4);
        assert_eq!(series.label_at(0), "12:56");
        assert_eq!(series.label_at(1), "12:57");
        assert_eq!(series.label_at(3), "12:59");
        assert_eq!(series.label_at(4), "");
        assert_eq!(series.temperature()[1].label, "12:58");
    }

    #[test]
    fn test_empty_input() {
        let series = ChartSeries::build(&[]);
        assert!(series.is_empty());
        assert_eq!(series.temperature_axis(), None);
        assert_eq!(series.humidity_axis(), None);
        assert_eq!(series, ChartSeries::default());
    }

    #[test]
    fn test_single_reading() {
        let input = readings(&[2150], &[5000]);
        let series = ChartSeries::build(&input);

        assert_eq!(series.temperature().len(), 1);
        assert_eq!(
            series.temperature_axis(),
            Some(AxisRange {
                min: Centi::from_hundredths(1950),
                max: Centi::from_hundredths(2350),
            })
        );
    }

    #[test]
    fn test_build_is_idempotent() {
        let input = readings(&[2000, 2210, 2320, 2100, 1990], &[4000, 4100, 4550, 4300, 4400]);
        assert_eq!(ChartSeries::build(&input), ChartSeries::build(&input));
    }
}
