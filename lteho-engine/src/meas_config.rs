//! Measurement Event Configurator
//!
//! Declares, at engine initialization, which measurement events the
//! configured strategy needs the UE to report, and hands out a `MeasId` for
//! each. The host forwards every registered configuration to the radio layer;
//! reports later come back tagged with the same id.
//!
//! # Reference
//! - 3GPP TS 36.331 section 6.3.5: ReportConfigEUTRA, Hysteresis, TimeToTrigger
//! - 3GPP TS 36.133 sections 9.1.4 and 9.1.7: RSRP/RSRQ report mapping

use std::fmt;
use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ConfigError;

/// maxMeasId of an RRC connection
pub const MAX_MEAS_ID: u8 = 32;

/// Quantized RSRQ report range (RSRQ_00 ..= RSRQ_34)
pub const RSRQ_RANGE: RangeInclusive<u8> = 0..=34;

/// Quantized RSRP report range (RSRP_00 ..= RSRP_97)
pub const RSRP_RANGE: RangeInclusive<u8> = 0..=97;

/// a3-Offset range in 0.5 dB units
pub const A3_OFFSET_RANGE: RangeInclusive<i8> = -30..=30;

/// Measured quantity an event is evaluated on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Quantity {
    Rsrp,
    Rsrq,
}

impl Quantity {
    /// Valid quantized range for thresholds on this quantity
    pub fn range(&self) -> RangeInclusive<u8> {
        match self {
            Quantity::Rsrp => RSRP_RANGE,
            Quantity::Rsrq => RSRQ_RANGE,
        }
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Quantity::Rsrp => write!(f, "RSRP"),
            Quantity::Rsrq => write!(f, "RSRQ"),
        }
    }
}

/// Measurement event kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    /// Serving becomes worse than threshold
    A2,
    /// Neighbour becomes offset better than serving
    A3,
    /// Neighbour becomes better than threshold
    A4,
}

/// Time to trigger (TS 36.331 TimeToTrigger)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TimeToTrigger {
    /// 0 ms
    #[default]
    Ms0,
    /// 40 ms
    Ms40,
    /// 64 ms
    Ms64,
    /// 80 ms
    Ms80,
    /// 100 ms
    Ms100,
    /// 128 ms
    Ms128,
    /// 160 ms
    Ms160,
    /// 256 ms
    Ms256,
    /// 320 ms
    Ms320,
    /// 480 ms
    Ms480,
    /// 512 ms
    Ms512,
    /// 640 ms
    Ms640,
    /// 1024 ms
    Ms1024,
    /// 1280 ms
    Ms1280,
    /// 2560 ms
    Ms2560,
    /// 5120 ms
    Ms5120,
}

impl TimeToTrigger {
    const ALL: [TimeToTrigger; 16] = [
        TimeToTrigger::Ms0,
        TimeToTrigger::Ms40,
        TimeToTrigger::Ms64,
        TimeToTrigger::Ms80,
        TimeToTrigger::Ms100,
        TimeToTrigger::Ms128,
        TimeToTrigger::Ms160,
        TimeToTrigger::Ms256,
        TimeToTrigger::Ms320,
        TimeToTrigger::Ms480,
        TimeToTrigger::Ms512,
        TimeToTrigger::Ms640,
        TimeToTrigger::Ms1024,
        TimeToTrigger::Ms1280,
        TimeToTrigger::Ms2560,
        TimeToTrigger::Ms5120,
    ];

    /// Get the time-to-trigger value in milliseconds
    pub fn to_ms(&self) -> u32 {
        match self {
            TimeToTrigger::Ms0 => 0,
            TimeToTrigger::Ms40 => 40,
            TimeToTrigger::Ms64 => 64,
            TimeToTrigger::Ms80 => 80,
            TimeToTrigger::Ms100 => 100,
            TimeToTrigger::Ms128 => 128,
            TimeToTrigger::Ms160 => 160,
            TimeToTrigger::Ms256 => 256,
            TimeToTrigger::Ms320 => 320,
            TimeToTrigger::Ms480 => 480,
            TimeToTrigger::Ms512 => 512,
            TimeToTrigger::Ms640 => 640,
            TimeToTrigger::Ms1024 => 1024,
            TimeToTrigger::Ms1280 => 1280,
            TimeToTrigger::Ms2560 => 2560,
            TimeToTrigger::Ms5120 => 5120,
        }
    }

    /// Exact match on one of the standard values
    pub fn from_ms(ms: u32) -> Result<Self, ConfigError> {
        Self::ALL
            .into_iter()
            .find(|t| t.to_ms() == ms)
            .ok_or(ConfigError::InvalidTimeToTrigger(ms))
    }
}

/// Report interval of periodical/triggered reports (TS 36.331 ReportInterval)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ReportInterval {
    #[default]
    Ms120,
    Ms240,
    Ms480,
    Ms640,
    Ms1024,
    Ms2048,
    Ms5120,
    Ms10240,
}

impl ReportInterval {
    const ALL: [ReportInterval; 8] = [
        ReportInterval::Ms120,
        ReportInterval::Ms240,
        ReportInterval::Ms480,
        ReportInterval::Ms640,
        ReportInterval::Ms1024,
        ReportInterval::Ms2048,
        ReportInterval::Ms5120,
        ReportInterval::Ms10240,
    ];

    pub fn to_ms(&self) -> u32 {
        match self {
            ReportInterval::Ms120 => 120,
            ReportInterval::Ms240 => 240,
            ReportInterval::Ms480 => 480,
            ReportInterval::Ms640 => 640,
            ReportInterval::Ms1024 => 1024,
            ReportInterval::Ms2048 => 2048,
            ReportInterval::Ms5120 => 5120,
            ReportInterval::Ms10240 => 10240,
        }
    }

    pub fn from_ms(ms: u32) -> Result<Self, ConfigError> {
        Self::ALL
            .into_iter()
            .find(|r| r.to_ms() == ms)
            .ok_or(ConfigError::InvalidReportInterval(ms))
    }
}

/// Hysteresis stored as its information-element value (0.5 dB units, 0..=30)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Hysteresis(u8);

impl Hysteresis {
    /// Largest IE value (15 dB)
    pub const MAX_IE: u8 = 30;

    /// Rounds `db` to the nearest 0.5 dB step; rejects values outside [0, 15] dB.
    pub fn from_db(db: f64) -> Result<Self, ConfigError> {
        if !(0.0..=15.0).contains(&db) {
            return Err(ConfigError::InvalidHysteresis(format!(
                "{} dB must be in range [0.0, 15.0]",
                db
            )));
        }
        Ok(Hysteresis((db * 2.0).round() as u8))
    }

    pub fn from_ie(ie: u8) -> Result<Self, ConfigError> {
        if ie > Self::MAX_IE {
            return Err(ConfigError::InvalidHysteresis(format!(
                "IE value {} exceeds {}",
                ie,
                Self::MAX_IE
            )));
        }
        Ok(Hysteresis(ie))
    }

    pub fn ie_value(&self) -> u8 {
        self.0
    }

    pub fn to_db(&self) -> f64 {
        f64::from(self.0) / 2.0
    }
}

/// Opaque identifier of a registered measurement event
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MeasId(pub u8);

impl fmt::Display for MeasId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One measurement event the engine needs reported. Immutable once
/// registered.
#[derive(Debug, Clone, PartialEq)]
pub struct MeasurementConfig {
    pub quantity: Quantity,
    pub event_kind: EventKind,
    /// Quantized threshold for A2/A4, unused for A3
    pub threshold: u8,
    /// A3 offset in 0.5 dB units, unused for A2/A4
    pub a3_offset: i8,
    pub hysteresis: Hysteresis,
    pub time_to_trigger: TimeToTrigger,
    pub report_interval: ReportInterval,
}

impl MeasurementConfig {
    /// A2 on RSRQ: serving becomes worse than `threshold`
    pub fn a2_rsrq(threshold: u8) -> Self {
        Self {
            quantity: Quantity::Rsrq,
            event_kind: EventKind::A2,
            threshold,
            a3_offset: 0,
            hysteresis: Hysteresis::default(),
            time_to_trigger: TimeToTrigger::Ms0,
            report_interval: ReportInterval::Ms120,
        }
    }

    /// A3 on RSRQ with zero offset; the margin is carried by the hysteresis
    pub fn a3_rsrq(hysteresis: Hysteresis, time_to_trigger: TimeToTrigger) -> Self {
        Self {
            quantity: Quantity::Rsrq,
            event_kind: EventKind::A3,
            threshold: 0,
            a3_offset: 0,
            hysteresis,
            time_to_trigger,
            report_interval: ReportInterval::Ms120,
        }
    }

    /// A4 on RSRQ: neighbour becomes better than `threshold`
    pub fn a4_rsrq(threshold: u8) -> Self {
        Self {
            quantity: Quantity::Rsrq,
            event_kind: EventKind::A4,
            threshold,
            a3_offset: 0,
            hysteresis: Hysteresis::default(),
            time_to_trigger: TimeToTrigger::Ms0,
            report_interval: ReportInterval::Ms120,
        }
    }

    pub fn with_report_interval(mut self, report_interval: ReportInterval) -> Self {
        self.report_interval = report_interval;
        self
    }

    /// Range checks on the fields not already enforced by their types
    pub fn validate(&self) -> Result<(), ConfigError> {
        let range = self.quantity.range();
        if matches!(self.event_kind, EventKind::A2 | EventKind::A4) && !range.contains(&self.threshold)
        {
            return Err(ConfigError::InvalidThreshold(format!(
                "{} threshold {} outside [{}, {}]",
                self.quantity,
                self.threshold,
                range.start(),
                range.end()
            )));
        }
        if !A3_OFFSET_RANGE.contains(&self.a3_offset) {
            return Err(ConfigError::InvalidOffset(format!(
                "a3-Offset {} outside [{}, {}]",
                self.a3_offset,
                A3_OFFSET_RANGE.start(),
                A3_OFFSET_RANGE.end()
            )));
        }
        if self.hysteresis.ie_value() > Hysteresis::MAX_IE {
            return Err(ConfigError::InvalidHysteresis(format!(
                "IE value {}",
                self.hysteresis.ie_value()
            )));
        }
        Ok(())
    }
}

/// Allocates measurement identities for the events a strategy needs
#[derive(Debug, Default)]
pub struct MeasurementConfigurator {
    events: Vec<(MeasId, MeasurementConfig)>,
}

impl MeasurementConfigurator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates `config` and assigns it the next free identity.
    ///
    /// Identical configurations registered twice get two distinct ids.
    pub fn register_event(&mut self, config: MeasurementConfig) -> Result<MeasId, ConfigError> {
        config.validate()?;
        if self.events.len() >= usize::from(MAX_MEAS_ID) {
            return Err(ConfigError::TooManyMeasurements { max: MAX_MEAS_ID });
        }
        let meas_id = MeasId(self.events.len() as u8 + 1);
        debug!(
            "Registered measurement event {:?} on {} as measId {} (threshold={}, hysteresis={} dB, ttt={} ms)",
            config.event_kind,
            config.quantity,
            meas_id,
            config.threshold,
            config.hysteresis.to_db(),
            config.time_to_trigger.to_ms()
        );
        self.events.push((meas_id, config));
        Ok(meas_id)
    }

    pub fn get(&self, meas_id: MeasId) -> Option<&MeasurementConfig> {
        self.events
            .iter()
            .find(|(id, _)| *id == meas_id)
            .map(|(_, config)| config)
    }

    pub fn events(&self) -> impl Iterator<Item = (MeasId, &MeasurementConfig)> {
        self.events.iter().map(|(id, config)| (*id, config))
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
