//! Published telemetry channels and single-value readings.

use core::fmt;
use core::ops::{BitOr, BitOrAssign};
use heater_proto::Telemetry;

/// One published telemetry value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Channel {
    SetTemperature,
    FanSpeed,
    SupplyVoltage,
    HeatExchangerTemperature,
    GlowPlugVoltage,
    GlowPlugCurrent,
    PumpFrequency,
    FanVoltage,
    RunState,
    ErrorCode,
    HeaterOn,
    DesiredTemperature,
}

impl Channel {
    /// Every channel, in publish order.
    pub const ALL: [Channel; 12] = [
        Channel::SetTemperature,
        Channel::FanSpeed,
        Channel::SupplyVoltage,
        Channel::HeatExchangerTemperature,
        Channel::GlowPlugVoltage,
        Channel::GlowPlugCurrent,
        Channel::PumpFrequency,
        Channel::FanVoltage,
        Channel::RunState,
        Channel::ErrorCode,
        Channel::HeaterOn,
        Channel::DesiredTemperature,
    ];

    /// Short machine-friendly key.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Channel::SetTemperature => "set_temp",
            Channel::FanSpeed => "fan_speed",
            Channel::SupplyVoltage => "supply_voltage",
            Channel::HeatExchangerTemperature => "heat_exchanger_temp",
            Channel::GlowPlugVoltage => "glow_plug_voltage",
            Channel::GlowPlugCurrent => "glow_plug_current",
            Channel::PumpFrequency => "pump_frequency",
            Channel::FanVoltage => "fan_voltage",
            Channel::RunState => "run_state",
            Channel::ErrorCode => "error_code",
            Channel::HeaterOn => "on_off",
            Channel::DesiredTemperature => "desired_temp",
        }
    }

    /// Bit for this channel in a [`Channels`] set.
    #[inline]
    #[must_use]
    pub const fn bit(self) -> Channels {
        Channels(1 << self as u16)
    }
}

/// Set of subscribed channels, as a bitfield.
///
/// # Example
///
/// ```
/// use heater_core::{Channel, Channels};
///
/// let channels = Channels::SUPPLY_VOLTAGE | Channels::RUN_STATE;
/// assert!(channels.contains(Channel::SupplyVoltage));
/// assert!(!channels.contains(Channel::FanSpeed));
/// ```
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Channels(pub u16);

impl Channels {
    pub const SET_TEMPERATURE: Self = Channel::SetTemperature.bit();
    pub const FAN_SPEED: Self = Channel::FanSpeed.bit();
    pub const SUPPLY_VOLTAGE: Self = Channel::SupplyVoltage.bit();
    pub const HEAT_EXCHANGER_TEMPERATURE: Self = Channel::HeatExchangerTemperature.bit();
    pub const GLOW_PLUG_VOLTAGE: Self = Channel::GlowPlugVoltage.bit();
    pub const GLOW_PLUG_CURRENT: Self = Channel::GlowPlugCurrent.bit();
    pub const PUMP_FREQUENCY: Self = Channel::PumpFrequency.bit();
    pub const FAN_VOLTAGE: Self = Channel::FanVoltage.bit();
    pub const RUN_STATE: Self = Channel::RunState.bit();
    pub const ERROR_CODE: Self = Channel::ErrorCode.bit();
    pub const HEATER_ON: Self = Channel::HeaterOn.bit();
    pub const DESIRED_TEMPERATURE: Self = Channel::DesiredTemperature.bit();

    /// No channels subscribed.
    pub const NONE: Self = Self(0);

    /// All twelve channels.
    pub const ALL: Self = Self((1 << Channel::ALL.len()) - 1);

    /// Check if the channel is subscribed.
    #[inline]
    #[must_use]
    pub const fn contains(self, channel: Channel) -> bool {
        self.0 & channel.bit().0 != 0
    }

    /// Subscribe a channel.
    #[inline]
    pub fn insert(&mut self, channel: Channel) {
        self.0 |= channel.bit().0;
    }

    /// Unsubscribe a channel.
    #[inline]
    pub fn remove(&mut self, channel: Channel) {
        self.0 &= !channel.bit().0;
    }

    /// Check if nothing is subscribed.
    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 & Self::ALL.0 == 0
    }

    /// Number of subscribed channels.
    #[inline]
    #[must_use]
    pub const fn len(self) -> usize {
        (self.0 & Self::ALL.0).count_ones() as usize
    }
}

impl BitOr for Channels {
    type Output = Self;

    #[inline]
    fn bitor(self, rhs: Self) -> Self::Output {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for Channels {
    #[inline]
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl From<Channel> for Channels {
    fn from(channel: Channel) -> Self {
        channel.bit()
    }
}

/// Channels published when nothing else is configured.
pub const DEFAULT_CHANNELS: Channels = Channels::ALL;

/// A single value ready for a sink.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Reading {
    /// Control-unit set-point, °C.
    SetTemperature(u8),
    /// Fan speed, RPM.
    FanSpeed(u16),
    /// Supply voltage, V.
    SupplyVoltage(f32),
    /// Heat exchanger temperature, °C.
    HeatExchangerTemperature(f32),
    /// Glow plug voltage, V.
    GlowPlugVoltage(f32),
    /// Glow plug current, A.
    GlowPlugCurrent(f32),
    /// Fuel pump frequency, Hz.
    PumpFrequency(f32),
    /// Fan voltage, V.
    FanVoltage(f32),
    /// Run-state description.
    RunState(&'static str),
    /// Error-code description.
    ErrorCode(&'static str),
    /// Heater on/off.
    HeaterOn(bool),
    /// Control-unit desired temperature, °C.
    DesiredTemperature(u8),
}

impl Reading {
    /// Take one channel's value from a telemetry snapshot.
    #[must_use]
    pub fn from_telemetry(telemetry: &Telemetry, channel: Channel) -> Self {
        match channel {
            Channel::SetTemperature => Reading::SetTemperature(telemetry.set_temperature),
            Channel::FanSpeed => Reading::FanSpeed(telemetry.fan_speed),
            Channel::SupplyVoltage => Reading::SupplyVoltage(telemetry.supply_voltage),
            Channel::HeatExchangerTemperature => {
                Reading::HeatExchangerTemperature(telemetry.heat_exchanger_temperature)
            }
            Channel::GlowPlugVoltage => Reading::GlowPlugVoltage(telemetry.glow_plug_voltage),
            Channel::GlowPlugCurrent => Reading::GlowPlugCurrent(telemetry.glow_plug_current),
            Channel::PumpFrequency => Reading::PumpFrequency(telemetry.pump_frequency),
            Channel::FanVoltage => Reading::FanVoltage(telemetry.fan_voltage),
            Channel::RunState => Reading::RunState(telemetry.run_state_description()),
            Channel::ErrorCode => Reading::ErrorCode(telemetry.error_description()),
            Channel::HeaterOn => Reading::HeaterOn(telemetry.heater_on),
            Channel::DesiredTemperature => {
                Reading::DesiredTemperature(telemetry.desired_temperature)
            }
        }
    }

    /// Channel this reading belongs to.
    #[must_use]
    pub const fn channel(&self) -> Channel {
        match self {
            Reading::SetTemperature(_) => Channel::SetTemperature,
            Reading::FanSpeed(_) => Channel::FanSpeed,
            Reading::SupplyVoltage(_) => Channel::SupplyVoltage,
            Reading::HeatExchangerTemperature(_) => Channel::HeatExchangerTemperature,
            Reading::GlowPlugVoltage(_) => Channel::GlowPlugVoltage,
            Reading::GlowPlugCurrent(_) => Channel::GlowPlugCurrent,
            Reading::PumpFrequency(_) => Channel::PumpFrequency,
            Reading::FanVoltage(_) => Channel::FanVoltage,
            Reading::RunState(_) => Channel::RunState,
            Reading::ErrorCode(_) => Channel::ErrorCode,
            Reading::HeaterOn(_) => Channel::HeaterOn,
            Reading::DesiredTemperature(_) => Channel::DesiredTemperature,
        }
    }
}

impl Reading {
    /// Unit suffix, empty for text and on/off values.
    #[must_use]
    pub const fn unit(&self) -> &'static str {
        match self {
            Reading::SetTemperature(_)
            | Reading::DesiredTemperature(_)
            | Reading::HeatExchangerTemperature(_) => "°C",
            Reading::FanSpeed(_) => "RPM",
            Reading::SupplyVoltage(_) | Reading::GlowPlugVoltage(_) | Reading::FanVoltage(_) => "V",
            Reading::GlowPlugCurrent(_) => "A",
            Reading::PumpFrequency(_) => "Hz",
            Reading::RunState(_) | Reading::ErrorCode(_) | Reading::HeaterOn(_) => "",
        }
    }
}

/// Formats the bare value: decimals as the heater reports them, text as-is,
/// on/off as `ON`/`OFF`.
impl fmt::Display for Reading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Reading::SetTemperature(v) | Reading::DesiredTemperature(v) => write!(f, "{v}"),
            Reading::FanSpeed(v) => write!(f, "{v}"),
            Reading::HeatExchangerTemperature(v) => write!(f, "{v:.0}"),
            Reading::GlowPlugCurrent(v) => write!(f, "{v:.2}"),
            Reading::SupplyVoltage(v)
            | Reading::GlowPlugVoltage(v)
            | Reading::PumpFrequency(v)
            | Reading::FanVoltage(v) => write!(f, "{v:.1}"),
            Reading::RunState(text) | Reading::ErrorCode(text) => f.write_str(text),
            Reading::HeaterOn(on) => f.write_str(if on { "ON" } else { "OFF" }),
        }
    }
}

/// Iterate the subscribed readings of a snapshot in publish order.
pub fn readings(
    telemetry: &Telemetry,
    channels: Channels,
) -> impl Iterator<Item = Reading> + '_ {
    Channel::ALL
        .into_iter()
        .filter(move |&channel| channels.contains(channel))
        .map(move |channel| Reading::from_telemetry(telemetry, channel))
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use heater_proto::FrameBuilder;
    use std::format;
    use std::vec::Vec;

    #[test]
    fn test_all_has_twelve_channels() {
        assert_eq!(Channels::ALL.len(), 12);
        for channel in Channel::ALL {
            assert!(Channels::ALL.contains(channel));
            assert!(!Channels::NONE.contains(channel));
        }
    }

    #[test]
    fn test_insert_remove() {
        let mut channels = Channels::NONE;
        assert!(channels.is_empty());
        channels.insert(Channel::PumpFrequency);
        assert!(channels.contains(Channel::PumpFrequency));
        channels.remove(Channel::PumpFrequency);
        assert!(channels.is_empty());
    }

    #[test]
    fn test_readings_in_publish_order() {
        let telemetry = Telemetry::unknown();
        let channels: Vec<Channel> = readings(&telemetry, Channels::ALL)
            .map(|r| r.channel())
            .collect();
        assert_eq!(channels, Channel::ALL);
    }

    #[test]
    fn test_readings_filtered() {
        let telemetry = Telemetry::from_frame(
            &FrameBuilder::new()
                .supply_voltage_raw(100)
                .run_state(5)
                .build(),
        );
        let out: Vec<Reading> =
            readings(&telemetry, Channels::RUN_STATE | Channels::SUPPLY_VOLTAGE).collect();
        assert_eq!(
            out,
            [Reading::SupplyVoltage(10.0), Reading::RunState("Running")]
        );
    }

    #[test]
    fn test_unknown_snapshot_descriptions() {
        let telemetry = Telemetry::unknown();
        let out: Vec<Reading> =
            readings(&telemetry, Channels::RUN_STATE | Channels::ERROR_CODE).collect();
        assert_eq!(out, [Reading::RunState("Unknown"), Reading::ErrorCode("Unknown")]);
    }

    #[test]
    fn test_display_values() {
        assert_eq!(format!("{}", Reading::SupplyVoltage(12.34)), "12.3");
        assert_eq!(format!("{}", Reading::GlowPlugCurrent(5.0)), "5.00");
        assert_eq!(format!("{}", Reading::HeatExchangerTemperature(165.0)), "165");
        assert_eq!(format!("{}", Reading::FanSpeed(2600)), "2600");
        assert_eq!(format!("{}", Reading::HeaterOn(false)), "OFF");
        assert_eq!(format!("{}", Reading::RunState("Cooldown")), "Cooldown");
        assert_eq!(Reading::PumpFrequency(4.2).unit(), "Hz");
        assert_eq!(Reading::ErrorCode("No Error").unit(), "");
    }

    #[test]
    fn test_keys_unique() {
        for (i, a) in Channel::ALL.iter().enumerate() {
            for b in &Channel::ALL[i + 1..] {
                assert_ne!(a.key(), b.key());
            }
        }
    }
}
