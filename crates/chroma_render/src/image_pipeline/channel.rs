use std::fmt;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Channel {
    Red,
    Green,
    Blue,
}

impl Channel {
    pub const ALL: [Channel; 3] = [Channel::Red, Channel::Green, Channel::Blue];

    /// Position of the channel inside an RGB pixel.
    pub fn index(self) -> usize {
        match self {
            Channel::Red => 0,
            Channel::Green => 1,
            Channel::Blue => 2,
        }
    }

    pub fn key(self) -> char {
        match self {
            Channel::Red => 'R',
            Channel::Green => 'G',
            Channel::Blue => 'B',
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown channel {0:?}, expected one of R, G, B")]
pub struct ParseChannelError(String);

impl FromStr for Channel {
    type Err = ParseChannelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "r" | "red" => Ok(Channel::Red),
            "g" | "green" => Ok(Channel::Green),
            "b" | "blue" => Ok(Channel::Blue),
            _ => Err(ParseChannelError(s.to_owned())),
        }
    }
}

/// Multiplicative factors keyed by channel. Channels without a factor are left untouched.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AdjustmentSpec {
    factors: [Option<f64>; 3],
}

impl AdjustmentSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a spec from optional per-channel factors, dropping any factor of exactly 1.0.
    pub fn from_factors(red: Option<f64>, green: Option<f64>, blue: Option<f64>) -> Self {
        let mut spec = Self::new();
        for (channel, factor) in Channel::ALL.into_iter().zip([red, green, blue]) {
            if let Some(factor) = factor.filter(|&factor| factor != 1.0) {
                spec.set(channel, factor);
            }
        }
        spec
    }

    pub fn with(mut self, channel: Channel, factor: f64) -> Self {
        self.set(channel, factor);
        self
    }

    pub fn set(&mut self, channel: Channel, factor: f64) {
        self.factors[channel.index()] = Some(factor);
    }

    pub fn remove(&mut self, channel: Channel) -> Option<f64> {
        self.factors[channel.index()].take()
    }

    pub fn factor(&self, channel: Channel) -> Option<f64> {
        self.factors[channel.index()]
    }

    pub fn is_identity(&self) -> bool {
        self.factors.iter().all(Option::is_none)
    }

    /// Active channels in R, G, B order.
    pub fn iter(&self) -> impl Iterator<Item = (Channel, f64)> + '_ {
        Channel::ALL.into_iter().filter_map(|channel| self.factor(channel).map(|f| (channel, f)))
    }
}

impl FromIterator<(Channel, f64)> for AdjustmentSpec {
    fn from_iter<I: IntoIterator<Item = (Channel, f64)>>(iter: I) -> Self {
        let mut spec = Self::new();
        for (channel, factor) in iter {
            spec.set(channel, factor);
        }
        spec
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_parses_keys_and_names() {
        assert_eq!("R".parse::<Channel>(), Ok(Channel::Red));
        assert_eq!("green".parse::<Channel>(), Ok(Channel::Green));
        assert_eq!(" b ".parse::<Channel>(), Ok(Channel::Blue));
        assert!("alpha".parse::<Channel>().is_err());
    }

    #[test]
    fn channel_display_uses_key() {
        let keys: String = Channel::ALL.iter().map(ToString::to_string).collect();
        assert_eq!(keys, "RGB");
    }

    #[test]
    fn from_factors_drops_unit_factors() {
        let spec = AdjustmentSpec::from_factors(Some(1.0), Some(0.5), None);
        assert_eq!(spec.factor(Channel::Red), None);
        assert_eq!(spec.factor(Channel::Green), Some(0.5));
        assert_eq!(spec.factor(Channel::Blue), None);
    }

    #[test]
    fn from_factors_of_ones_is_identity() {
        assert!(AdjustmentSpec::from_factors(Some(1.0), Some(1.0), Some(1.0)).is_identity());
    }

    #[test]
    fn iter_yields_channel_order() {
        let spec: AdjustmentSpec =
            [(Channel::Blue, 0.0), (Channel::Red, 2.0)].into_iter().collect();
        let active: Vec<_> = spec.iter().collect();
        assert_eq!(active, vec![(Channel::Red, 2.0), (Channel::Blue, 0.0)]);
    }

    #[test]
    fn later_factor_replaces_earlier() {
        let mut spec = AdjustmentSpec::new().with(Channel::Green, 3.0).with(Channel::Green, 0.25);
        assert_eq!(spec.factor(Channel::Green), Some(0.25));
        assert_eq!(spec.remove(Channel::Green), Some(0.25));
        assert!(spec.is_identity());
    }
}
