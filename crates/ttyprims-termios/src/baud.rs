use std::fmt;
use std::str::FromStr;

use crate::backend::{Backend, Platform};
use crate::error::{Result, TermiosError};

macro_rules! baud_rates {
    ($($variant:ident => $rate:literal),+ $(,)?) => {
        /// A supported serial line speed.
        ///
        /// Only the rates listed here are accepted; arbitrary integers are
        /// rejected with [`TermiosError::InvalidRate`].
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub enum BaudRate {
            $($variant,)+
        }

        impl BaudRate {
            /// Every supported rate, ascending.
            pub const ALL: &'static [BaudRate] = &[$(BaudRate::$variant,)+];

            /// The rate in bits per second.
            pub const fn value(self) -> u32 {
                match self {
                    $(BaudRate::$variant => $rate,)+
                }
            }

            /// Look up a supported rate.
            pub fn new(rate: u32) -> Result<Self> {
                match rate {
                    $($rate => Ok(BaudRate::$variant),)+
                    other => Err(TermiosError::InvalidRate(other)),
                }
            }
        }
    };
}

baud_rates! {
    Baud0 => 0,
    Baud50 => 50,
    Baud75 => 75,
    Baud110 => 110,
    Baud134 => 134,
    Baud150 => 150,
    Baud200 => 200,
    Baud300 => 300,
    Baud600 => 600,
    Baud1200 => 1200,
    Baud1800 => 1800,
    Baud2400 => 2400,
    Baud4800 => 4800,
    Baud9600 => 9600,
    Baud19200 => 19200,
    Baud38400 => 38400,
    Baud57600 => 57600,
    Baud115200 => 115200,
    Baud230400 => 230400,
    Baud460800 => 460800,
    Baud500000 => 500000,
    Baud576000 => 576000,
    Baud921600 => 921600,
    Baud1000000 => 1000000,
    Baud1152000 => 1152000,
    Baud1500000 => 1500000,
    Baud2000000 => 2000000,
    Baud2500000 => 2500000,
    Baud3500000 => 3500000,
    Baud4000000 => 4000000,
}

impl BaudRate {
    /// The OS speed code (`speed_t`) for this rate on the current platform.
    pub fn speed(self) -> libc::speed_t {
        Platform::speed_code(self)
    }
}

impl Default for BaudRate {
    fn default() -> Self {
        BaudRate::Baud9600
    }
}

impl TryFrom<u32> for BaudRate {
    type Error = TermiosError;

    fn try_from(rate: u32) -> Result<Self> {
        BaudRate::new(rate)
    }
}

impl From<BaudRate> for u32 {
    fn from(rate: BaudRate) -> Self {
        rate.value()
    }
}

impl FromStr for BaudRate {
    type Err = TermiosError;

    fn from_str(s: &str) -> Result<Self> {
        let rate: u32 = s
            .trim()
            .parse()
            .map_err(|_| TermiosError::UnparsableRate(s.to_string()))?;
        BaudRate::new(rate)
    }
}

impl fmt::Display for BaudRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value())
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for BaudRate {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_u32(self.value())
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for BaudRate {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let rate = u32::deserialize(deserializer)?;
        BaudRate::new(rate).map_err(serde::de::Error::custom)
    }
}
