use crate::baud::BaudRate;

/// Parity checking mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Parity {
    #[default]
    None,
    Odd,
    Even,
}

impl Parity {
    /// The `c_cflag` bits this mode sets.
    pub fn flags(self) -> libc::tcflag_t {
        match self {
            Parity::None => 0,
            Parity::Odd => libc::PARENB | libc::PARODD,
            Parity::Even => libc::PARENB,
        }
    }
}

/// Number of stop bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum StopBits {
    #[default]
    One,
    Two,
}

/// Character size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum DataBits {
    Five,
    Six,
    Seven,
    #[default]
    Eight,
}

impl DataBits {
    /// The `CS*` flag for this size.
    pub fn flag(self) -> libc::tcflag_t {
        match self {
            DataBits::Five => libc::CS5,
            DataBits::Six => libc::CS6,
            DataBits::Seven => libc::CS7,
            DataBits::Eight => libc::CS8,
        }
    }

    /// Number of bits per character.
    pub fn bits(self) -> u8 {
        match self {
            DataBits::Five => 5,
            DataBits::Six => 6,
            DataBits::Seven => 7,
            DataBits::Eight => 8,
        }
    }
}

impl TryFrom<u8> for DataBits {
    type Error = u8;

    fn try_from(bits: u8) -> std::result::Result<Self, u8> {
        match bits {
            5 => Ok(DataBits::Five),
            6 => Ok(DataBits::Six),
            7 => Ok(DataBits::Seven),
            8 => Ok(DataBits::Eight),
            other => Err(other),
        }
    }
}

/// A complete line settings request.
///
/// Applying it only changes the control structure of an already-open
/// descriptor; the value itself is never stored by the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Settings {
    pub receive_rate: BaudRate,
    pub transmit_rate: BaudRate,
    /// `VMIN`: bytes required before a blocking read returns.
    pub minimum_bytes_to_read: u8,
    /// `VTIME`: read timeout in tenths of a second. 0 waits indefinitely.
    pub timeout: u8,
    pub parity: Parity,
    pub stop_bits: StopBits,
    pub data_bits: DataBits,
    /// RTS/CTS.
    pub hardware_flow_control: bool,
    /// XON/XOFF/XANY.
    pub software_flow_control: bool,
    /// `OPOST` output post-processing.
    pub process_output: bool,
}

impl Settings {
    /// Settings with the same rate in both directions and 8N1 framing.
    pub const fn new(rate: BaudRate) -> Self {
        Self {
            receive_rate: rate,
            transmit_rate: rate,
            minimum_bytes_to_read: 1,
            timeout: 0,
            parity: Parity::None,
            stop_bits: StopBits::One,
            data_bits: DataBits::Eight,
            hardware_flow_control: false,
            software_flow_control: false,
            process_output: false,
        }
    }

    #[must_use]
    pub const fn with_receive_rate(mut self, rate: BaudRate) -> Self {
        self.receive_rate = rate;
        self
    }

    #[must_use]
    pub const fn with_transmit_rate(mut self, rate: BaudRate) -> Self {
        self.transmit_rate = rate;
        self
    }

    #[must_use]
    pub const fn with_minimum_bytes_to_read(mut self, bytes: u8) -> Self {
        self.minimum_bytes_to_read = bytes;
        self
    }

    #[must_use]
    pub const fn with_timeout(mut self, deciseconds: u8) -> Self {
        self.timeout = deciseconds;
        self
    }

    #[must_use]
    pub const fn with_parity(mut self, parity: Parity) -> Self {
        self.parity = parity;
        self
    }

    #[must_use]
    pub const fn with_stop_bits(mut self, stop_bits: StopBits) -> Self {
        self.stop_bits = stop_bits;
        self
    }

    #[must_use]
    pub const fn with_data_bits(mut self, data_bits: DataBits) -> Self {
        self.data_bits = data_bits;
        self
    }

    #[must_use]
    pub const fn with_hardware_flow_control(mut self, enabled: bool) -> Self {
        self.hardware_flow_control = enabled;
        self
    }

    #[must_use]
    pub const fn with_software_flow_control(mut self, enabled: bool) -> Self {
        self.software_flow_control = enabled;
        self
    }

    #[must_use]
    pub const fn with_process_output(mut self, enabled: bool) -> Self {
        self.process_output = enabled;
        self
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::new(BaudRate::Baud9600)
    }
}
