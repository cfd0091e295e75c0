use crate::backend::Backend;
use crate::baud::BaudRate;

/// Linux/Android control structure layout.
#[derive(Debug, Clone, Copy)]
pub struct Linux;

impl Backend for Linux {
    const NAME: &'static str = "linux";

    fn speed_code(rate: BaudRate) -> libc::speed_t {
        match rate {
            BaudRate::Baud0 => libc::B0,
            BaudRate::Baud50 => libc::B50,
            BaudRate::Baud75 => libc::B75,
            BaudRate::Baud110 => libc::B110,
            BaudRate::Baud134 => libc::B134,
            BaudRate::Baud150 => libc::B150,
            BaudRate::Baud200 => libc::B200,
            BaudRate::Baud300 => libc::B300,
            BaudRate::Baud600 => libc::B600,
            BaudRate::Baud1200 => libc::B1200,
            BaudRate::Baud1800 => libc::B1800,
            BaudRate::Baud2400 => libc::B2400,
            BaudRate::Baud4800 => libc::B4800,
            BaudRate::Baud9600 => libc::B9600,
            BaudRate::Baud19200 => libc::B19200,
            BaudRate::Baud38400 => libc::B38400,
            BaudRate::Baud57600 => libc::B57600,
            BaudRate::Baud115200 => libc::B115200,
            BaudRate::Baud230400 => libc::B230400,
            BaudRate::Baud460800 => libc::B460800,
            BaudRate::Baud500000 => libc::B500000,
            BaudRate::Baud576000 => libc::B576000,
            BaudRate::Baud921600 => libc::B921600,
            BaudRate::Baud1000000 => libc::B1000000,
            BaudRate::Baud1152000 => libc::B1152000,
            BaudRate::Baud1500000 => libc::B1500000,
            BaudRate::Baud2000000 => libc::B2000000,
            BaudRate::Baud2500000 => libc::B2500000,
            BaudRate::Baud3500000 => libc::B3500000,
            BaudRate::Baud4000000 => libc::B4000000,
        }
    }

    fn set_hardware_flow_control(termios: &mut libc::termios, enabled: bool) {
        if enabled {
            termios.c_cflag |= libc::CRTSCTS;
        } else {
            termios.c_cflag &= !libc::CRTSCTS;
        }
    }
}
