use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;

/// Line rates the harness knows how to sweep, in sweep order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LinkSpeed {
    B115200,
    B230400,
    B460800,
    B500000,
    B576000,
    B921600,
    B1000000,
    B1152000,
    B1500000,
    B2000000,
    B2500000,
    B3000000,
    B3500000,
    B4000000,
}

impl LinkSpeed {
    pub const ALL: [LinkSpeed; 14] = [
        LinkSpeed::B115200,
        LinkSpeed::B230400,
        LinkSpeed::B460800,
        LinkSpeed::B500000,
        LinkSpeed::B576000,
        LinkSpeed::B921600,
        LinkSpeed::B1000000,
        LinkSpeed::B1152000,
        LinkSpeed::B1500000,
        LinkSpeed::B2000000,
        LinkSpeed::B2500000,
        LinkSpeed::B3000000,
        LinkSpeed::B3500000,
        LinkSpeed::B4000000,
    ];

    pub fn baud(self) -> u32 {
        match self {
            LinkSpeed::B115200 => 115_200,
            LinkSpeed::B230400 => 230_400,
            LinkSpeed::B460800 => 460_800,
            LinkSpeed::B500000 => 500_000,
            LinkSpeed::B576000 => 576_000,
            LinkSpeed::B921600 => 921_600,
            LinkSpeed::B1000000 => 1_000_000,
            LinkSpeed::B1152000 => 1_152_000,
            LinkSpeed::B1500000 => 1_500_000,
            LinkSpeed::B2000000 => 2_000_000,
            LinkSpeed::B2500000 => 2_500_000,
            LinkSpeed::B3000000 => 3_000_000,
            LinkSpeed::B3500000 => 3_500_000,
            LinkSpeed::B4000000 => 4_000_000,
        }
    }

    pub fn from_baud(baud: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.baud() == baud)
    }
}

impl fmt::Display for LinkSpeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.baud())
    }
}

impl FromStr for LinkSpeed {
    type Err = ConfigError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        s.parse::<u32>()
            .ok()
            .and_then(LinkSpeed::from_baud)
            .ok_or_else(|| ConfigError::UnknownSpeed(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declaration_order_is_ascending() {
        let bauds: Vec<u32> = LinkSpeed::ALL.iter().map(|s| s.baud()).collect();
        assert_eq!(bauds.first(), Some(&115_200));
        assert_eq!(bauds.last(), Some(&4_000_000));
        assert!(bauds.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn parse_known_and_unknown() {
        assert_eq!("921600".parse::<LinkSpeed>().unwrap(), LinkSpeed::B921600);
        assert_eq!(" 115200 ".parse::<LinkSpeed>().unwrap(), LinkSpeed::B115200);
        assert!(matches!(
            "9600".parse::<LinkSpeed>(),
            Err(ConfigError::UnknownSpeed(_))
        ));
        assert!("fast".parse::<LinkSpeed>().is_err());
    }

    #[test]
    fn display_is_numeric() {
        assert_eq!(LinkSpeed::B3500000.to_string(), "3500000");
    }
}
