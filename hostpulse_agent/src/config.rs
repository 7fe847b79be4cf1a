//! Command line / environment configuration for the agent.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use clap::Parser;

pub const DEFAULT_PORT: u16 = 9500;

#[derive(Debug, Clone, Parser)]
#[command(name = "hostpulse_agent", version, about = "Push live host metrics to hostpulse viewers")]
pub struct AgentArgs {
    /// Port to listen on
    #[arg(short, long, env = "PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Address to bind
    #[arg(long, default_value_t = IpAddr::V4(Ipv4Addr::UNSPECIFIED))]
    pub bind: IpAddr,
}

impl AgentArgs {
    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn port_long_short_and_assign() {
        let a = AgentArgs::try_parse_from(["agent", "--port", "9001"]).unwrap();
        assert_eq!(a.port, 9001);
        let a = AgentArgs::try_parse_from(["agent", "-p", "9002"]).unwrap();
        assert_eq!(a.port, 9002);
        let a = AgentArgs::try_parse_from(["agent", "--port=9003"]).unwrap();
        assert_eq!(a.port, 9003);
    }

    #[test]
    fn bind_defaults_to_all_interfaces() {
        let a = AgentArgs::try_parse_from(["agent", "-p", "9004"]).unwrap();
        assert_eq!(a.addr(), "0.0.0.0:9004".parse::<SocketAddr>().unwrap());
    }

    #[test]
    fn invalid_port_rejected() {
        assert!(AgentArgs::try_parse_from(["agent", "--port", "70000"]).is_err());
    }
}
