use {
    crate::submitter::{Config, Padding},
    std::{
        fmt::{self, Display, Formatter},
        time::Duration,
    },
};

/// Command line arguments controlling transaction submission.
#[derive(clap::Parser)]
#[group(skip)]
pub struct Arguments {
    /// Inclusion fee in stroops paid on top of resource fees.
    #[clap(long, env, default_value = "100")]
    pub base_fee: u64,

    /// Instructions added to the simulated estimate.
    #[clap(long, env, default_value = "500000")]
    pub instruction_padding: u64,

    /// Stroops added to the simulated resource fee.
    #[clap(long, env, default_value = "100000")]
    pub resource_fee_padding: u64,

    /// Stroops added to the transaction fee on top of the minimum resource
    /// fee.
    #[clap(long, env, default_value = "10000000")]
    pub min_resource_fee_padding: u64,

    /// How often to check the status of a submitted transaction.
    #[clap(
        long,
        env,
        default_value = "2s",
        value_parser = humantime::parse_duration,
    )]
    pub poll_interval: Duration,

    /// How long to wait for a submitted transaction before giving up.
    #[clap(
        long,
        env,
        default_value = "2m",
        value_parser = humantime::parse_duration,
    )]
    pub max_wait: Duration,
}

impl Arguments {
    pub fn config(&self, network_passphrase: impl Into<String>) -> Config {
        Config {
            network_passphrase: network_passphrase.into(),
            base_fee: self.base_fee,
            padding: Padding {
                instructions: self.instruction_padding,
                resource_fee: self.resource_fee_padding,
                min_resource_fee: self.min_resource_fee_padding,
            },
            poll_interval: self.poll_interval,
            max_wait: self.max_wait,
        }
    }
}

impl Display for Arguments {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        let Self {
            base_fee,
            instruction_padding,
            resource_fee_padding,
            min_resource_fee_padding,
            poll_interval,
            max_wait,
        } = self;

        writeln!(f, "base_fee: {base_fee}")?;
        writeln!(f, "instruction_padding: {instruction_padding}")?;
        writeln!(f, "resource_fee_padding: {resource_fee_padding}")?;
        writeln!(f, "min_resource_fee_padding: {min_resource_fee_padding}")?;
        writeln!(f, "poll_interval: {poll_interval:?}")?;
        writeln!(f, "max_wait: {max_wait:?}")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use {super::*, clap::Parser};

    #[derive(Parser)]
    struct Test {
        #[clap(flatten)]
        submission: Arguments,
    }

    #[test]
    fn defaults_match_config_defaults() {
        let args = Test::parse_from(["test"]).submission;
        let config = args.config("net");
        let default = Config::new("net");

        assert_eq!(config.base_fee, default.base_fee);
        assert_eq!(config.padding, default.padding);
        assert_eq!(config.poll_interval, default.poll_interval);
        assert_eq!(config.max_wait, default.max_wait);
    }
}
