use std::{
    fmt::{self, Display, Formatter},
    net::SocketAddr,
    path::PathBuf,
};

observe::logging_args_with_default_filter!(LoggingArguments, "info,artifact_server=debug");

#[derive(clap::Parser)]
#[command(version, about = "Serves published deployment artifacts as JSON")]
pub struct Arguments {
    #[clap(flatten)]
    pub logging: LoggingArguments,

    #[clap(long, env, default_value = "0.0.0.0:8010")]
    pub bind_address: SocketAddr,

    /// Directory the deployer publishes into.
    #[clap(long, env, default_value = "public")]
    pub public_dir: PathBuf,
}

impl Display for Arguments {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        let Self {
            logging,
            bind_address,
            public_dir,
        } = self;

        write!(f, "{logging}")?;
        writeln!(f, "bind_address: {bind_address}")?;
        writeln!(f, "public_dir: {}", public_dir.display())?;
        Ok(())
    }
}
