//! Observability helpers shared between the binaries: logging initialization
//! and request spans for the HTTP server.
pub mod tracing;
pub mod tracing_axum;

/// Declares a clap argument struct with the logging options every binary
/// takes. The calling crate needs `clap` and `tracing` as dependencies.
#[macro_export]
macro_rules! logging_args_with_default_filter {
    ($struct_name:ident, $default_filter:literal) => {
        #[derive(clap::Parser)]
        pub struct $struct_name {
            #[clap(long, env, default_value = $default_filter)]
            pub log_filter: String,

            #[clap(long, env, default_value = "error")]
            pub log_stderr_threshold: ::tracing::level_filters::LevelFilter,
        }

        impl ::std::fmt::Display for $struct_name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                let Self {
                    log_filter,
                    log_stderr_threshold,
                } = self;

                writeln!(f, "log_filter: {log_filter}")?;
                writeln!(f, "log_stderr_threshold: {log_stderr_threshold}")?;
                Ok(())
            }
        }
    };
}
