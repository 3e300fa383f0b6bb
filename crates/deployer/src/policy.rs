use crate::tooling;

/// What to do when one step of a deployment batch fails.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum ErrorPolicy {
    /// Abort the batch on the first error.
    #[default]
    FailFast,
    /// Log the error and carry on with the next step.
    Continue,
}

impl ErrorPolicy {
    /// Applies the policy to the outcome of `step`. Returns `Ok(None)` for a
    /// tolerated failure. Cancellation is never tolerated.
    pub fn handle<T>(self, step: &str, result: anyhow::Result<T>) -> anyhow::Result<Option<T>> {
        match (result, self) {
            (Ok(value), _) => Ok(Some(value)),
            (Err(err), Self::FailFast) => Err(err.context(format!("{step} failed"))),
            (Err(err), Self::Continue) if is_cancelled(&err) => {
                Err(err.context(format!("{step} cancelled")))
            }
            (Err(err), Self::Continue) => {
                tracing::warn!(?err, %step, "step failed, continuing");
                Ok(None)
            }
        }
    }
}

fn is_cancelled(err: &anyhow::Error) -> bool {
    err.chain().any(|cause| {
        matches!(
            cause.downcast_ref::<submitter::Error>(),
            Some(submitter::Error::Cancelled { .. })
        ) || matches!(
            cause.downcast_ref::<tooling::Error>(),
            Some(tooling::Error::Submit(submitter::Error::Cancelled { .. }))
        )
    })
}
