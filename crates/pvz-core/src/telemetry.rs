//! Use case outcome reporting
//!
//! Every handler funnels its result through [`record`], which logs the
//! outcome and, with the `metrics` feature, bumps a counter labelled by use
//! case and error kind.

use tracing::{debug, error};

use crate::{
    application::{ApplicationResult, UseCase},
    domain::ErrorKind,
};

/// Counter incremented once per handled use case
#[cfg(feature = "metrics")]
pub(crate) const USE_CASE_COUNTER: &str = "pvz_use_cases_total";

pub(crate) fn record<U: UseCase, T>(result: &ApplicationResult<T>) {
    let outcome = match result {
        Ok(_) => "ok",
        Err(err) => err.kind().as_str(),
    };

    match result {
        Ok(_) => debug!(use_case = U::NAME, "use case completed"),
        Err(err) if err.kind() == ErrorKind::Infrastructure => {
            error!(use_case = U::NAME, error = %err, "use case failed")
        }
        Err(err) => debug!(use_case = U::NAME, kind = outcome, error = %err, "use case rejected"),
    }

    #[cfg(feature = "metrics")]
    metrics::counter!(USE_CASE_COUNTER, "use_case" => U::NAME, "outcome" => outcome).increment(1);
}
