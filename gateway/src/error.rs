//! Error kinds surfaced by the gateway crate, aggregated from its submodules.

use snafu::Snafu;

#[derive(Debug, Snafu)]
#[non_exhaustive]
pub enum Error {
    #[snafu(transparent)]
    Policy { source: crate::policy::Error },

    #[snafu(transparent)]
    Dispatch { source: crate::dispatcher::Error },

    #[snafu(transparent)]
    Handler { source: crate::handlers::Error },

    #[snafu(transparent)]
    Client { source: crate::client::Error },

    #[snafu(transparent)]
    FindAnswers { source: crate::find_answers::Error },

    #[snafu(transparent)]
    Server { source: crate::server::Error },

    /// the application entity title is empty or exceeds 16 characters
    BadApplicationEntityTitle { aet: String },

    /// a parameter value is out of its valid range
    #[snafu(display("parameter out of range: {}", what))]
    ParameterOutOfRange { what: String },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
