//! Optional observability helpers for credential exchanges.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `identity_exchange.credential` with the
//!   `provider` and `operation` fields.
//! - Enable `metrics` to increment the `identity_exchange_credential_total` counter for every
//!   attempt/success/failure, labeled by `provider`, `operation`, and `outcome`.
//!
//! Operations a credential refuses up front (for example linking an anonymous credential)
//! resolve without entering this layer, so they produce neither spans nor counters.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::{
	_prelude::*,
	credential::{CredentialOperation, ExchangeFuture, ProviderId},
};

/// Outcome labels recorded for each attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ExchangeOutcome {
	/// Entry to a backend exchange.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller.
	Failure,
}
impl ExchangeOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			ExchangeOutcome::Attempt => "attempt",
			ExchangeOutcome::Success => "success",
			ExchangeOutcome::Failure => "failure",
		}
	}
}
impl Display for ExchangeOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Boxes a backend exchange, wrapping it in a span and recording its outcome.
pub(crate) fn instrument_exchange<'a, T, Fut>(
	provider: ProviderId,
	operation: CredentialOperation,
	fut: Fut,
) -> ExchangeFuture<'a, T>
where
	T: 'a,
	Fut: 'a + Send + Future<Output = Result<T>>,
{
	let span = ExchangeSpan::new(provider, operation);

	Box::pin(async move {
		record_exchange_outcome(provider, operation, ExchangeOutcome::Attempt);

		let result = span.instrument(fut).await;
		let outcome =
			if result.is_ok() { ExchangeOutcome::Success } else { ExchangeOutcome::Failure };

		record_exchange_outcome(provider, operation, outcome);

		result
	})
}
