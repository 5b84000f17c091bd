// self
use crate::{
	credential::{CredentialOperation, ProviderId},
	obs::ExchangeOutcome,
};

/// Records an exchange outcome via the global metrics recorder (when enabled).
pub fn record_exchange_outcome(
	provider: ProviderId,
	operation: CredentialOperation,
	outcome: ExchangeOutcome,
) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"identity_exchange_credential_total",
			"provider" => provider.as_str(),
			"operation" => operation.as_str(),
			"outcome" => outcome.as_str()
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (provider, operation, outcome);
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn record_exchange_outcome_noop_without_metrics() {
		record_exchange_outcome(
			ProviderId::Password,
			CredentialOperation::GetIdTokenResponse,
			ExchangeOutcome::Failure,
		);
	}
}
