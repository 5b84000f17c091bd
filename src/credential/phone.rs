//! Phone credentials exchanged through `accounts:signInWithPhoneNumber`.

// self
use crate::{
	_prelude::*,
	api::{self, PhoneOperation, SignInWithPhoneNumberRequest, TransportErrorMapper},
	auth::AuthContext,
	credential::{
		self, CredentialExchange, CredentialOperation, ExchangeFuture, ProviderId, SignInMethod,
	},
	http::BackendHttpClient,
	obs,
	token::{TokenResponse, TokenSecret},
};

#[derive(Clone, Debug, PartialEq, Eq)]
enum PhoneProof {
	Verification { verification_id: String, verification_code: TokenSecret },
	TemporaryProof { temporary_proof: TokenSecret, phone_number: String },
}

/// Credential proving control of a phone number.
///
/// Built either from the verification id returned when the SMS was sent plus the code the
/// user typed, or from a temporary proof issued by an earlier verification of the number.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PhoneAuthCredential {
	proof: PhoneProof,
}
impl PhoneAuthCredential {
	/// Creates a credential from a verification id and the SMS code.
	pub fn from_verification(
		verification_id: impl Into<String>,
		verification_code: impl Into<TokenSecret>,
	) -> Result<Self> {
		let verification_id = verification_id.into();
		let verification_code = verification_code.into();

		credential::require_non_empty("verificationId", &verification_id)?;
		credential::require_non_empty("verificationCode", verification_code.expose())?;

		Ok(Self { proof: PhoneProof::Verification { verification_id, verification_code } })
	}

	/// Creates a credential from a temporary proof and the number it was issued for.
	pub fn from_temporary_proof(
		temporary_proof: impl Into<TokenSecret>,
		phone_number: impl Into<String>,
	) -> Result<Self> {
		let temporary_proof = temporary_proof.into();
		let phone_number = phone_number.into();

		credential::require_non_empty("temporaryProof", temporary_proof.expose())?;
		credential::require_non_empty("phoneNumber", &phone_number)?;

		Ok(Self { proof: PhoneProof::TemporaryProof { temporary_proof, phone_number } })
	}

	/// Phone number carried by a temporary-proof credential.
	pub fn phone_number(&self) -> Option<&str> {
		match &self.proof {
			PhoneProof::TemporaryProof { phone_number, .. } => Some(phone_number),
			PhoneProof::Verification { .. } => None,
		}
	}

	pub(crate) fn from_json(value: serde_json::Value) -> Result<Self> {
		let payload = credential::decode_json::<PhoneCredentialJson>(value)?;

		if payload.sign_in_method != SignInMethod::Phone
			|| payload.provider_id.is_some_and(|provider| provider != ProviderId::Phone)
		{
			return Err(Error::invalid_credential("phone credentials use the `phone` provider"));
		}

		match payload {
			PhoneCredentialJson {
				verification_id: Some(id), verification_code: Some(code), ..
			} => Self::from_verification(id, code),
			PhoneCredentialJson {
				temporary_proof: Some(proof), phone_number: Some(number), ..
			} => Self::from_temporary_proof(proof, number),
			_ => Err(Error::invalid_credential(
				"expected verificationId + verificationCode or temporaryProof + phoneNumber",
			)),
		}
	}

	fn request(
		&self,
		id_token: Option<TokenSecret>,
		operation: Option<PhoneOperation>,
	) -> SignInWithPhoneNumberRequest {
		let mut request = SignInWithPhoneNumberRequest { id_token, operation, ..Default::default() };

		match &self.proof {
			PhoneProof::Verification { verification_id, verification_code } => {
				request.session_info = Some(verification_id.clone());
				request.code = Some(verification_code.clone());
			},
			PhoneProof::TemporaryProof { temporary_proof, phone_number } => {
				request.temporary_proof = Some(temporary_proof.clone());
				request.phone_number = Some(phone_number.clone());
			},
		}

		request
	}
}
impl CredentialExchange for PhoneAuthCredential {
	fn provider_id(&self) -> ProviderId {
		ProviderId::Phone
	}

	fn sign_in_method(&self) -> SignInMethod {
		SignInMethod::Phone
	}

	fn get_id_token_response<'a, C, M>(
		&'a self,
		auth: &'a AuthContext<C, M>,
	) -> ExchangeFuture<'a, TokenResponse>
	where
		C: ?Sized + BackendHttpClient,
		M: ?Sized + TransportErrorMapper<C::TransportError>,
	{
		obs::instrument_exchange(
			ProviderId::Phone,
			CredentialOperation::GetIdTokenResponse,
			api::sign_in_with_phone_number(auth, self.request(None, None)),
		)
	}

	fn link_to_id_token<'a, C, M>(
		&'a self,
		auth: &'a AuthContext<C, M>,
		id_token: &'a str,
	) -> ExchangeFuture<'a, TokenResponse>
	where
		C: ?Sized + BackendHttpClient,
		M: ?Sized + TransportErrorMapper<C::TransportError>,
	{
		obs::instrument_exchange(
			ProviderId::Phone,
			CredentialOperation::LinkToIdToken,
			api::sign_in_with_phone_number(
				auth,
				self.request(Some(TokenSecret::new(id_token)), None),
			),
		)
	}

	fn match_id_token_with_uid<'a, C, M>(
		&'a self,
		auth: &'a AuthContext<C, M>,
		uid: &'a str,
	) -> ExchangeFuture<'a, TokenResponse>
	where
		C: ?Sized + BackendHttpClient,
		M: ?Sized + TransportErrorMapper<C::TransportError>,
	{
		let request = self.request(None, Some(PhoneOperation::Reauth));

		obs::instrument_exchange(
			ProviderId::Phone,
			CredentialOperation::MatchIdTokenWithUid,
			credential::verify_uid(api::sign_in_with_phone_number(auth, request), uid),
		)
	}

	fn to_json(&self) -> Result<serde_json::Value> {
		let mut payload = PhoneCredentialJson {
			provider_id: Some(ProviderId::Phone),
			sign_in_method: SignInMethod::Phone,
			verification_id: None,
			verification_code: None,
			temporary_proof: None,
			phone_number: None,
		};

		match &self.proof {
			PhoneProof::Verification { verification_id, verification_code } => {
				payload.verification_id = Some(verification_id.clone());
				payload.verification_code = Some(verification_code.clone());
			},
			PhoneProof::TemporaryProof { temporary_proof, phone_number } => {
				payload.temporary_proof = Some(temporary_proof.clone());
				payload.phone_number = Some(phone_number.clone());
			},
		}

		credential::encode_json(&payload)
	}
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PhoneCredentialJson {
	#[serde(default)]
	provider_id: Option<ProviderId>,
	sign_in_method: SignInMethod,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	verification_id: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	verification_code: Option<TokenSecret>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	temporary_proof: Option<TokenSecret>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	phone_number: Option<String>,
}
