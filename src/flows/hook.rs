//! Fail-closed entry points used by the authentication pipeline.
//!
//! [`Verifier::authenticate`] runs the whole sequence
//! (`grant -> token received -> key resolved -> verified`) and collapses every failure into
//! [`HookResponse::Denied`]. The cause is logged and counted but never returned, so the caller
//! cannot tell which stage refused the credentials.

// crates.io
use serde::{Serializer, ser::SerializeStruct};
// self
use crate::{
	_prelude::*,
	auth::{Credential, FullName, Secret},
	flows::{Verifier, read_key_reference, verify_id_token},
	http::ProviderHttpClient,
	oauth::TransportErrorMapper,
	obs::{self, AuthOutcome, AuthSpan, FailureKind, Stage},
};

/// User record handed back to the migration pipeline on success.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MigratedUser {
	/// Identifier exactly as supplied by the caller.
	pub username: String,
	/// Password exactly as supplied by the caller.
	pub password: Secret,
	/// First token of the `name` claim.
	pub firstname: String,
	/// Remaining tokens of the `name` claim.
	pub lastname: String,
	/// `email` claim.
	pub email: String,
}

/// Hook result: serializes to `{"success": true, "user": {...}}` or
/// `{"success": false, "user": {}}`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HookResponse {
	/// Credentials verified.
	Granted(MigratedUser),
	/// Access denied; carries no identity data.
	Denied,
}
impl HookResponse {
	/// Returns `true` for [`HookResponse::Granted`].
	pub fn is_success(&self) -> bool {
		matches!(self, Self::Granted(_))
	}

	/// Returns the migrated user, if any.
	pub fn user(&self) -> Option<&MigratedUser> {
		match self {
			Self::Granted(user) => Some(user),
			Self::Denied => None,
		}
	}
}
impl Serialize for HookResponse {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		#[derive(Serialize)]
		struct NoUser {}

		let mut state = serializer.serialize_struct("HookResponse", 2)?;

		match self {
			Self::Granted(user) => {
				state.serialize_field("success", &true)?;
				state.serialize_field("user", user)?;
			},
			Self::Denied => {
				state.serialize_field("success", &false)?;
				state.serialize_field("user", &NoUser {})?;
			},
		}

		state.end()
	}
}

impl<C, M> Verifier<C, M>
where
	C: ?Sized + ProviderHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Authenticates `credential`, denying on any failure.
	pub async fn authenticate(&self, credential: &Credential) -> HookResponse {
		let span = AuthSpan::new();

		obs::record_auth_outcome(AuthOutcome::Attempt);

		span.instrument(async {
			match self.run(credential, &span).await {
				Ok(user) => {
					obs::log_success();
					obs::record_auth_outcome(AuthOutcome::Success);

					HookResponse::Granted(user)
				},
				Err(err) => {
					deny(err.kind(), &err);

					HookResponse::Denied
				},
			}
		})
		.await
	}

	/// Runs the same sequence as [`authenticate`](Self::authenticate) but returns the typed
	/// failure. Meant for host diagnostics; never forward the error to the end user.
	pub async fn verify_credentials(&self, credential: &Credential) -> Result<MigratedUser> {
		let span = AuthSpan::new();

		span.instrument(self.run(credential, &span)).await
	}

	/// Invocation-framework adapter: reads the context JSON and returns the response JSON.
	///
	/// A context without `user_identifier`/`password` is denied like any other failure.
	pub async fn handle_json(&self, context: &serde_json::Value) -> serde_json::Value {
		let response = match Credential::deserialize(context) {
			Ok(credential) => self.authenticate(&credential).await,
			Err(err) => {
				obs::record_auth_outcome(AuthOutcome::Attempt);
				deny(FailureKind::InvalidContext, &err);

				HookResponse::Denied
			},
		};

		serde_json::to_value(&response)
			.unwrap_or_else(|_| serde_json::json!({ "success": false, "user": {} }))
	}

	async fn run(&self, credential: &Credential, span: &AuthSpan) -> Result<MigratedUser> {
		span.record_stage(Stage::GrantRequested);

		let grant = self.request_password_grant(credential).await?;
		let token = grant.id_token()?;

		span.record_stage(Stage::TokenReceived);

		let reference = read_key_reference(token, &self.config.checks)?;
		let key = self.resolve_signing_key(&reference.key_id, reference.algorithm).await?;

		span.record_stage(Stage::KeyResolved);

		let claims = verify_id_token(token, &key, &self.config)?;

		span.record_stage(Stage::Verified);

		let name = FullName::split(claims.require_name()?);
		let email = claims.require_email()?.to_owned();

		Ok(MigratedUser {
			username: credential.identifier.clone(),
			password: credential.secret.clone(),
			firstname: name.first,
			lastname: name.last,
			email,
		})
	}
}

fn deny(kind: FailureKind, err: &(dyn StdError + 'static)) {
	obs::log_denial(kind, err);
	obs::record_denial_kind(kind);
	obs::record_auth_outcome(AuthOutcome::Denied);
}
