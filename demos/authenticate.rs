//! Runs one authentication against a mock tenant: the token endpoint answers the password grant
//! with an Ed25519-signed ID token and the key set endpoint publishes the matching key.

// crates.io
use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use color_eyre::{Result, eyre::eyre};
use httpmock::prelude::*;
use ring::{
	rand::SystemRandom,
	signature::{Ed25519KeyPair, KeyPair},
};
use url::Url;
// self
use oidc_password_hook::{
	config::HookConfig,
	flows::ReqwestVerifier,
	http::ReqwestHttpClient,
	jsonwebtoken::{self, Algorithm, EncodingKey, Header},
	oauth::ReqwestTransportErrorMapper,
	reqwest::Client,
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let pkcs8 = Ed25519KeyPair::generate_pkcs8(&SystemRandom::new())
		.map_err(|_| eyre!("Ed25519 key generation failed."))?;
	let key_pair = Ed25519KeyPair::from_pkcs8(pkcs8.as_ref())
		.map_err(|e| eyre!("Generated key was rejected: {e}."))?;
	let server = MockServer::start_async().await;
	let now = time::OffsetDateTime::now_utc().unix_timestamp();
	let mut header = Header::new(Algorithm::EdDSA);

	header.kid = Some("demo-key".into());

	let id_token = jsonwebtoken::encode(
		&header,
		&serde_json::json!({
			"iss": server.url("/"),
			"aud": "demo-client",
			"sub": "auth0|demo",
			"iat": now,
			"exp": now + 300,
			"name": "Grace Brewster Hopper",
			"email": "grace@example.com",
		}),
		&EncodingKey::from_ed_der(pkcs8.as_ref()),
	)?;
	let grant_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/oauth/token");
			then.status(200)
				.header("content-type", "application/json")
				.json_body(serde_json::json!({
					"id_token": id_token,
					"token_type": "Bearer",
					"expires_in": 86400,
				}));
		})
		.await;
	let keys_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/.well-known/jwks.json");
			then.status(200).header("content-type", "application/json").json_body(
				serde_json::json!({ "keys": [{
					"kty": "OKP",
					"crv": "Ed25519",
					"kid": "demo-key",
					"use": "sig",
					"x": URL_SAFE_NO_PAD.encode(key_pair.public_key().as_ref()),
				}] }),
			);
		})
		.await;
	let config = HookConfig::builder("demo-tenant", "demo-client", "demo-secret")
		.token_endpoint(Url::parse(&server.url("/oauth/token"))?)
		.key_set_endpoint(Url::parse(&server.url("/.well-known/jwks.json"))?)
		.issuer(Url::parse(&server.url("/"))?)
		.allowed_algorithms([Algorithm::EdDSA])
		.build()?;
	let http_client = ReqwestHttpClient::with_client(
		Client::builder()
			.danger_accept_invalid_certs(true)
			.danger_accept_invalid_hostnames(true)
			.build()?,
	);
	let verifier =
		ReqwestVerifier::with_http_client(config, http_client, ReqwestTransportErrorMapper);
	let response = verifier
		.handle_json(&serde_json::json!({
			"user_identifier": "grace@example.com",
			"password": "demo-password",
		}))
		.await;

	grant_mock.assert_async().await;
	keys_mock.assert_async().await;

	println!("{}", serde_json::to_string_pretty(&response)?);

	Ok(())
}
