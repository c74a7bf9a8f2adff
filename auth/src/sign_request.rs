use crate::constants::{
    BCE_PATH_ENCODE_SET, BCE_QUERY_ENCODE_SET, X_BCE_DATE, X_BCE_PREFIX, X_BCE_SECURITY_TOKEN,
};
use crate::Credential;
use async_trait::async_trait;
use bce_core::hash::hex_hmac_sha256;
use bce_core::time::{format_iso8601, now, DateTime};
use bce_core::{Context, SignRequest, SigningRequest};
use http::request::Parts;
use http::{header, HeaderValue};
use log::debug;
use percent_encoding::utf8_percent_encode;
use std::collections::HashSet;
use std::time::Duration;

/// Default validity period of a signature, in line with what the service
/// accepts when the caller does not say otherwise.
const DEFAULT_EXPIRATION: Duration = Duration::from_secs(1800);

/// Headers that participate in the canonical request when the caller does not
/// name an explicit set. `x-bce-` prefixed headers are always signed.
const DEFAULT_HEADERS_TO_SIGN: [&str; 4] =
    ["host", "content-length", "content-type", "content-md5"];

/// RequestSigner that implements the `bce-auth-v1` canonical request scheme.
///
/// The scheme derives a signing key from the secret key and an auth-scope
/// string, HMAC-SHA256 signs a canonical rendering of the request, and carries
/// the result either in the `Authorization` header or, for pre-signed URLs,
/// in the `authorization` query parameter.
#[derive(Debug)]
pub struct RequestSigner {
    expiration: Duration,
    headers_to_sign: Option<HashSet<String>>,

    time: Option<DateTime>,
}

impl Default for RequestSigner {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestSigner {
    /// Create a new bce-auth-v1 signer.
    pub fn new() -> Self {
        Self {
            expiration: DEFAULT_EXPIRATION,
            headers_to_sign: None,
            time: None,
        }
    }

    /// Override the validity period encoded in the auth-scope string.
    pub fn with_expiration(mut self, expiration: Duration) -> Self {
        self.expiration = expiration;
        self
    }

    /// Name the exact headers to sign instead of the default set.
    ///
    /// Names are matched case-insensitively; `x-bce-` prefixed headers are
    /// signed regardless.
    pub fn with_headers_to_sign(
        mut self,
        headers: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.headers_to_sign = Some(
            headers
                .into_iter()
                .map(|h| h.into().to_lowercase())
                .collect(),
        );
        self
    }

    /// Specify the signing time.
    ///
    /// # Note
    ///
    /// We should always take current time to sign requests.
    /// Only use this function for testing.
    #[cfg(test)]
    pub fn with_time(mut self, time: DateTime) -> Self {
        self.time = Some(time);
        self
    }

    fn headers_to_sign(&self) -> HashSet<String> {
        match &self.headers_to_sign {
            Some(set) => set.clone(),
            None => DEFAULT_HEADERS_TO_SIGN
                .iter()
                .map(|h| h.to_string())
                .collect(),
        }
    }
}

#[async_trait]
impl SignRequest for RequestSigner {
    type Credential = Credential;

    async fn sign_request(
        &self,
        _: &Context,
        req: &mut Parts,
        credential: Option<&Self::Credential>,
        expires_in: Option<Duration>,
    ) -> bce_core::Result<()> {
        let Some(cred) = credential else {
            return Ok(());
        };

        let now = self.time.unwrap_or_else(now);
        let timestamp = format_iso8601(now);
        let expiration = expires_in.unwrap_or(self.expiration);

        let mut signed_req = SigningRequest::build(req)?;

        // Auth scope: "bce-auth-v1/{access_key_id}/{timestamp}/{expiration}".
        let auth_string_prefix = format!(
            "bce-auth-v1/{}/{}/{}",
            cred.access_key_id,
            timestamp,
            expiration.as_secs()
        );
        debug!("calculated auth string prefix: {auth_string_prefix}");

        // The signing key is the hex form of the HMAC, fed back in as bytes.
        let signing_key = hex_hmac_sha256(
            cred.secret_access_key.as_bytes(),
            auth_string_prefix.as_bytes(),
        );

        for (_, value) in signed_req.headers.iter_mut() {
            SigningRequest::header_value_normalize(value)
        }

        // Insert HOST header if not present. Host is always part of the
        // canonical request.
        if signed_req.headers.get(header::HOST).is_none() {
            signed_req.headers.insert(
                header::HOST,
                signed_req.authority.as_str().parse().map_err(|e| {
                    bce_core::Error::request_invalid(format!(
                        "failed to parse authority as header value: {e}"
                    ))
                })?,
            );
        }

        let headers_to_sign = if expires_in.is_none() {
            // Insert DATE header if not present.
            if signed_req.headers.get(X_BCE_DATE).is_none() {
                let date_header = HeaderValue::try_from(timestamp.clone())?;
                signed_req.headers.insert(X_BCE_DATE, date_header);
            }

            // Insert security token header if the credential carries one.
            if let Some(token) = &cred.session_token {
                let mut value = HeaderValue::from_str(token)?;
                // Set token value sensitive to avoid leaking.
                value.set_sensitive(true);

                signed_req.headers.insert(X_BCE_SECURITY_TOKEN, value);
            }

            self.headers_to_sign()
        } else {
            // Pre-signed URLs carry the token in the query so that the plain
            // URL stays self-contained.
            if let Some(token) = &cred.session_token {
                signed_req.query_push(X_BCE_SECURITY_TOKEN, token.clone());
            }

            match &self.headers_to_sign {
                Some(set) => set.clone(),
                None => HashSet::from(["host".to_string()]),
            }
        };

        let canonical_uri = canonical_uri(&signed_req);
        let canonical_query = canonicalize_query(&mut signed_req);
        let (canonical_headers, signed_names) =
            canonical_headers(&signed_req, &headers_to_sign)?;

        let canonical_request = format!(
            "{}\n{}\n{}\n{}",
            signed_req.method, canonical_uri, canonical_query, canonical_headers
        );
        debug!("calculated canonical request:\n{canonical_request}");

        let signature = hex_hmac_sha256(signing_key.as_bytes(), canonical_request.as_bytes());
        let auth_string = format!(
            "{}/{}/{}",
            auth_string_prefix,
            signed_names.join(";"),
            signature
        );

        if expires_in.is_some() {
            signed_req.query.push((
                "authorization".to_string(),
                utf8_percent_encode(&auth_string, &BCE_QUERY_ENCODE_SET).to_string(),
            ));
        } else {
            let mut authorization = HeaderValue::from_str(&auth_string)?;
            authorization.set_sensitive(true);

            signed_req
                .headers
                .insert(header::AUTHORIZATION, authorization);
        }

        // Apply to the request.
        signed_req.apply(req)
    }
}

/// Canonical URI: the percent-decoded path re-encoded with the bce-auth-v1
/// byte set, `/` preserved.
fn canonical_uri(ctx: &SigningRequest) -> String {
    let path = ctx.path_percent_decoded();
    let encoded = utf8_percent_encode(&path, &BCE_PATH_ENCODE_SET).to_string();
    if encoded.starts_with('/') {
        encoded
    } else {
        format!("/{encoded}")
    }
}

/// Canonical query string: every pair except `authorization` rendered as
/// `encode(k)=encode(v)`, sorted lexicographically, joined with `&`.
///
/// Also rewrites the request query to the sorted encoded form so that what we
/// sign is exactly what we send.
fn canonicalize_query(ctx: &mut SigningRequest) -> String {
    let mut encoded: Vec<(String, String)> = ctx
        .query
        .iter()
        .filter(|(k, _)| !k.eq_ignore_ascii_case("authorization"))
        .map(|(k, v)| {
            (
                utf8_percent_encode(k, &BCE_QUERY_ENCODE_SET).to_string(),
                utf8_percent_encode(v, &BCE_QUERY_ENCODE_SET).to_string(),
            )
        })
        .collect();
    encoded.sort();

    let canonical = encoded
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");

    ctx.query = encoded;
    canonical
}

/// Canonical headers plus the sorted list of signed header names.
///
/// A header participates when its lowercase name is in `headers_to_sign` or
/// starts with `x-bce-`. Empty values are skipped.
fn canonical_headers(
    ctx: &SigningRequest,
    headers_to_sign: &HashSet<String>,
) -> bce_core::Result<(String, Vec<String>)> {
    let mut entries = Vec::with_capacity(ctx.headers.len());
    let mut signed_names = Vec::with_capacity(ctx.headers.len());

    for (name, value) in ctx.headers.iter() {
        let lname = name.as_str().to_lowercase();
        if !headers_to_sign.contains(&lname) && !lname.starts_with(X_BCE_PREFIX) {
            continue;
        }

        let value = value.to_str()?.trim();
        if value.is_empty() {
            continue;
        }

        entries.push(format!(
            "{}:{}",
            utf8_percent_encode(&lname, &BCE_QUERY_ENCODE_SET),
            utf8_percent_encode(value, &BCE_QUERY_ENCODE_SET)
        ));
        signed_names.push(lname);
    }

    entries.sort();
    signed_names.sort();

    Ok((entries.join("\n"), signed_names))
}
