//! Presign-then-verify integration tests.

#[cfg(test)]
mod tests {
    use chrono::{TimeDelta, Utc};
    use wsps_auth::sigv4::EMPTY_PAYLOAD_SHA256;
    use wsps_auth::{
        AuthError, Credentials, StaticCredentialProvider, verify_presigned, verify_presigned_at,
    };

    use crate::{presigner, provider, request_parts, signing_time};

    #[test]
    fn test_should_verify_presigned_url_before_expiry() {
        let presigned = presigner("abc123").presign_connection("AAA=", signing_time());
        let parts = request_parts("GET", &presigned.url);

        let result = verify_presigned_at(
            &parts,
            EMPTY_PAYLOAD_SHA256,
            &provider(),
            signing_time() + TimeDelta::seconds(299),
        )
        .unwrap();

        assert_eq!(result.access_key_id, "AKIDEXAMPLE");
        assert_eq!(result.region, "us-east-1");
        assert_eq!(result.stage, "prod");
        assert_eq!(result.connection_id, "AAA=");
    }

    #[test]
    fn test_should_reject_presigned_url_after_expiry() {
        let presigned = presigner("abc123").presign_connection("AAA=", signing_time());
        let parts = request_parts("GET", &presigned.url);

        let result = verify_presigned_at(
            &parts,
            EMPTY_PAYLOAD_SHA256,
            &provider(),
            signing_time() + TimeDelta::seconds(301),
        );
        assert!(matches!(result, Err(AuthError::RequestExpired)));
    }

    #[test]
    fn test_should_verify_url_signed_now() {
        let presigned = presigner("live").presign_connection("Zm9vYmFy", Utc::now());
        let parts = request_parts("GET", &presigned.url);

        let result = verify_presigned(&parts, EMPTY_PAYLOAD_SHA256, &provider());
        assert!(result.is_ok(), "verification failed: {result:?}");
    }

    #[test]
    fn test_should_reject_different_method() {
        let presigned = presigner("abc123").presign_connection("AAA=", signing_time());
        let parts = request_parts("POST", &presigned.url);

        let result = verify_presigned_at(&parts, EMPTY_PAYLOAD_SHA256, &provider(), signing_time());
        assert!(matches!(result, Err(AuthError::SignatureDoesNotMatch)));
    }

    #[test]
    fn test_should_reject_tampered_expiry() {
        let presigned = presigner("abc123").presign_connection("AAA=", signing_time());
        let url = presigned.url.replace("X-Amz-Expires=300", "X-Amz-Expires=3000");
        let parts = request_parts("GET", &url);

        let result = verify_presigned_at(&parts, EMPTY_PAYLOAD_SHA256, &provider(), signing_time());
        assert!(matches!(result, Err(AuthError::SignatureDoesNotMatch)));
    }

    #[test]
    fn test_should_verify_session_credentials_after_rotation() {
        let rotated =
            Credentials::new("ASIAROTATED", "rotated-secret").with_session_token("session/token+1");
        let presigner = presigner("abc123").with_credentials(rotated.clone());
        let presigned = presigner.presign_connection("AAA=", signing_time());
        let parts = request_parts("GET", &presigned.url);

        let stale = provider();
        let result = verify_presigned_at(&parts, EMPTY_PAYLOAD_SHA256, &stale, signing_time());
        assert!(matches!(result, Err(AuthError::AccessKeyNotFound(_))));

        let current = StaticCredentialProvider::new(vec![rotated]);
        let result = verify_presigned_at(&parts, EMPTY_PAYLOAD_SHA256, &current, signing_time());
        assert!(result.is_ok());
    }
}
