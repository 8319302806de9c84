use super::*;
use jsonwebtoken::{EncodingKey, Header, encode};

const SECRET: &str = "supersecretjwtsecretforunittesting123";

fn token_for(claims: &DashboardClaims, secret: &str) -> String {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .unwrap()
}

fn claims(exp: usize) -> DashboardClaims {
    DashboardClaims {
        sub: "123e4567-e89b-12d3-a456-426614174000".to_string(),
        role: Some("admin".to_string()),
        email: Some("test@example.com".to_string()),
        exp,
    }
}

#[test]
fn test_validate_jwt_success() {
    let my_claims = claims(9999999999);
    let token = token_for(&my_claims, SECRET);

    let decoded = validate_jwt(&token, SECRET).expect("Valid token should pass");
    assert_eq!(decoded.sub, my_claims.sub);
    assert_eq!(decoded.email, my_claims.email);
    assert_eq!(decoded.role.as_deref(), Some("admin"));
}

#[test]
fn test_validate_jwt_expired() {
    let token = token_for(&claims(1), SECRET);
    assert!(validate_jwt(&token, SECRET).is_err());
}

#[test]
fn test_validate_jwt_invalid_signature() {
    let token = token_for(&claims(9999999999), "wrongsecret");
    assert!(validate_jwt(&token, SECRET).is_err());
}

#[test]
fn test_role_is_optional() {
    let token = encode(
        &Header::default(),
        &serde_json::json!({
            "sub": "123e4567-e89b-12d3-a456-426614174000",
            "exp": 9999999999u64,
        }),
        &EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .unwrap();

    let decoded = validate_jwt(&token, SECRET).unwrap();
    assert_eq!(decoded.role, None);
    assert_eq!(decoded.email, None);
}

#[test]
fn test_bearer_token_parsing() {
    assert_eq!(bearer_token("Bearer abc.def"), Some("abc.def"));
    assert_eq!(bearer_token("Bearer   "), None);
    assert_eq!(bearer_token("Basic abc"), None);
}

fn authenticate(headers: &HeaderMap, secret: &str) -> Result<AuthUser, AuthError> {
    user_from_token(bearer_from_headers(headers)?, secret)
}

fn headers_with(value: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(AUTHORIZATION, value.parse().unwrap());
    headers
}

#[test]
fn test_authenticate_defaults_role_to_user() {
    let token = encode(
        &Header::default(),
        &serde_json::json!({
            "sub": "123e4567-e89b-12d3-a456-426614174000",
            "exp": 9999999999u64,
        }),
        &EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .unwrap();

    let user = authenticate(&headers_with(&format!("Bearer {token}")), SECRET).unwrap();
    assert_eq!(user.role, DEFAULT_ROLE);
    assert_eq!(
        user.user_id,
        Uuid::parse_str("123e4567-e89b-12d3-a456-426614174000").unwrap()
    );
}

#[test]
fn test_authenticate_rejections() {
    assert!(matches!(
        authenticate(&HeaderMap::new(), SECRET),
        Err(AuthError::MissingHeader)
    ));
    assert!(matches!(
        authenticate(&headers_with("Token abc"), SECRET),
        Err(AuthError::MalformedHeader)
    ));

    let mut bad_sub = claims(9999999999);
    bad_sub.sub = "not-a-uuid".to_string();
    let token = token_for(&bad_sub, SECRET);
    let err = authenticate(&headers_with(&format!("Bearer {token}")), SECRET).unwrap_err();
    assert!(matches!(err, AuthError::InvalidSubject));
    assert_eq!(
        AppError::from(err).status_code(),
        axum::http::StatusCode::UNAUTHORIZED
    );
}

#[test]
fn test_missing_secret_is_a_server_error() {
    assert_eq!(
        AppError::from(AuthError::NotConfigured).status_code(),
        axum::http::StatusCode::INTERNAL_SERVER_ERROR
    );
}
