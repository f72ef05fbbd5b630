use markbook::config::jwt::JwtConfig;
use markbook::utils::jwt::{create_access_token, verify_token};
use uuid::Uuid;

fn get_test_jwt_config() -> JwtConfig {
    JwtConfig {
        secret: "test_secret_key_for_testing_purposes".to_string(),
        access_token_expiry: 3600,
    }
}

#[test]
fn test_create_access_token_success() {
    let jwt_config = get_test_jwt_config();
    let user_id = Uuid::new_v4();

    let result = create_access_token(user_id, "test@example.com", "student", &jwt_config);

    assert!(result.is_ok());
    let token = result.unwrap();
    assert!(!token.is_empty());
}

#[test]
fn test_create_access_token_all_roles() {
    let jwt_config = get_test_jwt_config();
    let user_id = Uuid::new_v4();

    for role in ["admin", "teacher", "student"] {
        let result = create_access_token(user_id, "test@example.com", role, &jwt_config);
        assert!(result.is_ok());
    }
}

#[test]
fn test_verify_token_success() {
    let jwt_config = get_test_jwt_config();
    let user_id = Uuid::new_v4();
    let email = "test@example.com";

    let token = create_access_token(user_id, email, "teacher", &jwt_config).unwrap();
    let result = verify_token(&token, &jwt_config);

    assert!(result.is_ok());
    let claims = result.unwrap();
    assert_eq!(claims.email, email);
    assert_eq!(claims.sub, user_id.to_string());
    assert_eq!(claims.role, "teacher");
}

#[test]
fn test_verify_token_wrong_secret() {
    let jwt_config = get_test_jwt_config();
    let other_config = JwtConfig {
        secret: "a_completely_different_secret".to_string(),
        access_token_expiry: 3600,
    };

    let token =
        create_access_token(Uuid::new_v4(), "test@example.com", "student", &jwt_config).unwrap();
    let result = verify_token(&token, &other_config);

    assert!(result.is_err());
}

#[test]
fn test_verify_token_garbage() {
    let jwt_config = get_test_jwt_config();

    let result = verify_token("not.a.token", &jwt_config);

    assert!(result.is_err());
}

#[test]
fn test_token_expiry_set_from_config() {
    let jwt_config = get_test_jwt_config();
    let token =
        create_access_token(Uuid::new_v4(), "test@example.com", "admin", &jwt_config).unwrap();
    let claims = verify_token(&token, &jwt_config).unwrap();

    assert_eq!(claims.exp - claims.iat, 3600);
}
