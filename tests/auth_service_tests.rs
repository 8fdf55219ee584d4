use referral_tracker::{
    services::{AuthServiceError, LoginRequest, SignupRequest},
    test_utils::test_helpers,
};

#[tokio::test]
async fn test_login_after_signup() {
    let pool = test_helpers::create_test_db().await.unwrap();
    let state = test_helpers::test_state(pool);

    state
        .user_service
        .signup(SignupRequest {
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            password: "correct horse".to_string(),
            referral_code: String::new(),
        })
        .await
        .unwrap();

    let user = state
        .auth_service
        .authenticate(LoginRequest {
            email: "alice@example.com".to_string(),
            password: "correct horse".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(user.username, "alice");

    let token = state.token_service.issue(&user.username).unwrap();
    let claims = state.token_service.verify(&token).unwrap();
    assert_eq!(claims.username, "alice");
}

#[tokio::test]
async fn test_wrong_password_and_unknown_email_fail_identically() {
    let pool = test_helpers::create_test_db().await.unwrap();
    test_helpers::insert_test_user(&pool, "alice", "alice@example.com", "password123", "AB12")
        .await
        .unwrap();
    let state = test_helpers::test_state(pool);

    let wrong_password = state
        .auth_service
        .authenticate(LoginRequest {
            email: "alice@example.com".to_string(),
            password: "password124".to_string(),
        })
        .await
        .unwrap_err();

    let unknown_email = state
        .auth_service
        .authenticate(LoginRequest {
            email: "nobody@example.com".to_string(),
            password: "password123".to_string(),
        })
        .await
        .unwrap_err();

    assert!(matches!(wrong_password, AuthServiceError::InvalidCredentials));
    assert!(matches!(unknown_email, AuthServiceError::InvalidCredentials));
    assert_eq!(wrong_password.to_string(), unknown_email.to_string());
}
