use chrono::Duration;

use trenzo_api::domain::types::{CodePurpose, SIGNUP_SENTINEL_CODE};
use trenzo_api::error::ApiError;
use trenzo_api::usecase::auth::{
    LoginOutput, LoginUseCase, LogoutUseCase, RegisterInput, RegisterUseCase, VerifyOtpUseCase,
};

use crate::helpers::{
    ManualClock, MockCodeRepo, MockSessionRepo, MockUserRepo, RecordingDelivery, TEST_PASSWORD,
    t0, test_user,
};

fn register_input() -> RegisterInput {
    RegisterInput {
        full_name: "Asha Nair".into(),
        email: "asha@example.com".into(),
        phone: Some("971500000001".into()),
        password: TEST_PASSWORD.into(),
    }
}

// ── Whole signup flow ────────────────────────────────────────────────────────

#[tokio::test]
async fn signup_flow_ends_with_verified_user_and_open_session() {
    let users = MockUserRepo::default();
    let codes = MockCodeRepo::default();
    let sessions = MockSessionRepo::default();
    let delivery = RecordingDelivery::default();
    let clock = ManualClock::at(t0());

    // Register.
    let register = RegisterUseCase {
        users: users.clone(),
        codes: codes.clone(),
        delivery: delivery.clone(),
        clock: clock.clone(),
        fixed_codes: true,
    };
    let out = register.execute(register_input()).await.unwrap();
    assert!(out.code_issued);
    assert!(!out.user.is_verified);
    assert_eq!(delivery.sent.lock().unwrap().len(), 1);

    // Login before verification: a fresh code, no session.
    let login = LoginUseCase {
        users: users.clone(),
        codes: codes.clone(),
        sessions: sessions.clone(),
        delivery: delivery.clone(),
        clock: clock.clone(),
        fixed_codes: true,
    };
    let pending = login.execute("asha@example.com", TEST_PASSWORD).await.unwrap();
    assert!(matches!(pending, LoginOutput::PendingVerification { .. }));
    assert!(sessions.sessions.lock().unwrap().is_empty());
    // Reissue superseded the first code.
    assert_eq!(codes.codes.lock().unwrap().len(), 1);

    // Verify with the fixed signup code.
    let verify = VerifyOtpUseCase {
        users: users.clone(),
        codes: codes.clone(),
        sessions: sessions.clone(),
        clock: clock.clone(),
    };
    let (user, token) = verify
        .execute(out.user.id, SIGNUP_SENTINEL_CODE)
        .await
        .unwrap();
    assert!(user.is_verified);
    assert_eq!(sessions.sessions.lock().unwrap().len(), 1);

    // Login now opens a second session.
    let authed = login.execute("asha@example.com", TEST_PASSWORD).await.unwrap();
    assert!(matches!(authed, LoginOutput::Authenticated { .. }));
    assert_eq!(sessions.sessions.lock().unwrap().len(), 2);

    // Logout, twice, both fine.
    let logout = LogoutUseCase {
        sessions: sessions.clone(),
    };
    logout.execute(&token).await.unwrap();
    logout.execute(&token).await.unwrap();
    assert_eq!(sessions.sessions.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn signup_code_expires_after_five_minutes() {
    let users = MockUserRepo::default();
    let codes = MockCodeRepo::default();
    let sessions = MockSessionRepo::default();
    let clock = ManualClock::at(t0());

    let register = RegisterUseCase {
        users: users.clone(),
        codes: codes.clone(),
        delivery: RecordingDelivery::default(),
        clock: clock.clone(),
        fixed_codes: true,
    };
    let out = register.execute(register_input()).await.unwrap();

    clock.advance(Duration::minutes(5) + Duration::seconds(1));

    let verify = VerifyOtpUseCase {
        users: users.clone(),
        codes: codes.clone(),
        sessions,
        clock,
    };
    let err = verify
        .execute(out.user.id, SIGNUP_SENTINEL_CODE)
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::InvalidOrExpiredOtp));
    // No grace for the signup purpose, and the code stays unconsumed.
    assert!(codes.codes.lock().unwrap()[0].used_at.is_none());
    assert!(!users.users.lock().unwrap()[0].is_verified);
}

#[tokio::test]
async fn second_verification_attempt_is_a_client_error() {
    let users = MockUserRepo::default();
    let codes = MockCodeRepo::default();
    let sessions = MockSessionRepo::default();
    let clock = ManualClock::at(t0());

    let register = RegisterUseCase {
        users: users.clone(),
        codes: codes.clone(),
        delivery: RecordingDelivery::default(),
        clock: clock.clone(),
        fixed_codes: true,
    };
    let out = register.execute(register_input()).await.unwrap();

    let verify = VerifyOtpUseCase {
        users: users.clone(),
        codes: codes.clone(),
        sessions: sessions.clone(),
        clock: clock.clone(),
    };
    verify
        .execute(out.user.id, SIGNUP_SENTINEL_CODE)
        .await
        .unwrap();
    let err = verify
        .execute(out.user.id, SIGNUP_SENTINEL_CODE)
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::AlreadyVerified));
    assert_eq!(sessions.sessions.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn duplicate_registration_is_rejected_whole() {
    let users = MockUserRepo::with(vec![test_user(true)]);
    let codes = MockCodeRepo::default();
    let delivery = RecordingDelivery::default();

    let register = RegisterUseCase {
        users: users.clone(),
        codes: codes.clone(),
        delivery: delivery.clone(),
        clock: ManualClock::at(t0()),
        fixed_codes: true,
    };
    let err = register.execute(register_input()).await.unwrap_err();
    assert!(matches!(err, ApiError::DuplicateIdentity));
    assert!(codes.codes.lock().unwrap().is_empty());
    assert!(delivery.sent.lock().unwrap().is_empty());
}

#[tokio::test]
async fn login_failure_is_uniform_across_causes() {
    let login = LoginUseCase {
        users: MockUserRepo::with(vec![test_user(true)]),
        codes: MockCodeRepo::default(),
        sessions: MockSessionRepo::default(),
        delivery: RecordingDelivery::default(),
        clock: ManualClock::at(t0()),
        fixed_codes: true,
    };

    let unknown = login.execute("ghost@example.com", TEST_PASSWORD).await.unwrap_err();
    let wrong = login.execute("asha@example.com", "nope").await.unwrap_err();
    assert_eq!(unknown.kind(), wrong.kind());
}

#[tokio::test]
async fn reissued_code_carries_signup_purpose_and_target() {
    let users = MockUserRepo::default();
    let codes = MockCodeRepo::default();
    let delivery = RecordingDelivery::default();

    let register = RegisterUseCase {
        users,
        codes: codes.clone(),
        delivery: delivery.clone(),
        clock: ManualClock::at(t0()),
        fixed_codes: true,
    };
    register.execute(register_input()).await.unwrap();

    let rows = codes.codes.lock().unwrap();
    assert_eq!(rows[0].purpose, CodePurpose::Signup);
    assert_eq!(rows[0].target, "971500000001");
    assert_eq!(rows[0].expires_at, t0() + Duration::minutes(5));

    let sent = delivery.sent.lock().unwrap();
    assert_eq!(sent[0].0, "971500000001");
    assert!(sent[0].1.contains(SIGNUP_SENTINEL_CODE));
}
