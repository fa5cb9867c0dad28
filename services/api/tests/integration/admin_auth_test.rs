use chrono::{Duration, Utc};

use trenzo_api::domain::types::ADMIN_SENTINEL_CODE;
use trenzo_api::error::ApiError;
use trenzo_api::usecase::admin_auth::{
    AdminLogoutUseCase, InitiateAdminLoginUseCase, RefreshAdminSessionUseCase,
    VerifyAdmin2faUseCase,
};
use trenzo_auth_types::token::validate_access_token;

use crate::helpers::{
    ManualClock, MockAdminSessionRepo, MockCodeRepo, MockUserRepo, RecordingDelivery,
    TEST_JWT_SECRET, TEST_PASSWORD, t0, test_admin, test_user,
};

// ── Whole admin login flow ───────────────────────────────────────────────────

#[tokio::test]
async fn admin_login_flow_yields_verifiable_pair_and_one_session() {
    let admin = test_admin();
    let admin_id = admin.id;
    let users = MockUserRepo::with(vec![admin]);
    let codes = MockCodeRepo::default();
    let admin_sessions = MockAdminSessionRepo::default();
    // JWT validation checks `exp` against the wall clock, so the minting
    // clock must start from real time rather than a fixed past instant.
    let clock = ManualClock::at(Utc::now());

    // Password step: pending only, nothing a client could authenticate with.
    let initiate = InitiateAdminLoginUseCase {
        users: users.clone(),
        codes: codes.clone(),
        delivery: RecordingDelivery::default(),
        clock: clock.clone(),
        fixed_codes: true,
    };
    let pending_id = initiate
        .execute("admin@example.com", TEST_PASSWORD)
        .await
        .unwrap();
    assert_eq!(pending_id, admin_id);
    assert!(admin_sessions.sessions.lock().unwrap().is_empty());

    // 2FA step mints the pair and persists exactly one refresh row.
    let verify = VerifyAdmin2faUseCase {
        users: users.clone(),
        codes: codes.clone(),
        admin_sessions: admin_sessions.clone(),
        clock: clock.clone(),
        jwt_secret: TEST_JWT_SECRET.into(),
    };
    let out = verify.execute(admin_id, ADMIN_SENTINEL_CODE).await.unwrap();
    assert_eq!(admin_sessions.sessions.lock().unwrap().len(), 1);

    let info = validate_access_token(&out.pair.access_token, TEST_JWT_SECRET).unwrap();
    assert_eq!(info.user_id, admin_id);
    assert_eq!(info.access_token_exp, out.pair.access_token_exp);

    // The same code cannot complete 2FA twice.
    let err = verify
        .execute(admin_id, ADMIN_SENTINEL_CODE)
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::InvalidOrExpiredOtp));
    assert_eq!(admin_sessions.sessions.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn admin_code_honors_thirty_second_grace() {
    let admin = test_admin();
    let admin_id = admin.id;
    let users = MockUserRepo::with(vec![admin]);
    let codes = MockCodeRepo::default();
    let clock = ManualClock::at(t0());

    let initiate = InitiateAdminLoginUseCase {
        users: users.clone(),
        codes: codes.clone(),
        delivery: RecordingDelivery::default(),
        clock: clock.clone(),
        fixed_codes: true,
    };
    initiate
        .execute("admin@example.com", TEST_PASSWORD)
        .await
        .unwrap();

    // 5m20s after issue: nominally expired, inside the admin grace window.
    clock.advance(Duration::minutes(5) + Duration::seconds(20));

    let verify = VerifyAdmin2faUseCase {
        users,
        codes,
        admin_sessions: MockAdminSessionRepo::default(),
        clock,
        jwt_secret: TEST_JWT_SECRET.into(),
    };
    verify.execute(admin_id, ADMIN_SENTINEL_CODE).await.unwrap();
}

#[tokio::test]
async fn non_admin_cannot_reach_the_2fa_step() {
    let user = test_user(true);
    let initiate = InitiateAdminLoginUseCase {
        users: MockUserRepo::with(vec![user]),
        codes: MockCodeRepo::default(),
        delivery: RecordingDelivery::default(),
        clock: ManualClock::at(t0()),
        fixed_codes: true,
    };

    let err = initiate
        .execute("asha@example.com", TEST_PASSWORD)
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::InvalidAdminCredentials));
}

// ── Refresh rotation ─────────────────────────────────────────────────────────

#[tokio::test]
async fn refresh_rotates_and_old_token_is_single_use() {
    let admin = test_admin();
    let admin_id = admin.id;
    let users = MockUserRepo::with(vec![admin]);
    let codes = MockCodeRepo::default();
    let admin_sessions = MockAdminSessionRepo::default();
    let clock = ManualClock::at(t0());

    let verify = VerifyAdmin2faUseCase {
        users: users.clone(),
        codes: codes.clone(),
        admin_sessions: admin_sessions.clone(),
        clock: clock.clone(),
        jwt_secret: TEST_JWT_SECRET.into(),
    };
    let initiate = InitiateAdminLoginUseCase {
        users: users.clone(),
        codes: codes.clone(),
        delivery: RecordingDelivery::default(),
        clock: clock.clone(),
        fixed_codes: true,
    };
    initiate
        .execute("admin@example.com", TEST_PASSWORD)
        .await
        .unwrap();
    let login = verify.execute(admin_id, ADMIN_SENTINEL_CODE).await.unwrap();
    let first_token = login.pair.refresh_token;

    let refresh = RefreshAdminSessionUseCase::new(
        users.clone(),
        admin_sessions.clone(),
        clock.clone(),
        TEST_JWT_SECRET.into(),
    );

    let rotated = refresh.execute(&first_token).await.unwrap();
    assert_ne!(rotated.pair.refresh_token, first_token);
    assert_eq!(admin_sessions.sessions.lock().unwrap().len(), 1);

    // Replay of the superseded token fails and removes nothing further.
    let err = refresh.execute(&first_token).await.unwrap_err();
    assert!(matches!(err, ApiError::SessionExpired));
    assert_eq!(admin_sessions.sessions.lock().unwrap().len(), 1);

    // The fresh token still works.
    refresh.execute(&rotated.pair.refresh_token).await.unwrap();
}

#[tokio::test]
async fn refresh_after_seven_days_expires_and_cleans_up() {
    let admin = test_admin();
    let admin_id = admin.id;
    let users = MockUserRepo::with(vec![admin]);
    let codes = MockCodeRepo::default();
    let admin_sessions = MockAdminSessionRepo::default();
    let clock = ManualClock::at(t0());

    let initiate = InitiateAdminLoginUseCase {
        users: users.clone(),
        codes: codes.clone(),
        delivery: RecordingDelivery::default(),
        clock: clock.clone(),
        fixed_codes: true,
    };
    initiate
        .execute("admin@example.com", TEST_PASSWORD)
        .await
        .unwrap();
    let verify = VerifyAdmin2faUseCase {
        users: users.clone(),
        codes,
        admin_sessions: admin_sessions.clone(),
        clock: clock.clone(),
        jwt_secret: TEST_JWT_SECRET.into(),
    };
    let login = verify.execute(admin_id, ADMIN_SENTINEL_CODE).await.unwrap();

    clock.advance(Duration::days(7) + Duration::seconds(1));

    let refresh =
        RefreshAdminSessionUseCase::new(users, admin_sessions.clone(), clock, TEST_JWT_SECRET.into());
    let err = refresh.execute(&login.pair.refresh_token).await.unwrap_err();
    assert!(matches!(err, ApiError::SessionExpired));
    assert!(admin_sessions.sessions.lock().unwrap().is_empty());
}

#[tokio::test]
async fn admin_logout_revokes_refresh_and_is_idempotent() {
    let admin = test_admin();
    let admin_id = admin.id;
    let users = MockUserRepo::with(vec![admin]);
    let codes = MockCodeRepo::default();
    let admin_sessions = MockAdminSessionRepo::default();
    let clock = ManualClock::at(t0());

    let initiate = InitiateAdminLoginUseCase {
        users: users.clone(),
        codes: codes.clone(),
        delivery: RecordingDelivery::default(),
        clock: clock.clone(),
        fixed_codes: true,
    };
    initiate
        .execute("admin@example.com", TEST_PASSWORD)
        .await
        .unwrap();
    let verify = VerifyAdmin2faUseCase {
        users,
        codes,
        admin_sessions: admin_sessions.clone(),
        clock,
        jwt_secret: TEST_JWT_SECRET.into(),
    };
    let login = verify.execute(admin_id, ADMIN_SENTINEL_CODE).await.unwrap();

    let logout = AdminLogoutUseCase {
        admin_sessions: admin_sessions.clone(),
    };
    logout.execute(&login.pair.refresh_token).await.unwrap();
    logout.execute(&login.pair.refresh_token).await.unwrap();
    assert!(admin_sessions.sessions.lock().unwrap().is_empty());
}
