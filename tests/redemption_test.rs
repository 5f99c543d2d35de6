//! Redemption engine integration tests
//!
//! The engine's core promise: a redemption either commits all of its
//! effects (participant, ticket, use-log row, counters) or none of them,
//! and counters never exceed their bounds under concurrent load.

mod helpers;

use assert_matches::assert_matches;
use chrono::{Duration, Utc};
use futures::future::join_all;
use serial_test::serial;

use helpers::database_helper::TestDatabase;
use helpers::test_data;

use GuestPass::database::DatabaseService;
use GuestPass::models::event::EventStatus;
use GuestPass::models::invitation::{ParticipantType, UsageType};
use GuestPass::services::ServiceFactory;
use GuestPass::utils::errors::GuestPassError;

struct Fixture {
    db: TestDatabase,
    database: DatabaseService,
    services: ServiceFactory,
    event_id: i64,
    sponsor_id: i64,
    ticket_type_id: i64,
}

/// Published event with a sponsor (staff 10 / guest 10 / scholarship 2)
/// and one ticket type
async fn fixture() -> Fixture {
    let db = TestDatabase::new().await.expect("test database");
    db.truncate().await.expect("truncate");
    let database = DatabaseService::new(db.pool.clone());
    let services = ServiceFactory::new(database.clone());

    let event = test_data::create_event(&db.pool, &database, EventStatus::Published).await;
    let sponsor = test_data::create_sponsor(&database, event.id, 10, 10, 2).await;
    let ticket_type = test_data::create_ticket_type(&database, event.id).await;

    Fixture {
        db,
        database,
        services,
        event_id: event.id,
        sponsor_id: sponsor.id,
        ticket_type_id: ticket_type.id,
    }
}

#[tokio::test]
#[serial]
async fn test_successful_redemption_commits_everything() {
    let f = fixture().await;
    test_data::create_invitation(
        &f.database,
        "GUEST1",
        f.event_id,
        Some(f.sponsor_id),
        f.ticket_type_id,
        ParticipantType::Guest,
        UsageType::Single,
        Some(1),
        None,
    )
    .await;

    let outcome = f
        .services
        .redemption_service
        .redeem("GUEST1", &test_data::redeem_request(), None)
        .await
        .expect("redemption should succeed");

    assert_eq!(outcome.invitation.current_uses, 1);
    assert_eq!(outcome.participant.event_id, f.event_id);
    assert_eq!(outcome.ticket.participant_id, outcome.participant.id);
    assert!(outcome.ticket.ticket_number.starts_with("GP-"));

    let sponsor = f
        .services
        .quota_service
        .get_sponsor(f.sponsor_id)
        .await
        .expect("sponsor");
    assert_eq!(sponsor.guest_used, 1);

    let uses = f
        .database
        .participants
        .count_uses(outcome.invitation.id)
        .await
        .expect("use count");
    assert_eq!(uses, 1);
}

#[tokio::test]
#[serial]
async fn test_single_use_code_cannot_be_redeemed_twice() {
    let f = fixture().await;
    test_data::create_invitation(
        &f.database,
        "ONCE42",
        f.event_id,
        Some(f.sponsor_id),
        f.ticket_type_id,
        ParticipantType::Guest,
        UsageType::Single,
        Some(1),
        None,
    )
    .await;

    f.services
        .redemption_service
        .redeem("ONCE42", &test_data::redeem_request(), None)
        .await
        .expect("first redemption");

    let err = f
        .services
        .redemption_service
        .redeem("ONCE42", &test_data::redeem_request(), None)
        .await
        .expect_err("code is spent");
    assert_matches!(err, GuestPassError::NoUsesLeft);

    // The failed attempt must not have charged the sponsor
    let sponsor = f
        .services
        .quota_service
        .get_sponsor(f.sponsor_id)
        .await
        .expect("sponsor");
    assert_eq!(sponsor.guest_used, 1);
}

#[tokio::test]
#[serial]
async fn test_multi_use_boundary_at_last_remaining_use() {
    let f = fixture().await;
    let invitation = test_data::create_invitation(
        &f.database,
        "ABC123",
        f.event_id,
        None,
        f.ticket_type_id,
        ParticipantType::Regular,
        UsageType::Multiple,
        Some(10),
        None,
    )
    .await;

    // Arrange the counter at one below the bound
    sqlx::query("UPDATE invitations SET current_uses = 9 WHERE id = $1")
        .bind(invitation.id)
        .execute(&f.db.pool)
        .await
        .expect("set current_uses");

    let outcome = f
        .services
        .redemption_service
        .redeem("ABC123", &test_data::redeem_request(), None)
        .await
        .expect("the tenth use is still available");
    assert_eq!(outcome.invitation.current_uses, 10);

    let err = f
        .services
        .redemption_service
        .redeem("ABC123", &test_data::redeem_request(), None)
        .await
        .expect_err("the eleventh use is not");
    assert_matches!(err, GuestPassError::NoUsesLeft);
}

#[tokio::test(flavor = "multi_thread")]
#[serial]
async fn test_concurrent_redemptions_bounded_by_max_uses() {
    let f = fixture().await;
    let invitation = test_data::create_invitation(
        &f.database,
        "RACE99",
        f.event_id,
        Some(f.sponsor_id),
        f.ticket_type_id,
        ParticipantType::Guest,
        UsageType::Multiple,
        Some(3),
        None,
    )
    .await;

    let tasks = (0..10).map(|i| {
        let redemption = f.services.redemption_service.clone();
        let request = test_data::redeem_request_for_email(&format!("racer{i}@example.com"));
        tokio::spawn(async move { redemption.redeem("RACE99", &request, None).await })
    });
    let results = join_all(tasks).await;

    let successes = results
        .into_iter()
        .map(|joined| joined.expect("task panicked"))
        .filter(|r| r.is_ok())
        .count();
    assert_eq!(successes, 3, "exactly max_uses redemptions may win");

    let current = f
        .database
        .invitations
        .find_by_id(invitation.id)
        .await
        .expect("query")
        .expect("invitation exists");
    assert_eq!(current.current_uses, 3);

    // Ledger and log agree with the counter
    let sponsor = f
        .services
        .quota_service
        .get_sponsor(f.sponsor_id)
        .await
        .expect("sponsor");
    assert_eq!(sponsor.guest_used, 3);
    let uses = f
        .database
        .participants
        .count_uses(invitation.id)
        .await
        .expect("use count");
    assert_eq!(uses, 3);
}

#[tokio::test(flavor = "multi_thread")]
#[serial]
async fn test_losing_redemptions_surface_rejection_reasons() {
    let f = fixture().await;
    test_data::create_invitation(
        &f.database,
        "SOLO01",
        f.event_id,
        Some(f.sponsor_id),
        f.ticket_type_id,
        ParticipantType::Guest,
        UsageType::Single,
        Some(1),
        None,
    )
    .await;

    let tasks = (0..6).map(|i| {
        let redemption = f.services.redemption_service.clone();
        let request = test_data::redeem_request_for_email(&format!("solo{i}@example.com"));
        tokio::spawn(async move { redemption.redeem("SOLO01", &request, None).await })
    });
    let results = join_all(tasks).await;

    // Losers that reserved quota and then lost the use-count increment
    // must still surface the rejection classification, never a rollback
    // or storage error
    let mut successes = 0;
    for joined in results {
        match joined.expect("task panicked") {
            Ok(_) => successes += 1,
            Err(err) => assert_matches!(
                err,
                GuestPassError::NoUsesLeft | GuestPassError::ConcurrentRedemption
            ),
        }
    }
    assert_eq!(successes, 1);

    // Every losing reservation was released
    let sponsor = f
        .services
        .quota_service
        .get_sponsor(f.sponsor_id)
        .await
        .expect("sponsor");
    assert_eq!(sponsor.guest_used, 1);
}

#[tokio::test]
#[serial]
async fn test_failed_commit_rolls_back_counters() {
    let f = fixture().await;
    let invitation = test_data::create_invitation(
        &f.database,
        "DUPE77",
        f.event_id,
        Some(f.sponsor_id),
        f.ticket_type_id,
        ParticipantType::Guest,
        UsageType::Multiple,
        Some(5),
        None,
    )
    .await;

    let request = test_data::redeem_request_for_email("same.person@example.com");
    f.services
        .redemption_service
        .redeem("DUPE77", &request, None)
        .await
        .expect("first redemption");

    // Same email again: the participant insert fails at the commit step,
    // after quota and use count were already reserved
    let err = f
        .services
        .redemption_service
        .redeem("DUPE77", &request, None)
        .await
        .expect_err("duplicate email is rejected");
    assert_matches!(err, GuestPassError::InvalidInput(_));

    // Both counters must have been rolled back to the committed state
    let current = f
        .database
        .invitations
        .find_by_id(invitation.id)
        .await
        .expect("query")
        .expect("invitation exists");
    assert_eq!(current.current_uses, 1);

    let sponsor = f
        .services
        .quota_service
        .get_sponsor(f.sponsor_id)
        .await
        .expect("sponsor");
    assert_eq!(sponsor.guest_used, 1);

    let uses = f
        .database
        .participants
        .count_uses(invitation.id)
        .await
        .expect("use count");
    assert_eq!(uses, 1);
}

#[tokio::test]
#[serial]
async fn test_regular_codes_never_touch_sponsor_quota() {
    let f = fixture().await;
    test_data::create_invitation(
        &f.database,
        "FREE10",
        f.event_id,
        Some(f.sponsor_id),
        f.ticket_type_id,
        ParticipantType::Regular,
        UsageType::Multiple,
        Some(10),
        None,
    )
    .await;

    f.services
        .redemption_service
        .redeem("FREE10", &test_data::redeem_request(), None)
        .await
        .expect("regular redemption");

    let sponsor = f
        .services
        .quota_service
        .get_sponsor(f.sponsor_id)
        .await
        .expect("sponsor");
    assert_eq!(sponsor.staff_used, 0);
    assert_eq!(sponsor.guest_used, 0);
    assert_eq!(sponsor.scholarship_used, 0);
}

#[tokio::test]
#[serial]
async fn test_exhausted_sponsor_pool_blocks_redemption() {
    let f = fixture().await;
    test_data::create_invitation(
        &f.database,
        "SCHOL2",
        f.event_id,
        Some(f.sponsor_id),
        f.ticket_type_id,
        ParticipantType::Scholarship,
        UsageType::Unlimited,
        None,
        None,
    )
    .await;

    // scholarship pool holds two seats
    for i in 0..2 {
        f.services
            .redemption_service
            .redeem(
                "SCHOL2",
                &test_data::redeem_request_for_email(&format!("scholar{i}@example.com")),
                None,
            )
            .await
            .expect("seat available");
    }

    let err = f
        .services
        .redemption_service
        .redeem("SCHOL2", &test_data::redeem_request(), None)
        .await
        .expect_err("pool exhausted");
    assert_matches!(err, GuestPassError::QuotaExceeded { .. });

    // An unlimited code blocked by quota must not burn a use
    let invitation = f
        .database
        .invitations
        .find_by_code("SCHOL2")
        .await
        .expect("query")
        .expect("invitation exists");
    assert_eq!(invitation.current_uses, 2);
}

#[tokio::test]
#[serial]
async fn test_unpublished_event_rejects_redemption() {
    let f = fixture().await;
    test_data::create_invitation(
        &f.database,
        "EARLY1",
        f.event_id,
        Some(f.sponsor_id),
        f.ticket_type_id,
        ParticipantType::Guest,
        UsageType::Single,
        Some(1),
        None,
    )
    .await;
    test_data::set_event_status(&f.db.pool, f.event_id, EventStatus::Approved).await;

    let err = f
        .services
        .redemption_service
        .redeem("EARLY1", &test_data::redeem_request(), None)
        .await
        .expect_err("event is not published");
    assert_matches!(err, GuestPassError::EventNotPublished { .. });
}

#[tokio::test]
#[serial]
async fn test_expired_and_inactive_codes_are_classified() {
    let f = fixture().await;
    test_data::create_invitation(
        &f.database,
        "OLD001",
        f.event_id,
        None,
        f.ticket_type_id,
        ParticipantType::Regular,
        UsageType::Single,
        Some(1),
        Some(Utc::now() - Duration::hours(1)),
    )
    .await;
    let inactive = test_data::create_invitation(
        &f.database,
        "OFF001",
        f.event_id,
        None,
        f.ticket_type_id,
        ParticipantType::Regular,
        UsageType::Single,
        Some(1),
        None,
    )
    .await;
    f.database
        .invitations
        .set_active(inactive.id, false)
        .await
        .expect("deactivate");

    let err = f
        .services
        .redemption_service
        .redeem("OLD001", &test_data::redeem_request(), None)
        .await
        .expect_err("expired");
    assert_matches!(err, GuestPassError::InvitationExpired);

    let err = f
        .services
        .redemption_service
        .redeem("OFF001", &test_data::redeem_request(), None)
        .await
        .expect_err("inactive");
    assert_matches!(err, GuestPassError::InvitationInactive);

    let err = f
        .services
        .redemption_service
        .redeem("NOPE00", &test_data::redeem_request(), None)
        .await
        .expect_err("unknown code");
    assert_matches!(err, GuestPassError::InvitationNotFound { .. });
}
