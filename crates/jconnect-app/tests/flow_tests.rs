//! Integration tests for the application flows against a mock Supabase
//! server.

use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use jconnect_app::{
    enroll_free, unlock_profile, AppSession, ApplicationBoard, BoardEntry, DraftManager,
    JobWizard, PostingKind, UnlockOutcome, WizardStep,
};
use jconnect_models::{
    ApplicationStatus, Company, CompanyId, Course, CourseId, CourseStatus, JobForm, Profile,
    ProfileId,
};
use jconnect_supabase::{SupabaseClient, SupabaseConfig};

fn client_for(server: &MockServer) -> SupabaseClient {
    SupabaseClient::new(SupabaseConfig::new(server.uri(), "anon-key")).unwrap()
}

fn employer() -> Profile {
    let mut profile = Profile::for_new_user("auth-emp", "Meera Nair");
    profile.id = ProfileId("emp-1".to_string());
    profile
}

fn company() -> Company {
    let mut company = Company::new("emp-1", "Nair Retail");
    company.id = CompanyId("co-1".to_string());
    company
}

fn complete_form() -> JobForm {
    let mut form = JobForm::default();
    form.job_title = "Store Manager".to_string();
    form.category = "Retail".to_string();
    form.city = "Mumbai".to_string();
    form.area = "Andheri West".to_string();
    form.pincode = "400053".to_string();
    form.employment_types = vec!["Full-time".to_string()];
    form.schedules = vec!["Day shift".to_string()];
    form.number_of_hires = "2".to_string();
    form.min_pay = "25000".to_string();
    form.max_pay = "40000".to_string();
    form.education_levels = vec!["Graduate".to_string()];
    form.english_level = "Intermediate".to_string();
    form.total_experience = "2-4 years".to_string();
    form.contact_email = "hiring@nair-retail.example".to_string();
    form
}

fn job_row(id: &str, title: &str, created_at: &str) -> serde_json::Value {
    json!({
        "id": id,
        "company_id": "co-1",
        "employer_id": "emp-1",
        "job_title": title,
        "category": "Retail",
        "location": {"city": "Mumbai", "area": "Andheri West", "pincode": "400053"},
        "created_at": created_at,
        "updated_at": created_at
    })
}

fn profile_row(id: &str, auth_id: &str, full_name: &str) -> serde_json::Value {
    json!({
        "id": id,
        "auth_id": auth_id,
        "full_name": full_name,
        "created_at": "2026-08-01T08:00:00Z",
        "updated_at": "2026-08-01T08:00:00Z"
    })
}

// =============================================================================
// Applications Board
// =============================================================================

#[tokio::test]
async fn board_joins_postings_applications_and_profiles() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/jobs"))
        .and(query_param("employer_id", "eq.emp-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            job_row("j-1", "Store Manager", "2026-08-10T09:00:00Z")
        ])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/internships"))
        .and(query_param("employer_id", "eq.emp-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "id": "i-1",
            "company_id": "co-1",
            "employer_id": "emp-1",
            "title": "Marketing Intern",
            "category": "Marketing",
            "created_at": "2026-08-11T09:00:00Z",
            "updated_at": "2026-08-11T09:00:00Z"
        }])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/applications"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "id": "a-1",
            "job_id": "j-1",
            "applicant_id": "seeker-1",
            "status": "pending",
            "created_at": "2026-08-15T11:00:00Z",
            "updated_at": "2026-08-15T11:00:00Z"
        }])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/internship_applications"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "id": "a-2",
            "internship_id": "i-1",
            "applicant_id": "seeker-2",
            "created_at": "2026-08-15T10:00:00Z",
            "updated_at": "2026-08-15T10:00:00Z"
        }])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/profiles"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            profile_row("seeker-1", "auth-s1", "Asha Verma"),
            profile_row("seeker-2", "auth-s2", "Rahul Iyer")
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let board = ApplicationBoard::load(&client_for(&server), "emp-1")
        .await
        .unwrap();

    assert_eq!(board.entries().len(), 2);
    // Newest application first
    let first = &board.entries()[0];
    assert_eq!(first.kind, PostingKind::Job);
    assert_eq!(first.posting_title, "Store Manager");
    assert_eq!(first.applicant_name, "Asha Verma");
    assert_eq!(first.status, ApplicationStatus::Pending);

    let second = &board.entries()[1];
    assert_eq!(second.kind, PostingKind::Internship);
    assert_eq!(second.posting_title, "Marketing Intern");
    assert_eq!(second.applicant_name, "Rahul Iyer");
    // Internship application came back without a status field
    assert_eq!(second.status, ApplicationStatus::Submitted);
}

fn pending_entry(id: &str, kind: PostingKind) -> BoardEntry {
    BoardEntry {
        application_id: id.to_string(),
        kind,
        posting_title: "Store Manager".to_string(),
        applicant_id: "seeker-1".to_string(),
        applicant_name: "Asha Verma".to_string(),
        status: ApplicationStatus::Pending,
        applied_at: chrono::Utc::now(),
    }
}

#[tokio::test]
async fn status_change_confirms_and_notifies_the_applicant() {
    let server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/applications"))
        .and(query_param("id", "eq.a-1"))
        .and(body_partial_json(json!({"status": "shortlisted"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "id": "a-1",
            "job_id": "j-1",
            "applicant_id": "seeker-1",
            "status": "shortlisted",
            "created_at": "2026-08-15T11:00:00Z",
            "updated_at": "2026-08-16T09:00:00Z"
        }])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/notifications"))
        .and(body_partial_json(json!({
            "user_id": "seeker-1",
            "title": "Application Update"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([{
            "id": "n-1",
            "user_id": "seeker-1",
            "title": "Application Update",
            "message": "Your application for Store Manager has been shortlisted",
            "created_at": "2026-08-16T09:00:00Z"
        }])))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let mut board = ApplicationBoard::from_entries(vec![pending_entry("a-1", PostingKind::Job)]);
    board
        .change_status(&client, "a-1", ApplicationStatus::Shortlisted)
        .await
        .unwrap();

    assert_eq!(board.entries()[0].status, ApplicationStatus::Shortlisted);
}

#[tokio::test]
async fn failed_status_change_rolls_back() {
    let server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/applications"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "message": "connection lost"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let mut board = ApplicationBoard::from_entries(vec![pending_entry("a-1", PostingKind::Job)]);
    let err = board
        .change_status(&client, "a-1", ApplicationStatus::Rejected)
        .await
        .unwrap_err();

    assert!(!err.is_validation());
    // The optimistic update was undone
    assert_eq!(board.entries()[0].status, ApplicationStatus::Pending);
}

#[tokio::test]
async fn notification_failure_does_not_undo_the_status_change() {
    let server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/internship_applications"))
        .and(query_param("id", "eq.a-2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "id": "a-2",
            "internship_id": "i-1",
            "applicant_id": "seeker-1",
            "status": "reviewed",
            "created_at": "2026-08-15T10:00:00Z",
            "updated_at": "2026-08-16T09:00:00Z"
        }])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/notifications"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "message": "insert failed"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let mut board =
        ApplicationBoard::from_entries(vec![pending_entry("a-2", PostingKind::Internship)]);
    board
        .change_status(&client, "a-2", ApplicationStatus::Reviewed)
        .await
        .unwrap();

    assert_eq!(board.entries()[0].status, ApplicationStatus::Reviewed);
}

// =============================================================================
// Wizard Submission
// =============================================================================

#[tokio::test]
async fn submission_inserts_one_job_and_clears_the_resumed_draft() {
    let server = MockServer::start().await;

    let draft = complete_form().to_draft_row("emp-1");
    let draft_id = draft.id.as_str().to_string();

    Mock::given(method("POST"))
        .and(path("/rest/v1/jobs"))
        .and(body_partial_json(json!({
            "job_title": "Store Manager",
            "company_id": "co-1",
            "employer_id": "emp-1"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([
            job_row("j-9", "Store Manager", "2026-08-20T12:00:00Z")
        ])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/rest/v1/job_drafts"))
        .and(query_param("id", format!("eq.{}", draft_id)))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let mut wizard = JobWizard::open_with_draft(&employer(), Some(&company()), &draft).unwrap();
    while wizard.step() != WizardStep::Payment {
        wizard.next().unwrap();
    }
    wizard.mark_payment_success();

    let job = wizard.submit(&client).await.unwrap();
    assert_eq!(job.id.as_str(), "j-9");
    assert!(wizard.resumed_draft().is_none());
}

#[tokio::test]
async fn failed_submission_keeps_the_form_and_draft() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/jobs"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "message": "insert failed"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let draft = complete_form().to_draft_row("emp-1");
    let mut wizard = JobWizard::open_with_draft(&employer(), Some(&company()), &draft).unwrap();
    while wizard.step() != WizardStep::Payment {
        wizard.next().unwrap();
    }
    wizard.mark_payment_success();

    wizard.submit(&client).await.unwrap_err();
    // Everything is still in place for a retry
    assert_eq!(wizard.form().job_title, "Store Manager");
    assert_eq!(wizard.resumed_draft(), Some(draft.id.as_str()));
}

// =============================================================================
// Draft Cap
// =============================================================================

#[tokio::test]
async fn sixth_draft_save_surfaces_the_cap_without_local_changes() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/job_drafts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "id": "d-1",
                "user_id": "emp-1",
                "job_title": "Cashier",
                "created_at": "2026-08-18T09:00:00Z",
                "updated_at": "2026-08-19T09:00:00Z"
            },
            {
                "id": "d-2",
                "user_id": "emp-1",
                "created_at": "2026-08-17T09:00:00Z",
                "updated_at": "2026-08-17T09:00:00Z"
            }
        ])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/job_drafts"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "code": "P0001",
            "message": "Maximum 5 drafts allowed. Please delete an existing draft first."
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut manager = DraftManager::new(client_for(&server), "emp-1");
    manager.refresh().await.unwrap();
    assert_eq!(manager.len(), 2);

    let mut form = JobForm::default();
    form.job_title = "Sixth Draft".to_string();
    let err = manager.save(&form).await.unwrap_err();

    assert!(err.is_draft_cap());
    assert!(err.to_string().contains("Maximum 5 drafts"));
    // The displayed list did not change
    assert_eq!(manager.len(), 2);
    assert_eq!(manager.drafts()[0].id.as_str(), "d-1");
}

#[tokio::test]
async fn successful_save_prepends_the_new_draft() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/job_drafts"))
        .and(body_partial_json(json!({"job_title": "Barista", "user_id": "emp-1"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([{
            "id": "d-3",
            "user_id": "emp-1",
            "job_title": "Barista",
            "created_at": "2026-08-20T09:00:00Z",
            "updated_at": "2026-08-20T09:00:00Z"
        }])))
        .expect(1)
        .mount(&server)
        .await;

    let mut manager = DraftManager::new(client_for(&server), "emp-1");
    let mut form = JobForm::default();
    form.job_title = "Barista".to_string();

    let stored = manager.save(&form).await.unwrap();
    assert_eq!(stored.id.as_str(), "d-3");
    assert_eq!(manager.len(), 1);
}

// =============================================================================
// Session Restore
// =============================================================================

fn mount_refresh_exchange(server: &MockServer) -> impl std::future::Future<Output = ()> + '_ {
    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .and(query_param("grant_type", "refresh_token"))
        .and(body_partial_json(json!({"refresh_token": "stored-refresh"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "fresh-token",
            "refresh_token": "next-refresh",
            "expires_in": 3600,
            "user": {
                "id": "auth-emp",
                "email": "meera@example.com",
                "user_metadata": {"full_name": "Meera Nair"}
            }
        })))
        .expect(1)
        .mount(server)
}

#[tokio::test]
async fn restore_loads_the_existing_profile() {
    let server = MockServer::start().await;
    mount_refresh_exchange(&server).await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/profiles"))
        .and(query_param("auth_id", "eq.auth-emp"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            profile_row("emp-1", "auth-emp", "Meera Nair")
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let session = AppSession::new(client_for(&server));
    let profile = session.restore("stored-refresh").await.unwrap();

    assert_eq!(profile.id.as_str(), "emp-1");
    assert_eq!(profile.full_name, "Meera Nair");
    assert!(session.profile().await.is_some());
}

#[tokio::test]
async fn restore_creates_a_profile_on_first_login() {
    let server = MockServer::start().await;
    mount_refresh_exchange(&server).await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/profiles"))
        .and(query_param("auth_id", "eq.auth-emp"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/profiles"))
        .and(body_partial_json(json!({
            "auth_id": "auth-emp",
            "full_name": "Meera Nair",
            "email": "meera@example.com"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([
            profile_row("p-new", "auth-emp", "Meera Nair")
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let session = AppSession::new(client_for(&server));
    let profile = session.restore("stored-refresh").await.unwrap();

    assert_eq!(profile.id.as_str(), "p-new");
    assert_eq!(session.require_profile().await.unwrap().full_name, "Meera Nair");
}

#[tokio::test]
async fn sign_out_tears_down_the_session() {
    let server = MockServer::start().await;
    mount_refresh_exchange(&server).await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/profiles"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            profile_row("emp-1", "auth-emp", "Meera Nair")
        ])))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/auth/v1/logout"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let session = AppSession::new(client_for(&server));
    session.restore("stored-refresh").await.unwrap();
    session.sign_out().await.unwrap();

    assert!(session.profile().await.is_none());
    assert!(session.require_profile().await.is_err());
}

// =============================================================================
// Profile Unlock
// =============================================================================

#[tokio::test]
async fn unlock_spends_one_credit() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/rpc/access_job_seeker_profile"))
        .and(body_partial_json(json!({
            "employer_id": "emp-1",
            "job_seeker_id": "seeker-1"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "message": null,
            "already_unlocked": false,
            "remaining_credits": 4
        })))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = unlock_profile(&client_for(&server), "emp-1", "seeker-1")
        .await
        .unwrap();
    assert_eq!(
        outcome,
        UnlockOutcome::Unlocked {
            already_unlocked: false,
            remaining_credits: Some(4)
        }
    );
}

#[tokio::test]
async fn unlock_with_no_credits_is_denied_distinctly() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/rpc/access_job_seeker_profile"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": false,
            "message": "Insufficient credits",
            "already_unlocked": false,
            "remaining_credits": 0
        })))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = unlock_profile(&client_for(&server), "emp-1", "seeker-1")
        .await
        .unwrap();
    assert_eq!(outcome, UnlockOutcome::InsufficientCredits);
    assert!(outcome.denial_message().is_some());
}

// =============================================================================
// Enrollment
// =============================================================================

fn free_course() -> Course {
    let now = chrono::Utc::now();
    Course {
        id: CourseId("c-1".to_string()),
        employer_id: "emp-1".to_string(),
        title: "Spoken English Crash Course".to_string(),
        category: None,
        description: "Practice-first spoken English for retail staff".to_string(),
        cover_photo_url: None,
        price: None,
        is_free: true,
        course_link: None,
        redirect_link: None,
        manual_approval: false,
        status: CourseStatus::Published,
        created_at: now,
        updated_at: now,
    }
}

#[tokio::test]
async fn free_enrollment_records_the_dashboard_event() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/course_enrollments"))
        .and(body_partial_json(json!({
            "course_id": "c-1",
            "user_id": "user-1",
            "paid": false
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([{
            "id": "e-1",
            "course_id": "c-1",
            "user_id": "user-1",
            "paid": false,
            "created_at": "2026-08-20T12:00:00Z"
        }])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/course_notifications"))
        .and(body_partial_json(json!({"course_id": "c-1", "type": "enrollment"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([{
            "id": "cn-1",
            "course_id": "c-1",
            "user_id": "user-1",
            "type": "enrollment",
            "message": "You enrolled in Spoken English Crash Course",
            "created_at": "2026-08-20T12:00:00Z"
        }])))
        .expect(1)
        .mount(&server)
        .await;

    let enrollment = enroll_free(&client_for(&server), &free_course(), "user-1")
        .await
        .unwrap();
    assert!(!enrollment.paid);
    assert_eq!(enrollment.status, "active");
}

#[tokio::test]
async fn enrollment_event_failure_is_tolerated() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/course_enrollments"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([{
            "id": "e-2",
            "course_id": "c-1",
            "user_id": "user-1",
            "paid": false,
            "created_at": "2026-08-20T12:00:00Z"
        }])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/course_notifications"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "message": "insert failed"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let enrollment = enroll_free(&client_for(&server), &free_course(), "user-1")
        .await
        .unwrap();
    assert_eq!(enrollment.id.as_str(), "e-2");
}
