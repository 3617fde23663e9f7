//! Sign-in Flow Integration Tests
//!
//! End-to-end runs of a sign-in form against scripted servers.
//!
//! Test Categories:
//! - Category 1: Accepted, blocked and rejected sign-in
//! - Category 2: Transport failures
//! - Category 3: Settings-driven forms

mod utils;

use std::rc::Rc;
use std::time::Duration;

use formsync_forms::login::LoginField;
use formsync_forms::{
	Attempt, FieldErrors, FieldValue, NotificationLevel, ScriptedTransport, SubmitError,
	TransportError,
};
use rstest::rstest;
use serial_test::serial;
use tokio::sync::Notify;
use utils::{login_form, login_form_with, login_settings};

// ============================================================================
// Category 1: Accepted, blocked and rejected sign-in
// ============================================================================

/// Valid credentials, server accepts
#[tokio::test]
#[serial]
async fn test_successful_sign_in_closes_form() {
	let h = login_form(ScriptedTransport::new().succeed());
	h.fill("a@b.com", "x", false);
	let values = h.form.remote().values();

	let attempt = h.form.submit().await;

	assert_eq!(attempt, Attempt::Succeeded);
	assert!(!h.visibility.is_open());
	let notifications = h.notifier.take();
	assert_eq!(notifications.len(), 1);
	assert_eq!(notifications[0].level, NotificationLevel::Success);
	assert_eq!(h.form.remote().values(), values);
	assert!(h.form.remote().was_successful());
	assert_eq!(h.finished.get(), 1);
}

/// Missing email never leaves the client
#[tokio::test]
#[serial]
async fn test_missing_email_is_blocked_locally() {
	let h = login_form(ScriptedTransport::new().succeed());
	h.form.remote().set_field(LoginField::Email, "");
	h.form.remote().set_field(LoginField::Password, "x");

	let attempt = h.form.submit().await;

	assert_eq!(
		attempt,
		Attempt::Blocked(FieldErrors::new().with("email", "Email is required"))
	);
	assert_eq!(h.transport.call_count(), 0);
	assert_eq!(
		h.form.store().errors(),
		FieldErrors::new().with("email", "Email is required")
	);
	assert!(h.visibility.is_open());
	assert!(h.notifier.is_empty());
	assert_eq!(h.finished.get(), 0);
}

/// Server rejects the password
#[tokio::test]
#[serial]
async fn test_rejected_password_is_cleared_and_reported() {
	let h = login_form(
		ScriptedTransport::new().reject(FieldErrors::new().with("password", "Invalid credentials")),
	);
	h.fill("a@b.com", "x", false);

	let attempt = h.form.submit().await;

	assert!(matches!(attempt, Attempt::Failed(SubmitError::Rejected(_))));
	assert_eq!(h.form.remote().value(LoginField::Password), FieldValue::from(""));
	assert_eq!(h.form.store().value(LoginField::Password), FieldValue::from(""));
	let notification = h.notifier.last().unwrap();
	assert_eq!(notification.level, NotificationLevel::Error);
	assert_eq!(notification.description, "Invalid credentials");
	assert!(h.visibility.is_open());
	assert_eq!(h.finished.get(), 1);
	assert_eq!(
		h.form.store().error(LoginField::Password).as_deref(),
		Some("Invalid credentials")
	);
	assert_eq!(h.form.store().error(LoginField::Remember), None);
}

/// Retry after a rejection, then close the form
#[tokio::test]
#[serial]
async fn test_retry_after_rejection() {
	let h = login_form(
		ScriptedTransport::new()
			.reject(FieldErrors::new().with("password", "Invalid credentials"))
			.succeed(),
	);
	h.fill("a@b.com", "wrong", true);
	h.form.submit().await;

	h.form.remote().set_field(LoginField::Password, "right");
	let attempt = h.form.submit().await;

	assert_eq!(attempt, Attempt::Succeeded);
	assert!(h.form.store().errors().is_empty());
	assert_eq!(h.transport.requests()[1].body["password"], "right");
	assert_eq!(h.transport.requests()[1].body["remember"], true);
	assert_eq!(h.finished.get(), 2);
}

/// Reopening a form that was closed with errors shows a clean slate
#[tokio::test]
#[serial]
async fn test_reopen_after_close_has_no_errors() {
	let h = login_form(
		ScriptedTransport::new().reject(FieldErrors::new().with("email", "Unknown account")),
	);
	h.fill("a@b.com", "x", false);
	h.form.submit().await;
	assert!(h.form.store().has_errors());

	h.visibility.close();
	h.form.open();

	assert!(h.visibility.is_open());
	assert!(!h.form.store().has_errors());
	assert_eq!(h.form.remote().value(LoginField::Email), FieldValue::from("a@b.com"));
}

// ============================================================================
// Category 2: Transport failures
// ============================================================================

#[rstest]
#[case(TransportError::network("connection refused"))]
#[case(TransportError::server(502, "Bad gateway"))]
#[case(TransportError::decode("expected JSON"))]
#[tokio::test]
#[serial]
async fn test_transport_failure_shows_generic_message(#[case] error: TransportError) {
	let h = login_form(ScriptedTransport::new().fail(error.clone()));
	h.fill("a@b.com", "x", false);

	let attempt = h.form.submit().await;

	assert_eq!(attempt, Attempt::Failed(SubmitError::Transport(error)));
	assert_eq!(
		h.notifier.last().unwrap().description,
		"Something went wrong. Please try again."
	);
	assert!(h.form.remote().errors().is_empty());
	assert_eq!(h.form.remote().value(LoginField::Password), FieldValue::from(""));
	assert!(h.visibility.is_open());
}

#[tokio::test(start_paused = true)]
#[serial]
async fn test_unresponsive_server_times_out() {
	let mut config = login_settings().resolve::<LoginField>().unwrap();
	config.options.timeout = Some(Duration::from_secs(2));
	let h = login_form_with(ScriptedTransport::new().held(Rc::new(Notify::new())), config);
	h.fill("a@b.com", "x", false);

	let attempt = h.form.submit().await;

	assert_eq!(
		attempt,
		Attempt::Failed(SubmitError::Transport(TransportError::Timeout(
			Duration::from_secs(2)
		)))
	);
	assert!(!h.form.remote().processing());
	assert_eq!(h.finished.get(), 1);
}

// ============================================================================
// Category 3: Settings-driven forms
// ============================================================================

#[tokio::test]
#[serial]
async fn test_fixture_settings_shape_request() {
	let config = login_settings().resolve::<LoginField>().unwrap();
	let h = login_form_with(ScriptedTransport::new().succeed(), config);
	h.fill("a@b.com", "x", false);

	h.form.submit().await;

	let request = &h.transport.requests()[0];
	assert_eq!(request.endpoint, "/accounts/login/");
	assert_eq!(
		request.headers.get("X-Requested-With").map(String::as_str),
		Some("XMLHttpRequest")
	);
	assert_eq!(
		request.body,
		serde_json::json!({"email": "a@b.com", "password": "x", "remember": false})
	);
}

#[tokio::test]
#[serial]
async fn test_reset_on_success_from_settings() {
	let mut settings = login_settings();
	settings.reset_on_success = true;
	let h = login_form_with(
		ScriptedTransport::new().succeed(),
		settings.resolve::<LoginField>().unwrap(),
	);
	h.fill("a@b.com", "x", true);

	h.form.submit().await;

	assert!(!h.form.remote().is_dirty());
	assert_eq!(h.form.store().values(), h.form.remote().values());
}
