//! Facade Integration Tests
//!
//! The root crate re-exports the member crates; a sign-in form can be built
//! from `formsync::prelude` alone.

use std::rc::Rc;

use formsync::forms::ScriptedTransport;
use formsync::forms::login::{LoginField, login_config, login_schema};
use formsync::prelude::*;
use rstest::rstest;
use serial_test::serial;

#[rstest]
#[serial]
fn test_reactive_reexports() {
	let source = Signal::new(1);
	let mirror = Signal::new(0);
	let mut scope = EffectScope::new();
	scope.layout_effect({
		let (source, mirror) = (source.clone(), mirror.clone());
		move || mirror.set(source.get() * 10)
	});

	source.set(2);

	assert_eq!(mirror.get_untracked(), 20);
}

#[tokio::test]
#[serial]
async fn test_sign_in_through_prelude() {
	let transport = Rc::new(ScriptedTransport::new().succeed());
	let notifier = MemoryNotifier::new();
	let modal = Visibility::opened();
	let form = SubmissionOrchestrator::new(
		RemoteFormState::new(),
		login_schema(),
		modal.clone(),
		transport.clone(),
		notifier.clone(),
		login_config("/login"),
	);

	form.remote().set_field(LoginField::Email, "a@b.com");
	form.remote().set_field(LoginField::Password, "x");
	let attempt = form.submit().await;

	assert!(attempt.into_result().is_ok());
	assert!(!modal.is_open());
	assert_eq!(notifier.len(), 1);
	assert_eq!(transport.call_count(), 1);
}
