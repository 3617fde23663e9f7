//! Shared helpers for the formsync-forms integration tests.

#![allow(dead_code)]

use std::cell::Cell;
use std::path::PathBuf;
use std::rc::Rc;

use formsync_forms::login::{LoginField, login_config, login_schema};
use formsync_forms::{
	FormSettings, MemoryNotifier, OrchestratorConfig, RemoteFormState, ScriptedTransport,
	SubmissionOrchestrator, Visibility,
};

/// Base path for fixtures
fn fixtures_dir() -> PathBuf {
	PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

/// Loads a fixture file as a string
///
/// # Panics
///
/// Panics if the file cannot be read
pub fn load_fixture(path: &str) -> String {
	let full_path = fixtures_dir().join(path);
	std::fs::read_to_string(&full_path)
		.unwrap_or_else(|e| panic!("Failed to load fixture at {:?}: {}", full_path.display(), e))
}

/// Settings from `tests/fixtures/login_form.toml`
pub fn login_settings() -> FormSettings {
	FormSettings::from_toml_str(&load_fixture("login_form.toml"))
		.unwrap_or_else(|e| panic!("Invalid login fixture: {e}"))
}

/// A sign-in form wired to in-memory collaborators.
pub struct LoginHarness {
	pub form: SubmissionOrchestrator<LoginField>,
	pub transport: Rc<ScriptedTransport>,
	pub notifier: MemoryNotifier,
	pub visibility: Visibility,
	pub finished: Rc<Cell<usize>>,
}

impl LoginHarness {
	/// Fill every field
	pub fn fill(&self, email: &str, password: &str, remember: bool) {
		let remote = self.form.remote();
		remote.set_field(LoginField::Email, email);
		remote.set_field(LoginField::Password, password);
		remote.set_field(LoginField::Remember, remember);
	}
}

/// Open sign-in form posting to `/login` through `transport`
pub fn login_form(transport: ScriptedTransport) -> LoginHarness {
	login_form_with(transport, login_config("/login"))
}

/// Open sign-in form with an explicit configuration
pub fn login_form_with(
	transport: ScriptedTransport,
	config: OrchestratorConfig<LoginField>,
) -> LoginHarness {
	let transport = Rc::new(transport);
	let notifier = MemoryNotifier::new();
	let visibility = Visibility::opened();
	let finished = Rc::new(Cell::new(0));

	let form = SubmissionOrchestrator::new(
		RemoteFormState::new(),
		login_schema(),
		visibility.clone(),
		transport.clone(),
		notifier.clone(),
		config,
	)
	.with_on_finish({
		let finished = finished.clone();
		move || finished.set(finished.get() + 1)
	});

	LoginHarness {
		form,
		transport,
		notifier,
		visibility,
		finished,
	}
}
