#![forbid(unsafe_code)]

//! End-to-end form flow: seed from a link, edit, submit, redirect.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use otc::prelude::*;
use otc::{ApiResponse, ClientError};
use pretty_assertions::assert_eq;

/// In-memory backend keyed by code. Records every URL it was asked for and
/// answers with a JSON body, decoded the way an HTTP verifier would.
struct FakeBackend {
    config: OtcConfig,
    accounts: HashMap<String, AuthData>,
    requests: RefCell<Vec<String>>,
}

impl FakeBackend {
    fn new(base: &str) -> Self {
        Self {
            config: OtcConfig {
                api_base: base.to_string(),
                ..OtcConfig::default()
            },
            accounts: HashMap::new(),
            requests: RefCell::new(Vec::new()),
        }
    }

    fn with_account(mut self, code: &str, name: &str, email: &str) -> Self {
        self.accounts.insert(
            code.to_string(),
            AuthData {
                id: self.accounts.len() as i64 + 1,
                name: name.to_string(),
                email: email.to_string(),
                phone: None,
            },
        );
        self
    }
}

impl OtcVerifier for FakeBackend {
    async fn verify(&self, code: &str) -> std::result::Result<ApiResponse<AuthData>, ClientError> {
        self.requests
            .borrow_mut()
            .push(self.config.verify_url(code));
        match self.accounts.get(code) {
            Some(data) => {
                let body = serde_json::json!({"message": "Code verified", "data": data});
                Ok(serde_json::from_str(&body.to_string())?)
            }
            None => Err(ClientError::from_error_body(
                401,
                r#"{"message":"Invalid or expired code"}"#,
            )),
        }
    }
}

#[derive(Clone)]
struct Cell {
    index: usize,
    focused: Rc<RefCell<Option<usize>>>,
}

impl Focusable for Cell {
    fn focus(&self) {
        *self.focused.borrow_mut() = Some(self.index);
    }

    fn select_content(&self) {}
}

fn mounted_form(query: &str) -> (OtcForm<Cell>, Rc<RefCell<Option<usize>>>) {
    let config = OtcConfig::default();
    let mut form = OtcForm::from_query(&config, query).expect("valid config");
    let focused = Rc::new(RefCell::new(None));
    for index in 0..config.code_length {
        form.mount_cell(
            index,
            Cell {
                index,
                focused: Rc::clone(&focused),
            },
        );
    }
    form.mount();
    (form, focused)
}

#[test]
fn link_with_full_code_submits_and_routes_new_user_to_entry() {
    let backend = FakeBackend::new("https://api.example.com").with_account(
        "AB12CD",
        "Ada",
        "ada@example.com",
    );
    let (mut form, focused) = mounted_form("?otc=ab12cd");
    assert_eq!(*focused.borrow(), Some(5));

    let mut session = UserSession::new();
    let submission = pollster::block_on(form.submit(&backend, &mut session));

    assert!(submission.result.success);
    assert_eq!(submission.result.message, "Code verified");
    assert_eq!(submission.redirect, Some(Redirect::Entry));
    assert_eq!(submission.redirect.map(Redirect::path), Some("/entry"));
    assert_eq!(session, UserSession::identified("Ada", "ada@example.com"));
    assert_eq!(
        *backend.requests.borrow(),
        vec!["https://api.example.com/otc/verify?otc=AB12CD"]
    );
}

#[test]
fn known_user_is_routed_home() {
    let backend = FakeBackend::new("").with_account("ZZZZZZ", "Bob", "bob@example.com");
    let (mut form, _) = mounted_form("otc=ZZZZZZ");
    let mut session = UserSession::identified("Bob", "old@example.com");
    let submission = pollster::block_on(form.submit(&backend, &mut session));
    assert_eq!(submission.redirect, Some(Redirect::Home));
    assert_eq!(session.email.as_deref(), Some("bob@example.com"));
}

#[test]
fn partial_link_then_typing_completes_the_code() {
    let backend = FakeBackend::new("").with_account("QWE123", "Cy", "cy@example.com");
    let (mut form, focused) = mounted_form("lang=en&otc=qwe");
    assert_eq!(*focused.borrow(), Some(3));

    let mut session = UserSession::new();
    let early = pollster::block_on(form.submit(&backend, &mut session));
    assert_eq!(early.result, ApiResult::failure("Invalid credentials"));
    assert!(backend.requests.borrow().is_empty());

    for (cell, c) in [(3, "1"), (4, "2"), (5, "3")] {
        let r = form.handle(&CellEvent::input(cell, c));
        assert!(r.edited);
    }
    assert_eq!(form.sequence().code(), "QWE123");

    let submission = pollster::block_on(form.submit(&backend, &mut session));
    assert!(submission.result.success);
    assert_eq!(form.state(), &submission.result);
}

#[test]
fn wrong_code_surfaces_backend_message() {
    let backend = FakeBackend::new("");
    let (mut form, _) = mounted_form("");
    form.handle(&CellEvent::paste(0, "000000"));

    let mut session = UserSession::new();
    let submission = pollster::block_on(form.submit(&backend, &mut session));
    assert_eq!(
        submission.result,
        ApiResult::failure("Invalid or expired code")
    );
    assert_eq!(submission.redirect, None);
    assert_eq!(session, UserSession::new());
}

#[test]
fn editing_after_a_failed_submit_keeps_state_until_next_submit() {
    let backend = FakeBackend::new("").with_account("ABCDEF", "Di", "di@example.com");
    let (mut form, _) = mounted_form("otc=ABCDEX");
    let mut session = UserSession::new();

    let first = pollster::block_on(form.submit(&backend, &mut session));
    assert!(!first.result.success);

    form.handle(&CellEvent::key(5, KeyCode::Backspace));
    form.handle(&CellEvent::input(5, "f"));
    assert_eq!(form.sequence().code(), "ABCDEF");
    assert!(!form.state().success);

    let second = pollster::block_on(form.submit(&backend, &mut session));
    assert!(second.result.success);
}
