#![forbid(unsafe_code)]

//! The form that owns a one-time code.
//!
//! [`OtcForm`] holds the [`CodeSequence`], feeds cell events to a
//! [`SegmentedCodeInput`], and submits the finished code to an
//! [`OtcVerifier`].
//!
//! # Submit flow
//!
//! 1. Any empty cell: fail with `Invalid credentials`; the verifier is not
//!    called.
//! 2. Otherwise each cell is sanitized, the cells are joined and verified.
//!    Errors are folded into the result by [`graceful`].
//! 3. On success the redirect is chosen from the session *before* it is
//!    updated: `/` for a known user, `/entry` otherwise. A returned name and
//!    email are then copied into the session.

use otc_core::code::CodeSequence;
use otc_core::event::CellEvent;
use otc_widgets::{EventResult, Focusable, SegmentedCodeInput};

use crate::client::{
    ApiResult, AuthData, INVALID_CREDENTIALS_MESSAGE, OtcVerifier, graceful, sanitize,
};
use crate::config::OtcConfig;
use crate::error::Result;
use crate::session::UserSession;

/// Where the app navigates after a successful submit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Redirect {
    /// Known user: the home page.
    Home,
    /// New user: the entry page, to fill in a profile.
    Entry,
}

impl Redirect {
    /// Route path.
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Home => "/",
            Self::Entry => "/entry",
        }
    }
}

/// Outcome of [`OtcForm::submit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    /// Envelope to show the user.
    pub result: ApiResult<AuthData>,
    /// Navigation target, on success only.
    pub redirect: Option<Redirect>,
}

/// Owner of a one-time code and its input.
#[derive(Debug)]
pub struct OtcForm<H> {
    sequence: CodeSequence,
    seeded: bool,
    input: SegmentedCodeInput<H>,
    state: ApiResult<AuthData>,
}

impl<H: Focusable> OtcForm<H> {
    /// Empty form with `config.code_length` cells.
    pub fn new(config: &OtcConfig) -> Result<Self> {
        Ok(Self::with_sequence(CodeSequence::new(config.code_length)?, false))
    }

    /// Form seeded from the `config.seed_param` parameter of a URL query
    /// string (leading `?` optional). Without the parameter the form starts
    /// empty.
    pub fn from_query(config: &OtcConfig, query: &str) -> Result<Self> {
        match query_param(query, &config.seed_param) {
            Some(seed) => {
                tracing::debug!(param = %config.seed_param, "seeding code from query");
                Ok(Self::with_sequence(
                    CodeSequence::seeded(config.code_length, &seed)?,
                    true,
                ))
            }
            None => Self::new(config),
        }
    }

    fn with_sequence(sequence: CodeSequence, seeded: bool) -> Self {
        Self {
            sequence,
            seeded,
            input: SegmentedCodeInput::new(),
            state: ApiResult::initial(),
        }
    }

    /// Current code.
    #[must_use]
    pub fn sequence(&self) -> &CodeSequence {
        &self.sequence
    }

    /// Active cell.
    #[must_use]
    pub fn active(&self) -> usize {
        self.input.active()
    }

    /// Result of the last submit, or the initial state.
    #[must_use]
    pub fn state(&self) -> &ApiResult<AuthData> {
        &self.state
    }

    /// The input controller.
    #[must_use]
    pub fn input(&self) -> &SegmentedCodeInput<H> {
        &self.input
    }

    /// Register the focus handle of a mounted cell.
    pub fn mount_cell(&mut self, index: usize, handle: H) -> Option<H> {
        self.input.mount_cell(index, handle)
    }

    /// Drop the focus handle of an unmounted cell.
    pub fn unmount_cell(&mut self, index: usize) -> Option<H> {
        self.input.unmount_cell(index)
    }

    /// Focus the initial cell once every cell is mounted.
    pub fn mount(&mut self) -> usize {
        self.input.mount(&self.sequence, self.seeded)
    }

    /// Route a cell event; edits replace the form's code.
    pub fn handle(&mut self, event: &CellEvent) -> EventResult {
        let Self {
            sequence, input, ..
        } = self;
        let mut replacement = None;
        let result = input.handle_event(event, sequence, |next| replacement = Some(next));
        if let Some(next) = replacement {
            *sequence = next;
        }
        result
    }

    /// Verify the code and update `session` on success.
    pub async fn submit<V>(&mut self, verifier: &V, session: &mut UserSession) -> Submission
    where
        V: OtcVerifier + ?Sized,
    {
        if !self.sequence.is_complete() {
            tracing::debug!(filled = self.sequence.filled(), "submit with empty cells");
            return self.finish(ApiResult::failure(INVALID_CREDENTIALS_MESSAGE), None);
        }

        let code: String = self
            .sequence
            .to_strings()
            .iter()
            .map(|cell| sanitize(cell))
            .collect();
        let result = graceful(verifier.verify(&code)).await;

        let redirect = result.success.then(|| {
            if session.is_identified() {
                Redirect::Home
            } else {
                Redirect::Entry
            }
        });
        if result.success
            && let Some(data) = &result.data
            && session.absorb(data)
        {
            tracing::debug!("session updated from verified identity");
        }
        tracing::debug!(
            success = result.success,
            redirect = redirect.map(Redirect::path),
            "submit finished"
        );
        self.finish(result, redirect)
    }

    fn finish(&mut self, result: ApiResult<AuthData>, redirect: Option<Redirect>) -> Submission {
        self.state = result.clone();
        Submission { result, redirect }
    }
}

/// First value of `name` in a URL query string, percent-decoded.
#[must_use]
pub fn query_param(query: &str, name: &str) -> Option<String> {
    let query = query.strip_prefix('?').unwrap_or(query);
    query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .find_map(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            (decode_component(key) == name).then(|| decode_component(value))
        })
}

/// Decode a query component: `+` is a space, `%XX` escapes are resolved and
/// malformed escapes stay literal.
fn decode_component(input: &str) -> String {
    let spaced = input.replace('+', " ");
    match urlencoding::decode(&spaced) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => {
            let bytes = urlencoding::decode_binary(spaced.as_bytes());
            String::from_utf8_lossy(&bytes).into_owned()
        }
    }
}
