//! Access guard — gates entry to views on session validity.
//!
//! Each view activation gets one `GuardActivation`. It starts in
//! `Checking`, runs its check once, and settles in either `Ready` or
//! `Redirecting`. `Redirecting` is terminal: later calls never move it.

use crate::session::Session;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// Entry view where credentials are entered.
    Login,
    /// Token-requiring view.
    Dashboard,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gate {
    /// Requires a valid session; otherwise redirects to `View::Login`.
    Protect,
    /// Requires no valid session; otherwise redirects to `View::Dashboard`.
    RedirectIfAuthenticated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardState {
    Checking,
    Ready,
    Redirecting(View),
}

impl GuardState {
    pub fn is_ready(&self) -> bool {
        matches!(self, GuardState::Ready)
    }
}

#[derive(Debug)]
pub struct GuardActivation {
    gate: Gate,
    state: GuardState,
}

impl GuardActivation {
    pub fn new(gate: Gate) -> Self {
        Self {
            gate,
            state: GuardState::Checking,
        }
    }

    pub fn protect() -> Self {
        Self::new(Gate::Protect)
    }

    pub fn redirect_if_authenticated() -> Self {
        Self::new(Gate::RedirectIfAuthenticated)
    }

    pub fn gate(&self) -> Gate {
        self.gate
    }

    pub fn state(&self) -> GuardState {
        self.state
    }

    /// Run the check for this activation. Only the first call consults the
    /// session; later calls return the settled state.
    pub fn check(&mut self, session: &Session) -> GuardState {
        if self.state != GuardState::Checking {
            return self.state;
        }

        let valid = session.is_valid();
        self.state = match (self.gate, valid) {
            (Gate::Protect, false) => GuardState::Redirecting(View::Login),
            (Gate::Protect, true) => GuardState::Ready,
            (Gate::RedirectIfAuthenticated, true) => GuardState::Redirecting(View::Dashboard),
            (Gate::RedirectIfAuthenticated, false) => GuardState::Ready,
        };

        tracing::debug!(gate = ?self.gate, state = ?self.state, "Access guard settled");
        self.state
    }
}
