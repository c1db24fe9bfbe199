//! Explicit session context: the logged-in user and the stores behind it.
//!
//! Created once at startup with `load` and passed to whatever needs the
//! current user; there is no global auth state.

use prepwise_core::statistics::{student_progress, StudentProgress};
use prepwise_core::{AttemptRecord, SessionReport};

use crate::error::{AuthError, StoreError};
use crate::store::{AttemptStore, ProfileStore};
use crate::user::{Role, User};

pub struct SessionContext {
    profiles: Box<dyn ProfileStore>,
    attempts: Box<dyn AttemptStore>,
    user: Option<User>,
}

impl SessionContext {
    /// Restore the saved profile, if any.
    ///
    /// A profile that cannot be read is discarded with a warning and the
    /// context starts logged out.
    pub fn load(profiles: Box<dyn ProfileStore>, attempts: Box<dyn AttemptStore>) -> Self {
        let user = match profiles.load() {
            Ok(user) => user,
            Err(e) => {
                tracing::warn!("ignoring saved profile: {}", e);
                None
            }
        };
        if let Some(user) = &user {
            tracing::debug!(name = %user.name, role = %user.role, "restored profile");
        }
        Self {
            profiles,
            attempts,
            user,
        }
    }

    /// Mock login: any non-blank email and password is accepted.
    pub fn login(&mut self, email: &str, password: &str, role: Role) -> Result<&User, AuthError> {
        if email.trim().is_empty() || password.trim().is_empty() {
            return Err(AuthError::MissingCredentials);
        }
        let user = User::new(email, role);
        self.profiles.save(&user)?;
        tracing::info!(name = %user.name, role = %role, "logged in");
        Ok(self.user.insert(user))
    }

    /// Forget the current user, in memory and on disk.
    pub fn logout(&mut self) -> Result<(), StoreError> {
        if let Some(user) = self.user.take() {
            tracing::info!(name = %user.name, "logged out");
        }
        self.profiles.clear()
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn require_user(&self) -> Result<&User, AuthError> {
        self.user.as_ref().ok_or(AuthError::NotLoggedIn)
    }

    /// Add a student's finished session to the history.
    ///
    /// Returns the badge the session newly earned, if any. Teacher sessions
    /// are not recorded, so the history holds student attempts only.
    pub fn record_attempt(&mut self, report: &SessionReport) -> Result<Option<String>, AuthError> {
        let user = self.user.as_ref().ok_or(AuthError::NotLoggedIn)?;
        if !user.is_student() {
            tracing::debug!(name = %user.name, "teacher session not recorded");
            return Ok(None);
        }

        let key = user.identity_key();
        let held = student_progress(&key, &self.attempts.list()?).badges;
        let record = AttemptRecord::from_report(report, &key, &user.name);
        self.attempts.append(&record)?;

        let badge = report.badge.clone().filter(|b| !held.contains(b));
        if let Some(badge) = &badge {
            tracing::info!(name = %user.name, badge = %badge, "badge earned");
        }
        Ok(badge)
    }

    /// Points, level, and badges of the current student, derived from the
    /// attempt history. `None` when logged out or logged in as a teacher.
    pub fn progress(&self) -> Result<Option<StudentProgress>, StoreError> {
        match &self.user {
            Some(user) if user.is_student() => Ok(Some(student_progress(
                &user.identity_key(),
                &self.attempts.list()?,
            ))),
            _ => Ok(None),
        }
    }

    /// Every recorded attempt, oldest first.
    pub fn attempts(&self) -> Result<Vec<AttemptRecord>, StoreError> {
        self.attempts.list()
    }
}
