//! Deciding what happens when the user opens the app or picks a template.
//!
//! Picking a template while a session for a different template is active
//! is a conflict. The engine never settles it on its own: the caller gets
//! a [`SessionConflict`] offering exactly Resume, Discard and Cancel, and
//! no durable state changes until one is chosen.

use crate::error::SyncResult;
use liftlog_session::{SessionError, SessionRepository, Started};
use liftlog_types::{Session, TemplateKey, WorkoutDate};
use tracing::info;

/// The three ways out of a [`SessionConflict`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Reopen the active session and ignore the new selection.
    Resume,
    /// Delete the active session, then start the selected template.
    Discard,
    /// Change nothing.
    Cancel,
}

/// A different template's session is active.
#[derive(Debug, Clone)]
pub struct SessionConflict {
    pub active: Session,
    pub requested: TemplateKey,
    pub date: WorkoutDate,
}

impl SessionConflict {
    /// Every permitted resolution.
    pub fn resolutions(&self) -> [Resolution; 3] {
        [Resolution::Resume, Resolution::Discard, Resolution::Cancel]
    }
}

#[derive(Debug, Clone)]
pub enum SelectOutcome {
    Opened(Started),
    Conflict(SessionConflict),
}

#[derive(Debug, Clone)]
pub enum Resolved {
    Opened(Started),
    Cancelled,
}

/// Reconciliation over a [`SessionRepository`].
#[derive(Clone)]
pub struct Reconciler {
    sessions: SessionRepository,
}

impl Reconciler {
    pub fn new(sessions: SessionRepository) -> Self {
        Self { sessions }
    }

    /// The session to surface as a banner on app load, if any. Nothing is
    /// opened; the user may ignore it.
    pub async fn on_app_load(&self) -> SyncResult<Option<Session>> {
        let active = self.sessions.find_any_active_session().await?;
        if let Some(session) = &active {
            info!("Found active session {}", session.key());
        }
        Ok(active)
    }

    /// Opens `template` for `date`, or reports a conflict with the active
    /// session of another template.
    pub async fn select_template(
        &self,
        template: &TemplateKey,
        date: WorkoutDate,
    ) -> SyncResult<SelectOutcome> {
        if self.sessions.catalog().get(template).is_none() {
            return Err(SessionError::InvalidTemplate(template.clone()).into());
        }

        match self.sessions.find_any_active_session().await? {
            Some(active) if &active.template_key != template => {
                info!(
                    "Selecting {} conflicts with active session {}",
                    template,
                    active.key()
                );
                Ok(SelectOutcome::Conflict(SessionConflict {
                    active,
                    requested: template.clone(),
                    date,
                }))
            }
            _ => Ok(SelectOutcome::Opened(
                self.sessions.start_or_resume(template, date).await?,
            )),
        }
    }

    /// Applies the user's choice for a conflict.
    pub async fn resolve(
        &self,
        conflict: SessionConflict,
        choice: Resolution,
    ) -> SyncResult<Resolved> {
        match choice {
            Resolution::Resume => {
                let started = self
                    .sessions
                    .start_or_resume(&conflict.active.template_key, conflict.active.date)
                    .await?;
                Ok(Resolved::Opened(started))
            }
            Resolution::Discard => {
                self.sessions.discard_key(&conflict.active.key()).await?;
                let started = self
                    .sessions
                    .start_or_resume(&conflict.requested, conflict.date)
                    .await?;
                Ok(Resolved::Opened(started))
            }
            Resolution::Cancel => Ok(Resolved::Cancelled),
        }
    }
}
