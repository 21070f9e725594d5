//! Aggregate roots for the User Accounts context.

use chrono::{DateTime, Utc};
use taleweave_core::aggregate::AggregateRoot;
use taleweave_core::clock::Clock;
use taleweave_core::error::DomainError;
use taleweave_core::event::EventMetadata;
use uuid::Uuid;

use super::events::{AccountEvent, AccountEventKind, ProfileUpdated, UserRegistered};

const USERNAME_MIN: usize = 3;
const USERNAME_MAX: usize = 32;
const DISPLAY_NAME_MAX: usize = 64;
const BIO_MAX: usize = 500;

/// The aggregate root for a user account.
#[derive(Debug)]
pub struct UserAccount {
    /// Aggregate identifier.
    pub id: Uuid,
    /// Current version (event count).
    pub(crate) version: i64,
    pub(crate) username: Option<String>,
    pub(crate) display_name: String,
    pub(crate) email: String,
    pub(crate) bio: Option<String>,
    pub(crate) registered_at: Option<DateTime<Utc>>,
    /// Uncommitted events pending persistence.
    uncommitted_events: Vec<AccountEvent>,
}

fn validate_username(username: &str) -> Result<(), DomainError> {
    let len = username.chars().count();
    if !(USERNAME_MIN..=USERNAME_MAX).contains(&len) {
        return Err(DomainError::Validation(format!(
            "username must be {USERNAME_MIN} to {USERNAME_MAX} characters"
        )));
    }
    if !username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        return Err(DomainError::Validation(
            "username may only contain letters, digits, '_' and '-'".into(),
        ));
    }
    Ok(())
}

fn validate_email(email: &str) -> Result<(), DomainError> {
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => Ok(()),
        _ => Err(DomainError::Validation(format!(
            "'{email}' is not a valid email address"
        ))),
    }
}

fn normalize_display_name(display_name: &str) -> Result<String, DomainError> {
    let trimmed = display_name.trim();
    if trimmed.is_empty() {
        return Err(DomainError::Validation(
            "display name must not be empty".into(),
        ));
    }
    if trimmed.chars().count() > DISPLAY_NAME_MAX {
        return Err(DomainError::Validation(format!(
            "display name must be at most {DISPLAY_NAME_MAX} characters"
        )));
    }
    Ok(trimmed.to_owned())
}

impl UserAccount {
    /// Creates an empty, unregistered account.
    #[must_use]
    pub fn new(id: Uuid) -> Self {
        Self {
            id,
            version: 0,
            username: None,
            display_name: String::new(),
            email: String::new(),
            bio: None,
            registered_at: None,
            uncommitted_events: Vec::new(),
        }
    }

    /// Whether a `UserRegistered` event has been applied.
    #[must_use]
    pub fn is_registered(&self) -> bool {
        self.username.is_some()
    }

    fn record(&mut self, kind: AccountEventKind, correlation_id: Uuid, clock: &dyn Clock) {
        let event = AccountEvent {
            metadata: EventMetadata::caused_by_command(
                kind.event_type(),
                self.id,
                self.next_sequence_number(),
                correlation_id,
                clock,
            ),
            kind,
        };
        self.mutate(&event.kind, event.metadata.occurred_at);
        self.uncommitted_events.push(event);
    }

    fn mutate(&mut self, kind: &AccountEventKind, occurred_at: DateTime<Utc>) {
        match kind {
            AccountEventKind::UserRegistered(payload) => {
                self.username = Some(payload.username.clone());
                self.display_name.clone_from(&payload.display_name);
                self.email.clone_from(&payload.email);
                self.registered_at = Some(occurred_at);
            }
            AccountEventKind::ProfileUpdated(payload) => {
                self.display_name.clone_from(&payload.display_name);
                self.bio.clone_from(&payload.bio);
            }
        }
    }

    /// Registers the account, producing a `UserRegistered` event.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Conflict` if the account is already registered
    /// and `DomainError::Validation` for a malformed username, email or
    /// display name.
    pub fn register(
        &mut self,
        username: &str,
        display_name: &str,
        email: &str,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) -> Result<(), DomainError> {
        if self.is_registered() {
            return Err(DomainError::Conflict(format!(
                "user {} is already registered",
                self.id
            )));
        }
        let username = username.trim();
        let email = email.trim();
        validate_username(username)?;
        validate_email(email)?;
        let display_name = normalize_display_name(display_name)?;

        self.record(
            AccountEventKind::UserRegistered(UserRegistered {
                user_id: self.id,
                username: username.to_owned(),
                display_name,
                email: email.to_lowercase(),
            }),
            correlation_id,
            clock,
        );
        Ok(())
    }

    /// Edits the profile, producing a `ProfileUpdated` event.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Forbidden` if `actor_id` is not this user and
    /// `DomainError::Validation` for an empty display name or overlong bio.
    pub fn update_profile(
        &mut self,
        actor_id: Uuid,
        display_name: &str,
        bio: Option<&str>,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) -> Result<(), DomainError> {
        if actor_id != self.id {
            return Err(DomainError::Forbidden(
                "users may only edit their own profile".into(),
            ));
        }
        let display_name = normalize_display_name(display_name)?;
        let bio = bio.map(str::trim).filter(|b| !b.is_empty());
        if bio.is_some_and(|b| b.chars().count() > BIO_MAX) {
            return Err(DomainError::Validation(format!(
                "bio must be at most {BIO_MAX} characters"
            )));
        }

        self.record(
            AccountEventKind::ProfileUpdated(ProfileUpdated {
                user_id: self.id,
                display_name,
                bio: bio.map(str::to_owned),
            }),
            correlation_id,
            clock,
        );
        Ok(())
    }
}

impl AggregateRoot for UserAccount {
    type Event = AccountEvent;

    fn aggregate_id(&self) -> Uuid {
        self.id
    }

    fn version(&self) -> i64 {
        self.version
    }

    fn apply(&mut self, event: &Self::Event) {
        self.mutate(&event.kind, event.metadata.occurred_at);
        self.version += 1;
    }

    fn uncommitted_events(&self) -> &[Self::Event] {
        &self.uncommitted_events
    }

    fn clear_uncommitted_events(&mut self) {
        self.uncommitted_events.clear();
    }
}
