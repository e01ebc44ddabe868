use log::debug;

use crate::{
    CreateError, DeleteError, Password, PasswordError, ReadError, SessionService, StorageError,
    User, Username, UsernameError,
};

type Listener = Box<dyn Fn(Option<&User>)>;

/// Authentication state shared by all views.
///
/// Listeners are notified after every change of the signed-in user.
#[derive(Default)]
pub struct SessionContext {
    user: Option<User>,
    listeners: Vec<(SubscriptionID, Listener)>,
    next_subscription: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriptionID(usize);

impl SessionContext {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    pub fn subscribe(&mut self, listener: impl Fn(Option<&User>) + 'static) -> SubscriptionID {
        let id = SubscriptionID(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionID) {
        self.listeners.retain(|(i, _)| *i != id);
    }

    /// Restores a previously persisted session. A missing session record leaves the context
    /// unauthenticated.
    pub async fn init(&mut self, service: &impl SessionService) -> Result<(), ReadError> {
        match service.get_session().await {
            Ok(user) => {
                self.set_user(Some(user));
                Ok(())
            }
            Err(ReadError::Storage(StorageError::NoSession)) => {
                debug!("no persisted session");
                self.set_user(None);
                Ok(())
            }
            Err(err) => {
                self.set_user(None);
                Err(err)
            }
        }
    }

    pub async fn sign_up(
        &mut self,
        service: &impl SessionService,
        username: &str,
        password: &str,
    ) -> Result<(), AuthError> {
        let (username, password) = credentials(username, password)?;
        let user = service.sign_up(username, password).await?;
        self.set_user(Some(user));
        Ok(())
    }

    pub async fn sign_in(
        &mut self,
        service: &impl SessionService,
        username: &str,
        password: &str,
    ) -> Result<(), AuthError> {
        let (username, password) = credentials(username, password)?;
        let user = service.sign_in(username, password).await?;
        self.set_user(Some(user));
        Ok(())
    }

    /// Leaves the context unauthenticated even if the session record could not be removed.
    pub async fn sign_out(&mut self, service: &impl SessionService) -> Result<(), DeleteError> {
        let result = service.sign_out().await;
        self.set_user(None);
        result
    }

    fn set_user(&mut self, user: Option<User>) {
        self.user = user;
        for (_, listener) in &self.listeners {
            listener(self.user.as_ref());
        }
    }
}

fn credentials(username: &str, password: &str) -> Result<(Username, Password), AuthError> {
    Ok((Username::new(username)?, Password::new(password)?))
}

#[derive(thiserror::Error, Debug)]
pub enum AuthError {
    #[error(transparent)]
    Username(#[from] UsernameError),
    #[error(transparent)]
    Password(#[from] PasswordError),
    #[error(transparent)]
    SignUp(#[from] CreateError),
    #[error(transparent)]
    SignIn(#[from] ReadError),
}
