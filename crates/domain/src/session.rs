use crate::{CreateError, DeleteError, Password, ReadError, User, Username};

#[allow(async_fn_in_trait)]
pub trait SessionService {
    async fn sign_up(&self, username: Username, password: Password) -> Result<User, CreateError>;
    async fn sign_in(&self, username: Username, password: Password) -> Result<User, ReadError>;
    async fn get_session(&self) -> Result<User, ReadError>;
    async fn sign_out(&self) -> Result<(), DeleteError>;
}

#[allow(async_fn_in_trait)]
pub trait SessionRepository {
    /// Looks up the user by its credentials, establishes the backend session and persists the
    /// session record.
    async fn request_session(
        &self,
        username: &Username,
        password: &Password,
    ) -> Result<User, ReadError>;
    /// Restores the session from the persisted session record.
    async fn initialize_session(&self) -> Result<User, ReadError>;
    async fn delete_session(&self) -> Result<(), DeleteError>;
}
