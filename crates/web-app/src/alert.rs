//! Messages shown to the user when an action fails.

use log::error;

use liftlog_domain::{
    AuthError, CreateError, DeleteError, ReadError, SaveRoutineError, SaveWorkoutError,
    StorageError, UpdateError, WorkoutSessionError,
};

#[must_use]
pub fn sign_up(err: &AuthError) -> String {
    match err {
        AuthError::Username(_) | AuthError::Password(_) => err.to_string(),
        AuthError::SignUp(CreateError::Conflict) => "Username already exists".to_string(),
        AuthError::SignUp(err) => format!("Failed to create account: {}", create_reason(err)),
        AuthError::SignIn(err) => format!("Failed to create account: {}", read_reason(err)),
    }
}

#[must_use]
pub fn sign_in(err: &AuthError) -> String {
    match err {
        AuthError::Username(_) | AuthError::Password(_) => err.to_string(),
        AuthError::SignIn(ReadError::NotFound) => "Invalid username or password".to_string(),
        AuthError::SignIn(err) => format!("Failed to sign in: {}", read_reason(err)),
        AuthError::SignUp(err) => format!("Failed to sign in: {}", create_reason(err)),
    }
}

#[must_use]
pub fn save_routine(err: &SaveRoutineError) -> String {
    match err {
        SaveRoutineError::Form(form) => form.to_string(),
        SaveRoutineError::Create(err) => format!("Failed to save routine: {}", create_reason(err)),
        SaveRoutineError::Update(err) => format!("Failed to save routine: {}", update_reason(err)),
    }
}

#[must_use]
pub fn save_workout(err: &SaveWorkoutError) -> String {
    match err {
        SaveWorkoutError::Session(WorkoutSessionError::NothingToSave) => {
            "Record at least one set before saving the workout".to_string()
        }
        SaveWorkoutError::Session(session) => session.to_string(),
        SaveWorkoutError::Create(err) => {
            format!("Failed to save workout, please try again: {}", create_reason(err))
        }
    }
}

/// `subject` names what was being loaded, e.g. "routines".
#[must_use]
pub fn load(subject: &str, err: &ReadError) -> String {
    format!("Failed to load {subject}: {}", read_reason(err))
}

#[must_use]
pub fn delete(subject: &str, err: &DeleteError) -> String {
    match err {
        DeleteError::Storage(storage) => {
            format!("Failed to delete {subject}: {}", storage_reason(storage))
        }
        DeleteError::Other(_) => format!("Failed to delete {subject}: {err}"),
    }
}

/// Shows a blocking browser alert.
pub fn show(message: &str) {
    let Some(window) = web_sys::window() else {
        error!("failed to access window to show alert: {message}");
        return;
    };
    if let Err(err) = window.alert_with_message(message) {
        error!("failed to show alert: {err:?}");
    }
}

fn read_reason(err: &ReadError) -> String {
    match err {
        ReadError::Storage(storage) => storage_reason(storage),
        ReadError::NotFound | ReadError::Other(_) => err.to_string(),
    }
}

fn create_reason(err: &CreateError) -> String {
    match err {
        CreateError::Storage(storage) => storage_reason(storage),
        CreateError::Conflict | CreateError::Other(_) => err.to_string(),
    }
}

fn update_reason(err: &UpdateError) -> String {
    match err {
        UpdateError::Storage(storage) => storage_reason(storage),
        UpdateError::Conflict | UpdateError::Other(_) => err.to_string(),
    }
}

fn storage_reason(err: &StorageError) -> String {
    match err {
        StorageError::NoConnection => "no connection to server".to_string(),
        StorageError::NoSession => "not signed in".to_string(),
        StorageError::Other(_) => err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use liftlog_domain::{PasswordError, RoutineFormError, UsernameError};

    use super::*;

    #[rstest]
    #[case(
        AuthError::SignUp(CreateError::Conflict),
        "Username already exists"
    )]
    #[case(
        AuthError::Username(UsernameError::Empty),
        "Username must not be empty"
    )]
    #[case(
        AuthError::Password(PasswordError::TooShort(3)),
        "Password must be at least 6 characters (3 < 6)"
    )]
    #[case(
        AuthError::SignUp(CreateError::Storage(StorageError::NoConnection)),
        "Failed to create account: no connection to server"
    )]
    #[case(
        AuthError::SignUp(CreateError::Other("backend error".into())),
        "Failed to create account: backend error"
    )]
    fn test_sign_up(#[case] err: AuthError, #[case] expected: &str) {
        assert_eq!(sign_up(&err), expected);
    }

    #[rstest]
    #[case(
        AuthError::SignIn(ReadError::NotFound),
        "Invalid username or password"
    )]
    #[case(
        AuthError::SignIn(ReadError::Storage(StorageError::NoConnection)),
        "Failed to sign in: no connection to server"
    )]
    fn test_sign_in(#[case] err: AuthError, #[case] expected: &str) {
        assert_eq!(sign_in(&err), expected);
    }

    #[rstest]
    #[case(
        SaveRoutineError::Form(RoutineFormError::EmptyName),
        "Routine name must not be empty"
    )]
    #[case(
        SaveRoutineError::Form(RoutineFormError::NoExercises),
        "Routine must contain at least one exercise"
    )]
    #[case(
        SaveRoutineError::Update(UpdateError::Storage(StorageError::NoSession)),
        "Failed to save routine: not signed in"
    )]
    fn test_save_routine(#[case] err: SaveRoutineError, #[case] expected: &str) {
        assert_eq!(save_routine(&err), expected);
    }

    #[rstest]
    #[case(
        SaveWorkoutError::Session(WorkoutSessionError::NothingToSave),
        "Record at least one set before saving the workout"
    )]
    #[case(
        SaveWorkoutError::Create(CreateError::Storage(StorageError::NoConnection)),
        "Failed to save workout, please try again: no connection to server"
    )]
    fn test_save_workout(#[case] err: SaveWorkoutError, #[case] expected: &str) {
        assert_eq!(save_workout(&err), expected);
    }

    #[test]
    fn test_load_and_delete() {
        assert_eq!(
            load("routines", &ReadError::Storage(StorageError::NoConnection)),
            "Failed to load routines: no connection to server"
        );
        assert_eq!(
            load("workout", &ReadError::NotFound),
            "Failed to load workout: not found"
        );
        assert_eq!(
            delete("workout", &DeleteError::Other("conflict".into())),
            "Failed to delete workout: conflict"
        );
    }
}
