use crate::models::{LoginResponse, Role};
use crate::session::store::{SessionStore, StoreError};
use log::warn;

/// Key holding the bearer token
pub const AUTH_TOKEN_KEY: &str = "authToken";
/// Key holding the role granted by the server
pub const USER_ROLE_KEY: &str = "userRole";
/// Key holding the server-side user id
pub const USER_ID_KEY: &str = "userId";
/// Key holding the display name
pub const USER_NAME_KEY: &str = "userName";

/// All session keys, in write order
pub const SESSION_KEYS: [&str; 4] = [AUTH_TOKEN_KEY, USER_ROLE_KEY, USER_ID_KEY, USER_NAME_KEY];

/// Identifiers of an authenticated session as kept in the session cache
///
/// No versioning, encryption or expiry: the record is written once per successful
/// login and removed only by logout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionRecord {
    pub token: String,
    pub role: Role,
    pub user_id: String,
    pub display_name: String,
}

impl From<&LoginResponse> for SessionRecord {
    fn from(response: &LoginResponse) -> Self {
        Self {
            token: response.token.clone(),
            role: response.role,
            user_id: response.user_id.clone(),
            display_name: response.display_name.clone(),
        }
    }
}

impl SessionRecord {
    /// Write the four session keys
    ///
    /// All or nothing: if any write fails, the session keys are removed so a
    /// half-written record from two different logins is never left behind.
    ///
    /// # Errors
    ///
    /// Returns the first store error.
    pub fn persist<S: SessionStore + ?Sized>(&self, store: &S) -> Result<(), StoreError> {
        let written = self.write_keys(store);
        if written.is_err() {
            if let Err(e) = Self::clear(store) {
                warn!("Failed to discard partially written session: {e}");
            }
        }
        written
    }

    fn write_keys<S: SessionStore + ?Sized>(&self, store: &S) -> Result<(), StoreError> {
        store.set(AUTH_TOKEN_KEY, &self.token)?;
        store.set(USER_ROLE_KEY, self.role.as_str())?;
        store.set(USER_ID_KEY, &self.user_id)?;
        store.set(USER_NAME_KEY, &self.display_name)?;
        Ok(())
    }

    /// Read the record back; `None` unless all four keys are present and the role
    /// is one of the known values
    #[must_use]
    pub fn load<S: SessionStore + ?Sized>(store: &S) -> Option<Self> {
        let token = store.get(AUTH_TOKEN_KEY)?;
        let role_value = store.get(USER_ROLE_KEY)?;
        let user_id = store.get(USER_ID_KEY)?;
        let display_name = store.get(USER_NAME_KEY)?;

        let role = match role_value.parse() {
            Ok(role) => role,
            Err(e) => {
                warn!("Ignoring cached session: {e}");
                return None;
            }
        };

        Some(Self {
            token,
            role,
            user_id,
            display_name,
        })
    }

    /// Remove the four session keys, leaving unrelated keys alone
    ///
    /// # Errors
    ///
    /// Returns the first store error encountered.
    pub fn clear<S: SessionStore + ?Sized>(store: &S) -> Result<(), StoreError> {
        for key in SESSION_KEYS {
            store.remove(key)?;
        }
        Ok(())
    }
}
