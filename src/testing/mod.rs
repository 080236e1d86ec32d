//! Testing utilities for the HealthTrack auth client
//!
//! - [`fixtures`] - Pre-built credentials, login bodies, drafts and settings
//! - [`mock`] - Scripted `AuthApi` / `RegistrationBackend` implementation
//!
//! ## Usage
//!
//! ```rust,ignore
//! use healthtrack_auth::testing::{fixtures::TestFixtures, mock::MockAuthApi};
//!
//! let api = MockAuthApi::new();
//! api.push_login(Ok(TestFixtures::doctor_login_response()));
//! ```

pub mod fixtures;
pub mod mock;

pub use fixtures::TestFixtures;
pub use mock::MockAuthApi;

/// Common test constants
pub mod constants {
    /// Default test email address
    pub const TEST_EMAIL: &str = "a@b.com";

    /// Default test password
    pub const TEST_PASSWORD: &str = "x";

    /// Token returned by the doctor login fixture
    pub const TEST_TOKEN: &str = "t1";

    /// User id returned by the doctor login fixture
    pub const TEST_USER_ID: &str = "u1";

    /// Display name returned by the doctor login fixture
    pub const TEST_DISPLAY_NAME: &str = "Dr. A";
}
