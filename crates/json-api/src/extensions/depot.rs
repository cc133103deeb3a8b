//! Depot helper extensions.

use std::any::Any;

use salvo::prelude::{Depot, StatusError};

use storefront_app::domain::users::records::CurrentUser;

const CURRENT_USER_DEPOT_KEY: &str = "current_user";

/// Helpers for request-scoped values stored in the depot.
pub(crate) trait DepotExt {
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, StatusError>;

    fn insert_current_user(&mut self, user: CurrentUser);

    /// The authenticated caller, or 401 when the auth middleware did not run.
    fn current_user_or_401(&self) -> Result<CurrentUser, StatusError>;

    /// The authenticated caller when they are staff, 403 for shoppers.
    fn admin_or_403(&self) -> Result<CurrentUser, StatusError>;
}

impl DepotExt for Depot {
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, StatusError> {
        self.obtain::<T>()
            .map_err(|_ignored| StatusError::internal_server_error())
    }

    fn insert_current_user(&mut self, user: CurrentUser) {
        self.insert(CURRENT_USER_DEPOT_KEY, user);
    }

    fn current_user_or_401(&self) -> Result<CurrentUser, StatusError> {
        self.get::<CurrentUser>(CURRENT_USER_DEPOT_KEY)
            .copied()
            .map_err(|_ignored| StatusError::unauthorized())
    }

    fn admin_or_403(&self) -> Result<CurrentUser, StatusError> {
        let user = self.current_user_or_401()?;

        if !user.is_admin() {
            return Err(StatusError::forbidden().brief("Admin access required"));
        }

        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use salvo::http::StatusCode;
    use storefront_app::domain::users::records::Role;

    use crate::test_helpers::{TEST_ADMIN, TEST_CUSTOMER};

    use super::*;

    #[test]
    fn missing_user_is_unauthorized() {
        let depot = Depot::new();

        let result = depot.current_user_or_401();

        assert!(
            matches!(&result, Err(error) if error.code == StatusCode::UNAUTHORIZED),
            "expected 401, got {result:?}"
        );
    }

    #[test]
    fn customers_are_forbidden_from_admin() {
        let mut depot = Depot::new();

        depot.insert_current_user(TEST_CUSTOMER);

        let result = depot.admin_or_403();

        assert!(
            matches!(&result, Err(error) if error.code == StatusCode::FORBIDDEN),
            "expected 403, got {result:?}"
        );
    }

    #[test]
    fn admins_pass_the_admin_check() {
        let mut depot = Depot::new();

        depot.insert_current_user(TEST_ADMIN);

        assert!(
            matches!(depot.admin_or_403(), Ok(user) if user.role == Role::Admin),
            "expected the admin to be returned"
        );
    }
}
