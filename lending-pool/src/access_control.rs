use soroban_sdk::{Address, Env};

use crate::{
    errors::LendingPoolError,
    events,
    storage::{self, Role},
};

/// Grant every role to the pool's first admin
pub fn grant_all_roles(e: &Env, admin: &Address) {
    for role in [
        Role::Admin,
        Role::ParametersAdmin,
        Role::AssetListingAdmin,
        Role::EmergencyAdmin,
        Role::Treasury,
    ] {
        storage::set_role(e, role, admin, true);
    }
}

/// Require `account` to hold `role`
///
/// ### Errors
/// If the account does not hold the role
pub fn require_role(e: &Env, account: &Address, role: Role) -> Result<(), LendingPoolError> {
    if !storage::has_role(e, role, account) {
        return Err(LendingPoolError::MissingRole);
    }
    Ok(())
}

/// (Admin only) Grant `role` to `account`
///
/// ### Errors
/// If the caller is not an admin or the account already holds the role
pub fn execute_grant_role(
    e: &Env,
    caller: &Address,
    role: Role,
    account: &Address,
) -> Result<(), LendingPoolError> {
    require_role(e, caller, Role::Admin)?;
    if storage::has_role(e, role, account) {
        return Err(LendingPoolError::RoleRedundant);
    }
    storage::set_role(e, role, account, true);
    events::role_granted(e, role, account.clone(), caller.clone());
    Ok(())
}

/// (Admin only) Revoke `role` from `account`
///
/// ### Errors
/// If the caller is not an admin, the account does not hold the role, or an admin tries
/// to revoke its own admin role
pub fn execute_revoke_role(
    e: &Env,
    caller: &Address,
    role: Role,
    account: &Address,
) -> Result<(), LendingPoolError> {
    require_role(e, caller, Role::Admin)?;
    if role == Role::Admin && caller == account {
        return Err(LendingPoolError::InvalidCaller);
    }
    require_role(e, account, role)?;
    storage::set_role(e, role, account, false);
    events::role_revoked(e, role, account.clone(), caller.clone());
    Ok(())
}

/// Drop one of the caller's own roles
///
/// ### Errors
/// If the caller does not hold the role
pub fn execute_renounce_role(
    e: &Env,
    caller: &Address,
    role: Role,
) -> Result<(), LendingPoolError> {
    require_role(e, caller, role)?;
    storage::set_role(e, role, caller, false);
    events::role_revoked(e, role, caller.clone(), caller.clone());
    Ok(())
}
