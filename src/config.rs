//! Accrual parameters from the process environment.
//!
//! The core crate takes [`AccrualParameters`] explicitly; hosts that configure
//! through the environment resolve them here.

use anyhow::{Context, Result};

use crate::types::env_utils::env_address;
use crate::AccrualParameters;

/// Overrides [`AccrualParameters::system_address`].
pub const ENV_SYSTEM_ADDRESS: &str = "GAS_ACCRUAL_SYSTEM_ADDRESS";

/// Overrides [`AccrualParameters::default_recipient`].
pub const ENV_DEFAULT_RECIPIENT: &str = "GAS_ACCRUAL_DEFAULT_RECIPIENT";

/// Defaults with overrides from `GAS_ACCRUAL_SYSTEM_ADDRESS` and
/// `GAS_ACCRUAL_DEFAULT_RECIPIENT`.
///
/// Unset variables keep the default. A set but malformed variable is an error.
pub fn params_from_env() -> Result<AccrualParameters> {
    let mut params = AccrualParameters::default();
    if let Some(addr) =
        env_address(ENV_SYSTEM_ADDRESS).context("reading system address override")?
    {
        params.system_address = addr;
    }
    if let Some(addr) =
        env_address(ENV_DEFAULT_RECIPIENT).context("reading default recipient override")?
    {
        params.default_recipient = addr;
    }
    Ok(params)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accrual::DEFAULT_SYSTEM_ADDRESS;
    use crate::Address;

    #[test]
    fn test_env_overrides() {
        std::env::set_var(ENV_DEFAULT_RECIPIENT, "0xfee");
        let params = params_from_env().unwrap();

        std::env::set_var(ENV_DEFAULT_RECIPIENT, "fee-recipient");
        let err = params_from_env().unwrap_err();
        std::env::remove_var(ENV_DEFAULT_RECIPIENT);

        assert_eq!(params.system_address, DEFAULT_SYSTEM_ADDRESS);
        assert_eq!(
            params.default_recipient,
            "0x0000000000000000000000000000000000000fee"
                .parse::<Address>()
                .unwrap()
        );
        assert!(format!("{:#}", err).contains(ENV_DEFAULT_RECIPIENT));
    }
}
