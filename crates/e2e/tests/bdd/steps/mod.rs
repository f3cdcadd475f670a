pub mod checkout;

use storefront_e2e::{HarnessError, HarnessResult};

/// Fail the step with `message` unless `condition` holds
pub fn ensure(condition: bool, message: impl FnOnce() -> String) -> HarnessResult<()> {
    if condition {
        Ok(())
    } else {
        Err(HarnessError::assertion(message()))
    }
}
