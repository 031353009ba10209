//! Capability traits connecting curves to payoffs and option models.
//!
//! Payoffs and option models only need two things from the curve world: a
//! forward value at a date (an asset price for price payoffs, a simple
//! forward rate for rate payoffs) and a terminal volatility at a date.
//! Plain numbers implement both, standing in for flat curves.

use std::sync::Arc;

use dcf_core::{errors::Result, Real};
use dcf_time::{Date, Period};

/// Anything that can produce a forward value at a date.
pub trait ForwardSource: std::fmt::Debug + Send + Sync {
    /// The forward value observed for `date`.
    fn forward_value(&self, date: Date) -> Result<Real>;

    /// The tenor associated with forward rates, if the source has one.
    fn forward_tenor(&self) -> Option<Period> {
        None
    }
}

/// Anything that can produce a terminal volatility for an expiry date.
pub trait VolatilitySource: std::fmt::Debug + Send + Sync {
    /// The terminal volatility for expiry `date`.
    fn terminal_vol(&self, date: Date) -> Result<Real>;
}

impl ForwardSource for Real {
    fn forward_value(&self, _date: Date) -> Result<Real> {
        Ok(*self)
    }
}

impl VolatilitySource for Real {
    fn terminal_vol(&self, _date: Date) -> Result<Real> {
        Ok(*self)
    }
}

/// A stable identity tag for a shared source, used in `details()` records
/// to let report consumers correlate rows priced off the same curve.
pub fn source_id<T: ?Sized>(source: &Arc<T>) -> i64 {
    Arc::as_ptr(source) as *const () as usize as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constants_are_flat_sources() {
        let f: Real = 0.05;
        assert_eq!(f.forward_value(Date::new(3.0)).unwrap(), 0.05);
        assert_eq!(f.terminal_vol(Date::new(3.0)).unwrap(), 0.05);
        assert!(f.forward_tenor().is_none());
    }

    #[test]
    fn source_ids_distinguish_instances() {
        let a: Arc<dyn ForwardSource> = Arc::new(0.05);
        let b: Arc<dyn ForwardSource> = Arc::new(0.05);
        let a2 = a.clone();
        assert_eq!(source_id(&a), source_id(&a2));
        assert_ne!(source_id(&a), source_id(&b));
    }
}
