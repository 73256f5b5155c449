//! Price-to-return series
//!
//! Converts a stream of prices into one-period rates of change and keeps the
//! most recent returns in a [`RollingWindow`]. Used for every instrument in
//! the residual momentum strategy and for the market index.

use crate::error::Result;
use crate::window::RollingWindow;

/// Rolling window of one-period returns fed by prices
#[derive(Debug, Clone, PartialEq)]
pub struct ReturnSeries {
    last_price: Option<f64>,
    returns: RollingWindow,
}

impl ReturnSeries {
    /// Create a series holding the most recent `capacity` returns.
    pub fn new(capacity: usize) -> Result<Self> {
        Ok(Self {
            last_price: None,
            returns: RollingWindow::new(capacity)?,
        })
    }

    /// Record a new price.
    ///
    /// Zero and non-finite prices are ignored. The first accepted price only
    /// primes the series; every later one appends
    /// `(price - previous) / previous` and returns it.
    pub fn update(&mut self, price: f64) -> Option<f64> {
        if price == 0.0 || !price.is_finite() {
            return None;
        }
        let change = self.last_price.map(|previous| (price - previous) / previous);
        self.last_price = Some(price);
        if let Some(change) = change {
            self.returns.append(change);
        }
        change
    }

    /// Most recent accepted price.
    pub const fn last_price(&self) -> Option<f64> {
        self.last_price
    }

    /// The return window.
    pub const fn returns(&self) -> &RollingWindow {
        &self.returns
    }

    /// True once the return window is full.
    pub const fn is_ready(&self) -> bool {
        self.returns.is_ready()
    }
}
