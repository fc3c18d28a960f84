//! Trade ledger: the open position and the closed trades of one backtest run.

use chrono::NaiveDate;

#[derive(Debug, Clone, PartialEq)]
pub struct OpenPosition {
    pub quantity: f64,
    pub entry_price: f64,
    pub entry_date: NaiveDate,
    pub entry_index: usize,
}

/// A completed round trip. Immutable once recorded.
#[derive(Debug, Clone, PartialEq)]
pub struct Trade {
    pub quantity: f64,
    pub entry_index: usize,
    pub exit_index: usize,
    pub entry_date: NaiveDate,
    pub exit_date: NaiveDate,
    pub entry_price: f64,
    pub exit_price: f64,
    pub fees: f64,
    pub pnl: f64,
    pub forced_exit: bool,
}

/// Ordered closed trades plus the currently open position, if any. Owned by
/// the simulator for the duration of one run; flat once the run completes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TradeLedger {
    pub trades: Vec<Trade>,
    pub open: Option<OpenPosition>,
}

impl TradeLedger {
    pub fn new() -> Self {
        TradeLedger::default()
    }

    pub fn is_flat(&self) -> bool {
        self.open.is_none()
    }

    /// Record a new open position. Returns false (and leaves the ledger
    /// untouched) if a position is already open: no pyramiding.
    pub fn open_position(&mut self, position: OpenPosition) -> bool {
        if self.open.is_some() {
            return false;
        }
        self.open = Some(position);
        true
    }

    /// Close the open position into a trade. Returns `None` when flat.
    pub fn close_position(
        &mut self,
        exit_index: usize,
        exit_date: NaiveDate,
        exit_price: f64,
        fees: f64,
        forced_exit: bool,
    ) -> Option<&Trade> {
        let position = self.open.take()?;
        let pnl = (exit_price - position.entry_price) * position.quantity - fees;
        self.trades.push(Trade {
            quantity: position.quantity,
            entry_index: position.entry_index,
            exit_index,
            entry_date: position.entry_date,
            exit_date,
            entry_price: position.entry_price,
            exit_price,
            fees,
            pnl,
            forced_exit,
        });
        self.trades.last()
    }
}
