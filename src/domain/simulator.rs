//! Bar-by-bar backtest simulation.
//!
//! Long-only state machine over {Flat, Long}. BUY while Flat opens a
//! position; SELL while Long closes it into a trade; BUY while Long and SELL
//! while Flat are no-ops. Signals and prices are consumed strictly in
//! chronological order; the only state carried between bars is the open
//! position and (under `NextOpen`) at most one pending order.
//!
//! At the end of the series an open position is force-closed at the last
//! close and the resulting trade flagged as a forced exit, so the ledger
//! always reconciles flat.

use log::warn;

use super::bar::{PriceBar, PriceSeries};
use super::ledger::{OpenPosition, TradeLedger};
use super::signal::Signal;
use super::strategy::{ExecutionConfig, FillModel};

pub struct Simulator<'a> {
    exec: &'a ExecutionConfig,
    fill_model: FillModel,
    ledger: TradeLedger,
    pending: Option<Signal>,
}

impl<'a> Simulator<'a> {
    pub fn new(exec: &'a ExecutionConfig, fill_model: FillModel) -> Self {
        Simulator {
            exec,
            fill_model,
            ledger: TradeLedger::new(),
            pending: None,
        }
    }

    /// Feed one bar and its composed signal, oldest first.
    pub fn on_bar(&mut self, index: usize, bar: &PriceBar, signal: Signal) {
        // A pending order from the previous bar fills at this bar's open
        // before the current signal is considered.
        if let Some(pending) = self.pending.take() {
            self.execute(pending, index, bar, bar.open);
        }

        match self.fill_model {
            FillModel::CurrentClose => self.execute(signal, index, bar, bar.close),
            FillModel::NextOpen => {
                if signal != Signal::Hold {
                    self.pending = Some(signal);
                }
            }
        }
    }

    fn execute(&mut self, signal: Signal, index: usize, bar: &PriceBar, price: f64) {
        match signal {
            Signal::Buy => {
                // Ignored while a position is open (no pyramiding).
                self.ledger.open_position(OpenPosition {
                    quantity: self.exec.quantity,
                    entry_price: price,
                    entry_date: bar.date,
                    entry_index: index,
                });
            }
            Signal::Sell => {
                // Ignored while flat.
                self.ledger.close_position(
                    index,
                    bar.date,
                    price,
                    2.0 * self.exec.fee_per_trade,
                    false,
                );
            }
            Signal::Hold => {}
        }
    }

    /// End the run: drop any unfillable pending order and force-close an open
    /// position at the final close.
    pub fn finish(mut self, series: &PriceSeries) -> TradeLedger {
        if let Some(pending) = self.pending.take() {
            warn!("{pending} signal on final bar dropped: no next open to fill at");
        }

        if let Some(last) = series.last() {
            if !self.ledger.is_flat() {
                let last_index = series.len() - 1;
                self.ledger.close_position(
                    last_index,
                    last.date,
                    last.close,
                    2.0 * self.exec.fee_per_trade,
                    true,
                );
            }
        }

        self.ledger
    }
}
