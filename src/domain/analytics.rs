//! Performance metrics derived from a trade ledger.

use super::ledger::TradeLedger;

/// Aggregated performance statistics. Recomputed from the ledger on demand,
/// never persisted independently of it.
#[derive(Debug, Clone, PartialEq)]
pub struct Metrics {
    pub total_trades: usize,
    pub trades_won: usize,
    pub trades_lost: usize,
    pub trades_breakeven: usize,
    pub win_rate: f64,
    pub total_pnl: f64,
    pub max_drawdown: f64,
    pub avg_win: f64,
    pub avg_loss: f64,
    pub largest_win: f64,
    pub largest_loss: f64,
    pub forced_exits: usize,
}

impl Metrics {
    /// Pure and idempotent: repeated calls over the same ledger yield the
    /// same metrics.
    pub fn aggregate(ledger: &TradeLedger) -> Self {
        let mut trades_won = 0usize;
        let mut trades_lost = 0usize;
        let mut trades_breakeven = 0usize;
        let mut forced_exits = 0usize;
        let mut total_wins = 0.0_f64;
        let mut total_losses = 0.0_f64;
        let mut largest_win = 0.0_f64;
        let mut largest_loss = 0.0_f64;
        let mut total_pnl = 0.0_f64;

        // Max drawdown over the cumulative-P&L curve, prefix-summed in
        // ledger order, as an absolute amount.
        let mut equity = 0.0_f64;
        let mut peak = 0.0_f64;
        let mut max_drawdown = 0.0_f64;

        for trade in &ledger.trades {
            let pnl = trade.pnl;
            total_pnl += pnl;

            if pnl > 0.0 {
                trades_won += 1;
                total_wins += pnl;
                largest_win = largest_win.max(pnl);
            } else if pnl < 0.0 {
                trades_lost += 1;
                total_losses += pnl.abs();
                largest_loss = largest_loss.max(pnl.abs());
            } else {
                trades_breakeven += 1;
            }

            if trade.forced_exit {
                forced_exits += 1;
            }

            equity += pnl;
            peak = peak.max(equity);
            max_drawdown = max_drawdown.max(peak - equity);
        }

        let total_trades = ledger.trades.len();
        let win_rate = if total_trades > 0 {
            trades_won as f64 / total_trades as f64
        } else {
            0.0
        };

        let avg_win = if trades_won > 0 {
            total_wins / trades_won as f64
        } else {
            0.0
        };

        let avg_loss = if trades_lost > 0 {
            total_losses / trades_lost as f64
        } else {
            0.0
        };

        Metrics {
            total_trades,
            trades_won,
            trades_lost,
            trades_breakeven,
            win_rate,
            total_pnl,
            max_drawdown,
            avg_win,
            avg_loss,
            largest_win,
            largest_loss,
            forced_exits,
        }
    }
}
