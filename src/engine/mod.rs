//! Pure computation engines: fee quoting, commission derivation, the status
//! transition table, and settlement-period folding.

pub mod commission;
pub mod fees;
pub mod periods;
pub mod transitions;

pub use commission::{build_payment, supplier_commission};
pub use fees::{compute_quote, service_fee_rate, FeeQuote, QuoteError};
pub use periods::{summarize_periods, PeriodSummary};
pub use transitions::{TransitionRule, TransitionTable};
