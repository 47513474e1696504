pub mod money;
pub mod payment;
pub mod transaction;

pub use money::Money;
pub use payment::{Frequency, PaymentId, ScheduledPayment};
pub use transaction::{BankAccountId, Transaction, TransactionId};
