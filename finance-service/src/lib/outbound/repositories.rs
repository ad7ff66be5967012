pub mod identity;
pub mod ledger;

pub use identity::PostgresIdentityRepository;
pub use ledger::PostgresLedgerRepository;
