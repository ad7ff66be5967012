pub mod federation;
pub mod identity;
pub mod ledger;
