pub mod client;
pub mod constants;
pub mod crypto;
pub mod dbc;
pub mod derive;
pub mod ixs;
pub mod ledger;
pub mod tx;
pub mod typedefs;
