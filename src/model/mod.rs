//! Data model types for glass and mirror quotes.

mod ledger;
mod line_item;
mod material;

pub use ledger::{Ledger, QuoteSnapshot, Totals};
pub use line_item::{ItemSpec, ItemUpdate, LineItem};
pub use material::{Finish, Material};
