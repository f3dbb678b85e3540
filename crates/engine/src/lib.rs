pub use deliveries::{Delivery, DeliveryPatch, NewDelivery};
pub use error::EngineError;
pub use expenses::{Expense, NewExpense};
pub use money::MoneyPaise;
pub use ops::{DeliveryTotals, Engine, EngineBuilder, ExpenseReport, PurchaseTotals};
pub use purchases::{NewPurchase, Purchase};
pub use shops::{NewShop, Shop, ShopPatch};

mod deliveries;
mod error;
mod expenses;
mod ledger;
mod money;
mod ops;
mod purchases;
mod shops;

type ResultEngine<T> = Result<T, EngineError>;
