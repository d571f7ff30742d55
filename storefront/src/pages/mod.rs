pub mod base;
pub mod cart;
pub mod checkout;
pub mod home;
pub mod login;
pub mod product;
pub mod register;

pub use base::{BasePage, FooterLink, FooterSection, HeaderUi, Visibility};
pub use cart::CartPage;
pub use checkout::{CheckoutPage, Payment, PaymentMethod, ShippingMethod};
pub use home::{Category, HomePage};
pub use login::LoginPage;
pub use product::ProductPage;
pub use register::RegisterPage;
