pub mod airwallex;
pub use self::airwallex::Airwallex;

pub mod authorizedotnet;
pub use self::authorizedotnet::AuthorizeDotNet;

pub mod bambora_apac;
pub use self::bambora_apac::BamboraApac;

pub mod checkout;
pub use self::checkout::Checkout;

pub mod elavon;
pub use self::elavon::Elavon;

pub mod nmi;
pub use self::nmi::Nmi;

pub mod worldpay;
pub use self::worldpay::Worldpay;

pub mod macros;
