//! Domain models returned by repositories and serialized by handlers.

pub mod customer;
pub mod event;
pub mod order;
pub mod product;
pub mod tenant;
pub mod user;

pub use customer::CustomerProfileView;
pub use event::{Event, EventInput};
pub use order::{
    CustomerOrder, DeliveryDetails, FulfillmentItem, FulfillmentLine, FulfillmentOrder,
    PlacedOrder,
};
pub use product::{NewProduct, Product, ProductUpdate};
pub use tenant::{ShopRevenue, Tenant, TenantProfileUpdate};
pub use user::{NewUser, User};
