pub use super::banners::Entity as Banners;
pub use super::brands::Entity as Brands;
pub use super::categories::Entity as Categories;
pub use super::checkout_addresses::Entity as CheckoutAddresses;
pub use super::checkout_orders::Entity as CheckoutOrders;
pub use super::checkout_payments::Entity as CheckoutPayments;
pub use super::delivery_pincodes::Entity as DeliveryPincodes;
pub use super::orders::Entity as Orders;
pub use super::otp_codes::Entity as OtpCodes;
pub use super::prescriptions::Entity as Prescriptions;
pub use super::product_images::Entity as ProductImages;
pub use super::products::Entity as Products;
pub use super::sessions::Entity as Sessions;
pub use super::store_credits::Entity as StoreCredits;
pub use super::user_profiles::Entity as UserProfiles;
pub use super::users::Entity as Users;
