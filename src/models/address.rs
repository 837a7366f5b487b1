use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::entities::checkout_addresses;

pub const LABEL_CHOICES: [(&str, &str); 4] = [
    ("home", "Home"),
    ("work", "Work"),
    ("family", "Friends & Family"),
    ("other", "Other"),
];

#[derive(Debug, Clone, Deserialize)]
pub struct AddressForm {
    #[serde(default = "default_label")]
    pub label: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub address_line1: String,
    #[serde(default)]
    pub address_line2: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub pincode: String,
    #[serde(default)]
    pub is_default: bool,
}

fn default_label() -> String {
    "home".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct SelectAddressForm {
    pub address_id: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddressOut {
    pub id: i32,
    pub label: String,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub address_line1: String,
    pub address_line2: String,
    pub city: String,
    pub state: String,
    pub pincode: String,
    pub is_default: bool,
}

impl From<checkout_addresses::Model> for AddressOut {
    fn from(model: checkout_addresses::Model) -> Self {
        Self {
            id: model.id,
            label: model.label,
            name: model.name,
            phone: model.phone,
            email: model.email,
            address_line1: model.address_line1,
            address_line2: model.address_line2,
            city: model.city,
            state: model.state,
            pincode: model.pincode,
            is_default: model.is_default,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddressListResponse {
    pub addresses: Vec<AddressOut>,
    pub selected_id: Option<i32>,
    pub total_price: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddressSavedResponse {
    pub address: AddressOut,
    pub selected_id: i32,
}
