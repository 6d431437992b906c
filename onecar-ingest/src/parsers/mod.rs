pub mod billing_csv;
pub mod billing_json;
