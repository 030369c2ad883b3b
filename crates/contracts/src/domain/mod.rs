pub mod a001_customer;
pub mod a002_branch;
pub mod a003_operator;
pub mod a004_visit;
pub mod a005_product;
pub mod a006_material_sale;
pub mod a007_document;
pub mod a008_weekly_km;
pub mod a009_corrective_action;
pub mod common;
