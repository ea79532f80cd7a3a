//! Entity module - Contains the SeaORM entity definitions for the database.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod product_sale;

pub use product_sale::{
    ActiveModel as ProductSaleActiveModel, Column as ProductSaleColumn, Entity as ProductSale,
    Model as ProductSaleModel,
};
