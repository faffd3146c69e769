pub mod alert;
pub mod header;
pub mod item_card;
pub mod protected;
pub mod spinner;
