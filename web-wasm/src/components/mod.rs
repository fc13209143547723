pub mod add_item_modal;
pub mod header;
pub mod item_list;
pub mod tabs;
